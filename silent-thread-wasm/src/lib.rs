//! WASM bindings for silent-thread: lets a browser front end drive the engine.
//!
//! Every inbound event is a method on [`StoryPlayer`]. State crosses the
//! boundary as JSON: call `snapshot()` after each event to get the current
//! mode, the node view, the session, and the signals emitted since the last
//! snapshot.

use serde::Serialize;
use std::time::Duration;
use wasm_bindgen::prelude::*;

use silent_thread::core::content::{ContentGraph, ContentSources};
use silent_thread::core::engine::NarrativeEngine;
use silent_thread::core::investigation::HotspotOutcome;
use silent_thread::core::puzzle::{PuzzleInput, PuzzleState};
use silent_thread::core::signal::{CinematicKind, Signal};

// ---------------------------------------------------------------------------
// Embedded content, compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const GAME: &str = include_str!("../../content/silent_thread/game.ron");
    pub const STORY: &str = include_str!("../../content/silent_thread/story.ron");
    pub const INVESTIGATIONS: &str =
        include_str!("../../content/silent_thread/investigations.ron");
    pub const PUZZLES: &str = include_str!("../../content/silent_thread/puzzles.ron");
    pub const ITEMS: &str = include_str!("../../content/silent_thread/items.ron");
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(Serialize)]
struct OptionInfo<'a> {
    index: usize,
    text: &'a str,
    locked_by: Option<&'a str>,
    sanity_cost: Option<u32>,
    investigate: bool,
    true_ending: bool,
}

#[derive(Serialize)]
struct NodeInfo<'a> {
    id: &'a str,
    text: &'a str,
    image: &'a str,
    ambience: Option<&'a str>,
    summary: Option<&'a str>,
    dice_target: Option<u8>,
    dice_stat: Option<&'a str>,
    options: Vec<OptionInfo<'a>>,
}

#[derive(Serialize)]
struct HotspotInfo<'a> {
    id: &'a str,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

#[derive(Serialize)]
struct SceneInfo<'a> {
    id: &'a str,
    image: &'a str,
    intro: &'a str,
    hotspots: Vec<HotspotInfo<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PuzzleInfo<'a> {
    CodeEntry { id: &'a str, description: &'a str, display: &'a str },
    GridToggle { id: &'a str, description: &'a str, size: usize, cells: &'a [bool] },
    RingRotation { id: &'a str, description: &'a str, angles: &'a [u16] },
}

#[derive(Serialize)]
struct ItemInfo<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    icon: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SignalInfo {
    Cue { tag: &'static str },
    Effect { tag: &'static str },
    Voice { src: String },
    Cinematic { tag: &'static str, video: String, narration: String },
    ItemAcquired { item: String },
    Tension { cost: u32, sanity: u32 },
    Narration { text: String },
    DiceFace { face: u8 },
    DiceResult { roll: u8, target: u8, success: bool },
    CodeDisplay { text: String },
    PuzzleSolved,
}

impl From<Signal> for SignalInfo {
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::Cue(cue) => Self::Cue { tag: cue.tag() },
            Signal::Effect(effect) => Self::Effect { tag: effect.tag() },
            Signal::Voice(src) => Self::Voice { src },
            Signal::Cinematic {
                kind,
                video,
                narration,
            } => Self::Cinematic {
                tag: match kind {
                    CinematicKind::Intro => "cinematic:intro",
                    CinematicKind::Ending(ending) => ending.tag(),
                },
                video,
                narration,
            },
            Signal::ItemAcquired(item) => Self::ItemAcquired { item: item.0 },
            Signal::Tension { cost, sanity } => Self::Tension { cost, sanity },
            Signal::Narration(text) => Self::Narration { text },
            Signal::DiceFace(face) => Self::DiceFace { face },
            Signal::DiceResult {
                roll,
                target,
                success,
            } => Self::DiceResult {
                roll,
                target,
                success,
            },
            Signal::CodeDisplay(text) => Self::CodeDisplay { text },
            Signal::PuzzleSolved => Self::PuzzleSolved,
        }
    }
}

#[derive(Serialize)]
struct Snapshot<'a> {
    mode: &'static str,
    node: NodeInfo<'a>,
    scene: Option<SceneInfo<'a>>,
    puzzle: Option<PuzzleInfo<'a>>,
    sanity: u32,
    sanity_max: u32,
    inventory: Vec<ItemInfo<'a>>,
    true_ending_unlocked: bool,
    signals: Vec<SignalInfo>,
}

fn outcome_label(outcome: &HotspotOutcome) -> &'static str {
    match outcome {
        HotspotOutcome::Unknown => "unknown",
        HotspotOutcome::AlreadyResolved => "already_resolved",
        HotspotOutcome::Locked { .. } => "locked",
        HotspotOutcome::ItemFound { .. } => "item_found",
        HotspotOutcome::Flavor { .. } => "flavor",
        HotspotOutcome::PuzzleTriggered(_) => "puzzle",
    }
}

/// Browser frame deltas can be negative, NaN or infinite after a tab
/// resumes; anything unrepresentable counts as no time at all.
fn frame_duration(dt_ms: f64) -> Duration {
    Duration::try_from_secs_f64(dt_ms / 1000.0).unwrap_or_default()
}

fn load_content() -> Result<ContentGraph, JsError> {
    ContentGraph::parse_ron(ContentSources {
        game: data::GAME,
        story: data::STORY,
        investigations: data::INVESTIGATIONS,
        puzzles: data::PUZZLES,
        items: data::ITEMS,
    })
    .map_err(|e| JsError::new(&format!("Content parse error: {e}")))
}

// ---------------------------------------------------------------------------
// StoryPlayer: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct StoryPlayer {
    engine: NarrativeEngine,
}

#[wasm_bindgen]
impl StoryPlayer {
    /// Create a player over the embedded story, seeded for reproducible dice.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<StoryPlayer, JsError> {
        let engine = NarrativeEngine::builder()
            .with_content(load_content()?)
            .seed(seed)
            .build()
            .map_err(|e| JsError::new(&format!("Engine build error: {e}")))?;
        Ok(StoryPlayer { engine })
    }

    pub fn start_game(&mut self) {
        self.engine.start_game();
    }

    pub fn restart(&mut self) {
        self.engine.restart();
    }

    pub fn complete_cinematic(&mut self) {
        self.engine.complete_cinematic();
    }

    pub fn select_option(&mut self, index: usize) -> bool {
        self.engine.select_option(index)
    }

    pub fn request_roll(&mut self) -> bool {
        self.engine.request_roll()
    }

    /// Click a hotspot by id. Returns what the click resolved to, e.g.
    /// "item_found" or "locked".
    pub fn interact_hotspot(&mut self, id: &str) -> String {
        outcome_label(&self.engine.interact_hotspot(id)).to_string()
    }

    /// Click at percentage coordinates of the scene background.
    pub fn interact_at(&mut self, x: f32, y: f32) -> String {
        outcome_label(&self.engine.interact_at(x, y)).to_string()
    }

    pub fn exit_investigation(&mut self) -> bool {
        self.engine.exit_investigation()
    }

    pub fn press_digit(&mut self, digit: u8) -> bool {
        self.engine.puzzle_input(PuzzleInput::Digit(digit))
    }

    pub fn delete_digit(&mut self) -> bool {
        self.engine.puzzle_input(PuzzleInput::Delete)
    }

    pub fn submit_code(&mut self) -> bool {
        self.engine.puzzle_input(PuzzleInput::Submit)
    }

    pub fn toggle_cell(&mut self, row: usize, col: usize) -> bool {
        self.engine.puzzle_input(PuzzleInput::Toggle { row, col })
    }

    pub fn rotate_ring(&mut self, ring: usize) -> bool {
        self.engine.puzzle_input(PuzzleInput::Rotate(ring))
    }

    pub fn exit_puzzle(&mut self) -> bool {
        self.engine.exit_puzzle()
    }

    /// Advance engine timers; call once per animation frame.
    pub fn tick(&mut self, dt_ms: f64) {
        self.engine.advance(frame_duration(dt_ms));
    }

    /// Return a JSON snapshot of the game and drain pending signals.
    pub fn snapshot(&mut self) -> Result<String, JsError> {
        let signals: Vec<SignalInfo> = self
            .engine
            .drain_signals()
            .into_iter()
            .map(SignalInfo::from)
            .collect();

        let engine = &self.engine;
        let view = engine.view();
        let node = NodeInfo {
            id: view.id.as_str(),
            text: view.text,
            image: view.image,
            ambience: view.ambience,
            summary: view.summary,
            dice_target: view.dice.map(|d| d.target),
            dice_stat: view.dice.map(|d| d.stat.as_str()),
            options: view
                .options
                .iter()
                .map(|o| OptionInfo {
                    index: o.index,
                    text: o.text,
                    locked_by: o.locked_by.map(|item| item.as_str()),
                    sanity_cost: o.sanity_cost,
                    investigate: o.investigate,
                    true_ending: o.true_ending,
                })
                .collect(),
        };

        let scene = engine.investigation_node().map(|scene| SceneInfo {
            id: scene.id.as_str(),
            image: &scene.image,
            intro: &scene.intro,
            hotspots: engine
                .visible_hotspots()
                .into_iter()
                .map(|h| HotspotInfo {
                    id: h.id.as_str(),
                    x: h.region.x,
                    y: h.region.y,
                    width: h.region.width,
                    height: h.region.height,
                })
                .collect(),
        });

        let puzzle = engine.puzzle().map(|p| {
            let id = p.id().as_str();
            let description = p.description();
            match p.state() {
                PuzzleState::CodeEntry(pad) => PuzzleInfo::CodeEntry {
                    id,
                    description,
                    display: pad.display(),
                },
                PuzzleState::GridToggle(grid) => PuzzleInfo::GridToggle {
                    id,
                    description,
                    size: grid.size(),
                    cells: grid.cells(),
                },
                PuzzleState::RingRotation(rings) => PuzzleInfo::RingRotation {
                    id,
                    description,
                    angles: rings.angles(),
                },
            }
        });

        let session = engine.session();
        let inventory = session
            .inventory()
            .items()
            .iter()
            .map(|item| match engine.content().item(item.as_str()) {
                Some(details) => ItemInfo {
                    id: item.as_str(),
                    name: &details.name,
                    description: &details.description,
                    icon: details.icon.as_deref(),
                },
                None => ItemInfo {
                    id: item.as_str(),
                    name: item.as_str(),
                    description: "",
                    icon: None,
                },
            })
            .collect();

        let snapshot = Snapshot {
            mode: engine.mode().tag(),
            node,
            scene,
            puzzle,
            sanity: session.sanity(),
            sanity_max: session.sanity_max(),
            inventory,
            true_ending_unlocked: engine.can_unlock_true_ending(),
            signals,
        };
        serde_json::to_string(&snapshot)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Reset the player with a new seed.
    pub fn reset(&mut self, seed: u64) -> Result<(), JsError> {
        let fresh = StoryPlayer::new(seed)?;
        self.engine = fresh.engine;
        Ok(())
    }
}
