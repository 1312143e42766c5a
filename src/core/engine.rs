/// The Narrative Engine: single authority over the active node, the active
/// interaction mode, and what the player holds.
///
/// Every inbound presentation event maps to one method here. Outbound
/// effects are queued as [`Signal`]s and drained by the host.
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::content::{ContentError, ContentGraph, ContentIssue};
use crate::core::dice::{DiceRoller, D20};
use crate::core::investigation::{HotspotOutcome, InvestigationVisit};
use crate::core::puzzle::{ActivePuzzle, PuzzleInput};
use crate::core::session::SessionState;
use crate::core::signal::{CinematicKind, Cue, Signal, SignalQueue};
use crate::core::timer::Timings;
use crate::schema::ids::{InvestigationId, ItemId, NodeId};
use crate::schema::investigation::{Hotspot, InvestigationNode};
use crate::schema::puzzle::PuzzleOutcome;
use crate::schema::story::{DiceChallenge, Effect, EndingKind, StoryNode, TerminalScreen};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("content error: {0}")]
    Content(#[from] ContentError),
    #[error("no content: call content_dir() or with_content() before build()")]
    MissingContent,
    #[error("start node not found: {0}")]
    UnknownStartNode(NodeId),
}

/// The interaction mode the presentation layer should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Menu,
    Cinematic,
    Playing,
    DiceRolling,
    Investigation,
    Puzzle,
    GameOver,
    Victory,
}

impl GameMode {
    /// Returns the tag string for this mode (e.g., "mode:dice_rolling").
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Menu => "mode:menu",
            Self::Cinematic => "mode:cinematic",
            Self::Playing => "mode:playing",
            Self::DiceRolling => "mode:dice_rolling",
            Self::Investigation => "mode:investigation",
            Self::Puzzle => "mode:puzzle",
            Self::GameOver => "mode:game_over",
            Self::Victory => "mode:victory",
        }
    }
}

/// Mode plus whatever resolver state that mode owns. Only one resolver can
/// exist at a time, and replacing the phase drops it along with its timers.
#[derive(Debug)]
enum Phase {
    Menu,
    Cinematic(CinematicKind),
    Playing,
    Dice(DiceRoller),
    Investigation(InvestigationVisit),
    /// The visit stays alive underneath so the scene is unchanged on return.
    Puzzle {
        visit: InvestigationVisit,
        puzzle: ActivePuzzle,
    },
    Finished(TerminalScreen),
}

impl Phase {
    fn mode(&self) -> GameMode {
        match self {
            Self::Menu => GameMode::Menu,
            Self::Cinematic(_) => GameMode::Cinematic,
            Self::Playing => GameMode::Playing,
            Self::Dice(_) => GameMode::DiceRolling,
            Self::Investigation(_) => GameMode::Investigation,
            Self::Puzzle { .. } => GameMode::Puzzle,
            Self::Finished(TerminalScreen::GameOver) => GameMode::GameOver,
            Self::Finished(TerminalScreen::Victory) => GameMode::Victory,
        }
    }
}

/// A Story Node prepared for rendering against the current session.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView<'a> {
    pub id: &'a NodeId,
    pub text: &'a str,
    pub image: &'a str,
    pub ambience: Option<&'a str>,
    pub effect: Effect,
    /// Terminal-screen status text, on ending nodes only.
    pub summary: Option<&'a str>,
    pub dice: Option<&'a DiceChallenge>,
    /// Options the player may see. Unmet true-ending options are left out.
    pub options: Vec<OptionView<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView<'a> {
    /// Index to pass to [`NarrativeEngine::select_option`].
    pub index: usize,
    pub text: &'a str,
    /// The missing item, if the option is locked.
    pub locked_by: Option<&'a ItemId>,
    pub sanity_cost: Option<u32>,
    pub investigate: bool,
    pub true_ending: bool,
}

impl OptionView<'_> {
    pub fn is_locked(&self) -> bool {
        self.locked_by.is_some()
    }
}

/// The top-level narrative engine. Built via `NarrativeEngine::builder()`.
pub struct NarrativeEngine {
    content: Arc<ContentGraph>,
    session: SessionState,
    phase: Phase,
    signals: SignalQueue,
    timings: Timings,
    rng: StdRng,
}

#[derive(Default)]
pub struct NarrativeEngineBuilder {
    content_dir: Option<PathBuf>,
    content: Option<ContentGraph>,
    seed: Option<u64>,
    timings: Option<Timings>,
}

impl NarrativeEngine {
    pub fn builder() -> NarrativeEngineBuilder {
        NarrativeEngineBuilder::default()
    }

    pub fn content(&self) -> &ContentGraph {
        &self.content
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn mode(&self) -> GameMode {
        self.phase.mode()
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn current_node(&self) -> &StoryNode {
        self.content.expect_node(self.session.current_node().as_str())
    }

    /// Which cinematic is playing, in CINEMATIC mode.
    pub fn cinematic(&self) -> Option<CinematicKind> {
        match self.phase {
            Phase::Cinematic(kind) => Some(kind),
            _ => None,
        }
    }

    /// The pending roll, in DICE_ROLLING mode.
    pub fn dice(&self) -> Option<&DiceRoller> {
        match &self.phase {
            Phase::Dice(roller) => Some(roller),
            _ => None,
        }
    }

    /// The investigation being visited, also while one of its puzzles is open.
    pub fn investigation(&self) -> Option<&InvestigationVisit> {
        match &self.phase {
            Phase::Investigation(visit) | Phase::Puzzle { visit, .. } => Some(visit),
            _ => None,
        }
    }

    pub fn investigation_node(&self) -> Option<&InvestigationNode> {
        self.investigation()
            .map(|visit| self.content.expect_investigation(visit.id().as_str()))
    }

    /// Hotspots the player can still see in the current scene.
    pub fn visible_hotspots(&self) -> Vec<&Hotspot> {
        match (self.investigation(), self.investigation_node()) {
            (Some(visit), Some(node)) => visit.visible_hotspots(node).collect(),
            _ => Vec::new(),
        }
    }

    pub fn puzzle(&self) -> Option<&ActivePuzzle> {
        match &self.phase {
            Phase::Puzzle { puzzle, .. } => Some(puzzle),
            _ => None,
        }
    }

    /// Take every signal emitted since the last drain.
    pub fn drain_signals(&mut self) -> Vec<Signal> {
        self.signals.drain()
    }

    /// Whether every true-ending evidence item is held.
    pub fn can_unlock_true_ending(&self) -> bool {
        self.session
            .inventory()
            .contains_all(&self.content.manifest().true_ending_items)
    }

    /// The current node with per-option gating resolved.
    pub fn view(&self) -> NodeView<'_> {
        let node = self.current_node();
        let inventory = self.session.inventory();
        let true_ending_open = self.can_unlock_true_ending();
        let options = node
            .options
            .iter()
            .enumerate()
            .filter(|(_, option)| !option.true_ending || true_ending_open)
            .map(|(index, option)| OptionView {
                index,
                text: &option.text,
                locked_by: option
                    .required_item
                    .as_ref()
                    .filter(|item| !inventory.contains(item.as_str())),
                sanity_cost: option.sanity_cost,
                investigate: option.investigation.is_some(),
                true_ending: option.true_ending,
            })
            .collect();
        NodeView {
            id: &node.id,
            text: &node.text,
            image: &node.image,
            ambience: node.ambience.as_deref(),
            effect: node.effect,
            summary: node.summary.as_deref(),
            dice: node.dice.as_ref(),
            options,
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        self.map_phase(|_| phase);
    }

    /// Replace the phase with `f(old)`, logging the mode change.
    fn map_phase(&mut self, f: impl FnOnce(Phase) -> Phase) {
        let from = self.phase.mode();
        let old = std::mem::replace(&mut self.phase, Phase::Menu);
        self.phase = f(old);
        let to = self.phase.mode();
        if from != to {
            info!(from = from.tag(), to = to.tag(), "mode change");
        }
    }

    /// Begin a fresh session with the intro cinematic. Whatever was in
    /// progress is discarded.
    pub fn start_game(&mut self) {
        let manifest = self.content.manifest();
        info!(title = %manifest.title, start = %manifest.start, "session start");
        self.session = SessionState::new(manifest.start.clone(), manifest.sanity_max);
        self.signals.cue(Cue::Click);
        self.signals.push(Signal::Cinematic {
            kind: CinematicKind::Intro,
            video: manifest.intro.video.clone(),
            narration: manifest.intro.narration.clone(),
        });
        self.set_phase(Phase::Cinematic(CinematicKind::Intro));
    }

    /// Tear down everything pending, including undrained signals, and start
    /// over.
    pub fn restart(&mut self) {
        info!(mode = self.mode().tag(), "restart");
        self.signals.clear();
        self.start_game();
    }

    /// The host finished playing the current cinematic.
    pub fn complete_cinematic(&mut self) {
        match self.phase {
            Phase::Cinematic(CinematicKind::Intro) => {
                self.set_phase(Phase::Playing);
                if let Some(voice) = self.current_node().voice.clone() {
                    self.signals.push(Signal::Voice(voice));
                }
            }
            Phase::Cinematic(CinematicKind::Ending(kind)) => {
                self.set_phase(Phase::Finished(kind.terminal_screen()));
            }
            _ => debug!(mode = self.mode().tag(), "no cinematic to complete"),
        }
    }

    /// Pick option `index` of the current node. Returns false, leaving the
    /// session untouched, if the option is unknown or gated.
    pub fn select_option(&mut self, index: usize) -> bool {
        if self.mode() != GameMode::Playing {
            warn!(index, mode = self.mode().tag(), "option selected outside PLAYING");
            return false;
        }
        let content = Arc::clone(&self.content);
        let node = content.expect_node(self.session.current_node().as_str());
        let Some(option) = node.options.get(index) else {
            warn!(node = %node.id, index, "no such option");
            return false;
        };
        self.signals.cue(Cue::Click);

        if let Some(required) = &option.required_item {
            if !self.session.inventory().contains(required.as_str()) {
                warn!(node = %node.id, index, %required, "option locked");
                self.signals.cue(Cue::Failure);
                return false;
            }
        }
        if option.true_ending && !self.can_unlock_true_ending() {
            warn!(node = %node.id, index, "true ending evidence incomplete");
            self.signals.cue(Cue::Failure);
            return false;
        }

        if let Some(cost) = option.sanity_cost {
            let sanity = self.session.apply_sanity_cost(cost);
            debug!(cost, sanity, "sanity cost");
            self.signals.cue(Cue::Heartbeat);
            self.signals.push(Signal::Tension { cost, sanity });
        }

        if let Some(id) = &option.investigation {
            if content.investigation(id.as_str()).is_some() {
                self.enter_investigation(id.clone());
                return true;
            }
            warn!(investigation = %id, next = %option.next, "unknown investigation; following option target");
        }

        let target = content.expect_node(option.next.as_str());
        match &target.dice {
            Some(challenge) => {
                debug!(node = %target.id, stat = %challenge.stat, target = challenge.target, "dice challenge");
                self.session.set_current_node(target.id.clone());
                self.set_phase(Phase::Dice(DiceRoller::new(challenge, self.timings)));
            }
            None => self.transition_to_node(option.next.as_str()),
        }
        true
    }

    fn enter_investigation(&mut self, id: InvestigationId) {
        debug!(investigation = %id, "investigation start");
        self.set_phase(Phase::Investigation(InvestigationVisit::new(id)));
    }

    /// Move to `id`: grant its reward, emit its effect and voice line, and
    /// enter its ending cinematic if it is terminal.
    ///
    /// # Panics
    ///
    /// Panics if `id` names no story node.
    pub fn transition_to_node(&mut self, id: &str) {
        let content = Arc::clone(&self.content);
        let node = content.expect_node(id);
        debug!(from = %self.session.current_node(), to = %node.id, "transition");

        if let Some(item) = &node.reward {
            self.grant_item(item.clone());
        }
        self.emit_effect(node.effect);
        if let Some(voice) = &node.voice {
            self.signals.push(Signal::Voice(voice.clone()));
        }
        self.session.set_current_node(node.id.clone());

        match node.ending {
            Some(kind) => self.enter_ending(kind, node),
            None if !matches!(self.phase, Phase::Dice(_)) => self.set_phase(Phase::Playing),
            None => {}
        }
    }

    fn enter_ending(&mut self, kind: EndingKind, node: &StoryNode) {
        info!(ending = kind.tag(), node = %node.id, "ending reached");
        self.session.set_ending(kind);
        let video = match self.content.manifest().cinematics.get(&kind) {
            Some(video) => video.clone(),
            None => {
                warn!(ending = kind.tag(), "no cinematic configured");
                String::new()
            }
        };
        self.signals.push(Signal::Cinematic {
            kind: CinematicKind::Ending(kind),
            video,
            narration: node.text.clone(),
        });
        self.set_phase(Phase::Cinematic(CinematicKind::Ending(kind)));
    }

    fn emit_effect(&mut self, effect: Effect) {
        let cue = match effect {
            Effect::None => return,
            Effect::Heartbeat => Cue::Heartbeat,
            Effect::Shake => Cue::Failure,
            Effect::Flash => Cue::Success,
        };
        self.signals.cue(cue);
        self.signals.push(Signal::Effect(effect));
    }

    /// Grant `item` once. Repeat grants change nothing and emit nothing.
    fn grant_item(&mut self, item: ItemId) -> bool {
        if !self.session.grant(item.clone()) {
            return false;
        }
        debug!(%item, "item granted");
        self.signals.cue(Cue::ItemGet);
        self.signals.push(Signal::ItemAcquired(item));
        true
    }

    /// Start spinning the die for the pending challenge.
    pub fn request_roll(&mut self) -> bool {
        match &mut self.phase {
            Phase::Dice(roller) => roller.start(&mut self.signals),
            _ => false,
        }
    }

    /// Branch on `roll` against the current node's challenge. Returns to
    /// PLAYING before transitioning, so an ending branch still wins.
    pub fn resolve_dice_outcome(&mut self, roll: D20) {
        if !matches!(self.phase, Phase::Dice(_)) {
            warn!(roll = roll.value(), mode = self.mode().tag(), "dice outcome outside DICE_ROLLING");
            return;
        }
        let content = Arc::clone(&self.content);
        let node = content.expect_node(self.session.current_node().as_str());
        let Some(challenge) = &node.dice else {
            panic!("content defect: node \"{}\" has no dice challenge", node.id);
        };
        let success = roll.meets(challenge.target);
        debug!(roll = roll.value(), target = challenge.target, success, "dice resolved");
        self.set_phase(Phase::Playing);
        let next = if success {
            &challenge.success
        } else {
            &challenge.fail
        };
        self.transition_to_node(next.as_str());
    }

    /// Click a hotspot in the current scene.
    pub fn interact_hotspot(&mut self, hotspot: &str) -> HotspotOutcome {
        let content = Arc::clone(&self.content);
        let outcome = match &mut self.phase {
            Phase::Investigation(visit) => {
                let node = content.expect_investigation(visit.id().as_str());
                visit.interact(node, hotspot, self.session.inventory(), &mut self.signals)
            }
            _ => {
                warn!(hotspot, "hotspot interaction outside INVESTIGATION");
                return HotspotOutcome::Unknown;
            }
        };
        match &outcome {
            HotspotOutcome::ItemFound { item, .. } => {
                self.resolve_investigation_item_found(Some(item.clone()));
            }
            HotspotOutcome::PuzzleTriggered(puzzle) => {
                let config = content.expect_puzzle(puzzle.as_str());
                let puzzle = ActivePuzzle::open(config, &self.timings, &mut self.signals);
                debug!(puzzle = %puzzle.id(), kind = config.kind.name(), "puzzle opened");
                self.map_phase(|phase| match phase {
                    Phase::Investigation(visit) => Phase::Puzzle { visit, puzzle },
                    other => other,
                });
            }
            HotspotOutcome::Locked { required } => {
                warn!(hotspot, %required, "hotspot locked");
            }
            HotspotOutcome::Unknown => debug!(hotspot, "no such hotspot"),
            HotspotOutcome::AlreadyResolved | HotspotOutcome::Flavor { .. } => {}
        }
        outcome
    }

    /// Click at relative scene coordinates; resolves to the topmost visible
    /// hotspot there.
    pub fn interact_at(&mut self, x: f32, y: f32) -> HotspotOutcome {
        let hit = match (self.investigation(), self.investigation_node()) {
            (Some(visit), Some(node)) => visit.hotspot_at(node, x, y).map(|h| h.id.clone()),
            _ => None,
        };
        match hit {
            Some(id) => self.interact_hotspot(id.as_str()),
            None => HotspotOutcome::Unknown,
        }
    }

    /// Grant an item found during an investigation. `None` is a flavor-only
    /// find with no inventory effect.
    pub fn resolve_investigation_item_found(&mut self, item: Option<ItemId>) {
        if let Some(item) = item {
            self.grant_item(item);
        }
    }

    /// Leave the current scene through its exit node.
    pub fn exit_investigation(&mut self) -> bool {
        let id = match &self.phase {
            Phase::Investigation(visit) => visit.id().clone(),
            _ => return false,
        };
        self.resolve_investigation_exit(id.as_str());
        true
    }

    /// Transition to the exit node of investigation `id`.
    pub fn resolve_investigation_exit(&mut self, id: &str) {
        let content = Arc::clone(&self.content);
        let node = content.expect_investigation(id);
        debug!(investigation = id, exit = %node.exit, "investigation exit");
        self.transition_to_node(node.exit.as_str());
    }

    /// Feed one input to the open puzzle.
    pub fn puzzle_input(&mut self, input: PuzzleInput) -> bool {
        match &mut self.phase {
            Phase::Puzzle { puzzle, .. } => puzzle.handle(input, &mut self.signals),
            _ => false,
        }
    }

    /// Close the open puzzle without solving it. Ignored while a solve is
    /// settling.
    pub fn exit_puzzle(&mut self) -> bool {
        match &self.phase {
            Phase::Puzzle { puzzle, .. } if puzzle.is_settling() => {
                debug!(puzzle = %puzzle.id(), "puzzle exit ignored while settling");
                return false;
            }
            Phase::Puzzle { .. } => {}
            _ => return false,
        }
        self.map_phase(|phase| match phase {
            Phase::Puzzle { visit, .. } => Phase::Investigation(visit),
            other => other,
        });
        true
    }

    /// Apply the outcome of the solved puzzle `id`: grant its item and return
    /// to the scene, or force a transition out of the scene entirely.
    pub fn resolve_puzzle_outcome(&mut self, id: &str) {
        let outcome = match &self.phase {
            Phase::Puzzle { puzzle, .. } if puzzle.id().as_str() == id => puzzle.outcome().cloned(),
            _ => {
                warn!(puzzle = id, "outcome for a puzzle that is not open");
                return;
            }
        };
        debug!(puzzle = id, ?outcome, "puzzle resolved");
        match outcome {
            Some(PuzzleOutcome::ForceTransition(node)) => self.transition_to_node(node.as_str()),
            Some(PuzzleOutcome::ItemGrant(item)) => {
                self.grant_item(item);
                self.return_to_scene();
            }
            None => self.return_to_scene(),
        }
    }

    fn return_to_scene(&mut self) {
        self.map_phase(|phase| match phase {
            Phase::Puzzle { visit, .. } => Phase::Investigation(visit),
            other => other,
        });
    }

    /// Advance every running timer by `dt`: the dice spin and reveal, the
    /// keypad feedback display, and the puzzle success delay.
    pub fn advance(&mut self, dt: Duration) {
        match &mut self.phase {
            Phase::Dice(roller) => {
                if let Some(roll) = roller.tick(dt, &mut self.rng, &mut self.signals) {
                    self.resolve_dice_outcome(roll);
                }
            }
            Phase::Puzzle { puzzle, .. } => {
                if puzzle.tick(dt, &mut self.signals) {
                    let id = puzzle.id().clone();
                    self.resolve_puzzle_outcome(id.as_str());
                }
            }
            _ => {}
        }
    }
}

impl NarrativeEngineBuilder {
    pub fn content_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.content_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Provide content directly (for testing without files).
    pub fn with_content(mut self, content: ContentGraph) -> Self {
        self.content = Some(content);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the timings from `game.ron`.
    pub fn timings(mut self, timings: Timings) -> Self {
        self.timings = Some(timings);
        self
    }

    pub fn build(self) -> Result<NarrativeEngine, EngineError> {
        let content = match (self.content, self.content_dir) {
            (Some(content), _) => content,
            (None, Some(dir)) => ContentGraph::load_from_dir(&dir)?,
            (None, None) => return Err(EngineError::MissingContent),
        };

        let manifest = content.manifest();
        if content.story_node(manifest.start.as_str()).is_none() {
            return Err(EngineError::UnknownStartNode(manifest.start.clone()));
        }

        let (errors, warnings): (Vec<ContentIssue>, Vec<ContentIssue>) =
            content.validate().into_iter().partition(ContentIssue::is_error);
        for issue in &warnings {
            warn!(%issue, "content");
        }
        if !errors.is_empty() {
            return Err(ContentError::Invalid(errors).into());
        }

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let timings = self.timings.unwrap_or(manifest.timings);
        let session = SessionState::new(manifest.start.clone(), manifest.sanity_max);

        Ok(NarrativeEngine {
            content: Arc::new(content),
            session,
            phase: Phase::Menu,
            signals: SignalQueue::new(),
            timings,
            rng,
        })
    }
}
