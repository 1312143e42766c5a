/// Content Graph loading, lookup, and authoring-time validation.
///
/// The graph is read once and never mutated. Referential integrity is
/// checked up front by [`ContentGraph::validate`] so the engine can treat
/// a dangling id as a programming error.
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::path::Path;
use thiserror::Error;

use crate::core::puzzle::code_entry::MAX_DIGITS;
use crate::core::puzzle::ring_rotation::{FULL_TURN, STEP_DEGREES};
use crate::core::timer::Timings;
use crate::schema::ids::{InvestigationId, ItemId, NodeId, PuzzleId};
use crate::schema::investigation::InvestigationNode;
use crate::schema::item::ItemDetails;
use crate::schema::puzzle::{PuzzleConfig, PuzzleKind, PuzzleOutcome};
use crate::schema::story::{EndingKind, StoryNode};

pub const GAME_FILE: &str = "game.ron";
pub const STORY_FILE: &str = "story.ron";
pub const INVESTIGATIONS_FILE: &str = "investigations.ron";
pub const PUZZLES_FILE: &str = "puzzles.ron";
pub const ITEMS_FILE: &str = "items.ron";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("content failed validation with {} error(s)", .0.len())]
    Invalid(Vec<ContentIssue>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

/// One finding from [`ContentGraph::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentIssue {
    pub severity: Severity,
    pub message: String,
}

impl ContentIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "error: {}", self.message),
            Severity::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// The opening cinematic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroCinematic {
    pub video: String,
    pub narration: String,
}

fn default_sanity_max() -> u32 {
    100
}

fn default_true_ending_items() -> Vec<ItemId> {
    ["Metal Shard", "Personnel File", "Burnt Canvas"]
        .into_iter()
        .map(ItemId::from)
        .collect()
}

/// Game-wide settings from `game.ron`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameManifest {
    pub title: String,
    pub start: NodeId,
    #[serde(default = "default_sanity_max")]
    pub sanity_max: u32,
    pub intro: IntroCinematic,
    /// Video played when an ending of each kind is reached.
    #[serde(default)]
    pub cinematics: FxHashMap<EndingKind, String>,
    /// Evidence that must all be held to pick a true-ending option.
    #[serde(default = "default_true_ending_items")]
    pub true_ending_items: Vec<ItemId>,
    #[serde(default)]
    pub timings: Timings,
}

/// Raw RON text for each content file.
#[derive(Debug, Clone, Copy)]
pub struct ContentSources<'a> {
    pub game: &'a str,
    pub story: &'a str,
    pub investigations: &'a str,
    pub puzzles: &'a str,
    pub items: &'a str,
}

/// Records in authoring order, indexed by id. The first of any duplicate
/// ids wins.
#[derive(Debug, Clone)]
struct Table<K, V> {
    entries: Vec<V>,
    index: FxHashMap<K, usize>,
}

impl<K, V> Table<K, V>
where
    K: Borrow<str> + Hash + Eq + Clone + fmt::Display,
{
    fn build(
        values: Vec<V>,
        key: impl Fn(&V) -> &K,
        kind: &str,
        duplicates: &mut Vec<String>,
    ) -> Self {
        let mut table = Self {
            entries: Vec::with_capacity(values.len()),
            index: FxHashMap::default(),
        };
        for value in values {
            let id = key(&value).clone();
            if table.index.contains_key::<K>(&id) {
                duplicates.push(format!("duplicate {kind} id \"{id}\""));
                continue;
            }
            table.index.insert(id, table.entries.len());
            table.entries.push(value);
        }
        table
    }

    fn get(&self, id: &str) -> Option<&V> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}

/// The complete authored game: story, investigations, puzzles, items.
#[derive(Debug, Clone)]
pub struct ContentGraph {
    manifest: GameManifest,
    story: Table<NodeId, StoryNode>,
    investigations: Table<InvestigationId, InvestigationNode>,
    puzzles: Table<PuzzleId, PuzzleConfig>,
    items: Table<ItemId, ItemDetails>,
    duplicates: Vec<String>,
}

impl ContentGraph {
    /// Load every content file from `dir`.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        let read = |name: &str| std::fs::read_to_string(dir.join(name));
        let game = read(GAME_FILE)?;
        let story = read(STORY_FILE)?;
        let investigations = read(INVESTIGATIONS_FILE)?;
        let puzzles = read(PUZZLES_FILE)?;
        let items = read(ITEMS_FILE)?;
        Self::parse_ron(ContentSources {
            game: &game,
            story: &story,
            investigations: &investigations,
            puzzles: &puzzles,
            items: &items,
        })
    }

    pub fn parse_ron(sources: ContentSources<'_>) -> Result<Self, ContentError> {
        let manifest: GameManifest = ron::from_str(sources.game)?;
        let story: Vec<StoryNode> = ron::from_str(sources.story)?;
        let investigations: Vec<InvestigationNode> = ron::from_str(sources.investigations)?;
        let puzzles: Vec<PuzzleConfig> = ron::from_str(sources.puzzles)?;
        let items: Vec<ItemDetails> = ron::from_str(sources.items)?;
        Ok(Self::from_parts(
            manifest,
            story,
            investigations,
            puzzles,
            items,
        ))
    }

    /// Assemble a graph from already-deserialized records.
    pub fn from_parts(
        manifest: GameManifest,
        story: Vec<StoryNode>,
        investigations: Vec<InvestigationNode>,
        puzzles: Vec<PuzzleConfig>,
        items: Vec<ItemDetails>,
    ) -> Self {
        let mut duplicates = Vec::new();
        let story = Table::build(story, |n| &n.id, "story node", &mut duplicates);
        let investigations = Table::build(
            investigations,
            |n| &n.id,
            "investigation",
            &mut duplicates,
        );
        let puzzles = Table::build(puzzles, |p| &p.id, "puzzle", &mut duplicates);
        let items = Table::build(items, |i| &i.id, "item", &mut duplicates);
        Self {
            manifest,
            story,
            investigations,
            puzzles,
            items,
            duplicates,
        }
    }

    pub fn manifest(&self) -> &GameManifest {
        &self.manifest
    }

    pub fn story_node(&self, id: &str) -> Option<&StoryNode> {
        self.story.get(id)
    }

    pub fn investigation(&self, id: &str) -> Option<&InvestigationNode> {
        self.investigations.get(id)
    }

    pub fn puzzle(&self, id: &str) -> Option<&PuzzleConfig> {
        self.puzzles.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&ItemDetails> {
        self.items.get(id)
    }

    /// Story nodes in authoring order.
    pub fn story_nodes(&self) -> &[StoryNode] {
        &self.story.entries
    }

    pub fn investigations(&self) -> &[InvestigationNode] {
        &self.investigations.entries
    }

    pub fn puzzles(&self) -> &[PuzzleConfig] {
        &self.puzzles.entries
    }

    /// The item catalogue in authoring order.
    pub fn items(&self) -> &[ItemDetails] {
        &self.items.entries
    }

    /// # Panics
    ///
    /// Panics if `id` names no story node. Validated content never does.
    pub fn expect_node(&self, id: &str) -> &StoryNode {
        self.story
            .get(id)
            .unwrap_or_else(|| panic!("content defect: no story node \"{id}\""))
    }

    /// # Panics
    ///
    /// Panics if `id` names no investigation node.
    pub fn expect_investigation(&self, id: &str) -> &InvestigationNode {
        self.investigations
            .get(id)
            .unwrap_or_else(|| panic!("content defect: no investigation \"{id}\""))
    }

    /// # Panics
    ///
    /// Panics if `id` names no puzzle config.
    pub fn expect_puzzle(&self, id: &str) -> &PuzzleConfig {
        self.puzzles
            .get(id)
            .unwrap_or_else(|| panic!("content defect: no puzzle \"{id}\""))
    }

    /// Check referential integrity and solvability. Errors make the content
    /// unplayable; warnings are tolerated.
    pub fn validate(&self) -> Vec<ContentIssue> {
        let mut issues: Vec<ContentIssue> = self
            .duplicates
            .iter()
            .map(|d| ContentIssue::error(d.clone()))
            .collect();

        if !self.story.contains(self.manifest.start.as_str()) {
            issues.push(ContentIssue::error(format!(
                "start node \"{}\" does not exist",
                self.manifest.start
            )));
        }

        self.validate_story(&mut issues);
        self.validate_investigations(&mut issues);
        self.validate_puzzles(&mut issues);
        self.validate_items(&mut issues);
        self.validate_reachability(&mut issues);

        issues.sort_by_key(|issue| issue.severity);
        issues
    }

    /// Only an option can start a dice challenge. Any other way onto a
    /// dice node strands the player there.
    fn has_dice(&self, id: &str) -> bool {
        self.story.get(id).is_some_and(|n| n.dice.is_some())
    }

    fn validate_story(&self, issues: &mut Vec<ContentIssue>) {
        for node in self.story_nodes() {
            let id = &node.id;
            for (i, option) in node.options.iter().enumerate() {
                if !self.story.contains(option.next.as_str()) {
                    issues.push(ContentIssue::error(format!(
                        "node \"{id}\" option {i} leads to unknown node \"{}\"",
                        option.next
                    )));
                }
                if let Some(inv) = &option.investigation {
                    if !self.investigations.contains(inv.as_str()) {
                        issues.push(ContentIssue::warning(format!(
                            "node \"{id}\" option {i} starts unknown investigation \"{inv}\"; \
                             it will fall through to \"{}\"",
                            option.next
                        )));
                    }
                }
            }
            if let Some(dice) = &node.dice {
                if !(1..=20).contains(&dice.target) {
                    issues.push(ContentIssue::error(format!(
                        "node \"{id}\" dice target {} is outside 1-20",
                        dice.target
                    )));
                }
                for branch in [&dice.success, &dice.fail] {
                    if !self.story.contains(branch.as_str()) {
                        issues.push(ContentIssue::error(format!(
                            "node \"{id}\" dice branch leads to unknown node \"{branch}\""
                        )));
                    } else if self.has_dice(branch.as_str()) {
                        issues.push(ContentIssue::error(format!(
                            "node \"{id}\" dice branch leads to dice node \"{branch}\", which can never be rolled"
                        )));
                    }
                }
            }
            match node.ending {
                Some(kind) => {
                    if !self.manifest.cinematics.contains_key(&kind) {
                        issues.push(ContentIssue::error(format!(
                            "ending node \"{id}\" is {} but no cinematic is configured for it",
                            kind.tag()
                        )));
                    }
                }
                None if node.options.is_empty() && node.dice.is_none() => {
                    issues.push(ContentIssue::error(format!(
                        "node \"{id}\" is a dead end: no options, no dice, not an ending"
                    )));
                }
                None => {}
            }
        }
    }

    fn validate_investigations(&self, issues: &mut Vec<ContentIssue>) {
        for inv in self.investigations() {
            if !self.story.contains(inv.exit.as_str()) {
                issues.push(ContentIssue::error(format!(
                    "investigation \"{}\" exits to unknown node \"{}\"",
                    inv.id, inv.exit
                )));
            } else if self.has_dice(inv.exit.as_str()) {
                issues.push(ContentIssue::error(format!(
                    "investigation \"{}\" exits to dice node \"{}\", which can never be rolled",
                    inv.id, inv.exit
                )));
            }
            for spot in &inv.hotspots {
                if let Some(puzzle) = &spot.puzzle {
                    if !self.puzzles.contains(puzzle.as_str()) {
                        issues.push(ContentIssue::error(format!(
                            "hotspot \"{}\" in \"{}\" opens unknown puzzle \"{puzzle}\"",
                            spot.id, inv.id
                        )));
                    }
                }
            }
        }
    }

    fn validate_puzzles(&self, issues: &mut Vec<ContentIssue>) {
        for puzzle in self.puzzles() {
            let id = &puzzle.id;
            match &puzzle.kind {
                PuzzleKind::CodeEntry { code, .. } => {
                    let well_formed = !code.is_empty()
                        && code.len() <= MAX_DIGITS
                        && code.bytes().all(|b| b.is_ascii_digit());
                    if !well_formed {
                        issues.push(ContentIssue::error(format!(
                            "puzzle \"{id}\" code \"{code}\" must be 1-{MAX_DIGITS} digits"
                        )));
                    }
                }
                PuzzleKind::GridToggle {
                    size,
                    initially_off,
                } => {
                    if *size == 0 {
                        issues.push(ContentIssue::error(format!(
                            "puzzle \"{id}\" grid size must be at least 1"
                        )));
                    }
                    let cells = size * size;
                    for &cell in initially_off.iter().filter(|&&c| c >= cells) {
                        issues.push(ContentIssue::error(format!(
                            "puzzle \"{id}\" initially-off cell {cell} is outside a {size}x{size} grid"
                        )));
                    }
                }
                PuzzleKind::RingRotation { scramble } => {
                    if scramble.is_empty() {
                        issues.push(ContentIssue::error(format!(
                            "puzzle \"{id}\" has no rings"
                        )));
                    }
                    for &angle in scramble.iter().filter(|&&a| a % STEP_DEGREES != 0) {
                        issues.push(ContentIssue::error(format!(
                            "puzzle \"{id}\" ring angle {angle} is not a multiple of {STEP_DEGREES}"
                        )));
                    }
                    if !scramble.is_empty() && scramble.iter().all(|a| a % FULL_TURN == 0) {
                        issues.push(ContentIssue::warning(format!(
                            "puzzle \"{id}\" starts already solved"
                        )));
                    }
                }
            }
            if let Some(PuzzleOutcome::ForceTransition(node)) = &puzzle.outcome {
                if !self.story.contains(node.as_str()) {
                    issues.push(ContentIssue::error(format!(
                        "puzzle \"{id}\" forces a transition to unknown node \"{node}\""
                    )));
                } else if self.has_dice(node.as_str()) {
                    issues.push(ContentIssue::error(format!(
                        "puzzle \"{id}\" forces a transition to dice node \"{node}\", which can never be rolled"
                    )));
                }
            }
        }
    }

    /// Every item the content can hand out.
    fn granted_items(&self) -> FxHashSet<&ItemId> {
        let from_nodes = self.story_nodes().iter().filter_map(|n| n.reward.as_ref());
        let from_hotspots = self
            .investigations()
            .iter()
            .flat_map(|inv| inv.hotspots.iter())
            .filter_map(|h| h.reward.as_ref());
        let from_puzzles = self.puzzles().iter().filter_map(|p| match &p.outcome {
            Some(PuzzleOutcome::ItemGrant(item)) => Some(item),
            _ => None,
        });
        from_nodes.chain(from_hotspots).chain(from_puzzles).collect()
    }

    fn validate_items(&self, issues: &mut Vec<ContentIssue>) {
        for item in &self.manifest.true_ending_items {
            if !self.items.contains(item.as_str()) {
                issues.push(ContentIssue::error(format!(
                    "true-ending item \"{item}\" is not in the item catalogue"
                )));
            }
        }

        let granted = self.granted_items();
        let required = self
            .story_nodes()
            .iter()
            .flat_map(|n| n.options.iter())
            .filter_map(|o| o.required_item.as_ref())
            .chain(
                self.investigations()
                    .iter()
                    .flat_map(|inv| inv.hotspots.iter())
                    .filter_map(|h| h.required_item.as_ref()),
            );
        let mut unknown: Vec<&ItemId> = granted
            .iter()
            .copied()
            .chain(required)
            .filter(|item| !self.items.contains(item.as_str()))
            .collect();
        unknown.sort();
        unknown.dedup();
        for item in unknown {
            issues.push(ContentIssue::warning(format!(
                "item \"{item}\" is not in the item catalogue"
            )));
        }

        for item in self.items() {
            if !granted.contains(&item.id) {
                issues.push(ContentIssue::warning(format!(
                    "item \"{}\" is never granted",
                    item.id
                )));
            }
        }
    }

    /// Story nodes reachable from the start node through options, dice
    /// branches, investigation exits, and forced puzzle transitions.
    pub fn reachable_nodes(&self) -> FxHashSet<&NodeId> {
        let mut seen: FxHashSet<&NodeId> = FxHashSet::default();
        let mut stack: Vec<&NodeId> = vec![&self.manifest.start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.story.get(id.as_str()) else {
                continue;
            };
            if !seen.insert(&node.id) {
                continue;
            }
            for option in &node.options {
                stack.push(&option.next);
                let Some(inv) = option
                    .investigation
                    .as_ref()
                    .and_then(|i| self.investigations.get(i.as_str()))
                else {
                    continue;
                };
                stack.push(&inv.exit);
                for puzzle in inv
                    .hotspots
                    .iter()
                    .filter_map(|h| h.puzzle.as_ref())
                    .filter_map(|p| self.puzzles.get(p.as_str()))
                {
                    if let Some(PuzzleOutcome::ForceTransition(target)) = &puzzle.outcome {
                        stack.push(target);
                    }
                }
            }
            if let Some(dice) = &node.dice {
                stack.push(&dice.success);
                stack.push(&dice.fail);
            }
        }
        seen
    }

    fn validate_reachability(&self, issues: &mut Vec<ContentIssue>) {
        let reachable = self.reachable_nodes();
        for node in self.story_nodes() {
            if !reachable.contains(&node.id) {
                issues.push(ContentIssue::warning(format!(
                    "story node \"{}\" is unreachable from \"{}\"",
                    node.id, self.manifest.start
                )));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: &str = r#"#![enable(implicit_some)]
    (
        title: "Test",
        start: "start",
        intro: (video: "/videos/intro.mp4", narration: "Pull the thread."),
        cinematics: { Bad: "/videos/ending_bad.mp4" },
        true_ending_items: ["Metal Shard"],
    )"#;

    const STORY: &str = r#"#![enable(implicit_some)]
    [
        (
            id: "start",
            text: "You wake.",
            image: "/images/ward.png",
            options: [
                (text: "Look around.", next: "hall", investigation: "ward_investigation"),
                (text: "Run.", next: "run_check"),
            ],
        ),
        (id: "hall", text: "A hall.", image: "/images/hall.png", options: [(text: "On.", next: "ending_bad")]),
        (
            id: "run_check",
            text: "You sprint.",
            image: "/images/shadow.png",
            dice: (target: 18, stat: "Evasion", success: "hall", fail: "ending_bad"),
        ),
        (id: "ending_bad", text: "Gone.", image: "/images/void.png", ending: Bad),
    ]"#;

    const INVESTIGATIONS: &str = r#"#![enable(implicit_some)]
    [
        (
            id: "ward_investigation",
            image: "/images/ward.png",
            intro: "Dust.",
            exit: "hall",
            hotspots: [
                (
                    id: "bed_pillow",
                    region: (x: 21.0, y: 45.0, width: 20.0, height: 15.0),
                    description: "A shard.",
                    reward: "Metal Shard",
                ),
            ],
        ),
    ]"#;

    const ITEMS: &str = r#"[
        (id: "Metal Shard", name: "Metal Shard", description: "Jagged."),
    ]"#;

    fn sources<'a>(story: &'a str, puzzles: &'a str) -> ContentSources<'a> {
        ContentSources {
            game: GAME,
            story,
            investigations: INVESTIGATIONS,
            puzzles,
            items: ITEMS,
        }
    }

    fn errors(graph: &ContentGraph) -> Vec<String> {
        graph
            .validate()
            .into_iter()
            .filter(ContentIssue::is_error)
            .map(|i| i.message)
            .collect()
    }

    #[test]
    fn parses_and_validates_clean_content() {
        let graph = ContentGraph::parse_ron(sources(STORY, "[]")).unwrap();
        assert_eq!(graph.manifest().sanity_max, 100);
        assert_eq!(graph.manifest().timings, Timings::default());
        assert_eq!(graph.story_nodes().len(), 4);
        assert_eq!(graph.story_nodes()[0].id.as_str(), "start");
        assert!(graph.investigation("ward_investigation").is_some());
        assert_eq!(graph.item("Metal Shard").map(|i| i.description.as_str()), Some("Jagged."));
        assert!(graph.validate().is_empty(), "{:?}", graph.validate());
    }

    #[test]
    fn reports_dangling_references() {
        let story = STORY.replace(r#"fail: "ending_bad""#, r#"fail: "nowhere""#);
        let graph = ContentGraph::parse_ron(sources(&story, "[]")).unwrap();
        let errors = errors(&graph);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("\"nowhere\""));
    }

    #[test]
    fn reports_duplicate_ids() {
        let story = STORY.replace(r#"id: "hall""#, r#"id: "run_check""#);
        let graph = ContentGraph::parse_ron(sources(&story, "[]")).unwrap();
        assert!(errors(&graph)
            .iter()
            .any(|e| e.contains("duplicate story node id \"run_check\"")));
    }

    #[test]
    fn unknown_investigation_is_only_a_warning() {
        let story = STORY.replace("\"ward_investigation\"", "\"cellar_investigation\"");
        let graph = ContentGraph::parse_ron(sources(&story, "[]")).unwrap();
        let issues = graph.validate();
        assert!(errors(&graph).is_empty());
        assert!(issues
            .iter()
            .any(|i| !i.is_error() && i.message.contains("cellar_investigation")));
    }

    #[test]
    fn ending_without_cinematic_is_an_error() {
        let story = STORY.replace("ending: Bad", "ending: Shadow");
        let graph = ContentGraph::parse_ron(sources(&story, "[]")).unwrap();
        assert!(errors(&graph).iter().any(|e| e.contains("ending:shadow")));
    }

    #[test]
    fn bad_puzzle_parameters() {
        let puzzles = r#"[
            (id: "safe", kind: CodeEntry(code: "12345"), description: "Too long"),
            (id: "grid", kind: GridToggle(size: 2, initially_off: [4]), description: "Off grid"),
            (id: "rings", kind: RingRotation(scramble: [30, 0]), description: "Crooked"),
            (id: "done", kind: RingRotation(scramble: [0, 360]), description: "Solved"),
        ]"#;
        let graph = ContentGraph::parse_ron(sources(STORY, puzzles)).unwrap();
        let issues = graph.validate();
        let errors = errors(&graph);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(issues
            .iter()
            .any(|i| !i.is_error() && i.message.contains("\"done\" starts already solved")));
        // Errors sort ahead of warnings.
        assert!(issues[0].is_error());
    }

    #[test]
    fn unreachable_node_warns() {
        let story = format!(
            "{}{}",
            STORY.trim_end().trim_end_matches(']'),
            r#"(id: "island", text: "Alone.", image: "", options: [(text: "Back.", next: "start")])]"#
        );
        let graph = ContentGraph::parse_ron(sources(&story, "[]")).unwrap();
        let issues = graph.validate();
        assert!(issues
            .iter()
            .any(|i| i.message == "story node \"island\" is unreachable from \"start\""));
        assert!(!graph.reachable_nodes().iter().any(|n| n.as_str() == "island"));
    }

    #[test]
    fn dice_branch_into_dice_node_is_an_error() {
        let story = STORY.replace(r#"success: "hall""#, r#"success: "run_check""#);
        let graph = ContentGraph::parse_ron(sources(&story, "[]")).unwrap();
        let errors = errors(&graph);
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].contains("dice branch leads to dice node \"run_check\""));
    }

    #[test]
    fn investigation_exit_into_dice_node_is_an_error() {
        let investigations = INVESTIGATIONS.replace(r#"exit: "hall""#, r#"exit: "run_check""#);
        let graph = ContentGraph::parse_ron(ContentSources {
            investigations: &investigations,
            ..sources(STORY, "[]")
        })
        .unwrap();
        let errors = errors(&graph);
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].contains("exits to dice node \"run_check\""));
    }

    #[test]
    fn forced_transition_into_dice_node_is_an_error() {
        let puzzles = r#"#![enable(implicit_some)]
        [
            (
                id: "seal",
                kind: RingRotation(scramble: [315]),
                description: "Seal",
                outcome: ForceTransition("run_check"),
            ),
        ]"#;
        let graph = ContentGraph::parse_ron(sources(STORY, puzzles)).unwrap();
        let errors = errors(&graph);
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].contains("transition to dice node \"run_check\""));
    }

    #[test]
    #[should_panic(expected = "no story node \"nowhere\"")]
    fn expect_node_panics_on_dangling_id() {
        let graph = ContentGraph::parse_ron(sources(STORY, "[]")).unwrap();
        graph.expect_node("nowhere");
    }
}
