use serde::{Deserialize, Serialize};

use super::ids::{ItemId, NodeId, PuzzleId};

/// How a non-matching but notable code is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EggTone {
    /// Heartbeat thump and a screen shake.
    Ominous,
    /// A plain failure buzz.
    Mocking,
}

/// A special wrong code with its own feedback. Never solves the puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasterEgg {
    pub code: String,
    pub display: String,
    pub tone: EggTone,
}

pub const DEFAULT_GRID_SIZE: usize = 3;
pub const DEFAULT_GRID_OFF: [usize; 5] = [1, 3, 4, 5, 7];
pub const DEFAULT_RING_SCRAMBLE: [u16; 3] = [135, 225, 90];

fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}

fn default_grid_off() -> Vec<usize> {
    DEFAULT_GRID_OFF.to_vec()
}

fn default_ring_scramble() -> Vec<u16> {
    DEFAULT_RING_SCRAMBLE.to_vec()
}

/// Puzzle kind together with its kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleKind {
    CodeEntry {
        code: String,
        #[serde(default)]
        easter_eggs: Vec<EasterEgg>,
    },
    GridToggle {
        #[serde(default = "default_grid_size")]
        size: usize,
        /// Row-major indices of the cells that start switched off.
        #[serde(default = "default_grid_off")]
        initially_off: Vec<usize>,
    },
    RingRotation {
        /// Starting angle per ring, outermost first. Its length is the ring count.
        #[serde(default = "default_ring_scramble")]
        scramble: Vec<u16>,
    },
}

impl PuzzleKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CodeEntry { .. } => "code-entry",
            Self::GridToggle { .. } => "grid-toggle",
            Self::RingRotation { .. } => "ring-rotation",
        }
    }
}

/// How a solved puzzle feeds back into the story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleOutcome {
    ItemGrant(ItemId),
    ForceTransition(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub id: PuzzleId,
    pub kind: PuzzleKind,
    pub description: String,
    #[serde(default)]
    pub outcome: Option<PuzzleOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_defaults_apply() {
        let src = r#"(
            id: "factory_circuit",
            kind: GridToggle(size: 3),
            description: "Stabilize Power Grid",
            outcome: Some(ItemGrant("Mechanic's Fuse")),
        )"#;
        let config: PuzzleConfig = ron::from_str(src).unwrap();
        match config.kind {
            PuzzleKind::GridToggle { size, initially_off } => {
                assert_eq!(size, 3);
                assert_eq!(initially_off, vec![1, 3, 4, 5, 7]);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(
            config.outcome,
            Some(PuzzleOutcome::ItemGrant(ItemId::from("Mechanic's Fuse")))
        );
    }

    #[test]
    fn ring_defaults_apply() {
        let src = r#"(
            id: "tower_rune",
            kind: RingRotation(),
            description: "Align the Three Seals",
            outcome: Some(ForceTransition("tower_unlocked")),
        )"#;
        let config: PuzzleConfig = ron::from_str(src).unwrap();
        assert_eq!(
            config.kind,
            PuzzleKind::RingRotation {
                scramble: vec![135, 225, 90]
            }
        );
        assert_eq!(config.kind.name(), "ring-rotation");
    }

    #[test]
    fn code_entry_with_eggs() {
        let src = r#"(
            id: "office_safe",
            kind: CodeEntry(
                code: "089",
                easter_eggs: [(code: "666", display: "HELL", tone: Ominous)],
            ),
            description: "Enter Patient ID",
        )"#;
        let config: PuzzleConfig = ron::from_str(src).unwrap();
        assert!(config.outcome.is_none());
        match config.kind {
            PuzzleKind::CodeEntry { code, easter_eggs } => {
                assert_eq!(code, "089");
                assert_eq!(easter_eggs[0].tone, EggTone::Ominous);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }
}
