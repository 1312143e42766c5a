use serde::{Deserialize, Serialize};

use super::ids::{InvestigationId, ItemId, NodeId};

/// A transient presentation effect attached to a Story Node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Effect {
    #[default]
    None,
    Shake,
    Flash,
    Heartbeat,
}

impl Effect {
    /// Returns the tag string for this effect (e.g., "effect:shake").
    pub fn tag(&self) -> &'static str {
        match self {
            Self::None => "effect:none",
            Self::Shake => "effect:shake",
            Self::Flash => "effect:flash",
            Self::Heartbeat => "effect:heartbeat",
        }
    }
}

/// The fixed set of outcome kinds a terminal Story Node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndingKind {
    Bad,
    Neutral,
    True,
    Shadow,
    Successor,
}

/// The screen shown after an ending cinematic completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalScreen {
    GameOver,
    Victory,
}

impl EndingKind {
    pub const ALL: [EndingKind; 5] = [
        Self::Bad,
        Self::Neutral,
        Self::True,
        Self::Shadow,
        Self::Successor,
    ];

    /// Returns the tag string for this ending (e.g., "ending:shadow").
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Bad => "ending:bad",
            Self::Neutral => "ending:neutral",
            Self::True => "ending:true",
            Self::Shadow => "ending:shadow",
            Self::Successor => "ending:successor",
        }
    }

    /// Bad and shadow endings are losses; every other ending is a victory.
    pub fn terminal_screen(&self) -> TerminalScreen {
        match self {
            Self::Bad | Self::Shadow => TerminalScreen::GameOver,
            Self::Neutral | Self::True | Self::Successor => TerminalScreen::Victory,
        }
    }
}

/// A randomized d20 gate: the roll must meet or beat `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceChallenge {
    pub target: u8,
    pub stat: String,
    pub success: NodeId,
    pub fail: NodeId,
}

/// A player-selectable choice attached to a Story Node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryOption {
    pub text: String,
    pub next: NodeId,
    #[serde(default)]
    pub required_item: Option<ItemId>,
    #[serde(default)]
    pub sanity_cost: Option<u32>,
    /// Only selectable once every true-ending evidence item is held.
    #[serde(default)]
    pub true_ending: bool,
    /// Suspends into this investigation instead of moving to `next`.
    #[serde(default)]
    pub investigation: Option<InvestigationId>,
}

/// An addressable unit of narrative content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryNode {
    pub id: NodeId,
    pub text: String,
    pub image: String,
    #[serde(default)]
    pub options: Vec<StoryOption>,
    #[serde(default)]
    pub dice: Option<DiceChallenge>,
    #[serde(default)]
    pub effect: Effect,
    #[serde(default)]
    pub ambience: Option<String>,
    #[serde(default)]
    pub reward: Option<ItemId>,
    #[serde(default)]
    pub voice: Option<String>,
    /// Set at authoring time on terminal nodes.
    #[serde(default)]
    pub ending: Option<EndingKind>,
    /// Short status text for the terminal screen of an ending.
    #[serde(default)]
    pub summary: Option<String>,
}

impl StoryNode {
    pub fn is_ending(&self) -> bool {
        self.ending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ending_routes_to_terminal_screen() {
        assert_eq!(EndingKind::Bad.terminal_screen(), TerminalScreen::GameOver);
        assert_eq!(EndingKind::Shadow.terminal_screen(), TerminalScreen::GameOver);
        assert_eq!(EndingKind::Neutral.terminal_screen(), TerminalScreen::Victory);
        assert_eq!(EndingKind::True.terminal_screen(), TerminalScreen::Victory);
        assert_eq!(EndingKind::Successor.terminal_screen(), TerminalScreen::Victory);
    }

    #[test]
    fn effect_defaults_to_none() {
        assert_eq!(Effect::default(), Effect::None);
        assert_eq!(Effect::Shake.tag(), "effect:shake");
    }

    #[test]
    fn node_parses_with_optional_fields_omitted() {
        let src = r#"#![enable(implicit_some)]
        (
            id: "run_check",
            text: "You sprint.",
            image: "/images/shadow.png",
            effect: Shake,
            dice: (target: 18, stat: "Evasion", success: "run_success", fail: "death_shadow"),
        )"#;
        let node: StoryNode = ron::from_str(src).unwrap();
        assert!(node.options.is_empty());
        assert_eq!(node.effect, Effect::Shake);
        assert_eq!(node.dice.as_ref().map(|d| d.target), Some(18));
        assert!(node.reward.is_none());
        assert!(!node.is_ending());
    }

    #[test]
    fn option_gates_parse() {
        let src = r#"#![enable(implicit_some)]
        (
            text: "Drink the Vial.",
            next: "ending_shadow",
            required_item: "Strange Vial",
            sanity_cost: 5,
        )"#;
        let option: StoryOption = ron::from_str(src).unwrap();
        assert_eq!(option.required_item, Some(ItemId::from("Strange Vial")));
        assert_eq!(option.sanity_cost, Some(5));
        assert!(!option.true_ending);
        assert!(option.investigation.is_none());
    }
}
