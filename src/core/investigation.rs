/// Investigation Resolver: hotspot discovery within one scene visit.
///
/// Never touches the session directly: it reports what a click means and
/// the engine applies it.
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::core::session::Inventory;
use crate::core::signal::{Cue, Signal, SignalQueue};
use crate::schema::ids::{HotspotId, InvestigationId, ItemId, PuzzleId};
use crate::schema::investigation::{Hotspot, InvestigationNode};

/// What a single hotspot interaction resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotspotOutcome {
    /// No hotspot with that id in this scene.
    Unknown,
    /// Already resolved during this visit.
    AlreadyResolved,
    /// Gated by an item the player does not hold. Retriable.
    Locked { required: ItemId },
    /// Collected an item; the hotspot disappears for the rest of the visit.
    ItemFound { item: ItemId, text: String },
    /// One-shot descriptive interaction.
    Flavor { text: String },
    /// Hand off to a puzzle. The hotspot stays unresolved.
    PuzzleTriggered(PuzzleId),
}

/// Per-visit discovery state. A fresh visit starts with nothing found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestigationVisit {
    id: InvestigationId,
    found: FxHashSet<HotspotId>,
}

impl InvestigationVisit {
    pub fn new(id: InvestigationId) -> Self {
        Self {
            id,
            found: FxHashSet::default(),
        }
    }

    pub fn id(&self) -> &InvestigationId {
        &self.id
    }

    pub fn is_found(&self, hotspot: &str) -> bool {
        self.found.contains(hotspot)
    }

    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    /// Hotspots still shown: everything except collected item rewards.
    pub fn visible_hotspots<'a>(
        &'a self,
        node: &'a InvestigationNode,
    ) -> impl Iterator<Item = &'a Hotspot> + 'a {
        node.hotspots.iter().filter(move |h| self.is_visible(h))
    }

    /// Topmost visible hotspot under a point.
    pub fn hotspot_at<'a>(&self, node: &'a InvestigationNode, x: f32, y: f32) -> Option<&'a Hotspot> {
        node.hotspots_at(x, y).find(|h| self.is_visible(h))
    }

    fn is_visible(&self, hotspot: &Hotspot) -> bool {
        !(hotspot.reward.is_some() && self.found.contains(&hotspot.id))
    }

    /// Resolve one click on `hotspot`.
    pub fn interact(
        &mut self,
        node: &InvestigationNode,
        hotspot: &str,
        inventory: &Inventory,
        signals: &mut SignalQueue,
    ) -> HotspotOutcome {
        let Some(spot) = node.hotspot(hotspot) else {
            return HotspotOutcome::Unknown;
        };
        if self.found.contains(&spot.id) {
            return HotspotOutcome::AlreadyResolved;
        }

        if let Some(required) = &spot.required_item {
            if !inventory.contains(required.as_str()) {
                debug!(hotspot, %required, "hotspot locked");
                signals.cue(Cue::Failure);
                return HotspotOutcome::Locked {
                    required: required.clone(),
                };
            }
        }

        signals.cue(Cue::Click);

        if let Some(puzzle) = &spot.puzzle {
            debug!(hotspot, %puzzle, "hotspot opens puzzle");
            return HotspotOutcome::PuzzleTriggered(puzzle.clone());
        }

        self.found.insert(spot.id.clone());
        match &spot.reward {
            Some(item) => {
                debug!(hotspot, %item, "hotspot item found");
                signals.push(Signal::Narration(spot.description.clone()));
                HotspotOutcome::ItemFound {
                    item: item.clone(),
                    text: spot.description.clone(),
                }
            }
            None => {
                let text = spot
                    .interact_text
                    .clone()
                    .unwrap_or_else(|| spot.description.clone());
                signals.push(Signal::Narration(text.clone()));
                HotspotOutcome::Flavor { text }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ids::NodeId;
    use crate::schema::investigation::Region;

    fn spot(id: &str) -> Hotspot {
        Hotspot {
            id: HotspotId::from(id),
            region: Region {
                x: 50.0,
                y: 50.0,
                width: 10.0,
                height: 10.0,
            },
            description: format!("{id} description"),
            reward: None,
            required_item: None,
            puzzle: None,
            interact_text: None,
        }
    }

    fn office() -> InvestigationNode {
        let mut drawer = spot("desk_drawer");
        drawer.reward = Some(ItemId::from("Old Key"));

        let mut cabinet = spot("cabinet_locked");
        cabinet.puzzle = Some(PuzzleId::from("office_safe"));

        let mut archive = spot("archive_door");
        archive.required_item = Some(ItemId::from("Old Key"));
        archive.interact_text = Some("The key turns.".to_string());

        InvestigationNode {
            id: InvestigationId::from("office_investigation"),
            image: "/images/office.png".to_string(),
            intro: "Papers everywhere.".to_string(),
            exit: NodeId::from("office_aftermath"),
            hotspots: vec![drawer, cabinet, archive, spot("notice_board")],
        }
    }

    #[test]
    fn collected_reward_uncovers_the_hotspot_beneath() {
        let mut drawer = spot("desk_drawer");
        drawer.reward = Some(ItemId::from("Old Key"));
        let node = InvestigationNode {
            hotspots: vec![spot("notice_board"), drawer],
            ..office()
        };
        let mut visit = InvestigationVisit::new(node.id.clone());
        let top = |visit: &InvestigationVisit| visit.hotspot_at(&node, 55.0, 55.0).map(|h| h.id.clone());

        assert_eq!(top(&visit), Some(HotspotId::from("desk_drawer")));
        visit.interact(&node, "desk_drawer", &Inventory::new(), &mut SignalQueue::new());
        assert_eq!(top(&visit), Some(HotspotId::from("notice_board")));
        assert_eq!(visit.hotspot_at(&node, 5.0, 5.0), None);
    }

    #[test]
    fn item_hotspot_collects_once_and_hides() {
        let node = office();
        let mut visit = InvestigationVisit::new(node.id.clone());
        let inventory = Inventory::new();
        let mut signals = SignalQueue::new();

        let outcome = visit.interact(&node, "desk_drawer", &inventory, &mut signals);
        assert_eq!(
            outcome,
            HotspotOutcome::ItemFound {
                item: ItemId::from("Old Key"),
                text: "desk_drawer description".to_string(),
            }
        );
        assert!(visit.is_found("desk_drawer"));
        assert!(visit.visible_hotspots(&node).all(|h| h.id.as_str() != "desk_drawer"));

        signals.clear();
        let again = visit.interact(&node, "desk_drawer", &inventory, &mut signals);
        assert_eq!(again, HotspotOutcome::AlreadyResolved);
        assert!(signals.is_empty());
    }

    #[test]
    fn locked_hotspot_stays_retriable() {
        let node = office();
        let mut visit = InvestigationVisit::new(node.id.clone());
        let mut inventory = Inventory::new();
        let mut signals = SignalQueue::new();

        let outcome = visit.interact(&node, "archive_door", &inventory, &mut signals);
        assert_eq!(
            outcome,
            HotspotOutcome::Locked {
                required: ItemId::from("Old Key")
            }
        );
        assert!(!visit.is_found("archive_door"));
        assert_eq!(signals.drain(), vec![Signal::Cue(Cue::Failure)]);

        inventory.grant(ItemId::from("Old Key"));
        let outcome = visit.interact(&node, "archive_door", &inventory, &mut signals);
        assert_eq!(
            outcome,
            HotspotOutcome::Flavor {
                text: "The key turns.".to_string()
            }
        );
    }

    #[test]
    fn flavor_is_one_shot_but_stays_visible() {
        let node = office();
        let mut visit = InvestigationVisit::new(node.id.clone());
        let inventory = Inventory::new();
        let mut signals = SignalQueue::new();

        let outcome = visit.interact(&node, "notice_board", &inventory, &mut signals);
        assert!(matches!(outcome, HotspotOutcome::Flavor { .. }));
        assert!(visit.is_found("notice_board"));
        assert!(visit.visible_hotspots(&node).any(|h| h.id.as_str() == "notice_board"));
        assert_eq!(
            visit.interact(&node, "notice_board", &inventory, &mut signals),
            HotspotOutcome::AlreadyResolved
        );
    }

    #[test]
    fn puzzle_hotspot_is_not_marked_found() {
        let node = office();
        let mut visit = InvestigationVisit::new(node.id.clone());
        let inventory = Inventory::new();
        let mut signals = SignalQueue::new();

        for _ in 0..2 {
            let outcome = visit.interact(&node, "cabinet_locked", &inventory, &mut signals);
            assert_eq!(
                outcome,
                HotspotOutcome::PuzzleTriggered(PuzzleId::from("office_safe"))
            );
        }
        assert!(!visit.is_found("cabinet_locked"));
        assert_eq!(visit.found_count(), 0);
    }

    #[test]
    fn unknown_hotspot() {
        let node = office();
        let mut visit = InvestigationVisit::new(node.id.clone());
        let mut signals = SignalQueue::new();
        assert_eq!(
            visit.interact(&node, "ceiling", &Inventory::new(), &mut signals),
            HotspotOutcome::Unknown
        );
        assert!(signals.is_empty());
    }
}
