use serde::{Deserialize, Serialize};

use super::ids::{HotspotId, InvestigationId, ItemId, NodeId, PuzzleId};

/// A rectangle in percentages (0-100) of the scene background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    /// Hit-test a point given in the same relative coordinates. The region
    /// is centred on `(x, y)`.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        px >= self.x - half_w
            && px <= self.x + half_w
            && py >= self.y - half_h
            && py <= self.y + half_h
    }
}

/// An interactive region within an Investigation Node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: HotspotId,
    pub region: Region,
    pub description: String,
    #[serde(default)]
    pub reward: Option<ItemId>,
    #[serde(default)]
    pub required_item: Option<ItemId>,
    #[serde(default)]
    pub puzzle: Option<PuzzleId>,
    /// Replaces `description` for flavor-only interactions.
    #[serde(default)]
    pub interact_text: Option<String>,
}

/// A point-and-click scene. Control returns to `exit` when the player leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationNode {
    pub id: InvestigationId,
    pub image: String,
    pub intro: String,
    pub exit: NodeId,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
}

impl InvestigationNode {
    pub fn hotspot(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id.as_str() == id)
    }

    /// Hotspots under a point, topmost first; later entries are drawn above
    /// earlier ones.
    pub fn hotspots_at(&self, x: f32, y: f32) -> impl Iterator<Item = &Hotspot> {
        self.hotspots
            .iter()
            .rev()
            .filter(move |h| h.region.contains(x, y))
    }

    pub fn hotspot_at(&self, x: f32, y: f32) -> Option<&Hotspot> {
        self.hotspots_at(x, y).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(x: f32, y: f32, width: f32, height: f32) -> Region {
        Region { x, y, width, height }
    }

    #[test]
    fn region_is_centred() {
        let r = region(50.0, 50.0, 20.0, 10.0);
        assert!(r.contains(50.0, 50.0));
        assert!(r.contains(40.0, 45.0));
        assert!(r.contains(60.0, 55.0));
        assert!(!r.contains(61.0, 50.0));
        assert!(!r.contains(50.0, 44.0));
    }

    #[test]
    fn hotspot_lookup() {
        let node = InvestigationNode {
            id: InvestigationId::from("ward_investigation"),
            image: "/images/ward.png".to_string(),
            intro: "Dust.".to_string(),
            exit: NodeId::from("hallway_choice"),
            hotspots: vec![
                Hotspot {
                    id: HotspotId::from("cabinet"),
                    region: region(50.0, 50.0, 40.0, 40.0),
                    description: "Empty.".to_string(),
                    reward: None,
                    required_item: None,
                    puzzle: None,
                    interact_text: None,
                },
                Hotspot {
                    id: HotspotId::from("pillow"),
                    region: region(50.0, 50.0, 10.0, 10.0),
                    description: "A shard.".to_string(),
                    reward: Some(ItemId::from("Metal Shard")),
                    required_item: None,
                    puzzle: None,
                    interact_text: None,
                },
            ],
        };
        assert!(node.hotspot("cabinet").is_some());
        assert!(node.hotspot("missing").is_none());
        assert_eq!(node.hotspot_at(50.0, 50.0).map(|h| h.id.as_str()), Some("pillow"));
        assert_eq!(node.hotspot_at(35.0, 35.0).map(|h| h.id.as_str()), Some("cabinet"));
        assert!(node.hotspot_at(5.0, 5.0).is_none());
        let stack: Vec<_> = node.hotspots_at(52.0, 52.0).map(|h| h.id.as_str()).collect();
        assert_eq!(stack, ["pillow", "cabinet"]);
    }
}
