use serde::{Deserialize, Serialize};

use super::ids::ItemId;

/// Catalogue entry describing an item for HUD display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}
