/// Session State: everything the player has, for one play session.
use rustc_hash::FxHashSet;

use crate::schema::ids::{ItemId, NodeId};
use crate::schema::story::EndingKind;

/// Union-only item set. Acquisition order is kept for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    order: Vec<ItemId>,
    held: FxHashSet<ItemId>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item. Returns false, changing nothing, if it is already held.
    pub fn grant(&mut self, item: ItemId) -> bool {
        if self.held.contains(&item) {
            return false;
        }
        self.held.insert(item.clone());
        self.order.push(item);
        true
    }

    pub fn contains(&self, item: &str) -> bool {
        self.held.contains(item)
    }

    /// Returns true if every given item is held.
    pub fn contains_all<'a>(&self, items: impl IntoIterator<Item = &'a ItemId>) -> bool {
        items.into_iter().all(|item| self.held.contains(item))
    }

    /// Items in acquisition order.
    pub fn items(&self) -> &[ItemId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The single mutable state of a play session. Replaced wholesale on restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    current_node: NodeId,
    inventory: Inventory,
    sanity: u32,
    sanity_max: u32,
    ending: Option<EndingKind>,
}

impl SessionState {
    pub fn new(start: NodeId, sanity_max: u32) -> Self {
        Self {
            current_node: start,
            inventory: Inventory::new(),
            sanity: sanity_max,
            sanity_max,
            ending: None,
        }
    }

    pub fn current_node(&self) -> &NodeId {
        &self.current_node
    }

    pub(crate) fn set_current_node(&mut self, node: NodeId) {
        self.current_node = node;
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub(crate) fn grant(&mut self, item: ItemId) -> bool {
        self.inventory.grant(item)
    }

    pub fn sanity(&self) -> u32 {
        self.sanity
    }

    pub fn sanity_max(&self) -> u32 {
        self.sanity_max
    }

    /// Subtract `cost`, flooring at zero. Returns the new sanity.
    pub(crate) fn apply_sanity_cost(&mut self, cost: u32) -> u32 {
        self.sanity = self.sanity.saturating_sub(cost);
        self.sanity
    }

    pub fn ending(&self) -> Option<EndingKind> {
        self.ending
    }

    pub(crate) fn set_ending(&mut self, ending: EndingKind) {
        self.ending = Some(ending);
    }
}
