//! Board State Store
//!
//! The master collection plus the per-gesture side tables. A single owner
//! holds this behind one lock; every mutation goes through the mutator,
//! coordinator or merger.

use std::collections::HashMap;

use crate::domain::{ApplicantStatus, Item, ItemId};

/// Snapshot taken when a status change starts committing, enough to revert it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMutation {
    pub item_id: ItemId,
    pub previous_status: ApplicantStatus,
    pub previous_position: f64,
    /// Store version at the moment the commit began
    pub applied_at: u64,
}

/// Master collection of cards with gesture bookkeeping
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    /// Cards in insertion order
    items: Vec<Item>,
    /// Bumped on every visible change; usable as a memo key by readers
    version: u64,
    /// Pre-drag status per card, alive from drag-start to drag-end
    original_status: HashMap<ItemId, ApplicantStatus>,
    /// Status changes waiting on the store
    pending: HashMap<ItemId, PendingMutation>,
    /// Card currently shown in the detail view
    open_detail: Option<ItemId>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection (initial load or full refetch)
    pub fn with_items(items: Vec<Item>) -> Self {
        let mut state = Self::new();
        state.replace_all(items);
        state
    }

    pub fn replace_all(&mut self, items: Vec<Item>) {
        self.items = items;
        self.bump();
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn bump(&mut self) {
        self.version += 1;
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append a card to the end of the collection
    pub(crate) fn push(&mut self, item: Item) {
        self.items.push(item);
        self.bump();
    }

    /// Remove a card by id
    pub(crate) fn remove(&mut self, id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let removed = self.items.remove(index);
        self.bump();
        Some(removed)
    }

    // ========================
    // Gesture bookkeeping
    // ========================

    /// Record the pre-drag status unless a snapshot already exists
    pub(crate) fn snapshot_original(&mut self, id: &str, status: ApplicantStatus) {
        self.original_status.entry(id.to_string()).or_insert(status);
    }

    pub fn original_status(&self, id: &str) -> Option<ApplicantStatus> {
        self.original_status.get(id).copied()
    }

    pub(crate) fn take_original(&mut self, id: &str) -> Option<ApplicantStatus> {
        self.original_status.remove(id)
    }

    pub(crate) fn begin_commit(&mut self, mutation: PendingMutation) {
        self.pending.insert(mutation.item_id.clone(), mutation);
    }

    pub(crate) fn finish_commit(&mut self, id: &str) -> Option<PendingMutation> {
        self.pending.remove(id)
    }

    pub fn pending(&self, id: &str) -> Option<&PendingMutation> {
        self.pending.get(id)
    }

    // ========================
    // Detail view marker
    // ========================

    pub fn open_detail(&self) -> Option<&str> {
        self.open_detail.as_deref()
    }

    pub(crate) fn set_open_detail(&mut self, id: Option<ItemId>) {
        self.open_detail = id;
    }
}
