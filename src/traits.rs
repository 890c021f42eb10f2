//! Collaborator Seams
//!
//! Abstract interfaces for the store, the enrichment step and the detail view.
//! Implementations can be SQLite, HTTP, in-memory, etc.

use async_trait::async_trait;

use crate::domain::{DomainResult, Item, ItemRecord, PositionUpdate, StatusUpdate};

/// Durable store behind the board
#[async_trait]
pub trait BoardPersistence: Send + Sync {
    /// Full list of cards for the initial load
    async fn load_items(&self) -> DomainResult<Vec<Item>>;

    /// Move a card to another column; any error means the move was refused
    async fn update_status(&self, update: &StatusUpdate) -> DomainResult<()>;

    /// Record a card's new sort key
    async fn update_position(&self, update: &PositionUpdate) -> DomainResult<()>;
}

/// Augments a raw record before it is merged
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Return a same-shaped record. Errors make the merger fall back to the
    /// raw record.
    async fn enrich(&self, record: ItemRecord) -> DomainResult<ItemRecord>;
}

/// Enricher that hands records back unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughEnricher;

#[async_trait]
impl Enricher for PassthroughEnricher {
    async fn enrich(&self, record: ItemRecord) -> DomainResult<ItemRecord> {
        Ok(record)
    }
}

/// The open card detail panel, owned by the rendering layer
pub trait DetailView: Send + Sync {
    /// The card on display was deleted elsewhere
    fn close(&self, id: &str);

    /// The card on display changed elsewhere
    fn refresh(&self, item: &Item);
}

/// Detail view for hosts without one
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDetailView;

impl DetailView for NoDetailView {
    fn close(&self, _id: &str) {}

    fn refresh(&self, _item: &Item) {}
}
