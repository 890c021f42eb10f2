//! Applicant Board
//!
//! Reconciliation engine for a drag-and-drop applicant board:
//! - allocator: fractional sort keys for dropped cards
//! - mutator: optimistic in-place edits
//! - coordinator: drag-end round-trips with commit or rollback
//! - merger: realtime create/update/delete events
//! - view: sorted per-column projections

pub mod allocator;
pub mod board;
pub mod config;
pub mod coordinator;
pub mod dnd;
pub mod domain;
pub mod merger;
pub mod mutator;
pub mod store;
pub mod traits;
pub mod view;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;

pub use allocator::PositionAllocator;
pub use board::Board;
pub use config::BoardConfig;
pub use coordinator::{DragOutcome, ReconcilePhase, ReconciliationCoordinator};
pub use dnd::DropTarget;
pub use domain::{
    ApplicantStatus, BoardEvent, DomainError, DomainResult, Item, ItemId, ItemRecord,
    PositionUpdate, StatusUpdate,
};
pub use merger::{EventMerger, MergeOutcome};
pub use store::{BoardState, PendingMutation};
pub use traits::{BoardPersistence, DetailView, Enricher, NoDetailView, PassthroughEnricher};
pub use view::{BoardSnapshot, Column};
