//! Realtime Event Merging
//!
//! Folds create/update/delete notifications from other clients into the
//! same collection the coordinator mutates. Events are applied in arrival
//! order, each one synchronously against the board once any enrichment
//! has resolved.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::allocator::PositionAllocator;
use crate::coordinator::SharedState;
use crate::domain::{BoardEvent, Item, ItemRecord, Payload};
use crate::traits::{DetailView, Enricher};
use crate::view::neighbor_positions;

/// How one event landed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "merge", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// New card appended to its column
    Inserted { position: f64 },
    /// Created event for a card already on the board
    Duplicate,
    /// Fields overwritten; `in_flight` when a status write for the card was pending
    Updated { in_flight: bool },
    /// Card removed; `closed_detail` when its detail view was force-closed
    Removed { closed_detail: bool },
    /// Update or delete for a card the board does not hold
    Missing,
}

/// Applies realtime events to the board
#[derive(Clone)]
pub struct EventMerger {
    state: SharedState,
    enricher: Arc<dyn Enricher>,
    detail: Arc<dyn DetailView>,
    allocator: PositionAllocator,
}

impl EventMerger {
    pub fn new(
        state: SharedState,
        enricher: Arc<dyn Enricher>,
        detail: Arc<dyn DetailView>,
        allocator: PositionAllocator,
    ) -> Self {
        Self {
            state,
            enricher,
            detail,
            allocator,
        }
    }

    pub async fn apply(&self, event: BoardEvent) -> MergeOutcome {
        debug!("merging {} event for {}", event.kind(), event.item_id());
        match event {
            BoardEvent::Created { record } => self.created(record).await,
            BoardEvent::Updated { record, previous } => self.updated(record, previous).await,
            BoardEvent::Deleted { record } => self.deleted(&record.id).await,
        }
    }

    /// Drain an event channel until every sender is gone. Returns the
    /// number of events applied.
    pub async fn run(&self, mut events: mpsc::Receiver<BoardEvent>) -> usize {
        let mut applied = 0;
        while let Some(event) = events.recv().await {
            self.apply(event).await;
            applied += 1;
        }
        info!("event stream closed after {} events", applied);
        applied
    }

    /// Enrichment never blocks a merge: any failure falls back to the raw record
    async fn enrich(&self, raw: ItemRecord) -> ItemRecord {
        match self.enricher.enrich(raw.clone()).await {
            Ok(enriched) if enriched.id == raw.id => enriched,
            Ok(enriched) => {
                warn!(
                    "enrichment turned {} into {}, using the raw record",
                    raw.id, enriched.id
                );
                raw
            }
            Err(e) => {
                warn!("enrichment of {} failed, using the raw record: {}", raw.id, e);
                raw
            }
        }
    }

    async fn created(&self, record: ItemRecord) -> MergeOutcome {
        if self.state.lock().await.contains(&record.id) {
            return MergeOutcome::Duplicate;
        }
        let record = self.enrich(record).await;

        let mut state = self.state.lock().await;
        // the same card may have arrived while enrichment was pending
        if state.contains(&record.id) {
            return MergeOutcome::Duplicate;
        }
        let status = record.status.unwrap_or_default();
        let tail = {
            let neighbors = neighbor_positions(&state, status, &record.id);
            self.allocator.allocate(&neighbors, neighbors.len())
        };
        let item = record.into_item(tail);
        let position = item.position;
        state.push(item);
        MergeOutcome::Inserted { position }
    }

    /// Overwrite every field the record carries. Records without a status or
    /// a position leave the local column or key alone.
    async fn updated(&self, record: ItemRecord, previous: Option<Payload>) -> MergeOutcome {
        let record = self.enrich(record).await;

        let (in_flight, refreshed) = {
            let mut state = self.state.lock().await;
            let in_flight = state.pending(&record.id).is_some();
            let is_open = state.open_detail() == Some(record.id.as_str());

            let Some(item) = state.get_mut(&record.id) else {
                debug!("update for unknown card {}", record.id);
                return MergeOutcome::Missing;
            };
            if let Some(status) = record.status {
                item.status = status;
            }
            item.payload = record.payload;
            if let Some(position) = record.position {
                item.position = position;
            }
            let refreshed: Option<Item> = is_open.then(|| item.clone());
            state.bump();
            (in_flight, refreshed)
        };

        if in_flight {
            debug!(
                "merged update for {} over a pending status write (previous: {:?})",
                record.id, previous
            );
        }
        if let Some(item) = refreshed {
            self.detail.refresh(&item);
        }
        MergeOutcome::Updated { in_flight }
    }

    async fn deleted(&self, id: &str) -> MergeOutcome {
        let (removed, closes) = {
            let mut state = self.state.lock().await;
            let removed = state.remove(id).is_some();
            // a gesture on a deleted card can only end as a no-op
            state.take_original(id);
            let closes = state.open_detail() == Some(id);
            if closes {
                state.set_open_detail(None);
            }
            (removed, closes)
        };

        if closes {
            self.detail.close(id);
        }
        if removed {
            MergeOutcome::Removed {
                closed_detail: closes,
            }
        } else {
            MergeOutcome::Missing
        }
    }
}
