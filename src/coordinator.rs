//! Drag Reconciliation
//!
//! Drives one drag gesture per card from drag-start through the store
//! round-trip:
//!
//! ```text
//! Idle -> Dragging -> Committing -> Committed | RolledBack
//! ```
//!
//! The board lock is taken per step and released before every store call,
//! so drag-over and realtime merges keep flowing while a write is pending.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::allocator::{rebalanced_positions, PositionAllocator};
use crate::config::BoardConfig;
use crate::dnd::{target_index, DropTarget};
use crate::domain::{ApplicantStatus, DomainError, DomainResult, ItemId, PositionUpdate, StatusUpdate};
use crate::mutator;
use crate::store::{BoardState, PendingMutation};
use crate::traits::BoardPersistence;
use crate::view::{column_refs, neighbor_positions};

/// The board behind its single lock
pub type SharedState = Arc<Mutex<BoardState>>;

/// Where a card is in its gesture lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePhase {
    Idle,
    Dragging,
    Committing,
}

/// How a drag-end resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DragOutcome {
    /// No drag-start on record for the card
    Ignored,
    /// Released without a usable target
    Cancelled { reverted: bool },
    /// Moved within its own column
    Reordered { position: f64 },
    /// Store accepted the new column; `position` is `None` if the card was
    /// deleted while the write was in flight
    Committed {
        status: ApplicantStatus,
        position: Option<f64>,
    },
    /// Store refused the new column; the card is back where it started
    RolledBack {
        status: ApplicantStatus,
        error: DomainError,
    },
}

/// A computed key plus any neighbours renumbered to make room for it
#[derive(Debug, Clone, PartialEq)]
struct Placement {
    position: f64,
    renumbered: Vec<PositionUpdate>,
}

/// What the locked half of drag-end decided
enum CommitPlan {
    Done(DragOutcome),
    Reorder(ItemId, Placement),
    StatusChange(StatusUpdate, DropTarget),
}

/// Orchestrates optimistic moves against the store
pub struct ReconciliationCoordinator {
    state: SharedState,
    persistence: Arc<dyn BoardPersistence>,
    allocator: PositionAllocator,
    config: BoardConfig,
}

impl ReconciliationCoordinator {
    pub fn new(state: SharedState, persistence: Arc<dyn BoardPersistence>, config: BoardConfig) -> Self {
        Self {
            state,
            persistence,
            allocator: config.allocator(),
            config,
        }
    }

    pub async fn phase(&self, id: &str) -> ReconcilePhase {
        let state = self.state.lock().await;
        if state.pending(id).is_some() {
            ReconcilePhase::Committing
        } else if state.original_status(id).is_some() {
            ReconcilePhase::Dragging
        } else {
            ReconcilePhase::Idle
        }
    }

    /// Snapshot the card's column. Returns `false` for unknown cards and for
    /// cards whose previous move is still being written.
    ///
    /// An existing snapshot from a gesture that never ended is kept, since it
    /// is the last status known to be confirmed.
    pub async fn drag_start(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;
        if state.pending(id).is_some() {
            debug!("drag-start for {} refused, a status write is in flight", id);
            return false;
        }
        let Some(status) = state.get(id).map(|item| item.status) else {
            debug!("drag-start for unknown card {}", id);
            return false;
        };
        state.snapshot_original(id, status);
        true
    }

    /// Live feedback: move the card into the hovered column.
    /// Returns the new status when it changed.
    pub async fn drag_over(&self, id: &str, target: &DropTarget) -> Option<ApplicantStatus> {
        let mut state = self.state.lock().await;
        state.original_status(id)?;

        let hovered = target.status(&state)?;
        if state.get(id)?.status == hovered {
            return None;
        }
        mutator::apply_status(&mut state, id, hovered).ok()?;
        Some(hovered)
    }

    /// Finish the gesture: place the card, write to the store, and keep or
    /// revert the optimistic state. Store failures never escape as errors.
    pub async fn drag_end(&self, id: &str, target: Option<DropTarget>) -> DragOutcome {
        let plan = {
            let mut state = self.state.lock().await;
            self.plan_commit(&mut state, id, target)
        };

        match plan {
            CommitPlan::Done(outcome) => outcome,
            CommitPlan::Reorder(id, placement) => {
                self.persist_placement(&id, &placement).await;
                DragOutcome::Reordered {
                    position: placement.position,
                }
            }
            CommitPlan::StatusChange(update, target) => self.commit_status(update, target).await,
        }
    }

    /// Locked half of drag-end. The snapshot is consumed first so it is
    /// discarded on every path.
    fn plan_commit(&self, state: &mut BoardState, id: &str, target: Option<DropTarget>) -> CommitPlan {
        let Some(original) = state.take_original(id) else {
            debug!("drag-end for {} without a snapshot, ignoring", id);
            return CommitPlan::Done(DragOutcome::Ignored);
        };
        let Some(mut current) = state.get(id).map(|item| item.status) else {
            debug!("card {} disappeared mid-drag", id);
            return CommitPlan::Done(DragOutcome::Ignored);
        };

        let target = match target {
            Some(target) if target.is_valid_for(state, id) => target,
            _ => return CommitPlan::Done(self.cancel(state, id, original, current)),
        };

        // a drop can land in a column drag-over never reported
        if let Some(destination) = target.status(state) {
            if destination != current && mutator::apply_status(state, id, destination).is_ok() {
                current = destination;
            }
        }

        if current == original {
            return match self.place(state, id, original, original, &target) {
                Ok(placement) => CommitPlan::Reorder(id.to_string(), placement),
                Err(e) => {
                    warn!("could not place {}: {}", id, e);
                    CommitPlan::Done(DragOutcome::Ignored)
                }
            };
        }

        let previous_position = state.get(id).map_or(0.0, |item| item.position);
        let applied_at = state.version();
        state.begin_commit(PendingMutation {
            item_id: id.to_string(),
            previous_status: original,
            previous_position,
            applied_at,
        });

        CommitPlan::StatusChange(
            StatusUpdate {
                id: id.to_string(),
                new_status: current,
                previous_status: original,
                updated_by: self.config.actor.clone(),
            },
            target,
        )
    }

    fn cancel(
        &self,
        state: &mut BoardState,
        id: &str,
        original: ApplicantStatus,
        current: ApplicantStatus,
    ) -> DragOutcome {
        let reverted = self.config.revert_on_cancel
            && current != original
            && mutator::apply_status(state, id, original).is_ok();
        debug!("drag of {} cancelled (reverted: {})", id, reverted);
        DragOutcome::Cancelled { reverted }
    }

    async fn commit_status(&self, update: StatusUpdate, target: DropTarget) -> DragOutcome {
        let result = self.persistence.update_status(&update).await;
        let id = update.id.as_str();

        let placement = {
            let mut state = self.state.lock().await;
            state.finish_commit(id);

            if let Err(error) = result {
                warn!(
                    "status write {} -> {} for {} failed, rolling back: {}",
                    update.previous_status, update.new_status, id, error
                );
                if state.contains(id) {
                    let _ = mutator::apply_status(&mut state, id, update.previous_status);
                }
                return DragOutcome::RolledBack {
                    status: update.previous_status,
                    error,
                };
            }

            if !state.contains(id) {
                info!("card {} was deleted while its move committed", id);
                return DragOutcome::Committed {
                    status: update.new_status,
                    position: None,
                };
            }

            // the committed column wins over anything merged during the write
            let _ = mutator::apply_status(&mut state, id, update.new_status);
            self.place(&mut state, id, update.previous_status, update.new_status, &target)
        };

        match placement {
            Ok(placement) => {
                self.persist_placement(id, &placement).await;
                DragOutcome::Committed {
                    status: update.new_status,
                    position: Some(placement.position),
                }
            }
            Err(e) => {
                warn!("could not place {} after commit: {}", id, e);
                DragOutcome::Committed {
                    status: update.new_status,
                    position: None,
                }
            }
        }
    }

    /// Compute and apply the card's key in `destination`
    fn place(
        &self,
        state: &mut BoardState,
        id: &str,
        origin: ApplicantStatus,
        destination: ApplicantStatus,
        target: &DropTarget,
    ) -> DomainResult<Placement> {
        let index = target_index(state, id, origin, destination, target);
        let neighbors = neighbor_positions(state, destination, id);

        let mut renumbered = Vec::new();
        let position = match self.allocator.allocate_strict(&neighbors, index) {
            Some(position) => position,
            None if self.config.rebalance_on_exhaustion => {
                renumbered = self.renumber(state, destination, id)?;
                let neighbors = neighbor_positions(state, destination, id);
                self.allocator.allocate(&neighbors, index)
            }
            None => self.allocator.allocate(&neighbors, index),
        };

        mutator::apply_position(state, id, position)?;
        Ok(Placement {
            position,
            renumbered,
        })
    }

    /// Spread a column back out to 1, 2, 3, ... leaving `moving` aside.
    fn renumber(
        &self,
        state: &mut BoardState,
        status: ApplicantStatus,
        moving: &str,
    ) -> DomainResult<Vec<PositionUpdate>> {
        let ids: Vec<ItemId> = column_refs(state, status, Some(moving))
            .into_iter()
            .map(|item| item.id.clone())
            .collect();
        info!("renumbering {} cards in {}", ids.len(), status);

        let positions = rebalanced_positions(ids.len());
        let mut updates = Vec::new();
        for (id, position) in ids.into_iter().zip(positions) {
            if mutator::apply_position(state, &id, position)? != position {
                updates.push(PositionUpdate { id, position });
            }
        }
        Ok(updates)
    }

    /// Fire-and-forget position writes; failures leave local keys in place.
    async fn persist_placement(&self, id: &str, placement: &Placement) {
        let own = PositionUpdate {
            id: id.to_string(),
            position: placement.position,
        };
        for update in placement.renumbered.iter().chain(std::iter::once(&own)) {
            if let Err(e) = self.persistence.update_position(update).await {
                warn!(
                    "position write for {} failed, keeping local {}: {}",
                    update.id, update.position, e
                );
            }
        }
    }
}
