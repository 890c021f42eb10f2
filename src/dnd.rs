//! Drag-and-Drop Targets
//!
//! What a gesture is hovering or released over, and how that maps to a
//! destination column and slot.

use serde::{Deserialize, Serialize};

use crate::domain::{ApplicantStatus, ItemId};
use crate::store::BoardState;
use crate::view::column_refs;

/// Drop target types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropTarget {
    /// Over another card (take its slot)
    Card { id: ItemId },
    /// Over the empty area of a column (append)
    Column { status: ApplicantStatus },
    /// Explicit index into the column, moved card excluded
    Slot { status: ApplicantStatus, index: usize },
}

impl DropTarget {
    pub fn card(id: impl Into<ItemId>) -> Self {
        DropTarget::Card { id: id.into() }
    }

    pub fn column(status: ApplicantStatus) -> Self {
        DropTarget::Column { status }
    }

    /// Column the target belongs to, if it resolves to one
    pub fn status(&self, state: &BoardState) -> Option<ApplicantStatus> {
        match self {
            DropTarget::Card { id } => state.get(id).map(|item| item.status),
            DropTarget::Column { status } | DropTarget::Slot { status, .. } => Some(*status),
        }
    }

    /// A drop onto the dragged card itself or onto a card that no longer exists
    pub fn is_valid_for(&self, state: &BoardState, dragged: &str) -> bool {
        match self {
            DropTarget::Card { id } => id != dragged && state.contains(id),
            DropTarget::Column { .. } | DropTarget::Slot { .. } => true,
        }
    }
}

/// Slot index in `destination`, counted with `moved` left out.
///
/// `origin` is the column the gesture started in. Within the same column a
/// card target behaves like taking that card's slot: moving down lands after
/// it, moving up lands before it. Across columns the card is inserted before
/// the target. Unknown or foreign cards fall back to the end.
pub fn target_index(
    state: &BoardState,
    moved: &str,
    origin: ApplicantStatus,
    destination: ApplicantStatus,
    target: &DropTarget,
) -> usize {
    let others = column_refs(state, destination, Some(moved));
    match target {
        DropTarget::Column { .. } => others.len(),
        DropTarget::Slot { index, .. } => (*index).min(others.len()),
        DropTarget::Card { id } => {
            let Some(over) = others.iter().position(|item| &item.id == id) else {
                return others.len();
            };
            if origin != destination {
                return over;
            }
            let full = column_refs(state, destination, None);
            let from = full.iter().position(|item| item.id == moved);
            let to = full.iter().position(|item| &item.id == id);
            match (from, to) {
                (Some(from), Some(to)) if from < to => over + 1,
                _ => over,
            }
        }
    }
}
