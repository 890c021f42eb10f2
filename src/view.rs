//! Column Projections
//!
//! Read-only, position-sorted views of the master collection for the
//! rendering layer.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::{ApplicantStatus, Item};
use crate::store::BoardState;

/// Display order: position ascending, id ascending on ties.
pub fn display_order(a: &Item, b: &Item) -> Ordering {
    a.position
        .total_cmp(&b.position)
        .then_with(|| a.id.cmp(&b.id))
}

/// Cards in one column, sorted for display
pub fn by_status(state: &BoardState, status: ApplicantStatus) -> Vec<Item> {
    let mut column: Vec<Item> = state
        .items()
        .iter()
        .filter(|item| item.status == status)
        .cloned()
        .collect();
    column.sort_by(display_order);
    column
}

/// Sorted cards of a column without cloning, optionally leaving one out
pub(crate) fn column_refs<'a>(
    state: &'a BoardState,
    status: ApplicantStatus,
    exclude: Option<&str>,
) -> Vec<&'a Item> {
    let mut column: Vec<&Item> = state
        .items()
        .iter()
        .filter(|item| item.status == status && Some(item.id.as_str()) != exclude)
        .collect();
    column.sort_by(|a, b| display_order(a, b));
    column
}

/// Sorted keys of a column, leaving out the card being moved
pub fn neighbor_positions(state: &BoardState, status: ApplicantStatus, exclude: &str) -> Vec<f64> {
    column_refs(state, status, Some(exclude))
        .into_iter()
        .map(|item| item.position)
        .collect()
}

/// One rendered column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub status: ApplicantStatus,
    pub items: Vec<Item>,
}

/// Every column at one store version
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub version: u64,
    pub columns: Vec<Column>,
}

/// Project every status column in board order
pub fn snapshot(state: &BoardState) -> BoardSnapshot {
    BoardSnapshot {
        version: state.version(),
        columns: ApplicantStatus::ALL
            .iter()
            .map(|status| Column {
                status: *status,
                items: by_status(state, *status),
            })
            .collect(),
    }
}
