//! Optimistic Mutations
//!
//! In-place edits to a card ahead of store confirmation. Each call hands back
//! the prior value so the caller can revert it later. No I/O happens here.

use crate::domain::{ApplicantStatus, DomainError, DomainResult};
use crate::store::BoardState;

/// Move a card to `new_status`, returning the status it had before.
///
/// Re-applying the status a card already has changes nothing, so drag-over
/// can call this as often as it fires.
pub fn apply_status(
    state: &mut BoardState,
    id: &str,
    new_status: ApplicantStatus,
) -> DomainResult<ApplicantStatus> {
    let item = state
        .get_mut(id)
        .ok_or_else(|| DomainError::NotFound(format!("Item {} not found", id)))?;

    let previous = item.status;
    if previous != new_status {
        item.status = new_status;
        state.bump();
    }
    Ok(previous)
}

/// Set a card's sort key, returning the key it had before.
pub fn apply_position(state: &mut BoardState, id: &str, new_position: f64) -> DomainResult<f64> {
    let item = state
        .get_mut(id)
        .ok_or_else(|| DomainError::NotFound(format!("Item {} not found", id)))?;

    let previous = item.position;
    if previous != new_position {
        item.position = new_position;
        state.bump();
    }
    Ok(previous)
}
