//! Domain Layer
//!
//! Board entities, inbound event shapes and outbound persistence requests.
//! This layer has no dependencies beyond serde and thiserror.

mod error;
mod event;
mod item;
mod request;

pub use error::{DomainError, DomainResult};
pub use event::{BoardEvent, ItemRecord, RecordKey};
pub use item::{ApplicantStatus, Item, ItemId, Payload};
pub use request::{PositionUpdate, StatusUpdate};
