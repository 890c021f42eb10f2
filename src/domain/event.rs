//! Realtime Events
//!
//! Inbound notifications about cards changed by other clients.

use serde::{Deserialize, Serialize};

use super::error::DomainResult;
use super::item::{ApplicantStatus, Item, ItemId, Payload};

/// A card as delivered by the event source or the enrichment step.
///
/// Only `id` is guaranteed. Update records may omit `status`, and `position`
/// is only present on records that carry an ordering decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicantStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    #[serde(flatten)]
    pub payload: Payload,
}

impl ItemRecord {
    pub fn new(id: impl Into<ItemId>, status: ApplicantStatus) -> Self {
        Self {
            id: id.into(),
            status: Some(status),
            position: None,
            payload: Payload::new(),
        }
    }

    /// Materialize the record at `position`. A position carried by the
    /// record is ignored; new cards always take the key they are given.
    pub fn into_item(self, position: f64) -> Item {
        Item {
            id: self.id,
            status: self.status.unwrap_or_default(),
            position,
            payload: self.payload,
        }
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            status: Some(item.status),
            position: Some(item.position),
            payload: item.payload,
        }
    }
}

/// Minimal record shape for deletions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordKey {
    pub id: ItemId,
}

/// Create/update/delete notification for one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", try_from = "WireEvent")]
pub enum BoardEvent {
    Created {
        record: ItemRecord,
    },
    Updated {
        record: ItemRecord,
        /// Prior field values as reported by the source, opaque to the core
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous: Option<Payload>,
    },
    Deleted {
        record: RecordKey,
    },
}

/// Unvalidated wire shape; created records must name their column
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireEvent {
    Created {
        record: ItemRecord,
    },
    Updated {
        record: ItemRecord,
        #[serde(default)]
        previous: Option<Payload>,
    },
    Deleted {
        record: RecordKey,
    },
}

impl TryFrom<WireEvent> for BoardEvent {
    type Error = String;

    fn try_from(wire: WireEvent) -> Result<Self, Self::Error> {
        Ok(match wire {
            WireEvent::Created { record } => {
                if record.status.is_none() {
                    return Err(format!("created record {} has no status", record.id));
                }
                BoardEvent::Created { record }
            }
            WireEvent::Updated { record, previous } => BoardEvent::Updated { record, previous },
            WireEvent::Deleted { record } => BoardEvent::Deleted { record },
        })
    }
}

impl BoardEvent {
    /// Parse one event from its JSON wire form
    pub fn from_json(raw: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Id of the card the event is about
    pub fn item_id(&self) -> &str {
        match self {
            BoardEvent::Created { record } | BoardEvent::Updated { record, .. } => &record.id,
            BoardEvent::Deleted { record } => &record.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BoardEvent::Created { .. } => "created",
            BoardEvent::Updated { .. } => "updated",
            BoardEvent::Deleted { .. } => "deleted",
        }
    }
}
