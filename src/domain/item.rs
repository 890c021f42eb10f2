//! Item Entity
//!
//! An applicant card: a stable id, the stage column it sits in, a fractional
//! sort key within that column, and an opaque payload the core never reads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Card identifier as issued by the store.
pub type ItemId = String;

/// Free-form fields riding along with a card (name, email, enrichment data).
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Stage column an applicant sits in
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantStatus {
    /// Application received, not yet screened
    #[default]
    Submitted,
    /// Documents checked
    Verified,
    /// Accepted
    Passed,
    /// Declined at any stage
    Rejected,
}

impl ApplicantStatus {
    /// Every stage, in board column order.
    pub const ALL: [ApplicantStatus; 4] = [
        ApplicantStatus::Submitted,
        ApplicantStatus::Verified,
        ApplicantStatus::Passed,
        ApplicantStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicantStatus::Submitted => "submitted",
            ApplicantStatus::Verified => "verified",
            ApplicantStatus::Passed => "passed",
            ApplicantStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicantStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(ApplicantStatus::Submitted),
            "verified" => Ok(ApplicantStatus::Verified),
            "passed" => Ok(ApplicantStatus::Passed),
            "rejected" => Ok(ApplicantStatus::Rejected),
            other => Err(DomainError::InvalidInput(format!(
                "unknown applicant status '{}'",
                other
            ))),
        }
    }
}

/// An applicant card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, never changes
    pub id: ItemId,
    /// Column the card sits in
    pub status: ApplicantStatus,
    /// Sort key within the column (ascending)
    pub position: f64,
    /// Everything else, passed through untouched
    #[serde(flatten)]
    pub payload: Payload,
}

impl Item {
    /// Create a card with an empty payload
    pub fn new(id: impl Into<ItemId>, status: ApplicantStatus, position: f64) -> Self {
        Self {
            id: id.into(),
            status,
            position,
            payload: Payload::new(),
        }
    }

    /// Attach one payload field
    pub fn with_field(mut self, key: &str, value: serde_json::Value) -> Self {
        self.payload.insert(key.to_string(), value);
        self
    }
}
