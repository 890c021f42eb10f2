//! Outbound persistence requests.

use serde::{Deserialize, Serialize};

use super::item::{ApplicantStatus, ItemId};

/// Status write issued when a card lands in another column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub id: ItemId,
    pub new_status: ApplicantStatus,
    pub previous_status: ApplicantStatus,
    /// Acting user, when the session supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Position write issued after a reorder or a committed status change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: ItemId,
    pub position: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_update_wire_shape() {
        let update = StatusUpdate {
            id: "1".to_string(),
            new_status: ApplicantStatus::Verified,
            previous_status: ApplicantStatus::Submitted,
            updated_by: None,
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"id": "1", "newStatus": "verified", "previousStatus": "submitted"})
        );
    }
}
