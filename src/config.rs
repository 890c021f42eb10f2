//! Board Configuration

use serde::{Deserialize, Serialize};

use crate::allocator::{PositionAllocator, DEFAULT_DECIMALS};
use crate::domain::DomainResult;

/// Tunables for one board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Acting user attached to status writes
    pub actor: Option<String>,
    /// Decimal digits kept for midpoint keys
    pub position_decimals: u32,
    /// Revert drag-over status changes when a drag ends without a target
    pub revert_on_cancel: bool,
    /// Renumber a column when no key fits between two neighbours
    pub rebalance_on_exhaustion: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            actor: None,
            position_decimals: DEFAULT_DECIMALS,
            revert_on_cancel: true,
            rebalance_on_exhaustion: true,
        }
    }
}

impl BoardConfig {
    pub fn from_json_str(raw: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn allocator(&self) -> PositionAllocator {
        PositionAllocator::new(self.position_decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = BoardConfig::from_json_str(r#"{"actor":"recruiter-7"}"#).unwrap();
        assert_eq!(config.actor.as_deref(), Some("recruiter-7"));
        assert_eq!(config.position_decimals, 3);
        assert!(config.revert_on_cancel);
        assert!(config.rebalance_on_exhaustion);
    }

    #[test]
    fn test_bad_json_is_invalid_input() {
        assert!(matches!(
            BoardConfig::from_json_str("{"),
            Err(DomainError::InvalidInput(_))
        ));
    }
}
