//! Host configuration: board settings, logging and the store to talk to.

use std::path::{Path, PathBuf};

use applicant_board::BoardConfig;
use serde::{Deserialize, Serialize};

use crate::error::{HostError, HostResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PersistenceConfig {
    Sqlite { path: PathBuf },
    Http { base_url: String },
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        PersistenceConfig::Sqlite {
            path: PathBuf::from("applicants.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub board: BoardConfig,
    pub log_dir: PathBuf,
    pub app_name: String,
    pub log_level: String,
    pub persistence: PersistenceConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            log_dir: PathBuf::from("logs"),
            app_name: "applicant-board".to_string(),
            log_level: "info".to_string(),
            persistence: PersistenceConfig::default(),
        }
    }
}

impl HostConfig {
    pub fn from_json_str(raw: &str) -> HostResult<Self> {
        serde_json::from_str(raw).map_err(|e| HostError::Config(e.to_string()))
    }

    /// No path means defaults
    pub fn load(path: Option<&Path>) -> HostResult<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    HostError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_json_str(&raw)
            }
            None => Ok(Self::default()),
        }
    }
}
