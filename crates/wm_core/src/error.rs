use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::types::Side;

/// Recoverable problems found in one cycle's observation.
///
/// None of these abort snapshot construction: the offending entity is
/// dropped and the error is kept on the snapshot as a diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObservationError {
    #[error("uniform number {unum} out of range 1..=11 (side {side:?})")]
    UnumOutOfRange { side: Side, unum: u8 },

    #[error("player observation without an assigned side (unum {unum:?})")]
    UnassignedSide { unum: Option<u8> },

    #[error("duplicate identity {side:?} #{unum} in one observation")]
    DuplicateIdentity { side: Side, unum: u8 },
}

impl ObservationError {
    /// Identity fields of the dropped entity, for log correlation.
    pub fn identity(&self) -> (Option<Side>, Option<u8>) {
        match self {
            ObservationError::UnumOutOfRange { side, unum } => (Some(*side), Some(*unum)),
            ObservationError::UnassignedSide { unum } => (None, *unum),
            ObservationError::DuplicateIdentity { side, unum } => (Some(*side), Some(*unum)),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown config profile: {0}")]
    UnknownProfile(String),

    #[error("Unsupported config format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("Failed to parse scenario {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Unsupported scenario format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Scenario config: {0}")]
    Config(#[from] ConfigError),
}
