//! Error types for metadata parsing, world lookups and tuning files

use thiserror::Error;

use crate::world::EntityId;

/// Failure to turn the maze `userData` into a [`crate::MazeConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("maze has no userData")]
    MissingUserData,

    #[error("invalid JSON in maze userData: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("userData has no `{0}` section")]
    MissingNamespace(&'static str),

    #[error("userData is missing `{0}`")]
    MissingField(&'static str),
}

/// Errors raised while handling a single controller event
#[derive(Error, Debug)]
pub enum MazeError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("{what} {id} does not resolve in the world")]
    MissingReference { id: EntityId, what: &'static str },
}

impl MazeError {
    /// Every controller error aborts only the current event; the next one retries.
    pub fn is_recoverable(&self) -> bool {
        match self {
            MazeError::Config(_) => true,
            MazeError::MissingReference { .. } => true,
        }
    }

    pub(crate) fn missing(id: &EntityId, what: &'static str) -> Self {
        MazeError::MissingReference {
            id: id.clone(),
            what,
        }
    }
}

/// Errors loading or validating a tuning file
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid tuning: {0}")]
    Invalid(String),
}
