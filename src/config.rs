//! Maze configuration parsed from the maze entity's `userData`
//!
//! Layout:
//!
//! ```json
//! { "tiltMaze": { "ballSpawner": "{...}", "detector": "{...}", "firstBall": "{...}" } }
//! ```
//!
//! Parsed fresh for every query; the blob can be edited externally at any time.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::world::{EntityId, World};

/// Namespace key inside `userData`
pub const USER_DATA_NAMESPACE: &str = "tiltMaze";

/// Entity references the controller works against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeConfig {
    /// Anchor the ball must stay near
    pub spawner_id: EntityId,
    /// Win zone
    pub detector_id: EntityId,
    /// Ball placed in the scene before any respawn
    pub first_ball_id: EntityId,
}

#[derive(Deserialize)]
struct UserData {
    #[serde(rename = "tiltMaze")]
    tilt_maze: Option<RawMazeSection>,
}

#[derive(Deserialize)]
struct RawMazeSection {
    #[serde(rename = "ballSpawner")]
    ball_spawner: Option<String>,
    detector: Option<String>,
    #[serde(rename = "firstBall")]
    first_ball: Option<String>,
}

fn required(value: Option<String>, field: &'static str) -> Result<EntityId, ConfigError> {
    match value {
        Some(id) if !id.trim().is_empty() => Ok(EntityId::new(id)),
        _ => Err(ConfigError::MissingField(field)),
    }
}

impl MazeConfig {
    /// Parse a `userData` blob
    pub fn from_user_data(user_data: &str) -> Result<Self, ConfigError> {
        let data: UserData = serde_json::from_str(user_data)?;
        let section = data
            .tilt_maze
            .ok_or(ConfigError::MissingNamespace(USER_DATA_NAMESPACE))?;

        Ok(Self {
            spawner_id: required(section.ball_spawner, "ballSpawner")?,
            detector_id: required(section.detector, "detector")?,
            first_ball_id: required(section.first_ball, "firstBall")?,
        })
    }
}

/// Read and parse the current `userData` of `maze`
pub fn load_config<W: World + ?Sized>(world: &W, maze: &EntityId) -> Result<MazeConfig, ConfigError> {
    let user_data = world
        .user_data(maze)
        .ok_or(ConfigError::MissingUserData)?;
    MazeConfig::from_user_data(&user_data)
}

/// Build a `userData` blob for the given references
pub fn user_data_for(spawner: &EntityId, detector: &EntityId, first_ball: &EntityId) -> String {
    serde_json::json!({
        "tiltMaze": {
            "ballSpawner": spawner,
            "detector": detector,
            "firstBall": first_ball,
        }
    })
    .to_string()
}
