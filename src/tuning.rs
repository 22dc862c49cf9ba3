//! Data-driven controller tuning
//!
//! Every field defaults to the constants in [`crate::consts`]; a JSON file only
//! needs the keys it overrides.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;
use crate::world::{Color, EntityKind, NewEntity};

/// Local-axis offsets from the maze origin to the ball spawn point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnOffsets {
    /// Along the maze's front axis
    pub forward: f32,
    /// Along the maze's right axis
    pub right: f32,
    /// Along world up (not rotated)
    pub vertical: f32,
}

impl Default for SpawnOffsets {
    fn default() -> Self {
        Self {
            forward: BALL_FORWARD_OFFSET,
            right: BALL_RIGHT_OFFSET,
            vertical: BALL_VERTICAL_OFFSET,
        }
    }
}

/// Physical parameters of a spawned ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    pub name: String,
    /// Substring identifying maze balls during cleanup
    pub name_tag: String,
    pub friction: f32,
    pub restitution: f32,
    pub damping: f32,
    pub angular_damping: f32,
    pub density: f32,
    pub gravity: Vec3,
    pub dimensions: Vec3,
    pub color: Color,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            name: BALL_NAME.to_string(),
            name_tag: BALL_NAME_TAG.to_string(),
            friction: BALL_FRICTION,
            restitution: BALL_RESTITUTION,
            damping: BALL_DAMPING,
            angular_damping: BALL_ANGULAR_DAMPING,
            density: BALL_DENSITY,
            gravity: Vec3::from_array(BALL_GRAVITY),
            dimensions: Vec3::from_array(BALL_DIMENSIONS),
            color: Color::from(BALL_COLOR),
        }
    }
}

impl BallTuning {
    /// Creation command for a dynamic, collidable ball at `position`
    pub fn to_entity(&self, position: Vec3) -> NewEntity {
        NewEntity {
            name: self.name.clone(),
            kind: EntityKind::Sphere,
            position,
            dimensions: self.dimensions,
            color: self.color,
            dynamic: true,
            collisionless: false,
            friction: self.friction,
            restitution: self.restitution,
            damping: self.damping,
            angular_damping: self.angular_damping,
            density: self.density,
            gravity: self.gravity,
            ..Default::default()
        }
    }
}

/// All controller tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Respawn when the ball is farther than this from the spawner
    pub drift_threshold: f32,
    /// Win when the ball is closer than this to the detector
    pub detector_threshold: f32,
    pub spawn_offsets: SpawnOffsets,
    pub ball: BallTuning,
    /// Radius searched around the observer when deleting the ball
    pub search_radius: f32,
    pub victory_sound_url: String,
    /// Victory sound volume (0.0 - 1.0)
    pub victory_volume: f32,
    /// Lockout after a win (ms)
    pub respawn_delay_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            drift_threshold: BALL_DISTANCE_THRESHOLD,
            detector_threshold: BALL_DETECTOR_THRESHOLD,
            spawn_offsets: SpawnOffsets::default(),
            ball: BallTuning::default(),
            search_radius: BALL_SEARCH_RADIUS,
            victory_sound_url: VICTORY_SOUND_URL.to_string(),
            victory_volume: VICTORY_VOLUME,
            respawn_delay_ms: RESPAWN_DELAY_MS,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check the invariants the controller relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("drift_threshold", self.drift_threshold)?;
        positive("detector_threshold", self.detector_threshold)?;
        if self.detector_threshold >= self.drift_threshold {
            return Err(TuningError::Invalid(format!(
                "detector_threshold ({}) must be smaller than drift_threshold ({})",
                self.detector_threshold, self.drift_threshold
            )));
        }
        positive("search_radius", self.search_radius)?;
        if !(0.0..=1.0).contains(&self.victory_volume) {
            return Err(TuningError::Invalid(format!(
                "victory_volume must be within 0.0 - 1.0, got {}",
                self.victory_volume
            )));
        }
        if self.ball.name_tag.is_empty() || !self.ball.name.contains(&self.ball.name_tag) {
            return Err(TuningError::Invalid(format!(
                "ball name {:?} must contain name_tag {:?}",
                self.ball.name, self.ball.name_tag
            )));
        }
        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid(format!(
            "{field} must be positive, got {value}"
        )))
    }
}
