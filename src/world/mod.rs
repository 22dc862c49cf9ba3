//! World backend abstraction
//!
//! The controller never simulates physics itself. It reads entity properties,
//! issues create/delete commands, plays sounds and schedules timers through the
//! [`World`] trait. `memory` provides an in-process implementation.

pub mod memory;

pub use memory::MemoryWorld;

use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::scheduler::ScheduledTask;

/// Opaque identifier of a world entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a sound resource loaded by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundHandle(pub u32);

/// Entity shapes understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntityKind {
    #[default]
    Box,
    Sphere,
    Model,
    Text,
    Zone,
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl From<[u8; 3]> for Color {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self { red, green, blue }
    }
}

/// Properties for an entity creation command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntity {
    pub name: String,
    pub kind: EntityKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub dimensions: Vec3,
    pub color: Color,
    pub dynamic: bool,
    pub collisionless: bool,
    pub friction: f32,
    pub restitution: f32,
    pub damping: f32,
    pub angular_damping: f32,
    pub density: f32,
    pub gravity: Vec3,
    /// Raw metadata blob, if any
    pub user_data: Option<String>,
}

impl Default for NewEntity {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: EntityKind::Box,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            dimensions: Vec3::splat(0.1),
            color: Color::from([255, 255, 255]),
            dynamic: false,
            collisionless: false,
            friction: 0.5,
            restitution: 0.5,
            damping: 0.39,
            angular_damping: 0.39,
            density: 1000.0,
            gravity: Vec3::ZERO,
            user_data: None,
        }
    }
}

/// Playback options for a positional sound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioOptions {
    pub position: Vec3,
    pub volume: f32,
}

/// Capabilities the maze controller needs from the world.
///
/// Property reads return `None` when the entity does not exist (or has no value
/// for the field). Calls are independent; nothing is transactional across them.
pub trait World {
    fn position(&self, id: &EntityId) -> Option<Vec3>;
    fn rotation(&self, id: &EntityId) -> Option<Quat>;
    fn name(&self, id: &EntityId) -> Option<String>;
    fn user_data(&self, id: &EntityId) -> Option<String>;

    fn add_entity(&mut self, entity: NewEntity) -> EntityId;
    fn delete_entity(&mut self, id: &EntityId);

    /// Entities whose position lies within `radius` of `center`
    fn find_entities(&self, center: Vec3, radius: f32) -> Vec<EntityId>;

    /// Position of the local observer (avatar)
    fn observer_position(&self) -> Vec3;

    fn load_sound(&mut self, url: &str) -> SoundHandle;
    fn play_sound(&mut self, sound: SoundHandle, options: AudioOptions);

    /// Single-shot timer. Fired tasks are delivered back through the host.
    fn schedule_after(&mut self, delay_ms: u64, task: ScheduledTask);
}
