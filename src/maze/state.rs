//! Controller state and event types

use serde::{Deserialize, Serialize};

use crate::world::EntityId;

/// Win/cooldown phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Drift and win checks are live
    #[default]
    Idle,
    /// Between a win and the respawn timer; every check is a no-op
    Locked,
}

/// Per-attachment controller state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControllerState {
    /// Ball currently tracked (not owned). `None` until first resolved.
    pub ball: Option<EntityId>,
    pub phase: Phase,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.phase == Phase::Locked
    }
}

/// How the player is holding the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrabKind {
    Near,
    Far,
}

/// Interaction events delivered by the external interaction system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeEvent {
    /// Grab started (accepted, no effect)
    StartGrab(GrabKind),
    /// Grab continuing this frame
    ContinueGrab(GrabKind),
    /// Grab released
    ReleaseGrab,
}
