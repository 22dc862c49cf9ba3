//! Distance tests against the spawner and the detector
//!
//! Both tests use strict inequalities so a ball sitting exactly on a threshold
//! never triggers either action.

use glam::Vec3;

use super::state::Phase;

/// Result of the drift test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftAction {
    None,
    Respawn,
}

/// Result of the win test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinAction {
    None,
    Win,
}

/// `Respawn` when the ball is strictly farther than `threshold` from the spawner
pub fn test_drift(phase: Phase, ball: Vec3, spawner: Vec3, threshold: f32) -> DriftAction {
    if phase == Phase::Locked {
        return DriftAction::None;
    }
    if ball.distance(spawner) > threshold {
        DriftAction::Respawn
    } else {
        DriftAction::None
    }
}

/// `Win` when the ball is strictly closer than `threshold` to the detector
pub fn test_win(phase: Phase, ball: Vec3, detector: Vec3, threshold: f32) -> WinAction {
    if phase == Phase::Locked {
        return WinAction::None;
    }
    if ball.distance(detector) < threshold {
        WinAction::Win
    } else {
        WinAction::None
    }
}
