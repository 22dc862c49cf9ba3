//! Pure win/cooldown transition function
//!
//! `transition` maps the current state and one evaluated signal to the next
//! state plus the world commands to run, in order. It never touches the world,
//! so timer callbacks carry nothing but the maze id and re-enter here on fire.

use super::state::{ControllerState, Phase};
use super::threshold::{DriftAction, WinAction};

/// Input to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Drift(DriftAction),
    Win(WinAction),
    /// Post-win respawn timer fired
    RespawnTimer,
}

/// World command requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    DestroyBall,
    CreateBall,
    PlayVictorySound,
    ScheduleRespawn { delay_ms: u64 },
}

/// Next state plus commands to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: ControllerState,
    pub commands: Vec<Command>,
}

impl Step {
    fn stay(state: &ControllerState) -> Self {
        Self {
            state: state.clone(),
            commands: Vec::new(),
        }
    }
}

/// Advance the state machine by one signal
pub fn transition(state: &ControllerState, signal: Signal, respawn_delay_ms: u64) -> Step {
    match (state.phase, signal) {
        (Phase::Idle, Signal::Drift(DriftAction::Respawn)) => Step {
            state: state.clone(),
            commands: vec![Command::DestroyBall, Command::CreateBall],
        },
        (Phase::Idle, Signal::Win(WinAction::Win)) => Step {
            state: ControllerState {
                phase: Phase::Locked,
                ..state.clone()
            },
            commands: vec![
                Command::DestroyBall,
                Command::PlayVictorySound,
                Command::ScheduleRespawn {
                    delay_ms: respawn_delay_ms,
                },
            ],
        },
        (Phase::Locked, Signal::RespawnTimer) => Step {
            state: ControllerState {
                phase: Phase::Idle,
                ..state.clone()
            },
            commands: vec![Command::CreateBall],
        },
        // Locked absorbs everything but its timer; Idle ignores stray timers
        _ => Step::stay(state),
    }
}
