//! Maze behavior
//!
//! Decision logic only. Physics, input detection and presentation belong to the
//! world backend; this module reads positions and issues commands:
//! - Spawn pose derived from the maze transform
//! - Strict-inequality drift and win tests
//! - Ball lifecycle (resolve, create, destroy)
//! - Idle/Locked state machine with a pure transition function

pub mod ball;
pub mod controller;
pub mod spawn;
pub mod state;
pub mod threshold;
pub mod transition;

pub use ball::{create_ball, destroy_ball, resolve_ball};
pub use controller::MazeController;
pub use spawn::ball_spawn_position;
pub use state::{ControllerState, GrabKind, MazeEvent, Phase};
pub use threshold::{DriftAction, WinAction, test_drift, test_win};
pub use transition::{Command, Signal, Step, transition};
