//! Tilt Maze - ball reset and win controller for a maze entity
//!
//! Core modules:
//! - `config`: Maze metadata (`userData`) parsing
//! - `maze`: Threshold tests, ball lifecycle and the win/cooldown state machine
//! - `world`: Backend capability surface plus an in-memory implementation
//! - `scheduler`: Single-shot timer queue
//! - `host`: Per-attachment controller registry and event routing
//! - `tuning`: Data-driven thresholds, offsets and ball physics

pub mod config;
pub mod error;
pub mod host;
pub mod maze;
pub mod scheduler;
pub mod tuning;
pub mod world;

pub use config::MazeConfig;
pub use error::{ConfigError, MazeError, TuningError};
pub use host::MazeHost;
pub use maze::{ControllerState, GrabKind, MazeController, MazeEvent, Phase};
pub use scheduler::{ScheduledTask, TimerKind, TimerQueue};
pub use tuning::Tuning;
pub use world::{EntityId, MemoryWorld, World};

/// Default controller constants
pub mod consts {
    /// Ball farther than this from the spawner gets respawned
    pub const BALL_DISTANCE_THRESHOLD: f32 = 1.0;
    /// Ball closer than this to the detector wins
    pub const BALL_DETECTOR_THRESHOLD: f32 = 0.2;

    /// Spawn offsets relative to the maze (local axes)
    pub const BALL_FORWARD_OFFSET: f32 = -0.2;
    pub const BALL_RIGHT_OFFSET: f32 = -0.4;
    pub const BALL_VERTICAL_OFFSET: f32 = 0.02;

    /// Ball physics
    pub const BALL_FRICTION: f32 = 0.7;
    pub const BALL_RESTITUTION: f32 = 0.1;
    pub const BALL_DAMPING: f32 = 0.6;
    pub const BALL_ANGULAR_DAMPING: f32 = 0.2;
    pub const BALL_DENSITY: f32 = 1000.0;
    pub const BALL_GRAVITY: [f32; 3] = [0.0, -9.8, 0.0];
    pub const BALL_DIMENSIONS: [f32; 3] = [0.05, 0.05, 0.05];
    pub const BALL_COLOR: [u8; 3] = [255, 0, 0];

    /// Entity name given to spawned balls
    pub const BALL_NAME: &str = "Hifi Tilt Maze Ball";
    /// Substring that marks an entity as a maze ball
    pub const BALL_NAME_TAG: &str = "Maze Ball";

    /// Radius searched around the observer when destroying the ball
    pub const BALL_SEARCH_RADIUS: f32 = 10.0;

    /// Victory sound
    pub const VICTORY_SOUND_URL: &str =
        "http://hifi-content.s3.amazonaws.com/DomainContent/Home/tiltMaze/levelUp.wav";
    pub const VICTORY_VOLUME: f32 = 0.25;

    /// Lockout after a win before the ball respawns (ms)
    pub const RESPAWN_DELAY_MS: u64 = 1500;
}
