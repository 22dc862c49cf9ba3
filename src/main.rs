//! Tilt Maze entry point
//!
//! Runs a scripted session against the in-memory world: the ball drifts off,
//! gets respawned, then reaches the detector and respawns after the lockout.
//!
//! Usage: `tilt-maze [tuning.json]` (set `RUST_LOG=debug` for the full trace)

use glam::{Quat, Vec3};

use tilt_maze::config::user_data_for;
use tilt_maze::maze::{GrabKind, MazeEvent, ball_spawn_position};
use tilt_maze::world::NewEntity;
use tilt_maze::{EntityId, MazeHost, MemoryWorld, Tuning, World};

/// Simulated frame length for the timer clock (ms)
const FRAME_MS: u64 = 100;

fn main() {
    env_logger::init();
    log::info!("Tilt Maze (native) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let seed = 0x7117_3a2e;
    let mut world = MemoryWorld::new(seed);
    let maze_origin = Vec3::new(0.0, 1.0, -1.0);
    let maze_rotation = Quat::from_rotation_y(0.3);
    let spawn = ball_spawn_position(maze_origin, maze_rotation, &tuning.spawn_offsets);

    let spawner = world.insert(NewEntity {
        name: "Tilt Maze Spawner".to_string(),
        position: spawn,
        collisionless: true,
        ..Default::default()
    });
    let detector = world.insert(NewEntity {
        name: "Tilt Maze Detector".to_string(),
        position: maze_origin + Vec3::new(0.35, 0.02, -0.15),
        collisionless: true,
        ..Default::default()
    });
    let first_ball = world.insert(tuning.ball.to_entity(spawn));
    let maze = world.insert(NewEntity {
        name: "Tilt Maze".to_string(),
        position: maze_origin,
        rotation: maze_rotation,
        user_data: Some(user_data_for(&spawner, &detector, &first_ball)),
        ..Default::default()
    });
    world.set_observer_position(maze_origin + Vec3::new(0.0, 0.6, 0.8));

    let mut host = MazeHost::new(tuning);
    host.attach(&mut world, maze.clone());

    // Ball rolls off the edge while the player tilts the maze
    world.set_position(&first_ball, spawn + Vec3::new(0.0, -1.4, 0.3));
    host.dispatch(&mut world, &maze, MazeEvent::ContinueGrab(GrabKind::Near));
    report(&world, &host, &maze, "after drift");

    // Player steers the new ball into the detector from a distance
    let ball = tracked_ball(&host, &maze);
    if let (Some(ball), Some(target)) = (ball, world.position(&detector)) {
        world.set_position(&ball, target);
    }
    host.dispatch(&mut world, &maze, MazeEvent::ContinueGrab(GrabKind::Far));
    report(&world, &host, &maze, "after win");

    // Grabs during the lockout are absorbed
    host.dispatch(&mut world, &maze, MazeEvent::ReleaseGrab);

    while !world.timers().is_empty() {
        let fired = world.advance(FRAME_MS);
        host.fire_all(&mut world, fired);
    }
    report(&world, &host, &maze, "after lockout");

    log::info!(
        "Session done: {} created, {} deleted, {} sounds played",
        world.created.len(),
        world.deleted.len(),
        world.played.len()
    );
}

fn tracked_ball(host: &MazeHost, maze: &EntityId) -> Option<EntityId> {
    host.controller(maze).and_then(|c| c.state().ball.clone())
}

fn report(world: &MemoryWorld, host: &MazeHost, maze: &EntityId, label: &str) {
    let Some(controller) = host.controller(maze) else {
        log::warn!("{}: maze {} not attached", label, maze);
        return;
    };
    let state = controller.state();
    let position = state.ball.as_ref().and_then(|b| world.position(b));
    println!(
        "{:<14} phase={:?} ball={} position={:?} live_balls={}",
        label,
        state.phase,
        state
            .ball
            .as_ref()
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string()),
        position,
        world.entities_tagged(&host.tuning().ball.name_tag).len()
    );
}
