//! Ball lifecycle: resolve, create and destroy the tracked ball
//!
//! The world owns the ball; the controller only keeps its id. At most one ball
//! per maze is live as long as every create is preceded by a destroy of the
//! tracked id.

use glam::Vec3;

use super::spawn::ball_spawn_position;
use super::state::ControllerState;
use crate::config::MazeConfig;
use crate::error::MazeError;
use crate::tuning::Tuning;
use crate::world::{EntityId, World};

/// Spawn a fresh ball next to the maze and start tracking it.
///
/// Returns `Ok(None)` without touching the world while locked.
pub fn create_ball<W: World + ?Sized>(
    world: &mut W,
    maze: &EntityId,
    state: &mut ControllerState,
    tuning: &Tuning,
) -> Result<Option<EntityId>, MazeError> {
    if state.is_locked() {
        return Ok(None);
    }

    let maze_position = world
        .position(maze)
        .ok_or_else(|| MazeError::missing(maze, "maze"))?;
    let maze_rotation = world
        .rotation(maze)
        .ok_or_else(|| MazeError::missing(maze, "maze"))?;

    let position = ball_spawn_position(maze_position, maze_rotation, &tuning.spawn_offsets);
    log::debug!("Ball start location for maze {}: {:?}", maze, position);

    let id = world.add_entity(tuning.ball.to_entity(position));
    log::info!("Spawned maze ball {} for maze {}", id, maze);
    state.ball = Some(id.clone());
    Ok(Some(id))
}

/// Delete the tracked ball if it is found near the observer.
///
/// Only entities within `tuning.search_radius` of the observer are considered,
/// not entities near the maze: a tracked ball outside that radius survives.
/// Returns the number of entities deleted (0 or 1); no match is a no-op.
pub fn destroy_ball<W: World + ?Sized>(world: &mut W, state: &ControllerState, tuning: &Tuning) -> usize {
    let Some(tracked) = state.ball.as_ref() else {
        return 0;
    };

    let matches: Vec<EntityId> = world
        .find_entities(world.observer_position(), tuning.search_radius)
        .into_iter()
        .filter(|id| id == tracked)
        .filter(|id| {
            world
                .name(id)
                .is_some_and(|name| name.contains(&tuning.ball.name_tag))
        })
        .collect();

    for id in &matches {
        log::debug!("Deleting maze ball {}", id);
        world.delete_entity(id);
    }
    matches.len()
}

/// Position of the tracked ball, adopting `config.first_ball_id` if none is tracked yet
pub fn resolve_ball<W: World + ?Sized>(
    world: &W,
    state: &mut ControllerState,
    config: &MazeConfig,
) -> Result<Vec3, MazeError> {
    let ball = state
        .ball
        .get_or_insert_with(|| config.first_ball_id.clone());
    world
        .position(ball)
        .ok_or_else(|| MazeError::missing(ball, "ball"))
}
