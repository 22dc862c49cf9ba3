//! Ball spawn pose
//!
//! Derived from the maze transform every time; never stored.

use glam::{Quat, Vec3};

use crate::tuning::SpawnOffsets;

/// Maze right axis (+X under identity)
#[inline]
pub fn right(rotation: Quat) -> Vec3 {
    rotation * Vec3::X
}

/// Maze front axis (-Z under identity)
#[inline]
pub fn front(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_Z
}

/// Spawn position: maze origin plus vertical offset along world up and the
/// right/forward offsets along the maze's rotated axes.
pub fn ball_spawn_position(maze_position: Vec3, maze_rotation: Quat, offsets: &SpawnOffsets) -> Vec3 {
    let vertical = Vec3::Y * offsets.vertical;
    let lateral = right(maze_rotation) * offsets.right + front(maze_rotation) * offsets.forward;
    maze_position + vertical + lateral
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_identity_pose() {
        let pos = ball_spawn_position(Vec3::ZERO, Quat::IDENTITY, &SpawnOffsets::default());
        assert!(approx(pos, Vec3::new(-0.4, 0.02, 0.2)), "got {pos:?}");
    }

    #[test]
    fn test_pose_follows_maze_position() {
        let origin = Vec3::new(10.0, 1.0, -3.0);
        let pos = ball_spawn_position(origin, Quat::IDENTITY, &SpawnOffsets::default());
        assert!(approx(pos - origin, Vec3::new(-0.4, 0.02, 0.2)));
    }

    #[test]
    fn test_pose_follows_maze_yaw() {
        // Quarter turn about +Y: right becomes -Z, front becomes -X
        let rot = Quat::from_rotation_y(FRAC_PI_2);
        assert!(approx(right(rot), Vec3::NEG_Z));
        assert!(approx(front(rot), Vec3::NEG_X));

        let pos = ball_spawn_position(Vec3::ZERO, rot, &SpawnOffsets::default());
        assert!(approx(pos, Vec3::new(0.2, 0.02, 0.4)), "got {pos:?}");
    }

    #[test]
    fn test_vertical_offset_ignores_tilt() {
        let offsets = SpawnOffsets {
            forward: 0.0,
            right: 0.0,
            vertical: 0.5,
        };
        let tilted = Quat::from_rotation_x(0.7);
        let pos = ball_spawn_position(Vec3::ZERO, tilted, &offsets);
        assert!(approx(pos, Vec3::new(0.0, 0.5, 0.0)));
    }
}
