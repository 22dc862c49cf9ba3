//! Per-attachment maze controller
//!
//! Reacts to grab events and respawn timers. Every entry point checks the lock
//! first, re-reads the maze config, evaluates thresholds against fresh
//! positions and runs the commands produced by [`transition`]. Failures abort
//! only the current event and are logged; the next event starts from scratch.

use super::ball::{create_ball, destroy_ball, resolve_ball};
use super::state::{ControllerState, GrabKind, MazeEvent};
use super::threshold::{DriftAction, WinAction, test_drift, test_win};
use super::transition::{Command, Signal, transition};
use crate::config::load_config;
use crate::error::MazeError;
use crate::scheduler::{ScheduledTask, TimerKind};
use crate::tuning::Tuning;
use crate::world::{AudioOptions, EntityId, SoundHandle, World};

/// Behavior attached to one maze entity
#[derive(Debug, Clone)]
pub struct MazeController {
    maze: EntityId,
    attachment: u64,
    state: ControllerState,
    victory_sound: SoundHandle,
    tuning: Tuning,
}

impl MazeController {
    /// Attach to `maze`, loading the victory sound once
    pub fn attach<W: World + ?Sized>(
        world: &mut W,
        maze: EntityId,
        attachment: u64,
        tuning: Tuning,
    ) -> Self {
        let victory_sound = world.load_sound(&tuning.victory_sound_url);
        log::info!("Maze controller attached to {} (attachment {})", maze, attachment);
        Self {
            maze,
            attachment,
            state: ControllerState::new(),
            victory_sound,
            tuning,
        }
    }

    pub fn maze(&self) -> &EntityId {
        &self.maze
    }

    pub fn attachment(&self) -> u64 {
        self.attachment
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Handle an interaction event, logging any failure
    pub fn handle<W: World + ?Sized>(&mut self, world: &mut W, event: MazeEvent) {
        if let Err(e) = self.try_handle(world, event) {
            log::warn!("Maze {}: {:?} aborted: {}", self.maze, event, e);
        }
    }

    /// Handle an interaction event.
    ///
    /// Near-grab continuation and release only test drift; far-grab continuation
    /// tests drift, then win.
    pub fn try_handle<W: World + ?Sized>(
        &mut self,
        world: &mut W,
        event: MazeEvent,
    ) -> Result<(), MazeError> {
        if self.state.is_locked() {
            log::trace!("Maze {} locked, ignoring {:?}", self.maze, event);
            return Ok(());
        }

        match event {
            MazeEvent::StartGrab(_) => Ok(()),
            MazeEvent::ContinueGrab(GrabKind::Near) => self.check_drift(world),
            MazeEvent::ContinueGrab(GrabKind::Far) => {
                self.check_drift(world)?;
                self.check_win(world)
            }
            MazeEvent::ReleaseGrab => self.check_drift(world),
        }
    }

    /// Handle a fired timer, logging any failure
    pub fn on_timer<W: World + ?Sized>(&mut self, world: &mut W, task: &ScheduledTask) {
        if let Err(e) = self.try_on_timer(world, task) {
            log::warn!("Maze {}: timer {:?} aborted: {}", self.maze, task.kind, e);
        }
    }

    pub fn try_on_timer<W: World + ?Sized>(
        &mut self,
        world: &mut W,
        task: &ScheduledTask,
    ) -> Result<(), MazeError> {
        match task.kind {
            TimerKind::Respawn => {
                if !self.state.is_locked() {
                    log::debug!("Maze {}: respawn timer fired while idle", self.maze);
                }
                self.apply(world, Signal::RespawnTimer)
            }
        }
    }

    fn check_drift<W: World + ?Sized>(&mut self, world: &mut W) -> Result<(), MazeError> {
        if self.state.is_locked() {
            return Ok(());
        }
        let config = load_config(&*world, &self.maze)?;
        let ball = resolve_ball(&*world, &mut self.state, &config)?;
        let spawner = world
            .position(&config.spawner_id)
            .ok_or_else(|| MazeError::missing(&config.spawner_id, "spawner"))?;

        let action = test_drift(self.state.phase, ball, spawner, self.tuning.drift_threshold);
        if action == DriftAction::Respawn {
            log::info!(
                "Maze {}: ball {:.3} from spawner, making a new one",
                self.maze,
                ball.distance(spawner)
            );
        }
        self.apply(world, Signal::Drift(action))
    }

    fn check_win<W: World + ?Sized>(&mut self, world: &mut W) -> Result<(), MazeError> {
        if self.state.is_locked() {
            return Ok(());
        }
        let config = load_config(&*world, &self.maze)?;
        let ball = resolve_ball(&*world, &mut self.state, &config)?;
        let detector = world
            .position(&config.detector_id)
            .ok_or_else(|| MazeError::missing(&config.detector_id, "detector"))?;

        log::debug!(
            "Maze {}: separation from win {:.3}",
            self.maze,
            ball.distance(detector)
        );
        let action = test_win(self.state.phase, ball, detector, self.tuning.detector_threshold);
        if action == WinAction::Win {
            log::info!("Maze {}: ball reached the detector", self.maze);
        }
        self.apply(world, Signal::Win(action))
    }

    fn apply<W: World + ?Sized>(&mut self, world: &mut W, signal: Signal) -> Result<(), MazeError> {
        let step = transition(&self.state, signal, self.tuning.respawn_delay_ms);
        self.state = step.state;
        for command in step.commands {
            self.execute(world, command)?;
        }
        Ok(())
    }

    fn execute<W: World + ?Sized>(&mut self, world: &mut W, command: Command) -> Result<(), MazeError> {
        match command {
            Command::DestroyBall => {
                destroy_ball(world, &self.state, &self.tuning);
            }
            Command::CreateBall => {
                create_ball(world, &self.maze, &mut self.state, &self.tuning)?;
            }
            Command::PlayVictorySound => match world.position(&self.maze) {
                Some(position) => world.play_sound(
                    self.victory_sound,
                    AudioOptions {
                        position,
                        volume: self.tuning.victory_volume,
                    },
                ),
                // Never block the respawn timer on a missing sound position
                None => log::warn!("Maze {}: no position for victory sound", self.maze),
            },
            Command::ScheduleRespawn { delay_ms } => {
                world.schedule_after(delay_ms, ScheduledTask::respawn(self.maze.clone(), self.attachment));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::user_data_for;
    use crate::maze::state::Phase;
    use crate::world::{MemoryWorld, NewEntity};
    use glam::Vec3;

    struct Scene {
        world: MemoryWorld,
        maze: EntityId,
        spawner: EntityId,
        detector: EntityId,
        first_ball: EntityId,
    }

    /// Maze at the origin, spawner on the spawn point, detector 3 units away
    fn scene() -> Scene {
        let mut world = MemoryWorld::new(42);
        let tuning = Tuning::default();
        let spawn = Vec3::new(-0.4, 0.02, 0.2);

        let spawner = world.insert(NewEntity {
            name: "Tilt Maze Spawner".to_string(),
            position: spawn,
            collisionless: true,
            ..Default::default()
        });
        let detector = world.insert(NewEntity {
            name: "Tilt Maze Detector".to_string(),
            position: Vec3::new(3.0, 0.0, 0.0),
            collisionless: true,
            ..Default::default()
        });
        let first_ball = world.insert(tuning.ball.to_entity(spawn));
        let maze = world.insert(NewEntity {
            name: "Tilt Maze".to_string(),
            user_data: Some(user_data_for(&spawner, &detector, &first_ball)),
            ..Default::default()
        });

        Scene {
            world,
            maze,
            spawner,
            detector,
            first_ball,
        }
    }

    fn attach(scene: &mut Scene) -> MazeController {
        MazeController::attach(&mut scene.world, scene.maze.clone(), 1, Tuning::default())
    }

    fn live_balls(scene: &Scene) -> usize {
        scene.world.entities_tagged("Maze Ball").len()
    }

    #[test]
    fn test_attach_loads_sound_and_starts_idle() {
        let mut scene = scene();
        let controller = attach(&mut scene);
        assert_eq!(controller.state(), &ControllerState::new());
        assert_eq!(controller.maze(), &scene.maze);
        assert_eq!(controller.attachment(), 1);
    }

    #[test]
    fn test_in_bounds_ball_is_left_alone() {
        let mut scene = scene();
        let mut controller = attach(&mut scene);

        for _ in 0..5 {
            controller.handle(&mut scene.world, MazeEvent::ContinueGrab(GrabKind::Near));
            controller.handle(&mut scene.world, MazeEvent::ReleaseGrab);
        }

        assert_eq!(controller.state().ball, Some(scene.first_ball.clone()));
        assert_eq!(controller.state().phase, Phase::Idle);
        assert!(scene.world.created.is_empty());
        assert!(scene.world.deleted.is_empty());
    }

    #[test]
    fn test_drift_respawns_once() {
        let mut scene = scene();
        let mut controller = attach(&mut scene);
        let spawn = scene.world.position(&scene.spawner).unwrap();
        scene
            .world
            .set_position(&scene.first_ball, spawn + Vec3::new(1.5, 0.0, 0.0));

        controller.handle(&mut scene.world, MazeEvent::ContinueGrab(GrabKind::Near));

        assert_eq!(scene.world.deleted, vec![scene.first_ball.clone()]);
        assert_eq!(scene.world.created.len(), 1);
        let new_ball = scene.world.created[0].clone();
        assert_eq!(controller.state().ball, Some(new_ball.clone()));
        assert_eq!(controller.state().phase, Phase::Idle);
        assert_eq!(live_balls(&scene), 1);

        // New ball sits on the spawner, so nothing else happens
        controller.handle(&mut scene.world, MazeEvent::ReleaseGrab);
        assert_eq!(scene.world.created.len(), 1);
        assert_eq!(scene.world.deleted.len(), 1);
    }

    #[test]
    fn test_release_checks_drift() {
        let mut scene = scene();
        let mut controller = attach(&mut scene);
        scene
            .world
            .set_position(&scene.first_ball, Vec3::new(0.0, -5.0, 0.0));

        controller.handle(&mut scene.world, MazeEvent::ReleaseGrab);
        assert_eq!(scene.world.created.len(), 1);
        assert_eq!(scene.world.deleted.len(), 1);
    }

    #[test]
    fn test_far_grab_win_locks_and_schedules() {
        let mut scene = scene();
        let mut controller = attach(&mut scene);
        // Ball on the detector but still within drift range of a spawner placed close by
        scene
            .world
            .set_position(&scene.detector, Vec3::new(0.0, 0.02, 0.2));
        scene
            .world
            .set_position(&scene.first_ball, Vec3::new(0.1, 0.02, 0.2));

        controller.handle(&mut scene.world, MazeEvent::ContinueGrab(GrabKind::Far));

        assert_eq!(controller.state().phase, Phase::Locked);
        assert_eq!(scene.world.deleted, vec![scene.first_ball.clone()]);
        assert!(scene.world.created.is_empty());
        assert_eq!(scene.world.played.len(), 1);
        assert_eq!(scene.world.played[0].options.volume, 0.25);
        assert_eq!(scene.world.played[0].options.position, Vec3::ZERO);
        assert!(scene.world.played[0].url.ends_with("levelUp.wav"));

        let pending: Vec<_> = scene.world.timers().iter().cloned().collect();
        assert_eq!(pending, vec![ScheduledTask::respawn(scene.maze.clone(), 1)]);
        assert_eq!(scene.world.timers().next_due_in(), Some(1500));
    }

    #[test]
    fn test_near_grab_and_release_never_win() {
        let mut scene = scene();
        let mut controller = attach(&mut scene);
        scene
            .world
            .set_position(&scene.detector, Vec3::new(0.0, 0.02, 0.2));
        scene
            .world
            .set_position(&scene.first_ball, Vec3::new(0.0, 0.02, 0.2));

        controller.handle(&mut scene.world, MazeEvent::ContinueGrab(GrabKind::Near));
        controller.handle(&mut scene.world, MazeEvent::ReleaseGrab);
        controller.handle(&mut scene.world, MazeEvent::StartGrab(GrabKind::Far));

        assert_eq!(controller.state().phase, Phase::Idle);
        assert!(scene.world.played.is_empty());
        assert!(scene.world.timers().is_empty());
    }

    #[test]
    fn test_locked_absorbs_events_until_timer() {
        let mut scene = scene();
        let mut controller = attach(&mut scene);
        scene
            .world
            .set_position(&scene.detector, Vec3::new(0.0, 0.02, 0.2));
        scene
            .world
            .set_position(&scene.first_ball, Vec3::new(0.0, 0.02, 0.2));
        controller.handle(&mut scene.world, MazeEvent::ContinueGrab(GrabKind::Far));
        assert_eq!(controller.state().phase, Phase::Locked);
        let deleted_after_win = scene.world.deleted.len();

        // Even a wildly drifted config is ignored while locked
        scene.world.set_user_data(&scene.maze, Some("garbage".to_string()));
        for event in [
            MazeEvent::ContinueGrab(GrabKind::Near),
            MazeEvent::ContinueGrab(GrabKind::Far),
            MazeEvent::ReleaseGrab,
        ] {
            assert!(controller.try_handle(&mut scene.world, event).is_ok());
        }
        assert_eq!(controller.state().phase, Phase::Locked);
        assert!(scene.world.created.is_empty());
        assert_eq!(scene.world.deleted.len(), deleted_after_win);
        assert_eq!(scene.world.played.len(), 1);

        assert!(scene.world.advance(1499).is_empty());
        let fired = scene.world.advance(1);
        assert_eq!(fired.len(), 1);
        controller.on_timer(&mut scene.world, &fired[0]);

        assert_eq!(controller.state().phase, Phase::Idle);
        assert_eq!(scene.world.created.len(), 1);
        assert_eq!(controller.state().ball, Some(scene.world.created[0].clone()));
        assert_eq!(live_balls(&scene), 1);
    }

    #[test]
    fn test_timer_while_idle_is_noop() {
        let mut scene = scene();
        let mut controller = attach(&mut scene);
        let task = ScheduledTask::respawn(scene.maze.clone(), 1);
        controller.on_timer(&mut scene.world, &task);
        assert!(scene.world.created.is_empty());
        assert_eq!(controller.state().phase, Phase::Idle);
    }

    #[test]
    fn test_bad_config_aborts_without_state_change() {
        let mut scene = scene();
        let mut controller = attach(&mut scene);
        scene.world.set_user_data(&scene.maze, Some("{oops".to_string()));

        let err = controller
            .try_handle(&mut scene.world, MazeEvent::ContinueGrab(GrabKind::Far))
            .unwrap_err();
        assert!(matches!(err, MazeError::Config(_)));
        assert!(err.is_recoverable());
        assert_eq!(controller.state(), &ControllerState::new());

        // Fixed metadata: next event proceeds normally
        let blob = user_data_for(&scene.spawner, &scene.detector, &scene.first_ball);
        scene.world.set_user_data(&scene.maze, Some(blob));
        assert!(
            controller
                .try_handle(&mut scene.world, MazeEvent::ReleaseGrab)
                .is_ok()
        );
        assert_eq!(controller.state().ball, Some(scene.first_ball.clone()));
    }

    #[test]
    fn test_missing_spawner_aborts() {
        let mut scene = scene();
        let mut controller = attach(&mut scene);
        let spawner = scene.spawner.clone();
        scene.world.delete_entity(&spawner);

        let err = controller
            .try_handle(&mut scene.world, MazeEvent::ReleaseGrab)
            .unwrap_err();
        assert!(matches!(
            err,
            MazeError::MissingReference {
                what: "spawner",
                ..
            }
        ));
        assert_eq!(controller.state().phase, Phase::Idle);
        assert_eq!(scene.world.created.len(), 0);
    }
}
