//! Controller registry
//!
//! Each attachment owns its own [`MazeController`]; events and fired timers are
//! routed by maze id and attachment number, so any number of mazes can coexist.
//! Pending respawn timers are never cancelled: a controller detached while locked
//! is parked until its timer fires, then runs the respawn and is dropped.

use std::collections::BTreeMap;

use crate::maze::{MazeController, MazeEvent};
use crate::scheduler::ScheduledTask;
use crate::tuning::Tuning;
use crate::world::{EntityId, World};

/// Owns every attached maze controller
#[derive(Debug, Default)]
pub struct MazeHost {
    tuning: Tuning,
    next_attachment: u64,
    active: BTreeMap<EntityId, MazeController>,
    /// Detached while locked; waiting for their respawn timer
    parked: Vec<MazeController>,
}

impl MazeHost {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            next_attachment: 1,
            active: BTreeMap::new(),
            parked: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Attach a fresh controller to `maze`, replacing any existing one.
    /// Returns the attachment number.
    pub fn attach<W: World + ?Sized>(&mut self, world: &mut W, maze: EntityId) -> u64 {
        if self.active.contains_key(&maze) {
            self.detach(&maze);
        }
        let attachment = self.next_attachment.max(1);
        self.next_attachment = attachment + 1;

        let controller = MazeController::attach(world, maze.clone(), attachment, self.tuning.clone());
        self.active.insert(maze, controller);
        attachment
    }

    /// Detach the controller of `maze`. Returns false if none was attached.
    pub fn detach(&mut self, maze: &EntityId) -> bool {
        let Some(controller) = self.active.remove(maze) else {
            return false;
        };
        if controller.state().is_locked() {
            log::info!(
                "Maze {} detached while locked; respawn timer still pending",
                maze
            );
            self.parked.push(controller);
        } else {
            log::info!("Maze {} detached", maze);
        }
        true
    }

    /// Route an interaction event to the controller of `maze`
    pub fn dispatch<W: World + ?Sized>(&mut self, world: &mut W, maze: &EntityId, event: MazeEvent) {
        match self.active.get_mut(maze) {
            Some(controller) => controller.handle(world, event),
            None => log::warn!("No controller attached to {}, dropping {:?}", maze, event),
        }
    }

    /// Deliver a fired timer to the context that scheduled it
    pub fn fire<W: World + ?Sized>(&mut self, world: &mut W, task: &ScheduledTask) {
        if let Some(controller) = self
            .active
            .get_mut(&task.maze)
            .filter(|c| c.attachment() == task.attachment)
        {
            controller.on_timer(world, task);
            return;
        }

        if let Some(idx) = self
            .parked
            .iter()
            .position(|c| c.maze() == &task.maze && c.attachment() == task.attachment)
        {
            let mut controller = self.parked.swap_remove(idx);
            log::info!(
                "Respawn timer for detached maze {} (attachment {})",
                task.maze,
                task.attachment
            );
            controller.on_timer(world, task);
            return;
        }

        log::warn!(
            "No context for timer {:?} on maze {} (attachment {})",
            task.kind,
            task.maze,
            task.attachment
        );
    }

    /// Deliver a batch of fired timers in order
    pub fn fire_all<W, I>(&mut self, world: &mut W, tasks: I)
    where
        W: World + ?Sized,
        I: IntoIterator<Item = ScheduledTask>,
    {
        for task in tasks {
            self.fire(world, &task);
        }
    }

    pub fn controller(&self, maze: &EntityId) -> Option<&MazeController> {
        self.active.get(maze)
    }

    /// Number of attached controllers
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Detached controllers still waiting on a timer
    pub fn parked(&self) -> usize {
        self.parked.len()
    }
}
