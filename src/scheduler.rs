//! Single-shot timer queue
//!
//! Tasks are queued with a delay in virtual milliseconds and handed back once the
//! clock passes their due time. There is no cancellation: a queued task always
//! fires.

use serde::{Deserialize, Serialize};

use crate::world::EntityId;

/// What a fired timer should do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// End of the post-win lockout: unlock and spawn a fresh ball
    Respawn,
}

/// A scheduled callback, addressed to the controller context that scheduled it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub maze: EntityId,
    /// Attachment the task belongs to; a maze re-attached later gets a new one
    pub attachment: u64,
    pub kind: TimerKind,
}

impl ScheduledTask {
    pub fn respawn(maze: EntityId, attachment: u64) -> Self {
        Self {
            maze,
            attachment,
            kind: TimerKind::Respawn,
        }
    }
}

#[derive(Debug, Clone)]
struct PendingTimer {
    due_ms: u64,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    task: ScheduledTask,
}

/// Queue of pending one-shot timers driven by an explicit clock
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_seq: u64,
    pending: Vec<PendingTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Queue `task` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, task: ScheduledTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingTimer {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            task,
        });
    }

    /// Advance the clock by `elapsed_ms` and take every task that became due,
    /// ordered by due time then scheduling order.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<ScheduledTask> {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms);
        let now = self.now_ms;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|t| t.due_ms <= now);
        self.pending = rest;

        due.sort_by_key(|t| (t.due_ms, t.seq));
        due.into_iter().map(|t| t.task).collect()
    }

    /// Milliseconds until the next task is due, if any
    pub fn next_due_in(&self) -> Option<u64> {
        self.pending
            .iter()
            .map(|t| t.due_ms.saturating_sub(self.now_ms))
            .min()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Pending tasks in scheduling order
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.pending.iter().map(|t| &t.task)
    }
}
