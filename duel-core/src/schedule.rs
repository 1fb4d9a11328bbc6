//! Timed single-shot tasks.
//!
//! Each owner (an AI policy, the match controller) keeps its own queue of
//! delayed actions. Tasks are plain values drained by the owner on its next
//! tick at or after their due time, so no callback ever runs outside the
//! simulation pass.

use crate::constants::Millis;

/// Handle returned by [`TaskQueue::schedule`], usable to cancel the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    handle: TaskHandle,
    due: Millis,
    task: T,
}

/// Ordered list of pending delayed tasks.
#[derive(Debug, Clone)]
pub struct TaskQueue<T> {
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Queue `task` to become due `delay` after `now`.
    pub fn schedule(&mut self, now: Millis, delay: Millis, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            handle,
            due: now.saturating_add(delay),
            task,
        });
        handle
    }

    /// Drop a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.handle != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|s| s.handle == handle)
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.iter().map(|s| s.due).min()
    }

    /// Remove and return every task due at or before `now`, earliest first.
    /// Tasks sharing a due time come out in scheduling order.
    pub fn take_due(&mut self, now: Millis) -> Vec<T> {
        if self.pending.iter().all(|s| s.due > now) {
            return Vec::new();
        }

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = waiting;

        due.sort_by_key(|s| (s.due, s.handle.0));
        due.into_iter().map(|s| s.task).collect()
    }
}
