// src/scheduler.rs
//! Tick-based delayed task queue.
//!
//! Replaces wall-clock callback timers with deterministic game ticks: the
//! loop advances the scheduler once per tick and runs whatever came due.
//! Tasks that outlive their context (an enemy turn firing after combat was
//! torn down) are guarded at the point of execution, not here.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use combat::CombatOutcome;

/// Fixed logic rate of the game loop.
pub const TICKS_PER_SECOND: u64 = 10;

/// Work the orchestrator deferred to a later tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Run the pending enemy combat turn.
    EnemyTurn,
    /// Close out a resolved combat session and apply its consequences.
    FinishCombat(CombatOutcome),
    /// Periodic background save.
    Autosave,
}

#[derive(Debug)]
struct Entry {
    fire_at: u64,
    /// Tie-breaker keeping same-tick tasks in schedule order.
    seq: u64,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the BinaryHeap pops the earliest entry first.
        (other.fire_at, other.seq).cmp(&(self.fire_at, self.seq))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Entry>,
    now: u64,
    next_seq: u64,
}

impl Scheduler {
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queue `task` to fire `delay` ticks from now. A zero delay fires on
    /// the next advance, never synchronously.
    pub fn schedule_in(&mut self, delay: u64, task: Task) {
        let entry = Entry {
            fire_at: self.now + delay,
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.queue.push(entry);
    }

    /// Move time forward one tick and collect everything now due, in
    /// (fire_at, schedule order).
    pub fn advance(&mut self) -> Vec<Task> {
        self.now += 1;
        let mut due = Vec::new();
        while let Some(entry) = self.queue.pop() {
            if entry.fire_at > self.now {
                self.queue.push(entry);
                break;
            }
            due.push(entry.task);
        }
        due
    }

    /// Drop pending tasks matching the predicate.
    pub fn cancel_where(&mut self, predicate: impl Fn(&Task) -> bool) {
        self.queue.retain(|entry| !predicate(&entry.task));
    }

    /// Teardown: drop everything pending.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
