// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual clock, timers, microtasks and local futures.
//!
//! Nothing here runs on its own. The document pops work from the scheduler
//! and runs it with no borrow held, so tasks may schedule more work. Futures
//! live in a [`LocalPool`] and are only polled once woken.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;
use understory_dnd::host::{LocalFuture, Task, TimerId};

#[derive(Default)]
pub(crate) struct Scheduler {
    now: u64,
    next_timer: u64,
    timers: BTreeMap<(u64, u64), Task>,
    microtasks: VecDeque<Task>,
}

impl core::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("timers", &self.timers.len())
            .field("microtasks", &self.microtasks.len())
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    pub(crate) fn now(&self) -> u64 {
        self.now
    }

    pub(crate) fn set_timeout(&mut self, delay_ms: u64, task: Task) -> TimerId {
        self.next_timer += 1;
        let due = self.now.saturating_add(delay_ms);
        self.timers.insert((due, self.next_timer), task);
        TimerId::new(self.next_timer)
    }

    pub(crate) fn clear_timeout(&mut self, id: TimerId) -> bool {
        let key = self.timers.keys().copied().find(|&(_, t)| t == id.get());
        key.and_then(|k| self.timers.remove(&k)).is_some()
    }

    /// Pop the earliest timer due at or before `limit`, moving the clock to
    /// its due time.
    pub(crate) fn pop_due(&mut self, limit: u64) -> Option<Task> {
        let (&key, _) = self.timers.first_key_value()?;
        if key.0 > limit {
            return None;
        }
        self.now = self.now.max(key.0);
        self.timers.remove(&key)
    }

    /// Move the clock forward to `to` without running anything.
    pub(crate) fn settle(&mut self, to: u64) {
        self.now = self.now.max(to);
    }

    pub(crate) fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub(crate) fn queue_microtask(&mut self, task: Task) {
        self.microtasks.push_back(task);
    }

    pub(crate) fn pop_microtask(&mut self) -> Option<Task> {
        self.microtasks.pop_front()
    }

    pub(crate) fn has_microtasks(&self) -> bool {
        !self.microtasks.is_empty()
    }

}

/// Spawned futures, polled on the UI thread.
#[derive(Debug)]
pub(crate) struct LocalTasks {
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    pending: Rc<Cell<usize>>,
}

impl Default for LocalTasks {
    fn default() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            pool: RefCell::new(pool),
            spawner,
            pending: Rc::default(),
        }
    }
}

impl LocalTasks {
    pub(crate) fn spawn(&self, future: LocalFuture) {
        let pending = self.pending.clone();
        pending.set(pending.get() + 1);
        let counted = async move {
            future.await;
            pending.set(pending.get() - 1);
        };
        if let Err(err) = self.spawner.spawn_local(counted) {
            self.pending.set(self.pending.get() - 1);
            log::warn!("future not spawned: {err}");
        }
    }

    /// Poll woken tasks until none can make progress.
    ///
    /// Returns `false` without polling when called from inside a task.
    pub(crate) fn run_until_stalled(&self) -> bool {
        let Ok(mut pool) = self.pool.try_borrow_mut() else {
            return false;
        };
        pool.run_until_stalled();
        true
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.get()
    }
}
