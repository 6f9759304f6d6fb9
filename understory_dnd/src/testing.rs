// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal host for unit tests: flat parent map, tag selectors, manual queues.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::event::{EventKinds, InputEvent};
use crate::host::{DndHost, Listener, ListenerId, LocalFuture, Task, TimerId};

pub(crate) type El = u32;

#[derive(Default)]
pub(crate) struct FakeHost {
    parents: RefCell<BTreeMap<El, El>>,
    tags: RefCell<BTreeMap<El, String>>,
    pub(crate) classes: RefCell<BTreeMap<El, BTreeSet<String>>>,
    pub(crate) draggable: RefCell<BTreeMap<El, bool>>,
    listeners: RefCell<Vec<(ListenerId, El, EventKinds, Listener<El>)>>,
    next_id: Cell<u64>,
    pub(crate) captured: RefCell<Option<(El, u64)>>,
    microtasks: RefCell<Vec<Task>>,
    timers: RefCell<Vec<(TimerId, u64, Task)>>,
    pub(crate) futures: RefCell<Vec<LocalFuture>>,
}

impl FakeHost {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn add(&self, node: El, parent: Option<El>, tag: &str) {
        if let Some(p) = parent {
            self.parents.borrow_mut().insert(node, p);
        }
        self.tags.borrow_mut().insert(node, tag.into());
    }

    pub(crate) fn has_class(&self, node: El, class: &str) -> bool {
        self.classes
            .borrow()
            .get(&node)
            .is_some_and(|set| set.contains(class))
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn next(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    /// Deliver `event` to listeners registered on `at`, then run microtasks.
    pub(crate) fn fire(&self, at: El, event: &mut InputEvent<El>) {
        self.dispatch(at, event);
        self.run_microtasks();
    }

    /// Deliver `event` to listeners registered on `at`.
    pub(crate) fn dispatch(&self, at: El, event: &mut InputEvent<El>) {
        let matching: Vec<Listener<El>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, el, kinds, _)| *el == at && kinds.has(event.kind))
            .map(|(_, _, _, l)| l.clone())
            .collect();
        event.current_target = Some(at);
        for l in matching {
            l(event);
        }
    }

    pub(crate) fn run_microtasks(&self) {
        loop {
            let batch: Vec<Task> = self.microtasks.borrow_mut().drain(..).collect();
            if batch.is_empty() {
                break;
            }
            for task in batch {
                task();
            }
        }
    }

    /// Run every pending timer regardless of its delay.
    pub(crate) fn run_timers(&self) -> usize {
        let due: Vec<(TimerId, u64, Task)> = self.timers.borrow_mut().drain(..).collect();
        let n = due.len();
        for (_, _, task) in due {
            task();
        }
        n
    }

    pub(crate) fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }
}

impl DndHost for FakeHost {
    type Element = El;

    fn add_class(&self, element: &El, class: &str) {
        self.classes
            .borrow_mut()
            .entry(*element)
            .or_default()
            .insert(class.into());
    }

    fn remove_class(&self, element: &El, class: &str) {
        if let Some(set) = self.classes.borrow_mut().get_mut(element) {
            set.remove(class);
        }
    }

    fn set_draggable(&self, element: &El, draggable: bool) {
        self.draggable.borrow_mut().insert(*element, draggable);
    }

    fn contains(&self, ancestor: &El, node: &El) -> bool {
        let parents = self.parents.borrow();
        let mut cur = Some(*node);
        while let Some(n) = cur {
            if n == *ancestor {
                return true;
            }
            cur = parents.get(&n).copied();
        }
        false
    }

    fn closest(&self, node: &El, within: &El, selector: &str) -> bool {
        if node == within || !self.contains(within, node) {
            return false;
        }
        let parents = self.parents.borrow();
        let tags = self.tags.borrow();
        let mut cur = Some(*node);
        while let Some(n) = cur {
            if n == *within {
                break;
            }
            if tags.get(&n).is_some_and(|t| t == selector) {
                return true;
            }
            cur = parents.get(&n).copied();
        }
        false
    }

    fn listen(&self, element: &El, kinds: EventKinds, listener: Listener<El>) -> ListenerId {
        let id = ListenerId::new(self.next());
        self.listeners
            .borrow_mut()
            .push((id, *element, kinds, listener));
        id
    }

    fn unlisten(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, ..)| *lid != id);
        listeners.len() != before
    }

    fn capture_pointer(&self, element: &El, pointer_id: u64) {
        *self.captured.borrow_mut() = Some((*element, pointer_id));
    }

    fn release_pointer(&self, element: &El, pointer_id: u64) {
        let mut captured = self.captured.borrow_mut();
        if *captured == Some((*element, pointer_id)) {
            *captured = None;
        }
    }

    fn set_timeout(&self, delay_ms: u64, task: Task) -> TimerId {
        let id = TimerId::new(self.next());
        self.timers.borrow_mut().push((id, delay_ms, task));
        id
    }

    fn clear_timeout(&self, id: TimerId) -> bool {
        let mut timers = self.timers.borrow_mut();
        let before = timers.len();
        timers.retain(|(tid, ..)| *tid != id);
        timers.len() != before
    }

    fn queue_microtask(&self, task: Task) {
        self.microtasks.borrow_mut().push(task);
    }

    fn spawn_local(&self, future: LocalFuture) {
        self.futures.borrow_mut().push(future);
    }
}
