// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The in-memory document: element tree, listeners, pointer capture, hover
//! and scheduling behind one [`DndHost`] implementation.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_dnd::event::{EventKinds, InputEvent};
use understory_dnd::host::{DndHost, Listener, ListenerId, LocalFuture, Task, TimerId};

use crate::dispatch::{Phase, Registry, route};
use crate::hover::HoverPath;
use crate::scheduler::{LocalTasks, Scheduler};
use crate::selector::{Selector, SelectorError};
use crate::tree::Tree;
use crate::types::{ElementData, NodeId};

/// An element tree that delivers input events to attached behaviors.
///
/// Create it with [`Document::new`]; behaviors take the returned `Rc` as
/// their host.
///
/// Every call to [`Document::dispatch`] (and to the gesture drivers built on
/// it) ends with a [checkpoint](Document::checkpoint): queued microtasks run
/// and woken futures are polled. Timers only run from
/// [`Document::advance`].
#[derive(Debug, Default)]
pub struct Document {
    tree: RefCell<Tree>,
    listeners: RefCell<Registry>,
    captures: RefCell<BTreeMap<u64, NodeId>>,
    pub(crate) hover: RefCell<BTreeMap<u64, HoverPath<NodeId>>>,
    scheduler: RefCell<Scheduler>,
    tasks: LocalTasks,
}

impl Document {
    /// An empty document.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Append an element under `parent`, or as a new root.
    pub fn insert(&self, parent: Option<NodeId>, data: ElementData) -> NodeId {
        self.tree.borrow_mut().insert(parent, data)
    }

    /// Remove `id` and its subtree, with their listeners and captures.
    ///
    /// Returns how many elements were removed.
    pub fn remove(&self, id: NodeId) -> usize {
        let removed = self.tree.borrow_mut().remove(id);
        {
            let mut listeners = self.listeners.borrow_mut();
            for n in &removed {
                listeners.remove_node(*n);
            }
        }
        self.captures
            .borrow_mut()
            .retain(|_, n| !removed.contains(n));
        for path in self.hover.borrow_mut().values_mut() {
            path.forget(|n| removed.contains(n));
        }
        if !removed.is_empty() {
            log::debug!("removed {} element(s) under {id}", removed.len());
        }
        removed.len()
    }

    /// Returns `true` if `id` refers to a live element.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.tree.borrow().is_alive(id)
    }

    /// Parent of `id`, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.borrow().parent(id)
    }

    /// Root-to-`id` path, inclusive. Empty for a stale id.
    pub fn path(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.borrow().path_to_root(id)
    }

    /// Children of `id` in order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.borrow().children(id).to_vec()
    }

    /// A copy of the element's data.
    pub fn element(&self, id: NodeId) -> Option<ElementData> {
        self.tree.borrow().data(id).cloned()
    }

    /// Returns `true` if the element's class list contains `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.tree.borrow().data(id).is_some_and(|d| d.has_class(class))
    }

    /// The element's class list, sorted.
    pub fn class_list(&self, id: NodeId) -> Vec<String> {
        self.tree
            .borrow()
            .data(id)
            .map(|d| d.classes.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The element's native draggable flag.
    pub fn is_draggable(&self, id: NodeId) -> bool {
        self.tree.borrow().data(id).is_some_and(|d| d.draggable)
    }

    /// Move or resize an element's box.
    pub fn set_bounds(&self, id: NodeId, bounds: Rect) {
        if let Some(d) = self.tree.borrow_mut().data_mut(id) {
            d.bounds = bounds;
        }
    }

    /// Every element matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let sel = Selector::parse(selector)?;
        let tree = self.tree.borrow();
        Ok(tree
            .iter()
            .into_iter()
            .filter(|n| tree.data(*n).is_some_and(|d| sel.matches(d)))
            .collect())
    }

    /// First element matching `selector`, in document order.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// Topmost element under `pt`.
    pub fn hit_test(&self, pt: Point) -> Option<NodeId> {
        self.tree.borrow().hit_test(pt)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.tree.borrow().len()
    }

    /// Returns `true` if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of listeners registered on `id`.
    pub fn listener_count(&self, id: NodeId) -> usize {
        self.listeners.borrow().count(id)
    }

    /// Number of listeners registered anywhere.
    pub fn total_listeners(&self) -> usize {
        self.listeners.borrow().total()
    }

    /// Element holding the capture of `pointer_id`.
    pub fn captured(&self, pointer_id: u64) -> Option<NodeId> {
        self.captures.borrow().get(&pointer_id).copied()
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.scheduler.borrow().now()
    }

    /// Timers not yet run or cancelled.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.borrow().pending_timers()
    }

    /// Spawned futures that have not completed.
    pub fn pending_futures(&self) -> usize {
        self.tasks.pending()
    }

    /// Deliver `event` to its target and ancestors, then run a checkpoint.
    ///
    /// The event's timestamp is set to the current virtual time. The event is
    /// returned so callers can inspect `default_prevented` and the transfer.
    pub fn dispatch(&self, mut event: InputEvent<NodeId>) -> InputEvent<NodeId> {
        event.time_ms = self.now_ms();
        self.propagate(&mut event);
        self.checkpoint();
        event
    }

    fn propagate(&self, event: &mut InputEvent<NodeId>) {
        let path = self.tree.borrow().path_to_root(event.target);
        if path.is_empty() {
            log::trace!("{} at stale {} dropped", event.kind, event.target);
            return;
        }
        let captured = if event.kind.bubbles() {
            event
                .pointer
                .and_then(|p| self.captured(p.id))
                .filter(|c| !path.contains(c))
        } else {
            None
        };
        for (node, phase) in route(&path, event.kind) {
            self.deliver(node, phase, event);
            if event.propagation_stopped {
                break;
            }
        }
        // Capture is routing, not propagation: stop_propagation does not
        // withhold the event from the capturing element.
        if let Some(node) = captured {
            self.deliver(node, Phase::Captured, event);
        }
        event.current_target = None;
    }

    fn deliver(&self, node: NodeId, phase: Phase, event: &mut InputEvent<NodeId>) {
        let listeners = self.listeners.borrow().snapshot(node, event.kind);
        for (id, listener) in listeners {
            // A listener removed by an earlier one in this dispatch stays quiet.
            if !self.listeners.borrow().is_registered(id) {
                continue;
            }
            log::trace!("{} -> {node} ({phase:?})", event.kind);
            event.current_target = Some(node);
            listener(event);
        }
    }

    /// Run queued microtasks and poll woken futures until neither makes
    /// progress.
    ///
    /// Called from inside a running future, only microtasks run; the outer
    /// checkpoint polls whatever was woken meanwhile.
    pub fn checkpoint(&self) {
        loop {
            loop {
                let task = self.scheduler.borrow_mut().pop_microtask();
                match task {
                    Some(task) => task(),
                    None => break,
                }
            }
            if !self.tasks.run_until_stalled() || !self.scheduler.borrow().has_microtasks() {
                break;
            }
        }
    }

    /// Move the virtual clock forward by `ms`, running every timer that
    /// falls due, each followed by a checkpoint.
    pub fn advance(&self, ms: u64) {
        let until = self.now_ms().saturating_add(ms);
        loop {
            let task = self.scheduler.borrow_mut().pop_due(until);
            let Some(task) = task else {
                break;
            };
            task();
            self.checkpoint();
        }
        self.scheduler.borrow_mut().settle(until);
    }

    fn matches_selector(&self, node: NodeId, selector: &Selector) -> bool {
        self.tree
            .borrow()
            .data(node)
            .is_some_and(|d| selector.matches(d))
    }
}

impl DndHost for Document {
    type Element = NodeId;

    fn add_class(&self, element: &NodeId, class: &str) {
        if let Some(d) = self.tree.borrow_mut().data_mut(*element) {
            d.classes.insert(class.into());
        }
    }

    fn remove_class(&self, element: &NodeId, class: &str) {
        if let Some(d) = self.tree.borrow_mut().data_mut(*element) {
            d.classes.remove(class);
        }
    }

    fn set_draggable(&self, element: &NodeId, draggable: bool) {
        if let Some(d) = self.tree.borrow_mut().data_mut(*element) {
            d.draggable = draggable;
        }
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.tree.borrow().contains(*ancestor, *node)
    }

    fn closest(&self, node: &NodeId, within: &NodeId, selector: &str) -> bool {
        let selector = match Selector::parse(selector) {
            Ok(s) => s,
            Err(err) => {
                log::warn!("selector `{selector}` ignored: {err}");
                return false;
            }
        };
        if !self.contains(within, node) {
            return false;
        }
        let mut cur = Some(*node);
        while let Some(n) = cur
            && n != *within
        {
            if self.matches_selector(n, &selector) {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    fn listen(&self, element: &NodeId, kinds: EventKinds, listener: Listener<NodeId>) -> ListenerId {
        self.listeners.borrow_mut().add(*element, kinds, listener)
    }

    fn unlisten(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id)
    }

    fn capture_pointer(&self, element: &NodeId, pointer_id: u64) {
        if self.is_alive(*element) {
            self.captures.borrow_mut().insert(pointer_id, *element);
        }
    }

    fn release_pointer(&self, element: &NodeId, pointer_id: u64) {
        let mut captures = self.captures.borrow_mut();
        if captures.get(&pointer_id) == Some(element) {
            captures.remove(&pointer_id);
        }
    }

    fn set_timeout(&self, delay_ms: u64, task: Task) -> TimerId {
        self.scheduler.borrow_mut().set_timeout(delay_ms, task)
    }

    fn clear_timeout(&self, id: TimerId) -> bool {
        self.scheduler.borrow_mut().clear_timeout(id)
    }

    fn queue_microtask(&self, task: Task) {
        self.scheduler.borrow_mut().queue_microtask(task);
    }

    fn spawn_local(&self, future: LocalFuture) {
        self.tasks.spawn(future);
    }
}
