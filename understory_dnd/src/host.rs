// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host interface: what the behaviors need from the UI environment.
//!
//! ## Overview
//!
//! The element tree, event delivery, timers and the local executor all belong
//! to the host. [`DndHost`] is the narrow interface the behaviors use:
//!
//! - class membership and the native draggable flag of an element,
//! - containment and selector queries (for the leave guard and for
//!   interactive descendants),
//! - listener registration, pointer capture,
//! - timers, microtasks and local futures.
//!
//! Listeners are invoked with `&mut InputEvent` and must not be called while
//! the host holds a borrow that a listener might need again (listeners add and
//! remove classes, register timers, and so on).
//!
//! `understory_dnd_dom` provides an in-memory implementation.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::event::{EventKinds, InputEvent};
use crate::options::ClassNames;

/// Listener registered with [`DndHost::listen`].
pub type Listener<E> = Rc<dyn Fn(&mut InputEvent<E>)>;

/// One-shot task for timers and microtasks.
pub type Task = Box<dyn FnOnce()>;

/// Future driven by the host's local executor.
pub type LocalFuture = Pin<Box<dyn Future<Output = ()>>>;

/// Handle of a registered listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a host-assigned value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Host-assigned value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Handle of a pending timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a host-assigned value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Host-assigned value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// UI environment hosting the behaviors.
pub trait DndHost {
    /// Handle of an element in the host's tree.
    type Element: Clone + Eq + core::fmt::Debug + 'static;

    /// Add `class` to the element's class list.
    fn add_class(&self, element: &Self::Element, class: &str);

    /// Remove `class` from the element's class list.
    fn remove_class(&self, element: &Self::Element, class: &str);

    /// Set the element's native draggable flag.
    fn set_draggable(&self, element: &Self::Element, draggable: bool);

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;

    /// Returns `true` if `node`, or any of its ancestors strictly below
    /// `within`, matches `selector`.
    ///
    /// `within` itself is never tested. Returns `false` if `node` is not a
    /// descendant of `within`, or if the selector cannot be parsed.
    fn closest(&self, node: &Self::Element, within: &Self::Element, selector: &str) -> bool;

    /// Register `listener` for events of `kinds` targeted at `element` or,
    /// for bubbling kinds, at its descendants.
    fn listen(
        &self,
        element: &Self::Element,
        kinds: EventKinds,
        listener: Listener<Self::Element>,
    ) -> ListenerId;

    /// Remove a listener. Returns `false` if it was already removed.
    fn unlisten(&self, id: ListenerId) -> bool;

    /// Route further events of `pointer_id` to `element`.
    fn capture_pointer(&self, element: &Self::Element, pointer_id: u64);

    /// Undo [`DndHost::capture_pointer`] if `element` holds the capture.
    fn release_pointer(&self, element: &Self::Element, pointer_id: u64);

    /// Run `task` once after `delay_ms` milliseconds.
    fn set_timeout(&self, delay_ms: u64, task: Task) -> TimerId;

    /// Cancel a pending timer. Returns `false` if it already ran or was
    /// cancelled.
    fn clear_timeout(&self, id: TimerId) -> bool;

    /// Run `task` once the current event dispatch has completed.
    fn queue_microtask(&self, task: Task);

    /// Drive `future` to completion on the UI thread.
    fn spawn_local(&self, future: LocalFuture);
}

/// Add every class in `names` to `element`.
pub fn add_classes<H: DndHost + ?Sized>(host: &H, element: &H::Element, names: &ClassNames) {
    for name in names.iter() {
        host.add_class(element, name);
    }
}

/// Remove every class in `names` from `element`.
pub fn remove_classes<H: DndHost + ?Sized>(host: &H, element: &H::Element, names: &ClassNames) {
    for name in names.iter() {
        host.remove_class(element, name);
    }
}
