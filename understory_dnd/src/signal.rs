// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordination signal: "a drag just started somewhere in this document".
//!
//! ## Overview
//!
//! Every [`DragSource`](crate::source::DragSource) raises the signal when it
//! starts a drag, and every live [`DropZone`](crate::zone::DropZone) listens for
//! it to reset its own hover bookkeeping. The signal carries no payload beyond
//! its occurrence.
//!
//! The bus lives inside a [`DndContext`](crate::context::DndContext), so its
//! reach is exactly one document: the set of behaviors sharing that context.
//!
//! Subscribers are invoked from a snapshot of the subscriber list, so a
//! subscriber may subscribe or cancel others while being notified.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_dnd::signal::SignalBus;
//!
//! let bus = Rc::new(SignalBus::default());
//! let hits = Rc::new(Cell::new(0));
//! let seen = hits.clone();
//! let mut sub = SignalBus::subscribe(&bus, move || seen.set(seen.get() + 1));
//!
//! assert_eq!(bus.broadcast(), 1);
//! sub.cancel();
//! assert_eq!(bus.broadcast(), 0);
//! assert_eq!(hits.get(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Name under which the drag-start signal is reported.
pub const DRAG_START_SIGNAL: &str = "dnd-drag-start";

type Subscriber = Rc<dyn Fn()>;

/// A same-document broadcast channel with no payload.
#[derive(Default)]
pub struct SignalBus {
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(u64, Subscriber)>>,
}

impl core::fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SignalBus")
            .field("subscribers", &self.len())
            .finish_non_exhaustive()
    }
}

impl SignalBus {
    /// Register `f` to be called on every broadcast.
    ///
    /// The returned [`Subscription`] cancels itself when dropped.
    pub fn subscribe(bus: &Rc<Self>, f: impl Fn() + 'static) -> Subscription {
        let id = bus.next_id.get();
        bus.next_id.set(id + 1);
        bus.subscribers.borrow_mut().push((id, Rc::new(f)));
        Subscription {
            bus: Rc::downgrade(bus),
            id: Some(id),
        }
    }

    /// Notify every current subscriber. Returns how many were notified.
    pub fn broadcast(&self) -> usize {
        let snapshot: Vec<Subscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, s)| s.clone())
            .collect();
        log::trace!(
            "{DRAG_START_SIGNAL}: notifying {} subscriber(s)",
            snapshot.len()
        );
        for subscriber in &snapshot {
            subscriber();
        }
        snapshot.len()
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Returns `true` if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: u64) -> bool {
        let mut subs = self.subscribers.borrow_mut();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }
}

/// Handle to a [`SignalBus`] subscription.
#[derive(Debug)]
pub struct Subscription {
    bus: Weak<SignalBus>,
    id: Option<u64>,
}

impl Subscription {
    /// Stop receiving broadcasts. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take()
            && let Some(bus) = self.bus.upgrade()
        {
            bus.remove(id);
        }
    }

    /// Returns `true` until [`Subscription::cancel`] has been called.
    pub fn is_active(&self) -> bool {
        self.id.is_some() && self.bus.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
