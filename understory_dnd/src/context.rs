// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session context: the explicitly passed, single-instance home of the session.
//!
//! ## Overview
//!
//! A [`DndContext`] owns the one [`DndState`] of a document and the
//! [`SignalBus`] used for the drag-start coordination signal. It is a cheap,
//! clonable handle; every behavior attached to the same document receives a
//! clone of the same context.
//!
//! All access is single-threaded. Handlers complete before the next input
//! event is processed, so the state needs no lock; the `RefCell` borrows are
//! never held across a callback.
//!
//! ## Access rules
//!
//! - [`DragSource`](crate::source::DragSource) writes through
//!   [`DndContext::begin`] and [`DndContext::reset`].
//! - [`DropZone`](crate::zone::DropZone) writes through
//!   [`DndContext::set_target`], [`DndContext::clear_target`] and
//!   [`DndContext::set_item`].
//! - Callbacks and application code read through [`DndContext::snapshot`] or
//!   [`DndContext::with_state`].
//!
//! ```
//! use understory_dnd::context::DndContext;
//!
//! let ctx: DndContext<&str, u32> = DndContext::new();
//! ctx.begin(Some("card"), "list-a");
//! ctx.set_target("list-b", 12);
//! assert_eq!(ctx.snapshot().target_container.as_deref(), Some("list-b"));
//! ctx.reset();
//! assert!(ctx.with_state(|s| s.is_cleared()));
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::signal::{SignalBus, Subscription};
use crate::state::DndState;

/// Identifier of one attached behavior within a context, used in diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Raw value of the identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Inner<T, E> {
    state: RefCell<DndState<T, E>>,
    signal: Rc<SignalBus>,
    next_instance: Cell<u64>,
}

/// Shared drag-and-drop session context.
pub struct DndContext<T, E> {
    inner: Rc<Inner<T, E>>,
}

impl<T, E> Clone for DndContext<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Default for DndContext<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: core::fmt::Debug, E: core::fmt::Debug> core::fmt::Debug for DndContext<T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DndContext")
            .field("state", &*self.inner.state.borrow())
            .field("signal", &self.inner.signal)
            .finish_non_exhaustive()
    }
}

impl<T, E> DndContext<T, E> {
    /// Create a context holding the cleared state.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(DndState::new()),
                signal: Rc::new(SignalBus::default()),
                next_instance: Cell::new(1),
            }),
        }
    }

    /// Returns `true` if both handles refer to the same context.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Read the state without cloning it.
    ///
    /// `f` must not write to this context.
    pub fn with_state<R>(&self, f: impl FnOnce(&DndState<T, E>) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Mutate the state directly.
    ///
    /// Behaviors use the dedicated writers below; this exists for hosts that
    /// bind the state to their own reactive layer.
    pub fn update<R>(&self, f: impl FnOnce(&mut DndState<T, E>) -> R) -> R {
        f(&mut self.inner.state.borrow_mut())
    }

    /// Returns `true` while a session is active.
    pub fn is_dragging(&self) -> bool {
        self.inner.state.borrow().is_dragging
    }

    /// Publish a new session. Returns `true` if it replaced an active one.
    pub fn begin(&self, item: Option<T>, source_container: &str) -> bool {
        let aborted = self.inner.state.borrow_mut().begin(item, source_container);
        if aborted {
            log::debug!("session restarted from `{source_container}`; previous drag abandoned");
        } else {
            log::trace!("session started from `{source_container}`");
        }
        aborted
    }

    /// Record the hovered container and element.
    pub fn set_target(&self, container: &str, element: E) {
        log::trace!("session target -> `{container}`");
        self.inner.state.borrow_mut().set_target(container, element);
    }

    /// Clear the hovered container and element.
    pub fn clear_target(&self) {
        log::trace!("session target cleared");
        self.inner.state.borrow_mut().clear_target();
    }

    /// Overwrite the carried payload.
    pub fn set_item(&self, item: T) {
        log::trace!("session payload replaced from transfer channel");
        self.inner.state.borrow_mut().dragged_item = Some(item);
    }

    /// Reset the state to its cleared form.
    pub fn reset(&self) {
        log::trace!("session reset");
        self.inner.state.borrow_mut().reset();
    }

    /// Subscribe to the drag-start coordination signal.
    pub fn subscribe(&self, f: impl Fn() + 'static) -> Subscription {
        SignalBus::subscribe(&self.inner.signal, f)
    }

    /// Raise the drag-start coordination signal. Returns how many listeners
    /// were notified.
    pub fn broadcast_drag_start(&self) -> usize {
        self.inner.signal.broadcast()
    }

    /// Allocate an identifier for a newly attached behavior.
    pub fn next_instance_id(&self) -> InstanceId {
        let id = self.inner.next_instance.get();
        self.inner.next_instance.set(id + 1);
        InstanceId(id)
    }
}

impl<T: Clone, E: Clone> DndContext<T, E> {
    /// Clone the current state, for handing to callbacks.
    pub fn snapshot(&self) -> DndState<T, E> {
        self.inner.state.borrow().clone()
    }
}
