// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop zone: the behavior attached to an element that accepts drops.
//!
//! ## States
//!
//! A zone is either idle or hovering. Hover is tracked with an
//! [`EntryCounter`], so crossing into and out of descendants does not flicker
//! the hover class:
//!
//! - **Enter**: ignored when the zone is disabled or no session is active.
//!   Otherwise the counter is incremented and the session target is set to
//!   this zone's container and the entered element. On 0 -> 1 the hover
//!   classes are added and `on_drag_enter` runs.
//! - **Over**: `on_drag_over` runs on every over event; the native drop effect
//!   is set to `move`. Touch moves are debounced: one call after
//!   [`TOUCH_OVER_DEBOUNCE_MS`] without further movement.
//! - **Leave**: the counter is decremented. On 1 -> 0 the hover classes are
//!   removed, the session target is cleared if it still points into this
//!   zone, and `on_drag_leave` runs.
//! - **Drop**: ignored when disabled or idle. Otherwise hover is cleared, the
//!   payload on the native transfer channel (if any) replaces the session's
//!   item, and `on_drop` runs. An asynchronous drop callback is handed to
//!   [`DndHost::spawn_local`](crate::host::DndHost::spawn_local).
//!
//! Every zone also listens for the drag-start signal and resets its hover
//! bookkeeping when any drag starts.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::de::DeserializeOwned;

use crate::adapter::{Modality, ZONE_EVENTS, ZoneGesture, zone_gesture};
use crate::context::{DndContext, InstanceId};
use crate::event::InputEvent;
use crate::hover::{EntryCounter, HoverTransition};
use crate::host::{DndHost, Listener, ListenerId, TimerId, add_classes, remove_classes};
use crate::options::{ClassNames, DragDropOptions};
use crate::signal::Subscription;
use crate::transfer::DropEffect;

/// Quiet period after the last touch move before `on_drag_over` runs.
pub const TOUCH_OVER_DEBOUNCE_MS: u64 = 100;

struct ZoneInner<H: DndHost, T> {
    id: InstanceId,
    host: Rc<H>,
    context: DndContext<T, H::Element>,
    element: H::Element,
    options: RefCell<DragDropOptions<T, H::Element>>,
    counter: Cell<EntryCounter>,
    applied: RefCell<Option<ClassNames>>,
    debounce: Cell<Option<TimerId>>,
    listener: Cell<Option<ListenerId>>,
    subscription: RefCell<Option<Subscription>>,
}

/// Handle of an attached drop zone. Dropping it detaches the behavior.
pub struct DropZone<H: DndHost, T> {
    inner: Rc<ZoneInner<H, T>>,
}

impl<H: DndHost, T> core::fmt::Debug for DropZone<H, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DropZone")
            .field("id", &self.inner.id)
            .field("element", &self.inner.element)
            .field("counter", &self.inner.counter.get())
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

impl<H, T> DropZone<H, T>
where
    H: DndHost + 'static,
    T: Clone + DeserializeOwned + 'static,
{
    /// Attach the drop behavior to `element`.
    pub fn attach(
        host: Rc<H>,
        context: &DndContext<T, H::Element>,
        element: H::Element,
        options: DragDropOptions<T, H::Element>,
    ) -> Self {
        let inner = Rc::new(ZoneInner {
            id: context.next_instance_id(),
            host,
            context: context.clone(),
            element,
            options: RefCell::new(options),
            counter: Cell::new(EntryCounter::new()),
            applied: RefCell::new(None),
            debounce: Cell::new(None),
            listener: Cell::new(None),
            subscription: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let listener: Listener<H::Element> = Rc::new(move |event: &mut InputEvent<H::Element>| {
            if let Some(inner) = weak.upgrade() {
                inner.handle(event);
            }
        });
        let id = inner.host.listen(&inner.element, ZONE_EVENTS, listener);
        inner.listener.set(Some(id));

        let weak: Weak<ZoneInner<H, T>> = Rc::downgrade(&inner);
        let subscription = context.subscribe(move || {
            if let Some(inner) = weak.upgrade() {
                inner.reset_hover();
            }
        });
        *inner.subscription.borrow_mut() = Some(subscription);

        log::debug!(
            "drop zone {} attached to {:?} (container `{}`)",
            inner.id,
            inner.element,
            inner.options.borrow().container
        );
        Self { inner }
    }

    /// Replace the options.
    ///
    /// Classes already applied for the current hover are removed by the
    /// matching leave or drop, whatever the new options name.
    pub fn update(&self, options: DragDropOptions<T, H::Element>) {
        *self.inner.options.borrow_mut() = options;
        log::trace!("drop zone {} options updated", self.inner.id);
    }
}

impl<H: DndHost, T> DropZone<H, T> {
    /// Remove the listener and the signal subscription. Idempotent.
    pub fn detach(&self) {
        self.inner.detach();
    }

    /// Returns `true` until [`DropZone::detach`] has run.
    pub fn is_attached(&self) -> bool {
        self.inner.listener.get().is_some()
    }

    /// Returns `true` while the session hovers this zone.
    pub fn is_hovering(&self) -> bool {
        self.inner.counter.get().is_hovering()
    }

    /// Outstanding enters, for diagnostics.
    pub fn depth(&self) -> u32 {
        self.inner.counter.get().depth()
    }

    /// Element the behavior is attached to.
    pub fn element(&self) -> &H::Element {
        &self.inner.element
    }

    /// Diagnostic identifier of this behavior.
    pub fn instance_id(&self) -> InstanceId {
        self.inner.id
    }

    /// Read the current options.
    pub fn with_options<R>(&self, f: impl FnOnce(&DragDropOptions<T, H::Element>) -> R) -> R {
        f(&self.inner.options.borrow())
    }
}

impl<H: DndHost, T> Drop for DropZone<H, T> {
    fn drop(&mut self) {
        self.inner.detach();
    }
}

impl<H: DndHost, T> ZoneInner<H, T> {
    fn detach(&self) {
        let Some(id) = self.listener.take() else {
            return;
        };
        self.host.unlisten(id);
        if let Some(mut sub) = self.subscription.borrow_mut().take() {
            sub.cancel();
        }
        self.cancel_debounce();
        self.clear_hover_classes();
        self.counter.set(EntryCounter::new());
        let container = self.options.borrow().container.clone();
        if self.owns_target(&container) {
            self.context.clear_target();
            log::debug!("drop zone {} detached while targeted; target cleared", self.id);
        } else {
            log::debug!("drop zone {} detached", self.id);
        }
    }

    fn cancel_debounce(&self) {
        if let Some(timer) = self.debounce.take() {
            self.host.clear_timeout(timer);
        }
    }

    fn clear_hover_classes(&self) {
        if let Some(applied) = self.applied.borrow_mut().take() {
            remove_classes(&*self.host, &self.element, &applied);
        }
    }

    fn reset_hover(&self) {
        let mut counter = self.counter.get();
        let was_hovering = counter.reset();
        self.counter.set(counter);
        self.cancel_debounce();
        self.clear_hover_classes();
        let configured = self.options.borrow().attributes.drag_over_class.clone();
        remove_classes(&*self.host, &self.element, &configured);
        if was_hovering {
            log::trace!("drop zone {} hover reset by drag start", self.id);
        }
    }

    /// Returns `true` if the recorded target belongs to this zone.
    fn owns_target(&self, container: &str) -> bool {
        self.context.with_state(|s| {
            s.target_container.as_deref() == Some(container)
                && s
                    .drag_over_element
                    .as_ref()
                    .is_some_and(|el| self.host.contains(&self.element, el))
        })
    }
}

impl<H, T> ZoneInner<H, T>
where
    H: DndHost + 'static,
    T: Clone + DeserializeOwned + 'static,
{
    fn handle(self: &Rc<Self>, event: &mut InputEvent<H::Element>) {
        let hovering = self.counter.get().is_hovering();
        let Some(gesture) = zone_gesture(event, hovering) else {
            return;
        };
        log::trace!("drop zone {} <- {}", self.id, event.kind);
        match gesture {
            ZoneGesture::Enter(_) => self.enter(event),
            ZoneGesture::Over(modality) => self.over(event, modality),
            ZoneGesture::Leave(_) => self.leave(),
            ZoneGesture::Drop(modality) => self.accept_drop(event, modality),
        }
    }

    fn accepts(&self, options: &DragDropOptions<T, H::Element>) -> bool {
        if options.disabled {
            log::trace!("drop zone {} is disabled", self.id);
            return false;
        }
        self.context.is_dragging()
    }

    fn enter(&self, event: &mut InputEvent<H::Element>) {
        let options = self.options.borrow().clone();
        if !self.accepts(&options) {
            return;
        }
        let mut counter = self.counter.get();
        let transition = counter.enter();
        self.counter.set(counter);
        self.context
            .set_target(&options.container, event.target.clone());
        if transition == Some(HoverTransition::Entered) {
            let classes = options.attributes.drag_over_class.clone();
            add_classes(&*self.host, &self.element, &classes);
            *self.applied.borrow_mut() = Some(classes);
            let state = self.context.snapshot();
            options.callbacks.emit_drag_enter(&state);
        }
        event.prevent_default();
    }

    fn over(self: &Rc<Self>, event: &mut InputEvent<H::Element>, modality: Modality) {
        let options = self.options.borrow().clone();
        if !self.accepts(&options) {
            return;
        }
        event.prevent_default();
        match modality {
            Modality::Native => {
                if let Some(dt) = event.data_transfer.as_mut() {
                    dt.drop_effect = DropEffect::Move;
                }
                let state = self.context.snapshot();
                options.callbacks.emit_drag_over(&state);
            }
            Modality::Pointer(_) => {
                let moved = self.context.with_state(|s| {
                    s.drag_over_element.as_ref() != Some(&event.target)
                });
                if moved {
                    self.context
                        .set_target(&options.container, event.target.clone());
                }
                if modality.is_touch() {
                    self.schedule_over();
                } else {
                    let state = self.context.snapshot();
                    options.callbacks.emit_drag_over(&state);
                }
            }
        }
    }

    fn schedule_over(self: &Rc<Self>) {
        self.cancel_debounce();
        let weak = Rc::downgrade(self);
        let timer = self.host.set_timeout(
            TOUCH_OVER_DEBOUNCE_MS,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.debounced_over();
                }
            }),
        );
        self.debounce.set(Some(timer));
    }

    fn debounced_over(&self) {
        self.debounce.set(None);
        if !self.counter.get().is_hovering() {
            return;
        }
        let options = self.options.borrow().clone();
        if !self.accepts(&options) {
            return;
        }
        let state = self.context.snapshot();
        options.callbacks.emit_drag_over(&state);
    }

    fn leave(&self) {
        let mut counter = self.counter.get();
        let transition = counter.leave();
        self.counter.set(counter);
        if transition != Some(HoverTransition::Left) {
            return;
        }
        self.cancel_debounce();
        self.clear_hover_classes();
        let options = self.options.borrow().clone();
        if self.owns_target(&options.container) {
            self.context.clear_target();
        }
        let state = self.context.snapshot();
        options.callbacks.emit_drag_leave(&state);
    }

    fn accept_drop(&self, event: &mut InputEvent<H::Element>, modality: Modality) {
        let options = self.options.borrow().clone();
        if !self.accepts(&options) {
            return;
        }
        event.prevent_default();
        self.counter.set(EntryCounter::new());
        self.cancel_debounce();
        self.clear_hover_classes();

        if let Some(dt) = &event.data_transfer {
            match dt.read_payload::<T>() {
                Ok(Some(item)) => self.context.set_item(item),
                Ok(None) => {}
                Err(err) => log::warn!("drop zone {}: drop handling failed: {err}", self.id),
            }
        }

        let state = self.context.snapshot();
        if let Some(future) = options.callbacks.emit_drop(&state) {
            self.host.spawn_local(future);
        }
        log::debug!(
            "drop zone {} accepted drop ({modality:?}) into `{}`",
            self.id,
            options.container
        );
    }
}
