// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag source: the behavior attached to an element that can be dragged.
//!
//! ## Lifecycle
//!
//! 1) [`DragSource::attach`] registers one listener for [`SOURCE_EVENTS`] and
//!    sets the element's native draggable flag.
//! 2) On interaction start the source publishes the session into the
//!    [`DndContext`], writes the payload to the native transfer channel, adds
//!    the dragging classes, calls `on_drag_start` and raises the drag-start
//!    signal, in that order.
//! 3) On interaction end it removes the dragging classes, calls `on_drag_end`
//!    with the state as it was before clearing, then resets the session,
//!    whether or not a drop happened.
//!
//! ## Pointer input
//!
//! A pointer start captures the pointer to the source element and records
//! the press position; the capture lets the source see the matching release
//! wherever it happens. The release is handled in a microtask, so drop zones
//! on the same pointer-up run first and see the live session.
//!
//! A mouse or pen press that started a pointer drag may turn into a native
//! drag. The `dragstart` that follows takes the drag over: the pointer
//! capture is released and the payload is written, without a second
//! `on_drag_start` or signal.
//!
//! ## Interactive descendants
//!
//! A start whose origin lies inside a descendant matching one of the
//! `interactive` selectors is ignored. For native drags the origin is the
//! target of the preceding pointer-down, since `dragstart` itself is aimed at
//! the draggable element; the drag is then cancelled with `prevent_default`.
//!
//! ## Aborted sessions
//!
//! When another source starts a drag while this one is still active (its end
//! event never arrived), the drag-start signal tells this source to drop its
//! stale bookkeeping. A late end event for the abandoned drag is then ignored
//! and cannot clear the new session.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use kurbo::{Point, Vec2};
use serde::Serialize;

use crate::adapter::{Modality, SOURCE_EVENTS, SourceGesture, source_gesture};
use crate::context::{DndContext, InstanceId};
use crate::event::InputEvent;
use crate::host::{DndHost, Listener, ListenerId, add_classes, remove_classes};
use crate::options::{ClassNames, DragDropOptions};
use crate::signal::Subscription;
use crate::transfer::EffectAllowed;

/// Press and latest position of the pointer driving a drag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerTrack {
    /// Pointer the drag follows.
    pub pointer_id: u64,
    /// Position at interaction start.
    pub start: Point,
    /// Latest reported position.
    pub last: Point,
}

impl PointerTrack {
    /// Start tracking `pointer_id` at `position`.
    pub const fn new(pointer_id: u64, position: Point) -> Self {
        Self {
            pointer_id,
            start: position,
            last: position,
        }
    }

    /// Record a move. Returns the delta since the previous position.
    pub fn update(&mut self, position: Point) -> Vec2 {
        let delta = position - self.last;
        self.last = position;
        delta
    }

    /// Offset of the latest position from the start.
    pub fn total_offset(&self) -> Vec2 {
        self.last - self.start
    }
}

#[derive(Debug)]
struct ActiveDrag {
    modality: Modality,
    classes: ClassNames,
    track: Option<PointerTrack>,
}

struct SourceInner<H: DndHost, T> {
    id: InstanceId,
    host: Rc<H>,
    context: DndContext<T, H::Element>,
    element: H::Element,
    options: RefCell<DragDropOptions<T, H::Element>>,
    active: RefCell<Option<ActiveDrag>>,
    press_origin: RefCell<Option<H::Element>>,
    starting: Cell<bool>,
    listener: Cell<Option<ListenerId>>,
    subscription: RefCell<Option<Subscription>>,
}

/// Handle of an attached drag source. Dropping it detaches the behavior.
pub struct DragSource<H: DndHost, T> {
    inner: Rc<SourceInner<H, T>>,
}

impl<H: DndHost, T> core::fmt::Debug for DragSource<H, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DragSource")
            .field("id", &self.inner.id)
            .field("element", &self.inner.element)
            .field("active", &*self.inner.active.borrow())
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

impl<H, T> DragSource<H, T>
where
    H: DndHost + 'static,
    T: Clone + Serialize + 'static,
{
    /// Attach the drag behavior to `element`.
    pub fn attach(
        host: Rc<H>,
        context: &DndContext<T, H::Element>,
        element: H::Element,
        options: DragDropOptions<T, H::Element>,
    ) -> Self {
        host.set_draggable(&element, options.native_draggable());
        let inner = Rc::new(SourceInner {
            id: context.next_instance_id(),
            host,
            context: context.clone(),
            element,
            options: RefCell::new(options),
            active: RefCell::new(None),
            press_origin: RefCell::new(None),
            starting: Cell::new(false),
            listener: Cell::new(None),
            subscription: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let listener: Listener<H::Element> = Rc::new(move |event: &mut InputEvent<H::Element>| {
            if let Some(inner) = weak.upgrade() {
                inner.handle(event);
            }
        });
        let id = inner.host.listen(&inner.element, SOURCE_EVENTS, listener);
        inner.listener.set(Some(id));

        let weak: Weak<SourceInner<H, T>> = Rc::downgrade(&inner);
        let subscription = context.subscribe(move || {
            if let Some(inner) = weak.upgrade() {
                inner.on_drag_start_signal();
            }
        });
        *inner.subscription.borrow_mut() = Some(subscription);

        log::debug!(
            "drag source {} attached to {:?} (container `{}`)",
            inner.id,
            inner.element,
            inner.options.borrow().container
        );
        Self { inner }
    }

    /// Replace the options and re-derive the native draggable flag.
    ///
    /// A drag in flight is not aborted, even if the new options disable the
    /// source; its end removes the classes that were applied at its start.
    pub fn update(&self, options: DragDropOptions<T, H::Element>) {
        let draggable = options.native_draggable();
        *self.inner.options.borrow_mut() = options;
        self.inner.host.set_draggable(&self.inner.element, draggable);
        log::trace!("drag source {} options updated", self.inner.id);
    }
}

impl<H: DndHost, T> DragSource<H, T> {
    /// Remove the listener and the signal subscription. Idempotent.
    ///
    /// Detaching during a drag abandons it: the dragging classes are removed,
    /// the pointer capture is released and the session is reset without an
    /// `on_drag_end` call.
    pub fn detach(&self) {
        self.inner.detach();
    }

    /// Returns `true` until [`DragSource::detach`] has run.
    pub fn is_attached(&self) -> bool {
        self.inner.listener.get().is_some()
    }

    /// Returns `true` between this source's start and end.
    pub fn is_active(&self) -> bool {
        self.inner.active.borrow().is_some()
    }

    /// Pointer positions of the active pointer drag, if any.
    pub fn pointer_track(&self) -> Option<PointerTrack> {
        self.inner.active.borrow().as_ref().and_then(|a| a.track)
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

impl<H: DndHost, T> Drop for DragSource<H, T> {
    fn drop(&mut self) {
        self.inner.detach();
    }
}

impl<H: DndHost, T> SourceInner<H, T> {
    fn detach(&self) {
        let Some(id) = self.listener.take() else {
            return;
        };
        self.host.unlisten(id);
        if let Some(mut sub) = self.subscription.borrow_mut().take() {
            sub.cancel();
        }
        self.press_origin.borrow_mut().take();
        let active = self.active.borrow_mut().take();
        if let Some(active) = active {
            self.discard(active);
            self.context.reset();
            log::debug!("drag source {} detached mid-drag; session abandoned", self.id);
        } else {
            log::debug!("drag source {} detached", self.id);
        }
    }

    fn on_drag_start_signal(&self) {
        if self.starting.get() {
            return;
        }
        let stale = self.active.borrow_mut().take();
        if let Some(active) = stale {
            self.discard(active);
            log::debug!(
                "drag source {} superseded by a new drag; stale session dropped",
                self.id
            );
        }
    }

    /// Undo what a start applied to the element: classes and pointer capture.
    fn discard(&self, active: ActiveDrag) {
        remove_classes(&*self.host, &self.element, &active.classes);
        if let Some(track) = active.track {
            self.host.release_pointer(&self.element, track.pointer_id);
        }
    }

    fn is_excluded(&self, origin: &H::Element, selectors: &[String]) -> bool {
        selectors
            .iter()
            .any(|selector| self.host.closest(origin, &self.element, selector))
    }
}

impl<H, T> SourceInner<H, T>
where
    H: DndHost + 'static,
    T: Clone + Serialize + 'static,
{
    fn handle(self: &Rc<Self>, event: &mut InputEvent<H::Element>) {
        let Some(gesture) = source_gesture(event) else {
            return;
        };
        log::trace!("drag source {} <- {}", self.id, event.kind);
        match gesture {
            SourceGesture::Start(modality) => self.start(event, modality),
            SourceGesture::Move(_) => self.track_move(event),
            SourceGesture::End(modality) => self.end(event, modality),
        }
    }

    fn start(&self, event: &mut InputEvent<H::Element>, modality: Modality) {
        let origin = match modality {
            Modality::Native => self
                .press_origin
                .borrow_mut()
                .take()
                .unwrap_or_else(|| event.target.clone()),
            Modality::Pointer(_) => {
                *self.press_origin.borrow_mut() = Some(event.target.clone());
                event.target.clone()
            }
        };

        let options = self.options.borrow().clone();
        if options.disabled {
            log::debug!("drag source {} is disabled; {} ignored", self.id, event.kind);
            return;
        }
        if !modality.allowed_by(options.input) {
            return;
        }
        if self.is_excluded(&origin, &options.interactive) {
            log::debug!(
                "drag source {}: {} on interactive descendant {:?} ignored",
                self.id,
                event.kind,
                origin
            );
            if modality == Modality::Native {
                event.prevent_default();
            }
            return;
        }
        let second_contact = self
            .active
            .borrow()
            .as_ref()
            .is_some_and(|a| a.modality.is_pointer() && modality.is_pointer());
        if second_contact {
            log::debug!("drag source {}: extra pointer ignored", self.id);
            return;
        }
        if modality == Modality::Native && self.take_over_pointer_drag() {
            self.write_transfer(event, &options);
            log::debug!(
                "drag source {}: native drag took over the pointer drag",
                self.id
            );
            return;
        }
        if let Some(stale) = self.active.borrow_mut().take() {
            self.discard(stale);
        }

        self.context
            .begin(options.drag_data.clone(), &options.container);

        if modality == Modality::Native {
            self.write_transfer(event, &options);
        }

        let classes = options.attributes.dragging_class.clone();
        add_classes(&*self.host, &self.element, &classes);

        let mut track = None;
        if modality.is_pointer()
            && let Some(pointer) = event.pointer
        {
            self.host.capture_pointer(&self.element, pointer.id);
            track = Some(PointerTrack::new(pointer.id, event.position));
        }
        if modality.is_touch() {
            event.prevent_default();
        }
        *self.active.borrow_mut() = Some(ActiveDrag {
            modality,
            classes,
            track,
        });

        let state = self.context.snapshot();
        options.callbacks.emit_drag_start(&state);

        self.starting.set(true);
        let notified = self.context.broadcast_drag_start();
        self.starting.set(false);
        log::debug!(
            "drag source {} started ({modality:?}) from `{}`; {notified} listeners signalled",
            self.id,
            options.container
        );
    }

    /// A mouse or pen press that started a pointer drag is followed by
    /// `dragstart` when the platform turns it into a native drag. The session
    /// is already published; the drag switches to the native channel and
    /// gives up the pointer capture.
    fn take_over_pointer_drag(&self) -> bool {
        let mut active = self.active.borrow_mut();
        let Some(drag) = active
            .as_mut()
            .filter(|a| a.modality.is_pointer() && !a.modality.is_touch())
        else {
            return false;
        };
        drag.modality = Modality::Native;
        if let Some(track) = drag.track.take() {
            self.host.release_pointer(&self.element, track.pointer_id);
        }
        true
    }

    fn write_transfer(
        &self,
        event: &mut InputEvent<H::Element>,
        options: &DragDropOptions<T, H::Element>,
    ) {
        let Some(dt) = event.data_transfer.as_mut() else {
            return;
        };
        dt.effect_allowed = EffectAllowed::Move;
        if let Some(data) = &options.drag_data
            && let Err(err) = dt.write_payload(data)
        {
            log::warn!("drag source {}: payload not written: {err}", self.id);
        }
    }

    fn track_move(&self, event: &InputEvent<H::Element>) {
        let Some(pointer) = event.pointer else {
            return;
        };
        if let Some(track) = self
            .active
            .borrow_mut()
            .as_mut()
            .and_then(|a| a.track.as_mut())
            && track.pointer_id == pointer.id
        {
            track.update(event.position);
        }
    }

    fn end(self: &Rc<Self>, event: &mut InputEvent<H::Element>, modality: Modality) {
        if modality.is_pointer() {
            self.press_origin.borrow_mut().take();
        }
        let pointer_id = event.pointer.map(|p| p.id);
        let Some(active) = self.active.borrow_mut().take_if(|a| {
            a.modality.same_family(modality)
                && a.track.is_none_or(|t| Some(t.pointer_id) == pointer_id)
        }) else {
            return;
        };

        match modality {
            Modality::Native => self.finish(active),
            Modality::Pointer(_) => {
                if let Some(track) = active.track {
                    self.host.release_pointer(&self.element, track.pointer_id);
                }
                if modality.is_touch() {
                    event.prevent_default();
                }
                let weak = Rc::downgrade(self);
                self.host.queue_microtask(Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.finish(active);
                    }
                }));
            }
        }
    }

    fn finish(&self, active: ActiveDrag) {
        remove_classes(&*self.host, &self.element, &active.classes);
        let callbacks = self.options.borrow().callbacks.clone();
        let state = self.context.snapshot();
        callbacks.emit_drag_end(&state);
        self.context.reset();
        log::debug!("drag source {} ended ({:?})", self.id, active.modality);
    }
}
