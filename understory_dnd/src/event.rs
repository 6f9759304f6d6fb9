// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events delivered by the host to attached behaviors.
//!
//! ## Overview
//!
//! Both input families share one event type. Native drag events
//! (`DragStart` .. `DragEnd`) may carry a [`DataTransfer`]; pointer events
//! carry [`PointerInfo`]. Touch input is the pointer family with
//! [`PointerType::Touch`].
//!
//! [`EventKinds`] is the set type used when registering listeners with a
//! [`DndHost`](crate::host::DndHost).

use kurbo::Point;

use crate::transfer::DataTransfer;

/// Kind of an input event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Native drag started on the source.
    DragStart,
    /// Native drag entered an element (bubbles).
    DragEnter,
    /// Native drag is over an element (bubbles, repeats).
    DragOver,
    /// Native drag left an element (bubbles).
    DragLeave,
    /// Native drop on an element (bubbles).
    Drop,
    /// Native drag finished on the source, dropped or not.
    DragEnd,
    /// Pointer pressed (touch start for touch pointers).
    PointerDown,
    /// Pointer moved.
    PointerMove,
    /// Pointer released (touch end for touch pointers).
    PointerUp,
    /// Pointer stream cancelled by the platform.
    PointerCancel,
    /// Pointer entered an element's box; fired per element, does not bubble.
    PointerEnter,
    /// Pointer left an element's box; fired per element, does not bubble.
    PointerLeave,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::DragStart,
        Self::DragEnter,
        Self::DragOver,
        Self::DragLeave,
        Self::Drop,
        Self::DragEnd,
        Self::PointerDown,
        Self::PointerMove,
        Self::PointerUp,
        Self::PointerCancel,
        Self::PointerEnter,
        Self::PointerLeave,
    ];

    /// Returns `true` if the event propagates to ancestors after its target.
    pub const fn bubbles(self) -> bool {
        !matches!(self, Self::PointerEnter | Self::PointerLeave)
    }

    /// Returns `true` for the native drag family.
    pub const fn is_native_drag(self) -> bool {
        matches!(
            self,
            Self::DragStart
                | Self::DragEnter
                | Self::DragOver
                | Self::DragLeave
                | Self::Drop
                | Self::DragEnd
        )
    }

    /// Conventional lower-case event name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DragStart => "dragstart",
            Self::DragEnter => "dragenter",
            Self::DragOver => "dragover",
            Self::DragLeave => "dragleave",
            Self::Drop => "drop",
            Self::DragEnd => "dragend",
            Self::PointerDown => "pointerdown",
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::PointerCancel => "pointercancel",
            Self::PointerEnter => "pointerenter",
            Self::PointerLeave => "pointerleave",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// A set of [`EventKind`]s, used to register listeners.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventKinds: u16 {
        /// [`EventKind::DragStart`].
        const DRAG_START     = 1 << 0;
        /// [`EventKind::DragEnter`].
        const DRAG_ENTER     = 1 << 1;
        /// [`EventKind::DragOver`].
        const DRAG_OVER      = 1 << 2;
        /// [`EventKind::DragLeave`].
        const DRAG_LEAVE     = 1 << 3;
        /// [`EventKind::Drop`].
        const DROP           = 1 << 4;
        /// [`EventKind::DragEnd`].
        const DRAG_END       = 1 << 5;
        /// [`EventKind::PointerDown`].
        const POINTER_DOWN   = 1 << 6;
        /// [`EventKind::PointerMove`].
        const POINTER_MOVE   = 1 << 7;
        /// [`EventKind::PointerUp`].
        const POINTER_UP     = 1 << 8;
        /// [`EventKind::PointerCancel`].
        const POINTER_CANCEL = 1 << 9;
        /// [`EventKind::PointerEnter`].
        const POINTER_ENTER  = 1 << 10;
        /// [`EventKind::PointerLeave`].
        const POINTER_LEAVE  = 1 << 11;
    }
}

impl From<EventKind> for EventKinds {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::DragStart => Self::DRAG_START,
            EventKind::DragEnter => Self::DRAG_ENTER,
            EventKind::DragOver => Self::DRAG_OVER,
            EventKind::DragLeave => Self::DRAG_LEAVE,
            EventKind::Drop => Self::DROP,
            EventKind::DragEnd => Self::DRAG_END,
            EventKind::PointerDown => Self::POINTER_DOWN,
            EventKind::PointerMove => Self::POINTER_MOVE,
            EventKind::PointerUp => Self::POINTER_UP,
            EventKind::PointerCancel => Self::POINTER_CANCEL,
            EventKind::PointerEnter => Self::POINTER_ENTER,
            EventKind::PointerLeave => Self::POINTER_LEAVE,
        }
    }
}

impl EventKinds {
    /// Returns `true` if `kind` is in the set.
    pub fn has(self, kind: EventKind) -> bool {
        self.contains(Self::from(kind))
    }
}

/// Kind of device behind a pointer event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerType {
    /// Mouse or trackpad.
    #[default]
    Mouse,
    /// Stylus.
    Pen,
    /// Finger on a touch surface.
    Touch,
}

/// Identity and device of the pointer behind an event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PointerInfo {
    /// Host-assigned pointer identifier, stable for one press-move-release.
    pub id: u64,
    /// Device kind.
    pub pointer_type: PointerType,
}

impl PointerInfo {
    /// The primary mouse pointer.
    pub const MOUSE: Self = Self {
        id: 1,
        pointer_type: PointerType::Mouse,
    };

    /// A touch contact with the given identifier.
    pub const fn touch(id: u64) -> Self {
        Self {
            id,
            pointer_type: PointerType::Touch,
        }
    }

    /// A pen contact with the given identifier.
    pub const fn pen(id: u64) -> Self {
        Self {
            id,
            pointer_type: PointerType::Pen,
        }
    }
}

/// One input event, as delivered to listeners.
#[derive(Clone, Debug)]
pub struct InputEvent<E> {
    /// What happened.
    pub kind: EventKind,
    /// Element the event was dispatched at.
    pub target: E,
    /// Element whose listener is currently running; set by the host.
    pub current_target: Option<E>,
    /// Pointer position in host coordinates.
    pub position: Point,
    /// Pointer identity, for the pointer family.
    pub pointer: Option<PointerInfo>,
    /// Host timestamp in milliseconds.
    pub time_ms: u64,
    /// Transfer channel, for the native drag family.
    pub data_transfer: Option<DataTransfer>,
    /// Set by [`InputEvent::prevent_default`].
    pub default_prevented: bool,
    /// Set by [`InputEvent::stop_propagation`].
    pub propagation_stopped: bool,
}

impl<E> InputEvent<E> {
    /// Create an event of `kind` aimed at `target`.
    pub fn new(kind: EventKind, target: E) -> Self {
        Self {
            kind,
            target,
            current_target: None,
            position: Point::ZERO,
            pointer: None,
            time_ms: 0,
            data_transfer: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Set the pointer position.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Attach pointer identity.
    pub fn with_pointer(mut self, pointer: PointerInfo) -> Self {
        self.pointer = Some(pointer);
        self
    }

    /// Set the timestamp.
    pub fn at_time(mut self, time_ms: u64) -> Self {
        self.time_ms = time_ms;
        self
    }

    /// Attach a transfer channel.
    pub fn with_data_transfer(mut self, data_transfer: DataTransfer) -> Self {
        self.data_transfer = Some(data_transfer);
        self
    }

    /// Cancel the host's default handling of this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop propagation to further elements.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Device kind of the pointer, or [`PointerType::Mouse`] when absent.
    pub fn pointer_type(&self) -> PointerType {
        self.pointer.map(|p| p.pointer_type).unwrap_or_default()
    }
}
