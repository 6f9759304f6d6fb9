// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input adapter: one state machine, two input families.
//!
//! ## Overview
//!
//! The behaviors do not branch on raw event kinds. Each [`InputEvent`] is first
//! classified into a [`SourceGesture`] or a [`ZoneGesture`] tagged with the
//! [`Modality`] it arrived through; the state machines in
//! [`source`](crate::source) and [`zone`](crate::zone) only see gestures.
//!
//! | Event           | Source gesture      | Zone gesture                     |
//! |-----------------|---------------------|----------------------------------|
//! | `DragStart`     | `Start(Native)`     |                                  |
//! | `DragEnd`       | `End(Native)`       |                                  |
//! | `DragEnter`     |                     | `Enter`                          |
//! | `DragOver`      |                     | `Over`                           |
//! | `DragLeave`     |                     | `Leave`                          |
//! | `Drop`          |                     | `Drop`                           |
//! | `PointerDown`   | `Start(Pointer(_))` |                                  |
//! | `PointerUp`     | `End(Pointer(_))`   | `Drop` while hovering            |
//! | `PointerCancel` | `End(Pointer(_))`   |                                  |
//! | `PointerEnter`  |                     | `Enter`                          |
//! | `PointerMove`   | `Move(Pointer(_))`  | `Over` if hovering, else `Enter` |
//! | `PointerLeave`  |                     | `Leave`                          |

use crate::event::{EventKind, EventKinds, InputEvent, PointerType};
use crate::options::InputModes;

/// Input family an interaction arrived through.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Modality {
    /// Native drag events with a transfer channel.
    Native,
    /// Pointer events from the given device.
    Pointer(PointerType),
}

impl Modality {
    /// Modality of `event`, judged from its kind and pointer device.
    pub fn of<E>(event: &InputEvent<E>) -> Self {
        if event.kind.is_native_drag() {
            Self::Native
        } else {
            Self::Pointer(event.pointer_type())
        }
    }

    /// Returns `true` for touch pointers.
    pub const fn is_touch(self) -> bool {
        matches!(self, Self::Pointer(PointerType::Touch))
    }

    /// Returns `true` for any pointer device.
    pub const fn is_pointer(self) -> bool {
        matches!(self, Self::Pointer(_))
    }

    /// Returns `true` if `modes` lets this modality start a drag.
    pub fn allowed_by(self, modes: InputModes) -> bool {
        match self {
            Self::Native => modes.contains(InputModes::NATIVE),
            Self::Pointer(PointerType::Touch) => modes.contains(InputModes::TOUCH),
            Self::Pointer(_) => modes.contains(InputModes::POINTER),
        }
    }

    /// Returns `true` if both modalities belong to the same family.
    pub const fn same_family(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Native, Self::Native) | (Self::Pointer(_), Self::Pointer(_))
        )
    }
}

/// What a drag source should do with an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SourceGesture {
    /// Interaction start.
    Start(Modality),
    /// Pointer moved; only meaningful while a pointer drag is active.
    Move(Modality),
    /// Interaction end, dropped or not.
    End(Modality),
}

/// What a drop zone should do with an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ZoneGesture {
    /// The session entered the zone or one of its descendants.
    Enter(Modality),
    /// The session is over the zone.
    Over(Modality),
    /// The session left the zone or one of its descendants.
    Leave(Modality),
    /// The payload was released over the zone.
    Drop(Modality),
}

/// Event kinds a drag source listens to.
pub const SOURCE_EVENTS: EventKinds = EventKinds::DRAG_START
    .union(EventKinds::DRAG_END)
    .union(EventKinds::POINTER_DOWN)
    .union(EventKinds::POINTER_MOVE)
    .union(EventKinds::POINTER_UP)
    .union(EventKinds::POINTER_CANCEL);

/// Event kinds a drop zone listens to.
pub const ZONE_EVENTS: EventKinds = EventKinds::DRAG_ENTER
    .union(EventKinds::DRAG_OVER)
    .union(EventKinds::DRAG_LEAVE)
    .union(EventKinds::DROP)
    .union(EventKinds::POINTER_ENTER)
    .union(EventKinds::POINTER_MOVE)
    .union(EventKinds::POINTER_LEAVE)
    .union(EventKinds::POINTER_UP);

/// Classify an event for a drag source.
pub fn source_gesture<E>(event: &InputEvent<E>) -> Option<SourceGesture> {
    let modality = Modality::of(event);
    match event.kind {
        EventKind::DragStart | EventKind::PointerDown => Some(SourceGesture::Start(modality)),
        EventKind::PointerMove => Some(SourceGesture::Move(modality)),
        EventKind::DragEnd | EventKind::PointerUp | EventKind::PointerCancel => {
            Some(SourceGesture::End(modality))
        }
        _ => None,
    }
}

/// Classify an event for a drop zone.
///
/// `hovering` is the zone's current hover state. A pointer up only drops on
/// a zone the pointer is inside of. A pointer move over a zone that is not
/// hovering counts as the enter: the pointer may already have been inside
/// when the drag started, and pointer enter does not fire again.
pub fn zone_gesture<E>(event: &InputEvent<E>, hovering: bool) -> Option<ZoneGesture> {
    let modality = Modality::of(event);
    match event.kind {
        EventKind::DragEnter | EventKind::PointerEnter => Some(ZoneGesture::Enter(modality)),
        EventKind::DragOver => Some(ZoneGesture::Over(modality)),
        EventKind::PointerMove if hovering => Some(ZoneGesture::Over(modality)),
        EventKind::PointerMove => Some(ZoneGesture::Enter(modality)),
        EventKind::DragLeave | EventKind::PointerLeave => Some(ZoneGesture::Leave(modality)),
        EventKind::Drop => Some(ZoneGesture::Drop(modality)),
        EventKind::PointerUp if hovering => Some(ZoneGesture::Drop(modality)),
        _ => None,
    }
}
