// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session state: the single record describing the in-progress drag.
//!
//! ## Overview
//!
//! [`DndState`] is plain data. It performs no validation of its own; the
//! [`DragSource`](crate::source::DragSource) and [`DropZone`](crate::zone::DropZone)
//! behaviors are responsible for keeping it consistent:
//!
//! - When `is_dragging` is false, `dragged_item`, `source_container`,
//!   `target_container` and `drag_over_element` are all cleared.
//! - `target_container` is only set while `is_dragging` is true.
//! - At most one session is active; starting a new one overwrites the old one.
//!
//! Callbacks receive a `&DndState` snapshot taken at the moment of the call.
//!
//! ```
//! use understory_dnd::state::DndState;
//!
//! let mut state: DndState<u32, ()> = DndState::new();
//! assert!(state.is_cleared());
//!
//! state.begin(Some(7), "list-a");
//! state.set_target("list-b", ());
//! assert_eq!(state.target_container.as_deref(), Some("list-b"));
//! assert!(state.holds_invariants());
//!
//! state.reset();
//! assert!(state.is_cleared());
//! ```

/// Shared record describing the in-progress drag session (or its absence).
///
/// `T` is the payload type carried by the drag; `E` is the host's element
/// handle type, used for the exact element currently under the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct DndState<T, E> {
    /// True strictly between a drag start and its matching end.
    pub is_dragging: bool,
    /// The logical data being carried.
    pub dragged_item: Option<T>,
    /// Container the drag originated from; empty when no drag is active.
    pub source_container: String,
    /// Container currently hovered, if any.
    pub target_container: Option<String>,
    /// The exact element under the pointer while hovering a drop zone.
    pub drag_over_element: Option<E>,
}

impl<T, E> Default for DndState<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> DndState<T, E> {
    /// Create the cleared state.
    pub const fn new() -> Self {
        Self {
            is_dragging: false,
            dragged_item: None,
            source_container: String::new(),
            target_container: None,
            drag_over_element: None,
        }
    }

    /// Returns `true` if every field is in its cleared form.
    pub fn is_cleared(&self) -> bool {
        !self.is_dragging
            && self.dragged_item.is_none()
            && self.source_container.is_empty()
            && self.target_container.is_none()
            && self.drag_over_element.is_none()
    }

    /// Returns `true` if the session invariants hold for this record.
    ///
    /// An idle record must be fully cleared; an active record may carry any
    /// combination of payload and target.
    pub fn holds_invariants(&self) -> bool {
        self.is_dragging || self.is_cleared()
    }

    /// Publish a new session, overwriting whatever was there.
    ///
    /// Returns `true` if a previous session was still marked active, i.e. the
    /// call was an implicit abort-and-restart.
    pub fn begin(&mut self, item: Option<T>, source_container: &str) -> bool {
        let aborted = self.is_dragging;
        self.is_dragging = true;
        self.dragged_item = item;
        self.source_container.clear();
        self.source_container.push_str(source_container);
        self.target_container = None;
        self.drag_over_element = None;
        aborted
    }

    /// Record the hovered container and the exact hovered element.
    pub fn set_target(&mut self, container: &str, element: E) {
        self.target_container = Some(container.into());
        self.drag_over_element = Some(element);
    }

    /// Clear the hovered container and element.
    pub fn clear_target(&mut self) {
        self.target_container = None;
        self.drag_over_element = None;
    }

    /// Reset to the cleared form.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
