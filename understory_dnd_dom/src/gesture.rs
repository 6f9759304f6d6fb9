// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture drivers: turn "press here, move there, release" into the event
//! sequences a platform would deliver.
//!
//! ## Pointer
//!
//! [`Document::pointer_down`], [`Document::pointer_move`],
//! [`Document::pointer_up`] and [`Document::pointer_cancel`] hit-test the
//! position, fire `pointerleave`/`pointerenter` for every element the pointer
//! crossed, then dispatch the pointer event at the hit element. Releasing or
//! cancelling a pointer drops its capture; a lifted touch contact also leaves
//! every element it was over.
//!
//! ## Native
//!
//! [`Document::start_native_drag`] presses on an element and fires
//! `dragstart` at its closest draggable ancestor. An accepted start cancels
//! the press with `pointercancel` and drops the pointer's capture. The
//! returned [`NativeDrag`] fires `dragenter`/`dragleave`/`dragover` as it
//! moves and `drop`/`dragend` when released. Handlers of enter/over/leave see a protected view of the
//! transfer. Dropping a [`NativeDrag`] without releasing it models a drag
//! whose `dragend` never arrives.

use kurbo::Point;
use understory_dnd::event::{EventKind, InputEvent, PointerInfo, PointerType};
use understory_dnd::host::DndHost;
use understory_dnd::transfer::{DataTransfer, DropEffect};

use crate::document::Document;
use crate::hover::Boundary;
use crate::types::NodeId;

impl Document {
    /// Press `pointer` at `at`.
    pub fn pointer_down(&self, pointer: PointerInfo, at: Point) -> Option<InputEvent<NodeId>> {
        self.pointer_event(EventKind::PointerDown, pointer, at)
    }

    /// Move `pointer` to `at`.
    pub fn pointer_move(&self, pointer: PointerInfo, at: Point) -> Option<InputEvent<NodeId>> {
        self.pointer_event(EventKind::PointerMove, pointer, at)
    }

    /// Release `pointer` at `at`.
    pub fn pointer_up(&self, pointer: PointerInfo, at: Point) -> Option<InputEvent<NodeId>> {
        self.pointer_event(EventKind::PointerUp, pointer, at)
    }

    /// Cancel `pointer`'s stream at `at`.
    pub fn pointer_cancel(&self, pointer: PointerInfo, at: Point) -> Option<InputEvent<NodeId>> {
        self.pointer_event(EventKind::PointerCancel, pointer, at)
    }

    /// Elements the pointer is over, root first.
    pub fn hovered_path(&self, pointer_id: u64) -> Vec<NodeId> {
        self.hover
            .borrow()
            .get(&pointer_id)
            .map(|h| h.current().to_vec())
            .unwrap_or_default()
    }

    fn pointer_event(
        &self,
        kind: EventKind,
        pointer: PointerInfo,
        at: Point,
    ) -> Option<InputEvent<NodeId>> {
        let hit = self.hit_test(at);
        let path = hit.map(|n| self.path(n)).unwrap_or_default();
        let ends_stream = matches!(kind, EventKind::PointerUp | EventKind::PointerCancel);

        if kind == EventKind::PointerCancel {
            self.cross(pointer, at, &[]);
        } else {
            self.cross(pointer, at, &path);
        }

        let target = hit.or_else(|| self.captured(pointer.id));
        let out = target.map(|target| {
            self.dispatch(
                InputEvent::new(kind, target)
                    .with_position(at)
                    .with_pointer(pointer),
            )
        });

        if ends_stream {
            if let Some(holder) = self.captured(pointer.id) {
                self.release_pointer(&holder, pointer.id);
            }
            if pointer.pointer_type == PointerType::Touch {
                self.cross(pointer, at, &[]);
            }
        }
        out
    }

    fn cross(&self, pointer: PointerInfo, at: Point, path: &[NodeId]) {
        let crossings = self
            .hover
            .borrow_mut()
            .entry(pointer.id)
            .or_default()
            .update(path);
        for crossing in crossings {
            let (kind, node) = match crossing {
                Boundary::Enter(n) => (EventKind::PointerEnter, n),
                Boundary::Leave(n) => (EventKind::PointerLeave, n),
            };
            self.dispatch(
                InputEvent::new(kind, node)
                    .with_position(at)
                    .with_pointer(pointer),
            );
        }
    }

    /// Press on `node` and start a native drag from its closest draggable
    /// ancestor (or itself).
    ///
    /// Returns `None` when nothing there is draggable or a `dragstart`
    /// handler cancelled the drag; the press is released in both cases.
    /// Otherwise the press is cancelled, as a platform does once its native
    /// drag takes over.
    pub fn start_native_drag(&self, node: NodeId, at: Point) -> Option<NativeDrag<'_>> {
        let press = |kind| {
            self.dispatch(
                InputEvent::new(kind, node)
                    .with_position(at)
                    .with_pointer(PointerInfo::MOUSE),
            )
        };
        press(EventKind::PointerDown);

        let source = self
            .path(node)
            .into_iter()
            .rev()
            .find(|n| self.is_draggable(*n));
        let Some(source) = source else {
            press(EventKind::PointerUp);
            return None;
        };
        let start = self.dispatch(
            InputEvent::new(EventKind::DragStart, source)
                .with_position(at)
                .with_data_transfer(DataTransfer::new()),
        );
        if start.default_prevented {
            log::debug!("native drag from {source} cancelled by a dragstart handler");
            press(EventKind::PointerUp);
            return None;
        }
        // The native drag now owns the press; the pointer stream ends here.
        press(EventKind::PointerCancel);
        if let Some(holder) = self.captured(PointerInfo::MOUSE.id) {
            self.release_pointer(&holder, PointerInfo::MOUSE.id);
        }
        Some(NativeDrag {
            doc: self,
            source,
            transfer: start.data_transfer.unwrap_or_default(),
            current: None,
            drop_allowed: false,
            position: at,
        })
    }
}

/// Result of releasing a [`NativeDrag`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragOutcome {
    /// Element that received `drop`, if the release was over a target that
    /// accepted the drag.
    pub dropped_on: Option<NodeId>,
    /// Effect reported to the source in `dragend`.
    pub effect: DropEffect,
}

/// A native drag in progress.
#[derive(Debug)]
pub struct NativeDrag<'a> {
    doc: &'a Document,
    source: NodeId,
    transfer: DataTransfer,
    current: Option<NodeId>,
    drop_allowed: bool,
    position: Point,
}

impl NativeDrag<'_> {
    /// Element that received `dragstart`.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// The transfer as written by the `dragstart` handlers.
    pub fn transfer(&self) -> &DataTransfer {
        &self.transfer
    }

    /// Element currently dragged over.
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Drag to `at`, hit-testing the target. Returns whether a drop there
    /// would be accepted.
    pub fn move_to(&mut self, at: Point) -> bool {
        self.position = at;
        match self.doc.hit_test(at) {
            Some(node) => self.over(node),
            None => {
                self.leave_document();
                false
            }
        }
    }

    /// Drag over `node`. Returns whether a drop there would be accepted.
    ///
    /// Crossing into a new element fires `dragenter` on it before `dragleave`
    /// on the previous one; `dragover` follows either way.
    pub fn over(&mut self, node: NodeId) -> bool {
        if self.current != Some(node) {
            let previous = self.current.replace(node);
            self.fire(EventKind::DragEnter, node, self.transfer.protected_view());
            if let Some(old) = previous {
                self.fire(EventKind::DragLeave, old, self.transfer.protected_view());
            }
        }
        let mut view = self.transfer.protected_view();
        view.drop_effect = DropEffect::None;
        let over = self.fire(EventKind::DragOver, node, view);
        self.drop_allowed = over.default_prevented;
        self.transfer.drop_effect = match over.data_transfer {
            Some(dt) if self.drop_allowed => dt.drop_effect,
            _ => DropEffect::None,
        };
        self.drop_allowed
    }

    /// Drag out of every element.
    pub fn leave_document(&mut self) {
        if let Some(old) = self.current.take() {
            self.fire(EventKind::DragLeave, old, self.transfer.protected_view());
        }
        self.drop_allowed = false;
        self.transfer.drop_effect = DropEffect::None;
    }

    /// Release: `drop` on an accepting target (or `dragleave` on a refusing
    /// one), then `dragend` on the source.
    pub fn release(mut self) -> DragOutcome {
        let mut dropped_on = None;
        if let Some(target) = self.current.take() {
            if self.drop_allowed {
                let transfer = self.transfer.clone();
                self.fire(EventKind::Drop, target, transfer);
                dropped_on = Some(target);
            } else {
                self.fire(EventKind::DragLeave, target, self.transfer.protected_view());
            }
        }
        let effect = if dropped_on.is_some() {
            self.transfer.drop_effect
        } else {
            DropEffect::None
        };
        let mut transfer = self.transfer.clone();
        transfer.drop_effect = effect;
        self.fire(EventKind::DragEnd, self.source, transfer);
        DragOutcome { dropped_on, effect }
    }

    fn fire(&self, kind: EventKind, target: NodeId, transfer: DataTransfer) -> InputEvent<NodeId> {
        self.doc.dispatch(
            InputEvent::new(kind, target)
                .with_position(self.position)
                .with_data_transfer(transfer),
        )
    }
}
