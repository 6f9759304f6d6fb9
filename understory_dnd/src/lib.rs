// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dnd --heading-base-level=0

//! Understory DnD: drag-and-drop behaviors for UI elements.
//!
//! ## Overview
//!
//! This crate provides two behaviors that attach to elements of a host UI:
//! a [`DragSource`](crate::source::DragSource) for elements that can be
//! dragged, and a [`DropZone`](crate::zone::DropZone) for elements that accept
//! drops. They coordinate through one [`DndContext`](crate::context::DndContext)
//! holding the single [`DndState`](crate::state::DndState) of the document.
//!
//! It does not render anything, define styles, or reorder data. It toggles class
//! names by name, publishes the session, and calls the application's callbacks.
//!
//! ## Host
//!
//! The element tree, event delivery and scheduling belong to the host, reached
//! through the [`DndHost`](crate::host::DndHost) trait. `understory_dnd_dom`
//! implements it over an in-memory document.
//!
//! ## Input
//!
//! Both native drag events (with a [`DataTransfer`](crate::transfer::DataTransfer))
//! and pointer events (mouse, pen, touch) drive the same state machine. The
//! [`adapter`](crate::adapter) module classifies raw events into gestures;
//! [`InputModes`](crate::options::InputModes) selects which families may start
//! a drag.
//!
//! ## Workflow
//!
//! 1) Create one [`DndContext`](crate::context::DndContext) per document.
//! 2) Attach sources and zones with [`DragDropOptions`](crate::options::DragDropOptions):
//!    container identifier, payload, callbacks, class names.
//! 3) Feed input through the host. Callbacks receive a read-only view of the
//!    session at the moment of the call.
//! 4) Call `update` when options change and `detach` (or drop the handle)
//!    when the element goes away.
//!
//! ## Nested zones
//!
//! Hover is tracked with an [`EntryCounter`](crate::hover::EntryCounter) per
//! zone, so moving across descendants of a zone never flickers its hover class.
//! Every zone resets its counter when any drag starts.
//!
//! ## Logging
//!
//! Diagnostics go through the `log` facade: `trace` for session writes and
//! event routing, `debug` for attach/detach, ignored starts and restarted
//! sessions, `warn` for payloads that cannot be written or read.

pub mod adapter;
pub mod context;
pub mod event;
pub mod host;
pub mod hover;
pub mod options;
pub mod signal;
pub mod source;
pub mod state;
pub mod transfer;
pub mod zone;

#[cfg(test)]
mod testing;

pub use context::DndContext;
pub use host::DndHost;
pub use options::{Callbacks, DragDropConfig, DragDropOptions};
pub use source::DragSource;
pub use state::DndState;
pub use zone::DropZone;
