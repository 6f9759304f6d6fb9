// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dnd_dom --heading-base-level=0

//! Understory DnD DOM: an in-memory document that hosts drag-and-drop behaviors.
//!
//! [`Document`] implements [`understory_dnd::DndHost`] over a small element
//! tree: tag, id, classes, attributes, a draggable flag and a box per element.
//! It delivers events target-then-ancestors, keeps pointer capture and
//! per-pointer hover, and runs microtasks, timers and local futures on a
//! virtual clock. Use it to drive the behaviors in tests and demos, or as a
//! model of what a real host has to provide.
//!
//! ## Where this fits
//!
//! - `understory_dnd`: the behaviors and the shared drag session.
//! - `understory_dnd_dom` (this crate): one host for them.
//!
//! ## API overview
//!
//! - [`Document`]: the tree, event dispatch and scheduling.
//! - [`ElementData`]: per-element data, built with `with_*` methods.
//! - [`NodeId`]: generational element handle.
//! - [`Selector`]: compound selectors for queries and interactive exclusions.
//! - Gesture drivers: [`Document::pointer_down`] and friends for pointer
//!   input, [`Document::start_native_drag`] / [`NativeDrag`] for native drags.
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_dnd::{DndContext, DragDropOptions, DragSource, DropZone};
//! use understory_dnd_dom::{Document, ElementData};
//!
//! let doc = Document::new();
//! let body = doc.insert(None, ElementData::new("body").with_bounds(Rect::new(0., 0., 400., 200.)));
//! let todo = doc.insert(Some(body), ElementData::new("ul").with_bounds(Rect::new(0., 0., 200., 200.)));
//! let done = doc.insert(Some(body), ElementData::new("ul").with_bounds(Rect::new(200., 0., 400., 200.)));
//! let card = doc.insert(Some(todo), ElementData::new("li").with_bounds(Rect::new(10., 10., 190., 40.)));
//!
//! let ctx = DndContext::<u32, _>::new();
//! let _source = DragSource::attach(doc.clone(), &ctx, card, DragDropOptions::new("todo").drag_data(7));
//! let _zone = DropZone::attach(doc.clone(), &ctx, done, DragDropOptions::new("done"));
//!
//! let mut drag = doc.start_native_drag(card, Point::new(20., 20.)).unwrap();
//! assert!(ctx.is_dragging());
//! assert!(drag.move_to(Point::new(300., 100.)));
//! let outcome = drag.release();
//! assert_eq!(outcome.dropped_on, Some(done));
//! assert!(!ctx.is_dragging());
//! ```
//!
//! ## Dispatch rules
//!
//! - Bubbling events go to the target, then each ancestor;
//!   `stop_propagation` ends the walk.
//! - `pointerenter` and `pointerleave` go to one element only.
//! - An element holding a pointer's capture also receives that pointer's
//!   events when it is off the target's path, after the walk.
//! - Each element's listeners are read when the event reaches it; a
//!   listener removed before its turn is not called.
//! - After each dispatch, microtasks run and woken futures are polled.

mod dispatch;
mod document;
mod gesture;
pub mod hover;
mod scheduler;
#[cfg(test)]
mod scenarios;
mod selector;
mod tree;
mod types;

pub use document::Document;
pub use gesture::{DragOutcome, NativeDrag};
pub use selector::{Selector, SelectorError};
pub use types::{ElementData, NodeId};
