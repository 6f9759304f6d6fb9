// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entry counter: hover tracking that survives nested descendants.
//!
//! ## Overview
//!
//! Native `dragenter` and `dragleave` bubble through every descendant boundary
//! the pointer crosses, and the enter of the element being entered arrives
//! before the leave of the element being left. A plain "am I hovered" flag
//! would flicker on every crossing. [`EntryCounter`] increments on enter,
//! decrements on leave, and only reports a transition at the zero boundary.
//!
//! Non-bubbling pointer enter/leave events never fire for descendant
//! crossings, so on that path the counter simply moves between 0 and 1. Both
//! paths use the same counter; mixing in an identity check for one of them
//! would reintroduce miscounts under rapid movement.
//!
//! ```
//! use understory_dnd::hover::{EntryCounter, HoverTransition};
//!
//! let mut c = EntryCounter::new();
//! assert_eq!(c.enter(), Some(HoverTransition::Entered)); // zone
//! assert_eq!(c.enter(), None);                            // child
//! assert_eq!(c.leave(), None);                            // zone (bubbled)
//! assert_eq!(c.leave(), Some(HoverTransition::Left));     // child -> outside
//! ```

/// Transition reported at the zero boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverTransition {
    /// Count went from zero to one.
    Entered,
    /// Count went from one to zero.
    Left,
}

/// Counts outstanding enters for one drop zone.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryCounter {
    depth: u32,
}

impl EntryCounter {
    /// Create an idle counter.
    pub const fn new() -> Self {
        Self { depth: 0 }
    }

    /// Record an enter. Reports [`HoverTransition::Entered`] on 0 -> 1.
    pub fn enter(&mut self) -> Option<HoverTransition> {
        self.depth = self.depth.saturating_add(1);
        (self.depth == 1).then_some(HoverTransition::Entered)
    }

    /// Record a leave. Reports [`HoverTransition::Left`] on 1 -> 0.
    ///
    /// A leave with no outstanding enter is ignored.
    pub fn leave(&mut self) -> Option<HoverTransition> {
        if self.depth == 0 {
            return None;
        }
        self.depth -= 1;
        (self.depth == 0).then_some(HoverTransition::Left)
    }

    /// Force the counter to zero. Returns `true` if it was hovering.
    pub fn reset(&mut self) -> bool {
        let was = self.is_hovering();
        self.depth = 0;
        was
    }

    /// Number of outstanding enters.
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns `true` while at least one enter is outstanding.
    pub const fn is_hovering(&self) -> bool {
        self.depth > 0
    }
}
