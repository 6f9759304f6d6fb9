// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers and element data.

use std::collections::{BTreeMap, BTreeSet};

use kurbo::{Point, Rect};

/// Identifier for an element in a [`Document`](crate::Document).
///
/// A slot index plus a generation counter. Removing an element frees its slot;
/// reusing the slot bumps the generation, so a stale `NodeId` never aliases a
/// different live element. Use
/// [`Document::is_alive`](crate::Document::is_alive) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Generation of the slot this id refers to.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}v{}", self.0, self.1)
    }
}

/// Tag, identity, classes, attributes and box of one element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementData {
    /// Lower-case tag name, matched by type selectors.
    pub tag: String,
    /// Value of the `id` attribute, matched by `#id` selectors.
    pub id: Option<String>,
    /// Class list.
    pub classes: BTreeSet<String>,
    /// Other attributes, matched by `[name]` and `[name=value]` selectors.
    pub attributes: BTreeMap<String, String>,
    /// Native draggable flag.
    pub draggable: bool,
    /// Box in document coordinates, used for pointer hit testing.
    pub bounds: Rect,
}

impl ElementData {
    /// An element with the given tag and nothing else.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Set the `id`.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add every class of a space separated list.
    pub fn with_class(mut self, list: &str) -> Self {
        self.classes
            .extend(list.split_ascii_whitespace().map(String::from));
        self
    }

    /// Set an attribute.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the box.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Returns `true` if the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Returns `true` if the box contains `pt` (right and bottom edges excluded).
    pub fn hit(&self, pt: Point) -> bool {
        self.bounds.contains(pt)
    }
}
