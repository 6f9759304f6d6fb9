// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pointer hover paths and the boundary events they imply.
//!
//! The document keeps one root-to-target path per pointer. When a pointer
//! moves, the new path is diffed against the old one at their lowest common
//! ancestor: elements that dropped out get `pointerleave` (inner to outer),
//! elements that came in get `pointerenter` (outer to inner).
//!
//! ```
//! use understory_dnd_dom::hover::{Boundary, HoverPath};
//!
//! let mut h: HoverPath<u32> = HoverPath::new();
//! assert_eq!(h.update(&[1, 2]), vec![Boundary::Enter(1), Boundary::Enter(2)]);
//! assert_eq!(h.update(&[1, 3]), vec![Boundary::Leave(2), Boundary::Enter(3)]);
//! assert_eq!(h.clear(), vec![Boundary::Leave(3), Boundary::Leave(1)]);
//! ```

/// One boundary crossing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Boundary<K> {
    /// The pointer entered the element's box.
    Enter(K),
    /// The pointer left the element's box.
    Leave(K),
}

/// Currently hovered root-to-target path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverPath<K> {
    current: Vec<K>,
}

impl<K> Default for HoverPath<K> {
    fn default() -> Self {
        Self {
            current: Vec::new(),
        }
    }
}

impl<K: Copy + Eq> HoverPath<K> {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// The hovered path, root first.
    pub fn current(&self) -> &[K] {
        &self.current
    }

    /// Replace the path with `path` and return the crossings, leaves first.
    pub fn update(&mut self, path: &[K]) -> Vec<Boundary<K>> {
        let lca = self
            .current
            .iter()
            .zip(path)
            .take_while(|(a, b)| a == b)
            .count();
        let mut out: Vec<_> = self.current[lca..]
            .iter()
            .rev()
            .map(|&k| Boundary::Leave(k))
            .collect();
        out.extend(path[lca..].iter().map(|&k| Boundary::Enter(k)));
        self.current.clear();
        self.current.extend_from_slice(path);
        out
    }

    /// Forget the path and return leaves for all of it, inner to outer.
    pub fn clear(&mut self) -> Vec<Boundary<K>> {
        self.update(&[])
    }

    /// Drop `removed` elements from the path without producing crossings.
    ///
    /// Used when elements leave the tree: the path is cut at the first
    /// removed element.
    pub fn forget(&mut self, removed: impl Fn(&K) -> bool) {
        if let Some(at) = self.current.iter().position(removed) {
            self.current.truncate(at);
        }
    }
}
