// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry and propagation routes.
//!
//! An event is delivered to its target, then (for bubbling kinds) to each
//! ancestor up to the root. A pointer captured by an element off that route
//! is delivered to the capturing element as well, after the route, to its own
//! listeners only.

use std::collections::BTreeMap;

use understory_dnd::event::{EventKind, EventKinds};
use understory_dnd::host::{Listener, ListenerId};

use crate::types::NodeId;

/// Why a node receives an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    /// The event's own target.
    Target,
    /// An ancestor of the target.
    Bubble,
    /// The element holding the pointer capture.
    Captured,
}

/// Delivery order for an event aimed at the last node of `path`.
///
/// `path` is root first, as returned by `Tree::path_to_root`.
pub(crate) fn route(path: &[NodeId], kind: EventKind) -> Vec<(NodeId, Phase)> {
    let mut out = Vec::with_capacity(path.len());
    let mut nodes = path.iter().rev();
    if let Some(&target) = nodes.next() {
        out.push((target, Phase::Target));
    }
    if kind.bubbles() {
        out.extend(nodes.map(|&n| (n, Phase::Bubble)));
    }
    out
}

struct Entry {
    id: ListenerId,
    kinds: EventKinds,
    listener: Listener<NodeId>,
}

/// Listeners by element, in registration order.
#[derive(Default)]
pub(crate) struct Registry {
    next: u64,
    by_node: BTreeMap<NodeId, Vec<Entry>>,
    owner: BTreeMap<ListenerId, NodeId>,
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("nodes", &self.by_node.len())
            .field("listeners", &self.owner.len())
            .finish_non_exhaustive()
    }
}

impl Registry {
    pub(crate) fn add(
        &mut self,
        node: NodeId,
        kinds: EventKinds,
        listener: Listener<NodeId>,
    ) -> ListenerId {
        self.next += 1;
        let id = ListenerId::new(self.next);
        self.by_node.entry(node).or_default().push(Entry {
            id,
            kinds,
            listener,
        });
        self.owner.insert(id, node);
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let Some(node) = self.owner.remove(&id) else {
            return false;
        };
        if let Some(entries) = self.by_node.get_mut(&node) {
            entries.retain(|e| e.id != id);
            if entries.is_empty() {
                self.by_node.remove(&node);
            }
        }
        true
    }

    /// Drop every listener of `node`. Returns how many were removed.
    pub(crate) fn remove_node(&mut self, node: NodeId) -> usize {
        let entries = self.by_node.remove(&node).unwrap_or_default();
        for e in &entries {
            self.owner.remove(&e.id);
        }
        entries.len()
    }

    pub(crate) fn is_registered(&self, id: ListenerId) -> bool {
        self.owner.contains_key(&id)
    }

    /// Listeners of `node` interested in `kind`, cloned out so that they can
    /// run without the registry borrowed.
    pub(crate) fn snapshot(&self, node: NodeId, kind: EventKind) -> Vec<(ListenerId, Listener<NodeId>)> {
        self.by_node
            .get(&node)
            .into_iter()
            .flatten()
            .filter(|e| e.kinds.has(kind))
            .map(|e| (e.id, e.listener.clone()))
            .collect()
    }

    pub(crate) fn count(&self, node: NodeId) -> usize {
        self.by_node.get(&node).map_or(0, Vec::len)
    }

    pub(crate) fn total(&self) -> usize {
        self.owner.len()
    }
}
