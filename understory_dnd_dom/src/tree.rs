// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element tree: generational slots, parent links, paint-order hit testing.

use kurbo::Point;

use crate::types::{ElementData, NodeId};

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: ElementData,
}

/// Arena of elements.
#[derive(Default)]
pub(crate) struct Tree {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>, // last generation per slot, kept across frees
    free_list: Vec<usize>,
    roots: Vec<NodeId>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .field("roots", &self.roots.len())
            .finish_non_exhaustive()
    }
}

impl Tree {
    /// Insert `data` as the last child of `parent`, or as a new root.
    ///
    /// A stale `parent` is treated as absent.
    pub(crate) fn insert(&mut self, parent: Option<NodeId>, data: ElementData) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit slot indices."
        )]
        let id = NodeId::new(idx as u32, generation);
        let parent = parent.filter(|p| self.is_alive(*p));
        self.nodes[idx] = Some(Node {
            generation,
            parent,
            children: Vec::new(),
            data,
        });
        match parent {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        id
    }

    /// Remove `id` and its subtree. Returns the removed ids, parents first.
    pub(crate) fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut removed = Vec::new();
        if !self.is_alive(id) {
            return removed;
        }
        match self.parent(id) {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes[n.idx()].take() {
                stack.extend(node.children.iter().rev());
                self.free_list.push(n.idx());
                removed.push(n);
            }
        }
        removed
    }

    pub(crate) fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(Option::as_ref)
            .is_some_and(|n| n.generation == id.generation())
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|n| n.generation == id.generation())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|n| n.generation == id.generation())
    }

    pub(crate) fn data(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).map(|n| &n.data)
    }

    pub(crate) fn data_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.node_mut(id).map(|n| &mut n.data)
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Root-to-node path, inclusive. Empty for a stale id.
    pub(crate) fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.is_alive(id).then_some(id);
        while let Some(n) = cur {
            out.push(n);
            cur = self.parent(n);
        }
        out.reverse();
        out
    }

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    pub(crate) fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = self.is_alive(node).then_some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Live ids in document order (pre-order, roots in insertion order).
    pub(crate) fn iter(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev());
        }
        out
    }

    /// Topmost element whose box contains `pt`.
    ///
    /// Paint order is document order, so the last match in pre-order wins:
    /// children over parents, later siblings over earlier ones.
    pub(crate) fn hit_test(&self, pt: Point) -> Option<NodeId> {
        self.iter()
            .into_iter()
            .filter(|n| self.data(*n).is_some_and(|d| d.hit(pt)))
            .last()
    }
}
