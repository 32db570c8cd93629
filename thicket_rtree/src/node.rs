// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree nodes and the entries inserted into them.

use alloc::vec;
use alloc::vec::Vec;

use crate::types::{Aabb2D, Bounded};

/// A node of the tree. Leaves (height 1) own items; internal nodes own nodes of
/// height `self.height - 1`.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) bbox: Aabb2D,
    pub(crate) height: usize,
    pub(crate) children: Children<T>,
}

#[derive(Clone, Debug)]
pub(crate) enum Children<T> {
    Items(Vec<T>),
    Nodes(Vec<Node<T>>),
}

/// Something that can be appended to a node: an item (height 0) or a subtree.
pub(crate) enum Entry<T> {
    Item(T),
    Node(Node<T>),
}

impl<T: Bounded> Entry<T> {
    pub(crate) fn height(&self) -> usize {
        match self {
            Self::Item(_) => 0,
            Self::Node(node) => node.height,
        }
    }

    pub(crate) fn bbox(&self) -> Aabb2D {
        match self {
            Self::Item(item) => item.aabb(),
            Self::Node(node) => node.bbox,
        }
    }
}

impl<T: Bounded> Node<T> {
    pub(crate) const fn empty_leaf() -> Self {
        Self {
            bbox: Aabb2D::EMPTY,
            height: 1,
            children: Children::Items(Vec::new()),
        }
    }

    pub(crate) fn leaf(items: Vec<T>) -> Self {
        let mut node = Self {
            bbox: Aabb2D::EMPTY,
            height: 1,
            children: Children::Items(items),
        };
        node.recompute_bbox();
        node
    }

    pub(crate) fn internal(nodes: Vec<Self>, height: usize) -> Self {
        let mut node = Self {
            bbox: Aabb2D::EMPTY,
            height,
            children: Children::Nodes(nodes),
        };
        node.recompute_bbox();
        node
    }

    /// Wrap `self` in single-child parents until it reaches `height`.
    pub(crate) fn lift_to(mut self, height: usize) -> Self {
        while self.height < height {
            let parent_height = self.height + 1;
            self = Self::internal(vec![self], parent_height);
        }
        self
    }

    pub(crate) fn len(&self) -> usize {
        match &self.children {
            Children::Items(items) => items.len(),
            Children::Nodes(nodes) => nodes.len(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recompute the bbox as the union of the children's boxes.
    pub(crate) fn recompute_bbox(&mut self) {
        self.bbox = match &self.children {
            Children::Items(items) => items
                .iter()
                .fold(Aabb2D::EMPTY, |acc, item| acc.union(&item.aabb())),
            Children::Nodes(nodes) => nodes
                .iter()
                .fold(Aabb2D::EMPTY, |acc, node| acc.union(&node.bbox)),
        };
    }

    /// Append an entry whose height is exactly one below this node's height.
    pub(crate) fn push(&mut self, entry: Entry<T>) {
        match (&mut self.children, entry) {
            (Children::Items(items), Entry::Item(item)) => items.push(item),
            (Children::Nodes(nodes), Entry::Node(node)) => nodes.push(node),
            _ => unreachable!("entries are only pushed at the level matching their height"),
        }
    }

    /// Push every item of this subtree into `out`.
    pub(crate) fn collect_into<'a>(&'a self, out: &mut Vec<&'a T>) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match &node.children {
                Children::Items(items) => out.extend(items.iter()),
                Children::Nodes(nodes) => stack.extend(nodes.iter()),
            }
        }
    }
}
