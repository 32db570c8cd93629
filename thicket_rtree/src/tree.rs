// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`RTree`] itself: insertion, bulk loading, search and removal.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::mem;

use crate::bulk;
use crate::node::{Children, Entry, Node};
use crate::split::{choose_subtree, split};
use crate::types::{Aabb2D, Bounded};

/// Construction parameters for an [`RTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RTreeConfig {
    /// Maximum number of entries per node. Values below 4 are raised to 4.
    pub max_entries: usize,
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self { max_entries: 9 }
    }
}

impl RTreeConfig {
    /// Effective maximum fanout after clamping.
    pub fn max_entries(&self) -> usize {
        self.max_entries.max(4)
    }

    /// Minimum fanout of a non-root node: `max(2, ceil(0.4 * M))`.
    pub fn min_entries(&self) -> usize {
        (self.max_entries() * 2).div_ceil(5).max(2)
    }
}

/// A height-balanced R-tree over items with axis-aligned bounds.
///
/// Items are stored by value. Queries return borrowed items; removal is by
/// equality ([`RTree::remove`]) or by predicate ([`RTree::remove_by`]).
///
/// ```
/// use thicket_rtree::{Aabb2D, RTree};
///
/// let mut tree = RTree::new();
/// tree.insert((Aabb2D::new(0.0, 0.0, 10.0, 10.0), "r1"));
/// tree.insert((Aabb2D::new(20.0, 20.0, 30.0, 30.0), "r2"));
/// tree.insert((Aabb2D::new(5.0, 5.0, 15.0, 15.0), "r3"));
///
/// let mut found: Vec<_> = tree
///     .search(&Aabb2D::new(0.0, 0.0, 12.0, 12.0))
///     .into_iter()
///     .map(|(_, name)| *name)
///     .collect();
/// found.sort();
/// assert_eq!(found, ["r1", "r3"]);
/// ```
#[derive(Clone)]
pub struct RTree<T> {
    root: Node<T>,
    len: usize,
    max_entries: usize,
    min_entries: usize,
}

impl<T: Bounded> Default for RTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RTree")
            .field("len", &self.len)
            .field("height", &self.root.height)
            .field("bbox", &self.root.bbox)
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}

impl<T: Bounded> RTree<T> {
    /// Create an empty tree with the default fanout of 9.
    pub fn new() -> Self {
        Self::with_config(RTreeConfig::default())
    }

    /// Create an empty tree with the given configuration.
    pub fn with_config(config: RTreeConfig) -> Self {
        Self {
            root: Node::empty_leaf(),
            len: 0,
            max_entries: config.max_entries(),
            min_entries: config.min_entries(),
        }
    }

    /// Number of items in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; an empty tree or a lone leaf has height 1.
    pub fn height(&self) -> usize {
        self.root.height
    }

    /// Bounds of everything in the tree, or `None` when empty.
    pub fn bbox(&self) -> Option<Aabb2D> {
        (!self.is_empty()).then_some(self.root.bbox)
    }

    /// Remove every item, leaving a single empty leaf.
    pub fn clear(&mut self) {
        self.root = Node::empty_leaf();
        self.len = 0;
    }

    /// Insert one item.
    pub fn insert(&mut self, item: T) {
        self.insert_root(Entry::Item(item));
        self.len += 1;
    }

    /// Bulk-insert `items`.
    ///
    /// Small batches fall back to repeated [`insert`](Self::insert); larger ones
    /// are packed into a fresh balanced subtree which is then merged with the
    /// existing content.
    pub fn load(&mut self, items: impl IntoIterator<Item = T>) {
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return;
        }
        if items.len() < self.min_entries {
            for item in items {
                self.insert(item);
            }
            return;
        }

        self.len += items.len();
        let mut node = bulk::build(items, self.max_entries);
        if self.root.is_empty() {
            self.root = node;
        } else if self.root.height == node.height {
            self.grow_root(node);
        } else {
            if self.root.height < node.height {
                mem::swap(&mut self.root, &mut node);
            }
            self.insert_root(Entry::Node(node));
        }
    }

    /// All items whose bounds intersect `bbox` (edges inclusive).
    pub fn search(&self, bbox: &Aabb2D) -> Vec<&T> {
        let mut out = Vec::new();
        if !bbox.intersects(&self.root.bbox) {
            return out;
        }
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match &node.children {
                Children::Items(items) => {
                    out.extend(items.iter().filter(|item| bbox.intersects(&item.aabb())));
                }
                Children::Nodes(nodes) => {
                    for child in nodes {
                        if bbox.contains(&child.bbox) {
                            child.collect_into(&mut out);
                        } else if bbox.intersects(&child.bbox) {
                            stack.push(child);
                        }
                    }
                }
            }
        }
        out
    }

    /// Returns `true` if any item intersects `bbox`.
    pub fn collides(&self, bbox: &Aabb2D) -> bool {
        if !bbox.intersects(&self.root.bbox) {
            return false;
        }
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match &node.children {
                Children::Items(items) => {
                    if items.iter().any(|item| bbox.intersects(&item.aabb())) {
                        return true;
                    }
                }
                Children::Nodes(nodes) => {
                    for child in nodes {
                        if bbox.contains(&child.bbox) {
                            return true;
                        }
                        if bbox.intersects(&child.bbox) {
                            stack.push(child);
                        }
                    }
                }
            }
        }
        false
    }

    /// Every item in the tree.
    pub fn all(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect_into(&mut out);
        out
    }

    /// Iterate over every item in the tree, in no particular order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: vec![&self.root],
            items: Default::default(),
        }
    }

    /// Remove the first item inside `bbox` for which `pred` returns `true`.
    ///
    /// Only subtrees whose bounds contain `bbox` are visited, so `bbox` should
    /// be the bounds of the item being removed.
    pub fn remove_by(&mut self, bbox: &Aabb2D, mut pred: impl FnMut(&T) -> bool) -> Option<T> {
        if !self.root.bbox.contains(bbox) {
            return None;
        }
        let removed = remove_from(&mut self.root, bbox, &mut pred)?;
        self.len -= 1;
        if self.root.is_empty() {
            self.clear();
        }
        Some(removed)
    }

    fn insert_root(&mut self, entry: Entry<T>) {
        let bbox = entry.bbox();
        if let Some(sibling) = insert_entry(
            &mut self.root,
            entry,
            &bbox,
            self.max_entries,
            self.min_entries,
        ) {
            self.grow_root(sibling);
        }
    }

    /// Replace the root by a new root holding the old root and `sibling`.
    fn grow_root(&mut self, sibling: Node<T>) {
        let height = self.root.height + 1;
        let old = mem::replace(&mut self.root, Node::empty_leaf());
        self.root = Node::internal(vec![old, sibling], height);
    }
}

impl<T: Bounded + PartialEq> RTree<T> {
    /// Remove one item equal to `item`.
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let bbox = item.aabb();
        self.remove_by(&bbox, |candidate| candidate == item)
    }
}

/// Insert `entry` below `node` at the level matching its height. Returns the
/// sibling produced if `node` overflowed and had to split.
fn insert_entry<T: Bounded>(
    node: &mut Node<T>,
    entry: Entry<T>,
    bbox: &Aabb2D,
    max_entries: usize,
    min_entries: usize,
) -> Option<Node<T>> {
    node.bbox.extend(bbox);
    if node.height == entry.height() + 1 {
        node.push(entry);
    } else {
        let Children::Nodes(children) = &mut node.children else {
            unreachable!("only leaves hold items and leaves have height 1");
        };
        let target = choose_subtree(children, bbox);
        if let Some(sibling) =
            insert_entry(&mut children[target], entry, bbox, max_entries, min_entries)
        {
            children.push(sibling);
        }
    }
    (node.len() > max_entries).then(|| split(node, min_entries))
}

fn remove_from<T: Bounded>(
    node: &mut Node<T>,
    bbox: &Aabb2D,
    pred: &mut impl FnMut(&T) -> bool,
) -> Option<T> {
    let removed = match &mut node.children {
        Children::Items(items) => {
            let position = items
                .iter()
                .position(|item| bbox.contains(&item.aabb()) && pred(item))?;
            items.remove(position)
        }
        Children::Nodes(children) => {
            let mut found = None;
            for i in 0..children.len() {
                if !children[i].bbox.contains(bbox) {
                    continue;
                }
                if let Some(item) = remove_from(&mut children[i], bbox, pred) {
                    if children[i].is_empty() {
                        children.remove(i);
                    }
                    found = Some(item);
                    break;
                }
            }
            found?
        }
    };
    node.recompute_bbox();
    Some(removed)
}

/// Iterator over the items of an [`RTree`], returned by [`RTree::iter`].
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    items: core::slice::Iter<'a, T>,
}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("pending_nodes", &self.stack.len())
            .field("pending_items", &self.items.len())
            .finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.items.next() {
                return Some(item);
            }
            let node = self.stack.pop()?;
            match &node.children {
                Children::Items(items) => self.items = items.iter(),
                Children::Nodes(nodes) => self.stack.extend(nodes.iter()),
            }
        }
    }
}

impl<'a, T: Bounded> IntoIterator for &'a RTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    type Item = (Aabb2D, u32);

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Aabb2D {
        Aabb2D::new(x, y, x + w, y + h)
    }

    fn grid_items(count: u32) -> Vec<Item> {
        (0..count)
            .map(|i| {
                let x = f64::from(i % 37) * 3.0;
                let y = f64::from(i / 37) * 3.0;
                (rect(x, y, 2.0, 2.0), i)
            })
            .collect()
    }

    fn ids(found: Vec<&Item>) -> Vec<u32> {
        let mut ids: Vec<u32> = found.into_iter().map(|(_, id)| *id).collect();
        ids.sort_unstable();
        ids
    }

    /// Walk the tree checking boxes are tight, heights step by one and no
    /// node overflows.
    fn check_invariants<T: Bounded>(tree: &RTree<T>) {
        fn walk<T: Bounded>(node: &Node<T>, is_root: bool, max: usize) {
            let tight = match &node.children {
                Children::Items(items) => items
                    .iter()
                    .fold(Aabb2D::EMPTY, |acc, item| acc.union(&item.aabb())),
                Children::Nodes(nodes) => nodes
                    .iter()
                    .fold(Aabb2D::EMPTY, |acc, child| acc.union(&child.bbox)),
            };
            assert_eq!(node.bbox, tight, "stale bbox at height {}", node.height);
            assert!(node.len() <= max, "overfull node");
            assert!(is_root || !node.is_empty(), "empty non-root node");
            match &node.children {
                Children::Nodes(children) => {
                    for child in children {
                        assert_eq!(child.height + 1, node.height);
                        walk(child, false, max);
                    }
                }
                Children::Items(_) => assert_eq!(node.height, 1),
            }
        }
        walk(&tree.root, true, tree.max_entries);
    }

    #[test]
    fn config_clamps_and_derives_min() {
        assert_eq!(RTreeConfig { max_entries: 2 }.max_entries(), 4);
        assert_eq!(RTreeConfig { max_entries: 4 }.min_entries(), 2);
        assert_eq!(RTreeConfig::default().min_entries(), 4);
        assert_eq!(RTreeConfig { max_entries: 16 }.min_entries(), 7);
    }

    #[test]
    fn three_rectangle_query() {
        let mut tree = RTree::new();
        tree.insert((rect(0.0, 0.0, 10.0, 10.0), 1));
        tree.insert((rect(20.0, 20.0, 10.0, 10.0), 2));
        tree.insert((rect(5.0, 5.0, 10.0, 10.0), 3));
        assert_eq!(ids(tree.search(&Aabb2D::new(0.0, 0.0, 12.0, 12.0))), [1, 3]);
        assert_eq!(ids(tree.search(&Aabb2D::from_point(25.0, 25.0))), [2]);
        assert!(tree.search(&Aabb2D::from_point(17.0, 2.0)).is_empty());
    }

    #[test]
    fn empty_tree_queries() {
        let tree: RTree<Item> = RTree::new();
        assert!(tree.search(&rect(0.0, 0.0, 1.0, 1.0)).is_empty());
        assert!(!tree.collides(&rect(0.0, 0.0, 1.0, 1.0)));
        assert_eq!(tree.bbox(), None);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn inserts_grow_height_and_stay_valid() {
        let mut tree = RTree::new();
        for item in grid_items(500) {
            tree.insert(item);
        }
        assert_eq!(tree.len(), 500);
        assert!(tree.height() >= 3);
        check_invariants(&tree);
        assert_eq!(tree.all().len(), 500);
        assert_eq!(tree.iter().count(), 500);
    }

    #[test]
    fn insert_then_remove_all_leaves_empty_leaf() {
        let items = grid_items(200);
        let mut tree = RTree::new();
        for item in &items {
            tree.insert(*item);
        }
        for item in &items {
            assert_eq!(tree.remove(item), Some(*item));
            check_invariants(&tree);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.root.len(), 0);
    }

    #[test]
    fn removing_unknown_item_is_none() {
        let mut tree = RTree::new();
        tree.load(grid_items(50));
        assert_eq!(tree.remove(&(rect(1000.0, 1000.0, 1.0, 1.0), 0)), None);
        // Right bbox, wrong payload.
        let (bbox, _) = grid_items(1)[0];
        assert_eq!(tree.remove(&(bbox, 999)), None);
        assert_eq!(tree.len(), 50);
    }

    #[test]
    fn remove_by_uses_predicate() {
        let mut tree = RTree::new();
        let shared = rect(0.0, 0.0, 1.0, 1.0);
        tree.load([(shared, 1), (shared, 2), (shared, 3)]);
        assert_eq!(tree.remove_by(&shared, |(_, id)| *id == 2), Some((shared, 2)));
        assert_eq!(ids(tree.search(&shared)), [1, 3]);
    }

    #[test]
    fn remove_by_skips_items_outside_bbox() {
        let mut tree = RTree::new();
        let (big, small) = (rect(0.0, 0.0, 3.0, 3.0), rect(0.0, 0.0, 1.0, 1.0));
        tree.load([(big, 1), (small, 2)]);
        assert_eq!(tree.remove_by(&small, |_| true), Some((small, 2)));
        assert_eq!(tree.remove_by(&small, |_| true), None);
        assert_eq!(ids(tree.all()), [1]);
    }

    #[test]
    fn load_small_batch_inserts() {
        let mut tree = RTree::new();
        tree.load(grid_items(3));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn load_merges_with_existing_content() {
        let mut tree = RTree::new();
        tree.load(grid_items(1000));
        let first_height = tree.height();
        check_invariants(&tree);

        // Shorter batch goes in at the matching level.
        let extra: Vec<Item> = (0..20)
            .map(|i| (rect(500.0 + f64::from(i), 500.0, 1.0, 1.0), 10_000 + i))
            .collect();
        tree.load(extra);
        check_invariants(&tree);
        assert_eq!(tree.len(), 1020);
        assert!(tree.height() >= first_height);

        // Taller batch swaps roles with the current tree.
        let mut small = RTree::new();
        small.load(grid_items(20));
        let big: Vec<Item> = grid_items(2000).into_iter().map(|(b, i)| (b, i + 100_000)).collect();
        small.load(big);
        check_invariants(&small);
        assert_eq!(small.len(), 2020);
        assert_eq!(small.all().len(), 2020);
    }

    #[test]
    fn load_equal_heights_grows_root() {
        let mut tree = RTree::new();
        tree.load(grid_items(50));
        let height = tree.height();
        tree.load(grid_items(50).into_iter().map(|(b, i)| (b, i + 50)));
        assert_eq!(tree.height(), height + 1);
        check_invariants(&tree);
        assert_eq!(ids(tree.all()), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn collides_matches_search() {
        let mut tree = RTree::new();
        tree.load(grid_items(300));
        for q in [
            rect(0.0, 0.0, 0.5, 0.5),
            rect(2.2, 2.2, 0.5, 0.5),
            rect(-10.0, -10.0, 5.0, 5.0),
            rect(50.0, 5.0, 20.0, 20.0),
        ] {
            assert_eq!(tree.collides(&q), !tree.search(&q).is_empty());
        }
    }

    #[test]
    fn debug_is_summary() {
        let mut tree = RTree::new();
        tree.load(grid_items(10));
        let text = alloc::format!("{tree:?}");
        assert!(text.contains("len: 10"));
    }

    fn arb_item() -> impl Strategy<Value = Aabb2D> {
        (0.0..1000.0_f64, 0.0..1000.0_f64, 0.0..50.0_f64, 0.0..50.0_f64)
            .prop_map(|(x, y, w, h)| rect(x, y, w, h))
    }

    proptest! {
        #[test]
        fn search_matches_brute_force(
            boxes in prop::collection::vec(arb_item(), 0..300),
            bulk in any::<bool>(),
            query in arb_item(),
        ) {
            let items: Vec<Item> = boxes
                .iter()
                .zip(0_u32..)
                .map(|(b, i)| (*b, i))
                .collect();
            let mut tree = RTree::new();
            if bulk {
                tree.load(items.clone());
            } else {
                for item in &items {
                    tree.insert(*item);
                }
            }
            check_invariants(&tree);
            let expected: Vec<u32> = items
                .iter()
                .filter(|(b, _)| b.intersects(&query))
                .map(|(_, i)| *i)
                .collect();
            prop_assert_eq!(ids(tree.search(&query)), expected);
        }

        #[test]
        fn merged_loads_match_brute_force(
            small in prop::collection::vec(arb_item(), 4..30),
            big in prop::collection::vec(arb_item(), 300..600),
            small_first in any::<bool>(),
            queries in prop::collection::vec(arb_item(), 1..8),
        ) {
            let small: Vec<Item> = small.iter().zip(0_u32..).map(|(b, i)| (*b, i)).collect();
            let big: Vec<Item> = big.iter().zip(1000_u32..).map(|(b, i)| (*b, i)).collect();
            let mut tree = RTree::new();
            if small_first {
                tree.load(small.clone());
                tree.load(big.clone());
            } else {
                tree.load(big.clone());
                tree.load(small.clone());
            }
            check_invariants(&tree);
            prop_assert_eq!(tree.len(), small.len() + big.len());
            for query in &queries {
                let mut expected: Vec<u32> = small
                    .iter()
                    .chain(&big)
                    .filter(|(b, _)| b.intersects(query))
                    .map(|(_, i)| *i)
                    .collect();
                expected.sort_unstable();
                prop_assert_eq!(ids(tree.search(query)), expected);
            }
            // Items from the grafted subtree must still be removable.
            for item in &small {
                prop_assert_eq!(tree.remove(item), Some(*item));
            }
            check_invariants(&tree);
            prop_assert_eq!(tree.len(), big.len());
        }

        #[test]
        fn removal_leaves_no_stale_entries(
            boxes in prop::collection::vec(arb_item(), 1..200),
            keep_every in 2_usize..5,
        ) {
            let items: Vec<Item> = boxes
                .iter()
                .zip(0_u32..)
                .map(|(b, i)| (*b, i))
                .collect();
            let mut tree = RTree::new();
            tree.load(items.clone());
            let mut kept = Vec::new();
            for (n, item) in items.iter().enumerate() {
                if n % keep_every == 0 {
                    kept.push(item.1);
                } else {
                    prop_assert_eq!(tree.remove(item), Some(*item));
                }
            }
            check_invariants(&tree);
            prop_assert_eq!(tree.len(), kept.len());
            let everything = Aabb2D::new(-1.0, -1.0, 2000.0, 2000.0);
            prop_assert_eq!(ids(tree.search(&everything)), kept);
        }
    }
}
