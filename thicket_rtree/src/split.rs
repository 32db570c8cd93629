// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overflow splitting and subtree selection.
//!
//! The split is the R*-tree topological split: pick the axis whose sorted
//! distributions have the smallest total margin, then pick the distribution on
//! that axis with the least overlap (ties broken by total area).

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::node::{Children, Node};
use crate::types::{Aabb2D, Bounded};

/// Index of the child that needs the least area enlargement to admit `bbox`,
/// ties broken by the smallest current area.
pub(crate) fn choose_subtree<T>(children: &[Node<T>], bbox: &Aabb2D) -> usize {
    let mut target = 0;
    let mut min_enlargement = f64::INFINITY;
    let mut min_area = f64::INFINITY;
    for (i, child) in children.iter().enumerate() {
        let area = child.bbox.area();
        let enlargement = child.bbox.enlarged_area(bbox) - area;
        if enlargement < min_enlargement {
            min_enlargement = enlargement;
            min_area = area.min(min_area);
            target = i;
        } else if enlargement == min_enlargement && area < min_area {
            min_area = area;
            target = i;
        }
    }
    target
}

/// Split an overflowing node in place, returning the new sibling at the same height.
pub(crate) fn split<T: Bounded>(node: &mut Node<T>, min_entries: usize) -> Node<T> {
    let children = match &mut node.children {
        Children::Items(items) => Children::Items(split_children(items, min_entries, |item| {
            item.aabb()
        })),
        Children::Nodes(nodes) => {
            Children::Nodes(split_children(nodes, min_entries, |child| child.bbox))
        }
    };
    node.recompute_bbox();
    let mut sibling = Node {
        bbox: Aabb2D::EMPTY,
        height: node.height,
        children,
    };
    sibling.recompute_bbox();
    sibling
}

fn split_children<C>(
    children: &mut Vec<C>,
    min_entries: usize,
    bbox_of: impl Fn(&C) -> Aabb2D,
) -> Vec<C> {
    let count = children.len();
    choose_split_axis(children, min_entries, &bbox_of);
    let at = choose_split_index(children, min_entries, count, &bbox_of);
    children.split_off(at)
}

#[derive(Copy, Clone)]
enum Axis {
    X,
    Y,
}

fn compare_min<C>(axis: Axis, bbox_of: &impl Fn(&C) -> Aabb2D) -> impl Fn(&C, &C) -> Ordering {
    move |a: &C, b: &C| {
        let (a, b) = (bbox_of(a), bbox_of(b));
        match axis {
            Axis::X => a.min_x.total_cmp(&b.min_x),
            Axis::Y => a.min_y.total_cmp(&b.min_y),
        }
    }
}

/// Sort `children` along the axis with the smaller total distribution margin.
fn choose_split_axis<C>(children: &mut [C], min_entries: usize, bbox_of: &impl Fn(&C) -> Aabb2D) {
    let x_margin = all_dist_margin(children, min_entries, Axis::X, bbox_of);
    let y_margin = all_dist_margin(children, min_entries, Axis::Y, bbox_of);
    // Children are left sorted by y after the second pass.
    if x_margin < y_margin {
        children.sort_by(compare_min(Axis::X, bbox_of));
    }
}

/// Sum of the margins of every valid two-group distribution along `axis`.
fn all_dist_margin<C>(
    children: &mut [C],
    min_entries: usize,
    axis: Axis,
    bbox_of: &impl Fn(&C) -> Aabb2D,
) -> f64 {
    children.sort_by(compare_min(axis, bbox_of));
    let count = children.len();
    let mut left = dist_bbox(&children[..min_entries], bbox_of);
    let mut right = dist_bbox(&children[count - min_entries..], bbox_of);
    let mut margin = left.margin() + right.margin();

    for child in &children[min_entries..count - min_entries] {
        left.extend(&bbox_of(child));
        margin += left.margin();
    }
    for child in children[min_entries..count - min_entries].iter().rev() {
        right.extend(&bbox_of(child));
        margin += right.margin();
    }
    margin
}

/// Split position with the least overlap between groups, ties broken by total area.
fn choose_split_index<C>(
    children: &[C],
    min_entries: usize,
    count: usize,
    bbox_of: &impl Fn(&C) -> Aabb2D,
) -> usize {
    let mut index = None;
    let mut min_overlap = f64::INFINITY;
    let mut min_area = f64::INFINITY;

    for i in min_entries..=count - min_entries {
        let left = dist_bbox(&children[..i], bbox_of);
        let right = dist_bbox(&children[i..], bbox_of);
        let overlap = left.intersection_area(&right);
        let area = left.area() + right.area();

        if overlap < min_overlap {
            min_overlap = overlap;
            index = Some(i);
            min_area = area.min(min_area);
        } else if overlap == min_overlap && area < min_area {
            min_area = area;
            index = Some(i);
        }
    }
    index.unwrap_or(count - min_entries)
}

fn dist_bbox<C>(children: &[C], bbox_of: &impl Fn(&C) -> Aabb2D) -> Aabb2D {
    children
        .iter()
        .fold(Aabb2D::EMPTY, |acc, child| acc.union(&bbox_of(child)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn choose_subtree_prefers_least_enlargement() {
        let a = Node::leaf(vec![Aabb2D::new(0.0, 0.0, 10.0, 10.0)]);
        let b = Node::leaf(vec![Aabb2D::new(100.0, 100.0, 110.0, 110.0)]);
        let children = [a, b];
        assert_eq!(choose_subtree(&children, &Aabb2D::new(1.0, 1.0, 2.0, 2.0)), 0);
        assert_eq!(
            choose_subtree(&children, &Aabb2D::new(105.0, 105.0, 112.0, 112.0)),
            1
        );
    }

    #[test]
    fn choose_subtree_breaks_ties_by_area() {
        // Both contain the query (zero enlargement); the smaller one wins.
        let big = Node::leaf(vec![Aabb2D::new(0.0, 0.0, 100.0, 100.0)]);
        let small = Node::leaf(vec![Aabb2D::new(0.0, 0.0, 10.0, 10.0)]);
        let children = [big, small];
        assert_eq!(choose_subtree(&children, &Aabb2D::from_point(5.0, 5.0)), 1);
    }

    #[test]
    fn split_separates_two_clusters() {
        let mut items = Vec::new();
        for i in 0..5 {
            let x = f64::from(i);
            items.push(Aabb2D::new(x, 0.0, x + 0.5, 0.5));
            items.push(Aabb2D::new(x + 1000.0, 0.0, x + 1000.5, 0.5));
        }
        let mut node = Node::leaf(items);
        let sibling = split(&mut node, 4);
        assert_eq!(node.len() + sibling.len(), 10);
        assert!(node.len() >= 4 && sibling.len() >= 4);
        // No overlap between the two halves.
        assert_eq!(node.bbox.intersection_area(&sibling.bbox), 0.0);
        assert!(!node.bbox.intersects(&sibling.bbox));
    }
}
