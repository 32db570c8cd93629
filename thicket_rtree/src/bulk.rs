// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! OMT (overlap-minimizing top-down) bulk loading.
//!
//! Items are tiled top-down: the root gets `ceil(N / M^(h-1))` children, each
//! level partitions its items into roughly square tiles by partially sorting on
//! x and then on y. Partial sorting uses [`multi_select`], which only orders the
//! items enough that every aligned group of `n` holds the right elements.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::node::Node;
use crate::types::Bounded;

/// Build a balanced subtree holding `items`.
///
/// `items` must not be empty.
pub(crate) fn build<T: Bounded>(items: Vec<T>, max_entries: usize) -> Node<T> {
    if items.len() <= max_entries {
        return Node::leaf(items);
    }
    let height = target_height(items.len(), max_entries);
    let root_fanout = items.len().div_ceil(max_entries.pow(exponent(height - 1)));
    build_level(items, height, root_fanout, max_entries)
}

fn build_level<T: Bounded>(
    mut items: Vec<T>,
    height: usize,
    fanout: usize,
    max_entries: usize,
) -> Node<T> {
    let count = items.len();
    if count <= max_entries || height <= 1 {
        // A short tail tile still has to end at leaf level.
        return Node::leaf(items).lift_to(height);
    }

    let per_child = count.div_ceil(fanout);
    let per_column = per_child * ceil_sqrt(fanout);

    multi_select(&mut items, per_column, |a, b| {
        a.aabb().min_x.total_cmp(&b.aabb().min_x)
    });

    let mut children = Vec::with_capacity(fanout);
    for mut column in into_chunks(items, per_column) {
        multi_select(&mut column, per_child, |a, b| {
            a.aabb().min_y.total_cmp(&b.aabb().min_y)
        });
        for tile in into_chunks(column, per_child) {
            children.push(build_level(tile, height - 1, max_entries, max_entries));
        }
    }
    Node::internal(children, height)
}

/// Smallest `h >= 1` with `max_entries^h >= count`, i.e. `ceil(log_M(count))`.
pub(crate) fn target_height(count: usize, max_entries: usize) -> usize {
    let mut height = 1;
    let mut capacity = max_entries;
    while capacity < count {
        capacity = capacity.saturating_mul(max_entries);
        height += 1;
    }
    height
}

fn exponent(power: usize) -> u32 {
    u32::try_from(power).unwrap_or(u32::MAX)
}

/// Smallest `s` with `s * s >= n`.
fn ceil_sqrt(n: usize) -> usize {
    let mut s = 1;
    while s * s < n {
        s += 1;
    }
    s
}

/// Split `items` into consecutive owned chunks of `size` (the last may be shorter).
fn into_chunks<T>(mut items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let mut chunks = Vec::with_capacity(items.len().div_ceil(size));
    // Peel chunks off the end so each element is moved once.
    while items.len() > size {
        let at = (items.len() - 1) / size * size;
        chunks.push(items.split_off(at));
    }
    chunks.push(items);
    chunks.reverse();
    chunks
}

/// Reorder `items` so that each aligned group of `n` consecutive elements holds
/// exactly the elements it would hold after a full sort, in any order within
/// the group.
pub(crate) fn multi_select<T>(items: &mut [T], n: usize, mut compare: impl FnMut(&T, &T) -> Ordering) {
    if n == 0 {
        return;
    }
    // Half-open ranges whose start is aligned to a group boundary.
    let mut stack = vec![(0_usize, items.len())];
    while let Some((left, right)) = stack.pop() {
        if right - left <= n {
            continue;
        }
        let mid = left + (right - left).div_ceil(2 * n) * n;
        items[left..right].select_nth_unstable_by(mid - left, &mut compare);
        stack.push((left, mid));
        stack.push((mid, right));
    }
}
