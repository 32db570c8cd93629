// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket R-tree: a dynamic, bulk-loadable, height-balanced R-tree over 2D boxes.
//!
//! [`RTree`] stores any item implementing [`Bounded`] and answers rectangle
//! queries in logarithmic time. It is the shared leaf dependency of the
//! hit-testing index and the brushing selection manager, but has no knowledge
//! of marks, layers or events.
//!
//! - [`RTree::insert`] descends by least area enlargement and splits overflowing
//!   nodes with the R*-tree margin/overlap heuristics.
//! - [`RTree::load`] packs a batch with the OMT (overlap-minimizing top-down)
//!   algorithm and merges it with whatever the tree already holds.
//! - [`RTree::search`] and [`RTree::collides`] use inclusive intersection:
//!   touching boxes intersect and a zero-area box works as a point query.
//! - [`RTree::remove`] and [`RTree::remove_by`] condense the tree bottom-up.
//!
//! ## Minimal example
//!
//! ```rust
//! use thicket_rtree::{Aabb2D, RTree};
//!
//! let mut tree = RTree::new();
//! tree.load((0..100_u32).map(|i| {
//!     let x = f64::from(i) * 10.0;
//!     (Aabb2D::new(x, 0.0, x + 5.0, 5.0), i)
//! }));
//!
//! let hits = tree.search(&Aabb2D::from_point(12.0, 2.0));
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].1, 1);
//!
//! assert_eq!(tree.remove(&(Aabb2D::new(10.0, 0.0, 15.0, 5.0), 1)).map(|(_, i)| i), Some(1));
//! assert!(tree.search(&Aabb2D::from_point(12.0, 2.0)).is_empty());
//! ```
//!
//! Items are owned by the tree. Store a cheap handle (an id, an `Rc`) next to
//! the box when the geometry lives elsewhere; a `(Aabb2D, T)` tuple implements
//! [`Bounded`] for that purpose.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bulk;
mod node;
mod split;
mod tree;
mod types;

pub use tree::{Iter, RTree, RTreeConfig};
pub use types::{Aabb2D, Bounded};
