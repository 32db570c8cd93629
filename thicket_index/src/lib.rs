// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Index: hit testing of chart marks for one interaction context.
//!
//! [`SpatialIndex`] binds a [`thicket_rtree::RTree`] to mark and layer
//! identities. Indexing a [`Mark`](thicket_geometry::Mark) or
//! [`Layer`](thicket_geometry::Layer) bulk-loads its boxes; a point query
//! searches a zero-area box and then refines each coarse hit:
//!
//! - filled paths: nonzero-winding containment of the re-issued path;
//! - stroked paths and line segments: distance to the outline within half the
//!   stroke width plus [`HitParams::stroke_tolerance`];
//! - points: a disk (or ring, when only stroked) test;
//! - labels: containment in the rotated text quad;
//! - centroid items and unpainted marks: the box is authoritative.
//!
//! Results are de-duplicated by [`Identity`], keeping the first hit.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use thicket_geometry::{Command, CommandTape, Mark, MarkProps, MarkType, Section};
//! use thicket_index::{Identity, IndexMode, SpatialIndex};
//!
//! let r = Rect::new(0.0, 0.0, 100.0, 100.0);
//! let section = Rc::new(Section::new("plot", r, r));
//! let tape = CommandTape::new(vec![
//!     Command::move_to(10.0, 10.0),
//!     Command::line_to(50.0, 10.0),
//!     Command::line_to(10.0, 50.0),
//!     Command::ClosePath,
//! ])
//! .unwrap();
//! let props = MarkProps { fill: Some("steelblue".into()), ..MarkProps::default() };
//! let tri = Rc::new(Mark::new("tri", MarkType::Polygon, tape, section).with_props(props));
//!
//! let mut index = SpatialIndex::new(IndexMode::Extent);
//! index.index_mark(&tri);
//! let hits = index.query_point(Point::new(15.0, 15.0));
//! assert_eq!(hits[0].identity, Identity::Mark("tri".into()));
//! // Inside the box but outside the triangle.
//! assert!(index.query_point(Point::new(45.0, 45.0)).is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hit;
mod identity;
mod index;

pub use hit::HitParams;
pub use identity::{Identity, Source};
pub use index::{IndexMode, IndexedItem, SpatialIndex};
