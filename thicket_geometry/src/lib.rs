// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Geometry: hit boxes and centroids for chart marks.
//!
//! A mark's geometry arrives as a [`CommandTape`]: screen-space drawing ops in
//! 2D canvas order, with [`Command::Submark`] separating independently bounded
//! parts (holes, multi-polygons). This crate turns a tape plus style into the
//! boxes a spatial index stores and the points a brushing selection tests.
//!
//! - [`MarkType::bounding_boxes`] extracts [`Extent`]s per mark type: one box for
//!   a point, one per submark for polygon-like marks, one per segment for lines,
//!   and a rotated [`Quad`] for labels. Boxes are stroke-expanded and clipped to
//!   the owning [`Section`]; boxes fully outside the clip are dropped.
//! - [`MarkType::centroid`] gives the representative point: area-weighted
//!   shoelace centroid for polygon-like marks, arc center for points, quad
//!   centroid for labels and vertex mean for lines.
//! - [`Segment::bounding_box`] is exact: Bézier extrema come from derivative
//!   roots, arcs from the cardinal points their sweep crosses.
//! - [`Layer`] resolves per-element [`Aesthetic`]s into [`MarkProps`].
//!
//! Tapes are validated when built. Unknown ops, wrong arity, negative radii and
//! non-finite arguments are rejected with a [`GeometryError`].
//!
//! ## Minimal example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use kurbo::Rect;
//! use thicket_geometry::{ApproxTextMeasure, CommandTape, Mark, MarkType, Section};
//!
//! let section = Rc::new(Section::new(
//!     "plot",
//!     Rect::new(0.0, 0.0, 200.0, 100.0),
//!     Rect::new(10.0, 10.0, 190.0, 90.0),
//! ));
//! let tape = CommandTape::parse([("arc", &[50.0, 50.0, 4.0, 0.0, 6.3][..])]).unwrap();
//! let dot = Mark::new("dot", MarkType::Point, tape, section);
//!
//! let extents = dot.extents(&ApproxTextMeasure::default());
//! assert_eq!(extents[0].bbox, Rect::new(46.0, 46.0, 54.0, 54.0));
//!
//! assert!(CommandTape::parse([("arcTo", &[0.0; 5][..])]).is_err());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod label;
mod layer;
mod mark;
mod section;
mod segment;
mod tape;

pub use error::GeometryError;
pub use label::{Anchor, ApproxTextMeasure, Quad, TextMeasure, label_quad};
pub use layer::{Aesthetic, Layer, LayerProps};
pub use mark::{Extent, Mark, MarkProps, MarkType, Part};
pub use section::{ClipMode, ScreenToLocal, Section, clip_box};
pub use segment::Segment;
pub use tape::{Command, CommandTape};
