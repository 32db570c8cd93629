// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Select: rectangle and lasso brushing for charts.
//!
//! [`SelectManager`] keeps its own centroid-mode
//! [`SpatialIndex`](thicket_index::SpatialIndex): every mark and layer element
//! is a single point. Brushing gestures map onto that index:
//!
//! - **Rectangle**: [`SelectManager::select_rectangle`] starts a session and
//!   [`SelectManager::update_select_rectangle`] diffs the covered set against
//!   the previous one, firing select for newly covered and deselect for newly
//!   uncovered identities.
//! - **Lasso**: [`SelectManager::start_select_polygon`] and
//!   [`SelectManager::add_point_to_select_polygon`] toggle the centroids inside
//!   each new fan triangle. The parity of those toggles is polygon containment,
//!   so the final selection does not depend on trace direction.
//!   [`SelectManager::move_select_polygon`] drags the finished lasso.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use thicket_geometry::{Command, CommandTape, Mark, MarkType, Section};
//! use thicket_select::{SelectCallbacks, SelectManager};
//!
//! let r = Rect::new(0.0, 0.0, 100.0, 100.0);
//! let section = Rc::new(Section::new("plot", r, r));
//! let tape = CommandTape::new(vec![Command::arc(30.0, 10.0, 3.0, 0.0, 6.3, false)]).unwrap();
//! let dot = Rc::new(Mark::new("dot", MarkType::Point, tape, section));
//!
//! let selected = Rc::new(Cell::new(0));
//! let counter = selected.clone();
//! let mut manager = SelectManager::new();
//! manager.load_mark(
//!     &dot,
//!     SelectCallbacks::new().on_select(move |_, _| counter.set(counter.get() + 1)),
//! );
//!
//! manager.start_select_polygon(Point::new(0.0, 0.0));
//! manager.add_point_to_select_polygon(Point::new(40.0, 0.0));
//! manager.add_point_to_select_polygon(Point::new(40.0, 40.0));
//! assert_eq!(selected.get(), 1);
//! assert_eq!(manager.selection().len(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod lasso;
mod manager;
mod selection;

pub use manager::{SelectCallback, SelectCallbacks, SelectChange, SelectEvent, SelectManager};
pub use selection::SelectionSet;
