// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Interaction: pointer and touch dispatch for chart marks.
//!
//! An [`EventManager`] serves one [`Device`]. Hosts register callbacks per
//! [`InteractionKind`] on marks, layers or section backgrounds, and forward
//! the [`NativeEvent`]s the manager asked for through its [`NativeSurface`].
//!
//! ## Handlers
//!
//! - Click, down and up are stateless: every registered identity under the
//!   pointer fires.
//! - Over and out keep the previously hit set. Each move fires enters for new
//!   hits, then exits for dropped ones.
//! - Drag grabs the hits at down time and fires `start`, then `drag` on every
//!   move with the movement since the last one, then `end` on up or cancel.
//! - Pinch tracks the finger distance per section and reports its change as a
//!   fraction of the section height.
//!
//! Native listeners are reference counted per event name: registering the
//! first callback of a kind attaches what the kind needs, removing the last
//! one detaches what nothing else needs and resets that handler's state.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use thicket_geometry::{Command, CommandTape, Mark, MarkType, Section};
//! use thicket_interaction::{
//!     AlwaysListening, Device, EventManager, InteractionKind, NativeEvent, NativeEventName,
//! };
//!
//! let r = Rect::new(0.0, 0.0, 200.0, 100.0);
//! let section = Rc::new(Section::new("plot", r, r));
//! let tape = CommandTape::new(vec![Command::rect(10.0, 10.0, 30.0, 20.0)]).unwrap();
//! let bar = Rc::new(Mark::new("bar", MarkType::Rectangle, tape, section));
//!
//! let clicks = Rc::new(RefCell::new(Vec::new()));
//! let log = clicks.clone();
//! let mut mouse = EventManager::new(Device::Mouse, AlwaysListening);
//! mouse
//!     .add_mark_interaction(InteractionKind::Click, &bar, move |event, _| {
//!         log.borrow_mut().push(event.local_coordinates);
//!     })
//!     .unwrap();
//!
//! mouse.handle(&NativeEvent::at(NativeEventName::Click, Point::new(20.0, 15.0)));
//! mouse.handle(&NativeEvent::at(NativeEventName::Click, Point::new(90.0, 15.0)));
//! assert_eq!(*clicks.borrow(), [Point::new(20.0, 15.0)]);
//! ```
//!
//! [`Graphic`] bundles a mouse manager, a touch manager and a
//! [`SelectManager`](thicket_select::SelectManager) for one chart.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod drag;
mod error;
mod event;
mod graphic;
mod kind;
mod manager;
mod native;

pub use error::InteractionError;
pub use event::{DragPhase, HitSource, InteractionEvent, Pinch};
pub use graphic::Graphic;
pub use kind::{Device, InteractionKind, NativeEventName};
pub use manager::{EventManager, InteractionCallback};
pub use native::{
    AlwaysListening, Modifiers, NativeEvent, NativeSurface, PointerCoords, RootTransform,
};
