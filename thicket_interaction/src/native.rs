// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native events and the host surface they come from.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Affine, Point, Vec2};
use tracing::debug;

use crate::kind::NativeEventName;

/// The host seam where native listeners live.
///
/// An event manager attaches one listener per distinct event name, no matter
/// how many interaction kinds need it, and detaches it when the last of them
/// goes away. The host forwards whatever arrives to
/// [`EventManager::handle`](crate::EventManager::handle).
pub trait NativeSurface {
    /// Start listening for `name`.
    fn attach(&mut self, name: NativeEventName);
    /// Stop listening for `name`.
    fn detach(&mut self, name: NativeEventName);
}

/// A surface that ignores attach and detach, for hosts that listen to
/// everything anyway.
#[derive(Copy, Clone, Debug, Default)]
pub struct AlwaysListening;

impl NativeSurface for AlwaysListening {
    fn attach(&mut self, _name: NativeEventName) {}
    fn detach(&mut self, _name: NativeEventName) {}
}

/// Reference counts of attached native listeners.
#[derive(Clone, Debug, Default)]
pub(crate) struct Listeners {
    counts: HashMap<NativeEventName, usize>,
}

impl Listeners {
    pub(crate) fn acquire(&mut self, names: &[NativeEventName], surface: &mut dyn NativeSurface) {
        for &name in names {
            let count = self.counts.entry(name).or_insert(0);
            *count += 1;
            if *count == 1 {
                debug!(event = name.as_str(), "attach native listener");
                surface.attach(name);
            }
        }
    }

    pub(crate) fn release(&mut self, names: &[NativeEventName], surface: &mut dyn NativeSurface) {
        for &name in names {
            let Some(count) = self.counts.get_mut(&name) else {
                continue;
            };
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&name);
                debug!(event = name.as_str(), "detach native listener");
                surface.detach(name);
            }
        }
    }

    pub(crate) fn count(&self, name: NativeEventName) -> usize {
        self.counts.get(&name).copied().unwrap_or(0)
    }
}

/// Modifier keys held during an event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Alt / Option.
    pub alt: bool,
    /// Control.
    pub ctrl: bool,
    /// Shift.
    pub shift: bool,
}

/// One pointer or finger, in the host's coordinate spaces.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerCoords {
    /// Viewport coordinates.
    pub client: Point,
    /// Document coordinates.
    pub page: Point,
    /// Physical screen coordinates.
    pub screen: Point,
}

impl PointerCoords {
    /// A pointer whose page and screen coordinates equal its client ones.
    pub fn at(client: Point) -> Self {
        Self {
            client,
            page: client,
            screen: client,
        }
    }
}

/// A native event as forwarded by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeEvent {
    /// Event name.
    pub name: NativeEventName,
    /// Active pointers; two or more for multi-touch.
    pub pointers: Vec<PointerCoords>,
    /// Modifier keys.
    pub modifiers: Modifiers,
    /// Scroll amount of a wheel event.
    pub wheel_delta: Vec2,
    /// Host timestamp in milliseconds.
    pub time_stamp: f64,
}

impl NativeEvent {
    /// An event with the given pointers and no modifiers.
    pub fn new(name: NativeEventName, pointers: impl IntoIterator<Item = PointerCoords>) -> Self {
        Self {
            name,
            pointers: pointers.into_iter().collect(),
            modifiers: Modifiers::default(),
            wheel_delta: Vec2::ZERO,
            time_stamp: 0.0,
        }
    }

    /// A single-pointer event at a client position.
    pub fn at(name: NativeEventName, client: Point) -> Self {
        Self::new(name, [PointerCoords::at(client)])
    }

    /// A multi-touch event at client positions.
    pub fn touches(name: NativeEventName, clients: &[Point]) -> Self {
        Self::new(name, clients.iter().copied().map(PointerCoords::at))
    }

    /// Set the modifier keys.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the wheel delta.
    #[must_use]
    pub fn with_wheel_delta(mut self, delta: Vec2) -> Self {
        self.wheel_delta = delta;
        self
    }

    /// Set the timestamp.
    #[must_use]
    pub fn with_time_stamp(mut self, time_stamp: f64) -> Self {
        self.time_stamp = time_stamp;
        self
    }

    /// The first pointer, if any.
    pub fn primary(&self) -> Option<&PointerCoords> {
        self.pointers.first()
    }
}

/// Maps client coordinates to root-relative pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RootTransform {
    /// An SVG root: client points go through the inverse of its screen CTM.
    Svg {
        /// Root user space to client space.
        screen_ctm: Affine,
    },
    /// A canvas root: client points are offset by its bounding-rect origin.
    Canvas {
        /// Top-left of the canvas in client space.
        origin: Point,
    },
}

impl Default for RootTransform {
    fn default() -> Self {
        Self::Canvas {
            origin: Point::ZERO,
        }
    }
}

impl RootTransform {
    /// Root-relative position of a client point.
    pub fn to_root(&self, client: Point) -> Point {
        match self {
            Self::Svg { screen_ctm } => screen_ctm.inverse() * client,
            Self::Canvas { origin } => client - origin.to_vec2(),
        }
    }
}
