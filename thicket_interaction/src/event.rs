// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events handed to interaction callbacks.

use alloc::string::String;

use kurbo::{Point, Rect, Vec2};
use thicket_geometry::MarkType;
use thicket_index::Identity;

use crate::kind::{InteractionKind, NativeEventName};
use crate::native::Modifiers;

/// What an event was dispatched for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HitSource {
    /// A standalone mark.
    Mark,
    /// An element of a layer.
    Layer,
    /// A section background.
    Section,
}

/// Phase of a drag session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// Pointer went down on the item.
    Start,
    /// Pointer moved while down.
    Drag,
    /// Pointer went up or the touch was cancelled.
    End,
}

/// Two-finger pinch details.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pinch {
    /// Midpoint of the fingers, root-relative.
    pub center: Point,
    /// Local coordinates of each finger.
    pub fingers: [Point; 2],
    /// Change in finger distance since the previous pinch event, as a
    /// fraction of the section height. Positive when the fingers close.
    pub delta: f64,
}

/// An interaction delivered to a callback.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionEvent {
    /// The registered kind.
    pub kind: InteractionKind,
    /// The native event that triggered it.
    pub native_type: NativeEventName,
    /// Root-relative pixel position.
    pub screen_coordinates: Point,
    /// Section-local position of the screen point, clamped to the padded
    /// extent.
    pub local_coordinates: Point,
    /// Mark, layer or section.
    pub hit_source: HitSource,
    /// Identity of the hit item; `None` for sections.
    pub identity: Option<Identity>,
    /// Type of the hit mark.
    pub mark_type: Option<MarkType>,
    /// Box of the hit item.
    pub hit_bbox: Option<Rect>,
    /// Layer element index.
    pub index: Option<usize>,
    /// Layer element key.
    pub key: Option<String>,
    /// Phase, for drag kinds.
    pub drag_type: Option<DragPhase>,
    /// Movement since the previous drag event, or the wheel delta.
    pub delta: Option<Vec2>,
    /// Pinch details.
    pub pinch: Option<Pinch>,
    /// Modifier keys.
    pub modifiers: Modifiers,
    /// Client position of the primary pointer.
    pub client: Point,
    /// Page position of the primary pointer.
    pub page: Point,
    /// Screen position of the primary pointer.
    pub screen: Point,
    /// Host timestamp in milliseconds.
    pub time_stamp: f64,
}
