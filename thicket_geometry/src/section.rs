// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sections: the clip rectangles and coordinate system a mark is drawn in.

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use kurbo::{Affine, Point, Rect};

/// Which section rectangle clips a mark's hit boxes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ClipMode {
    /// Clip to the padded (inner) extent.
    #[default]
    Padding,
    /// Clip to the outer extent.
    Outer,
    /// No clipping.
    Off,
}

/// Maps screen pixels into a section's local (data) coordinates.
///
/// The coordinate-system machinery lives outside this crate; it plugs in here.
pub trait ScreenToLocal {
    /// Local coordinates of a screen point.
    fn screen_to_local(&self, screen: Point) -> Point;
}

/// An affine is read as the local-to-screen transform and inverted.
impl ScreenToLocal for Affine {
    fn screen_to_local(&self, screen: Point) -> Point {
        self.inverse() * screen
    }
}

/// The section a mark or layer belongs to.
#[derive(Clone)]
pub struct Section {
    /// Identifier, unique within a graphic.
    pub id: String,
    /// Outer extent in screen pixels.
    pub bbox: Rect,
    /// Inner extent (outer minus padding) in screen pixels.
    pub padded_bbox: Rect,
    /// Default clip mode for marks that do not set one.
    pub clip: ClipMode,
    coordinates: Rc<dyn ScreenToLocal>,
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("id", &self.id)
            .field("bbox", &self.bbox)
            .field("padded_bbox", &self.padded_bbox)
            .field("clip", &self.clip)
            .finish_non_exhaustive()
    }
}

impl Section {
    /// A section whose local coordinates are its screen coordinates.
    pub fn new(id: impl Into<String>, bbox: Rect, padded_bbox: Rect) -> Self {
        Self {
            id: id.into(),
            bbox,
            padded_bbox,
            clip: ClipMode::default(),
            coordinates: Rc::new(Affine::IDENTITY),
        }
    }

    /// Set the default clip mode.
    #[must_use]
    pub fn with_clip(mut self, clip: ClipMode) -> Self {
        self.clip = clip;
        self
    }

    /// Set the screen-to-local mapping.
    #[must_use]
    pub fn with_coordinates(mut self, coordinates: impl ScreenToLocal + 'static) -> Self {
        self.coordinates = Rc::new(coordinates);
        self
    }

    /// Clip rectangle for a mark, given the mark's own clip override.
    pub fn clip_rect(&self, mark_clip: Option<ClipMode>) -> Option<Rect> {
        match mark_clip.unwrap_or(self.clip) {
            ClipMode::Padding => Some(self.padded_bbox),
            ClipMode::Outer => Some(self.bbox),
            ClipMode::Off => None,
        }
    }

    /// Returns `true` if a screen point lies in the padded extent (edges inclusive).
    pub fn contains(&self, screen: Point) -> bool {
        let r = &self.padded_bbox;
        screen.x >= r.x0 && screen.x <= r.x1 && screen.y >= r.y0 && screen.y <= r.y1
    }

    /// Clamp a screen point into the padded extent.
    pub fn clamp(&self, screen: Point) -> Point {
        let r = &self.padded_bbox;
        Point::new(screen.x.max(r.x0).min(r.x1), screen.y.max(r.y0).min(r.y1))
    }

    /// Local coordinates of a screen point, clamped to the padded extent first.
    pub fn to_local(&self, screen: Point) -> Point {
        self.coordinates.screen_to_local(self.clamp(screen))
    }
}

/// Clip `bbox` to `clip`. Returns `None` when they share no point.
pub fn clip_box(bbox: Rect, clip: Option<Rect>) -> Option<Rect> {
    let Some(c) = clip else {
        return Some(bbox);
    };
    let overlaps = bbox.x0 <= c.x1 && c.x0 <= bbox.x1 && bbox.y0 <= c.y1 && c.y0 <= bbox.y1;
    overlaps.then(|| {
        Rect::new(
            bbox.x0.max(c.x0),
            bbox.y0.max(c.y0),
            bbox.x1.min(c.x1),
            bbox.y1.min(c.y1),
        )
    })
}
