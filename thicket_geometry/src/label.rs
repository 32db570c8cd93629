// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label geometry: text measuring, anchoring and the rotated hit quad.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Which point of a label's text box sits at the label position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Anchor {
    /// Box center.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "center"))]
    Center,
    /// Middle of the left edge.
    #[cfg_attr(feature = "serde", serde(rename = "l"))]
    Left,
    /// Middle of the right edge.
    #[cfg_attr(feature = "serde", serde(rename = "r"))]
    Right,
    /// Middle of the top edge.
    #[cfg_attr(feature = "serde", serde(rename = "t"))]
    Top,
    /// Middle of the bottom edge.
    #[cfg_attr(feature = "serde", serde(rename = "b"))]
    Bottom,
    /// Top-left corner.
    #[cfg_attr(feature = "serde", serde(rename = "lt"))]
    LeftTop,
    /// Bottom-left corner.
    #[cfg_attr(feature = "serde", serde(rename = "lb"))]
    LeftBottom,
    /// Top-right corner.
    #[cfg_attr(feature = "serde", serde(rename = "rt"))]
    RightTop,
    /// Bottom-right corner.
    #[cfg_attr(feature = "serde", serde(rename = "rb"))]
    RightBottom,
}

impl Anchor {
    /// Parse one of `center, l, r, t, b, lt, lb, rt, rb`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "center" => Self::Center,
            "l" => Self::Left,
            "r" => Self::Right,
            "t" => Self::Top,
            "b" => Self::Bottom,
            "lt" => Self::LeftTop,
            "lb" => Self::LeftBottom,
            "rt" => Self::RightTop,
            "rb" => Self::RightBottom,
            _ => return None,
        })
    }

    /// Anchor position as a fraction of the box size from its top-left corner.
    pub fn fraction(self) -> Vec2 {
        match self {
            Self::Center => Vec2::new(0.5, 0.5),
            Self::Left => Vec2::new(0.0, 0.5),
            Self::Right => Vec2::new(1.0, 0.5),
            Self::Top => Vec2::new(0.5, 0.0),
            Self::Bottom => Vec2::new(0.5, 1.0),
            Self::LeftTop => Vec2::new(0.0, 0.0),
            Self::LeftBottom => Vec2::new(0.0, 1.0),
            Self::RightTop => Vec2::new(1.0, 0.0),
            Self::RightBottom => Vec2::new(1.0, 1.0),
        }
    }
}

/// Measures rendered text for hit boxes.
pub trait TextMeasure {
    /// Size of `text` set in `font_size` pixels of `font_family`.
    fn measure(&self, text: &str, font_size: f64, font_family: Option<&str>) -> Size;
}

/// Font-agnostic estimate: a fixed average advance per character and a fixed
/// line height, both proportional to the font size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ApproxTextMeasure {
    /// Average glyph advance as a fraction of the font size.
    pub advance_ratio: f64,
    /// Line height as a fraction of the font size.
    pub line_height_ratio: f64,
}

impl Default for ApproxTextMeasure {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            line_height_ratio: 1.0,
        }
    }
}

impl TextMeasure for ApproxTextMeasure {
    fn measure(&self, text: &str, font_size: f64, _font_family: Option<&str>) -> Size {
        let glyphs = text.chars().count() as f64;
        Size::new(
            glyphs * font_size * self.advance_ratio,
            font_size * self.line_height_ratio,
        )
    }
}

/// A quadrilateral, corners in drawing order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quad {
    /// Corners: top-left, top-right, bottom-right, bottom-left before rotation.
    pub corners: [Point; 4],
}

impl Quad {
    /// Axis-aligned bounds.
    pub fn bounding_box(&self) -> Rect {
        let [a, b, c, d] = self.corners;
        Rect::from_points(a, b).union_pt(c).union_pt(d)
    }

    /// Mean of the corners.
    pub fn centroid(&self) -> Point {
        let sum = self
            .corners
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
        (sum / 4.0).to_point()
    }

    /// Returns `true` if `point` is inside or on the edge of this convex quad.
    pub fn contains(&self, point: Point) -> bool {
        let (mut left, mut right) = (false, false);
        for i in 0..4 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            let cross = (b - a).cross(point - a);
            left |= cross > 0.0;
            right |= cross < 0.0;
        }
        match (left, right) {
            (true, true) => false,
            (true, false) | (false, true) => true,
            // A degenerate quad only contains points on its outline.
            (false, false) => {
                let b = self.bounding_box();
                point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
            }
        }
    }
}

/// Quad of a `size` text box anchored at `position` and rotated by
/// `rotate_degrees` (clockwise on screen) around it.
pub fn label_quad(position: Point, size: Size, anchor: Anchor, rotate_degrees: f64) -> Quad {
    let offset = anchor.fraction();
    let origin = position - Vec2::new(offset.x * size.width, offset.y * size.height);
    let rect = Rect::from_origin_size(origin, size);
    let rotation = Affine::rotate_about(rotate_degrees.to_radians(), position);
    Quad {
        corners: [
            rotation * Point::new(rect.x0, rect.y0),
            rotation * Point::new(rect.x1, rect.y0),
            rotation * Point::new(rect.x1, rect.y1),
            rotation * Point::new(rect.x0, rect.y1),
        ],
    }
}
