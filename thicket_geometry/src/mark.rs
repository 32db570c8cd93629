// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marks, their style properties and per-type extraction.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::TAU;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Arc, BezPath, PathEl, Point, Rect, Vec2};

use crate::label::{Anchor, Quad, TextMeasure, label_quad};
use crate::section::{ClipMode, Section, clip_box};
use crate::segment::arc_bounds;
use crate::tape::{Command, CommandTape, Step, to_bez_path, walk};

/// Tolerance used when flattening curves for centroids.
const FLATTEN_TOLERANCE: f64 = 0.1;

/// The closed set of mark types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MarkType {
    /// A circle drawn with `arc`.
    Point,
    /// An axis-aligned rectangle.
    Rectangle,
    /// A polygon, possibly with holes or several parts.
    Polygon,
    /// A polyline or curve; hit-tested per segment.
    Line,
    /// A filled area.
    Area,
    /// A glyph-like symbol path.
    Symbol,
    /// A text label.
    Label,
}

/// Which part of a mark an [`Extent`] covers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Part {
    /// The whole mark.
    Whole,
    /// One submark of a polygon-like mark.
    Submark(usize),
    /// One drawn segment of a line mark.
    Segment(usize),
    /// A label's rotated text quad.
    Label(Quad),
}

/// A hit box produced by extraction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extent {
    /// Axis-aligned bounds, stroke-expanded and clipped.
    pub bbox: Rect,
    /// The part of the mark the box covers.
    pub part: Part,
}

/// Style and geometry attributes of a mark.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct MarkProps {
    /// Fill paint; `None`, `""` or `"none"` mean no fill.
    pub fill: Option<String>,
    /// Stroke paint; `None`, `""` or `"none"` mean no stroke.
    pub stroke: Option<String>,
    /// Stroke width in pixels.
    pub stroke_width: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Clip override; `None` uses the section's mode.
    pub clip: Option<ClipMode>,
    /// Label rotation in degrees.
    pub rotate: f64,
    /// Label anchor.
    pub anchor_point: Anchor,
    /// Label font size in pixels.
    pub font_size: f64,
    /// Label font family.
    pub font_family: Option<String>,
    /// Label text.
    pub text: Option<String>,
}

impl Default for MarkProps {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
            clip: None,
            rotate: 0.0,
            anchor_point: Anchor::Center,
            font_size: 16.0,
            font_family: None,
            text: None,
        }
    }
}

fn paints(color: Option<&str>) -> bool {
    color.is_some_and(|c| !c.is_empty() && c != "none")
}

impl MarkProps {
    /// Returns `true` if the mark is filled.
    pub fn is_filled(&self) -> bool {
        paints(self.fill.as_deref())
    }

    /// Returns `true` if the mark is stroked with a positive width.
    pub fn is_stroked(&self) -> bool {
        paints(self.stroke.as_deref()) && self.stroke_width > 0.0
    }

    /// Half the stroke width, or zero when unstroked.
    pub fn half_stroke(&self) -> f64 {
        if self.is_stroked() {
            self.stroke_width / 2.0
        } else {
            0.0
        }
    }
}

impl MarkType {
    /// Returns `true` for types extracted one box per submark.
    pub fn is_area_like(self) -> bool {
        matches!(
            self,
            Self::Rectangle | Self::Polygon | Self::Area | Self::Symbol
        )
    }

    /// Hit boxes of a mark of this type.
    ///
    /// Boxes are stroke-expanded, clipped to `clip`, and dropped when they fall
    /// entirely outside it.
    pub fn bounding_boxes(
        self,
        tape: &CommandTape,
        props: &MarkProps,
        clip: Option<Rect>,
        measure: &dyn TextMeasure,
    ) -> Vec<Extent> {
        let half = props.half_stroke();
        let finish = |bbox: Rect, part: Part| {
            clip_box(bbox.inflate(half, half), clip).map(|bbox| Extent { bbox, part })
        };
        match self {
            Self::Point => {
                let circles = tape
                    .arcs()
                    .map(|arc| {
                        arc_bounds(&Arc {
                            sweep_angle: TAU,
                            ..arc
                        })
                    })
                    .reduce(|a, b| a.union(b));
                circles
                    .or_else(|| accumulate(tape.commands()))
                    .and_then(|bbox| finish(bbox, Part::Whole))
                    .into_iter()
                    .collect()
            }
            Self::Line => tape
                .segments()
                .iter()
                .enumerate()
                .filter_map(|(i, segment)| finish(segment.bounding_box(), Part::Segment(i)))
                .collect(),
            Self::Label => label_geometry(tape, props, measure)
                .and_then(|quad| {
                    clip_box(quad.bounding_box(), clip).map(|bbox| Extent {
                        bbox,
                        part: Part::Label(quad),
                    })
                })
                .into_iter()
                .collect(),
            Self::Rectangle | Self::Polygon | Self::Area | Self::Symbol => tape
                .submarks()
                .enumerate()
                .filter_map(|(i, part)| {
                    accumulate(part).and_then(|bbox| finish(bbox, Part::Submark(i)))
                })
                .collect(),
        }
    }

    /// Representative point of a mark of this type, or `None` for an empty tape.
    pub fn centroid(
        self,
        tape: &CommandTape,
        props: &MarkProps,
        measure: &dyn TextMeasure,
    ) -> Option<Point> {
        match self {
            Self::Point => tape
                .arcs()
                .next()
                .map(|arc| arc.center)
                .or_else(|| vertex_mean(tape.commands())),
            Self::Label => label_geometry(tape, props, measure)
                .map(|quad| quad.centroid())
                .or_else(|| tape.first_point()),
            Self::Line => vertex_mean(tape.commands()),
            Self::Rectangle | Self::Polygon | Self::Area | Self::Symbol => {
                area_centroid(&to_bez_path(tape.commands(), true))
                    .or_else(|| vertex_mean(tape.commands()))
            }
        }
    }
}

/// Rotated text quad of a label, or `None` without text or position.
pub(crate) fn label_geometry(
    tape: &CommandTape,
    props: &MarkProps,
    measure: &dyn TextMeasure,
) -> Option<Quad> {
    let text = props.text.as_deref().filter(|t| !t.is_empty())?;
    let position = tape.first_point()?;
    let size = measure.measure(text, props.font_size, props.font_family.as_deref());
    Some(label_quad(position, size, props.anchor_point, props.rotate))
}

/// Union of the tight bounds of every point and segment in `commands`.
fn accumulate(commands: &[Command]) -> Option<Rect> {
    walk(commands)
        .into_iter()
        .filter_map(|step| match step {
            Step::Start(p) => Some(Rect::from_points(p, p)),
            Step::Draw(segment) => Some(segment.bounding_box()),
            Step::Close { .. } => None,
        })
        .reduce(|a, b| a.union(b))
}

/// Mean of the subpath starts and segment endpoints.
fn vertex_mean(commands: &[Command]) -> Option<Point> {
    let mut sum = Vec2::ZERO;
    let mut count = 0_u32;
    for step in walk(commands) {
        let p = match step {
            Step::Start(p) => p,
            Step::Draw(segment) => segment.end(),
            Step::Close { .. } => continue,
        };
        sum += p.to_vec2();
        count += 1;
    }
    (count > 0).then(|| (sum / f64::from(count)).to_point())
}

/// Shoelace sums over every ring of a flattened path.
#[derive(Default)]
struct Shoelace {
    /// Twice the signed area.
    area2: f64,
    cx: f64,
    cy: f64,
    first: Point,
    prev: Point,
}

impl Shoelace {
    fn edge(&mut self, a: Point, b: Point) {
        let cross = a.x * b.y - b.x * a.y;
        self.area2 += cross;
        self.cx += (a.x + b.x) * cross;
        self.cy += (a.y + b.y) * cross;
    }

    fn close_ring(&mut self) {
        if self.prev != self.first {
            self.edge(self.prev, self.first);
        }
        self.prev = self.first;
    }
}

/// Area-weighted centroid of all rings, or `None` when the signed area vanishes.
fn area_centroid(path: &BezPath) -> Option<Point> {
    let mut sums = Shoelace::default();
    kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            sums.close_ring();
            sums.first = p;
            sums.prev = p;
        }
        PathEl::LineTo(p) => {
            sums.edge(sums.prev, p);
            sums.prev = p;
        }
        PathEl::ClosePath => sums.close_ring(),
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    sums.close_ring();
    if sums.area2.abs() < 1e-12 {
        return None;
    }
    let scale = 3.0 * sums.area2;
    Some(Point::new(sums.cx / scale, sums.cy / scale))
}

/// One drawable geometric primitive.
#[derive(Clone, Debug)]
pub struct Mark {
    /// Identifier, unique within a graphic.
    pub id: String,
    /// Mark type.
    pub kind: MarkType,
    /// Screen-space geometry.
    pub tape: CommandTape,
    /// Style and geometry attributes.
    pub props: MarkProps,
    /// The section the mark is drawn in.
    pub section: Rc<Section>,
}

impl Mark {
    /// A mark with default properties.
    pub fn new(
        id: impl Into<String>,
        kind: MarkType,
        tape: CommandTape,
        section: Rc<Section>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            tape,
            props: MarkProps::default(),
            section,
        }
    }

    /// Replace the properties.
    #[must_use]
    pub fn with_props(mut self, props: MarkProps) -> Self {
        self.props = props;
        self
    }

    /// Hit boxes, clipped by the section.
    pub fn extents(&self, measure: &dyn TextMeasure) -> Vec<Extent> {
        let clip = self.section.clip_rect(self.props.clip);
        self.kind
            .bounding_boxes(&self.tape, &self.props, clip, measure)
    }

    /// Representative point used by centroid indexes.
    pub fn centroid(&self, measure: &dyn TextMeasure) -> Option<Point> {
        self.kind.centroid(&self.tape, &self.props, measure)
    }
}
