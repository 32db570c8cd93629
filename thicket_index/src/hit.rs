// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exact refinement of coarse box hits.

use alloc::rc::Rc;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, Point, Shape};
use thicket_geometry::{CommandTape, MarkProps, MarkType, Part, Quad, Segment};

const FILLED_LINE_HALF_WIDTH: f64 = 0.5;

/// Tolerances for exact hit tests.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitParams {
    /// Extra reach, in pixels, outside a filled shape's outline.
    pub fill_tolerance: f64,
    /// Extra reach, in pixels, beyond half the stroke width.
    pub stroke_tolerance: f64,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            fill_tolerance: 0.0,
            stroke_tolerance: 0.5,
        }
    }
}

/// A filled and/or stroked outline shared by every box of one element.
#[derive(Debug)]
pub(crate) struct Outline {
    /// Fill path, with open subpaths closed.
    path: BezPath,
    segments: Vec<Segment>,
    filled: bool,
    half_stroke: f64,
}

impl Outline {
    fn distance(&self, point: Point) -> f64 {
        self.segments
            .iter()
            .map(|s| s.distance_to(point))
            .fold(f64::INFINITY, f64::min)
    }

    fn hit(&self, point: Point, params: &HitParams) -> bool {
        if self.filled {
            if self.path.winding(point) != 0 {
                return true;
            }
            if params.fill_tolerance > 0.0 && self.distance(point) <= params.fill_tolerance {
                return true;
            }
        }
        self.half_stroke > 0.0 && self.distance(point) <= self.half_stroke + params.stroke_tolerance
    }
}

/// What a coarse hit on an item is refined against.
#[derive(Clone, Debug)]
pub(crate) enum HitShape {
    /// The box is authoritative.
    Coarse,
    /// A filled and/or stroked circle.
    Disk {
        center: Point,
        radius: f64,
        filled: bool,
        half_stroke: f64,
    },
    /// A path outline.
    Outline(Rc<Outline>),
    /// One stroked segment of a line.
    Stroke { segment: Segment, half_width: f64 },
    /// A label's rotated text quad.
    Quad(Quad),
}

impl HitShape {
    /// Returns `true` if `point` hits the shape.
    pub(crate) fn hit(&self, point: Point, params: &HitParams) -> bool {
        match self {
            Self::Coarse => true,
            Self::Disk {
                center,
                radius,
                filled,
                half_stroke,
            } => {
                let d = center.distance(point);
                (*filled && d <= radius + half_stroke + params.fill_tolerance)
                    || (*half_stroke > 0.0
                        && (d - radius).abs() <= half_stroke + params.stroke_tolerance)
            }
            Self::Outline(outline) => outline.hit(point, params),
            Self::Stroke {
                segment,
                half_width,
            } => segment.distance_to(point) <= half_width + params.stroke_tolerance,
            Self::Quad(quad) => quad.contains(point),
        }
    }
}

/// Builds the refinement shapes of one mark or layer element.
///
/// The outline is built once and shared by every submark box.
pub(crate) struct ShapeBuilder<'a> {
    kind: MarkType,
    tape: &'a CommandTape,
    props: &'a MarkProps,
    outline: Option<Rc<Outline>>,
    segments: Option<Vec<Segment>>,
}

impl<'a> ShapeBuilder<'a> {
    pub(crate) fn new(kind: MarkType, tape: &'a CommandTape, props: &'a MarkProps) -> Self {
        Self {
            kind,
            tape,
            props,
            outline: None,
            segments: None,
        }
    }

    pub(crate) fn shape(&mut self, part: &Part) -> HitShape {
        let props = self.props;
        if let Part::Label(quad) = part {
            return HitShape::Quad(*quad);
        }
        if !props.is_filled() && !props.is_stroked() {
            return HitShape::Coarse;
        }
        match (self.kind, part) {
            (MarkType::Line, Part::Segment(i)) => {
                let tape = self.tape;
                let segments = self.segments.get_or_insert_with(|| tape.segments());
                match segments.get(*i) {
                    Some(segment) => HitShape::Stroke {
                        segment: *segment,
                        // Filled but unstroked lines hit like a 1px stroke.
                        half_width: if props.is_stroked() {
                            props.half_stroke()
                        } else {
                            FILLED_LINE_HALF_WIDTH
                        },
                    },
                    None => HitShape::Coarse,
                }
            }
            (MarkType::Point, _) => match self.tape.arcs().next() {
                Some(arc) => HitShape::Disk {
                    center: arc.center,
                    radius: arc.radii.x.max(arc.radii.y),
                    filled: props.is_filled(),
                    half_stroke: props.half_stroke(),
                },
                None => HitShape::Outline(self.outline()),
            },
            _ => HitShape::Outline(self.outline()),
        }
    }

    fn outline(&mut self) -> Rc<Outline> {
        let (tape, props) = (self.tape, self.props);
        self.outline
            .get_or_insert_with(|| {
                Rc::new(Outline {
                    path: tape.to_fill_path(),
                    segments: tape.segments(),
                    filled: props.is_filled(),
                    half_stroke: props.half_stroke(),
                })
            })
            .clone()
    }
}
