// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawn segments and their exact bounding boxes.
//!
//! Line and Bézier bounds come from Kurbo's [`ParamCurveExtrema`], which adds
//! the roots of the derivative that fall inside `(0, 1)` to the endpoints.
//! Elliptical arcs add their endpoints plus whichever axis extrema the sweep
//! crosses: for unrotated arcs these are the four cardinal points and a
//! quadrant table says which of them are crossed; rotated ellipses use the
//! analytic extremal parameters.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{
    Arc, CubicBez, Line, ParamCurve, ParamCurveExtrema, ParamCurveNearest, PathEl, Point, QuadBez,
    Rect,
};

use crate::tape::{ARC_TOLERANCE, normalize_angle, point_on_arc};

/// Accuracy passed to Kurbo's nearest-point solvers.
const NEAREST_ACCURACY: f64 = 1e-6;

/// One drawn piece of a path outline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Segment {
    /// Straight line.
    Line(Line),
    /// Quadratic Bézier.
    Quad(QuadBez),
    /// Cubic Bézier.
    Cubic(CubicBez),
    /// Elliptical arc; `sweep_angle` is signed and never exceeds a full turn.
    Arc(Arc),
}

impl Segment {
    /// Start point.
    pub fn start(&self) -> Point {
        match self {
            Self::Line(l) => l.p0,
            Self::Quad(q) => q.p0,
            Self::Cubic(c) => c.p0,
            Self::Arc(a) => point_on_arc(a, a.start_angle),
        }
    }

    /// End point.
    pub fn end(&self) -> Point {
        match self {
            Self::Line(l) => l.p1,
            Self::Quad(q) => q.p2,
            Self::Cubic(c) => c.p3,
            Self::Arc(a) => point_on_arc(a, a.start_angle + a.sweep_angle),
        }
    }

    /// Point at parameter `t` in `[0, 1]`. Arcs are parameterized by angle.
    pub fn eval(&self, t: f64) -> Point {
        match self {
            Self::Line(l) => l.eval(t),
            Self::Quad(q) => q.eval(t),
            Self::Cubic(c) => c.eval(t),
            Self::Arc(a) => point_on_arc(a, a.start_angle + a.sweep_angle * t),
        }
    }

    /// Tight axis-aligned bounds of the segment.
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Line(l) => Rect::from_points(l.p0, l.p1),
            Self::Quad(q) => q.bounding_box(),
            Self::Cubic(c) => c.bounding_box(),
            Self::Arc(a) => arc_bounds(a),
        }
    }

    /// Distance from `point` to the nearest point of the segment.
    pub fn distance_to(&self, point: Point) -> f64 {
        let distance_sq = match self {
            Self::Line(l) => l.nearest(point, NEAREST_ACCURACY).distance_sq,
            Self::Quad(q) => q.nearest(point, NEAREST_ACCURACY).distance_sq,
            Self::Cubic(c) => c.nearest(point, NEAREST_ACCURACY).distance_sq,
            Self::Arc(a) => {
                let mut from = point_on_arc(a, a.start_angle);
                let mut best = from.distance_squared(point);
                for el in a.append_iter(ARC_TOLERANCE) {
                    if let PathEl::CurveTo(p1, p2, p3) = el {
                        let cubic = CubicBez::new(from, p1, p2, p3);
                        best = best.min(cubic.nearest(point, NEAREST_ACCURACY).distance_sq);
                        from = p3;
                    }
                }
                best
            }
        };
        distance_sq.sqrt()
    }
}

// Cardinal directions by bit: 0 => +x, 1 => +y, 2 => -x, 3 => -y. The point at
// angle k·π/2 starts quadrant k.
const E: u8 = 1 << 0;
const S: u8 = 1 << 1;
const W: u8 = 1 << 2;
const N: u8 = 1 << 3;

/// Cardinal points crossed travelling in the positive direction from quadrant
/// `[start]` to quadrant `[end]`, within less than one full turn.
const CROSSED: [[u8; 4]; 4] = [
    [0, S, S | W, S | W | N],
    [W | N | E, 0, W, W | N],
    [N | E, N | E | S, 0, N],
    [E, E | S, E | S | W, 0],
];

/// Exact bounds of an elliptical arc.
pub(crate) fn arc_bounds(arc: &Arc) -> Rect {
    // Travel in the positive direction from the earlier endpoint.
    let (start, sweep) = if arc.sweep_angle < 0.0 {
        (arc.start_angle + arc.sweep_angle, -arc.sweep_angle)
    } else {
        (arc.start_angle, arc.sweep_angle)
    };
    let mut bounds = Rect::from_points(point_on_arc(arc, start), point_on_arc(arc, start + sweep));

    if arc.x_rotation == 0.0 {
        let crossed = crossed_cardinals(start, sweep);
        let (c, r) = (arc.center, arc.radii);
        for (bit, extreme) in [
            (E, Point::new(c.x + r.x, c.y)),
            (S, Point::new(c.x, c.y + r.y)),
            (W, Point::new(c.x - r.x, c.y)),
            (N, Point::new(c.x, c.y - r.y)),
        ] {
            if crossed & bit != 0 {
                bounds = bounds.union_pt(extreme);
            }
        }
    } else {
        let (sin_r, cos_r) = (arc.x_rotation.sin(), arc.x_rotation.cos());
        let (rx, ry) = (arc.radii.x, arc.radii.y);
        let t_x = (-ry * sin_r).atan2(rx * cos_r);
        let t_y = (ry * cos_r).atan2(rx * sin_r);
        for t in [t_x, t_x + PI, t_y, t_y + PI] {
            if sweep >= TAU || normalize_angle(t - start) <= sweep {
                bounds = bounds.union_pt(point_on_arc(arc, t));
            }
        }
    }
    bounds
}

/// Bit set of cardinal points crossed by a positive sweep from `start`.
fn crossed_cardinals(start: f64, sweep: f64) -> u8 {
    if sweep >= TAU {
        return E | S | W | N;
    }
    let from = normalize_angle(start);
    let mut to = from + sweep;
    let wrapped = to >= TAU;
    if wrapped {
        to -= TAU;
    }
    let (q_from, q_to) = (quadrant(from), quadrant(to));
    if wrapped && q_from == q_to {
        // Left the start quadrant and came all the way back round.
        E | S | W | N
    } else {
        CROSSED[q_from][q_to]
    }
}

fn quadrant(angle: f64) -> usize {
    match angle / FRAC_PI_2 {
        q if q < 1.0 => 0,
        q if q < 2.0 => 1,
        q if q < 3.0 => 2,
        _ => 3,
    }
}
