// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Crossing-number containment for lassos.
//!
//! Every test counts how many edges a ray cast from the point toward +x
//! crosses. An edge counts when exactly one endpoint lies strictly below the
//! point (half-open in y), and its crossing abscissa is computed from a
//! canonical endpoint order. Because of that, the two copies of an interior fan
//! diagonal always agree and cancel, so toggling per fan triangle gives the
//! same parity as testing the whole polygon, whatever the trace direction.

use kurbo::{Point, Rect};

/// Returns `true` if the +x ray from `p` crosses edge `ab`.
fn crosses(a: Point, b: Point, p: Point) -> bool {
    let (lo, hi) = if (a.y, a.x) <= (b.y, b.x) { (a, b) } else { (b, a) };
    if (lo.y > p.y) == (hi.y > p.y) {
        return false;
    }
    let x = lo.x + (p.y - lo.y) * (hi.x - lo.x) / (hi.y - lo.y);
    x > p.x
}

/// Containment in triangle `abc` under the crossing rule.
pub(crate) fn in_triangle(a: Point, b: Point, c: Point, p: Point) -> bool {
    crosses(a, b, p) ^ crosses(b, c, p) ^ crosses(c, a, p)
}

/// Containment in the closed polygon through `points` under the crossing rule.
pub(crate) fn in_polygon(points: &[Point], p: Point) -> bool {
    let Some(&last) = points.last() else {
        return false;
    };
    let mut inside = false;
    let mut prev = last;
    for &next in points {
        inside ^= crosses(prev, next, p);
        prev = next;
    }
    inside
}

/// Bounds of a point set, `None` when empty.
pub(crate) fn bounds(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
    )
}
