// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command tapes: validated drawing instructions in canvas order.

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::TAU;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Arc, BezPath, CubicBez, Line, Point, QuadBez, Vec2};

use crate::error::GeometryError;
use crate::segment::Segment;

/// Tolerance used when arcs are approximated by cubic Béziers.
pub(crate) const ARC_TOLERANCE: f64 = 0.1;

/// One drawing operation.
///
/// The ops mirror the 2D canvas path API. Angles are in radians, measured from
/// the +x axis toward +y (clockwise on screen).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RawCommand", into = "RawCommand")
)]
pub enum Command {
    /// Begin a new subpath at a point.
    MoveTo {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
    /// Straight line from the current point.
    LineTo {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
    /// Quadratic Bézier from the current point.
    QuadraticCurveTo {
        /// Control point x.
        cpx: f64,
        /// Control point y.
        cpy: f64,
        /// End x.
        x: f64,
        /// End y.
        y: f64,
    },
    /// Cubic Bézier from the current point.
    BezierCurveTo {
        /// First control point x.
        cp1x: f64,
        /// First control point y.
        cp1y: f64,
        /// Second control point x.
        cp2x: f64,
        /// Second control point y.
        cp2y: f64,
        /// End x.
        x: f64,
        /// End y.
        y: f64,
    },
    /// Circular arc. A current point is first joined to the arc start by a line.
    Arc {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Radius; must not be negative.
        r: f64,
        /// Start angle.
        start_angle: f64,
        /// End angle.
        end_angle: f64,
        /// Sweep direction.
        counterclockwise: bool,
    },
    /// Elliptical arc of a possibly rotated ellipse.
    Ellipse {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Radius along the ellipse's own x axis.
        rx: f64,
        /// Radius along the ellipse's own y axis.
        ry: f64,
        /// Rotation of the ellipse axes.
        rotation: f64,
        /// Start angle (ellipse parameter).
        start_angle: f64,
        /// End angle (ellipse parameter).
        end_angle: f64,
        /// Sweep direction.
        counterclockwise: bool,
    },
    /// Closed axis-aligned rectangle subpath.
    Rect {
        /// Left.
        x: f64,
        /// Top.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
    /// Close the current subpath with a line back to its start.
    ClosePath,
    /// Boundary between independently bounded parts of one mark.
    Submark,
}

impl Command {
    /// `moveTo`.
    pub const fn move_to(x: f64, y: f64) -> Self {
        Self::MoveTo { x, y }
    }

    /// `lineTo`.
    pub const fn line_to(x: f64, y: f64) -> Self {
        Self::LineTo { x, y }
    }

    /// `quadraticCurveTo`.
    pub const fn quad_to(cpx: f64, cpy: f64, x: f64, y: f64) -> Self {
        Self::QuadraticCurveTo { cpx, cpy, x, y }
    }

    /// `bezierCurveTo`.
    pub const fn curve_to(cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) -> Self {
        Self::BezierCurveTo {
            cp1x,
            cp1y,
            cp2x,
            cp2y,
            x,
            y,
        }
    }

    /// `arc`.
    pub const fn arc(
        cx: f64,
        cy: f64,
        r: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    ) -> Self {
        Self::Arc {
            cx,
            cy,
            r,
            start_angle,
            end_angle,
            counterclockwise,
        }
    }

    /// `ellipse`.
    pub const fn ellipse(
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    ) -> Self {
        Self::Ellipse {
            cx,
            cy,
            rx,
            ry,
            rotation,
            start_angle,
            end_angle,
            counterclockwise,
        }
    }

    /// `rect`.
    pub const fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Canvas name of the op.
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::MoveTo { .. } => "moveTo",
            Self::LineTo { .. } => "lineTo",
            Self::QuadraticCurveTo { .. } => "quadraticCurveTo",
            Self::BezierCurveTo { .. } => "bezierCurveTo",
            Self::Arc { .. } => "arc",
            Self::Ellipse { .. } => "ellipse",
            Self::Rect { .. } => "rect",
            Self::ClosePath => "closePath",
            Self::Submark => "submark",
        }
    }

    /// Flat argument list, with booleans encoded as `0.0` / `1.0`.
    pub fn args(&self) -> Vec<f64> {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match *self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } => vec![x, y],
            Self::QuadraticCurveTo { cpx, cpy, x, y } => vec![cpx, cpy, x, y],
            Self::BezierCurveTo {
                cp1x,
                cp1y,
                cp2x,
                cp2y,
                x,
                y,
            } => vec![cp1x, cp1y, cp2x, cp2y, x, y],
            Self::Arc {
                cx,
                cy,
                r,
                start_angle,
                end_angle,
                counterclockwise,
            } => vec![cx, cy, r, start_angle, end_angle, flag(counterclockwise)],
            Self::Ellipse {
                cx,
                cy,
                rx,
                ry,
                rotation,
                start_angle,
                end_angle,
                counterclockwise,
            } => vec![
                cx,
                cy,
                rx,
                ry,
                rotation,
                start_angle,
                end_angle,
                flag(counterclockwise),
            ],
            Self::Rect {
                x,
                y,
                width,
                height,
            } => vec![x, y, width, height],
            Self::ClosePath | Self::Submark => Vec::new(),
        }
    }

    /// Build a command from its canvas op name and flat arguments.
    ///
    /// The trailing `counterclockwise` flag of `arc` and `ellipse` is optional
    /// and treated as `true` when non-zero. The result is validated.
    pub fn parse(op: &str, args: &[f64]) -> Result<Self, GeometryError> {
        let arity = |op: &'static str, expected: &'static str| GeometryError::Arity {
            op,
            expected,
            got: args.len(),
        };
        let ccw = |args: &[f64], at: usize| args.get(at).is_some_and(|v| *v != 0.0);
        let command = match op {
            "moveTo" => match *args {
                [x, y] => Self::move_to(x, y),
                _ => return Err(arity("moveTo", "2")),
            },
            "lineTo" => match *args {
                [x, y] => Self::line_to(x, y),
                _ => return Err(arity("lineTo", "2")),
            },
            "quadraticCurveTo" => match *args {
                [cpx, cpy, x, y] => Self::quad_to(cpx, cpy, x, y),
                _ => return Err(arity("quadraticCurveTo", "4")),
            },
            "bezierCurveTo" => match *args {
                [cp1x, cp1y, cp2x, cp2y, x, y] => Self::curve_to(cp1x, cp1y, cp2x, cp2y, x, y),
                _ => return Err(arity("bezierCurveTo", "6")),
            },
            "arc" => match *args {
                [cx, cy, r, a0, a1] | [cx, cy, r, a0, a1, _] => {
                    Self::arc(cx, cy, r, a0, a1, ccw(args, 5))
                }
                _ => return Err(arity("arc", "5 or 6")),
            },
            "ellipse" => match *args {
                [cx, cy, rx, ry, rot, a0, a1] | [cx, cy, rx, ry, rot, a0, a1, _] => {
                    Self::ellipse(cx, cy, rx, ry, rot, a0, a1, ccw(args, 7))
                }
                _ => return Err(arity("ellipse", "7 or 8")),
            },
            "rect" => match *args {
                [x, y, width, height] => Self::rect(x, y, width, height),
                _ => return Err(arity("rect", "4")),
            },
            "closePath" if args.is_empty() => Self::ClosePath,
            "closePath" => return Err(arity("closePath", "0")),
            "submark" if args.is_empty() => Self::Submark,
            "submark" => return Err(arity("submark", "0")),
            other => return Err(GeometryError::UnknownOp(other.into())),
        };
        command.validate()?;
        Ok(command)
    }

    /// Check radii are non-negative and every argument is finite.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let op = self.op_name();
        match *self {
            Self::Arc { r, .. } if r < 0.0 => {
                return Err(GeometryError::NegativeRadius { op, radius: r });
            }
            Self::Ellipse { rx, ry, .. } if rx < 0.0 || ry < 0.0 => {
                return Err(GeometryError::NegativeRadius {
                    op,
                    radius: rx.min(ry),
                });
            }
            _ => {}
        }
        if self.args().iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(GeometryError::NonFinite { op })
        }
    }
}

/// The serialized `{op, args}` form of a [`Command`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawCommand {
    op: alloc::string::String,
    #[serde(default)]
    args: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCommand> for Command {
    type Error = GeometryError;

    fn try_from(raw: RawCommand) -> Result<Self, Self::Error> {
        Self::parse(&raw.op, &raw.args)
    }
}

#[cfg(feature = "serde")]
impl From<Command> for RawCommand {
    fn from(command: Command) -> Self {
        Self {
            op: command.op_name().into(),
            args: command.args(),
        }
    }
}

/// A validated sequence of [`Command`]s describing one mark's geometry.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CommandTape {
    commands: Vec<Command>,
}

impl CommandTape {
    /// Validate `commands` and wrap them in a tape.
    pub fn new(commands: Vec<Command>) -> Result<Self, GeometryError> {
        for command in &commands {
            command.validate()?;
        }
        Ok(Self { commands })
    }

    /// Parse a tape from `(op, args)` pairs.
    pub fn parse<'a>(
        ops: impl IntoIterator<Item = (&'a str, &'a [f64])>,
    ) -> Result<Self, GeometryError> {
        let commands = ops
            .into_iter()
            .map(|(op, args)| Command::parse(op, args))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { commands })
    }

    /// Validate and append one command.
    pub fn push(&mut self, command: Command) -> Result<(), GeometryError> {
        command.validate()?;
        self.commands.push(command);
        Ok(())
    }

    /// The commands, in drawing order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if the tape has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The commands of each non-empty submark, split at [`Command::Submark`].
    pub fn submarks(&self) -> impl Iterator<Item = &[Command]> + '_ {
        self.commands
            .split(|c| matches!(c, Command::Submark))
            .filter(|part| !part.is_empty())
    }

    /// Every drawn segment, including implicit joins to arc starts and the
    /// closing line of closed subpaths.
    pub fn segments(&self) -> Vec<Segment> {
        segments(&self.commands)
    }

    /// Re-issue the tape as a Kurbo path.
    pub fn to_bez_path(&self) -> BezPath {
        to_bez_path(&self.commands, false)
    }

    /// The path a canvas fills: like [`to_bez_path`](Self::to_bez_path), with
    /// every open subpath closed.
    pub fn to_fill_path(&self) -> BezPath {
        to_bez_path(&self.commands, true)
    }

    /// Position of the first `moveTo`.
    pub fn first_point(&self) -> Option<Point> {
        self.commands.iter().find_map(|c| match *c {
            Command::MoveTo { x, y } => Some(Point::new(x, y)),
            _ => None,
        })
    }

    /// Every arc and ellipse command as a Kurbo arc, with canvas sweep rules applied.
    pub fn arcs(&self) -> impl Iterator<Item = Arc> + '_ {
        self.commands.iter().filter_map(arc_of)
    }
}

/// What walking a command list produces, in order.
#[derive(Clone, Debug)]
pub(crate) enum Step {
    /// A new subpath starts here.
    Start(Point),
    /// A drawn piece of outline.
    Draw(Segment),
    /// The current subpath is closed; `closing` is the line drawn back to the
    /// start, if the subpath did not already end there.
    Close { closing: Option<Line> },
}

/// Walk `commands` with canvas current-point semantics.
pub(crate) fn walk(commands: &[Command]) -> Vec<Step> {
    let mut steps = Vec::with_capacity(commands.len() + 1);
    let mut current: Option<Point> = None;
    let mut start = Point::ZERO;

    fn begin(steps: &mut Vec<Step>, current: &mut Option<Point>, p: Point) -> Point {
        steps.push(Step::Start(p));
        *current = Some(p);
        p
    }

    for command in commands {
        match *command {
            Command::MoveTo { x, y } => {
                start = begin(&mut steps, &mut current, Point::new(x, y));
            }
            Command::LineTo { x, y } => {
                let p = Point::new(x, y);
                match current {
                    Some(from) => {
                        steps.push(Step::Draw(Segment::Line(Line::new(from, p))));
                        current = Some(p);
                    }
                    None => start = begin(&mut steps, &mut current, p),
                }
            }
            Command::QuadraticCurveTo { cpx, cpy, x, y } => {
                let c = Point::new(cpx, cpy);
                let from = match current {
                    Some(from) => from,
                    None => {
                        start = begin(&mut steps, &mut current, c);
                        c
                    }
                };
                let p = Point::new(x, y);
                steps.push(Step::Draw(Segment::Quad(QuadBez::new(from, c, p))));
                current = Some(p);
            }
            Command::BezierCurveTo {
                cp1x,
                cp1y,
                cp2x,
                cp2y,
                x,
                y,
            } => {
                let c1 = Point::new(cp1x, cp1y);
                let from = match current {
                    Some(from) => from,
                    None => {
                        start = begin(&mut steps, &mut current, c1);
                        c1
                    }
                };
                let p = Point::new(x, y);
                steps.push(Step::Draw(Segment::Cubic(CubicBez::new(
                    from,
                    c1,
                    Point::new(cp2x, cp2y),
                    p,
                ))));
                current = Some(p);
            }
            Command::Arc { .. } | Command::Ellipse { .. } => {
                let Some(arc) = arc_of(command) else {
                    continue;
                };
                let arc_start = point_on_arc(&arc, arc.start_angle);
                match current {
                    Some(from) if from != arc_start => {
                        steps.push(Step::Draw(Segment::Line(Line::new(from, arc_start))));
                    }
                    Some(_) => {}
                    None => start = begin(&mut steps, &mut current, arc_start),
                }
                if arc.sweep_angle != 0.0 {
                    steps.push(Step::Draw(Segment::Arc(arc)));
                }
                current = Some(point_on_arc(&arc, arc.start_angle + arc.sweep_angle));
            }
            Command::Rect {
                x,
                y,
                width,
                height,
            } => {
                let p0 = Point::new(x, y);
                let p1 = Point::new(x + width, y);
                let p2 = Point::new(x + width, y + height);
                let p3 = Point::new(x, y + height);
                steps.push(Step::Start(p0));
                for line in [Line::new(p0, p1), Line::new(p1, p2), Line::new(p2, p3)] {
                    steps.push(Step::Draw(Segment::Line(line)));
                }
                steps.push(Step::Close {
                    closing: Some(Line::new(p3, p0)),
                });
                start = begin(&mut steps, &mut current, p0);
            }
            Command::ClosePath => {
                if let Some(from) = current {
                    steps.push(Step::Close {
                        closing: (from != start).then(|| Line::new(from, start)),
                    });
                    current = Some(start);
                }
            }
            Command::Submark => current = None,
        }
    }
    steps
}

/// Drawn segments of `commands`.
pub(crate) fn segments(commands: &[Command]) -> Vec<Segment> {
    walk(commands)
        .into_iter()
        .filter_map(|step| match step {
            Step::Draw(segment) => Some(segment),
            Step::Close { closing } => closing.map(Segment::Line),
            Step::Start(_) => None,
        })
        .collect()
}

/// Kurbo path for `commands`; arcs are approximated with cubics.
///
/// With `close_open`, subpaths that draw something but never `closePath` are
/// closed before the next one starts.
pub(crate) fn to_bez_path(commands: &[Command], close_open: bool) -> BezPath {
    let mut path = BezPath::new();
    let mut open = false;
    for step in walk(commands) {
        match step {
            Step::Start(p) => {
                if close_open && open {
                    path.close_path();
                }
                open = false;
                path.move_to(p);
            }
            Step::Draw(segment) => {
                open = true;
                match segment {
                    Segment::Line(line) => path.line_to(line.p1),
                    Segment::Quad(quad) => path.quad_to(quad.p1, quad.p2),
                    Segment::Cubic(cubic) => path.curve_to(cubic.p1, cubic.p2, cubic.p3),
                    Segment::Arc(arc) => path.extend(arc.append_iter(ARC_TOLERANCE)),
                }
            }
            Step::Close { .. } => {
                open = false;
                path.close_path();
            }
        }
    }
    if close_open && open {
        path.close_path();
    }
    path
}

/// Kurbo arc for an `arc`/`ellipse` command, with the canvas sweep rules.
pub(crate) fn arc_of(command: &Command) -> Option<Arc> {
    let (center, radii, rotation, start, end, ccw) = match *command {
        Command::Arc {
            cx,
            cy,
            r,
            start_angle,
            end_angle,
            counterclockwise,
        } => (
            Point::new(cx, cy),
            Vec2::new(r, r),
            0.0,
            start_angle,
            end_angle,
            counterclockwise,
        ),
        Command::Ellipse {
            cx,
            cy,
            rx,
            ry,
            rotation,
            start_angle,
            end_angle,
            counterclockwise,
        } => (
            Point::new(cx, cy),
            Vec2::new(rx, ry),
            rotation,
            start_angle,
            end_angle,
            counterclockwise,
        ),
        _ => return None,
    };
    Some(Arc {
        center,
        radii,
        start_angle: start,
        sweep_angle: canvas_sweep(start, end, ccw),
        x_rotation: rotation,
    })
}

/// Signed sweep from `start` to `end`. A difference of a full turn or more in
/// the travel direction is a full circle; otherwise the sweep is reduced into
/// `[0, 2π)` in that direction.
pub(crate) fn canvas_sweep(start: f64, end: f64, counterclockwise: bool) -> f64 {
    if counterclockwise {
        let d = start - end;
        if d >= TAU { -TAU } else { -normalize_angle(d) }
    } else {
        let d = end - start;
        if d >= TAU { TAU } else { normalize_angle(d) }
    }
}

/// Reduce an angle into `[0, 2π)`.
pub(crate) fn normalize_angle(angle: f64) -> f64 {
    let reduced = angle - TAU * (angle / TAU).floor();
    // Rounding can land exactly on 2π for tiny negative inputs.
    if reduced >= TAU { 0.0 } else { reduced }
}

/// Point at ellipse parameter `t` on `arc`.
pub(crate) fn point_on_arc(arc: &Arc, t: f64) -> Point {
    let (sin_t, cos_t) = (t.sin(), t.cos());
    let (sin_r, cos_r) = (arc.x_rotation.sin(), arc.x_rotation.cos());
    let x = arc.radii.x * cos_t;
    let y = arc.radii.y * sin_t;
    arc.center + Vec2::new(x * cos_r - y * sin_r, x * sin_r + y * cos_r)
}
