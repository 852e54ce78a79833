//! The geometric primitive layer: [`Point`], [`Aabb`], and [`Shape`]
//! (segment or circular arc), plus the intersection and splitting routines
//! the pipeline drives through [`crate::tolerance::Tolerance`].
//!
//! `Shape` is a tagged sum rather than a trait-object hierarchy, per the
//! "Shape polymorphism" design note: segment and arc differ only in
//! `intersect`, `split`, `length`, and direction, which doesn't earn a
//! `Box<dyn Shape>`.

use crate::tolerance::Tolerance;

/// A point in the plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn eq_within(&self, other: &Point, tol: &Tolerance) -> bool {
        tol.is_zero(self.x - other.x) && tol.is_zero(self.y - other.y)
    }

    pub fn dist(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    fn sub(&self, other: &Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }
}

/// An axis-aligned bounding box, used for the `IntersectionCollector`'s
/// spatial broadphase query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point,
    pub max: Point,
}

impl Aabb {
    pub fn of_points(points: &[Point]) -> Self {
        let mut min = points[0];
        let mut max = points[0];
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Self { min, max }
    }

    pub fn overlaps(&self, other: &Aabb, tol: &Tolerance) -> bool {
        !(tol.gt(other.min.x, self.max.x)
            || tol.gt(self.min.x, other.max.x)
            || tol.gt(other.min.y, self.max.y)
            || tol.gt(self.min.y, other.max.y))
    }
}

/// A segment or circular arc — the geometric payload of an `Edge`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Segment { start: Point, end: Point },
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    },
}

impl Shape {
    pub fn start(&self) -> Point {
        match self {
            Shape::Segment { start, .. } => *start,
            Shape::Arc {
                center,
                radius,
                start_angle,
                ..
            } => point_on_circle(*center, *radius, *start_angle),
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Shape::Segment { end, .. } => *end,
            Shape::Arc {
                center,
                radius,
                end_angle,
                ..
            } => point_on_circle(*center, *radius, *end_angle),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Shape::Segment { start, end } => start.dist(end),
            Shape::Arc {
                radius,
                start_angle,
                end_angle,
                clockwise,
                ..
            } => radius * angular_span(*start_angle, *end_angle, *clockwise),
        }
    }

    pub fn bbox(&self) -> Aabb {
        match self {
            Shape::Segment { start, end } => Aabb::of_points(&[*start, *end]),
            Shape::Arc { center, radius, .. } => {
                // Conservative: the full circle's bbox. Tightening to the
                // swept sector is unnecessary for a broadphase filter.
                Aabb {
                    min: Point::new(center.x - radius, center.y - radius),
                    max: Point::new(center.x + radius, center.y + radius),
                }
            }
        }
    }

    pub fn reverse(&self) -> Shape {
        match *self {
            Shape::Segment { start, end } => Shape::Segment {
                start: end,
                end: start,
            },
            Shape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                clockwise,
            } => Shape::Arc {
                center,
                radius,
                start_angle: end_angle,
                end_angle: start_angle,
                clockwise: !clockwise,
            },
        }
    }

    /// Fraction of the shape's arc length at which `pt` lies, assuming `pt`
    /// is already known to lie on the shape (callers check this first via
    /// [`Shape::contains_point`]).
    fn param_at(&self, pt: Point, tol: &Tolerance) -> f64 {
        match self {
            Shape::Segment { start, end } => {
                let total = start.dist(end);
                if tol.is_zero(total) {
                    0.0
                } else {
                    start.dist(&pt) / total
                }
            }
            Shape::Arc {
                center,
                start_angle,
                clockwise,
                ..
            } => {
                let theta = (pt.y - center.y).atan2(pt.x - center.x);
                let span = angular_span(*start_angle, theta, *clockwise);
                let total = self.length();
                if tol.is_zero(total) {
                    0.0
                } else {
                    (span * self.radius_or_one()) / total
                }
            }
        }
    }

    fn radius_or_one(&self) -> f64 {
        match self {
            Shape::Segment { .. } => 1.0,
            Shape::Arc { radius, .. } => *radius,
        }
    }

    /// Does `pt` lie on this shape (within tolerance)?
    pub fn contains_point(&self, pt: Point, tol: &Tolerance) -> bool {
        match self {
            Shape::Segment { start, end } => {
                let (dx, dy) = end.sub(start);
                let (px, py) = pt.sub(start);
                let cross = dx * py - dy * px;
                let len = (dx * dx + dy * dy).sqrt();
                if len < tol.linear {
                    return pt.eq_within(start, tol);
                }
                if !tol.is_zero(cross / len) {
                    return false;
                }
                let dot = px * dx + py * dy;
                dot >= -tol.linear && dot <= dx * dx + dy * dy + tol.linear
            }
            Shape::Arc { center, radius, .. } => {
                if !tol.is_zero(pt.dist(center) - radius) {
                    return false;
                }
                let theta = (pt.y - center.y).atan2(pt.x - center.x);
                arc_contains_angle(self, theta, tol)
            }
        }
    }

    /// Split this shape at `pt`, returning `(before, after)`. Either half is
    /// `None` when `pt` coincides with that endpoint (§6.2: `null`
    /// indicates coincidence with start/end).
    pub fn split(&self, pt: Point, tol: &Tolerance) -> (Option<Shape>, Option<Shape>) {
        if pt.eq_within(&self.start(), tol) {
            return (None, Some(*self));
        }
        if pt.eq_within(&self.end(), tol) {
            return (Some(*self), None);
        }
        match self {
            Shape::Segment { start, end } => (
                Some(Shape::Segment { start: *start, end: pt }),
                Some(Shape::Segment { start: pt, end: *end }),
            ),
            Shape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                clockwise,
            } => {
                let theta = (pt.y - center.y).atan2(pt.x - center.x);
                (
                    Some(Shape::Arc {
                        center: *center,
                        radius: *radius,
                        start_angle: *start_angle,
                        end_angle: theta,
                        clockwise: *clockwise,
                    }),
                    Some(Shape::Arc {
                        center: *center,
                        radius: *radius,
                        start_angle: theta,
                        end_angle: *end_angle,
                        clockwise: *clockwise,
                    }),
                )
            }
        }
    }

    /// All points where `self` and `other` cross, within tolerance.
    /// Endpoint-only touches are included.
    pub fn intersect(&self, other: &Shape, tol: &Tolerance) -> Vec<Point> {
        match (self, other) {
            (Shape::Segment { start: p1, end: p2 }, Shape::Segment { start: p3, end: p4 }) => {
                segment_segment(*p1, *p2, *p3, *p4, tol)
            }
            (Shape::Segment { .. }, Shape::Arc { .. }) => segment_arc(self, other, tol),
            (Shape::Arc { .. }, Shape::Segment { .. }) => segment_arc(other, self, tol),
            (Shape::Arc { .. }, Shape::Arc { .. }) => arc_arc(self, other, tol),
        }
    }
}

fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// CCW angular distance traveled from `from` to `to` if `!clockwise`, else CW.
fn angular_span(from: f64, to: f64, clockwise: bool) -> f64 {
    let two_pi = std::f64::consts::TAU;
    let diff = if clockwise { from - to } else { to - from };
    ((diff % two_pi) + two_pi) % two_pi
}

fn arc_contains_angle(shape: &Shape, theta: f64, tol: &Tolerance) -> bool {
    if let Shape::Arc {
        start_angle,
        end_angle,
        clockwise,
        ..
    } = shape
    {
        let span = angular_span(*start_angle, *end_angle, *clockwise);
        let to_theta = angular_span(*start_angle, theta, *clockwise);
        to_theta <= span + tol.angular
    } else {
        false
    }
}

fn segment_segment(p1: Point, p2: Point, p3: Point, p4: Point, tol: &Tolerance) -> Vec<Point> {
    let (d1x, d1y) = (p2.x - p1.x, p2.y - p1.y);
    let (d2x, d2y) = (p4.x - p3.x, p4.y - p3.y);
    let denom = d1x * d2y - d1y * d2x;

    if tol.is_zero(denom) {
        return collinear_overlap(p1, p2, p3, p4, tol);
    }

    let (ex, ey) = (p3.x - p1.x, p3.y - p1.y);
    let t = (ex * d2y - ey * d2x) / denom;
    let u = (ex * d1y - ey * d1x) / denom;

    let eps = tol.linear;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        vec![Point::new(p1.x + t * d1x, p1.y + t * d1y)]
    } else {
        Vec::new()
    }
}

/// `p1`-`p2` and `p3`-`p4` are parallel. If they also lie on the same line
/// and their projections onto it overlap, the shared sub-range's endpoints
/// are reported as crossings — this is what lets two polygons with an
/// identical or partially coincident edge (a shared border, or one polygon
/// subtracted/unioned/intersected against an exact copy of itself) still
/// produce split points instead of the edge pair going unnoticed entirely.
fn collinear_overlap(p1: Point, p2: Point, p3: Point, p4: Point, tol: &Tolerance) -> Vec<Point> {
    let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
    let len_sq = dx * dx + dy * dy;
    if tol.is_zero(len_sq) {
        return Vec::new();
    }
    let len = len_sq.sqrt();

    // p3 must lie on the infinite line through p1-p2, not just share its
    // direction, for the two segments to be collinear rather than merely
    // parallel and offset.
    let (ex, ey) = (p3.x - p1.x, p3.y - p1.y);
    let cross = dx * ey - dy * ex;
    if !tol.is_zero(cross / len) {
        return Vec::new();
    }

    let param = |p: Point| ((p.x - p1.x) * dx + (p.y - p1.y) * dy) / len_sq;
    let (t3, t4) = (param(p3), param(p4));
    let (lo3, hi3) = (t3.min(t4), t3.max(t4));
    let lo = lo3.max(0.0);
    let hi = hi3.min(1.0);
    if lo > hi + tol.linear / len {
        return Vec::new(); // collinear but disjoint ranges
    }

    let at = |t: f64| Point::new(p1.x + t * dx, p1.y + t * dy);
    let a = at(lo.clamp(0.0, 1.0));
    let b = at(hi.clamp(0.0, 1.0));
    if a.eq_within(&b, tol) {
        vec![a]
    } else {
        vec![a, b]
    }
}

fn segment_arc(seg: &Shape, arc: &Shape, tol: &Tolerance) -> Vec<Point> {
    let (Shape::Segment { start, end }, Shape::Arc { center, radius, .. }) = (seg, arc) else {
        return Vec::new();
    };
    let (dx, dy) = (end.x - start.x, end.y - start.y);
    let (fx, fy) = (start.x - center.x, start.y - center.y);

    let a = dx * dx + dy * dy;
    let b = 2.0 * (fx * dx + fy * dy);
    let c = fx * fx + fy * fy - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < -tol.linear || a < tol.linear {
        return Vec::new();
    }
    let disc = disc.max(0.0).sqrt();
    let mut out = Vec::new();
    for t in [(-b - disc) / (2.0 * a), (-b + disc) / (2.0 * a)] {
        if t < -tol.linear || t > 1.0 + tol.linear {
            continue;
        }
        let pt = Point::new(start.x + t * dx, start.y + t * dy);
        if arc_contains_angle(arc, (pt.y - center.y).atan2(pt.x - center.x), tol)
            && !out.iter().any(|p: &Point| p.eq_within(&pt, tol))
        {
            out.push(pt);
        }
    }
    out
}

fn arc_arc(a: &Shape, b: &Shape, tol: &Tolerance) -> Vec<Point> {
    let (Shape::Arc { center: c1, radius: r1, .. }, Shape::Arc { center: c2, radius: r2, .. }) =
        (a, b)
    else {
        return Vec::new();
    };
    let d = c1.dist(c2);
    if d < tol.linear || d > r1 + r2 + tol.linear || d < (r1 - r2).abs() - tol.linear {
        return Vec::new();
    }
    let a_len = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h_sq = r1 * r1 - a_len * a_len;
    let h = h_sq.max(0.0).sqrt();
    let (ex, ey) = ((c2.x - c1.x) / d, (c2.y - c1.y) / d);
    let mid = Point::new(c1.x + a_len * ex, c1.y + a_len * ey);

    let mut out = Vec::new();
    let candidates = [
        Point::new(mid.x - h * ey, mid.y + h * ex),
        Point::new(mid.x + h * ey, mid.y - h * ex),
    ];
    for pt in candidates {
        if arc_contains_angle(a, (pt.y - c1.y).atan2(pt.x - c1.x), tol)
            && arc_contains_angle(b, (pt.y - c2.y).atan2(pt.x - c2.x), tol)
            && !out.iter().any(|p: &Point| p.eq_within(&pt, tol))
        {
            out.push(pt);
        }
    }
    out
}
