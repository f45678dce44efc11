//! Geometry kernel: primitive shape builders and binary predicates.
//!
//! All predicates are winding-independent. Polygon overlap uses the
//! Separating Axis Theorem and is only defined for convex polygons, so
//! `Polygon` records its convexity at construction and the SAT entry
//! point refuses concave input instead of returning a wrong answer.

use std::f64::consts::TAU;
use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::types::Rotation;

/// Tolerance for collinearity and zero-length edges.
pub const EPSILON: f64 = 1e-9;

/// Default number of arc segments used to discretize a door sweep.
pub const DEFAULT_ARC_SEGMENTS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    pub fn intersects(&self, other: &Segment) -> bool {
        segments_intersect(self.start, self.end, other.start, other.end)
    }
}

/// Implicitly closed polygon with at least 3 finite vertices.
///
/// Immutable once built; the convexity flag is computed on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polygon {
    vertices: Vec<Point>,
    convex: bool,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(EngineError::DegeneratePolygon {
                count: vertices.len(),
            });
        }
        if let Some(index) = vertices
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(EngineError::NonFiniteVertex { index });
        }
        let convex = is_convex(&vertices);
        Ok(Self { vertices, convex })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn is_convex(&self) -> bool {
        self.convex
    }

    /// Boundary edges, including the closing edge back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> (Point, Point) {
        let mut lo = Point::new(f64::INFINITY, f64::INFINITY);
        let mut hi = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.vertices {
            lo.x = lo.x.min(p.x);
            lo.y = lo.y.min(p.y);
            hi.x = hi.x.max(p.x);
            hi.y = hi.y.max(p.y);
        }
        (lo, hi)
    }

    pub fn contains(&self, point: Point) -> bool {
        point_in_polygon(point, self)
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = EngineError;

    fn try_from(vertices: Vec<Point>) -> Result<Self> {
        Polygon::new(vertices)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

/// True for a simple convex polygon in either winding.
///
/// Repeated vertices are dropped and straight corners ignored. Every
/// remaining turn must share one sign and the turns must add up to a
/// single revolution, which rules out self-intersecting stars. The
/// straightness cutoff scales with the adjacent edge lengths. A polygon
/// flattened onto one line counts as convex; SAT handles it as a segment.
fn is_convex(vertices: &[Point]) -> bool {
    let mut ring: Vec<Point> = Vec::with_capacity(vertices.len());
    for &v in vertices {
        if ring.last().map_or(true, |&last| last.distance(v) > EPSILON) {
            ring.push(v);
        }
    }
    while ring.len() > 1 && ring[0].distance(ring[ring.len() - 1]) <= EPSILON {
        ring.pop();
    }
    let n = ring.len();
    if n < 3 {
        return true;
    }

    let mut sign = 0.0_f64;
    let mut winding = 0.0_f64;
    let mut doubled_back = false;
    for i in 0..n {
        let incoming = ring[(i + 1) % n] - ring[i];
        let outgoing = ring[(i + 2) % n] - ring[(i + 1) % n];
        let turn = incoming.cross(outgoing);
        let along = incoming.dot(outgoing);
        if turn.abs() <= EPSILON * incoming.length() * outgoing.length() {
            doubled_back |= along < 0.0;
            continue;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
        winding += turn.atan2(along);
    }
    if sign == 0.0 {
        return true;
    }
    !doubled_back && (winding.abs() - TAU).abs() <= 1e-6
}

/// Rectangle of `length` (x) by `width` (y) centred on (x, y), rotated
/// about its centre by `angle_deg`. Corners are returned in
/// lower-left, lower-right, upper-right, upper-left order before rotation.
pub fn rotated_rectangle(x: f64, y: f64, length: f64, width: f64, angle_deg: f64) -> Polygon {
    let rad = angle_deg.to_radians();
    let (sin_r, cos_r) = rad.sin_cos();
    let half_l = length / 2.0;
    let half_w = width / 2.0;
    const SIGNS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let vertices = SIGNS
        .iter()
        .map(|&(sx, sy)| {
            let dx = sx * half_l;
            let dy = sy * half_w;
            Point::new(x + dx * cos_r - dy * sin_r, y + dx * sin_r + dy * cos_r)
        })
        .collect();
    Polygon {
        vertices,
        convex: true,
    }
}

fn project(vertices: &[Point], axis: Point) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &p in vertices {
        let dot = p.dot(axis);
        lo = lo.min(dot);
        hi = hi.max(dot);
    }
    (lo, hi)
}

/// SAT overlap on raw vertex lists. Touching counts as overlap.
/// Zero-length edges contribute no candidate axis.
fn convex_overlap(a: &[Point], b: &[Point]) -> bool {
    for vertices in [a, b] {
        let n = vertices.len();
        for i in 0..n {
            let edge = vertices[(i + 1) % n] - vertices[i];
            let len = edge.length();
            if len <= EPSILON {
                continue;
            }
            let axis = Point::new(-edge.y / len, edge.x / len);
            let (min_a, max_a) = project(a, axis);
            let (min_b, max_b) = project(b, axis);
            if max_a < min_b || max_b < min_a {
                return false;
            }
        }
    }
    true
}

/// Separating Axis Theorem test for two convex polygons.
///
/// Shared edges and corners count as intersecting. Concave input is
/// rejected with `EngineError::NonConvexPolygon`.
pub fn polygons_intersect(a: &Polygon, b: &Polygon) -> Result<bool> {
    for polygon in [a, b] {
        if !polygon.convex {
            return Err(EngineError::NonConvexPolygon {
                vertices: polygon.vertices.len(),
            });
        }
    }
    Ok(convex_overlap(&a.vertices, &b.vertices))
}

/// Even-odd ray casting.
///
/// Points exactly on the boundary are classified consistently but not
/// inclusively: with the half-open crossing rule, points on the lower or
/// left edges of an axis-aligned rectangle count as inside and points on
/// the upper or right edges count as outside.
pub fn point_in_polygon(point: Point, polygon: &Polygon) -> bool {
    let vertices = &polygon.vertices;
    let n = vertices.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = vertices[i];
        let pj = vertices[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let intersect_x = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y + EPSILON) + pi.x;
            if point.x < intersect_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    Collinear,
    Clockwise,
    CounterClockwise,
}

fn orientation(a: Point, b: Point, c: Point) -> Turn {
    let val = (b.y - a.y) * (c.x - b.x) - (b.x - a.x) * (c.y - b.y);
    if val.abs() < EPSILON {
        Turn::Collinear
    } else if val > 0.0 {
        Turn::Clockwise
    } else {
        Turn::CounterClockwise
    }
}

/// True if `q` lies within the bounding box of segment `p`..`r`.
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    p.x.min(r.x) <= q.x && q.x <= p.x.max(r.x) && p.y.min(r.y) <= q.y && q.y <= p.y.max(r.y)
}

/// Segment `p`..`q` against segment `r`..`s`.
///
/// Proper crossings, shared endpoints, T-junctions and any collinear
/// overlap all count as intersecting.
pub fn segments_intersect(p: Point, q: Point, r: Point, s: Point) -> bool {
    let o1 = orientation(p, q, r);
    let o2 = orientation(p, q, s);
    let o3 = orientation(r, s, p);
    let o4 = orientation(r, s, q);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == Turn::Collinear && on_segment(p, r, q))
        || (o2 == Turn::Collinear && on_segment(p, s, q))
        || (o3 == Turn::Collinear && on_segment(r, p, s))
        || (o4 == Turn::Collinear && on_segment(r, q, s))
}

/// Distance from `point` to the closest point of segment `a`..`b`.
/// A zero-length segment degrades to point distance.
pub fn point_to_segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let ap = point - a;
    let ab = b - a;
    let ab_len2 = ab.dot(ab);
    if ab_len2 == 0.0 {
        return ap.length();
    }
    let t = (ap.dot(ab) / ab_len2).clamp(0.0, 1.0);
    let projection = Point::new(a.x + t * ab.x, a.y + t * ab.y);
    point.distance(projection)
}

/// True if the centre lies inside the polygon or any edge comes within
/// `radius` of it. Works for concave polygons.
pub fn circle_intersects_polygon(center: Point, radius: f64, polygon: &Polygon) -> bool {
    if point_in_polygon(center, polygon) {
        return true;
    }
    polygon
        .edges()
        .any(|e| point_to_segment_distance(center, e.start, e.end) <= radius)
}

/// Closed fan approximating a circular sector: `segments + 1` arc points
/// swept from `arc_start` around `center`, followed by the centre.
pub fn arc_fan(
    center: Point,
    arc_start: Point,
    sweep_deg: f64,
    rotation: Rotation,
    segments: usize,
) -> Result<Polygon> {
    if segments == 0 {
        return Err(EngineError::InvalidArcSegments);
    }
    let radius = center.distance(arc_start);
    let direction = match rotation {
        Rotation::Clockwise => -1.0,
        Rotation::CounterClockwise => 1.0,
    };
    let start_angle = (arc_start.y - center.y).atan2(arc_start.x - center.x);
    let sweep = direction * sweep_deg.to_radians();
    let mut vertices: Vec<Point> = (0..=segments)
        .map(|i| {
            let theta = start_angle + sweep * (i as f64 / segments as f64);
            Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
        })
        .collect();
    vertices.push(center);
    Polygon::new(vertices)
}

/// Sector-vs-polygon test via a discretized fan and SAT.
///
/// Higher `segments` tracks the true arc more closely at linear cost.
/// A zero-radius arc collapses to its centre and is tested by containment.
/// Sweeps above 180 degrees produce a concave fan and are rejected.
pub fn arc_intersects_polygon(
    center: Point,
    arc_start: Point,
    sweep_deg: f64,
    rotation: Rotation,
    polygon: &Polygon,
    segments: usize,
) -> Result<bool> {
    if center.distance(arc_start) <= EPSILON {
        if segments == 0 {
            return Err(EngineError::InvalidArcSegments);
        }
        return Ok(point_in_polygon(center, polygon));
    }
    let fan = arc_fan(center, arc_start, sweep_deg, rotation, segments)?;
    polygons_intersect(&fan, polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 2.0),
            Point::new(0.0, 2.0),
        ])
        .unwrap()
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn rectangle_corners_axis_aligned() {
        let r = rotated_rectangle(1.0, 2.0, 4.0, 2.0, 0.0);
        assert_eq!(
            r.vertices(),
            &[p(-1.0, 1.0), p(3.0, 1.0), p(3.0, 3.0), p(-1.0, 3.0)]
        );
    }

    #[test]
    fn rectangle_rotation_quarter_turn() {
        let r = rotated_rectangle(0.0, 0.0, 4.0, 2.0, 90.0);
        let (lo, hi) = r.bounds();
        assert!((lo.x + 1.0).abs() < 1e-9 && (hi.x - 1.0).abs() < 1e-9);
        assert!((lo.y + 2.0).abs() < 1e-9 && (hi.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn rectangle_angle_wraps() {
        let a = rotated_rectangle(3.0, 3.0, 2.0, 0.5, 30.0);
        let b = rotated_rectangle(3.0, 3.0, 2.0, 0.5, 30.0 + 720.0);
        for (u, v) in a.vertices().iter().zip(b.vertices()) {
            assert!(u.distance(*v) < 1e-9);
        }
    }

    #[test]
    fn polygon_rejects_too_few_vertices() {
        let err = Polygon::new(vec![p(0.0, 0.0), p(1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, EngineError::DegeneratePolygon { count: 2 }));
    }

    #[test]
    fn polygon_rejects_nan() {
        let err = Polygon::new(vec![p(0.0, 0.0), p(f64::NAN, 0.0), p(1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, EngineError::NonFiniteVertex { index: 1 }));
    }

    #[test]
    fn convexity_detected_either_winding() {
        assert!(rect().is_convex());
        let cw = Polygon::new(vec![p(0.0, 0.0), p(0.0, 2.0), p(4.0, 2.0), p(4.0, 0.0)]).unwrap();
        assert!(cw.is_convex());
        let l_shape = Polygon::new(vec![
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 2.0),
            p(0.0, 2.0),
        ])
        .unwrap();
        assert!(!l_shape.is_convex());
    }

    #[test]
    fn sat_rejects_concave() {
        let l_shape = Polygon::new(vec![
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 2.0),
            p(0.0, 2.0),
        ])
        .unwrap();
        let err = polygons_intersect(&l_shape, &rect()).unwrap_err();
        assert!(matches!(err, EngineError::NonConvexPolygon { vertices: 6 }));
    }

    #[test]
    fn sat_separated_and_overlapping() {
        let a = rotated_rectangle(0.0, 0.0, 5.0, 2.5, 0.0);
        let far = rotated_rectangle(10.0, 0.0, 5.0, 2.5, 0.0);
        let near = rotated_rectangle(3.0, 0.0, 5.0, 2.5, 0.0);
        assert!(!polygons_intersect(&a, &far).unwrap());
        assert!(polygons_intersect(&a, &near).unwrap());
    }

    #[test]
    fn sat_touching_counts_as_intersecting() {
        let a = rotated_rectangle(0.0, 0.0, 5.0, 2.5, 0.0);
        let b = rotated_rectangle(5.0, 0.0, 5.0, 2.5, 0.0);
        assert!(polygons_intersect(&a, &b).unwrap());
    }

    #[test]
    fn sat_diagonal_gap_found_on_rotated_axis() {
        // AABBs overlap but the rotated edge separates them.
        let a = rotated_rectangle(0.0, 0.0, 4.0, 0.2, 45.0);
        let b = rotated_rectangle(1.2, -1.2, 0.5, 0.5, 0.0);
        assert!(!polygons_intersect(&a, &b).unwrap());
    }

    #[test]
    fn sat_skips_zero_length_edges() {
        let with_dup = Polygon::new(vec![
            p(0.0, 0.0),
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 2.0),
            p(0.0, 2.0),
        ])
        .unwrap();
        assert!(with_dup.is_convex());
        let inside = rotated_rectangle(2.0, 1.0, 1.0, 1.0, 0.0);
        let outside = rotated_rectangle(8.0, 1.0, 1.0, 1.0, 0.0);
        assert!(polygons_intersect(&with_dup, &inside).unwrap());
        assert!(!polygons_intersect(&with_dup, &outside).unwrap());
    }

    #[test]
    fn point_in_rectangle() {
        let r = rect();
        assert!(point_in_polygon(p(2.0, 1.0), &r));
        assert!(!point_in_polygon(p(5.0, 1.0), &r));
        assert!(!point_in_polygon(p(2.0, 5.0), &r));
    }

    #[test]
    fn point_in_polygon_boundary_is_consistent() {
        let r = rect();
        assert!(point_in_polygon(p(0.0, 1.0), &r));
        assert!(!point_in_polygon(p(4.0, 1.0), &r));
        assert_eq!(
            point_in_polygon(p(2.0, 2.0), &r),
            point_in_polygon(p(2.0, 2.0), &r)
        );
    }

    #[test]
    fn point_in_concave_polygon() {
        let l_shape = Polygon::new(vec![
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 2.0),
            p(0.0, 2.0),
        ])
        .unwrap();
        assert!(point_in_polygon(p(0.5, 1.5), &l_shape));
        assert!(!point_in_polygon(p(1.5, 1.5), &l_shape));
    }

    #[test]
    fn segments_crossing() {
        assert!(segments_intersect(p(0.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(2.0, 0.0)));
    }

    #[test]
    fn segments_parallel_apart() {
        assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)));
    }

    #[test]
    fn segments_shared_endpoint() {
        assert!(segments_intersect(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)));
    }

    #[test]
    fn segments_t_junction() {
        assert!(segments_intersect(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)));
    }

    #[test]
    fn segments_collinear_overlap_and_gap() {
        assert!(segments_intersect(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(3.0, 0.0)));
        assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)));
    }

    #[test]
    fn segments_near_miss() {
        assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 1.0), p(1.5, 0.0), p(3.0, -1.0)));
    }

    #[test]
    fn segment_distance_clamps() {
        let a = p(0.0, 0.0);
        let b = p(4.0, 0.0);
        assert!((point_to_segment_distance(p(2.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((point_to_segment_distance(p(-3.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert!((point_to_segment_distance(p(7.0, 4.0), a, b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn segment_distance_zero_length() {
        let a = p(1.0, 1.0);
        assert!((point_to_segment_distance(p(4.0, 5.0), a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn circle_far_and_inside() {
        let r = rect();
        assert!(!circle_intersects_polygon(p(10.0, 10.0), 1.0, &r));
        assert!(circle_intersects_polygon(p(2.0, 1.0), 1.0, &r));
    }

    #[test]
    fn circle_grazing_edge() {
        let r = rect();
        assert!(circle_intersects_polygon(p(2.0, 3.0), 1.0, &r));
        assert!(!circle_intersects_polygon(p(2.0, 3.01), 1.0, &r));
    }

    #[test]
    fn arc_fan_shape() {
        let fan = arc_fan(p(0.0, 0.0), p(1.0, 0.0), 90.0, Rotation::CounterClockwise, 4).unwrap();
        assert_eq!(fan.vertices().len(), 6);
        let last_arc = fan.vertices()[4];
        assert!(last_arc.distance(p(0.0, 1.0)) < 1e-9);
        assert_eq!(fan.vertices()[5], p(0.0, 0.0));
        assert!(fan.is_convex());

        let cw = arc_fan(p(0.0, 0.0), p(1.0, 0.0), 90.0, Rotation::Clockwise, 4).unwrap();
        assert!(cw.vertices()[4].distance(p(0.0, -1.0)) < 1e-9);
    }

    #[test]
    fn arc_rejects_zero_segments() {
        let err = arc_intersects_polygon(
            p(0.0, 0.0),
            p(1.0, 0.0),
            90.0,
            Rotation::Clockwise,
            &rect(),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArcSegments));
    }

    #[test]
    fn arc_direction_matters() {
        // Quarter sweep from (1, 0) around the origin: CCW reaches into +y,
        // CW into -y.
        let above = rotated_rectangle(0.5, 0.5, 0.2, 0.2, 0.0);
        let below = rotated_rectangle(0.5, -0.5, 0.2, 0.2, 0.0);
        let ccw = Rotation::CounterClockwise;
        let cw = Rotation::Clockwise;
        assert!(arc_intersects_polygon(p(0.0, 0.0), p(1.0, 0.0), 90.0, ccw, &above, 30).unwrap());
        assert!(!arc_intersects_polygon(p(0.0, 0.0), p(1.0, 0.0), 90.0, ccw, &below, 30).unwrap());
        assert!(arc_intersects_polygon(p(0.0, 0.0), p(1.0, 0.0), 90.0, cw, &below, 30).unwrap());
    }

    #[test]
    fn arc_fidelity_tradeoff() {
        // A small box just inside the true arc near 45 degrees, but
        // outside the single chord of a one-segment fan.
        let r = 0.98_f64;
        let c = std::f64::consts::FRAC_1_SQRT_2 * r;
        let target = rotated_rectangle(c, c, 0.02, 0.02, 45.0);
        let ccw = Rotation::CounterClockwise;
        assert!(!arc_intersects_polygon(p(0.0, 0.0), p(1.0, 0.0), 90.0, ccw, &target, 1).unwrap());
        assert!(arc_intersects_polygon(p(0.0, 0.0), p(1.0, 0.0), 90.0, ccw, &target, 64).unwrap());
    }

    #[test]
    fn arc_zero_radius_is_point() {
        let ccw = Rotation::CounterClockwise;
        assert!(arc_intersects_polygon(p(1.0, 1.0), p(1.0, 1.0), 90.0, ccw, &rect(), 30).unwrap());
        assert!(!arc_intersects_polygon(p(9.0, 9.0), p(9.0, 9.0), 90.0, ccw, &rect(), 30).unwrap());
    }

    #[test]
    fn arc_reflex_sweep_is_rejected() {
        let err = arc_intersects_polygon(
            p(0.0, 0.0),
            p(1.0, 0.0),
            270.0,
            Rotation::CounterClockwise,
            &rect(),
            30,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::NonConvexPolygon { .. }));
    }

    #[test]
    fn half_disc_fans_are_convex_anywhere() {
        let hinge = p(0.1, 1.6);
        let end = p(0.4, 2.0);
        for rotation in [Rotation::CounterClockwise, Rotation::Clockwise] {
            assert!(arc_fan(hinge, end, 180.0, rotation, 30).unwrap().is_convex());
        }
        for i in 0..40 {
            for j in 0..40 {
                let hinge = p(0.1 * i as f64 - 1.7, 0.3 * j as f64 + 0.05);
                let end = hinge + p(0.3, 0.4);
                for rotation in [Rotation::CounterClockwise, Rotation::Clockwise] {
                    let fan = arc_fan(hinge, end, 180.0, rotation, 30).unwrap();
                    assert!(fan.is_convex(), "{hinge} -> {end} {rotation}");
                }
            }
        }
    }

    #[test]
    fn half_disc_sweep_intersects() {
        let target = rotated_rectangle(0.1, 1.6, 0.1, 0.1, 0.0);
        let ccw = Rotation::CounterClockwise;
        assert!(arc_intersects_polygon(p(0.1, 1.6), p(0.4, 2.0), 180.0, ccw, &target, 30).unwrap());
    }

    #[test]
    fn star_is_not_convex() {
        // Pentagram: every turn has the same sign but the outline wraps
        // around twice.
        let star: Vec<Point> = (0..5)
            .map(|k| {
                let theta = std::f64::consts::FRAC_PI_2 + TAU * (2 * k) as f64 / 5.0;
                p(10.0 + 4.0 * theta.cos(), 10.0 + 4.0 * theta.sin())
            })
            .collect();
        let star = Polygon::new(star).unwrap();
        assert!(!star.is_convex());
        let wall = rotated_rectangle(12.4, 12.2, 0.2, 0.05, 0.0);
        let err = polygons_intersect(&star, &wall).unwrap_err();
        assert!(matches!(err, EngineError::NonConvexPolygon { vertices: 5 }));
    }

    #[test]
    fn collinear_vertices_do_not_break_convexity() {
        let with_midpoints = Polygon::new(vec![
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 2.0),
            p(0.0, 2.0),
        ])
        .unwrap();
        assert!(with_midpoints.is_convex());
        let flat = Polygon::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]).unwrap();
        assert!(flat.is_convex());
        assert!(polygons_intersect(&flat, &rect()).unwrap());
    }

    #[test]
    fn polygon_serde_validates() {
        let ok: Polygon = serde_json::from_str(r#"[{"x":0,"y":0},{"x":1,"y":0},{"x":0,"y":1}]"#).unwrap();
        assert_eq!(ok.vertices().len(), 3);
        let bad: std::result::Result<Polygon, _> = serde_json::from_str(r#"[{"x":0,"y":0}]"#);
        assert!(bad.is_err());
    }

    proptest! {
        #[test]
        fn sat_is_symmetric(
            ax in -10.0..10.0f64, ay in -10.0..10.0f64, aa in -180.0..180.0f64,
            bx in -10.0..10.0f64, by in -10.0..10.0f64, ba in -180.0..180.0f64,
            al in 0.1..5.0f64, aw in 0.1..5.0f64, bl in 0.1..5.0f64, bw in 0.1..5.0f64,
        ) {
            let a = rotated_rectangle(ax, ay, al, aw, aa);
            let b = rotated_rectangle(bx, by, bl, bw, ba);
            prop_assert_eq!(
                polygons_intersect(&a, &b).unwrap(),
                polygons_intersect(&b, &a).unwrap()
            );
        }

        #[test]
        fn sat_translation_invariance(
            aa in -180.0..180.0f64, ba in -180.0..180.0f64,
            dir in 0.0..std::f64::consts::TAU,
            tx in -50.0..50.0f64, ty in -50.0..50.0f64,
        ) {
            // Half-diagonals are at most sqrt(1 + 0.25) < 1.2, so a centre
            // distance of 3 guarantees separation.
            let (s, c) = dir.sin_cos();
            let a = rotated_rectangle(0.0, 0.0, 2.0, 1.0, aa);
            let b = rotated_rectangle(3.0 * c, 3.0 * s, 2.0, 1.0, ba);
            prop_assert!(!polygons_intersect(&a, &b).unwrap());

            let a_moved = rotated_rectangle(tx, ty, 2.0, 1.0, aa);
            let b_moved = rotated_rectangle(tx + 3.0 * c, ty + 3.0 * s, 2.0, 1.0, ba);
            prop_assert!(!polygons_intersect(&a_moved, &b_moved).unwrap());

            // Closing the gap to a shared centre always collides.
            let b_closed = rotated_rectangle(0.4 * c, 0.4 * s, 2.0, 1.0, ba);
            prop_assert!(polygons_intersect(&a, &b_closed).unwrap());
        }

        #[test]
        fn segment_intersection_is_symmetric(
            coords in proptest::array::uniform8(-5.0..5.0f64),
        ) {
            let [a, b, c, d, e, f, g, h] = coords;
            let (p1, q1, p2, q2) = (p(a, b), p(c, d), p(e, f), p(g, h));
            prop_assert_eq!(
                segments_intersect(p1, q1, p2, q2),
                segments_intersect(p2, q2, p1, q1)
            );
        }
    }
}
