//! Sampled line-of-sight estimation.
//!
//! People are approximated by a ring of points and windows by points
//! along their segment. Visibility between two such sets is the fraction
//! of sample pairs whose connecting ray crosses no blocker segment.

use std::f64::consts::TAU;

use crate::geometry::{Point, Polygon, Segment};

/// `count` points evenly spaced on a circle, the first at angle 0.
pub fn circle_samples(center: Point, radius: f64, count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let theta = TAU * i as f64 / count as f64;
            Point::new(
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
            )
        })
        .collect()
}

/// `count` evenly spaced points from `start` to `end`, both included.
/// Fewer than two samples collapse to the midpoint.
pub fn line_samples(start: Point, end: Point, count: usize) -> Vec<Point> {
    if count < 2 {
        return vec![start.midpoint(end)];
    }
    let last = (count - 1) as f64;
    (0..count)
        .map(|i| {
            let t = i as f64 / last;
            Point::new(
                start.x + t * (end.x - start.x),
                start.y + t * (end.y - start.y),
            )
        })
        .collect()
}

pub fn is_blocked(a: Point, b: Point, blockers: &[Segment]) -> bool {
    let ray = Segment::new(a, b);
    blockers.iter().any(|s| ray.intersects(s))
}

/// Fraction of `a` x `b` sample pairs with an unobstructed ray.
///
/// Returns 0.0 when either set is empty.
pub fn fraction_visible(a: &[Point], b: &[Point], blockers: &[Segment]) -> f64 {
    let total = a.len() * b.len();
    if total == 0 {
        return 0.0;
    }
    let visible = a
        .iter()
        .flat_map(|&p| b.iter().map(move |&q| (p, q)))
        .filter(|&(p, q)| !is_blocked(p, q, blockers))
        .count();
    visible as f64 / total as f64
}

/// Blocker segments: the boundary's edges (when given) followed by the
/// four edges of every wall footprint.
pub fn blockers(boundary: Option<&Polygon>, walls: &[Polygon]) -> Vec<Segment> {
    boundary
        .into_iter()
        .chain(walls)
        .flat_map(|p| p.edges())
        .collect()
}
