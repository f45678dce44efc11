//! Penalty scoring for collision-free wall placements.
//!
//! Three independent components built on sampled visibility:
//!
//! - disturbance: `+alpha * vis / (d + eps)` for every person and every
//!   other disturbing person or noise source,
//! - window: `-beta * vis / (d + eps)^2` for every person and window,
//!   ignoring the boundary as an occluder,
//! - peer: `-gamma * vis / (d + eps)^2` for every unordered pair of
//!   non-disturbing persons.
//!
//! Lower is better. Persons are identified by their index in the plan,
//! so two people standing on the same spot are still two people.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collision::detect_collisions;
use crate::config::EvaluationConfig;
use crate::error::Result;
use crate::geometry::{Point, Polygon, Segment};
use crate::types::{OfficePlan, Pose};
use crate::visibility::{blockers, circle_samples, fraction_visible, line_samples};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PenaltyTriple {
    pub disturbance: f64,
    pub window: f64,
    pub peer: f64,
}

impl PenaltyTriple {
    pub fn total(&self) -> f64 {
        self.disturbance + self.window + self.peer
    }
}

impl std::ops::Add for PenaltyTriple {
    type Output = PenaltyTriple;

    fn add(self, rhs: PenaltyTriple) -> PenaltyTriple {
        PenaltyTriple {
            disturbance: self.disturbance + rhs.disturbance,
            window: self.window + rhs.window,
            peer: self.peer + rhs.peer,
        }
    }
}

/// Sample sets shared by every per-person term.
struct Scene {
    positions: Vec<Point>,
    disturbing: Vec<bool>,
    rings: Vec<Vec<Point>>,
    noise: Vec<(Point, Vec<Point>)>,
    windows: Vec<(Point, Vec<Point>)>,
    occluders: Vec<Segment>,
    window_occluders: Vec<Segment>,
}

impl Scene {
    fn build(plan: &OfficePlan, walls: &[Pose], config: &EvaluationConfig) -> Self {
        let sampling = &config.sampling;
        let ring = |p: Point| {
            circle_samples(p, sampling.person_sample_radius, sampling.person_sample_count)
        };
        let boundary = plan.boundary.polygon();
        let footprints: Vec<Polygon> = walls
            .iter()
            .map(|w| w.footprint(&config.dimensions))
            .collect();

        Scene {
            positions: plan.persons.iter().map(|p| p.position).collect(),
            disturbing: plan.persons.iter().map(|p| p.disturbing).collect(),
            rings: plan.persons.iter().map(|p| ring(p.position)).collect(),
            noise: plan.noise_sources.iter().map(|&n| (n, ring(n))).collect(),
            windows: plan
                .windows
                .iter()
                .map(|w| {
                    let seg = w.segment();
                    (
                        seg.midpoint(),
                        line_samples(seg.start, seg.end, sampling.window_sample_count),
                    )
                })
                .collect(),
            occluders: blockers(Some(&boundary), &footprints),
            window_occluders: blockers(None, &footprints),
        }
    }

    /// Every term owned by person `i`. Peer pairs are owned by the lower
    /// index so each unordered pair is counted once.
    fn person_terms(&self, i: usize, config: &EvaluationConfig) -> PenaltyTriple {
        let weights = &config.weights;
        let eps = config.sampling.epsilon;
        let here = self.positions[i];
        let ring = &self.rings[i];

        let mut disturbance = 0.0;
        for j in 0..self.positions.len() {
            if j == i || !self.disturbing[j] {
                continue;
            }
            let vis = fraction_visible(ring, &self.rings[j], &self.occluders);
            disturbance += weights.alpha * vis / (here.distance(self.positions[j]) + eps);
        }
        for (source, samples) in &self.noise {
            let vis = fraction_visible(ring, samples, &self.occluders);
            disturbance += weights.alpha * vis / (here.distance(*source) + eps);
        }

        let mut window = 0.0;
        for (midpoint, samples) in &self.windows {
            let vis = fraction_visible(ring, samples, &self.window_occluders);
            window -= weights.beta * vis / (here.distance(*midpoint) + eps).powi(2);
        }

        let mut peer = 0.0;
        if !self.disturbing[i] {
            for j in (i + 1)..self.positions.len() {
                if self.disturbing[j] {
                    continue;
                }
                let vis = fraction_visible(ring, &self.rings[j], &self.occluders);
                peer -= weights.gamma * vis / (here.distance(self.positions[j]) + eps).powi(2);
            }
        }

        PenaltyTriple {
            disturbance,
            window,
            peer,
        }
    }
}

/// Penalty triple of a wall placement. Collisions are not checked here.
///
/// Per-person terms run in parallel and are summed in person order, so
/// the result does not depend on the thread count.
pub fn penalties(plan: &OfficePlan, walls: &[Pose], config: &EvaluationConfig) -> PenaltyTriple {
    let scene = Scene::build(plan, walls, config);
    let per_person: Vec<PenaltyTriple> = (0..scene.positions.len())
        .into_par_iter()
        .map(|i| scene.person_terms(i, config))
        .collect();
    let triple = per_person
        .into_iter()
        .fold(PenaltyTriple::default(), |acc, t| acc + t);
    debug!(
        persons = scene.positions.len(),
        walls = walls.len(),
        disturbance = triple.disturbance,
        window = triple.window,
        peer = triple.peer,
        "penalties evaluated"
    );
    triple
}

/// Sum of the three components; lower is better.
pub fn aggregate_score(plan: &OfficePlan, walls: &[Pose], config: &EvaluationConfig) -> f64 {
    penalties(plan, walls, config).total()
}

/// Objective for an external minimizer: `+inf` for any colliding
/// placement, the aggregate score otherwise.
pub fn objective(plan: &OfficePlan, walls: &[Pose], config: &EvaluationConfig) -> Result<f64> {
    if !detect_collisions(walls, plan, config)?.is_empty() {
        return Ok(f64::INFINITY);
    }
    Ok(aggregate_score(plan, walls, config))
}
