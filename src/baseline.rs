//! Benchmarks candidate walls against random collision-free placements.
//!
//! A single baseline of random single-wall placements is drawn from a
//! seeded ChaCha stream and scored once. Every candidate wall is then
//! scored alone and located within that baseline by z-score, min-max
//! normalization and percentile.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::collision::is_collision_free;
use crate::config::EvaluationConfig;
use crate::error::{EngineError, Result};
use crate::penalty::{penalties, PenaltyTriple};
use crate::types::{OfficePlan, Pose};

/// Standard score; zero when `std` is zero.
pub fn z_score(value: f64, mean: f64, std: f64) -> f64 {
    if std == 0.0 {
        0.0
    } else {
        (value - mean) / std
    }
}

/// Scale into [0, 1] relative to the baseline range; zero when the range
/// is empty.
pub fn min_max_norm(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        0.0
    } else {
        (value - min) / (max - min)
    }
}

/// Fraction of `data` at or below `value`; zero for empty data.
pub fn percentile(value: f64, data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().filter(|&&v| v <= value).count() as f64 / data.len() as f64
}

/// Summary of one penalty component over the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentStats {
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl ComponentStats {
    /// All zeros for an empty slice.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std: variance.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    pub fn z_score(&self, value: f64) -> f64 {
        z_score(value, self.mean, self.std)
    }

    pub fn min_max_norm(&self, value: f64) -> f64 {
        min_max_norm(value, self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BaselineStats {
    pub disturbance: ComponentStats,
    pub window: ComponentStats,
    pub peer: ComponentStats,
}

/// Baseline values split per component.
#[derive(Debug, Clone, Default)]
struct Columns {
    disturbance: Vec<f64>,
    window: Vec<f64>,
    peer: Vec<f64>,
}

impl Columns {
    fn from_triples(triples: &[PenaltyTriple]) -> Self {
        Self {
            disturbance: triples.iter().map(|t| t.disturbance).collect(),
            window: triples.iter().map(|t| t.window).collect(),
            peer: triples.iter().map(|t| t.peer).collect(),
        }
    }

    fn stats(&self) -> BaselineStats {
        BaselineStats {
            disturbance: ComponentStats::from_values(&self.disturbance),
            window: ComponentStats::from_values(&self.window),
            peer: ComponentStats::from_values(&self.peer),
        }
    }
}

impl BaselineStats {
    pub fn from_triples(triples: &[PenaltyTriple]) -> Self {
        Columns::from_triples(triples).stats()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallComparison {
    pub wall: Pose,
    pub penalties: PenaltyTriple,
    pub z_scores: PenaltyTriple,
    pub min_max: PenaltyTriple,
    pub percentiles: PenaltyTriple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineComparison {
    pub baseline: BaselineStats,
    pub walls: Vec<WallComparison>,
}

/// Draw `count` random single-wall placements that collide with nothing.
///
/// Centres are uniform over the boundary's bounding box and angles over
/// [-90, 90] degrees. Candidates are drawn sequentially from `rng` and
/// checked in parallel, so the result only depends on the RNG state.
/// Gives up with `BaselineExhausted` after `config.baseline.max_attempts`
/// draws, and with `InvalidBoundary` when the bounding box is not finite.
pub fn random_placements<R: Rng>(
    plan: &OfficePlan,
    count: usize,
    config: &EvaluationConfig,
    rng: &mut R,
) -> Result<Vec<Pose>> {
    let (lo, hi) = plan.boundary.polygon().bounds();
    let finite = [lo.x, lo.y, hi.x, hi.y].iter().all(|v| v.is_finite());
    if !finite || lo.x > hi.x || lo.y > hi.y {
        warn!(?lo, ?hi, "boundary bounds are not finite");
        return Err(EngineError::InvalidBoundary);
    }
    let max_attempts = config.baseline.max_attempts;
    let mut found = Vec::with_capacity(count);
    let mut attempts = 0;

    while found.len() < count && attempts < max_attempts {
        let batch = ((count - found.len()) * 2)
            .max(16)
            .min(max_attempts - attempts);
        let candidates: Vec<Pose> = (0..batch)
            .map(|_| {
                Pose::new(
                    rng.gen_range(lo.x..=hi.x),
                    rng.gen_range(lo.y..=hi.y),
                    rng.gen_range(-90.0..=90.0),
                )
            })
            .collect();
        attempts += batch;

        let free: Vec<bool> = candidates
            .par_iter()
            .map(|c| is_collision_free(std::slice::from_ref(c), plan, config))
            .collect::<Result<_>>()?;
        found.extend(
            candidates
                .into_iter()
                .zip(free)
                .filter_map(|(c, ok)| ok.then_some(c))
                .take(count - found.len()),
        );
        debug!(found = found.len(), attempts, "baseline sampling batch");
    }

    if found.len() < count {
        warn!(
            found = found.len(),
            requested = count,
            attempts,
            "baseline sampling exhausted"
        );
        return Err(EngineError::BaselineExhausted {
            found: found.len(),
            requested: count,
            attempts,
        });
    }
    Ok(found)
}

/// Score each wall alone against one shared random baseline of
/// `sample_size * walls.len()` placements.
pub fn compare_walls(
    plan: &OfficePlan,
    walls: &[Pose],
    config: &EvaluationConfig,
) -> Result<BaselineComparison> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.baseline.seed);
    let total = config.baseline.sample_size * walls.len();
    let placements = random_placements(plan, total, config, &mut rng)?;
    info!(placements = placements.len(), seed = config.baseline.seed, "baseline drawn");

    let baseline: Vec<PenaltyTriple> = placements
        .par_iter()
        .map(|p| penalties(plan, std::slice::from_ref(p), config))
        .collect();
    let columns = Columns::from_triples(&baseline);
    let stats = columns.stats();
    let has_peers = plan.peer_count() > 1;

    let walls = walls
        .iter()
        .map(|&wall| {
            let raw = penalties(plan, &[wall], config);
            WallComparison {
                wall,
                penalties: raw,
                z_scores: PenaltyTriple {
                    disturbance: stats.disturbance.z_score(raw.disturbance),
                    window: stats.window.z_score(raw.window),
                    peer: stats.peer.z_score(raw.peer),
                },
                min_max: PenaltyTriple {
                    disturbance: stats.disturbance.min_max_norm(raw.disturbance),
                    window: stats.window.min_max_norm(raw.window),
                    peer: stats.peer.min_max_norm(raw.peer),
                },
                percentiles: PenaltyTriple {
                    disturbance: percentile(raw.disturbance, &columns.disturbance),
                    window: percentile(raw.window, &columns.window),
                    peer: if has_peers {
                        percentile(raw.peer, &columns.peer)
                    } else {
                        0.0
                    },
                },
            }
        })
        .collect();

    Ok(BaselineComparison {
        baseline: stats,
        walls,
    })
}
