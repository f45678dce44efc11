//! Evaluation configuration.
//!
//! Every field has a serde default, so `{}` is a complete config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::DEFAULT_ARC_SEGMENTS;

fn default_movable_wall_length() -> f64 {
    2.0
}
fn default_movable_wall_width() -> f64 {
    0.1
}
fn default_chair_radius() -> f64 {
    0.25
}
fn default_alpha() -> f64 {
    10.0
}
fn default_beta() -> f64 {
    0.5
}
fn default_gamma() -> f64 {
    0.5
}
fn default_person_sample_count() -> usize {
    16
}
fn default_person_sample_radius() -> f64 {
    0.5
}
fn default_window_sample_count() -> usize {
    8
}
fn default_epsilon() -> f64 {
    1e-6
}
fn default_arc_segments() -> usize {
    DEFAULT_ARC_SEGMENTS
}
fn default_sample_size() -> usize {
    100
}
fn default_max_attempts() -> usize {
    100_000
}

/// Fixed dimensions of furniture that plans do not spell out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default = "default_movable_wall_length")]
    pub movable_wall_length: f64,
    #[serde(default = "default_movable_wall_width")]
    pub movable_wall_width: f64,
    #[serde(default = "default_chair_radius")]
    pub chair_radius: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            movable_wall_length: 2.0,
            movable_wall_width: 0.1,
            chair_radius: 0.25,
        }
    }
}

/// Weights of the three penalty components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyWeights {
    /// Disturbance exposure.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Window exposure.
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Peer exposure.
    #[serde(default = "default_gamma")]
    pub gamma: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            alpha: 10.0,
            beta: 0.5,
            gamma: 0.5,
        }
    }
}

/// Sample densities for the visibility estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingParams {
    #[serde(default = "default_person_sample_count")]
    pub person_sample_count: usize,
    #[serde(default = "default_person_sample_radius")]
    pub person_sample_radius: f64,
    #[serde(default = "default_window_sample_count")]
    pub window_sample_count: usize,
    /// Added to distances before dividing.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            person_sample_count: 16,
            person_sample_radius: 0.5,
            window_sample_count: 8,
            epsilon: 1e-6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineParams {
    /// Random placements drawn per compared wall.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default)]
    pub seed: u64,
    /// Upper bound on rejected draws before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl Default for BaselineParams {
    fn default() -> Self {
        Self {
            sample_size: 100,
            seed: 0,
            max_attempts: 100_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub weights: PenaltyWeights,
    #[serde(default)]
    pub sampling: SamplingParams,
    /// Segments used to discretize door sweeps.
    #[serde(default = "default_arc_segments")]
    pub arc_segments: usize,
    #[serde(default)]
    pub baseline: BaselineParams,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            weights: PenaltyWeights::default(),
            sampling: SamplingParams::default(),
            arc_segments: DEFAULT_ARC_SEGMENTS,
            baseline: BaselineParams::default(),
        }
    }
}

impl EvaluationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
