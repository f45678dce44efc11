//! Partition engine: collision detection and penalty scoring for movable
//! office walls.
//!
//! The engine answers two questions about a candidate placement of
//! movable walls in a fixed floor plan: does any wall overlap something
//! ([`detect_collisions`]), and how good is a collision-free placement
//! ([`penalties`], [`aggregate_score`], [`objective`]).
//!
//! With the `python` feature the crate builds as an extension module
//! exposing a `PlanEvaluator` class that takes and returns JSON strings.

pub mod baseline;
pub mod collision;
pub mod config;
pub mod error;
pub mod geometry;
pub mod penalty;
pub mod shapes;
pub mod types;
pub mod visibility;

pub use baseline::{compare_walls, BaselineComparison, BaselineStats, WallComparison};
pub use collision::{detect_collisions, is_collision_free, CollisionRecord, Entity, EntityKind};
pub use config::EvaluationConfig;
pub use error::{EngineError, Result};
pub use geometry::{Point, Polygon, Segment};
pub use penalty::{aggregate_score, objective, penalties, PenaltyTriple};
pub use types::{OfficePlan, Pose};

#[cfg(feature = "python")]
mod python {
    use pyo3::prelude::*;

    use crate::{EvaluationConfig, OfficePlan, Pose};

    fn parse_walls(walls_json: &str) -> PyResult<Vec<Pose>> {
        Ok(serde_json::from_str(walls_json).map_err(crate::EngineError::from)?)
    }

    fn parse_config(config_json: Option<&str>) -> PyResult<EvaluationConfig> {
        match config_json {
            Some(json) => Ok(EvaluationConfig::from_json_str(json)?),
            None => Ok(EvaluationConfig::default()),
        }
    }

    fn to_json<T: serde::Serialize>(value: &T) -> PyResult<String> {
        Ok(serde_json::to_string(value).map_err(crate::EngineError::from)?)
    }

    /// A parsed plan and configuration, reused across many candidate
    /// placements by an external optimizer.
    #[pyclass]
    struct PlanEvaluator {
        plan: OfficePlan,
        config: EvaluationConfig,
    }

    #[pymethods]
    impl PlanEvaluator {
        #[new]
        #[pyo3(signature = (plan_json, config_json=None))]
        fn new(plan_json: &str, config_json: Option<&str>) -> PyResult<Self> {
            Ok(Self {
                plan: OfficePlan::from_json_str(plan_json)?,
                config: parse_config(config_json)?,
            })
        }

        /// Aggregate score, or infinity when any wall collides.
        fn objective(&self, walls: Vec<(f64, f64, f64)>) -> PyResult<f64> {
            let walls: Vec<Pose> = walls.into_iter().map(Pose::from).collect();
            Ok(crate::objective(&self.plan, &walls, &self.config)?)
        }

        /// (disturbance, window, peer)
        fn penalties(&self, walls: Vec<(f64, f64, f64)>) -> (f64, f64, f64) {
            let walls: Vec<Pose> = walls.into_iter().map(Pose::from).collect();
            let t = crate::penalties(&self.plan, &walls, &self.config);
            (t.disturbance, t.window, t.peer)
        }

        fn collisions_json(&self, walls_json: &str) -> PyResult<String> {
            let walls = parse_walls(walls_json)?;
            to_json(&crate::detect_collisions(&walls, &self.plan, &self.config)?)
        }

        /// One human-readable line per collision.
        fn describe_collisions(&self, walls: Vec<(f64, f64, f64)>) -> PyResult<Vec<String>> {
            let walls: Vec<Pose> = walls.into_iter().map(Pose::from).collect();
            let records = crate::detect_collisions(&walls, &self.plan, &self.config)?;
            Ok(records.iter().map(ToString::to_string).collect())
        }

        fn compare_json(&self, walls_json: &str) -> PyResult<String> {
            let walls = parse_walls(walls_json)?;
            to_json(&crate::compare_walls(&self.plan, &walls, &self.config)?)
        }
    }

    #[pyfunction]
    #[pyo3(signature = (plan_json, walls_json, config_json=None))]
    fn detect_collisions_json(
        plan_json: &str,
        walls_json: &str,
        config_json: Option<&str>,
    ) -> PyResult<String> {
        let plan = OfficePlan::from_json_str(plan_json)?;
        let walls = parse_walls(walls_json)?;
        let config = parse_config(config_json)?;
        to_json(&crate::detect_collisions(&walls, &plan, &config)?)
    }

    #[pyfunction]
    #[pyo3(signature = (plan_json, walls_json, config_json=None))]
    fn penalties_json(
        plan_json: &str,
        walls_json: &str,
        config_json: Option<&str>,
    ) -> PyResult<String> {
        let plan = OfficePlan::from_json_str(plan_json)?;
        let walls = parse_walls(walls_json)?;
        let config = parse_config(config_json)?;
        to_json(&crate::penalties(&plan, &walls, &config))
    }

    #[pymodule]
    fn partition_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<PlanEvaluator>()?;
        m.add_function(wrap_pyfunction!(detect_collisions_json, m)?)?;
        m.add_function(wrap_pyfunction!(penalties_json, m)?)?;
        Ok(())
    }
}
