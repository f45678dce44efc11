//! Office plan data model.
//!
//! Every entity derives Serialize + Deserialize so plans arrive as
//! already-parsed values from JSON. Enum tags are closed: an unknown
//! `type`, `shape`, orientation or rotation fails deserialization and
//! surfaces as `EngineError::Config`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{Point, Polygon};

// -- Enumerations --------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Orientation {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[serde(rename = "CW")]
    Clockwise,
    #[serde(rename = "CCW")]
    CounterClockwise,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Clockwise => write!(f, "clockwise"),
            Rotation::CounterClockwise => write!(f, "counterclockwise"),
        }
    }
}

// -- Movable walls -------------------------------------------------

/// Placement of a movable wall: centre plus rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub angle_deg: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, angle_deg: f64) -> Self {
        Self { x, y, angle_deg }
    }
}

impl From<(f64, f64, f64)> for Pose {
    fn from((x, y, angle_deg): (f64, f64, f64)) -> Self {
        Pose::new(x, y, angle_deg)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}°)", self.x, self.y, self.angle_deg)
    }
}

// -- Static entities -----------------------------------------------

/// Containment region of the office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Boundary {
    /// Axis-aligned rectangle with its lower-left corner at the origin.
    Rectangle { length: f64, width: f64 },
    Polygon { corners: Polygon },
}

/// Axis-aligned desk centred on `center`. The orientation only decides
/// which side the chair sits on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Desk {
    pub center: Point,
    pub orientation: Orientation,
    pub length: f64,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub hinge: Point,
    /// Free end of the leaf when the door is closed.
    pub closed_end: Point,
    pub opening_angle_deg: f64,
    pub rotation: Rotation,
}

/// Window starting at `origin` and running `size` units in the
/// direction of `orientation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub origin: Point,
    pub size: f64,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StaticObject {
    Rectangle { center: Point, length: f64, width: f64 },
    Round { center: Point, radius: f64 },
    Polygon { corners: Polygon },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub position: Point,
    /// Whether this person is a disturbance source for the others.
    #[serde(default)]
    pub disturbing: bool,
}

impl Person {
    pub const fn new(position: Point) -> Self {
        Self {
            position,
            disturbing: false,
        }
    }

    pub const fn disturbing(position: Point) -> Self {
        Self {
            position,
            disturbing: true,
        }
    }
}

// -- Plan ----------------------------------------------------------

/// A fixed floor plan. Movable walls are not part of the plan; they are
/// the candidate passed to each evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficePlan {
    pub boundary: Boundary,
    #[serde(default)]
    pub windows: Vec<Window>,
    #[serde(default)]
    pub doors: Vec<Door>,
    #[serde(default)]
    pub desks: Vec<Desk>,
    #[serde(default)]
    pub persons: Vec<Person>,
    /// Disturbance sources that are not people (printers, kitchens...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub noise_sources: Vec<Point>,
    #[serde(default)]
    pub objects: Vec<StaticObject>,
}

impl OfficePlan {
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            windows: Vec::new(),
            doors: Vec::new(),
            desks: Vec::new(),
            persons: Vec::new(),
            noise_sources: Vec::new(),
            objects: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Number of persons not flagged as disturbing.
    pub fn peer_count(&self) -> usize {
        self.persons.iter().filter(|p| !p.disturbing).count()
    }
}

// -- Tests ---------------------------------------------------------
