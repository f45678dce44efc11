//! Entity adapter: the only place that knows how each office entity
//! turns into kernel geometry.

use serde::{Deserialize, Serialize};

use crate::config::Dimensions;
use crate::error::Result;
use crate::geometry::{
    arc_intersects_polygon, circle_intersects_polygon, point_in_polygon, polygons_intersect,
    rotated_rectangle, Point, Polygon, Segment,
};
use crate::types::{Boundary, Desk, Door, Orientation, Pose, Rotation, StaticObject, Window};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// Circular sector swept from `start` around `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point,
    pub start: Point,
    pub sweep_deg: f64,
    pub rotation: Rotation,
}

/// Kernel-level shape of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Point),
    Polygon(Polygon),
    Circle(Circle),
    Arc(Arc),
}

impl Shape {
    /// Whether this shape overlaps `polygon`, which must be convex when
    /// the shape is a polygon or an arc.
    pub fn intersects(&self, polygon: &Polygon, arc_segments: usize) -> Result<bool> {
        match self {
            Shape::Point(p) => Ok(point_in_polygon(*p, polygon)),
            Shape::Polygon(own) => polygons_intersect(polygon, own),
            Shape::Circle(c) => Ok(circle_intersects_polygon(c.center, c.radius, polygon)),
            Shape::Arc(a) => arc_intersects_polygon(
                a.center,
                a.start,
                a.sweep_deg,
                a.rotation,
                polygon,
                arc_segments,
            ),
        }
    }
}

impl Pose {
    pub fn footprint(&self, dims: &Dimensions) -> Polygon {
        rotated_rectangle(
            self.x,
            self.y,
            dims.movable_wall_length,
            dims.movable_wall_width,
            self.angle_deg,
        )
    }
}

impl Boundary {
    pub fn polygon(&self) -> Polygon {
        match self {
            Boundary::Rectangle { length, width } => {
                rotated_rectangle(length / 2.0, width / 2.0, *length, *width, 0.0)
            }
            Boundary::Polygon { corners } => corners.clone(),
        }
    }
}

impl Desk {
    pub fn footprint(&self) -> Polygon {
        rotated_rectangle(self.center.x, self.center.y, self.length, self.width, 0.0)
    }

    /// Chair position: one chair diameter beyond the edge the desk faces.
    pub fn chair_center(&self, chair_radius: f64) -> Point {
        let Point { x, y } = self.center;
        let gap = 2.0 * chair_radius;
        match self.orientation {
            Orientation::Up => Point::new(x, y + self.width / 2.0 + gap),
            Orientation::Down => Point::new(x, y - self.width / 2.0 - gap),
            Orientation::Left => Point::new(x - self.length / 2.0 - gap, y),
            Orientation::Right => Point::new(x + self.length / 2.0 + gap, y),
        }
    }

    pub fn chair(&self, chair_radius: f64) -> Circle {
        Circle {
            center: self.chair_center(chair_radius),
            radius: chair_radius,
        }
    }
}

impl Door {
    pub fn sweep(&self) -> Arc {
        Arc {
            center: self.hinge,
            start: self.closed_end,
            sweep_deg: self.opening_angle_deg,
            rotation: self.rotation,
        }
    }
}

impl Window {
    pub fn segment(&self) -> Segment {
        let Point { x, y } = self.origin;
        let end = match self.orientation {
            Orientation::Up => Point::new(x, y + self.size),
            Orientation::Down => Point::new(x, y - self.size),
            Orientation::Right => Point::new(x + self.size, y),
            Orientation::Left => Point::new(x - self.size, y),
        };
        Segment::new(self.origin, end)
    }

    pub fn midpoint(&self) -> Point {
        self.segment().midpoint()
    }
}

impl StaticObject {
    pub fn shape(&self) -> Shape {
        match self {
            StaticObject::Rectangle {
                center,
                length,
                width,
            } => Shape::Polygon(rotated_rectangle(center.x, center.y, *length, *width, 0.0)),
            StaticObject::Round { center, radius } => Shape::Circle(Circle {
                center: *center,
                radius: *radius,
            }),
            StaticObject::Polygon { corners } => Shape::Polygon(corners.clone()),
        }
    }
}
