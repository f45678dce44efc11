//! Collision detection between candidate movable walls and the plan.
//!
//! Each wall is rendered once to its footprint and checked, in order,
//! against the office boundary, desks, chairs, doors, persons, static
//! objects and every later wall. All collisions are collected; callers
//! decide whether any single one rejects the placement.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{Dimensions, EvaluationConfig};
use crate::error::Result;
use crate::geometry::{point_in_polygon, polygons_intersect, Point, Polygon};
use crate::shapes::{Circle, Shape};
use crate::types::{Desk, Door, OfficePlan, Pose, StaticObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Boundary,
    Desk,
    Chair,
    Door,
    Person,
    Object,
    MovableWall,
}

/// The entity a wall collided with, with enough payload to describe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Boundary,
    Desk { index: usize, desk: Desk },
    Chair { desk_index: usize, chair: Circle },
    Door { index: usize, door: Door },
    Person { index: usize, position: Point },
    Object { index: usize, object: StaticObject },
    MovableWall { index: usize, pose: Pose },
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Boundary => EntityKind::Boundary,
            Entity::Desk { .. } => EntityKind::Desk,
            Entity::Chair { .. } => EntityKind::Chair,
            Entity::Door { .. } => EntityKind::Door,
            Entity::Person { .. } => EntityKind::Person,
            Entity::Object { .. } => EntityKind::Object,
            Entity::MovableWall { .. } => EntityKind::MovableWall,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionRecord {
    pub wall_index: usize,
    pub wall: Pose,
    pub entity: Entity,
}

impl CollisionRecord {
    pub fn kind(&self) -> EntityKind {
        self.entity.kind()
    }
}

fn write_corners(f: &mut fmt::Formatter<'_>, corners: &[Point]) -> fmt::Result {
    write!(f, "[")?;
    for (i, c) in corners.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{c}")?;
    }
    write!(f, "]")
}

impl fmt::Display for CollisionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Movable wall {} collides with ", self.wall)?;
        match &self.entity {
            Entity::Boundary => write!(f, "a fixed office wall."),
            Entity::Desk { desk, .. } => {
                write!(f, "a desk with corners ")?;
                write_corners(f, desk.footprint().vertices())?;
                write!(f, ".")
            }
            Entity::Chair { chair, .. } => write!(
                f,
                "a chair at {} with radius {}.",
                chair.center, chair.radius
            ),
            Entity::Door { door, .. } => write!(
                f,
                "a door with hinge {}, closed end {}, opening {}° {}.",
                door.hinge, door.closed_end, door.opening_angle_deg, door.rotation
            ),
            Entity::Person { position, .. } => write!(f, "a person at {position}."),
            Entity::Object { object, .. } => match object {
                StaticObject::Rectangle {
                    center,
                    length,
                    width,
                } => write!(
                    f,
                    "a rectangular object at {center} of length {length} and width {width}."
                ),
                StaticObject::Round { center, radius } => {
                    write!(f, "a round object at {center} with radius {radius}.")
                }
                StaticObject::Polygon { corners } => {
                    write!(f, "a polygonal object with corners ")?;
                    write_corners(f, corners.vertices())?;
                    write!(f, ".")
                }
            },
            Entity::MovableWall { pose, .. } => write!(f, "another movable wall {pose}."),
        }
    }
}

/// Every non-wall plan entity with its shape, in reporting order.
fn plan_obstacles(plan: &OfficePlan, dims: &Dimensions) -> Vec<(Entity, Shape)> {
    let mut obstacles = Vec::with_capacity(
        2 * plan.desks.len() + plan.doors.len() + plan.persons.len() + plan.objects.len(),
    );
    for (index, desk) in plan.desks.iter().enumerate() {
        obstacles.push((
            Entity::Desk { index, desk: *desk },
            Shape::Polygon(desk.footprint()),
        ));
    }
    for (desk_index, desk) in plan.desks.iter().enumerate() {
        let chair = desk.chair(dims.chair_radius);
        obstacles.push((Entity::Chair { desk_index, chair }, Shape::Circle(chair)));
    }
    for (index, door) in plan.doors.iter().enumerate() {
        obstacles.push((Entity::Door { index, door: *door }, Shape::Arc(door.sweep())));
    }
    for (index, person) in plan.persons.iter().enumerate() {
        obstacles.push((
            Entity::Person {
                index,
                position: person.position,
            },
            Shape::Point(person.position),
        ));
    }
    for (index, object) in plan.objects.iter().enumerate() {
        obstacles.push((
            Entity::Object {
                index,
                object: object.clone(),
            },
            object.shape(),
        ));
    }
    obstacles
}

/// True if any corner of the footprint lies outside the boundary.
///
/// This is a containment test, not an overlap test: a wall lying along
/// the boundary edge only collides if one of its corners is classified
/// as outside.
fn escapes_boundary(footprint: &Polygon, boundary: &Polygon) -> bool {
    footprint
        .vertices()
        .iter()
        .any(|&v| !point_in_polygon(v, boundary))
}

fn wall_collisions(
    wall_index: usize,
    walls: &[Pose],
    footprints: &[Polygon],
    boundary: &Polygon,
    obstacles: &[(Entity, Shape)],
    arc_segments: usize,
) -> Result<Vec<CollisionRecord>> {
    let wall = walls[wall_index];
    let footprint = &footprints[wall_index];
    let mut records = Vec::new();
    let mut push = |entity: Entity| {
        trace!(wall_index, kind = ?entity.kind(), "collision");
        records.push(CollisionRecord {
            wall_index,
            wall,
            entity,
        });
    };

    if escapes_boundary(footprint, boundary) {
        push(Entity::Boundary);
    }
    for (entity, shape) in obstacles {
        if shape.intersects(footprint, arc_segments)? {
            push(entity.clone());
        }
    }
    for other in (wall_index + 1)..walls.len() {
        if polygons_intersect(footprint, &footprints[other])? {
            push(Entity::MovableWall {
                index: other,
                pose: walls[other],
            });
        }
    }
    Ok(records)
}

/// Collect every collision of every movable wall.
///
/// Records are ordered by wall, then by category (boundary, desks,
/// chairs, doors, persons, objects, later walls), then by entity index.
/// Each unordered wall pair is tested once and reported under the lower
/// index.
pub fn detect_collisions(
    walls: &[Pose],
    plan: &OfficePlan,
    config: &EvaluationConfig,
) -> Result<Vec<CollisionRecord>> {
    let dims = &config.dimensions;
    let boundary = plan.boundary.polygon();
    let obstacles = plan_obstacles(plan, dims);
    let footprints: Vec<Polygon> = walls.iter().map(|w| w.footprint(dims)).collect();

    let per_wall: Vec<Vec<CollisionRecord>> = (0..walls.len())
        .into_par_iter()
        .map(|i| {
            wall_collisions(
                i,
                walls,
                &footprints,
                &boundary,
                &obstacles,
                config.arc_segments,
            )
        })
        .collect::<Result<_>>()?;

    let records: Vec<CollisionRecord> = per_wall.into_iter().flatten().collect();
    debug!(
        walls = walls.len(),
        obstacles = obstacles.len(),
        collisions = records.len(),
        "collision detection finished"
    );
    Ok(records)
}

/// Whether the placement has no collisions at all.
pub fn is_collision_free(
    walls: &[Pose],
    plan: &OfficePlan,
    config: &EvaluationConfig,
) -> Result<bool> {
    Ok(detect_collisions(walls, plan, config)?.is_empty())
}
