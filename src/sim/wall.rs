//! Collision with the four arena walls
//!
//! Each wall is checked on its own, in a fixed order, so a body wedged in a
//! corner can bounce off two walls in the same step.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::math::{closest_vertex, cross, dot};
use crate::consts::{RESTITUTION, WALL_TARGET_SCALE};
use crate::point_velocity;

/// Arena extent: x in `0..=width`, y in `0..=height`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Coordinate far enough past every wall that the closest vertex to it
    /// is the body's extreme vertex on that side
    fn far_target(&self) -> f64 {
        WALL_TARGET_SCALE * self.width * self.height
    }
}

/// One of the four arena walls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Top,
    Bottom,
}

impl Wall {
    /// Test order within a step
    pub const ALL: [Wall; 4] = [Wall::Left, Wall::Right, Wall::Top, Wall::Bottom];

    /// Unit normal pointing back into the arena
    pub fn normal(self) -> DVec2 {
        match self {
            Wall::Left => DVec2::X,
            Wall::Right => DVec2::NEG_X,
            Wall::Top => DVec2::Y,
            Wall::Bottom => DVec2::NEG_Y,
        }
    }

    /// Coordinate of a point along the axis this wall constrains
    fn axis(self, p: DVec2) -> f64 {
        match self {
            Wall::Left | Wall::Right => p.x,
            Wall::Top | Wall::Bottom => p.y,
        }
    }

    fn coordinate(self, bounds: &Bounds) -> f64 {
        match self {
            Wall::Left | Wall::Top => 0.0,
            Wall::Right => bounds.width,
            Wall::Bottom => bounds.height,
        }
    }

    /// Signed distance of `value` past the wall (positive = outside)
    fn penetration(self, value: f64, bounds: &Bounds) -> f64 {
        match self {
            Wall::Left | Wall::Top => self.coordinate(bounds) - value,
            Wall::Right | Wall::Bottom => value - self.coordinate(bounds),
        }
    }

    fn virtual_target(self, bounds: &Bounds) -> f64 {
        match self {
            Wall::Left | Wall::Top => -bounds.far_target(),
            Wall::Right | Wall::Bottom => bounds.far_target(),
        }
    }
}

/// Which walls a body bounced off during one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl WallHits {
    fn mark(&mut self, wall: Wall) {
        match wall {
            Wall::Left => self.left = true,
            Wall::Right => self.right = true,
            Wall::Top => self.top = true,
            Wall::Bottom => self.bottom = true,
        }
    }

    pub fn contains(&self, wall: Wall) -> bool {
        match wall {
            Wall::Left => self.left,
            Wall::Right => self.right,
            Wall::Top => self.top,
            Wall::Bottom => self.bottom,
        }
    }

    pub fn count(&self) -> usize {
        Wall::ALL.iter().filter(|&&w| self.contains(w)).count()
    }

    pub fn any(&self) -> bool {
        self.count() > 0
    }
}

/// Reflect `body` off a fixed surface at `contact` with the given normal
///
/// Same impulse as a body pair, with the wall as an immovable partner.
fn wall_impulse(body: &mut Body, contact: DVec2, normal: DVec2, restitution: f64) {
    let r = contact - body.position();
    let rxn = cross(r, normal);
    let vel = point_velocity(body.linear_velocity(), body.angular_velocity(), r);

    let impulse = -(1.0 + restitution) * dot(vel, normal)
        / (1.0 / body.mass() + body.inv_inertia() * rxn * rxn);

    body.set_velocity(
        body.linear_velocity() + (impulse / body.mass()) * normal,
        body.angular_velocity() + body.inv_inertia() * rxn * impulse,
    );
}

/// Keep `body` inside `bounds`, bouncing it off every wall it pokes through
pub fn handle_walls(body: &mut Body, bounds: &Bounds) -> WallHits {
    let mut hits = WallHits::default();

    for wall in Wall::ALL {
        let r = body.vertex_radius();
        let center = wall.axis(body.position());
        // Bounding circle still clear of the wall
        if wall.penetration(center, bounds) + r <= 0.0 {
            continue;
        }

        let target = wall.virtual_target(bounds);
        let index = closest_vertex(body.vertices(), |v| (wall.axis(v) - target).abs());
        let deepest = body.vertices()[index];
        let depth = wall.penetration(wall.axis(deepest), bounds);
        if depth <= 0.0 {
            continue;
        }

        let normal = wall.normal();
        body.set_position(body.position() + depth * normal);
        wall_impulse(body, deepest, normal, RESTITUTION);
        hits.mark(wall);
    }

    hits
}
