//! Rigid body: one convex regular polygon
//!
//! Geometry and mass properties are fixed at creation. Pose and velocity are
//! mutated by the collision pipeline and by integration; the vertex list is a
//! cache derived from the pose.

use std::collections::HashSet;
use std::f64::consts::{PI, TAU};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Serialized form of a [`Body`]
///
/// Only the inputs are stored; mass, inertia and vertices are rebuilt by
/// [`Body::from_state`] so a restored body passes the same checks as a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub id: u32,
    pub vertex_radius: f64,
    pub corner_count: u32,
    pub position: DVec2,
    pub orientation: f64,
    pub linear_velocity: DVec2,
    pub angular_velocity: f64,
    pub color: [u8; 3],
}

/// A regular polygon rigid body
#[derive(Debug, Clone)]
pub struct Body {
    id: u32,
    vertex_radius: f64,
    corner_count: u32,
    mass: f64,
    inertia: f64,
    inv_inertia: f64,
    position: DVec2,
    /// Radians
    orientation: f64,
    linear_velocity: DVec2,
    angular_velocity: f64,
    /// Fill color for the renderer; physics ignores it
    pub color: [u8; 3],
    vertices: Vec<DVec2>,
    /// Bodies this one already resolved a contact with during the current step
    collided_this_step: HashSet<u32>,
}

impl Body {
    /// Create a body at the origin, at rest
    pub fn new(id: u32, vertex_radius: f64, corner_count: u32, density: f64) -> SimResult<Self> {
        if !(vertex_radius.is_finite() && vertex_radius > 0.0) {
            return Err(SimError::InvalidBody {
                reason: "vertex radius must be positive and finite",
            });
        }
        if corner_count < 3 {
            return Err(SimError::InvalidBody {
                reason: "a polygon needs at least 3 corners",
            });
        }
        if !(density.is_finite() && density > 0.0) {
            return Err(SimError::InvalidBody {
                reason: "density must be positive and finite",
            });
        }

        let n = corner_count as f64;
        let half_angle = PI / n;
        let apothem = vertex_radius * half_angle.cos();
        let area = apothem * apothem * n * half_angle.tan() * 0.5;
        let mass = density * area;
        let inertia = (mass * vertex_radius * vertex_radius / 6.0)
            * (half_angle.sin().powi(2) + 3.0 * half_angle.cos().powi(2));

        let mut body = Self {
            id,
            vertex_radius,
            corner_count,
            mass,
            inertia,
            inv_inertia: 1.0 / inertia,
            position: DVec2::ZERO,
            orientation: 0.0,
            linear_velocity: DVec2::ZERO,
            angular_velocity: 0.0,
            color: [255, 255, 255],
            vertices: Vec::with_capacity(corner_count as usize),
            collided_this_step: HashSet::new(),
        };
        body.refresh_vertices();
        Ok(body)
    }

    /// Rebuild a body from a snapshot record
    pub fn from_state(state: &BodyState, density: f64) -> SimResult<Self> {
        let mut body = Self::new(state.id, state.vertex_radius, state.corner_count, density)?;
        if !(state.position.is_finite()
            && state.orientation.is_finite()
            && state.linear_velocity.is_finite()
            && state.angular_velocity.is_finite())
        {
            return Err(SimError::InvalidBody {
                reason: "pose and velocity must be finite",
            });
        }
        body.orientation = state.orientation;
        body.position = state.position;
        body.refresh_vertices();
        body.set_velocity(state.linear_velocity, state.angular_velocity);
        body.color = state.color;
        Ok(body)
    }

    /// Snapshot record of this body
    pub fn state(&self) -> BodyState {
        BodyState {
            id: self.id,
            vertex_radius: self.vertex_radius,
            corner_count: self.corner_count,
            position: self.position,
            orientation: self.orientation,
            linear_velocity: self.linear_velocity,
            angular_velocity: self.angular_velocity,
            color: self.color,
        }
    }

    /// Identity used by the per-step collision memo
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn vertex_radius(&self) -> f64 {
        self.vertex_radius
    }

    #[inline]
    pub fn corner_count(&self) -> u32 {
        self.corner_count
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    #[inline]
    pub fn inv_inertia(&self) -> f64 {
        self.inv_inertia
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[inline]
    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    #[inline]
    pub fn linear_velocity(&self) -> DVec2 {
        self.linear_velocity
    }

    #[inline]
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Current corner positions, in order
    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Linear momentum `m * v`
    pub fn momentum(&self) -> DVec2 {
        self.mass * self.linear_velocity
    }

    /// Linear plus rotational kinetic energy
    pub fn kinetic_energy(&self) -> f64 {
        crate::kinetic_energy(
            self.mass,
            self.inertia,
            self.linear_velocity,
            self.angular_velocity,
        )
    }

    /// Move the body; cached vertices are carried along with it
    pub fn set_position(&mut self, position: DVec2) {
        let delta = position - self.position;
        self.position = position;
        for v in &mut self.vertices {
            *v += delta;
        }
    }

    /// Rotate the body to an absolute orientation (radians)
    pub fn set_orientation(&mut self, orientation: f64) {
        self.orientation = orientation;
        self.refresh_vertices();
    }

    pub fn set_velocity(&mut self, linear: DVec2, angular: f64) {
        self.linear_velocity = linear;
        self.angular_velocity = angular;
    }

    /// Whether a contact with `other` was already resolved this step
    #[inline]
    pub fn has_collided_with(&self, other: u32) -> bool {
        self.collided_this_step.contains(&other)
    }

    pub fn record_collision(&mut self, other: u32) {
        self.collided_this_step.insert(other);
    }

    /// Advance pose by `dt`, rebuild vertices and forget this step's contacts
    pub fn integrate(&mut self, dt: f64) {
        self.position += self.linear_velocity * dt;
        self.orientation += self.angular_velocity * dt;
        self.refresh_vertices();
        self.collided_this_step.clear();
    }

    /// Recompute vertices from position and orientation
    ///
    /// Vertex 0 sits straight "up" (negative y) at zero orientation and the
    /// rest follow at equal angular steps.
    fn refresh_vertices(&mut self) {
        let step = TAU / self.corner_count as f64;
        let (position, radius, orientation) = (self.position, self.vertex_radius, self.orientation);
        self.vertices.clear();
        self.vertices.extend((0..self.corner_count).map(|i| {
            let angle = orientation + i as f64 * step;
            position + radius * DVec2::new(angle.sin(), -angle.cos())
        }));
    }
}
