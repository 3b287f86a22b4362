//! Contact generation and impulse response between two polygons
//!
//! Contact data is approximated from the vertex of each polygon that sits
//! closest to the other polygon's center. The impulse is the standard 2D
//! rigid-body response with rotation:
//!
//! ```text
//! j = -(1 + e) (v_a - v_b) . n / (1/m_a + 1/m_b + (r_a x n)^2 / I_a + (r_b x n)^2 / I_b)
//! ```

use glam::DVec2;

use super::body::Body;
use super::math::{closest_vertex, cross, dot, edge_normal, unit_vector};
use super::narrow::{SatMode, radius_overlap, sat_collided};
use crate::consts::RESTITUTION;
use crate::error::SimResult;
use crate::point_velocity;

/// Contact between two bodies, valid for a single resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactData {
    /// Contact point (a vertex of one of the bodies)
    pub point: DVec2,
    /// Unit normal of the contact face
    pub normal: DVec2,
    /// The normal was taken from the first body's edge and points away from it
    pub normal_on_first: bool,
}

impl ContactData {
    /// Normal oriented from the second body toward the first
    pub fn oriented_normal(&self) -> DVec2 {
        if self.normal_on_first {
            -self.normal
        } else {
            self.normal
        }
    }
}

/// How a candidate pair left the narrow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    /// Bounding circles or SAT found no overlap
    Rejected,
    /// Already resolved against each other this step
    Skipped,
    /// Impulse applied
    Resolved,
}

/// Index of the vertex of `body` closest to `target`
fn deepest_vertex(body: &Body, target: DVec2) -> usize {
    closest_vertex(body.vertices(), |v| v.distance(target))
}

/// Normal of the `body` edge adjacent to vertex `deepest` that best matches `point`
///
/// Uses the edge toward the next vertex when `point` lies inside that edge's
/// bounding box, otherwise the edge coming from the previous vertex.
fn face_normal(body: &Body, deepest: usize, point: DVec2) -> DVec2 {
    let vertices = body.vertices();
    let n = vertices.len();
    let corner = vertices[deepest];
    let next = vertices[(deepest + 1) % n];

    let min = corner.min(next);
    let max = corner.max(next);
    if min.x <= point.x && point.x <= max.x && min.y <= point.y && point.y <= max.y {
        edge_normal(next, corner)
    } else {
        let prev = vertices[(deepest + n - 1) % n];
        edge_normal(corner, prev)
    }
}

/// Approximate the contact point and normal of two overlapping polygons
pub fn contact_data(a: &Body, b: &Body) -> SimResult<ContactData> {
    let a_index = deepest_vertex(a, b.position());
    let b_index = deepest_vertex(b, a.position());
    let a_deepest = a.vertices()[a_index];
    let b_deepest = b.vertices()[b_index];

    let centers = unit_vector(a.position(), b.position(), "contact centers")?;
    let a_relative = unit_vector(a_deepest, a.position(), "contact vertex of first body")?;
    let b_relative = unit_vector(b_deepest, b.position(), "contact vertex of second body")?;

    let a_alignment = dot(a_relative, centers).abs();
    let b_alignment = dot(b_relative, centers).abs();

    if a_alignment > b_alignment {
        Ok(ContactData {
            point: a_deepest,
            normal: face_normal(b, b_index, a_deepest),
            normal_on_first: false,
        })
    } else {
        Ok(ContactData {
            point: b_deepest,
            normal: face_normal(a, a_index, b_deepest),
            normal_on_first: true,
        })
    }
}

/// Apply equal and opposite impulses at the contact point
///
/// Returns the impulse magnitude along the oriented normal.
pub fn apply_impulse(a: &mut Body, b: &mut Body, contact: &ContactData, restitution: f64) -> f64 {
    let normal = contact.oriented_normal();

    let a_r = contact.point - a.position();
    let a_rxn = cross(a_r, normal);
    let a_vel = point_velocity(a.linear_velocity(), a.angular_velocity(), a_r);

    let b_r = contact.point - b.position();
    let b_rxn = cross(b_r, normal);
    let b_vel = point_velocity(b.linear_velocity(), b.angular_velocity(), b_r);

    let impulse = -(1.0 + restitution) * dot(a_vel - b_vel, normal)
        / (1.0 / a.mass()
            + 1.0 / b.mass()
            + (a.inv_inertia() * a_rxn * a_rxn + b.inv_inertia() * b_rxn * b_rxn));

    a.set_velocity(
        a.linear_velocity() + (impulse / a.mass()) * normal,
        a.angular_velocity() + a.inv_inertia() * a_rxn * impulse,
    );
    b.set_velocity(
        b.linear_velocity() - (impulse / b.mass()) * normal,
        b.angular_velocity() - b.inv_inertia() * b_rxn * impulse,
    );

    impulse
}

/// Full pairwise check: radius test, SAT with overlap removal, guard, impulse
///
/// Overlap removal runs before the already-collided guard, so a pair seen
/// twice in one step may be nudged apart again but never gets a second impulse.
pub fn resolve_pair(a: &mut Body, b: &mut Body) -> SimResult<PairOutcome> {
    if !radius_overlap(a, b) {
        return Ok(PairOutcome::Rejected);
    }
    if !sat_collided(a, b, SatMode::WithOverlapRemoval)? {
        return Ok(PairOutcome::Rejected);
    }
    if a.has_collided_with(b.id()) || b.has_collided_with(a.id()) {
        return Ok(PairOutcome::Skipped);
    }

    let contact = contact_data(a, b)?;
    let impulse = apply_impulse(a, b, &contact, RESTITUTION);
    log::trace!(
        "Resolved bodies {} and {}: impulse {:.3} at ({:.2}, {:.2})",
        a.id(),
        b.id(),
        impulse,
        contact.point.x,
        contact.point.y
    );

    a.record_collision(b.id());
    b.record_collision(a.id());
    Ok(PairOutcome::Resolved)
}
