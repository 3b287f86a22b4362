//! Narrow phase: exact overlap tests between two polygons
//!
//! A cheap bounding-circle rejection runs first; pairs that survive are
//! checked with the Separating Axis Theorem over both polygons' edge normals.

use glam::DVec2;

use super::body::Body;
use super::math::{edge_normal, intervals_overlap, overlap_depth, project, unit_vector};
use crate::error::SimResult;

/// What `sat_collided` does once an overlap is confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatMode {
    /// Only report whether the polygons overlap
    Detection,
    /// Also push the polygons apart by the minimum overlap
    WithOverlapRemoval,
}

/// True unless the centers are farther apart than the sum of the radii
///
/// Exactly touching circles count as colliding.
#[inline]
pub fn radius_overlap(a: &Body, b: &Body) -> bool {
    let d_squared = a.position().distance_squared(b.position());
    let r_sum = a.vertex_radius() + b.vertex_radius();
    d_squared <= r_sum * r_sum
}

/// Minimum overlap depth across all separating-axis candidates
///
/// Returns `None` as soon as one axis separates the polygons.
pub fn sat_min_overlap(a: &Body, b: &Body) -> Option<f64> {
    let a_vertices = a.vertices();
    let b_vertices = b.vertices();
    let mut min_overlap = f64::MAX;

    for polygon in [a_vertices, b_vertices] {
        let Some(&last) = polygon.last() else {
            continue;
        };
        let mut prev = last;
        for &vertex in polygon {
            let axis = edge_normal(vertex, prev);
            let a_proj = project(a_vertices, axis);
            let b_proj = project(b_vertices, axis);

            if !intervals_overlap(a_proj, b_proj) {
                return None;
            }

            min_overlap = min_overlap.min(overlap_depth(a_proj, b_proj));
            prev = vertex;
        }
    }

    Some(min_overlap)
}

/// Push `a` and `b` apart by half of `depth` each
///
/// The push runs along the line between the centers rather than the SAT
/// axis that produced `depth`, so a pair may still overlap slightly after
/// the correction.
pub fn remove_overlap(a: &mut Body, b: &mut Body, depth: f64) -> SimResult<()> {
    let d = unit_vector(a.position(), b.position(), "overlap removal")?;
    let half: DVec2 = 0.5 * depth * d;
    a.set_position(a.position() - half);
    b.set_position(b.position() + half);
    Ok(())
}

/// SAT test, optionally separating the pair when it overlaps
pub fn sat_collided(a: &mut Body, b: &mut Body, mode: SatMode) -> SimResult<bool> {
    let Some(depth) = sat_min_overlap(a, b) else {
        return Ok(false);
    };

    if mode == SatMode::WithOverlapRemoval {
        remove_overlap(a, b, depth)?;
    }
    Ok(true)
}
