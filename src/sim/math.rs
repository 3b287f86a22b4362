//! 2D vector helpers for the collision pipeline
//!
//! Thin free functions over `glam::DVec2` so the narrow phase and contact
//! code read the same way the formulas are written.

use glam::DVec2;

use crate::consts::DEGENERATE_EPSILON;
use crate::error::{SimError, SimResult};

/// Scalar range of a polygon projected onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min: f64,
    pub max: f64,
}

impl Projection {
    /// Empty projection that any value will widen
    pub const EMPTY: Self = Self {
        min: f64::MAX,
        max: f64::MIN,
    };
}

#[inline]
pub fn dot(a: DVec2, b: DVec2) -> f64 {
    a.dot(b)
}

/// 2D scalar cross product `a.x * b.y - a.y * b.x`
#[inline]
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b)
}

/// Unit normal of the edge `a -> b`, rotated a quarter turn counter-clockwise
///
/// Callers pass the vertices of a valid polygon, whose edges are never zero length.
#[inline]
pub fn edge_normal(a: DVec2, b: DVec2) -> DVec2 {
    let d = b - a;
    DVec2::new(-d.y, d.x) / d.length()
}

/// Project every vertex onto `axis`
pub fn project(vertices: &[DVec2], axis: DVec2) -> Projection {
    vertices.iter().fold(Projection::EMPTY, |proj, &v| {
        let length = dot(v, axis);
        Projection {
            min: proj.min.min(length),
            max: proj.max.max(length),
        }
    })
}

/// True unless one interval ends strictly before the other starts
#[inline]
pub fn intervals_overlap(p: Projection, q: Projection) -> bool {
    !(p.max < q.min || q.max < p.min)
}

/// Length of the shared part of two overlapping intervals
#[inline]
pub fn overlap_depth(p: Projection, q: Projection) -> f64 {
    p.max.min(q.max) - p.min.max(q.min)
}

/// Unit vector pointing from `from` to `to`
pub fn unit_vector(from: DVec2, to: DVec2, context: &'static str) -> SimResult<DVec2> {
    let d = to - from;
    let length = d.length();
    if !(length > DEGENERATE_EPSILON) {
        return Err(SimError::DegenerateGeometry { context });
    }
    Ok(d / length)
}

/// Index of the vertex with the smallest `metric` (first one wins ties)
///
/// Shared by deepest-vertex detection and the wall handler; `vertices` must
/// not be empty.
pub fn closest_vertex(vertices: &[DVec2], metric: impl Fn(DVec2) -> f64) -> usize {
    let mut closest = 0;
    let mut best = f64::MAX;
    for (i, &v) in vertices.iter().enumerate() {
        let d = metric(v);
        if d < best {
            closest = i;
            best = d;
        }
    }
    closest
}
