//! Colliding Polygons 2D - rigid-body collision core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, grid, narrow phase, contacts, walls)
//! - `config`: Simulation settings loaded from JSON
//! - `error`: Crate-wide error type

pub mod config;
pub mod error;
pub mod sim;

pub use config::SimConfig;
pub use error::{SimError, SimResult};

use glam::DVec2;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Default arena dimensions
    pub const DEFAULT_WIDTH: u32 = 1000;
    pub const DEFAULT_HEIGHT: u32 = 800;

    /// Default broad-phase grid
    pub const DEFAULT_GRID_COLUMNS: u32 = 3;
    pub const DEFAULT_GRID_ROWS: u32 = 3;

    /// Coefficient of restitution (1.0 = perfectly elastic)
    pub const RESTITUTION: f64 = 1.0;

    /// Default body density (mass per unit area)
    pub const DEFAULT_DENSITY: f64 = 1.0;

    /// Vectors shorter than this cannot be normalized
    pub const DEGENERATE_EPSILON: f64 = 1e-9;

    /// Scale of the virtual target placed beyond a wall, in units of width * height
    pub const WALL_TARGET_SCALE: f64 = 10.0;
}

/// Kinetic energy of a body with the given mass properties
#[inline]
pub fn kinetic_energy(mass: f64, inertia: f64, linear: DVec2, angular: f64) -> f64 {
    0.5 * mass * linear.length_squared() + 0.5 * inertia * angular * angular
}

/// Velocity of a point offset by `r` from the center of a body
/// moving with `linear` and spinning with `angular`
#[inline]
pub fn point_velocity(linear: DVec2, angular: f64, r: DVec2) -> DVec2 {
    DVec2::new(linear.x - angular * r.y, linear.y + angular * r.x)
}
