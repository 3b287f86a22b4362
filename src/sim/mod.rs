//! Deterministic collision simulation
//!
//! All physics lives here. This module must stay pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only (scene layout)
//! - Stable iteration order (by body index)
//! - No rendering or platform dependencies

pub mod body;
pub mod contact;
pub mod grid;
pub mod math;
pub mod narrow;
pub mod step;
pub mod wall;
pub mod world;

pub use body::{Body, BodyState};
pub use contact::{ContactData, PairOutcome, apply_impulse, contact_data, resolve_pair};
pub use grid::SpatialGrid;
pub use math::Projection;
pub use narrow::{SatMode, radius_overlap, remove_overlap, sat_collided, sat_min_overlap};
pub use step::{StepSummary, resolve_collisions, step};
pub use wall::{Bounds, Wall, WallHits, handle_walls};
pub use world::World;
