//! Simulation world: bodies, arena, broad-phase grid
//!
//! Owns everything a step needs. The initial scene is a lattice of bodies
//! with seeded random size, shape, velocity and color, so the same config
//! always produces the same run.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyState};
use super::grid::SpatialGrid;
use super::step::{StepSummary, step};
use super::wall::Bounds;
use crate::config::SimConfig;
use crate::error::{SimError, SimResult};

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    config: SimConfig,
    bounds: Bounds,
    grid: SpatialGrid,
    bodies: Vec<Body>,
    steps: u64,
}

/// Serialized form of a [`World`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    config: SimConfig,
    steps: u64,
    bodies: Vec<BodyState>,
}

impl World {
    /// Build a world and lay out its initial bodies
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let mut world = Self::empty(config)?;
        world.spawn_lattice()?;
        log::info!(
            "World {}x{} seeded with {} ({} bodies, {}x{} grid)",
            world.config.width,
            world.config.height,
            world.config.seed,
            world.bodies.len(),
            world.config.grid_columns,
            world.config.grid_rows
        );
        Ok(world)
    }

    /// A world with bounds and grid but no bodies
    pub fn empty(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let bounds = Bounds::new(config.width as f64, config.height as f64);
        let grid = SpatialGrid::new(
            bounds.width,
            bounds.height,
            config.grid_columns as usize,
            config.grid_rows as usize,
        )?;
        Ok(Self {
            config,
            bounds,
            grid,
            bodies: Vec::new(),
            steps: 0,
        })
    }

    /// Place `body_columns x body_rows` bodies evenly across the arena
    fn spawn_lattice(&mut self) -> SimResult<()> {
        let mut rng = Pcg32::seed_from_u64(self.config.seed);
        let k = self.config.layout_unit();
        let (columns, rows) = (self.config.body_columns, self.config.body_rows);
        let (radius, corners, velocity) = (
            self.config.radius_range,
            self.config.corner_range,
            self.config.velocity_range,
        );

        for i in 0..columns {
            for j in 0..rows {
                let r = k * rng.random_range(radius.min..=radius.max) as f64;
                let n = rng.random_range(corners.min..=corners.max) as u32;
                let pos = DVec2::new(
                    self.bounds.width * (i + 1) as f64 / (columns + 1) as f64,
                    self.bounds.height * (j + 1) as f64 / (rows + 1) as f64,
                );
                let vel = DVec2::new(
                    k * rng.random_range(velocity.min..=velocity.max) as f64,
                    k * rng.random_range(velocity.min..=velocity.max) as f64,
                );

                let id = self.spawn(r, n, pos, vel)?;
                if let Some(body) = self.body_mut(id) {
                    body.color = [rng.random(), rng.random(), rng.random()];
                }
            }
        }
        Ok(())
    }

    /// Add a body; its id is its index
    pub fn spawn(&mut self, radius: f64, corners: u32, pos: DVec2, vel: DVec2) -> SimResult<u32> {
        let id = self.bodies.len() as u32;
        let mut body = Body::new(id, radius, corners, self.config.density)?;
        body.set_position(pos);
        body.set_velocity(vel, 0.0);
        self.bodies.push(body);
        Ok(id)
    }

    /// Advance the whole world by `dt`
    pub fn step(&mut self, dt: f64) -> StepSummary {
        let summary = step(&mut self.bodies, &mut self.grid, &self.bounds, dt);
        self.steps += 1;
        log::debug!(
            "Step {}: {} pairs, {} resolved, {} skipped, {} wall hits",
            self.steps,
            summary.candidate_pairs,
            summary.resolved,
            summary.skipped,
            summary.wall_hits
        );
        summary
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.bodies.get(id as usize)
    }

    pub fn body_mut(&mut self, id: u32) -> Option<&mut Body> {
        self.bodies.get_mut(id as usize)
    }

    /// Steps taken since creation
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Sum of `m * v` over all bodies
    pub fn total_momentum(&self) -> DVec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    /// Sum of linear and rotational kinetic energy over all bodies
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Serialize bodies and config to JSON
    pub fn to_json(&self) -> SimResult<String> {
        let snapshot = Snapshot {
            config: self.config.clone(),
            steps: self.steps,
            bodies: self.bodies.iter().map(Body::state).collect(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Restore a world saved with [`World::to_json`]
    ///
    /// Every body is rebuilt through [`Body::new`], and ids must still equal
    /// their index since the collision memo and [`World::body`] rely on it.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let mut world = Self::empty(snapshot.config)?;
        world.steps = snapshot.steps;
        world.bodies.reserve(snapshot.bodies.len());
        for (index, state) in snapshot.bodies.iter().enumerate() {
            if state.id as usize != index {
                return Err(SimError::InvalidBody {
                    reason: "snapshot body id does not match its index",
                });
            }
            world
                .bodies
                .push(Body::from_state(state, world.config.density)?);
        }
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_lattice_layout() {
        let world = World::new(SimConfig::default()).unwrap();
        assert_eq!(world.bodies().len(), 9);

        let first = world.body(0).unwrap();
        assert_eq!(first.position(), DVec2::new(250.0, 200.0));
        assert!(first.vertex_radius() >= 50.0 && first.vertex_radius() <= 80.0);
        assert!((3..=6).contains(&first.corner_count()));
        assert_eq!(first.angular_velocity(), 0.0);

        for (index, body) in world.bodies().iter().enumerate() {
            assert_eq!(body.id() as usize, index);
        }
    }

    #[test]
    fn test_determinism() {
        let mut world1 = World::new(SimConfig::default()).unwrap();
        let mut world2 = World::new(SimConfig::default()).unwrap();

        for _ in 0..120 {
            assert_eq!(world1.step(SIM_DT), world2.step(SIM_DT));
        }

        for (a, b) in world1.bodies().iter().zip(world2.bodies()) {
            assert_eq!(a.position(), b.position());
            assert_eq!(a.linear_velocity(), b.linear_velocity());
            assert_eq!(a.angular_velocity(), b.angular_velocity());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = World::new(SimConfig::default()).unwrap();
        let b = World::new(SimConfig {
            seed: 1234,
            ..Default::default()
        })
        .unwrap();
        let differs = a
            .bodies()
            .iter()
            .zip(b.bodies())
            .any(|(x, y)| x.vertex_radius() != y.vertex_radius() || x.linear_velocity() != y.linear_velocity());
        assert!(differs);
    }

    #[test]
    fn test_walls_contain_bodies() {
        let config = SimConfig {
            body_columns: 5,
            body_rows: 5,
            radius_range: crate::config::IntRange::new(3, 5),
            ..Default::default()
        };
        let mut world = World::new(config).unwrap();
        let bounds = *world.bounds();

        for _ in 0..600 {
            world.step(SIM_DT);
            for body in world.bodies() {
                // Walls are enforced before integration, so vertices may drift
                // out by at most one step of motion
                let slack = (body.linear_velocity().length()
                    + body.angular_velocity().abs() * body.vertex_radius())
                    * SIM_DT
                    + 1e-6;
                for v in body.vertices() {
                    assert!(v.x >= -slack && v.x <= bounds.width + slack, "x = {}", v.x);
                    assert!(v.y >= -slack && v.y <= bounds.height + slack, "y = {}", v.y);
                }
            }
        }
    }

    #[test]
    fn test_empty_world_steps() {
        let mut world = World::empty(SimConfig::default()).unwrap();
        assert_eq!(world.step(SIM_DT), StepSummary::default());
        assert_eq!(world.steps(), 1);
        assert_eq!(world.total_momentum(), DVec2::ZERO);
    }

    #[test]
    fn test_head_on_spawned_pair_conserves_momentum() {
        let mut world = World::empty(SimConfig::default()).unwrap();
        world
            .spawn(10.0, 4, DVec2::new(400.0, 400.0), DVec2::new(5.0, 0.0))
            .unwrap();
        world
            .spawn(10.0, 4, DVec2::new(415.0, 400.0), DVec2::new(-5.0, 0.0))
            .unwrap();
        let before = world.total_momentum();
        let energy = world.kinetic_energy();

        let summary = world.step(SIM_DT);

        assert_eq!(summary.resolved, 1);
        assert!((world.total_momentum() - before).length() < 1e-9);
        assert!((world.kinetic_energy() - energy).abs() < 1e-9 * energy);
    }

    #[test]
    fn test_snapshot_restores_state() {
        let mut world = World::new(SimConfig::default()).unwrap();
        for _ in 0..30 {
            world.step(SIM_DT);
        }
        let json = world.to_json().unwrap();
        let mut restored = World::from_json(&json).unwrap();

        assert_eq!(restored.steps(), 30);
        assert_eq!(restored.bodies().len(), world.bodies().len());
        for (a, b) in world.bodies().iter().zip(restored.bodies()) {
            assert_eq!(a.position(), b.position());
            assert_eq!(a.color, b.color);
            assert_eq!(a.vertices().len(), b.vertices().len());
        }

        // Both continue identically
        assert_eq!(world.step(SIM_DT), restored.step(SIM_DT));
    }

    /// Saved two-body world with one field of body `index` overwritten
    fn corrupted_snapshot(index: usize, field: &str, value: serde_json::Value) -> String {
        let mut world = World::empty(SimConfig::default()).unwrap();
        world
            .spawn(10.0, 4, DVec2::new(200.0, 200.0), DVec2::ZERO)
            .unwrap();
        world
            .spawn(10.0, 5, DVec2::new(600.0, 400.0), DVec2::ZERO)
            .unwrap();
        let mut json: serde_json::Value = serde_json::from_str(&world.to_json().unwrap()).unwrap();
        json["bodies"][index][field] = value;
        json.to_string()
    }

    #[test]
    fn test_snapshot_rejects_invalid_bodies() {
        let zero_corners = corrupted_snapshot(1, "corner_count", serde_json::json!(0));
        assert!(matches!(
            World::from_json(&zero_corners),
            Err(SimError::InvalidBody { .. })
        ));

        let negative_radius = corrupted_snapshot(0, "vertex_radius", serde_json::json!(-5.0));
        assert!(matches!(
            World::from_json(&negative_radius),
            Err(SimError::InvalidBody { .. })
        ));
    }

    #[test]
    fn test_snapshot_rejects_mismatched_ids() {
        let duplicate = corrupted_snapshot(1, "id", serde_json::json!(0));
        assert!(matches!(
            World::from_json(&duplicate),
            Err(SimError::InvalidBody { .. })
        ));

        let out_of_range = corrupted_snapshot(0, "id", serde_json::json!(7));
        assert!(World::from_json(&out_of_range).is_err());
    }

    #[test]
    fn test_snapshot_rejects_malformed_json() {
        assert!(matches!(
            World::from_json("{\"config\": {}, \"steps\": 0"),
            Err(SimError::Serde(_))
        ));
    }
}
