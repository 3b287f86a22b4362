//! One simulation step
//!
//! Fixed order: bucket bodies into the grid, resolve every candidate pair
//! cell by cell, then for each body handle walls and integrate. Changes made
//! while resolving a pair are visible to every later pair in the same step.

use std::ops::AddAssign;

use super::body::Body;
use super::contact::{PairOutcome, resolve_pair};
use super::grid::SpatialGrid;
use super::wall::{Bounds, handle_walls};

/// What happened during a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepSummary {
    /// Pairs that shared a grid cell
    pub candidate_pairs: usize,
    /// Pairs dropped by the radius or SAT test
    pub rejected: usize,
    /// Pairs that received an impulse
    pub resolved: usize,
    /// Pairs already resolved earlier in the step (seen in another cell)
    pub skipped: usize,
    /// Pairs dropped because their geometry could not be normalized
    pub degenerate: usize,
    /// Individual wall bounces
    pub wall_hits: usize,
}

impl AddAssign for StepSummary {
    fn add_assign(&mut self, other: Self) {
        self.candidate_pairs += other.candidate_pairs;
        self.rejected += other.rejected;
        self.resolved += other.resolved;
        self.skipped += other.skipped;
        self.degenerate += other.degenerate;
        self.wall_hits += other.wall_hits;
    }
}

/// Borrow two distinct bodies mutably
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert!(i < j);
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Test every pair inside one bucket
///
/// Buckets are filled in body order, so indices within a cell ascend.
fn resolve_cell(bodies: &mut [Body], cell: &[usize], summary: &mut StepSummary) {
    for (n, &i) in cell.iter().enumerate() {
        for &j in &cell[n + 1..] {
            summary.candidate_pairs += 1;
            let (a, b) = pair_mut(bodies, i, j);

            match resolve_pair(a, b) {
                Ok(PairOutcome::Rejected) => summary.rejected += 1,
                Ok(PairOutcome::Skipped) => summary.skipped += 1,
                Ok(PairOutcome::Resolved) => summary.resolved += 1,
                Err(e) => {
                    log::warn!("Dropping pair {}/{}: {}", a.id(), b.id(), e);
                    summary.degenerate += 1;
                }
            }
        }
    }
}

/// Resolve every candidate pair found by the grid
pub fn resolve_collisions(bodies: &mut [Body], grid: &mut SpatialGrid) -> StepSummary {
    let mut summary = StepSummary::default();
    grid.partition(bodies);
    for cell in grid.cells() {
        if cell.len() > 1 {
            resolve_cell(bodies, cell, &mut summary);
        }
    }
    grid.clear();
    summary
}

/// Advance `bodies` by `dt`
pub fn step(bodies: &mut [Body], grid: &mut SpatialGrid, bounds: &Bounds, dt: f64) -> StepSummary {
    let mut summary = resolve_collisions(bodies, grid);

    for body in bodies.iter_mut() {
        summary.wall_hits += handle_walls(body, bounds).count();
        body.integrate(dt);
    }

    log::trace!("{summary:?}");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn body(id: u32, x: f64, y: f64, v: DVec2) -> Body {
        let mut body = Body::new(id, 10.0, 4, 1.0).unwrap();
        body.set_position(DVec2::new(x, y));
        body.set_velocity(v, 0.0);
        body
    }

    #[test]
    fn test_pair_mut_borrows_both() {
        let mut bodies = vec![
            body(0, 0.0, 0.0, DVec2::ZERO),
            body(1, 1.0, 0.0, DVec2::ZERO),
            body(2, 2.0, 0.0, DVec2::ZERO),
        ];
        let (a, b) = pair_mut(&mut bodies, 0, 2);
        assert_eq!((a.id(), b.id()), (0, 2));
    }

    #[test]
    fn test_summaries_accumulate_every_counter() {
        let mut totals = StepSummary::default();
        let summary = StepSummary {
            candidate_pairs: 6,
            rejected: 1,
            resolved: 2,
            skipped: 3,
            degenerate: 4,
            wall_hits: 5,
        };
        totals += summary;
        totals += summary;
        assert_eq!(
            totals,
            StepSummary {
                candidate_pairs: 12,
                rejected: 2,
                resolved: 4,
                skipped: 6,
                degenerate: 8,
                wall_hits: 10,
            }
        );
    }

    #[test]
    fn test_free_body_moves_by_velocity() {
        let mut bodies = vec![body(0, 500.0, 400.0, DVec2::new(60.0, -30.0))];
        let mut grid = SpatialGrid::new(1000.0, 800.0, 3, 3).unwrap();
        let bounds = Bounds::new(1000.0, 800.0);

        let summary = step(&mut bodies, &mut grid, &bounds, 0.5);

        assert_eq!(summary, StepSummary::default());
        assert_eq!(bodies[0].position(), DVec2::new(530.0, 385.0));
    }

    #[test]
    fn test_pair_straddling_cells_resolves_once() {
        // Both bodies straddle the column border at x = 500, so they share two cells
        let mut bodies = vec![
            body(0, 495.0, 200.0, DVec2::new(10.0, 0.0)),
            body(1, 508.0, 200.0, DVec2::new(-10.0, 0.0)),
        ];
        let mut grid = SpatialGrid::new(1000.0, 800.0, 2, 1).unwrap();
        let bounds = Bounds::new(1000.0, 800.0);

        let summary = step(&mut bodies, &mut grid, &bounds, 1.0 / 60.0);

        assert_eq!(summary.candidate_pairs, 2);
        assert_eq!(summary.resolved, 1);
        assert_eq!(summary.resolved + summary.skipped + summary.rejected, 2);
        // Memo is cleared by integration
        assert!(!bodies[0].has_collided_with(1));
    }

    #[test]
    fn test_coincident_bodies_are_reported_not_fatal() {
        let mut bodies = vec![
            body(0, 300.0, 300.0, DVec2::ZERO),
            body(1, 300.0, 300.0, DVec2::ZERO),
        ];
        let mut grid = SpatialGrid::new(1000.0, 800.0, 3, 3).unwrap();
        let bounds = Bounds::new(1000.0, 800.0);

        let summary = step(&mut bodies, &mut grid, &bounds, 1.0 / 60.0);

        assert_eq!(summary.degenerate, 1);
        assert_eq!(summary.resolved, 0);
    }

    #[test]
    fn test_walls_run_after_collisions() {
        let mut bodies = vec![body(0, 5.0, 400.0, DVec2::new(-50.0, 0.0))];
        let mut grid = SpatialGrid::new(1000.0, 800.0, 3, 3).unwrap();
        let bounds = Bounds::new(1000.0, 800.0);

        let summary = step(&mut bodies, &mut grid, &bounds, 0.1);

        assert_eq!(summary.wall_hits, 1);
        assert!(bodies[0].linear_velocity().x > 0.0);
        assert!(bodies[0].position().x > 10.0);
    }
}
