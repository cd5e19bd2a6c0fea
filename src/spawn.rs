//! Spawn placement
//!
//! A candidate cell is accepted when enough traversable cells around it are
//! actually reachable from it. Reachability is measured inside a square window
//! that grows one cell per step; each step re-scans the whole window and runs a
//! budgeted BFS from the candidate to every traversable cell in it.

use crate::error::{CaveError, Result};
use crate::grid::{Grid, Position};
use crate::nav_graph::{AllowedTiles, NavGraph};
use crate::pathfinding::find_path;
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tunables for spawn placement
#[derive(Debug, Clone)]
pub struct PlacementSettings {
    pub allowed: AllowedTiles,
    /// BFS budget for each reachability query
    pub max_iterations: usize,
    /// Random samples drawn before giving up
    pub max_attempts: usize,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        PlacementSettings {
            allowed: AllowedTiles::floor_only(),
            max_iterations: 1000,
            max_attempts: 10_000,
        }
    }
}

/// Why a sampled candidate was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    NotTraversable,
    /// The window grew to cover the whole grid and still counted too few tiles
    AreaTooSmall { reachable: usize },
}

/// Progress notifications emitted while placing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementEvent {
    CandidateRejected { position: Position, reason: RejectReason },
    AreaMeasured { position: Position, radius: i32, reachable: usize },
}

/// An accepted spawn point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Position,
    /// Samples drawn, including this one
    pub attempts: usize,
    /// Window radius at which the threshold was met
    pub radius: i32,
    /// Reachable tiles counted in that window
    pub reachable: usize,
}

pub struct SpawnPlacer<R: Rng> {
    rng: R,
    settings: PlacementSettings,
}

impl<R: Rng> SpawnPlacer<R> {
    pub fn new(rng: R, settings: PlacementSettings) -> Self {
        SpawnPlacer { rng, settings }
    }

    pub fn settings(&self) -> &PlacementSettings {
        &self.settings
    }

    /// Pick a random cell with at least `min_reachable_area` reachable tiles around it
    pub fn place_agent(
        &mut self,
        grid: &Grid,
        min_reachable_area: usize,
        min_sample_radius: i32,
    ) -> Result<Position> {
        self.place_agent_with_report(grid, min_reachable_area, min_sample_radius)
            .map(|placement| placement.position)
    }

    pub fn place_agent_with_report(
        &mut self,
        grid: &Grid,
        min_reachable_area: usize,
        min_sample_radius: i32,
    ) -> Result<Placement> {
        self.place_agent_observed(grid, min_reachable_area, min_sample_radius, |_| {})
    }

    /// Like [`SpawnPlacer::place_agent_with_report`], reporting every rejection
    /// and measurement to `observe`
    pub fn place_agent_observed<F: FnMut(PlacementEvent)>(
        &mut self,
        grid: &Grid,
        min_reachable_area: usize,
        min_sample_radius: i32,
        mut observe: F,
    ) -> Result<Placement> {
        let size = grid.size();
        let max_attempts = self.settings.max_attempts;
        if size == 0 {
            return Err(CaveError::NoSuitablePlacement {
                attempts: 0,
                min_area: min_reachable_area,
            });
        }

        let graph = NavGraph::new(grid, self.settings.allowed.clone());
        // Any centre's window covers the grid once the radius reaches size - 1
        let start_radius = min_sample_radius.clamp(1, (size - 1).max(1));

        for attempt in 1..=max_attempts {
            let candidate = Position::new(
                self.rng.random_range(0..size),
                self.rng.random_range(0..size),
            );

            if !graph.contains(candidate) {
                debug!("Candidate {} is not traversable, resampling", candidate);
                observe(PlacementEvent::CandidateRejected {
                    position: candidate,
                    reason: RejectReason::NotTraversable,
                });
                continue;
            }

            let mut radius = start_radius;
            loop {
                let reachable = count_reachable_around(
                    &graph,
                    candidate,
                    radius,
                    self.settings.max_iterations,
                )?;
                debug!(
                    "Free tiles around {} in area size {}: {}",
                    candidate, radius, reachable
                );
                observe(PlacementEvent::AreaMeasured {
                    position: candidate,
                    radius,
                    reachable,
                });

                if reachable >= min_reachable_area {
                    info!(
                        "Agent placed at {} after {} attempts ({} reachable tiles within radius {})",
                        candidate, attempt, reachable, radius
                    );
                    return Ok(Placement {
                        position: candidate,
                        attempts: attempt,
                        radius,
                        reachable,
                    });
                }

                if window_covers_grid(candidate, radius, size) {
                    debug!(
                        "Candidate {} tops out at {} reachable tiles, resampling",
                        candidate, reachable
                    );
                    observe(PlacementEvent::CandidateRejected {
                        position: candidate,
                        reason: RejectReason::AreaTooSmall { reachable },
                    });
                    break;
                }
                radius += 1;
            }
        }

        warn!(
            "No spawn point with {} reachable tiles after {} attempts",
            min_reachable_area, max_attempts
        );
        Err(CaveError::NoSuitablePlacement {
            attempts: max_attempts,
            min_area: min_reachable_area,
        })
    }

    /// Reachable-area score of `center` for a window of the given radius
    pub fn count_reachable_around(&self, grid: &Grid, center: Position, radius: i32) -> Result<usize> {
        let graph = NavGraph::new(grid, self.settings.allowed.clone());
        count_reachable_around(&graph, center, radius, self.settings.max_iterations)
    }
}

/// Count traversable cells in the `(2 * radius + 1)` square around `center`
/// that BFS reaches from `center` by a path of at least two cells.
/// `center` itself never counts.
pub fn count_reachable_around(
    graph: &NavGraph<'_>,
    center: Position,
    radius: i32,
    max_iterations: usize,
) -> Result<usize> {
    if !graph.contains(center) {
        return Err(CaveError::InvalidEndpoint {
            x: center.x,
            y: center.y,
        });
    }

    let last = graph.grid().size() - 1;
    let (min_x, max_x) = window_span(center.x, radius, last);
    let (min_y, max_y) = window_span(center.y, radius, last);

    let mut free_tiles = 0;
    for x in min_x..=max_x {
        for y in min_y..=max_y {
            let target = Position::new(x, y);
            if !graph.contains(target) {
                continue;
            }
            let path = find_path(graph, center, target, max_iterations)?;
            if path.len() >= 2 {
                free_tiles += 1;
            }
        }
    }
    Ok(free_tiles)
}

/// Window bounds along one axis, clipped to `0..=last`
fn window_span(center: i32, radius: i32, last: i32) -> (i32, i32) {
    (
        center.saturating_sub(radius).max(0),
        center.saturating_add(radius).min(last),
    )
}

/// Whether the window of `radius` around `center` reaches every edge of the grid
fn window_covers_grid(center: Position, radius: i32, size: i32) -> bool {
    center.x.saturating_sub(radius) <= 0
        && center.y.saturating_sub(radius) <= 0
        && center.x.saturating_add(radius) >= size - 1
        && center.y.saturating_add(radius) >= size - 1
}
