//! Cellular-automaton cave generator
//!
//! The generator is driven one step at a time by its caller: one call to
//! [`CaveGenerator::randomize_map`], then one [`CaveGenerator::smooth_map`]
//! per pass. It has no notion of time, so a visualizer can render the grid
//! between passes.

use crate::config::GenerationConfig;
use crate::grid::{CellState, Grid};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Wall-neighbour count above which a cell becomes wall, and below which it becomes floor
const MAJORITY_THRESHOLD: usize = 4;

/// Where a generator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Uninitialized,
    Filled,
    /// `k` smoothing passes applied, `0 < k < S`
    Smoothing(u32),
    /// All configured passes applied
    Stable,
}

pub struct CaveGenerator {
    config: GenerationConfig,
    rng: StdRng,
    map: Grid,
    /// Back buffer written by each pass, then swapped with `map`
    scratch: Grid,
    state: GeneratorState,
    passes: u32,
}

impl CaveGenerator {
    /// Create a generator whose random fill is driven by `seed`
    pub fn new(config: GenerationConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: GenerationConfig, rng: StdRng) -> Self {
        let size = config.grid_size();
        CaveGenerator {
            config,
            rng,
            map: Grid::new(size),
            scratch: Grid::new(size),
            state: GeneratorState::Uninitialized,
            passes: 0,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Number of smoothing passes applied since the last randomize
    pub fn passes_applied(&self) -> u32 {
        self.passes
    }

    pub fn is_stable(&self) -> bool {
        self.state == GeneratorState::Stable
    }

    /// Fill the map randomly with the configured wall probability
    /// Calling this again starts a fresh map from the current random stream.
    pub fn randomize_map(&mut self) {
        self.map.randomize(
            self.config.fill_percent(),
            self.config.solid_border(),
            &mut self.rng,
        );
        self.passes = 0;
        self.state = if self.config.smoothing_steps() == 0 {
            GeneratorState::Stable
        } else {
            GeneratorState::Filled
        };
        debug!(
            "Randomized {}x{} map: {} walls",
            self.map.size(),
            self.map.size(),
            self.map.count(CellState::Wall)
        );
    }

    /// Apply one smoothing pass and return how many cells changed
    /// Once all configured passes have run, further calls leave the map alone.
    pub fn smooth_map(&mut self) -> usize {
        if self.is_stable() {
            debug!("Map already stable after {} passes, skipping", self.passes);
            return 0;
        }

        let changed = smooth_pass(&self.map, &mut self.scratch);
        std::mem::swap(&mut self.map, &mut self.scratch);
        self.passes += 1;

        self.state = if self.passes >= self.config.smoothing_steps() {
            GeneratorState::Stable
        } else {
            GeneratorState::Smoothing(self.passes)
        };
        debug!(
            "Smoothing pass {}/{}: {} cells changed",
            self.passes,
            self.config.smoothing_steps(),
            changed
        );
        changed
    }

    /// Current map
    pub fn get_map(&self) -> &Grid {
        &self.map
    }
}

/// One cellular-automaton pass from `src` into `dst`
///
/// Every cell of `dst` is computed from `src` alone, so the result does not
/// depend on iteration order. A cell with more than 4 wall neighbours becomes
/// wall, fewer than 4 becomes floor, exactly 4 keeps its state.
/// Returns the number of cells whose state differs between `src` and `dst`.
pub fn smooth_pass(src: &Grid, dst: &mut Grid) -> usize {
    if dst.size() != src.size() {
        *dst = Grid::new(src.size());
    }

    let mut changed = 0;
    let cells = dst.cells_mut();
    for (id, (pos, old)) in src.iter().enumerate() {
        let walls = src.count_wall_neighbors(pos.x, pos.y);
        let new = if walls > MAJORITY_THRESHOLD {
            CellState::Wall
        } else if walls < MAJORITY_THRESHOLD {
            CellState::Floor
        } else {
            old
        };
        if new != old {
            changed += 1;
        }
        cells[id] = new;
    }

    dst.follow_revision(src.revision());
    changed
}
