//! One generate-then-place run, advanced a stage at a time
//!
//! The session owns no clock. A visualizer calls [`CaveSession::step`] once per
//! tick and renders [`CaveSession::grid`] in between.

use crate::config::Config;
use crate::error::{CaveError, Result};
use crate::generator::CaveGenerator;
use crate::grid::{CellState, Grid};
use crate::nav_graph::AllowedTiles;
use crate::run_log::{RunEvent, RunLog};
use crate::spawn::{Placement, PlacementSettings, SpawnPlacer};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Mixed into the run seed so spawn sampling does not replay the fill draws
const PLACEMENT_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed of the placement stream for a run seeded with `seed`
pub fn placement_seed(seed: u64) -> u64 {
    seed ^ PLACEMENT_SEED_MIX
}

/// What the last call to [`CaveSession::step`] did
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Randomized,
    Smoothed { pass: u32, changed: usize },
    Placed(Placement),
    Failed(CaveError),
    /// Nothing left to do
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Fresh,
    Smoothing,
    Placing,
    Finished,
}

pub struct CaveSession {
    seed: u64,
    generator: CaveGenerator,
    placer: SpawnPlacer<StdRng>,
    min_reachable_area: usize,
    min_sample_radius: i32,
    stage: Stage,
    placement: Option<Placement>,
    failure: Option<CaveError>,
    run_log: RunLog,
}

impl CaveSession {
    /// Session using the configured seed
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_seed(config, config.generation.seed)
    }

    /// Generation draws from a stream seeded with `seed`, placement from one
    /// seeded with [`placement_seed`]
    pub fn with_seed(config: &Config, seed: u64) -> Result<Self> {
        let generation = config.generation_config()?;
        let placement = &config.placement;
        let settings = PlacementSettings {
            allowed: AllowedTiles::new(&placement.allowed_tiles),
            max_iterations: placement.max_iterations,
            max_attempts: placement.max_attempts,
        };

        Ok(CaveSession {
            seed,
            generator: CaveGenerator::new(generation, seed),
            placer: SpawnPlacer::new(StdRng::seed_from_u64(placement_seed(seed)), settings),
            min_reachable_area: placement.min_reachable_area,
            min_sample_radius: placement.min_sample_radius,
            stage: Stage::Fresh,
            placement: None,
            failure: None,
            run_log: RunLog::new(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        self.generator.get_map()
    }

    pub fn generator(&self) -> &CaveGenerator {
        &self.generator
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    pub fn failure(&self) -> Option<&CaveError> {
        self.failure.as_ref()
    }

    pub fn run_log(&self) -> &RunLog {
        &self.run_log
    }

    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Finished
    }

    /// Advance by one stage: the random fill, a single smoothing pass, or the placement
    pub fn step(&mut self) -> SessionStatus {
        match self.stage {
            Stage::Fresh => {
                self.generator.randomize_map();
                let grid = self.generator.get_map();
                self.run_log.log(RunEvent::Randomized {
                    seed: self.seed,
                    size: grid.size(),
                    walls: grid.count(CellState::Wall),
                });
                self.stage = self.stage_after_fill();
                SessionStatus::Randomized
            }
            Stage::Smoothing => {
                let changed = self.generator.smooth_map();
                let pass = self.generator.passes_applied();
                self.run_log.log(RunEvent::Smoothed {
                    pass,
                    changed,
                    walls: self.generator.get_map().count(CellState::Wall),
                });
                if self.generator.is_stable() {
                    info!("Simulation completed after {} passes", pass);
                    self.stage = Stage::Placing;
                }
                SessionStatus::Smoothed { pass, changed }
            }
            Stage::Placing => {
                self.stage = Stage::Finished;
                self.place()
            }
            Stage::Finished => SessionStatus::Done,
        }
    }

    fn stage_after_fill(&self) -> Stage {
        if self.generator.is_stable() {
            Stage::Placing
        } else {
            Stage::Smoothing
        }
    }

    fn place(&mut self) -> SessionStatus {
        let run_log = &mut self.run_log;
        let result = self.placer.place_agent_observed(
            self.generator.get_map(),
            self.min_reachable_area,
            self.min_sample_radius,
            |event| run_log.log(event.into()),
        );

        match result {
            Ok(placement) => {
                self.run_log.log(RunEvent::AgentPlaced {
                    x: placement.position.x,
                    y: placement.position.y,
                    attempts: placement.attempts,
                });
                self.placement = Some(placement);
                SessionStatus::Placed(placement)
            }
            Err(e) => {
                if let CaveError::NoSuitablePlacement { attempts, .. } = e {
                    self.run_log.log(RunEvent::PlacementFailed { attempts });
                }
                self.failure = Some(e.clone());
                SessionStatus::Failed(e)
            }
        }
    }

    /// Step until the agent is placed or placement fails
    pub fn run_to_completion(&mut self) -> Result<Placement> {
        loop {
            match self.step() {
                SessionStatus::Placed(placement) => return Ok(placement),
                SessionStatus::Failed(e) => return Err(e),
                SessionStatus::Done => {
                    return match (&self.placement, &self.failure) {
                        (Some(placement), _) => Ok(*placement),
                        (None, Some(e)) => Err(e.clone()),
                        (None, None) => Err(CaveError::NoSuitablePlacement {
                            attempts: 0,
                            min_area: self.min_reachable_area,
                        }),
                    };
                }
                SessionStatus::Randomized | SessionStatus::Smoothed { .. } => {}
            }
        }
    }
}
