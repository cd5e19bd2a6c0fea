use crate::error::{CaveError, Result};
use crate::grid::CellState;
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Parameters of a single cave generation run
/// Validated on construction and never mutated afterwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    fill_percent: f64,
    grid_size: i32,
    smoothing_steps: u32,
    solid_border: bool,
}

impl GenerationConfig {
    pub fn new(fill_percent: f64, grid_size: i32, smoothing_steps: u32) -> Result<Self> {
        if !(0.0..=1.0).contains(&fill_percent) {
            return Err(CaveError::InvalidConfig(format!(
                "fill percent {} is outside [0, 1]",
                fill_percent
            )));
        }
        if grid_size <= 0 {
            return Err(CaveError::InvalidConfig(format!(
                "grid size must be positive, got {}",
                grid_size
            )));
        }
        // Cell indices are i32, so the whole grid must be addressable
        if grid_size.checked_mul(grid_size).is_none() {
            return Err(CaveError::InvalidConfig(format!(
                "grid size {} is too large, {}x{} cells overflow",
                grid_size, grid_size, grid_size
            )));
        }

        Ok(GenerationConfig {
            fill_percent,
            grid_size,
            smoothing_steps,
            solid_border: false,
        })
    }

    /// Force every border cell to wall when the map is randomized
    pub fn with_solid_border(mut self, solid_border: bool) -> Self {
        self.solid_border = solid_border;
        self
    }

    pub fn fill_percent(&self) -> f64 {
        self.fill_percent
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    pub fn smoothing_steps(&self) -> u32 {
        self.smoothing_steps
    }

    pub fn solid_border(&self) -> bool {
        self.solid_border
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationSection,
    #[serde(default)]
    pub placement: PlacementSection,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GenerationSection {
    #[serde(default = "default_fill_percent")]
    pub fill_percent: f64,
    #[serde(default = "default_grid_size")]
    pub grid_size: i32,
    #[serde(default = "default_smoothing_steps")]
    pub smoothing_steps: u32,
    #[serde(default)]
    pub solid_border: bool,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

#[derive(Debug, Deserialize)]
pub struct PlacementSection {
    #[serde(default = "default_min_reachable_area")]
    pub min_reachable_area: usize,
    #[serde(default = "default_min_sample_radius")]
    pub min_sample_radius: i32,
    /// BFS gives up on a single path query after this many expansions
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_allowed_tiles")]
    pub allowed_tiles: Vec<CellState>,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    /// Seconds between smoothing passes
    #[serde(default = "default_pause_time")]
    pub pause_time: f64,
    #[serde(default = "default_wall_color")]
    pub wall_color: [u8; 3],
    #[serde(default = "default_floor_color")]
    pub floor_color: [u8; 3],
    #[serde(default = "default_agent_color")]
    pub agent_color: [u8; 3],
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enable_run_log")]
    pub enable_run_log: bool,
    #[serde(default = "default_run_log_path")]
    pub run_log_path: String,
}

// Default values
fn default_fill_percent() -> f64 { 0.5 }
fn default_grid_size() -> i32 { 100 }
fn default_smoothing_steps() -> u32 { 20 }
fn default_seed() -> u64 { 100 }
fn default_min_reachable_area() -> usize { 100 }
fn default_min_sample_radius() -> i32 { 1 }
fn default_max_iterations() -> usize { 1000 }
fn default_max_attempts() -> usize { 10_000 }
fn default_allowed_tiles() -> Vec<CellState> { vec![CellState::Floor] }
fn default_window_title() -> String { "Cave Generator".to_string() }
fn default_pause_time() -> f64 { 1.0 }
fn default_wall_color() -> [u8; 3] { [70, 55, 45] }
fn default_floor_color() -> [u8; 3] { [200, 190, 160] }
fn default_agent_color() -> [u8; 3] { [40, 120, 220] }
fn default_enable_run_log() -> bool { true }
fn default_run_log_path() -> String { "run_log.json".to_string() }

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            fill_percent: default_fill_percent(),
            grid_size: default_grid_size(),
            smoothing_steps: default_smoothing_steps(),
            solid_border: false,
            seed: default_seed(),
        }
    }
}

impl Default for PlacementSection {
    fn default() -> Self {
        Self {
            min_reachable_area: default_min_reachable_area(),
            min_sample_radius: default_min_sample_radius(),
            max_iterations: default_max_iterations(),
            max_attempts: default_max_attempts(),
            allowed_tiles: default_allowed_tiles(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            pause_time: default_pause_time(),
            wall_color: default_wall_color(),
            floor_color: default_floor_color(),
            agent_color: default_agent_color(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_run_log: default_enable_run_log(),
            run_log_path: default_run_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation: GenerationSection::default(),
            placement: PlacementSection::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from config.toml, or use defaults if the file doesn't exist
    pub fn load() -> Self {
        Self::load_from(Path::new("config.toml"))
    }

    /// Load configuration from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    warn!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                info!("No {} found, using default configuration", path.display());
                Config::default()
            }
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| CaveError::InvalidConfig(e.to_string()))
    }

    /// Validated generation parameters
    pub fn generation_config(&self) -> Result<GenerationConfig> {
        let generation = &self.generation;
        Ok(GenerationConfig::new(
            generation.fill_percent,
            generation.grid_size,
            generation.smoothing_steps,
        )?
        .with_solid_border(generation.solid_border))
    }
}
