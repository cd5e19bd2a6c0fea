pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod nav_graph;
pub mod pathfinding;
pub mod run_log;
pub mod session;
pub mod spawn;

pub use config::{Config, GenerationConfig};
pub use error::{CaveError, Result};
pub use generator::{CaveGenerator, GeneratorState};
pub use grid::{CellState, Grid, Position};
pub use nav_graph::{AllowedTiles, Graph, NavGraph};
pub use pathfinding::{find_path, search, SearchOutcome};
pub use session::{CaveSession, SessionStatus};
pub use spawn::{Placement, PlacementSettings, SpawnPlacer};
