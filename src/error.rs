use thiserror::Error;

/// Errors produced by grid access, search and spawn placement
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaveError {
    #[error("cell ({x}, {y}) is outside the {size}x{size} grid")]
    OutOfBounds { x: i32, y: i32, size: i32 },

    #[error("path endpoint ({x}, {y}) is out of bounds or not traversable")]
    InvalidEndpoint { x: i32, y: i32 },

    #[error("no spawn point with {min_area} reachable tiles found after {attempts} attempts")]
    NoSuitablePlacement { attempts: usize, min_area: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed grid text: {0}")]
    MalformedGrid(String),
}

pub type Result<T> = std::result::Result<T, CaveError>;
