use crate::error::{CaveError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single cell
/// Values match the numeric map encoding: 0=floor, 1=wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    Floor = 0,
    Wall = 1,
}

impl CellState {
    /// Numeric map value of this state
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Symbol used by the text format
    pub fn symbol(self) -> char {
        match self {
            CellState::Wall => '■',
            CellState::Floor => '□',
        }
    }
}

/// A cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// 4-connected step distance, ignoring obstacles
    pub fn manhattan(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Square wall/floor grid, stored row-major
#[derive(Debug, Clone)]
pub struct Grid {
    size: i32,
    cells: Vec<CellState>,
    /// Revision number - incremented whenever grid cells change
    revision: u64,
}

impl Grid {
    /// Create a new grid with all cells set to floor
    pub fn new(size: i32) -> Self {
        Self::filled(size, CellState::Floor)
    }

    /// Create a grid with every cell in the given state
    pub fn filled(size: i32, state: CellState) -> Self {
        let size = size.max(0);
        Grid {
            size,
            cells: vec![state; size as usize * size as usize],
            revision: 0,
        }
    }

    /// Parse a grid from text rows
    /// Format:
    /// - ■ or #: wall
    /// - □ or .: floor
    ///
    /// The first non-empty row is y=0. Rows must form a square.
    pub fn from_text(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if rows.is_empty() {
            return Err(CaveError::MalformedGrid("no rows found".to_string()));
        }

        let size = rows.len() as i32;
        let mut grid = Grid::new(size);

        for (y, row) in rows.iter().enumerate() {
            let width = row.chars().count() as i32;
            if width != size {
                return Err(CaveError::MalformedGrid(format!(
                    "row {} has {} cells, expected {}",
                    y, width, size
                )));
            }

            for (x, ch) in row.chars().enumerate() {
                let state = match ch {
                    '■' | '#' => CellState::Wall,
                    '□' | '.' => CellState::Floor,
                    other => {
                        return Err(CaveError::MalformedGrid(format!(
                            "unexpected character '{}' at ({}, {})",
                            other, x, y
                        )))
                    }
                };
                let id = grid.index(x as i32, y as i32);
                grid.cells[id] = state;
            }
        }

        Ok(grid)
    }

    /// Side length of the grid
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Get current grid revision number
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.size && y >= 0 && y < self.size
    }

    fn index(&self, x: i32, y: i32) -> usize {
        x as usize + y as usize * self.size as usize
    }

    fn check_bounds(&self, x: i32, y: i32) -> Result<usize> {
        if self.in_bounds(x, y) {
            Ok(self.index(x, y))
        } else {
            Err(CaveError::OutOfBounds {
                x,
                y,
                size: self.size,
            })
        }
    }

    /// Get cell state at (x, y)
    pub fn get(&self, x: i32, y: i32) -> Result<CellState> {
        let id = self.check_bounds(x, y)?;
        Ok(self.cells[id])
    }

    /// Set cell state at (x, y)
    pub fn set(&mut self, x: i32, y: i32, state: CellState) -> Result<()> {
        let id = self.check_bounds(x, y)?;
        if self.cells[id] != state {
            self.cells[id] = state;
            self.revision += 1;
        }
        Ok(())
    }

    /// Cell state at (x, y), with anything outside the grid reading as wall
    pub fn state_or_wall(&self, x: i32, y: i32) -> CellState {
        if self.in_bounds(x, y) {
            self.cells[self.index(x, y)]
        } else {
            CellState::Wall
        }
    }

    /// Count walls among the 8 surrounding cells
    /// Out of bounds is considered wall, which keeps the cave closed at the edges
    pub fn count_wall_neighbors(&self, x: i32, y: i32) -> usize {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if self.state_or_wall(x + dx, y + dy) == CellState::Wall {
                    count += 1;
                }
            }
        }
        count
    }

    /// Fill every cell independently: wall with probability `fill_percent`, else floor.
    /// Cells are drawn in row-major order. With `solid_border` every edge cell
    /// is forced to wall afterwards; the random draw sequence is the same either way.
    pub fn randomize<R: Rng>(&mut self, fill_percent: f64, solid_border: bool, rng: &mut R) {
        let fill_percent = if fill_percent.is_nan() {
            0.0
        } else {
            fill_percent.clamp(0.0, 1.0)
        };
        for y in 0..self.size {
            for x in 0..self.size {
                let state = if rng.random_bool(fill_percent) {
                    CellState::Wall
                } else {
                    CellState::Floor
                };
                let id = self.index(x, y);
                self.cells[id] = state;
            }
        }

        if solid_border {
            let last = self.size - 1;
            for i in 0..self.size {
                for (x, y) in [(i, 0), (i, last), (0, i), (last, i)] {
                    let id = self.index(x, y);
                    self.cells[id] = CellState::Wall;
                }
            }
        }

        self.revision += 1;
    }

    /// Number of cells in the given state
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Iterate over every cell as (position, state), row by row
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellState)> + '_ {
        self.cells.iter().enumerate().map(move |(id, &state)| {
            let id = id as i32;
            (Position::new(id % self.size, id / self.size), state)
        })
    }

    /// Raw cell storage, used by the smoothing pass to write a whole buffer
    pub(crate) fn cells_mut(&mut self) -> &mut [CellState] {
        &mut self.cells
    }

    /// Mark this grid as the successor of a grid at revision `previous`
    pub(crate) fn follow_revision(&mut self, previous: u64) {
        self.revision = previous + 1;
    }

    /// Render the grid as text, one row per line
    pub fn to_text(&self) -> String {
        let side = self.size as usize;
        let mut result = String::with_capacity((side + 1) * side * 3);
        for y in 0..self.size {
            for x in 0..self.size {
                result.push(self.cells[self.index(x, y)].symbol());
            }
            result.push('\n');
        }
        result
    }
}

/// Grids compare by contents; the revision counter is bookkeeping
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.cells == other.cells
    }
}

impl Eq for Grid {}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
