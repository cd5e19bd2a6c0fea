use crate::grid::{CellState, Grid, Position};

/// Neighbour enumeration for breadth-first search
pub trait Graph {
    /// Whether `node` exists in the graph and may be stood on
    fn is_passable(&self, node: Position) -> bool;

    /// Append passable neighbours of `node` into `buf`. The caller clears `buf` before calling.
    fn neighbors(&self, node: Position, buf: &mut Vec<Position>);
}

/// Cell states an agent may walk on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedTiles {
    states: Vec<CellState>,
}

impl AllowedTiles {
    pub fn new(states: &[CellState]) -> Self {
        let mut unique: Vec<CellState> = Vec::with_capacity(states.len());
        for &state in states {
            if !unique.contains(&state) {
                unique.push(state);
            }
        }
        AllowedTiles { states: unique }
    }

    pub fn floor_only() -> Self {
        Self::new(&[CellState::Floor])
    }

    pub fn contains(&self, state: CellState) -> bool {
        self.states.contains(&state)
    }
}

impl Default for AllowedTiles {
    fn default() -> Self {
        Self::floor_only()
    }
}

/// Canonical neighbour order: north, east, south, west
const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// 4-connected view over a grid
/// Adjacency is read from the grid on every query, never cached.
pub struct NavGraph<'a> {
    grid: &'a Grid,
    allowed: AllowedTiles,
}

impl<'a> NavGraph<'a> {
    pub fn new(grid: &'a Grid, allowed: AllowedTiles) -> Self {
        NavGraph { grid, allowed }
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    /// In bounds and of an allowed state
    pub fn contains(&self, pos: Position) -> bool {
        self.grid
            .get(pos.x, pos.y)
            .map(|state| self.allowed.contains(state))
            .unwrap_or(false)
    }

    /// Passable cardinal neighbours of `pos`, in north, east, south, west order
    pub fn neighbors_of(&self, pos: Position) -> Vec<Position> {
        let mut buf = Vec::with_capacity(4);
        self.neighbors(pos, &mut buf);
        buf
    }
}

impl Graph for NavGraph<'_> {
    fn is_passable(&self, node: Position) -> bool {
        self.contains(node)
    }

    fn neighbors(&self, node: Position, buf: &mut Vec<Position>) {
        for (dx, dy) in CARDINALS {
            let next = Position::new(node.x + dx, node.y + dy);
            if self.contains(next) {
                buf.push(next);
            }
        }
    }
}
