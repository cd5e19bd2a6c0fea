#![allow(dead_code)]

use cavegen::{CellState, Grid, Position};
use std::collections::HashMap;

/// Visualize a path on a grid
/// - S: start
/// - D: destination
/// - *: path
/// - █: wall
/// - .: floor
pub fn visualize_path(grid: &Grid, path: &[Position]) -> String {
    let mut result = String::new();
    let start = path.first().copied();
    let dest = path.last().copied();

    result.push_str(&format!("\nPath: {}\n", cavegen::pathfinding::format_path(path)));
    result.push_str(&format!("Length: {} cells\n\n", path.len()));

    for y in 0..grid.size() {
        for x in 0..grid.size() {
            let pos = Position::new(x, y);
            let symbol = if Some(pos) == start {
                'S'
            } else if Some(pos) == dest {
                'D'
            } else if path.contains(&pos) {
                '*'
            } else if grid.get(x, y) == Ok(CellState::Wall) {
                '█'
            } else {
                '.'
            };
            result.push(symbol);
        }
        result.push('\n');
    }

    result
}

/// Check that `path` walks from `start` to `goal` over floor cells in single cardinal steps
pub fn assert_valid_path(grid: &Grid, path: &[Position], start: Position, goal: Position) {
    assert!(!path.is_empty(), "Path should not be empty");
    assert_eq!(path[0], start, "Path should begin at start");
    assert_eq!(*path.last().unwrap(), goal, "Path should end at goal");

    for pos in path {
        assert_eq!(
            grid.get(pos.x, pos.y),
            Ok(CellState::Floor),
            "Path crosses non-floor cell {}",
            pos
        );
    }
    for pair in path.windows(2) {
        assert_eq!(
            pair[0].manhattan(&pair[1]),
            1,
            "Step {} -> {} is not a single cardinal move",
            pair[0],
            pair[1]
        );
    }
}

/// Step distances from `start` to every floor cell it connects to, by repeated relaxation
/// Independent of the BFS under test.
pub fn reference_distances(grid: &Grid, start: Position) -> HashMap<Position, usize> {
    let mut dist: HashMap<Position, usize> = HashMap::new();
    dist.insert(start, 0);

    let mut changed = true;
    while changed {
        changed = false;
        for (pos, state) in grid.iter() {
            if state != CellState::Floor {
                continue;
            }
            let best_neighbor = [(0, -1), (1, 0), (0, 1), (-1, 0)]
                .iter()
                .filter_map(|(dx, dy)| dist.get(&Position::new(pos.x + dx, pos.y + dy)))
                .min()
                .copied();
            if let Some(d) = best_neighbor {
                let candidate = d + 1;
                let current = dist.get(&pos).copied().unwrap_or(usize::MAX);
                if candidate < current {
                    dist.insert(pos, candidate);
                    changed = true;
                }
            }
        }
    }

    dist
}

/// Walls among cells on the outer ring, and walls among the rest
pub fn border_and_interior_wall_ratio(grid: &Grid) -> (f64, f64) {
    let last = grid.size() - 1;
    let (mut border, mut border_walls, mut interior, mut interior_walls) = (0, 0, 0, 0);
    for (pos, state) in grid.iter() {
        let on_border = pos.x == 0 || pos.y == 0 || pos.x == last || pos.y == last;
        let wall = state == CellState::Wall;
        if on_border {
            border += 1;
            border_walls += wall as usize;
        } else {
            interior += 1;
            interior_walls += wall as usize;
        }
    }
    (
        border_walls as f64 / border as f64,
        interior_walls as f64 / interior as f64,
    )
}
