use crate::error::{CaveError, Result};
use crate::grid::Position;
use crate::nav_graph::Graph;
use log::trace;
use std::collections::{HashMap, VecDeque};

/// Upper bound on up-front allocation for a single search
const MAX_PREALLOCATED_NODES: usize = 4096;

/// Result of a budgeted breadth-first search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Shortest path from start to goal, both inclusive
    Found(Vec<Position>),
    /// The whole component of `start` was explored without meeting the goal
    Unreachable,
    /// The iteration budget ran out first
    BudgetExhausted,
}

impl SearchOutcome {
    /// The path, or an empty path when none was found
    pub fn into_path(self) -> Vec<Position> {
        match self {
            SearchOutcome::Found(path) => path,
            SearchOutcome::Unreachable | SearchOutcome::BudgetExhausted => Vec::new(),
        }
    }
}

/// Shortest path from `start` to `goal`, or an empty path if the goal is
/// unreachable or the search used up `max_iterations` node expansions.
pub fn find_path<G: Graph>(
    graph: &G,
    start: Position,
    goal: Position,
    max_iterations: usize,
) -> Result<Vec<Position>> {
    Ok(search(graph, start, goal, max_iterations)?.into_path())
}

/// Breadth-first search that tells apart "unreachable" from "out of budget"
///
/// Every dequeued node counts as one iteration. Neighbours are visited in the
/// order the graph yields them, so for a fixed graph the chosen path is fixed too.
pub fn search<G: Graph>(
    graph: &G,
    start: Position,
    goal: Position,
    max_iterations: usize,
) -> Result<SearchOutcome> {
    for endpoint in [start, goal] {
        if !graph.is_passable(endpoint) {
            return Err(CaveError::InvalidEndpoint {
                x: endpoint.x,
                y: endpoint.y,
            });
        }
    }

    let capacity = max_iterations.min(MAX_PREALLOCATED_NODES);
    let mut queue: VecDeque<Position> = VecDeque::with_capacity(capacity);
    // Predecessor of every discovered node; doubles as the visited set
    let mut came_from: HashMap<Position, Position> = HashMap::with_capacity(capacity);
    let mut neighbors = Vec::with_capacity(4);

    queue.push_back(start);
    came_from.insert(start, start);

    let mut iterations = 0;
    while let Some(current) = queue.pop_front() {
        if iterations >= max_iterations {
            trace!(
                "[bfs] {} -> {}: budget of {} exhausted",
                start, goal, max_iterations
            );
            return Ok(SearchOutcome::BudgetExhausted);
        }
        iterations += 1;

        if current == goal {
            let path = reconstruct_path(&came_from, start, goal);
            trace!(
                "[bfs] {} -> {}: {} steps after {} iterations",
                start,
                goal,
                path.len() - 1,
                iterations
            );
            return Ok(SearchOutcome::Found(path));
        }

        neighbors.clear();
        graph.neighbors(current, &mut neighbors);
        for &next in &neighbors {
            if !came_from.contains_key(&next) {
                came_from.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    trace!("[bfs] {} -> {}: unreachable", start, goal);
    Ok(SearchOutcome::Unreachable)
}

fn reconstruct_path(
    came_from: &HashMap<Position, Position>,
    start: Position,
    goal: Position,
) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = came_from[&current];
        path.push(current);
    }
    path.reverse();
    path
}

/// Format path for display
pub fn format_path(path: &[Position]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    let mut result = String::new();
    for (i, pos) in path.iter().enumerate() {
        if i > 0 {
            result.push_str(" -> ");
        }
        result.push_str(&pos.to_string());
    }
    result
}
