use cavegen::spawn::{PlacementEvent, RejectReason};
use cavegen::{AllowedTiles, CaveError, CellState, Grid, PlacementSettings, Position, SpawnPlacer};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn placer(seed: u64, max_attempts: usize) -> SpawnPlacer<StdRng> {
    SpawnPlacer::new(
        StdRng::seed_from_u64(seed),
        PlacementSettings {
            allowed: AllowedTiles::floor_only(),
            max_iterations: 1000,
            max_attempts,
        },
    )
}

#[test]
fn test_open_grid_placement_meets_threshold() {
    let grid = Grid::new(20);
    let mut placer = placer(100, 1000);

    let placement = placer.place_agent_with_report(&grid, 50, 1).unwrap();
    println!("{:?}", placement);

    assert!(grid.in_bounds(placement.position.x, placement.position.y));
    assert!(placement.reachable >= 50);

    let measured = placer
        .count_reachable_around(&grid, placement.position, placement.radius)
        .unwrap();
    assert_eq!(measured, placement.reachable);
    assert!(measured >= 50);
}

#[test]
fn test_place_agent_returns_floor_cell() {
    let grid = Grid::new(20);
    let position = placer(9, 1000).place_agent(&grid, 50, 1).unwrap();
    assert_eq!(grid.get(position.x, position.y), Ok(CellState::Floor));
}

#[test]
fn test_same_seed_same_spawn() {
    let grid = Grid::new(20);
    let a = placer(42, 1000).place_agent(&grid, 30, 1).unwrap();
    let b = placer(42, 1000).place_agent(&grid, 30, 1).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_all_wall_grid_fails_after_attempt_cap() {
    let grid = Grid::filled(10, CellState::Wall);
    let result = placer(1, 50).place_agent(&grid, 1, 1);
    assert_eq!(
        result,
        Err(CaveError::NoSuitablePlacement {
            attempts: 50,
            min_area: 1
        })
    );
}

#[test]
fn test_small_pocket_is_never_accepted() {
    let grid = Grid::from_text(
        "■■■■■■■■■■
         ■■■■■■■■■■
         ■■■■■■■■■■
         ■■■■■■■■■■
         ■■■■□□■■■■
         ■■■■□□■■■■
         ■■■■■■■■■■
         ■■■■■■■■■■
         ■■■■■■■■■■
         ■■■■■■■■■■",
    )
    .unwrap();

    let mut events = Vec::new();
    let result = placer(3, 1000).place_agent_observed(&grid, 10, 1, |event| events.push(event));

    assert!(matches!(result, Err(CaveError::NoSuitablePlacement { .. })));
    // Any pocket cell reaches exactly the other three
    assert!(events.iter().any(|event| matches!(
        event,
        PlacementEvent::CandidateRejected {
            reason: RejectReason::AreaTooSmall { reachable: 3 },
            ..
        }
    )));
}

#[test]
fn test_walls_are_resampled() {
    let grid = Grid::from_text(
        "■■■■■■
         ■□□□□■
         ■□□□□■
         ■□□□□■
         ■□□□□■
         ■■■■■■",
    )
    .unwrap();

    let mut events = Vec::new();
    let placement = placer(11, 1000)
        .place_agent_observed(&grid, 8, 1, |event| events.push(event))
        .unwrap();

    assert_eq!(grid.get(placement.position.x, placement.position.y), Ok(CellState::Floor));
    let rejected_walls = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                PlacementEvent::CandidateRejected {
                    reason: RejectReason::NotTraversable,
                    ..
                }
            )
        })
        .count();
    assert_eq!(rejected_walls, placement.attempts - 1);
}

#[test]
fn test_radius_grows_until_threshold() {
    let grid = Grid::new(15);
    let mut events = Vec::new();
    let placement = placer(5, 1000)
        .place_agent_observed(&grid, 40, 1, |event| events.push(event))
        .unwrap();

    let radii: Vec<i32> = events
        .iter()
        .filter_map(|event| match event {
            PlacementEvent::AreaMeasured { position, radius, .. }
                if *position == placement.position =>
            {
                Some(*radius)
            }
            _ => None,
        })
        .collect();

    let expected: Vec<i32> = (1..=placement.radius).collect();
    assert_eq!(radii, expected);
}

#[test]
fn test_min_sample_radius_is_the_first_window() {
    let grid = Grid::new(15);
    let placement = placer(5, 1000).place_agent_with_report(&grid, 0, 3).unwrap();
    assert_eq!(placement.radius, 3);
    assert_eq!(placement.attempts, 1);
}

#[test]
fn test_oversized_sample_radius_starts_at_whole_grid() {
    let grid = Grid::new(4);
    let position = placer(6, 10).place_agent(&grid, 1, i32::MAX).unwrap();
    assert_eq!(grid.get(position.x, position.y), Ok(CellState::Floor));

    let placement = placer(6, 10)
        .place_agent_with_report(&grid, 15, 1_000_000)
        .unwrap();
    assert_eq!(placement.radius, 3);
    assert_eq!(placement.reachable, 15);
}

#[test]
fn test_reachable_count_rescans_whole_window() {
    let grid = Grid::new(11);
    let placer = placer(0, 1);
    let center = Position::new(5, 5);

    // (2r+1)^2 - 1 for every radius that fits, inner cells counted again each time
    for radius in 1..=5 {
        let side = 2 * radius + 1;
        assert_eq!(
            placer.count_reachable_around(&grid, center, radius),
            Ok((side * side - 1) as usize)
        );
    }
}

#[test]
fn test_wall_traversal_when_allowed() {
    let grid = Grid::filled(8, CellState::Wall);
    let mut placer = SpawnPlacer::new(
        StdRng::seed_from_u64(2),
        PlacementSettings {
            allowed: AllowedTiles::new(&[CellState::Wall]),
            max_iterations: 1000,
            max_attempts: 10,
        },
    );
    let placement = placer.place_agent_with_report(&grid, 20, 1).unwrap();
    assert!(placement.reachable >= 20);
}
