mod common;

use cavegen::generator::smooth_pass;
use cavegen::{CaveGenerator, CellState, GenerationConfig, GeneratorState, Grid};
use common::border_and_interior_wall_ratio;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn generate(seed: u64, fill: f64, size: i32, steps: u32) -> Vec<Grid> {
    let config = GenerationConfig::new(fill, size, steps).unwrap();
    let mut generator = CaveGenerator::new(config, seed);
    generator.randomize_map();

    let mut snapshots = vec![generator.get_map().clone()];
    for _ in 0..steps {
        generator.smooth_map();
        snapshots.push(generator.get_map().clone());
    }
    snapshots
}

#[test]
fn test_same_seed_gives_identical_grids() {
    let first = generate(100, 0.5, 40, 8);
    let second = generate(100, 0.5, 40, 8);
    assert_eq!(first.len(), 9);
    for (pass, (a, b)) in first.iter().zip(&second).enumerate() {
        assert_eq!(a, b, "Grids diverged at pass {}", pass);
    }
}

#[test]
fn test_different_seeds_give_different_grids() {
    let a = generate(1, 0.5, 40, 0);
    let b = generate(2, 0.5, 40, 0);
    assert_ne!(a[0], b[0]);
}

#[test]
fn test_fill_tracks_probability() {
    let grid = &generate(7, 0.3, 100, 0)[0];
    let ratio = grid.count(CellState::Wall) as f64 / 10_000.0;
    assert!((0.25..0.35).contains(&ratio), "wall ratio {}", ratio);
}

#[test]
fn test_pass_matches_reference_rule() {
    let mut rng = StdRng::seed_from_u64(55);
    let mut src = Grid::new(16);
    src.randomize(0.5, false, &mut rng);

    let mut dst = Grid::new(16);
    let changed = smooth_pass(&src, &mut dst);

    let mut expected_changes = 0;
    for (pos, old) in src.iter() {
        let walls = src.count_wall_neighbors(pos.x, pos.y);
        let expected = match walls {
            w if w > 4 => CellState::Wall,
            w if w < 4 => CellState::Floor,
            _ => old,
        };
        if expected != old {
            expected_changes += 1;
        }
        assert_eq!(dst.get(pos.x, pos.y), Ok(expected), "cell {} with {} walls", pos, walls);
    }
    assert_eq!(changed, expected_changes);
}

#[test]
fn test_fixed_point_is_idempotent() {
    let mut converged = 0;

    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = Grid::new(30);
        grid.randomize(0.5, false, &mut rng);

        let mut next = Grid::new(30);
        let mut stable = false;
        for _ in 0..60 {
            let changed = smooth_pass(&grid, &mut next);
            std::mem::swap(&mut grid, &mut next);
            if changed == 0 {
                stable = true;
                break;
            }
        }
        if !stable {
            continue;
        }
        converged += 1;

        let before = grid.clone();
        assert_eq!(smooth_pass(&grid, &mut next), 0);
        assert_eq!(next, before);
    }

    assert!(converged > 0, "No seed reached a fixed point");
}

#[test]
fn test_edges_trend_toward_wall() {
    let initial = &generate(31, 0.5, 50, 0)[0];
    let smoothed = generate(31, 0.5, 50, 5).pop().unwrap();

    let (border_before, _) = border_and_interior_wall_ratio(initial);
    let (border_after, interior_after) = border_and_interior_wall_ratio(&smoothed);

    assert!(border_after > border_before, "{} <= {}", border_after, border_before);
    assert!(border_after > interior_after, "{} <= {}", border_after, interior_after);
}

#[test]
fn test_edge_cells_count_outside_as_wall() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut grid = Grid::new(12);
    grid.randomize(0.5, false, &mut rng);

    for (pos, _) in grid.iter() {
        let mut inside = 0;
        let mut outside = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                match grid.get(pos.x + dx, pos.y + dy) {
                    Ok(CellState::Wall) => inside += 1,
                    Ok(CellState::Floor) => {}
                    Err(_) => outside += 1,
                }
            }
        }
        assert_eq!(grid.count_wall_neighbors(pos.x, pos.y), inside + outside);
    }
}

#[test]
fn test_solid_border_survives_smoothing() {
    let config = GenerationConfig::new(0.45, 20, 6)
        .unwrap()
        .with_solid_border(true);
    let mut generator = CaveGenerator::new(config, 5);
    generator.randomize_map();
    while !generator.is_stable() {
        generator.smooth_map();
    }

    let (border, _) = border_and_interior_wall_ratio(generator.get_map());
    assert_eq!(border, 1.0);
}

#[test]
fn test_generator_runs_configured_passes() {
    let config = GenerationConfig::new(0.5, 20, 4).unwrap();
    let mut generator = CaveGenerator::new(config, 77);
    generator.randomize_map();

    let mut passes = 0;
    while !generator.is_stable() {
        generator.smooth_map();
        passes += 1;
    }
    assert_eq!(passes, 4);
    assert_eq!(generator.state(), GeneratorState::Stable);
    assert_eq!(generator.get_map().size(), 20);
}

#[test]
fn test_revision_advances_each_pass() {
    let config = GenerationConfig::new(0.5, 10, 3).unwrap();
    let mut generator = CaveGenerator::new(config, 3);
    generator.randomize_map();
    let mut last = generator.get_map().revision();
    for _ in 0..3 {
        generator.smooth_map();
        let revision = generator.get_map().revision();
        assert!(revision > last);
        last = revision;
    }
}
