#![allow(dead_code)]

use gridsense::{Grid, Placement, PlacementParams};
use std::collections::HashSet;

/// Visibility fixture parsed from a character map.
/// Format:
/// - s: observer
/// - ■: obstacle
/// - o: free cell the observer senses
/// - □: free cell the observer does not sense
pub struct SenseFixture {
    pub grid: Grid,
    pub observer: i32,
    pub expected: HashSet<i32>,
}

pub fn parse_fixture(text: &str) -> SenseFixture {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let rows = lines.len() as i32;
    let cols = lines[0].chars().count() as i32;

    let mut blocked = Vec::new();
    let mut observer = -1;
    let mut expected = HashSet::new();

    for (y, line) in lines.iter().enumerate() {
        assert_eq!(line.chars().count() as i32, cols, "ragged fixture row {}", y);
        for (x, ch) in line.chars().enumerate() {
            let id = x as i32 + y as i32 * cols;
            match ch {
                's' => {
                    observer = id;
                    expected.insert(id);
                }
                '■' => blocked.push(id),
                'o' => {
                    expected.insert(id);
                }
                '□' => {}
                other => panic!("unexpected fixture character '{}'", other),
            }
        }
    }

    assert!(observer >= 0, "fixture has no observer");
    SenseFixture {
        grid: Grid::with_blocked(rows, cols, &blocked).unwrap(),
        observer,
        expected,
    }
}

pub fn flip_id_horizontal(grid: &Grid, id: i32) -> i32 {
    let (x, y) = grid.get_coords(id);
    grid.get_id(grid.cols - 1 - x, y)
}

pub fn flip_id_vertical(grid: &Grid, id: i32) -> i32 {
    let (x, y) = grid.get_coords(id);
    grid.get_id(x, grid.rows - 1 - y)
}

/// Mirror a grid left-right
pub fn flip_grid_horizontal(grid: &Grid) -> Grid {
    let blocked: Vec<i32> = grid
        .obstacle_ids()
        .into_iter()
        .map(|id| flip_id_horizontal(grid, id))
        .collect();
    Grid::with_blocked(grid.rows, grid.cols, &blocked).unwrap()
}

/// Mirror a grid top-bottom
pub fn flip_grid_vertical(grid: &Grid) -> Grid {
    let blocked: Vec<i32> = grid
        .obstacle_ids()
        .into_iter()
        .map(|id| flip_id_vertical(grid, id))
        .collect();
    Grid::with_blocked(grid.rows, grid.cols, &blocked).unwrap()
}

/// Check the properties every finished placement must have
pub fn assert_placement_invariants(grid: &Grid, params: &PlacementParams, placement: &Placement) {
    let sensors: HashSet<i32> = placement.sensors.iter().copied().collect();
    assert_eq!(sensors.len(), placement.sensors.len(), "duplicate sensor");
    assert!(placement.sensors.len() <= params.max_sensors, "budget exceeded");

    for &sensor in &placement.sensors {
        assert!(!grid.is_blocked_id(sensor), "sensor {} on an obstacle", sensor);
        assert!(placement.coverage.contains(sensor), "sensor {} does not cover itself", sensor);
    }

    let min_distance = params.min_sensor_distance();
    for (i, &a) in placement.sensors.iter().enumerate() {
        for &b in &placement.sensors[i + 1..] {
            assert!(
                grid.distance(a, b) >= min_distance,
                "sensors {} and {} closer than {}",
                a,
                b,
                min_distance
            );
        }
    }

    let radius = params.sense_radius as f64;
    for &id in placement.coverage.covered() {
        assert!(!grid.is_blocked_id(id), "obstacle {} counted as covered", id);
        assert!(
            placement
                .sensors
                .iter()
                .any(|&sensor| grid.distance(sensor, id) <= radius),
            "cell {} covered but out of every sensor's range",
            id
        );
    }

    assert_eq!(placement.coverage.free_cells(), grid.free_count());
    assert_eq!(placement.log.accepted_count(), placement.sensors.len());
    assert_eq!(placement.log.stop_reason(), Some(placement.stop_reason));
}
