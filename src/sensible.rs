use crate::grid::Grid;
use crate::visibility::{BlockingIntervals, OcclusionMode};
use std::collections::HashSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Ids of all cells within Euclidean distance `radius` of `id`, obstacles included.
///
/// Iterates x-offset outer and y-offset inner. The order matters: it decides
/// which obstacle becomes the first blocking interval of each octant.
/// Offsets are clamped to the grid, so any radius is safe.
pub fn sensing_range(grid: &Grid, id: i32, radius: i32) -> Vec<i32> {
    let (x, y) = grid.get_coords(id);
    let radius = radius.max(0);
    let radius_sq = radius as i64 * radius as i64;

    let mut ids = Vec::new();
    for i in (-radius).max(-x)..=radius.min(grid.cols - 1 - x) {
        for j in (-radius).max(-y)..=radius.min(grid.rows - 1 - y) {
            let (di, dj) = (i as i64, j as i64);
            if di * di + dj * dj <= radius_sq {
                ids.push(grid.get_id(x + i, y + j));
            }
        }
    }
    ids
}

/// Free cells of `footprint` visible from `id`, plus `id` itself
pub fn sensible_set(
    grid: &Grid,
    id: i32,
    footprint: &[i32],
    intervals: &BlockingIntervals,
    mode: OcclusionMode,
) -> HashSet<i32> {
    let mut sensible = HashSet::with_capacity(footprint.len());
    sensible.insert(id);
    for &target in footprint {
        if target != id
            && !grid.is_blocked_id(target)
            && intervals.is_visible(grid, id, target, mode)
        {
            sensible.insert(target);
        }
    }
    sensible
}

/// Per free cell record: static visibility geometry plus the mutable
/// coverage value used for ranking.
#[derive(Debug, Clone)]
pub struct Cell {
    pub id: i32,
    pub x: i32,
    pub y: i32,
    /// Every cell within sensing radius, obstacles included
    pub footprint: Vec<i32>,
    /// Obstacle cells of the footprint, in footprint order
    pub obstacles: Vec<i32>,
    pub blocking_intervals: BlockingIntervals,
    /// Uncovered free cells a sensor here would newly cover
    pub sensible: HashSet<i32>,
    /// Distance to the nearest placed sensor, infinite while none is placed
    pub closest_sensor_distance: f64,
}

impl Cell {
    pub fn new(grid: &Grid, id: i32, radius: i32, mode: OcclusionMode) -> Self {
        let (x, y) = grid.get_coords(id);
        let footprint = sensing_range(grid, id, radius);
        let obstacles: Vec<i32> = footprint
            .iter()
            .copied()
            .filter(|&cell| grid.is_blocked_id(cell))
            .collect();
        let blocking_intervals = BlockingIntervals::from_obstacles(grid, id, &obstacles);
        let sensible = sensible_set(grid, id, &footprint, &blocking_intervals, mode);

        Cell {
            id,
            x,
            y,
            footprint,
            obstacles,
            blocking_intervals,
            sensible,
            closest_sensor_distance: f64::INFINITY,
        }
    }

    pub fn sensible_count(&self) -> usize {
        self.sensible.len()
    }

    /// Drop every id that is already covered
    pub fn narrow(&mut self, covered: &HashSet<i32>) {
        self.sensible.retain(|id| !covered.contains(id));
    }

    /// Recompute the distance to the nearest of `sensors`
    pub fn update_closest_sensor(&mut self, grid: &Grid, sensors: &[i32]) {
        self.closest_sensor_distance = sensors
            .iter()
            .map(|&sensor| grid.distance(self.id, sensor))
            .fold(f64::INFINITY, f64::min);
    }
}

/// Cell records indexed by id. Obstacle ids have no record.
#[derive(Debug, Clone)]
pub struct CellTable {
    cells: Vec<Option<Cell>>,
}

impl CellTable {
    /// Build a record for every free cell of the grid
    pub fn build(grid: &Grid, radius: i32, mode: OcclusionMode) -> Self {
        let free: Vec<i32> = grid.free_ids().collect();

        #[cfg(feature = "parallel")]
        let built: Vec<Cell> = free
            .par_iter()
            .map(|&id| Cell::new(grid, id, radius, mode))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let built: Vec<Cell> = free
            .iter()
            .map(|&id| Cell::new(grid, id, radius, mode))
            .collect();

        let mut cells: Vec<Option<Cell>> = vec![None; grid.cell_count()];
        for cell in built {
            let id = cell.id as usize;
            cells[id] = Some(cell);
        }
        CellTable { cells }
    }

    pub fn get(&self, id: i32) -> Option<&Cell> {
        usize::try_from(id).ok().and_then(|i| self.cells.get(i)).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut().flatten()
    }

    /// Number of records, i.e. free cells
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
