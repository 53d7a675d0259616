use crate::error::{GridSenseError, Result};
use std::collections::HashSet;

/// Cell value for a free cell
pub const FREE: i32 = 0;
/// Cell value for an opaque obstacle cell
pub const OBSTACLE: i32 = 1;

/// Grid structure for storing cell states
/// Cell values: 0=free, 1=obstacle. Immutable once built.
#[derive(Clone, Debug)]
pub struct Grid {
    pub rows: i32,
    pub cols: i32,
    pub cells: Vec<i32>,
    obstacle_count: usize,
}

impl Grid {
    /// Create a new grid with all cells free
    pub fn new(rows: i32, cols: i32) -> Result<Self> {
        Self::with_blocked(rows, cols, &[])
    }

    /// Create a grid with specific obstacle cells.
    ///
    /// Duplicate ids are collapsed. Fails before allocating anything if the
    /// dimensions are not positive or if more distinct ids are supplied than
    /// the grid has cells. Fails if any id lies outside the grid.
    pub fn with_blocked(rows: i32, cols: i32, blocked: &[i32]) -> Result<Self> {
        if rows <= 0 || cols <= 0 {
            return Err(GridSenseError::InvalidGeometry {
                message: format!("grid must be at least 1x1, got {} rows x {} cols", rows, cols),
            });
        }
        let total = rows
            .checked_mul(cols)
            .ok_or_else(|| GridSenseError::InvalidGeometry {
                message: format!("grid of {} x {} cells is too large", rows, cols),
            })?;
        let distinct: HashSet<i32> = blocked.iter().copied().collect();
        if distinct.len() > total as usize {
            return Err(GridSenseError::OverconstrainedObstacles {
                obstacles: distinct.len(),
                cells: total as usize,
            });
        }

        let mut cells = vec![FREE; total as usize];
        let mut obstacle_count = 0;
        for &cell_id in blocked {
            if cell_id < 0 || cell_id >= total {
                return Err(GridSenseError::ObstacleOutOfBounds { id: cell_id, cells: total });
            }
            if cells[cell_id as usize] != OBSTACLE {
                cells[cell_id as usize] = OBSTACLE;
                obstacle_count += 1;
            }
        }

        Ok(Grid {
            rows,
            cols,
            cells,
            obstacle_count,
        })
    }

    /// Check if a cell at (x, y) is an obstacle
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return true; // Out of bounds is considered blocked
        }
        self.cells[self.get_id(x, y) as usize] == OBSTACLE
    }

    /// Check if a cell ID is an obstacle
    pub fn is_blocked_id(&self, id: i32) -> bool {
        if id < 0 || id >= self.cell_count() as i32 {
            return true;
        }
        self.cells[id as usize] == OBSTACLE
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: i32, y: i32) -> i32 {
        x + y * self.cols
    }

    /// Convert cell ID to (x, y) coordinates
    pub fn get_coords(&self, id: i32) -> (i32, i32) {
        (id % self.cols, id / self.cols)
    }

    /// Euclidean distance between the centres of two cells
    pub fn distance(&self, id1: i32, id2: i32) -> f64 {
        let (x1, y1) = self.get_coords(id1);
        let (x2, y2) = self.get_coords(id2);
        let dx = (x2 - x1) as f64;
        let dy = (y2 - y1) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacle_count
    }

    /// Number of cells that can host or receive coverage
    pub fn free_count(&self) -> usize {
        self.cell_count() - self.obstacle_count
    }

    /// Obstacle ids in ascending order
    pub fn obstacle_ids(&self) -> Vec<i32> {
        self.ids_with_value(OBSTACLE).collect()
    }

    /// Free cell ids in ascending order
    pub fn free_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.ids_with_value(FREE)
    }

    fn ids_with_value(&self, value: i32) -> impl Iterator<Item = i32> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |&(_, &v)| v == value)
            .map(|(id, _)| id as i32)
    }
}
