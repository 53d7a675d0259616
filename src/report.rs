use crate::coverage::Coverage;
use crate::error::Result;
use crate::grid::Grid;
use crate::planner::PlanOutcome;
use crate::scheduler::StopReason;
use crate::visibility::OcclusionMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Result of one placement run, as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub grid_rows: i32,
    pub grid_cols: i32,
    pub sense_radius: i32,
    pub min_separation: f64,
    pub occlusion: OcclusionMode,
    /// Obstacle cells (stored as cell IDs)
    pub obstacles: Vec<i32>,
    /// Sensor cells in placement order
    pub sensors: Vec<i32>,
    pub sensor_coords: Vec<(i32, i32)>,
    pub covered_cells: usize,
    pub free_cells: usize,
    pub coverage_percent: f64,
    pub stop_reason: StopReason,
    pub steps: usize,
}

impl PlacementReport {
    pub fn from_outcome(outcome: &PlanOutcome) -> Self {
        let grid = &outcome.grid;
        let placement = &outcome.placement;

        PlacementReport {
            grid_rows: grid.rows,
            grid_cols: grid.cols,
            sense_radius: outcome.params.sense_radius,
            min_separation: outcome.params.min_separation,
            occlusion: outcome.occlusion,
            obstacles: grid.obstacle_ids(),
            sensors: placement.sensors.clone(),
            sensor_coords: placement
                .sensors
                .iter()
                .map(|&id| grid.get_coords(id))
                .collect(),
            covered_cells: placement.coverage.len(),
            free_cells: placement.coverage.free_cells(),
            coverage_percent: placement.coverage_percent(),
            stop_reason: placement.stop_reason,
            steps: placement.log.step_count(),
        }
    }

    /// Save to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn summary(&self) -> String {
        format!(
            "Coverage: {:.2}% ({} of {} free cells)\n\
             Number of sensors placed: {}\n\
             Sensor placed ids: {:?}\n\
             Stopped: {}",
            self.coverage_percent,
            self.covered_cells,
            self.free_cells,
            self.sensors.len(),
            self.sensors,
            self.stop_reason
        )
    }
}

/// Character map of a placement:
/// - s: sensor
/// - ■: obstacle
/// - o: covered free cell
/// - □: uncovered free cell
pub fn render_map(grid: &Grid, sensors: &[i32], coverage: &Coverage) -> String {
    let mut result = String::with_capacity(grid.cell_count() * 3 + grid.rows as usize);

    for y in 0..grid.rows {
        for x in 0..grid.cols {
            let cell_id = grid.get_id(x, y);
            let symbol = if sensors.contains(&cell_id) {
                's'
            } else if grid.is_blocked(x, y) {
                '■'
            } else if coverage.contains(cell_id) {
                'o'
            } else {
                '□'
            };
            result.push(symbol);
        }
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn report() -> PlacementReport {
        PlacementReport {
            grid_rows: 2,
            grid_cols: 3,
            sense_radius: 1,
            min_separation: 1.0,
            occlusion: OcclusionMode::AllIntervals,
            obstacles: vec![2],
            sensors: vec![0],
            sensor_coords: vec![(0, 0)],
            covered_cells: 3,
            free_cells: 5,
            coverage_percent: 60.0,
            stop_reason: StopReason::BudgetExhausted,
            steps: 2,
        }
    }

    #[test]
    fn test_render_map() {
        let grid = Grid::with_blocked(2, 3, &[2]).unwrap();
        let mut coverage = Coverage::new(grid.free_count());
        coverage.absorb(&HashSet::from([0, 1, 3]));

        assert_eq!(render_map(&grid, &[0], &coverage), "so■\no□□\n");
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            report().summary(),
            "Coverage: 60.00% (3 of 5 free cells)\n\
             Number of sensors placed: 1\n\
             Sensor placed ids: [0]\n\
             Stopped: sensor budget exhausted"
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let original = report();
        original.save_to_file(&path).unwrap();
        let loaded = PlacementReport::load_from_file(&path).unwrap();
        assert_eq!(loaded, original);

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"occlusion\": \"all-intervals\""));
        assert!(json.contains("\"stop_reason\": \"budget-exhausted\""));
    }
}
