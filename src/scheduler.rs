use crate::coverage::Coverage;
use crate::grid::Grid;
use crate::sensible::{Cell, CellTable};
use crate::step_log::{StepEvent, StepLog};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

/// Constraints of one placement run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementParams {
    pub sense_radius: i32,
    pub max_sensors: usize,
    /// Multiplier on the sensing radius
    pub min_separation: f64,
}

impl PlacementParams {
    /// Smallest allowed distance between two sensors
    pub fn min_sensor_distance(&self) -> f64 {
        self.sense_radius as f64 * self.min_separation
    }
}

/// Why the scheduler stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    BudgetExhausted,
    /// Every remaining candidate was rejected since the last acceptance
    CandidatesExhausted,
    FullCoverage,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::BudgetExhausted => write!(f, "sensor budget exhausted"),
            StopReason::CandidatesExhausted => write!(f, "no placeable candidates left"),
            StopReason::FullCoverage => write!(f, "full coverage"),
        }
    }
}

/// Snapshot of a cell's rank at the last queue rebuild
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    id: i32,
    sensible_count: usize,
    closest_sensor_distance: f64,
}

impl From<&Cell> for QueueEntry {
    fn from(cell: &Cell) -> Self {
        QueueEntry {
            id: cell.id,
            sensible_count: cell.sensible_count(),
            closest_sensor_distance: cell.closest_sensor_distance,
        }
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: more sensible cells first, then farther from existing sensors
        self.sensible_count
            .cmp(&other.sensible_count)
            .then_with(|| {
                self.closest_sensor_distance
                    .partial_cmp(&other.closest_sensor_distance)
                    .unwrap_or(Ordering::Equal)
            })
            // Tie-breaker: lower id first for deterministic ordering
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Result of a single scheduler step
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Accepted { id: i32, newly_covered: usize },
    Rejected { id: i32 },
    Finished(StopReason),
}

/// Final state of a completed run
#[derive(Debug, Clone)]
pub struct Placement {
    /// Sensor ids in placement order
    pub sensors: Vec<i32>,
    pub coverage: Coverage,
    pub stop_reason: StopReason,
    pub log: StepLog,
}

impl Placement {
    pub fn coverage_percent(&self) -> f64 {
        self.coverage.percent()
    }
}

/// Greedy placement loop over a priority queue of cell records.
///
/// The queue holds rank snapshots. After every acceptance all records are
/// narrowed by the covered set, their nearest-sensor distances recomputed,
/// and the queue rebuilt from every free cell that is not yet a sensor.
/// Rejected cells therefore return on the next rebuild.
pub struct Scheduler<'g> {
    grid: &'g Grid,
    cells: CellTable,
    params: PlacementParams,
    sensors: Vec<i32>,
    coverage: Coverage,
    rejected: usize,
    remaining: usize,
    queue: BinaryHeap<QueueEntry>,
    log: StepLog,
    finished: Option<StopReason>,
}

impl<'g> Scheduler<'g> {
    pub fn new(grid: &'g Grid, cells: CellTable, params: PlacementParams) -> Self {
        let mut scheduler = Scheduler {
            grid,
            cells,
            params,
            sensors: Vec::new(),
            coverage: Coverage::new(grid.free_count()),
            rejected: 0,
            remaining: params.max_sensors,
            queue: BinaryHeap::new(),
            log: StepLog::new(),
            finished: None,
        };
        scheduler.rebuild_queue();
        info!(
            "Scheduler ready: {} candidates, budget {}, min sensor distance {:.2}",
            scheduler.queue.len(),
            params.max_sensors,
            params.min_sensor_distance()
        );
        scheduler
    }

    /// Keep or drop individual rejection entries in the step log.
    /// Rejections are counted either way.
    pub fn record_rejections(mut self, record: bool) -> Self {
        if record != self.log.records_rejections() {
            self.log = if record {
                StepLog::new()
            } else {
                StepLog::without_rejections()
            };
        }
        self
    }

    /// A cell may host a sensor if it is free, not yet a sensor, and at
    /// least the minimum sensor distance away from every placed sensor.
    pub fn is_placeable(&self, id: i32) -> bool {
        if self.grid.is_blocked_id(id) || self.sensors.contains(&id) {
            return false;
        }
        let min_distance = self.params.min_sensor_distance();
        self.sensors
            .iter()
            .all(|&sensor| self.grid.distance(id, sensor) >= min_distance)
    }

    /// Advance by one dequeue
    pub fn step(&mut self) -> StepOutcome {
        if let Some(reason) = self.finished {
            return StepOutcome::Finished(reason);
        }
        if let Some(reason) = self.stop_condition() {
            return self.finish(reason);
        }

        let Some(entry) = self.queue.pop() else {
            return self.finish(StopReason::CandidatesExhausted);
        };

        if self.is_placeable(entry.id) {
            let newly_covered = self.accept(entry.id);
            StepOutcome::Accepted {
                id: entry.id,
                newly_covered,
            }
        } else {
            self.rejected += 1;
            debug!(
                "Rejected cell {} ({} consecutive rejections)",
                entry.id, self.rejected
            );
            self.log.log(StepEvent::Rejected { id: entry.id });
            StepOutcome::Rejected { id: entry.id }
        }
    }

    /// Step until a stop condition fires
    pub fn run(mut self) -> Placement {
        let stop_reason = loop {
            if let StepOutcome::Finished(reason) = self.step() {
                break reason;
            }
        };

        Placement {
            sensors: self.sensors,
            coverage: self.coverage,
            stop_reason,
            log: self.log,
        }
    }

    pub fn sensors(&self) -> &[i32] {
        &self.sensors
    }

    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    pub fn cells(&self) -> &CellTable {
        &self.cells
    }

    pub fn log(&self) -> &StepLog {
        &self.log
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    pub fn remaining_budget(&self) -> usize {
        self.remaining
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Free cells that are not sensors, i.e. the size of a freshly rebuilt queue
    fn rejection_limit(&self) -> usize {
        self.grid
            .cell_count()
            .saturating_sub(self.grid.obstacle_count() + self.sensors.len())
    }

    fn stop_condition(&self) -> Option<StopReason> {
        if self.remaining == 0 {
            return Some(StopReason::BudgetExhausted);
        }
        if self.rejected >= self.rejection_limit() {
            return Some(StopReason::CandidatesExhausted);
        }
        if self.coverage.is_complete() {
            return Some(StopReason::FullCoverage);
        }
        None
    }

    fn finish(&mut self, reason: StopReason) -> StepOutcome {
        self.finished = Some(reason);
        self.log.log(StepEvent::Finished { reason });
        info!(
            "Placement finished ({}): {} sensors, coverage {:.2}%",
            reason,
            self.sensors.len(),
            self.coverage.percent()
        );
        StepOutcome::Finished(reason)
    }

    fn accept(&mut self, id: i32) -> usize {
        let sensible = self
            .cells
            .get(id)
            .map(|cell| cell.sensible.clone())
            .unwrap_or_default();

        self.sensors.push(id);
        let newly_covered = self.coverage.absorb(&sensible);

        for cell in self.cells.iter_mut() {
            cell.narrow(self.coverage.covered());
            cell.update_closest_sensor(self.grid, &self.sensors);
        }

        self.rejected = 0;
        self.remaining -= 1;
        self.rebuild_queue();

        let (x, y) = self.grid.get_coords(id);
        debug!(
            "Placed sensor {} at ({}, {}): +{} cells, {:.2}% covered",
            id,
            x,
            y,
            newly_covered,
            self.coverage.percent()
        );
        self.log.log(StepEvent::Accepted {
            id,
            x,
            y,
            newly_covered,
            covered_total: self.coverage.len(),
        });
        newly_covered
    }

    fn rebuild_queue(&mut self) {
        let sensors = &self.sensors;
        self.queue = self
            .cells
            .iter()
            .filter(|cell| !sensors.contains(&cell.id))
            .map(QueueEntry::from)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::OcclusionMode;

    fn entry(id: i32, sensible_count: usize, closest_sensor_distance: f64) -> QueueEntry {
        QueueEntry {
            id,
            sensible_count,
            closest_sensor_distance,
        }
    }

    fn scheduler(grid: &Grid, radius: i32, max_sensors: usize, min_separation: f64) -> Scheduler<'_> {
        let cells = CellTable::build(grid, radius, OcclusionMode::FirstInterval);
        Scheduler::new(
            grid,
            cells,
            PlacementParams {
                sense_radius: radius,
                max_sensors,
                min_separation,
            },
        )
    }

    #[test]
    fn test_queue_ordering() {
        let mut heap = BinaryHeap::new();
        heap.push(entry(1, 5, 2.0));
        heap.push(entry(2, 7, 1.0));
        heap.push(entry(3, 5, 4.0));
        heap.push(entry(4, 5, 4.0));
        heap.push(entry(5, 5, f64::INFINITY));

        let order: Vec<i32> = std::iter::from_fn(|| heap.pop().map(|e| e.id)).collect();
        assert_eq!(order, vec![2, 5, 3, 4, 1]);
    }

    #[test]
    fn test_placeable_respects_separation() {
        let grid = Grid::with_blocked(5, 5, &[0]).unwrap();
        let mut scheduler = scheduler(&grid, 1, 3, 2.0);
        assert!(!scheduler.is_placeable(0));

        let first = match scheduler.step() {
            StepOutcome::Accepted { id, .. } => id,
            other => panic!("expected an acceptance, got {:?}", other),
        };
        assert!(!scheduler.is_placeable(first));
        let (x, y) = grid.get_coords(first);
        if x + 1 < grid.cols {
            assert!(!scheduler.is_placeable(grid.get_id(x + 1, y)));
        }
        for id in 0..grid.cell_count() as i32 {
            if scheduler.is_placeable(id) {
                assert!(grid.distance(id, first) >= 2.0);
            }
        }
    }

    #[test]
    fn test_separation_exhausts_candidates() {
        let grid = Grid::new(3, 3).unwrap();
        let placement = scheduler(&grid, 1, 5, 10.0).run();

        assert_eq!(placement.sensors, vec![4]);
        assert_eq!(placement.stop_reason, StopReason::CandidatesExhausted);
        assert_eq!(placement.coverage.len(), 5);
        assert_eq!(placement.log.rejected_count(), 8);
    }

    #[test]
    fn test_rejections_reset_after_acceptance() {
        let grid = Grid::new(1, 7).unwrap();
        let mut scheduler = scheduler(&grid, 1, 3, 5.0);

        // All interior cells tie on 3 sensible cells; lowest id wins
        assert_eq!(scheduler.step(), StepOutcome::Accepted { id: 1, newly_covered: 3 });
        assert_eq!(scheduler.queue_len(), 6);
        assert_eq!(scheduler.remaining_budget(), 2);

        // Cells 5 and 4 rank highest but sit too close to sensor 1
        assert_eq!(scheduler.step(), StepOutcome::Rejected { id: 5 });
        assert_eq!(scheduler.step(), StepOutcome::Rejected { id: 4 });
        assert_eq!(scheduler.rejected_count(), 2);
        assert_eq!(scheduler.step(), StepOutcome::Accepted { id: 6, newly_covered: 2 });
        assert_eq!(scheduler.rejected_count(), 0);
    }

    #[test]
    fn test_unrecorded_rejections_still_count() {
        let grid = Grid::new(3, 3).unwrap();
        let placement = scheduler(&grid, 1, 5, 10.0).record_rejections(false).run();

        assert_eq!(placement.sensors, vec![4]);
        assert_eq!(placement.log.rejected_count(), 8);
        assert_eq!(placement.log.len(), 2);
        assert_eq!(placement.log.step_count(), 10);
        assert_eq!(placement.log.stop_reason(), Some(StopReason::CandidatesExhausted));
    }

    #[test]
    fn test_finished_is_sticky() {
        let grid = Grid::new(2, 2).unwrap();
        let mut scheduler = scheduler(&grid, 1, 0, 1.0);
        assert_eq!(scheduler.step(), StepOutcome::Finished(StopReason::BudgetExhausted));
        assert_eq!(scheduler.step(), StepOutcome::Finished(StopReason::BudgetExhausted));
        assert_eq!(scheduler.log().len(), 1);
    }
}
