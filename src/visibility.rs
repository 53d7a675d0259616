use crate::grid::Grid;
use crate::octant::{calculate_slope, Octant};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many blocking intervals an occlusion test consults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OcclusionMode {
    /// Only the first obstacle recorded in the target's octant is tested.
    /// A later obstacle in the same octant never blocks.
    #[default]
    FirstInterval,
    /// The target must be clear of every obstacle in its octant
    AllIntervals,
}

impl FromStr for OcclusionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-interval" => Ok(OcclusionMode::FirstInterval),
            "all-intervals" => Ok(OcclusionMode::AllIntervals),
            other => Err(format!(
                "unknown occlusion mode '{}', expected 'first-interval' or 'all-intervals'",
                other
            )),
        }
    }
}

impl fmt::Display for OcclusionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcclusionMode::FirstInterval => write!(f, "first-interval"),
            OcclusionMode::AllIntervals => write!(f, "all-intervals"),
        }
    }
}

/// Angular span of one obstacle as seen from an observer, plus its distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockingInterval {
    pub distance: f64,
    pub lower_slope: f64,
    pub higher_slope: f64,
}

impl BlockingInterval {
    /// Whether this obstacle hides a target at `slope` and `distance` in `octant`.
    /// Vertical octants block outside [lower, higher], all others strictly inside.
    pub fn blocks(&self, octant: Octant, slope: f64, distance: f64) -> bool {
        if distance < self.distance {
            return false;
        }
        if octant.is_vertical() {
            slope < self.lower_slope || slope > self.higher_slope
        } else {
            slope > self.lower_slope && slope < self.higher_slope
        }
    }
}

/// Octant and blocking interval of `target` relative to `observer`.
/// None when both are the same cell.
pub fn relative_slope_interval(
    grid: &Grid,
    observer: i32,
    target: i32,
) -> Option<(Octant, BlockingInterval)> {
    let (x1, y1) = grid.get_coords(observer);
    let (x2, y2) = grid.get_coords(target);
    let octant = Octant::classify(x2 - x1, y2 - y1)?;

    let ((lx, ly), (hx, hy)) = octant.corner_offsets();
    let (ox, oy) = (x1 as f64, y1 as f64);
    let (tx, ty) = (x2 as f64, y2 as f64);

    let interval = BlockingInterval {
        distance: grid.distance(observer, target),
        lower_slope: calculate_slope(ox, oy, tx + lx, ty + ly),
        higher_slope: calculate_slope(ox, oy, tx + hx, ty + hy),
    };
    Some((octant, interval))
}

/// Blocking intervals of one observer, partitioned by octant.
/// Intervals keep the order in which their obstacles were supplied.
#[derive(Debug, Clone, Default)]
pub struct BlockingIntervals {
    octants: [Vec<BlockingInterval>; 8],
}

impl BlockingIntervals {
    pub fn from_obstacles(grid: &Grid, observer: i32, obstacles: &[i32]) -> Self {
        let mut intervals = Self::default();
        for &obstacle in obstacles {
            if let Some((octant, interval)) = relative_slope_interval(grid, observer, obstacle) {
                intervals.octants[octant.index()].push(interval);
            }
        }
        intervals
    }

    pub fn in_octant(&self, octant: Octant) -> &[BlockingInterval] {
        &self.octants[octant.index()]
    }

    pub fn len(&self) -> usize {
        self.octants.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Line-of-sight test from `observer` to `target`.
    /// The target's raw centre slope is compared against the intervals
    /// recorded for its octant.
    pub fn is_visible(&self, grid: &Grid, observer: i32, target: i32, mode: OcclusionMode) -> bool {
        let (x1, y1) = grid.get_coords(observer);
        let (x2, y2) = grid.get_coords(target);
        let Some(octant) = Octant::classify(x2 - x1, y2 - y1) else {
            return true;
        };

        let intervals = self.in_octant(octant);
        if intervals.is_empty() {
            return true;
        }

        let slope = calculate_slope(x1 as f64, y1 as f64, x2 as f64, y2 as f64);
        let distance = grid.distance(observer, target);

        match mode {
            OcclusionMode::FirstInterval => !intervals[0].blocks(octant, slope, distance),
            OcclusionMode::AllIntervals => intervals
                .iter()
                .all(|interval| !interval.blocks(octant, slope, distance)),
        }
    }
}
