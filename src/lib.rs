pub mod config;
pub mod coverage;
pub mod error;
pub mod grid;
pub mod obstacles;
pub mod octant;
pub mod planner;
pub mod report;
pub mod scheduler;
pub mod sensible;
pub mod step_log;
pub mod visibility;

pub use config::Config;
pub use coverage::Coverage;
pub use error::{GridSenseError, Result};
pub use grid::Grid;
pub use planner::{plan, place_sensors, PlanOutcome};
pub use report::{render_map, PlacementReport};
pub use scheduler::{Placement, PlacementParams, Scheduler, StepOutcome, StopReason};
pub use sensible::{Cell, CellTable};
pub use visibility::{BlockingIntervals, OcclusionMode};
