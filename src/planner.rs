use crate::config::Config;
use crate::error::Result;
use crate::grid::Grid;
use crate::obstacles::{generate_obstacles, load_layout};
use crate::scheduler::{Placement, PlacementParams, Scheduler};
use crate::sensible::CellTable;
use crate::visibility::OcclusionMode;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub grid: Grid,
    pub params: PlacementParams,
    pub occlusion: OcclusionMode,
    pub placement: Placement,
}

/// Build the grid the config describes.
/// Obstacle source precedence: explicit ids, then layout file, then generation.
pub fn build_grid(config: &Config) -> Result<Grid> {
    if let Some(ids) = &config.obstacles.ids {
        info!("Using {} explicit obstacle ids", ids.len());
        return Grid::with_blocked(config.grid.rows, config.grid.cols, ids);
    }

    if let Some(path) = &config.obstacles.layout_file {
        let layout = load_layout(path)?;
        info!(
            "Loaded {}x{} layout with {} obstacles from {}",
            layout.cols,
            layout.rows,
            layout.obstacles.len(),
            path.display()
        );
        return Grid::with_blocked(layout.rows, layout.cols, &layout.obstacles);
    }

    // Validate the size before walking over it
    Grid::new(config.grid.rows, config.grid.cols)?;

    let seed = config.obstacles.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let ids = generate_obstacles(
        config.grid.rows,
        config.grid.cols,
        &config.obstacle_params(),
        &mut rng,
    );
    info!(
        "Generated {} obstacles (density {}, seed {})",
        ids.len(),
        config.obstacles.density,
        seed
    );
    Grid::with_blocked(config.grid.rows, config.grid.cols, &ids)
}

/// Build cell records for `grid` and run the scheduler to completion
pub fn place_sensors(grid: &Grid, params: PlacementParams, mode: OcclusionMode) -> Placement {
    run_placement(grid, params, mode, true)
}

fn run_placement(
    grid: &Grid,
    params: PlacementParams,
    mode: OcclusionMode,
    record_rejections: bool,
) -> Placement {
    let started = Instant::now();
    let cells = CellTable::build(grid, params.sense_radius, mode);
    info!(
        "Built {} cell records (radius {}, {}) in {:.2?}",
        cells.len(),
        params.sense_radius,
        mode,
        started.elapsed()
    );

    Scheduler::new(grid, cells, params)
        .record_rejections(record_rejections)
        .run()
}

/// Validate `config`, build its grid and place sensors
pub fn plan(config: &Config) -> Result<PlanOutcome> {
    config.validate()?;
    let grid = build_grid(config)?;
    info!(
        "Grid {}x{}: {} free cells, {} obstacles",
        grid.cols,
        grid.rows,
        grid.free_count(),
        grid.obstacle_count()
    );

    let params = config.placement_params();
    let occlusion = config.occlusion.mode;
    // Rejection entries are only worth keeping when the log is written out
    let record_rejections = config.output.step_log_path.is_some();
    let placement = run_placement(&grid, params, occlusion, record_rejections);

    Ok(PlanOutcome {
        grid,
        params,
        occlusion,
        placement,
    })
}
