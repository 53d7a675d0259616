use clap::Parser;
use gridsense::{plan, render_map, Config, OcclusionMode, PlacementReport};
use log::{error, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Greedy line-of-sight sensor placement on an obstacle grid", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = "config.toml")]
    config: PathBuf,

    /// Grid width in cells
    #[arg(long)]
    cols: Option<i32>,

    /// Grid height in cells
    #[arg(long)]
    rows: Option<i32>,

    /// Sensing radius in cells
    #[arg(short = 'r', long = "radius")]
    radius: Option<i32>,

    /// Maximum number of sensors
    #[arg(short = 'n', long = "sensors")]
    sensors: Option<usize>,

    /// Minimum sensor separation, as a multiple of the radius
    #[arg(long)]
    min_separation: Option<f64>,

    /// Seed for obstacle generation
    #[arg(long)]
    seed: Option<u64>,

    /// Obstacle layout file (overrides generation and grid size)
    #[arg(short = 'l', long = "layout")]
    layout: Option<PathBuf>,

    /// Occlusion test: first-interval or all-intervals
    #[arg(long)]
    occlusion: Option<OcclusionMode>,

    /// Write a JSON report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the JSON step log here
    #[arg(long)]
    step_log: Option<PathBuf>,

    /// Print the placement map
    #[arg(short = 'm', long = "map")]
    map: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(cols) = self.cols {
            config.grid.cols = cols;
        }
        if let Some(rows) = self.rows {
            config.grid.rows = rows;
        }
        if let Some(radius) = self.radius {
            config.sensors.sense_radius = radius;
        }
        if let Some(sensors) = self.sensors {
            config.sensors.max_sensors = sensors;
        }
        if let Some(separation) = self.min_separation {
            config.sensors.min_separation = separation;
        }
        if let Some(seed) = self.seed {
            config.obstacles.seed = Some(seed);
        }
        if let Some(layout) = self.layout {
            config.obstacles.layout_file = Some(layout);
        }
        if let Some(mode) = self.occlusion {
            config.occlusion.mode = mode;
        }
        if let Some(report) = self.report {
            config.output.report_path = Some(report);
        }
        if let Some(step_log) = self.step_log {
            config.output.step_log_path = Some(step_log);
        }
        if self.map {
            config.output.show_map = true;
        }
    }
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mut config = Config::load(&args.config)?;
    args.apply(&mut config);

    let outcome = plan(&config)?;
    let report = PlacementReport::from_outcome(&outcome);

    if config.output.show_map {
        println!(
            "{}",
            render_map(&outcome.grid, &outcome.placement.sensors, &outcome.placement.coverage)
        );
    }
    println!("{}", report.summary());

    if let Some(path) = &config.output.report_path {
        report.save_to_file(path)?;
        info!("Report saved to: {}", path.display());
    }
    if let Some(path) = &config.output.step_log_path {
        outcome.placement.log.save_to_file(path)?;
        info!("Step log saved to: {} ({})", path.display(), outcome.placement.log.summary());
    }

    Ok(())
}
