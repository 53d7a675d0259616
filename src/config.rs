use crate::error::{GridSenseError, Result};
use crate::obstacles::ObstacleParams;
use crate::scheduler::PlacementParams;
use crate::visibility::OcclusionMode;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub sensors: SensorConfig,
    #[serde(default)]
    pub obstacles: ObstacleConfig,
    #[serde(default)]
    pub occlusion: OcclusionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GridConfig {
    #[serde(default = "default_cols")]
    pub cols: i32,
    #[serde(default = "default_rows")]
    pub rows: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SensorConfig {
    #[serde(default = "default_sense_radius")]
    pub sense_radius: i32,
    #[serde(default = "default_max_sensors")]
    pub max_sensors: usize,
    /// Multiplier on the sensing radius
    #[serde(default = "default_min_separation")]
    pub min_separation: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObstacleConfig {
    #[serde(default = "default_density")]
    pub density: f64,
    #[serde(default = "default_rock_count")]
    pub rock_count: usize,
    /// Falls back to the sensing radius
    #[serde(default)]
    pub max_rock_length: Option<i32>,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Explicit obstacle ids; override generation
    #[serde(default)]
    pub ids: Option<Vec<i32>>,
    /// Character layout file; overrides generation and grid size
    #[serde(default)]
    pub layout_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OcclusionConfig {
    #[serde(default)]
    pub mode: OcclusionMode,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub report_path: Option<PathBuf>,
    #[serde(default)]
    pub step_log_path: Option<PathBuf>,
    #[serde(default)]
    pub show_map: bool,
}

// Default values
fn default_cols() -> i32 { 100 }
fn default_rows() -> i32 { 100 }
fn default_sense_radius() -> i32 { 10 }
fn default_max_sensors() -> usize { 75 }
fn default_min_separation() -> f64 { 1.0 }
fn default_density() -> f64 { 0.2 }
fn default_rock_count() -> usize { 10 }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            sense_radius: default_sense_radius(),
            max_sensors: default_max_sensors(),
            min_separation: default_min_separation(),
        }
    }
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            density: default_density(),
            rock_count: default_rock_count(),
            max_rock_length: None,
            seed: None,
            ids: None,
            layout_file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            sensors: SensorConfig::default(),
            obstacles: ObstacleConfig::default(),
            occlusion: OcclusionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, or use defaults if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = Self::from_toml_str(&contents)?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No {} found, using default configuration", path.display());
                Ok(Config::default())
            }
            Err(e) => Err(GridSenseError::Config(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Check every value before any grid is built
    pub fn validate(&self) -> Result<()> {
        if self.obstacles.layout_file.is_none() && (self.grid.rows <= 0 || self.grid.cols <= 0) {
            return Err(GridSenseError::InvalidGeometry {
                message: format!(
                    "grid must be at least 1x1, got {} rows x {} cols",
                    self.grid.rows, self.grid.cols
                ),
            });
        }
        if self.sensors.sense_radius < 0 {
            return Err(GridSenseError::InvalidGeometry {
                message: format!("sense_radius must be >= 0, got {}", self.sensors.sense_radius),
            });
        }
        let separation = self.sensors.min_separation;
        if !separation.is_finite() || separation < 0.0 {
            return Err(GridSenseError::InvalidParameter(format!(
                "min_separation must be a finite value >= 0, got {}",
                separation
            )));
        }
        let density = self.obstacles.density;
        if !(0.0..=1.0).contains(&density) {
            return Err(GridSenseError::InvalidParameter(format!(
                "obstacle density must be within [0, 1], got {}",
                density
            )));
        }
        if self.obstacles.rock_count == 0 {
            return Err(GridSenseError::InvalidParameter(
                "rock_count must be at least 1".to_string(),
            ));
        }
        if let Some(length) = self.obstacles.max_rock_length {
            if length < 1 {
                return Err(GridSenseError::InvalidParameter(format!(
                    "max_rock_length must be at least 1, got {}",
                    length
                )));
            }
        }
        if self.obstacles.ids.is_some() && self.obstacles.layout_file.is_some() {
            warn!("Both obstacle ids and a layout file are configured; the explicit ids win");
        }
        Ok(())
    }

    pub fn placement_params(&self) -> PlacementParams {
        PlacementParams {
            sense_radius: self.sensors.sense_radius,
            max_sensors: self.sensors.max_sensors,
            min_separation: self.sensors.min_separation,
        }
    }

    pub fn obstacle_params(&self) -> ObstacleParams {
        ObstacleParams {
            density: self.obstacles.density,
            rock_count: self.obstacles.rock_count,
            max_rock_length: self
                .obstacles
                .max_rock_length
                .unwrap_or(self.sensors.sense_radius)
                .min(self.grid.rows.saturating_mul(self.grid.cols))
                .max(1),
        }
    }
}
