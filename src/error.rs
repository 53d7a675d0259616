use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridSenseError>;

#[derive(Debug, Error)]
pub enum GridSenseError {
    #[error("Invalid geometry: {message}")]
    InvalidGeometry { message: String },

    #[error("Too many obstacles: {obstacles} obstacles for {cells} cells")]
    OverconstrainedObstacles { obstacles: usize, cells: usize },

    #[error("Obstacle id {id} is outside the grid (0..{cells})")]
    ObstacleOutOfBounds { id: i32, cells: i32 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error at line {line}: {message}")]
    Layout { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<toml::de::Error> for GridSenseError {
    fn from(err: toml::de::Error) -> Self {
        GridSenseError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<serde_json::Error> for GridSenseError {
    fn from(err: serde_json::Error) -> Self {
        GridSenseError::Json(err.to_string())
    }
}
