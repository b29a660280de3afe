use thiserror::Error;

#[derive(Error, Debug)]
pub enum LatticeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Geometry error: {0}")]
    GeometryError(String),

    #[error("Cross-section data error: {0}")]
    DataError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type LatticeResult<T> = Result<T, LatticeError>;
