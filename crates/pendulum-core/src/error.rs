use thiserror::Error;

use crate::fit::lm::SolverError;

#[derive(Error, Debug)]
pub enum PendulumError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Unsupported color mode: {0}")]
    UnsupportedColorMode(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialization failed: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("No position samples recorded")]
    EmptySeries,

    #[error("Series length mismatch: {times} times, {positions} positions")]
    MismatchedSeries { times: usize, positions: usize },

    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    #[error("Need at least {needed} samples, got {got}")]
    InsufficientSamples { needed: usize, got: usize },

    #[error("Fit failed: {0}")]
    Fit(#[from] SolverError),

    #[error("Tracker worker terminated abnormally")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, PendulumError>;
