use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Config(String),

    #[error("Missing required setting '{0}'")]
    MissingSetting(&'static str),

    #[error("Invalid threshold specification: {0}")]
    InvalidThreshold(String),

    #[error("Threshold specification has {0} values (expected 1 to 3)")]
    TooManyThresholdTokens(usize),

    #[error("No pixel size in settings and no calibration sidecar for {}", .0.display())]
    CalibrationMissing(PathBuf),

    #[error("Malformed calibration: {0}")]
    Calibration(String),

    #[error("No objects found at threshold {threshold:.4}")]
    NoObjectsFound { threshold: f64 },

    #[error("No *.{extension} images in {}", directory.display())]
    NoImages {
        directory: PathBuf,
        extension: String,
    },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Label font error: {0}")]
    Font(String),

    #[error("TIFF encoding error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Settings serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, SegmentError>;
