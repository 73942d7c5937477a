pub mod parse;
pub mod run;
pub mod threshold;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAXIMUM_SIZE, DEFAULT_MINIMUM_SIZE};
use crate::error::{Result, SegmentError};

pub use parse::parse_settings;
pub use run::RunConfig;
pub use threshold::{normalize_threshold_spec, ThresholdSpec};

/// What a run produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Crop every object from the top image only, for tuning parameters.
    #[default]
    Sample,
    /// Crop every object from every focal plane of the stack.
    Final,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sample => write!(f, "sample"),
            Self::Final => write!(f, "final"),
        }
    }
}

impl FromStr for Mode {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sample" => Ok(Self::Sample),
            "final" => Ok(Self::Final),
            other => Err(SegmentError::Config(format!(
                "mode must be 'sample' or 'final', got '{other}'"
            ))),
        }
    }
}

/// Diagnostic verbosity of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugLevel {
    #[default]
    Off,
    Low,
    /// Also writes intermediate masks.
    High,
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for DebugLevel {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            other => Err(SegmentError::Config(format!(
                "debug must be 'off', 'low' or 'high', got '{other}'"
            ))),
        }
    }
}

/// Descriptive fields printed on every annotated image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecimenMetadata {
    pub source: String,
    pub age: String,
    pub location: String,
    pub catalog_prefix: String,
    pub unit: String,
    pub author: Option<String>,
}

impl Default for SpecimenMetadata {
    fn default() -> Self {
        Self {
            source: "Unspecified Source".into(),
            age: "Unspecified Age".into(),
            location: "Yale Peabody Museum".into(),
            catalog_prefix: "YPM IP".into(),
            unit: "microns".into(),
            author: None,
        }
    }
}

/// A parsed settings file: the base configuration every run is copied from.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Directory holding the image stack.
    pub directory: PathBuf,
    /// Root output directory.
    pub output: PathBuf,
    pub threshold: ThresholdSpec,
    /// Smallest object size, physical units.
    pub minimum_size: f64,
    /// Largest object size, physical units.
    pub maximum_size: f64,
    pub mode: Mode,
    pub debug: DebugLevel,
    pub input_ext: String,
    pub output_ext: String,
    pub pixel_size_x: Option<f64>,
    pub pixel_size_y: Option<f64>,
    pub metadata: SpecimenMetadata,
}

impl Settings {
    /// Settings with every optional key at its default.
    pub fn new(directory: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        let directory = strip_trailing_separator(directory.into());
        Self {
            directory,
            output: output.into(),
            threshold: ThresholdSpec::default(),
            minimum_size: DEFAULT_MINIMUM_SIZE,
            maximum_size: DEFAULT_MAXIMUM_SIZE,
            mode: Mode::default(),
            debug: DebugLevel::default(),
            input_ext: "tif".into(),
            output_ext: "tif".into(),
            pixel_size_x: None,
            pixel_size_y: None,
            metadata: SpecimenMetadata::default(),
        }
    }

    /// Read and parse a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        parse_settings(&text)
    }

    /// Last component of the stack directory.
    pub fn directory_name(&self) -> String {
        self.directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Specimen identifier: the stack directory name up to its first `_`.
    pub fn unique_id(&self) -> String {
        let name = self.directory_name();
        name.split('_').next().unwrap_or_default().to_string()
    }

    /// Where this settings file's results go: `<output>/<stack>/<mode>`.
    pub fn full_output(&self) -> PathBuf {
        self.output
            .join(self.directory_name())
            .join(self.mode.to_string())
    }

    /// Expand the threshold specification into one run configuration per
    /// threshold value, in ascending order.
    pub fn permutations(&self) -> Result<Vec<RunConfig>> {
        let base = RunConfig::from_settings(self)?;
        Ok(self
            .threshold
            .values()
            .into_iter()
            .map(|threshold| base.with_threshold(threshold))
            .collect())
    }
}

fn strip_trailing_separator(path: PathBuf) -> PathBuf {
    let s = path.to_string_lossy();
    if s.len() > 1 && s.ends_with('/') {
        PathBuf::from(s.trim_end_matches('/'))
    } else {
        path
    }
}
