use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::error::{Result, SegmentError};

use super::{DebugLevel, Mode, Settings, SpecimenMetadata};

/// One fully-resolved set of processing parameters for a single threshold.
///
/// Never mutated after creation: the `with_*` methods return new values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Binarization threshold as a fraction of full intensity.
    pub threshold: f64,
    /// Smallest object size, physical units.
    pub minimum_size: f64,
    /// Largest object size, physical units.
    pub maximum_size: f64,
    pub mode: Mode,
    pub debug: DebugLevel,
    /// Directory holding the image stack.
    pub directory: PathBuf,
    /// Full output directory for this run.
    pub output: PathBuf,
    /// Specimen identifier used in output file names.
    pub unique_id: String,
    pub input_ext: String,
    pub output_ext: String,
    /// Present once the pixel size is known.
    pub calibration: Option<Calibration>,
    pub metadata: SpecimenMetadata,
}

impl RunConfig {
    /// Base run configuration for a settings file, at the first threshold of
    /// its specification.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let calibration = match (settings.pixel_size_x, settings.pixel_size_y) {
            (Some(x), Some(y)) => Some(Calibration::from_pixel_size(x, y)?),
            (None, None) => None,
            _ => {
                return Err(SegmentError::Config(
                    "pixel_size_x and pixel_size_y must be given together".into(),
                ))
            }
        };

        if !(settings.minimum_size > 0.0 && settings.minimum_size < settings.maximum_size) {
            return Err(SegmentError::Config(format!(
                "need 0 < minimumSize < maximumSize, got {} and {}",
                settings.minimum_size, settings.maximum_size
            )));
        }

        let threshold = settings
            .threshold
            .values()
            .first()
            .copied()
            .ok_or_else(|| SegmentError::InvalidThreshold("no threshold values".into()))?;

        Ok(Self {
            threshold,
            minimum_size: settings.minimum_size,
            maximum_size: settings.maximum_size,
            mode: settings.mode,
            debug: settings.debug,
            directory: settings.directory.clone(),
            output: settings.full_output(),
            unique_id: settings.unique_id(),
            input_ext: settings.input_ext.clone(),
            output_ext: settings.output_ext.clone(),
            calibration,
            metadata: settings.metadata.clone(),
        })
    }

    /// A copy of this configuration with a different threshold.
    pub fn with_threshold(&self, threshold: f64) -> Self {
        Self {
            threshold,
            ..self.clone()
        }
    }

    /// A copy of this configuration with the pixel size resolved.
    pub fn with_calibration(&self, calibration: Calibration) -> Self {
        Self {
            calibration: Some(calibration),
            ..self.clone()
        }
    }

    /// The run calibration, or `CalibrationMissing` if it was never resolved.
    pub fn calibration(&self) -> Result<&Calibration> {
        self.calibration
            .as_ref()
            .ok_or_else(|| SegmentError::CalibrationMissing(self.directory.clone()))
    }

    pub fn units_per_pixel(&self) -> Result<f64> {
        Ok(self.calibration()?.units_per_pixel)
    }

    /// Label used in sample-mode file names, e.g. `th=0.2000_size=0100u-2000u`.
    pub fn file_label(&self) -> String {
        format!(
            "th={:06.4}_size={:04.0}u-{:04.0}u",
            self.threshold, self.minimum_size, self.maximum_size
        )
    }

    /// Serialize for the settings record written next to final-mode output.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
