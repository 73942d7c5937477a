pub mod scale;
pub mod xml;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentError};

pub use scale::{resize, resize_calibrated, scaled_dimensions};
pub use xml::{read_calibration_xml, sidecar_path};

/// Physical pixel size of the source images and the working resolution
/// every image of a run is rescaled to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Physical units (microns) per source pixel along X.
    pub pixel_size_x: f64,
    /// Physical units (microns) per source pixel along Y.
    pub pixel_size_y: f64,
    /// Physical units per working pixel.
    pub units_per_pixel: f64,
}

impl Calibration {
    /// Build a calibration from the physical pixel size. The working
    /// resolution is the Y pixel size rounded to the nearest 0.1 unit.
    pub fn from_pixel_size(pixel_size_x: f64, pixel_size_y: f64) -> Result<Self> {
        for (axis, size) in [("x", pixel_size_x), ("y", pixel_size_y)] {
            if !size.is_finite() || size <= 0.0 {
                return Err(SegmentError::Calibration(format!(
                    "pixel size {axis} must be positive, got {size}"
                )));
            }
        }

        let units_per_pixel = units_per_pixel(pixel_size_y);
        if units_per_pixel <= 0.0 {
            return Err(SegmentError::Calibration(format!(
                "pixel size {pixel_size_y} rounds to a zero working resolution"
            )));
        }

        Ok(Self {
            pixel_size_x,
            pixel_size_y,
            units_per_pixel,
        })
    }

    /// Convert a physical length to working pixels.
    pub fn to_pixels(&self, physical: f64) -> f64 {
        physical / self.units_per_pixel
    }
}

/// Round a physical pixel size to the nearest 0.1 unit.
pub fn units_per_pixel(pixel_size: f64) -> f64 {
    (pixel_size * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_per_pixel_rounds_to_tenths() {
        assert!((units_per_pixel(1.234) - 1.2).abs() < 1e-12);
        assert!((units_per_pixel(0.96) - 1.0).abs() < 1e-12);
        assert!((units_per_pixel(2.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_tiny_pixel_size() {
        assert!(Calibration::from_pixel_size(0.01, 0.01).is_err());
        assert!(Calibration::from_pixel_size(-1.0, 1.0).is_err());
    }
}
