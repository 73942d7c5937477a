use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

use crate::error::{Result, SegmentError};

use super::Calibration;

/// Dimensions of an image after rescaling to the working resolution.
///
/// Each axis is scaled independently by `units_per_pixel / pixel_size` and
/// rounded up, so anisotropic sources stay anisotropic.
pub fn scaled_dimensions(
    width: u32,
    height: u32,
    pixel_size_x: f64,
    pixel_size_y: f64,
    units_per_pixel: f64,
) -> (u32, u32) {
    let new_w = (width as f64 * units_per_pixel / pixel_size_x).ceil();
    let new_h = (height as f64 * units_per_pixel / pixel_size_y).ceil();
    (new_w as u32, new_h as u32)
}

/// Resample an image so one working pixel spans `units_per_pixel` physical
/// units. Uses a Lanczos (anti-aliased) filter; the input is left untouched.
pub fn resize(
    image: &DynamicImage,
    pixel_size_x: f64,
    pixel_size_y: f64,
    units_per_pixel: f64,
) -> Result<DynamicImage> {
    let (w, h) = (image.width(), image.height());
    let (new_w, new_h) = scaled_dimensions(w, h, pixel_size_x, pixel_size_y, units_per_pixel);
    if new_w == 0 || new_h == 0 {
        return Err(SegmentError::InvalidDimensions {
            width: new_w,
            height: new_h,
        });
    }

    debug!(from = ?(w, h), to = ?(new_w, new_h), "Rescaling image");
    if (new_w, new_h) == (w, h) {
        return Ok(image.clone());
    }
    Ok(image.resize_exact(new_w, new_h, FilterType::Lanczos3))
}

/// Rescale using a run's calibration.
pub fn resize_calibrated(image: &DynamicImage, calibration: &Calibration) -> Result<DynamicImage> {
    resize(
        image,
        calibration.pixel_size_x,
        calibration.pixel_size_y,
        calibration.units_per_pixel,
    )
}
