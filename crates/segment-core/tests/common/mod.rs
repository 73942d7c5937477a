#![allow(dead_code)]

use std::path::Path;

use image::{Rgb, RgbImage};
use ndarray::Array2;

use segment_core::calibration::Calibration;
use segment_core::detection::Mask;
use segment_core::frame::Frame;
use segment_core::settings::{RunConfig, Settings, ThresholdSpec};

pub const BACKGROUND: u8 = 20;
pub const FOREGROUND: u8 = 200;

/// A square object: `(top, left, side)` in pixels.
pub type Square = (usize, usize, usize);

/// Build a `height x width` frame with bright squares on a dark background.
pub fn frame_with_squares(height: usize, width: usize, squares: &[Square]) -> Frame {
    let mut data = Array2::from_elem((height, width), BACKGROUND);
    for &(top, left, side) in squares {
        for row in top..(top + side).min(height) {
            for col in left..(left + side).min(width) {
                data[[row, col]] = FOREGROUND;
            }
        }
    }
    Frame::new(data)
}

/// Same layout as [`frame_with_squares`], as an RGB image.
pub fn rgb_with_squares(height: u32, width: u32, squares: &[Square]) -> RgbImage {
    let frame = frame_with_squares(height as usize, width as usize, squares);
    let mut img = RgbImage::new(width, height);
    for ((row, col), &v) in frame.data.indexed_iter() {
        img.put_pixel(col as u32, row as u32, Rgb([v, v, v]));
    }
    img
}

/// Parse a mask from rows of `#` (foreground) and `.` (background).
pub fn mask_from_rows(rows: &[&str]) -> Mask {
    let h = rows.len();
    let w = rows[0].len();
    Array2::from_shape_fn((h, w), |(r, c)| rows[r].as_bytes()[c] == b'#')
}

/// A calibrated run with one working pixel per physical unit.
pub fn unit_run(threshold: f64, minimum_size: f64, maximum_size: f64) -> RunConfig {
    let mut settings = Settings::new("/data/TEST01_stack", "/tmp/out");
    settings.threshold = ThresholdSpec::Single(threshold);
    settings.minimum_size = minimum_size;
    settings.maximum_size = maximum_size;
    RunConfig::from_settings(&settings)
        .unwrap()
        .with_calibration(Calibration::from_pixel_size(1.0, 1.0).unwrap())
}

/// Write a settings file and return its path.
pub fn write_settings(dir: &Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("settings.txt");
    std::fs::write(&path, text).unwrap();
    path
}
