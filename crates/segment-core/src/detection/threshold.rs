use ndarray::Array2;

use crate::consts::INTENSITY_MAX;
use crate::frame::Frame;

/// Foreground/background labeling of an image, same shape as its source.
pub type Mask = Array2<bool>;

/// Split a grayscale frame into foreground and background.
///
/// Pixels strictly below `255 * threshold` become background; everything
/// at or above it is foreground.
pub fn binarize(frame: &Frame, threshold: f64) -> Mask {
    let cutoff = INTENSITY_MAX * threshold;
    frame.data.mapv(|v| f64::from(v) >= cutoff)
}

/// Count of foreground pixels.
pub fn foreground_count(mask: &Mask) -> usize {
    mask.iter().filter(|&&v| v).count()
}
