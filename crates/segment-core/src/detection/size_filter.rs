use crate::frame::BoundingBox;

/// Pixel-space size band derived from the physical minimum and maximum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeBand {
    /// Exclusive lower bound on both width and height.
    pub lower: f64,
    /// Exclusive upper bound on both width and height.
    pub upper: f64,
}

impl SizeBand {
    /// Convert both sizes to pixels, then take `sqrt(min * max / 2)` as the
    /// single lower bound. The maximum stays as the upper bound.
    pub fn new(minimum_size: f64, maximum_size: f64, units_per_pixel: f64) -> Self {
        let min_px = minimum_size / units_per_pixel;
        let max_px = maximum_size / units_per_pixel;
        Self {
            lower: (min_px * max_px / 2.0).sqrt(),
            upper: max_px,
        }
    }

    pub fn contains(&self, dimension: usize) -> bool {
        let d = dimension as f64;
        self.lower < d && d < self.upper
    }

    /// Both the width and the height must lie inside the band.
    pub fn accepts(&self, bbox: &BoundingBox) -> bool {
        self.contains(bbox.width()) && self.contains(bbox.height())
    }
}

/// Keep only the boxes whose width and height both fall inside the size band,
/// preserving order.
pub fn filter_by_size(
    boxes: &[BoundingBox],
    minimum_size: f64,
    maximum_size: f64,
    units_per_pixel: f64,
) -> Vec<BoundingBox> {
    let band = SizeBand::new(minimum_size, maximum_size, units_per_pixel);
    boxes.iter().copied().filter(|b| band.accepts(b)).collect()
}
