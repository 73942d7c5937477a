use image::DynamicImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A single grayscale working image.
/// Pixel values are raw intensities in [0, 255].
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<u8>,
}

impl Frame {
    pub fn new(data: Array2<u8>) -> Self {
        Self { data }
    }

    /// Convert any loaded image to 8-bit luminance.
    ///
    /// Gray images keep their values. Color images use the ITU-R 601-2 luma
    /// weights `L = R * 299/1000 + G * 587/1000 + B * 114/1000`.
    pub fn from_image(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLumaA16(_) => {
                let gray = image.to_luma8();
                let (w, h) = gray.dimensions();
                let data = Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
                    gray.get_pixel(col as u32, row as u32).0[0]
                });
                Self { data }
            }
            _ => {
                let rgb = image.to_rgb8();
                let (w, h) = rgb.dimensions();
                let data = Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
                    luma_601(rgb.get_pixel(col as u32, row as u32).0)
                });
                Self { data }
            }
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}

/// Rec. 601 luma in 16-bit fixed point, rounded to nearest.
fn luma_601([r, g, b]: [u8; 3]) -> u8 {
    let weighted = r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000;
    (weighted >> 16) as u8
}

/// Axis-aligned box in pixel coordinates.
///
/// Rows run top to bottom, columns left to right. `top`/`left` are inclusive
/// and `bottom`/`right` are exclusive, so `bottom - top` is the height and
/// the box can be handed straight to a crop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl BoundingBox {
    pub fn new(top: usize, left: usize, bottom: usize, right: usize) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn width(&self) -> usize {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> usize {
        self.bottom.saturating_sub(self.top)
    }
}

/// Detected objects of one run, in region-labeling order.
pub type ObjectList = Vec<BoundingBox>;
