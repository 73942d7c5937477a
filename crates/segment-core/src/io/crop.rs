use image::DynamicImage;

use crate::error::{Result, SegmentError};
use crate::frame::BoundingBox;

/// Copy the region of `bbox` out of `image`.
///
/// The box is clipped to the image first; a box with nothing left after
/// clipping is an error.
pub fn crop(image: &DynamicImage, bbox: &BoundingBox) -> Result<DynamicImage> {
    let (img_w, img_h) = (image.width() as usize, image.height() as usize);
    let left = bbox.left.min(img_w);
    let top = bbox.top.min(img_h);
    let right = bbox.right.min(img_w);
    let bottom = bbox.bottom.min(img_h);

    let w = right.saturating_sub(left) as u32;
    let h = bottom.saturating_sub(top) as u32;
    if w == 0 || h == 0 {
        return Err(SegmentError::InvalidDimensions {
            width: w,
            height: h,
        });
    }

    Ok(image.crop_imm(left as u32, top as u32, w, h))
}
