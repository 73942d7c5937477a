use crate::frame::BoundingBox;

/// Pad each box by `margin` times its own width/height on every side and
/// clamp it to the image.
///
/// `shape` is `(height, width)`. The clamp keeps a one-pixel inset at the top
/// and left. A bottom (right) edge that overruns the image is recomputed from
/// the already clamped top (left) as `height - top - 1`, not snapped to the
/// border, which can shrink the box. Should that recomputation land above the
/// top edge the bottom is held at the top, giving an empty box rather than an
/// inverted one.
pub fn expand_boxes(boxes: &[BoundingBox], margin: f64, shape: (usize, usize)) -> Vec<BoundingBox> {
    boxes.iter().map(|b| expand_box(b, margin, shape)).collect()
}

pub fn expand_box(bbox: &BoundingBox, margin: f64, shape: (usize, usize)) -> BoundingBox {
    let (img_h, img_w) = (shape.0 as i64, shape.1 as i64);
    let width = bbox.right as i64 - bbox.left as i64;
    let height = bbox.bottom as i64 - bbox.top as i64;
    let pad_h = (height as f64 * margin).round() as i64;
    let pad_w = (width as f64 * margin).round() as i64;

    let mut top = bbox.top as i64 - pad_h;
    if top < 1 {
        top = 1;
    }

    let mut left = bbox.left as i64 - pad_w;
    if left < 1 {
        left = 1;
    }

    let mut bottom = bbox.bottom as i64 + pad_h;
    if bottom > img_h {
        bottom = img_h - top - 1;
    }

    let mut right = bbox.right as i64 + pad_w;
    if right > img_w {
        right = img_w - left - 1;
    }

    BoundingBox::new(
        top as usize,
        left as usize,
        bottom.max(top) as usize,
        right.max(left) as usize,
    )
}
