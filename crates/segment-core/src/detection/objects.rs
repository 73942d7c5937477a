use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use crate::consts::BOX_EXPANSION_MARGIN;
use crate::error::{Result, SegmentError};
use crate::frame::{Frame, ObjectList};
use crate::settings::RunConfig;

use super::components::extract_components;
use super::expand::expand_boxes;
use super::size_filter::filter_by_size;
use super::threshold::{binarize, foreground_count, Mask};

/// Every intermediate of one detection pass.
#[derive(Clone, Debug)]
pub struct Segmentation {
    /// Binarized frame before hole filling.
    pub mask: Mask,
    /// Number of labeled regions before size filtering.
    pub regions: usize,
    /// Boxes of the regions that passed the size filter, before expansion.
    pub kept: ObjectList,
    /// Final expanded boxes.
    pub objects: ObjectList,
}

/// Run the detection stages on one frame.
///
/// Pipeline: binarize -> fill holes -> label -> bounding boxes ->
/// size filter -> expand. An empty object list is not an error here.
pub fn segment(frame: &Frame, run: &RunConfig) -> Result<Segmentation> {
    let start = Instant::now();
    let units_per_pixel = run.units_per_pixel()?;

    let mask = binarize(frame, run.threshold);
    let label_map = extract_components(&mask);
    let boxes = label_map.bounding_boxes();
    debug!(
        foreground = foreground_count(&mask),
        regions = label_map.count(),
        "Mask labeled"
    );

    let kept = filter_by_size(&boxes, run.minimum_size, run.maximum_size, units_per_pixel);
    let objects = expand_boxes(&kept, BOX_EXPANSION_MARGIN, label_map.dim());

    info!(
        threshold = run.threshold,
        regions = label_map.count(),
        kept = objects.len(),
        seconds = start.elapsed().as_secs_f64(),
        "Objects found"
    );

    Ok(Segmentation {
        mask,
        regions: label_map.count(),
        kept,
        objects,
    })
}

/// Find the objects of one frame. Fails with `NoObjectsFound` if nothing
/// survives the size filter.
pub fn find_objects(frame: &Frame, run: &RunConfig) -> Result<ObjectList> {
    let segmentation = segment(frame, run)?;
    if segmentation.objects.is_empty() {
        return Err(SegmentError::NoObjectsFound {
            threshold: run.threshold,
        });
    }
    Ok(segmentation.objects)
}

/// [`find_objects`] on a loaded (already rescaled) image.
pub fn detect_objects(image: &DynamicImage, run: &RunConfig) -> Result<ObjectList> {
    find_objects(&Frame::from_image(image), run)
}
