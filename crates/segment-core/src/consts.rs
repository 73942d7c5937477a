/// Step used when a threshold range gives only start and stop.
pub const DEFAULT_THRESHOLD_STEP: f64 = 0.01;

/// Threshold used when the settings omit one.
pub const DEFAULT_THRESHOLD: f64 = 0.20;

/// Default smallest object size, in physical units.
pub const DEFAULT_MINIMUM_SIZE: f64 = 100.0;

/// Default largest object size, in physical units.
pub const DEFAULT_MAXIMUM_SIZE: f64 = 2000.0;

/// Fraction of a box's width/height added on each side before cropping.
pub const BOX_EXPANSION_MARGIN: f64 = 0.20;

/// Pixel intensity ceiling of the grayscale working images.
pub const INTENSITY_MAX: f64 = 255.0;

/// Height in pixels of the white band appended below annotated crops.
pub const LABEL_AREA_HEIGHT: u32 = 160;

/// Physical length of the long scale bar.
pub const SCALE_BAR_LONG: f64 = 100.0;

/// Physical length of the short scale bar.
pub const SCALE_BAR_SHORT: f64 = 25.0;

/// Thickness in pixels of scale bars.
pub const SCALE_BAR_THICKNESS: u32 = 2;

/// Offset of the long scale bar below the image, in pixels.
pub const SCALE_BAR_OFFSET: u32 = 15;

/// Vertical gap between the long and short scale bars.
pub const SCALE_BAR_GAP: u32 = 10;

/// Font size of the captions printed beside the scale bars.
pub const SCALE_CAPTION_SIZE: f32 = 10.0;

/// Horizontal gap between a scale bar and its caption.
pub const SCALE_CAPTION_GAP: u32 = 10;

/// Gap between the short scale bar and the first label line.
pub const LABEL_TEXT_OFFSET: u32 = 10;

/// Leading label lines printed in the larger heading size.
pub const LABEL_HEADING_LINES: usize = 3;
pub const LABEL_HEADING_SIZE: f32 = 14.0;
pub const LABEL_HEADING_SPACING: u32 = 20;

/// Remaining label lines, packed so eight lines fit in the band.
pub const LABEL_BODY_SIZE: f32 = 9.0;
pub const LABEL_BODY_START: u32 = 62;
pub const LABEL_BODY_SPACING: u32 = 13;

/// Font size of the object numbers on the overview image.
pub const OBJECT_INDEX_SIZE: f32 = 40.0;

/// Horizontal offset of an object number from its box's right edge.
pub const OBJECT_INDEX_OFFSET: u32 = 40;

/// Thickness in pixels of the object outlines on the overview image.
pub const OVERVIEW_OUTLINE_THICKNESS: u32 = 20;

/// Number of trailing files in a stack directory that are not focal planes
/// (the fully focused top image and its companion).
pub const NON_PLANE_TRAILING_FILES: usize = 2;

/// Minimum number of runs to use run-level Rayon parallelism.
pub const PARALLEL_RUN_THRESHOLD: usize = 2;
