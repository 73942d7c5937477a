pub mod components;
pub mod expand;
pub mod morphology;
pub mod objects;
pub mod size_filter;
pub mod threshold;

pub use components::{extract_components, label_components, LabelMap};
pub use expand::{expand_box, expand_boxes};
pub use morphology::fill_holes;
pub use objects::{detect_objects, find_objects, segment, Segmentation};
pub use size_filter::{filter_by_size, SizeBand};
pub use threshold::{binarize, Mask};
