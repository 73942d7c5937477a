pub mod annotate;
pub mod crop;
pub mod image_io;

pub use annotate::{
    add_label_area, draw_bounding_boxes, draw_label_text, draw_scale_bars, image_label,
    label_font,
};
pub use crop::crop;
pub use image_io::{list_images, load_image, load_scaled, save_image, save_mask_png};
