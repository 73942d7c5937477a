use ab_glyph::{Font, FontRef, PxScale};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::consts::{
    LABEL_AREA_HEIGHT, LABEL_BODY_SIZE, LABEL_BODY_SPACING, LABEL_BODY_START,
    LABEL_HEADING_LINES, LABEL_HEADING_SIZE, LABEL_HEADING_SPACING, LABEL_TEXT_OFFSET,
    OBJECT_INDEX_OFFSET, OBJECT_INDEX_SIZE, OVERVIEW_OUTLINE_THICKNESS, SCALE_BAR_GAP,
    SCALE_BAR_LONG, SCALE_BAR_OFFSET, SCALE_BAR_SHORT, SCALE_BAR_THICKNESS, SCALE_CAPTION_GAP,
    SCALE_CAPTION_SIZE,
};
use crate::error::{Result, SegmentError};
use crate::frame::BoundingBox;
use crate::settings::RunConfig;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);

static LABEL_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// The typeface used for every label, scale caption and object number.
pub fn label_font() -> Result<FontRef<'static>> {
    FontRef::try_from_slice(LABEL_FONT).map_err(|e| SegmentError::Font(e.to_string()))
}

/// Copy of `image` with a white band appended below it for labels.
pub fn add_label_area(image: &DynamicImage) -> RgbImage {
    let src = image.to_rgb8();
    let (w, h) = src.dimensions();
    let mut out = RgbImage::from_pixel(w, h + LABEL_AREA_HEIGHT, WHITE);
    image::imageops::replace(&mut out, &src, 0, 0);
    out
}

/// Draw the long and short scale bars, centered, into the label band that
/// starts at row `image_height`, each captioned with its length in `unit`.
pub fn draw_scale_bars(
    canvas: &mut RgbImage,
    image_height: u32,
    units_per_pixel: f64,
    unit: &str,
    font: &impl Font,
) {
    let mid_x = canvas.width() as f64 / 2.0;
    let y_long = (image_height + SCALE_BAR_OFFSET) as i64;
    let y_short = y_long + SCALE_BAR_GAP as i64;
    let thickness = SCALE_BAR_THICKNESS as i64;

    for (length, y) in [(SCALE_BAR_LONG, y_long), (SCALE_BAR_SHORT, y_short)] {
        let bar_px = length / units_per_pixel;
        let x0 = (mid_x - bar_px / 2.0) as i64;
        let x1 = x0 + bar_px.round() as i64;
        let top = y - thickness / 2;
        fill_span(canvas, x0, top, x1, top + thickness, BLACK);

        draw_text_mut(
            canvas,
            BLACK,
            (x1 + SCALE_CAPTION_GAP as i64) as i32,
            (y - (SCALE_CAPTION_SIZE / 2.0) as i64) as i32,
            SCALE_CAPTION_SIZE,
            font,
            &format!("{length} {unit}"),
        );
    }
}

/// Print `lines` centered in the label band below the scale bars.
pub fn draw_label_text(
    canvas: &mut RgbImage,
    image_height: u32,
    lines: &[String],
    font: &impl Font,
) {
    let first = image_height + SCALE_BAR_OFFSET + SCALE_BAR_GAP + LABEL_TEXT_OFFSET;
    let width = canvas.width() as i32;

    for (i, line) in lines.iter().enumerate() {
        let (offset, size) = line_layout(i);
        let scale = PxScale::from(size);
        let (text_width, _) = text_size(scale, font, line);
        let x = (width - text_width as i32) / 2;
        draw_text_mut(canvas, BLACK, x, (first + offset) as i32, scale, font, line);
    }
}

/// Vertical offset and font size of label line `index`.
fn line_layout(index: usize) -> (u32, f32) {
    if index < LABEL_HEADING_LINES {
        (index as u32 * LABEL_HEADING_SPACING, LABEL_HEADING_SIZE)
    } else {
        let body = (index - LABEL_HEADING_LINES) as u32;
        (LABEL_BODY_START + body * LABEL_BODY_SPACING, LABEL_BODY_SIZE)
    }
}

/// Outline every box in red on a copy of `image` and number it from 1.
pub fn draw_bounding_boxes(
    image: &DynamicImage,
    boxes: &[BoundingBox],
    font: &impl Font,
) -> RgbImage {
    let mut canvas = image.to_rgb8();
    let half = OVERVIEW_OUTLINE_THICKNESS as i64 / 2;

    for (i, b) in boxes.iter().enumerate() {
        let (top, left) = (b.top as i64, b.left as i64);
        let (bottom, right) = (b.bottom as i64, b.right as i64);
        fill_span(&mut canvas, left - half, top - half, right + half, top + half, RED);
        fill_span(&mut canvas, left - half, bottom - half, right + half, bottom + half, RED);
        fill_span(&mut canvas, left - half, top - half, left + half, bottom + half, RED);
        fill_span(&mut canvas, right - half, top - half, right + half, bottom + half, RED);

        draw_text_mut(
            &mut canvas,
            RED,
            (right + OBJECT_INDEX_OFFSET as i64) as i32,
            bottom as i32,
            OBJECT_INDEX_SIZE,
            font,
            &(i + 1).to_string(),
        );
    }

    canvas
}

/// Text lines describing an output image, printed in its label band and
/// stored as image metadata.
pub fn image_label(run: &RunConfig, description: &str, file_name: &str) -> Vec<String> {
    let meta = &run.metadata;
    let mut lines = vec![
        description.to_string(),
        format!("Catalog: {} {}", meta.catalog_prefix, run.unique_id),
        format!("Source: {}", meta.source),
        format!("Age: {}", meta.age),
        format!("Location: {}", meta.location),
    ];
    if let Some(author) = &meta.author {
        lines.push(format!("Imaged by: {author}"));
    }
    if let Some(calibration) = &run.calibration {
        lines.push(format!(
            "Scale: {} {} per pixel",
            calibration.units_per_pixel, meta.unit
        ));
    }
    lines.push(format!("File: {file_name}"));
    lines
}

/// Fill the half-open span `[x0, x1) x [y0, y1)`; imageproc clips it to the canvas.
fn fill_span(canvas: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let rect = Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32);
    draw_filled_rect_mut(canvas, rect, color);
}
