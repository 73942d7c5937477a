use std::path::{Path, PathBuf};

use ab_glyph::FontRef;
use image::DynamicImage;
use tracing::{debug, info};

use crate::calibration::Calibration;
use crate::detection::Mask;
use crate::error::Result;
use crate::frame::BoundingBox;
use crate::io::{
    add_label_area, crop, draw_bounding_boxes, draw_label_text, draw_scale_bars, image_label,
    label_font, load_scaled, save_image, save_mask_png,
};
use crate::settings::RunConfig;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn output_path(run: &RunConfig, stem: &str) -> PathBuf {
    run.output.join(format!("{stem}.{}", run.output_ext))
}

/// Crop one object and give it a label band with scale bars and `label`.
fn annotated_crop(
    image: &DynamicImage,
    bbox: &BoundingBox,
    calibration: &Calibration,
    run: &RunConfig,
    label: &[String],
    font: &FontRef<'_>,
) -> Result<DynamicImage> {
    let cropped = crop(image, bbox)?;
    let height = cropped.height();
    let mut canvas = add_label_area(&cropped);
    draw_scale_bars(
        &mut canvas,
        height,
        calibration.units_per_pixel,
        &run.metadata.unit,
        font,
    );
    draw_label_text(&mut canvas, height, label, font);
    Ok(DynamicImage::ImageRgb8(canvas))
}

/// Top image with every object outlined.
pub fn save_overview(
    top: &DynamicImage,
    objects: &[BoundingBox],
    top_path: &Path,
    run: &RunConfig,
) -> Result<PathBuf> {
    let font = label_font()?;
    let overview = DynamicImage::ImageRgb8(draw_bounding_boxes(top, objects, &font));
    let path = output_path(
        run,
        &format!("{}_overview_th={:06.4}", run.unique_id, run.threshold),
    );
    let label = image_label(
        run,
        &format!("Overview: {} objects", objects.len()),
        &file_name(top_path),
    );
    save_image(&overview, &path, &label.join("\n"))?;
    info!(file = %path.display(), "Overview saved");
    Ok(path)
}

/// Binarized top image, written when debugging at the highest level.
pub fn save_debug_mask(mask: &Mask, run: &RunConfig) -> Result<PathBuf> {
    let path = run.output.join(format!("mask_th={:06.4}.png", run.threshold));
    save_mask_png(mask, &path)?;
    debug!(file = %path.display(), "Mask saved");
    Ok(path)
}

/// Sample mode: every object cropped from the top image.
pub fn save_samples(
    top: &DynamicImage,
    objects: &[BoundingBox],
    top_path: &Path,
    run: &RunConfig,
) -> Result<Vec<PathBuf>> {
    let calibration = run.calibration()?;
    let font = label_font()?;
    let source = file_name(top_path);
    let mut written = Vec::with_capacity(objects.len());

    for (i, bbox) in objects.iter().enumerate() {
        let description = format!("Object {} of {}", i + 1, objects.len());
        let label = image_label(run, &description, &source);
        let image = annotated_crop(top, bbox, calibration, run, &label, &font)?;
        let path = output_path(
            run,
            &format!("{}_obj{:02}_{}", run.unique_id, i + 1, run.file_label()),
        );
        save_image(&image, &path, &label.join("\n"))?;
        written.push(path);
    }

    info!(count = written.len(), "Sample crops saved");
    Ok(written)
}

/// Record of the settings used for final output.
pub fn save_run_settings(run: &RunConfig) -> Result<PathBuf> {
    let path = run
        .output
        .join(format!("settings_th={:06.4}.toml", run.threshold));
    std::fs::write(&path, run.to_toml()?)?;
    info!(file = %path.display(), "Settings saved");
    Ok(path)
}

/// Final mode: every object cropped from every focal plane.
pub fn save_planes(
    planes: &[PathBuf],
    objects: &[BoundingBox],
    run: &RunConfig,
) -> Result<Vec<PathBuf>> {
    let calibration = run.calibration()?;
    let font = label_font()?;
    let mut written = Vec::with_capacity(planes.len() * objects.len());

    for (plane_num, plane_path) in planes.iter().enumerate() {
        let plane = load_scaled(plane_path, calibration)?;
        let source = file_name(plane_path);

        for (i, bbox) in objects.iter().enumerate() {
            let description = format!(
                "Object {} of {}, plane {}",
                i + 1,
                objects.len(),
                plane_num + 1
            );
            let label = image_label(run, &description, &source);
            let image = annotated_crop(&plane, bbox, calibration, run, &label, &font)?;
            let path = output_path(
                run,
                &format!("{}_obj{:02}_plane{:02}", run.unique_id, i + 1, plane_num + 1),
            );
            save_image(&image, &path, &label.join("\n"))?;
            written.push(path);
        }
        debug!(plane = plane_num + 1, "Plane cropped");
    }

    info!(
        planes = planes.len(),
        count = written.len(),
        "Plane crops saved"
    );
    Ok(written)
}
