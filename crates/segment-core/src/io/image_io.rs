use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;
use tracing::{debug, info};

use crate::calibration::{resize_calibrated, Calibration};
use crate::detection::Mask;
use crate::error::{Result, SegmentError};

/// All files in `directory` with the given extension (case-insensitive),
/// sorted by name. The last entry is the top image of the stack.
pub fn list_images(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(SegmentError::NoImages {
            directory: directory.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    info!(count = files.len(), directory = %directory.display(), "Found images");
    Ok(files)
}

/// Load any supported image file.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    Ok(image::open(path)?)
}

/// Load an image and rescale it to the run's working resolution.
pub fn load_scaled(path: &Path, calibration: &Calibration) -> Result<DynamicImage> {
    let start = Instant::now();
    let image = load_image(path)?;
    let scaled = resize_calibrated(&image, calibration)?;
    info!(
        file = %path.display(),
        seconds = start.elapsed().as_secs_f64(),
        "Image loaded"
    );
    Ok(scaled)
}

/// Save an 8-bit RGB TIFF with `description` in its ImageDescription tag.
pub fn save_tiff_with_description(
    image: &DynamicImage,
    path: &Path,
    description: &str,
) -> Result<()> {
    let rgb = image.to_rgb8();
    let (w, h) = rgb.dimensions();

    let description = ascii_description(description);
    let mut writer = BufWriter::new(File::create(path)?);
    {
        let mut encoder = TiffEncoder::new(&mut writer)?;
        let mut tiff_image = encoder.new_image::<colortype::RGB8>(w, h)?;
        tiff_image
            .encoder()
            .write_tag(Tag::ImageDescription, description.as_str())?;
        tiff_image.write_data(rgb.as_raw())?;
    }
    writer.flush()?;

    debug!(file = %path.display(), "TIFF written");
    Ok(())
}

/// Save an image, choosing the format from the file extension. TIFF output
/// carries `description` as metadata; other formats drop it.
pub fn save_image(image: &DynamicImage, path: &Path, description: &str) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff") => {
            save_tiff_with_description(image, path, description)
        }
        _ => {
            image.to_rgb8().save(path)?;
            Ok(())
        }
    }
}

/// Save a mask as an 8-bit PNG: foreground white, background black.
pub fn save_mask_png(mask: &Mask, path: &Path) -> Result<()> {
    let (h, w) = mask.dim();
    let mut img = GrayImage::new(w as u32, h as u32);
    for ((row, col), &fg) in mask.indexed_iter() {
        img.put_pixel(col as u32, row as u32, Luma([if fg { 255 } else { 0 }]));
    }
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// TIFF ASCII fields must be 7-bit and NUL-free.
fn ascii_description(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && c != '\0' { c } else { '?' })
        .collect()
}
