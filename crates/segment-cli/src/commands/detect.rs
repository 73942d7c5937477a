use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use segment_core::calibration::{read_calibration_xml, Calibration};
use segment_core::detection::segment;
use segment_core::frame::Frame;
use segment_core::io::load_scaled;
use segment_core::settings::{RunConfig, Settings, ThresholdSpec};

#[derive(Args)]
pub struct DetectArgs {
    /// Input image (the top, fully focused plane)
    pub image: PathBuf,

    /// Binarization threshold in [0.0, 1.0]
    #[arg(short, long, default_value = "0.2")]
    pub threshold: f64,

    /// Smallest object size in microns
    #[arg(long, default_value = "100")]
    pub min_size: f64,

    /// Largest object size in microns
    #[arg(long, default_value = "2000")]
    pub max_size: f64,

    /// Microns per source pixel along X (read from the XML sidecar if omitted)
    #[arg(long, requires = "pixel_size_y")]
    pub pixel_size_x: Option<f64>,

    /// Microns per source pixel along Y
    #[arg(long, requires = "pixel_size_x")]
    pub pixel_size_y: Option<f64>,
}

pub fn run(args: &DetectArgs) -> Result<()> {
    let directory = args
        .image
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let threshold = ThresholdSpec::Single(args.threshold);
    threshold.validate()?;

    let mut settings = Settings::new(directory, ".");
    settings.threshold = threshold;
    settings.minimum_size = args.min_size;
    settings.maximum_size = args.max_size;

    let calibration = match (args.pixel_size_x, args.pixel_size_y) {
        (Some(x), Some(y)) => Calibration::from_pixel_size(x, y)?,
        _ => read_calibration_xml(&args.image).with_context(|| {
            format!(
                "No --pixel-size-x/--pixel-size-y and no sidecar for {}",
                args.image.display()
            )
        })?,
    };
    let run = RunConfig::from_settings(&settings)?.with_calibration(calibration);

    let image = load_scaled(&args.image, &calibration)
        .with_context(|| format!("Failed to load {}", args.image.display()))?;
    let segmentation = segment(&Frame::from_image(&image), &run)?;

    println!(
        "{}: {}x{} at {} units/pixel, threshold {:.4}",
        args.image.display(),
        image.width(),
        image.height(),
        calibration.units_per_pixel,
        run.threshold
    );
    println!(
        "{} regions, {} objects",
        segmentation.regions,
        segmentation.objects.len()
    );
    for (i, b) in segmentation.objects.iter().enumerate() {
        println!(
            "  {:>3}. top={} left={} bottom={} right={} ({}x{})",
            i + 1,
            b.top,
            b.left,
            b.bottom,
            b.right,
            b.width(),
            b.height()
        );
    }
    Ok(())
}
