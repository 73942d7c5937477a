use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;
use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::calibration::{read_calibration_xml, Calibration};
use crate::consts::{NON_PLANE_TRAILING_FILES, PARALLEL_RUN_THRESHOLD};
use crate::detection::{segment, Segmentation};
use crate::error::{Result, SegmentError};
use crate::frame::Frame;
use crate::io::{list_images, load_scaled};
use crate::settings::{DebugLevel, Mode, RunConfig, Settings};

use super::output::{save_debug_mask, save_overview, save_planes, save_run_settings, save_samples};
use super::types::{NoOpReporter, PipelineStage, ProgressReporter, RunOutcome, RunReport};

/// Parse a settings file and process every run it expands to.
pub fn run_settings_file(
    path: &Path,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<Vec<RunReport>> {
    let settings = Settings::load(path)?;
    run_settings_reported(&settings, reporter)
}

/// Process every run of a settings file.
pub fn run_settings(settings: &Settings) -> Result<Vec<RunReport>> {
    run_settings_reported(settings, Arc::new(NoOpReporter))
}

/// Process every run of a settings file with a thread-safe progress reporter.
///
/// Settings errors abort before any image is read. Calibration and output
/// errors fail only the affected runs and are recorded in their reports.
pub fn run_settings_reported(
    settings: &Settings,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<Vec<RunReport>> {
    let runs = settings.permutations()?;
    let images = list_images(&settings.directory, &settings.input_ext)?;
    let Some(top_path) = images.last().cloned() else {
        return Err(SegmentError::NoImages {
            directory: settings.directory.clone(),
            extension: settings.input_ext.clone(),
        });
    };
    info!(
        runs = runs.len(),
        top = %top_path.display(),
        mode = %settings.mode,
        "Starting segmentation"
    );

    let calibration = match resolve_calibration(&runs[0], &top_path) {
        Ok(calibration) => calibration,
        Err(e @ SegmentError::CalibrationMissing(_)) | Err(e @ SegmentError::Calibration(_)) => {
            error!(error = %e, "Cannot calibrate runs");
            let message = e.to_string();
            return Ok(runs
                .iter()
                .map(|run| RunReport::failed(run.threshold, message.clone()))
                .collect());
        }
        Err(e) => return Err(e),
    };
    let runs: Vec<RunConfig> = runs
        .iter()
        .map(|run| run.with_calibration(calibration))
        .collect();

    reporter.begin_stage(PipelineStage::Loading, Some(1));
    let top_image = load_scaled(&top_path, &calibration)?;
    let top_frame = Frame::from_image(&top_image);
    reporter.advance(1);
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Detecting, Some(runs.len()));
    let segmentations = detect_all(&runs, &top_frame);
    reporter.advance(runs.len());
    reporter.finish_stage();

    let planes = focal_planes(&images);
    reporter.begin_stage(PipelineStage::Writing, Some(runs.len()));
    let mut reports = Vec::with_capacity(runs.len());
    for (i, (run, segmentation)) in runs.iter().zip(segmentations).enumerate() {
        info!(
            run = i + 1,
            of = runs.len(),
            threshold = run.threshold,
            "Writing run"
        );
        let written = segmentation.and_then(|s| write_run(run, s, &top_image, &top_path, planes));
        let report = match written {
            Ok(report) => report,
            Err(e) => {
                error!(threshold = run.threshold, error = %e, "Run failed");
                RunReport::failed(run.threshold, e.to_string())
            }
        };
        reports.push(report);
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    Ok(reports)
}

/// Pixel size from the settings, else from the top image's XML sidecar.
fn resolve_calibration(run: &RunConfig, top_path: &Path) -> Result<Calibration> {
    match run.calibration {
        Some(calibration) => Ok(calibration),
        None => {
            info!("No pixel size in settings, reading calibration sidecar");
            read_calibration_xml(top_path)
        }
    }
}

/// Run detection for every configuration against the shared top frame.
pub fn detect_all(runs: &[RunConfig], top: &Frame) -> Vec<Result<Segmentation>> {
    if runs.len() >= PARALLEL_RUN_THRESHOLD {
        runs.par_iter().map(|run| segment(top, run)).collect()
    } else {
        runs.iter().map(|run| segment(top, run)).collect()
    }
}

/// Stack files that are focal planes: all but the trailing top image and
/// its companion.
pub fn focal_planes(images: &[PathBuf]) -> &[PathBuf] {
    let end = images.len().saturating_sub(NON_PLANE_TRAILING_FILES);
    &images[..end]
}

fn write_run(
    run: &RunConfig,
    segmentation: Segmentation,
    top_image: &DynamicImage,
    top_path: &Path,
    planes: &[PathBuf],
) -> Result<RunReport> {
    std::fs::create_dir_all(&run.output)?;
    let mut files = Vec::new();

    if run.debug >= DebugLevel::High {
        files.push(save_debug_mask(&segmentation.mask, run)?);
    }

    let objects = segmentation.objects;
    files.push(save_overview(top_image, &objects, top_path, run)?);

    if objects.is_empty() {
        let e = SegmentError::NoObjectsFound {
            threshold: run.threshold,
        };
        warn!(regions = segmentation.regions, "{e}");
        return Ok(RunReport {
            threshold: run.threshold,
            regions: segmentation.regions,
            objects,
            files,
            outcome: RunOutcome::NoObjects,
        });
    }

    match run.mode {
        Mode::Sample => {
            files.extend(save_samples(top_image, &objects, top_path, run)?);
        }
        Mode::Final => {
            files.push(save_run_settings(run)?);
            files.extend(save_planes(planes, &objects, run)?);
        }
    }

    Ok(RunReport {
        threshold: run.threshold,
        regions: segmentation.regions,
        objects,
        files,
        outcome: RunOutcome::Completed,
    })
}
