mod common;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use tiff::decoder::Decoder;
use tiff::tags::Tag;

use common::{rgb_with_squares, write_settings, Square};
use segment_core::error::SegmentError;
use segment_core::frame::BoundingBox;
use segment_core::pipeline::{
    focal_planes, run_settings, run_settings_file, run_settings_reported, PipelineStage,
    ProgressReporter, RunOutcome,
};
use segment_core::settings::parse_settings;

const STACK: &str = "SPEC123_stack";
const OBJECT: Square = (20, 20, 30);

/// A four-file stack: two focal planes, the companion, then the top image.
fn write_stack(root: &Path, squares: &[Square]) -> PathBuf {
    let stack = root.join(STACK);
    std::fs::create_dir_all(&stack).unwrap();
    for i in 0..4 {
        rgb_with_squares(100, 100, squares)
            .save(stack.join(format!("stack_{i:02}.png")))
            .unwrap();
    }
    stack
}

fn settings_text(stack: &Path, output: &Path, extra: &str) -> String {
    format!(
        "directory = {}\n\
         output = {}\n\
         threshold = 0.5\n\
         minimumSize = 10\n\
         maximumSize = 100\n\
         input_ext = png\n\
         output_ext = png\n\
         {extra}",
        stack.display(),
        output.display()
    )
}

const CALIBRATED: &str = "pixel_size_x = 1.0\npixel_size_y = 1.0\n";

fn setup(squares: &[Square], extra: &str) -> (TempDir, PathBuf, String) {
    let dir = tempfile::tempdir().unwrap();
    let stack = write_stack(dir.path(), squares);
    let output = dir.path().join("out");
    let text = settings_text(&stack, &output, extra);
    (dir, output, text)
}

fn names(files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

// ---------------------------------------------------------------------------
// Sample mode
// ---------------------------------------------------------------------------

#[test]
fn test_sample_mode_writes_overview_and_crops() {
    let (_dir, output, text) = setup(&[OBJECT], CALIBRATED);
    let reports = run_settings(&parse_settings(&text).unwrap()).unwrap();

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.regions, 1);
    assert_eq!(report.objects, vec![BoundingBox::new(14, 14, 56, 56)]);
    assert_eq!(
        names(&report.files),
        vec![
            "SPEC123_overview_th=0.5000.png",
            "SPEC123_obj01_th=0.5000_size=0010u-0100u.png",
        ]
    );

    let run_dir = output.join(STACK).join("sample");
    for file in &report.files {
        assert!(file.starts_with(&run_dir));
        assert!(file.exists());
    }

    // 42x42 crop plus the label band.
    let crop = image::open(&report.files[1]).unwrap();
    assert_eq!((crop.width(), crop.height()), (42, 42 + 160));
    // Label lines are printed below the scale bars.
    let band = crop.to_rgb8();
    assert!((42 + 35..42 + 160)
        .flat_map(|y| (0..42).map(move |x| (x, y)))
        .any(|(x, y)| band.get_pixel(x, y).0[0] < 128));
    let overview = image::open(&report.files[0]).unwrap().to_rgb8();
    assert_eq!(overview.dimensions(), (100, 100));
    assert_eq!(overview.get_pixel(14, 35).0, [255, 0, 0]);
}

#[test]
fn test_sample_tiff_carries_description() {
    let (_dir, _output, text) = setup(&[OBJECT], &format!("{CALIBRATED}output_ext = tif\n"));
    let reports = run_settings(&parse_settings(&text).unwrap()).unwrap();

    let crop = &reports[0].files[1];
    assert_eq!(crop.extension().unwrap(), "tif");

    let mut decoder = Decoder::new(File::open(crop).unwrap()).unwrap();
    assert_eq!(decoder.dimensions().unwrap(), (42, 202));
    let description = decoder.get_tag_ascii_string(Tag::ImageDescription).unwrap();
    assert!(description.contains("Object 1 of 1"));
    assert!(description.contains("Catalog: YPM IP SPEC123"));
    assert!(description.contains("File: stack_03.png"));
}

#[test]
fn test_threshold_range_runs_each_value() {
    let (_dir, _output, text) = setup(&[OBJECT], CALIBRATED);
    let text = text.replace("threshold = 0.5", "threshold = 0.25-0.75-0.25");
    let reports = run_settings(&parse_settings(&text).unwrap()).unwrap();

    let thresholds: Vec<f64> = reports.iter().map(|r| r.threshold).collect();
    assert_eq!(thresholds, vec![0.25, 0.5]);
    assert!(reports.iter().all(|r| r.outcome == RunOutcome::Completed));
    assert_eq!(reports[0].objects, reports[1].objects);
    assert!(names(&reports[0].files).contains(&"SPEC123_overview_th=0.2500.png".to_string()));
}

#[test]
fn test_no_objects_still_writes_overview() {
    let (_dir, _output, text) = setup(&[], CALIBRATED);
    let reports = run_settings(&parse_settings(&text).unwrap()).unwrap();

    let report = &reports[0];
    assert_eq!(report.outcome, RunOutcome::NoObjects);
    assert!(report.objects.is_empty());
    assert_eq!(names(&report.files), vec!["SPEC123_overview_th=0.5000.png"]);
    assert!(!report.is_failure());
}

#[test]
fn test_debug_high_writes_mask() {
    let (_dir, _output, text) = setup(&[OBJECT], &format!("{CALIBRATED}debug = high\n"));
    let reports = run_settings(&parse_settings(&text).unwrap()).unwrap();

    let files = names(&reports[0].files);
    assert_eq!(files[0], "mask_th=0.5000.png");
    let mask = image::open(&reports[0].files[0]).unwrap().to_luma8();
    assert_eq!(mask.get_pixel(30, 30).0, [255]);
    assert_eq!(mask.get_pixel(5, 5).0, [0]);
}

// ---------------------------------------------------------------------------
// Final mode
// ---------------------------------------------------------------------------

#[test]
fn test_final_mode_crops_every_plane() {
    let (_dir, output, text) = setup(&[OBJECT], &format!("{CALIBRATED}mode = final\n"));
    let reports = run_settings(&parse_settings(&text).unwrap()).unwrap();

    let report = &reports[0];
    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(
        names(&report.files),
        vec![
            "SPEC123_overview_th=0.5000.png",
            "settings_th=0.5000.toml",
            "SPEC123_obj01_plane01.png",
            "SPEC123_obj01_plane02.png",
        ]
    );
    assert!(report.files.iter().all(|f| f.starts_with(output.join(STACK).join("final"))));

    let toml = std::fs::read_to_string(&report.files[1]).unwrap();
    assert!(toml.contains("mode = \"final\""));
}

#[test]
fn test_focal_planes_skip_trailing_files() {
    let images: Vec<PathBuf> = (0..5).map(|i| PathBuf::from(format!("p{i}.tif"))).collect();
    assert_eq!(focal_planes(&images), &images[..3]);
    assert!(focal_planes(&images[..2]).is_empty());
    assert!(focal_planes(&images[..1]).is_empty());
}

// ---------------------------------------------------------------------------
// Calibration and failures
// ---------------------------------------------------------------------------

#[test]
fn test_calibration_from_sidecar() {
    let (dir, _output, text) = setup(&[OBJECT], "");
    std::fs::write(
        dir.path().join(STACK).join("stack_03.xml"),
        "<Calibration><MicronsPerPixelX>1.0</MicronsPerPixelX>\
         <MicronsPerPixelY>1.0</MicronsPerPixelY></Calibration>",
    )
    .unwrap();

    let reports = run_settings(&parse_settings(&text).unwrap()).unwrap();
    assert_eq!(reports[0].outcome, RunOutcome::Completed);
    assert_eq!(reports[0].objects.len(), 1);
}

#[test]
fn test_missing_calibration_fails_every_run() {
    let (_dir, output, text) = setup(&[OBJECT], "threshold = 0.25-0.75-0.25\n");
    let reports = run_settings(&parse_settings(&text).unwrap()).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.is_failure()));
    assert!(!output.exists());
}

#[test]
fn test_empty_stack_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let stack = dir.path().join(STACK);
    std::fs::create_dir_all(&stack).unwrap();
    let text = settings_text(&stack, &dir.path().join("out"), CALIBRATED);

    let err = run_settings(&parse_settings(&text).unwrap()).unwrap_err();
    assert!(matches!(err, SegmentError::NoImages { .. }));
}

#[test]
fn test_run_from_settings_file() {
    let (dir, _output, text) = setup(&[OBJECT], CALIBRATED);
    let path = write_settings(dir.path(), &text);

    #[derive(Default)]
    struct Counting {
        stages: AtomicUsize,
    }
    impl ProgressReporter for Counting {
        fn begin_stage(&self, _stage: PipelineStage, _total: Option<usize>) {
            self.stages.fetch_add(1, Ordering::Relaxed);
        }
    }

    let reporter = Arc::new(Counting::default());
    let reports = run_settings_file(&path, reporter.clone()).unwrap();
    assert_eq!(reports[0].outcome, RunOutcome::Completed);
    assert_eq!(reporter.stages.load(Ordering::Relaxed), 3);

    // Same settings through the reported entry point give the same objects.
    let again = run_settings_reported(&parse_settings(&text).unwrap(), reporter).unwrap();
    assert_eq!(again[0].objects, reports[0].objects);
}
