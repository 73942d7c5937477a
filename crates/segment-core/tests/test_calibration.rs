use approx::assert_abs_diff_eq;
use image::DynamicImage;

use segment_core::calibration::xml::parse_calibration_xml;
use segment_core::calibration::{
    read_calibration_xml, resize, resize_calibrated, scaled_dimensions, Calibration,
};
use segment_core::error::SegmentError;

const SIDECAR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ImageMetadata version="2">
  <Acquisition>
    <Objective>5x</Objective>
  </Acquisition>
  <Calibration units="microns">
    <MicronsPerPixelX>1.02</MicronsPerPixelX>
    <MicronsPerPixelY>1.26</MicronsPerPixelY>
  </Calibration>
</ImageMetadata>
"#;

// ---------------------------------------------------------------------------
// Sidecar parsing
// ---------------------------------------------------------------------------

#[test]
fn test_parse_sidecar() {
    let (x, y) = parse_calibration_xml(SIDECAR).unwrap().unwrap();
    assert_abs_diff_eq!(x, 1.02, epsilon = 1e-12);
    assert_abs_diff_eq!(y, 1.26, epsilon = 1e-12);
}

#[test]
fn test_parse_sidecar_without_calibration() {
    let xml = "<ImageMetadata><Acquisition/></ImageMetadata>";
    assert_eq!(parse_calibration_xml(xml).unwrap(), None);
}

#[test]
fn test_parse_sidecar_missing_axis() {
    let xml = "<Calibration><MicronsPerPixelX>1.0</MicronsPerPixelX></Calibration>";
    assert!(matches!(
        parse_calibration_xml(xml),
        Err(SegmentError::Calibration(_))
    ));
}

#[test]
fn test_parse_sidecar_bad_number() {
    let xml = "<Calibration>\
        <MicronsPerPixelX>wide</MicronsPerPixelX>\
        <MicronsPerPixelY>1.0</MicronsPerPixelY>\
        </Calibration>";
    assert!(matches!(
        parse_calibration_xml(xml),
        Err(SegmentError::Calibration(_))
    ));
}

#[test]
fn test_first_calibration_element_wins() {
    let xml = "<Root>\
        <Calibration><MicronsPerPixelX>2.0</MicronsPerPixelX><MicronsPerPixelY>3.0</MicronsPerPixelY></Calibration>\
        <Calibration><MicronsPerPixelX>9.0</MicronsPerPixelX><MicronsPerPixelY>9.0</MicronsPerPixelY></Calibration>\
        </Root>";
    assert_eq!(parse_calibration_xml(xml).unwrap(), Some((2.0, 3.0)));
}

#[test]
fn test_read_sidecar_next_to_image() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("stack_top.tif");
    std::fs::write(dir.path().join("stack_top.xml"), SIDECAR).unwrap();

    let calibration = read_calibration_xml(&image_path).unwrap();
    assert_abs_diff_eq!(calibration.pixel_size_x, 1.02, epsilon = 1e-12);
    assert_abs_diff_eq!(calibration.units_per_pixel, 1.3, epsilon = 1e-12);
}

#[test]
fn test_missing_sidecar_is_calibration_missing() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("stack_top.tif");

    let err = read_calibration_xml(&image_path).unwrap_err();
    assert!(matches!(err, SegmentError::CalibrationMissing(p) if p == image_path));
}

// ---------------------------------------------------------------------------
// Calibration and rescaling
// ---------------------------------------------------------------------------

#[test]
fn test_calibration_rounds_y_pixel_size() {
    let calibration = Calibration::from_pixel_size(1.02, 1.26).unwrap();
    assert_abs_diff_eq!(calibration.units_per_pixel, 1.3, epsilon = 1e-12);
    assert_abs_diff_eq!(calibration.to_pixels(13.0), 10.0, epsilon = 1e-9);
}

#[test]
fn test_calibration_rejects_non_positive() {
    assert!(Calibration::from_pixel_size(0.0, 1.0).is_err());
    assert!(Calibration::from_pixel_size(1.0, f64::NAN).is_err());
}

#[test]
fn test_scaled_dimensions_identity() {
    assert_eq!(scaled_dimensions(100, 50, 1.0, 1.0, 1.0), (100, 50));
    assert_eq!(scaled_dimensions(100, 50, 2.0, 2.0, 2.0), (100, 50));
}

#[test]
fn test_scaled_dimensions_round_up_per_axis() {
    // 10 * 1.3 / 1.02 = 12.75 and 10 * 1.3 / 1.26 = 10.32.
    assert_eq!(scaled_dimensions(10, 10, 1.02, 1.26, 1.3), (13, 11));
}

#[test]
fn test_resize_produces_scaled_image() {
    let image = DynamicImage::new_rgb8(10, 10);
    let resized = resize(&image, 1.02, 1.26, 1.3).unwrap();
    assert_eq!((resized.width(), resized.height()), (13, 11));
    // Input untouched.
    assert_eq!((image.width(), image.height()), (10, 10));
}

#[test]
fn test_resize_calibrated_identity() {
    let image = DynamicImage::new_luma8(7, 5);
    let calibration = Calibration::from_pixel_size(1.0, 1.0).unwrap();
    let resized = resize_calibrated(&image, &calibration).unwrap();
    assert_eq!(resized, image);
}

#[test]
fn test_resize_to_nothing_rejected() {
    let image = DynamicImage::new_rgb8(0, 4);
    assert!(matches!(
        resize(&image, 1.0, 1.0, 1.0),
        Err(SegmentError::InvalidDimensions { .. })
    ));
}
