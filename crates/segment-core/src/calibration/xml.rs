use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::info;

use crate::error::{Result, SegmentError};

use super::Calibration;

const CALIBRATION_TAG: &[u8] = b"Calibration";
const PIXEL_SIZE_X_TAG: &[u8] = b"MicronsPerPixelX";
const PIXEL_SIZE_Y_TAG: &[u8] = b"MicronsPerPixelY";

/// The calibration sidecar sitting next to an image: same stem, `.xml`.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("xml")
}

/// Read the physical pixel size recorded by the acquisition software for
/// `image_path` and derive the run calibration from it.
pub fn read_calibration_xml(image_path: &Path) -> Result<Calibration> {
    let path = sidecar_path(image_path);
    let xml = match std::fs::read_to_string(&path) {
        Ok(xml) => xml,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SegmentError::CalibrationMissing(image_path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let (x, y) = parse_calibration_xml(&xml)?
        .ok_or_else(|| SegmentError::CalibrationMissing(image_path.to_path_buf()))?;
    info!(sidecar = %path.display(), x, y, "Pixel size read from calibration sidecar");
    Calibration::from_pixel_size(x, y)
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    X,
    Y,
}

/// Extract `(MicronsPerPixelX, MicronsPerPixelY)` from the first
/// `Calibration` element. Returns `None` when there is no such element.
pub fn parse_calibration_xml(xml: &str) -> Result<Option<(f64, f64)>> {
    let mut reader = Reader::from_str(xml);
    let mut in_calibration = false;
    let mut found_calibration = false;
    let mut field: Option<Field> = None;
    let mut text = String::new();
    let mut x: Option<f64> = None;
    let mut y: Option<f64> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = e.name();
                if !in_calibration && name.as_ref() == CALIBRATION_TAG {
                    in_calibration = true;
                    found_calibration = true;
                } else if in_calibration && name.as_ref() == PIXEL_SIZE_X_TAG {
                    field = Some(Field::X);
                    text.clear();
                } else if in_calibration && name.as_ref() == PIXEL_SIZE_Y_TAG {
                    field = Some(Field::Y);
                    text.clear();
                }
            }
            Event::Empty(ref e) if !in_calibration && e.name().as_ref() == CALIBRATION_TAG => {
                found_calibration = true;
                break;
            }
            Event::Text(ref t) if field.is_some() => {
                let chunk = t
                    .unescape()
                    .map_err(|e| SegmentError::Calibration(e.to_string()))?;
                text.push_str(&chunk);
            }
            Event::End(ref e) => {
                let name = e.name();
                if let Some(current) = field {
                    if name.as_ref() == PIXEL_SIZE_X_TAG || name.as_ref() == PIXEL_SIZE_Y_TAG {
                        let value = parse_pixel_size(&text)?;
                        match current {
                            Field::X => x = Some(value),
                            Field::Y => y = Some(value),
                        }
                        field = None;
                    }
                } else if in_calibration && name.as_ref() == CALIBRATION_TAG {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !found_calibration {
        return Ok(None);
    }

    match (x, y) {
        (Some(x), Some(y)) => Ok(Some((x, y))),
        _ => Err(SegmentError::Calibration(
            "Calibration element lacks MicronsPerPixelX/MicronsPerPixelY".into(),
        )),
    }
}

fn parse_pixel_size(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| SegmentError::Calibration(format!("'{}' is not a pixel size", text.trim())))
}
