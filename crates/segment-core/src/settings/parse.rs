use std::collections::HashMap;

use tracing::warn;

use crate::error::{Result, SegmentError};

use super::{Settings, ThresholdSpec};

/// Keys recognized in a settings file, lowercased.
const KNOWN_KEYS: &[&str] = &[
    "directory",
    "output",
    "threshold",
    "minimumsize",
    "maximumsize",
    "mode",
    "debug",
    "input_ext",
    "output_ext",
    "pixel_size_x",
    "pixel_size_y",
    "source",
    "age",
    "location",
    "catalog_prefix",
    "unit",
    "author",
];

/// Split settings text into `key -> value` pairs.
///
/// Keys are case-insensitive. Blank lines, `#`/`;` comments and section
/// headers are skipped; `:` works as well as `=`. A key with no value is
/// recorded as empty. Later keys override earlier ones.
pub fn parse_key_values(text: &str) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            continue;
        }

        let (key, value) = match line.find(['=', ':']) {
            Some(pos) => (&line[..pos], &line[pos + 1..]),
            None => (line, ""),
        };
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(SegmentError::Config(format!(
                "line {}: missing key in '{line}'",
                idx + 1
            )));
        }
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn!(key = %key, line = idx + 1, "Ignoring unknown setting");
            continue;
        }
        values.insert(key, value.trim().to_string());
    }

    Ok(values)
}

/// Parse settings text into a validated [`Settings`].
pub fn parse_settings(text: &str) -> Result<Settings> {
    let values = parse_key_values(text)?;
    let get = |key: &str| values.get(key).map(String::as_str).filter(|v| !v.is_empty());

    let directory = get("directory").ok_or(SegmentError::MissingSetting("directory"))?;
    let output = get("output").ok_or(SegmentError::MissingSetting("output"))?;
    let mut settings = Settings::new(directory, output);

    if let Some(v) = get("threshold") {
        settings.threshold = ThresholdSpec::parse(v)?;
    }
    if let Some(v) = get("minimumsize") {
        settings.minimum_size = parse_number("minimumSize", v)?;
    }
    if let Some(v) = get("maximumsize") {
        settings.maximum_size = parse_number("maximumSize", v)?;
    }
    if let Some(v) = get("mode") {
        settings.mode = v.parse()?;
    }
    if let Some(v) = get("debug") {
        settings.debug = v.parse()?;
    }
    if let Some(v) = get("input_ext") {
        settings.input_ext = v.trim_start_matches('.').to_string();
    }
    if let Some(v) = get("output_ext") {
        settings.output_ext = v.trim_start_matches('.').to_string();
    }
    if let Some(v) = get("pixel_size_x") {
        settings.pixel_size_x = Some(parse_number("pixel_size_x", v)?);
    }
    if let Some(v) = get("pixel_size_y") {
        settings.pixel_size_y = Some(parse_number("pixel_size_y", v)?);
    }

    let meta = &mut settings.metadata;
    if let Some(v) = get("source") {
        meta.source = v.to_string();
    }
    if let Some(v) = get("age") {
        meta.age = v.to_string();
    }
    if let Some(v) = get("location") {
        meta.location = v.to_string();
    }
    if let Some(v) = get("catalog_prefix") {
        meta.catalog_prefix = v.to_string();
    }
    if let Some(v) = get("unit") {
        meta.unit = v.to_string();
    }
    meta.author = get("author").map(str::to_string);

    Ok(settings)
}

fn parse_number(key: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| SegmentError::Config(format!("{key} must be a number, got '{value}'")))
}
