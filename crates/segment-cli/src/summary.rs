use std::fmt::Display;
use std::path::Path;

use console::{Style, StyledObject};
use segment_core::pipeline::{RunOutcome, RunReport};
use segment_core::settings::Settings;

struct Palette {
    heading: Style,
    key: Style,
    emphasis: Style,
    file: Style,
    ok: Style,
    warn: Style,
    fail: Style,
}

impl Palette {
    fn new() -> Self {
        Self {
            heading: Style::new().cyan().bold(),
            key: Style::new().dim(),
            emphasis: Style::new().bold().white(),
            file: Style::new().underlined(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red().bold(),
        }
    }

    fn field(&self, indent: usize, key: &str, value: StyledObject<impl Display>) {
        let width = 16 - indent;
        println!(
            "{:indent$}{:<width$}{}",
            "",
            self.key.apply_to(key),
            value,
            indent = indent,
            width = width
        );
    }
}

pub fn print_settings_summary(settings: &Settings, settings_path: &Path) {
    let p = Palette::new();

    println!();
    println!("  {}", p.heading.apply_to("Segment"));
    println!("  {}", p.heading.apply_to("=".repeat(7)));
    println!();

    p.field(2, "Settings", p.file.apply_to(settings_path.display()));
    p.field(2, "Stack", p.file.apply_to(settings.directory.display()));
    p.field(2, "Output", p.file.apply_to(settings.full_output().display()));
    println!();

    println!("  {}", p.heading.apply_to("Detection"));
    p.field(
        4,
        "Threshold",
        p.emphasis.apply_to(format!(
            "{} ({} runs)",
            settings.threshold,
            settings.threshold.len()
        )),
    );
    p.field(
        4,
        "Size",
        p.emphasis.apply_to(format!(
            "{}-{} {}",
            settings.minimum_size, settings.maximum_size, settings.metadata.unit
        )),
    );
    let pixel_size = match (settings.pixel_size_x, settings.pixel_size_y) {
        (Some(x), Some(y)) => format!("{x} x {y}"),
        _ => "from XML sidecar".to_string(),
    };
    p.field(4, "Pixel size", p.emphasis.apply_to(pixel_size));
    p.field(4, "Mode", p.emphasis.apply_to(settings.mode));
    println!();
}

pub fn print_reports(reports: &[RunReport]) {
    let p = Palette::new();

    println!();
    println!("  {}", p.heading.apply_to("Runs"));
    for report in reports {
        let status = match &report.outcome {
            RunOutcome::Completed => p.ok.apply_to("ok".to_string()),
            RunOutcome::NoObjects => p.warn.apply_to("no objects".to_string()),
            RunOutcome::Failed(msg) => p.fail.apply_to(format!("failed: {msg}")),
        };
        let counts = format!(
            "{} regions, {} objects, {} files  {}",
            report.regions,
            report.objects.len(),
            report.files.len(),
            status
        );
        p.field(
            4,
            &format!("th={:.4}", report.threshold),
            p.emphasis.apply_to(counts),
        );
    }
    println!();
}
