use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use segment_core::pipeline::{run_settings_reported, PipelineStage, ProgressReporter};
use segment_core::settings::Settings;
use tracing::info;

use crate::summary::{print_reports, print_settings_summary};
use crate::{init_tracing, log_filter};

#[derive(Args)]
pub struct RunArgs {
    /// Settings file (key = value lines)
    pub settings: PathBuf,
}

/// Drives an indicatif bar from pipeline progress events.
struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:20} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.bar.set_message(stage.to_string());
        self.bar.set_length(total_items.unwrap_or(0) as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }
}

pub fn run(args: &RunArgs, verbose: bool) -> Result<()> {
    let settings = Settings::load(&args.settings)
        .with_context(|| format!("Failed to read settings {}", args.settings.display()))?;
    init_tracing(log_filter(settings.debug, verbose));

    print_settings_summary(&settings, &args.settings);

    let start = Instant::now();
    let reporter = Arc::new(BarReporter::new()?);
    let reports = run_settings_reported(&settings, reporter.clone())
        .with_context(|| format!("Segmentation of {} failed", settings.directory.display()))?;
    reporter.bar.finish_with_message("Done");
    info!(
        runs = reports.len(),
        elapsed = ?start.elapsed(),
        "Segmentation finished"
    );

    print_reports(&reports);

    let failed = reports.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} runs failed", reports.len());
    }
    Ok(())
}
