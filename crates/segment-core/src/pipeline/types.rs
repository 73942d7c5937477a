use std::fmt;
use std::path::PathBuf;

use crate::frame::ObjectList;

/// Coarse phase of a segmentation job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    /// Reading and rescaling the top image.
    Loading,
    /// Thresholding and labeling, one item per run.
    Detecting,
    /// Overview, crops and settings records, one item per run.
    Writing,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Loading => "Loading top image",
            Self::Detecting => "Detecting objects",
            Self::Writing => "Writing output",
        };
        f.write_str(label)
    }
}

/// Receives progress events from a segmentation job. Shared across the
/// detection workers, so it must be `Send + Sync`.
pub trait ProgressReporter: Send + Sync {
    /// Entering `stage`, which has `total_items` runs or files when known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// `items_done` items of the current stage are finished.
    fn advance(&self, _items_done: usize) {}

    fn finish_stage(&self) {}
}

/// Discards every event.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// How a single run ended.
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    Completed,
    /// Nothing survived the size filter; only the overview was written.
    NoObjects,
    Failed(String),
}

/// Summary of one run configuration.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub threshold: f64,
    /// Labeled regions before size filtering.
    pub regions: usize,
    pub objects: ObjectList,
    pub files: Vec<PathBuf>,
    pub outcome: RunOutcome,
}

impl RunReport {
    pub(super) fn failed(threshold: f64, message: String) -> Self {
        Self {
            threshold,
            regions: 0,
            objects: ObjectList::new(),
            files: Vec::new(),
            outcome: RunOutcome::Failed(message),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, RunOutcome::Failed(_))
    }
}
