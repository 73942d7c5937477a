mod orchestrator;
pub mod output;
mod types;

pub use orchestrator::{
    detect_all, focal_planes, run_settings, run_settings_file, run_settings_reported,
};
pub use types::{NoOpReporter, PipelineStage, ProgressReporter, RunOutcome, RunReport};
