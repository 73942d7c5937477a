pub mod config;
pub mod detect;
pub mod run;
pub mod thresholds;
