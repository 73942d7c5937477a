use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write settings to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

const TEMPLATE: &str = "\
# Stack directory and output root (required)
directory = /path/to/stack
output = /path/to/output

# Single value, or start-stop[-step] (step defaults to 0.01)
threshold = 0.20
# Object size band in microns
minimumSize = 100
maximumSize = 2000

# sample | final
mode = sample
# off | low | high
debug = off

input_ext = tif
output_ext = tif

# Microns per pixel; read from the top image's .xml sidecar when omitted
# pixel_size_x = 1.0
# pixel_size_y = 1.0

source = Unspecified Source
age = Unspecified Age
location = Yale Peabody Museum
catalog_prefix = YPM IP
unit = microns
# author =
";

/// Print or save a settings file with every default spelled out.
pub fn run(args: &ConfigArgs) -> Result<()> {
    if let Some(ref path) = args.output {
        std::fs::write(path, TEMPLATE)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        println!("Default settings saved to {}", path.display());
    } else {
        print!("{}", TEMPLATE);
    }

    Ok(())
}
