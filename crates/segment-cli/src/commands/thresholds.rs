use anyhow::Result;
use clap::Args;
use segment_core::settings::ThresholdSpec;

#[derive(Args)]
pub struct ThresholdsArgs {
    /// Threshold specification, e.g. "0.2", "0.1-0.3" or "0.1-0.3-0.05"
    pub spec: String,
}

pub fn run(args: &ThresholdsArgs) -> Result<()> {
    let spec = ThresholdSpec::parse(&args.spec)?;
    let values = spec.values();

    println!("{} run(s) for '{}':", values.len(), args.spec);
    for (i, value) in values.iter().enumerate() {
        println!("  {:>3}. {:.4}", i + 1, value);
    }
    Ok(())
}
