use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pendulum_core::io::export::{load_series, save_params};
use pendulum_core::tracker::analyze_series;

use super::{bounds_for, load_config, ConventionArg};
use crate::summary::print_analysis;

#[derive(Args)]
pub struct FitArgs {
    /// Position series CSV (time,x,y)
    pub series: PathBuf,

    /// TOML tracker config; only the oscillator section is used
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Constrain amplitude and frequency to be non-negative
    #[arg(long)]
    pub bounded: bool,

    /// Frequency convention for reported results
    #[arg(long, value_enum)]
    pub convention: Option<ConventionArg>,

    /// Swing circle radius in pixels, for the surface length
    #[arg(long)]
    pub circle_radius: Option<f64>,

    /// Bob radius in pixels, for the surface length
    #[arg(long)]
    pub bob_radius: Option<f64>,

    /// Fitted parameter CSV output
    #[arg(long)]
    pub params: Option<PathBuf>,
}

pub fn run(args: &FitArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut oscillator = config.oscillator;
    if args.bounded {
        oscillator.bounds = bounds_for(true);
    }
    let convention = args.convention.map(Into::into).unwrap_or(config.convention);

    let series = load_series(&args.series)
        .with_context(|| format!("Failed to read {}", args.series.display()))?;
    println!("Fitting {} samples from {}", series.len(), args.series.display());

    let analysis = analyze_series(
        &series,
        args.circle_radius,
        args.bob_radius,
        &oscillator,
        convention,
    )
    .context("Oscillator fit failed")?;
    print_analysis(&analysis);

    if let Some(ref path) = args.params {
        save_params(path, &analysis.params, convention)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Parameters saved to {}", path.display());
    }

    Ok(())
}
