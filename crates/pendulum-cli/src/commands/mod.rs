pub mod config;
pub mod fit;
pub mod info;
pub mod track;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use pendulum_core::fit::oscillator::FitBounds;
use pendulum_core::frame::SourceInfo;
use pendulum_core::io::{ImageSequenceSource, SerSource, VideoSource};
use pendulum_core::physics::FrequencyConvention;
use pendulum_core::tracker::TrackerConfig;

/// Open a SER file, or a directory of images, as a video source.
pub fn open_source(path: &Path, fps: f64) -> Result<(Box<dyn VideoSource>, SourceInfo)> {
    if path.is_dir() {
        let source = ImageSequenceSource::open(path, fps)
            .with_context(|| format!("Failed to open image sequence {}", path.display()))?;
        let info = source.source_info();
        Ok((Box::new(source), info))
    } else {
        let source = SerSource::open(path, fps)
            .with_context(|| format!("Failed to open SER file {}", path.display()))?;
        let info = source.source_info();
        Ok((Box::new(source), info))
    }
}

pub fn load_config(path: Option<&Path>) -> Result<TrackerConfig> {
    let Some(path) = path else {
        return Ok(TrackerConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    TrackerConfig::from_toml(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ConventionArg {
    Omega,
    Hertz,
}

impl From<ConventionArg> for FrequencyConvention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::Omega => FrequencyConvention::AngularFrequency,
            ConventionArg::Hertz => FrequencyConvention::Hertz,
        }
    }
}

pub fn bounds_for(bounded: bool) -> FitBounds {
    if bounded {
        FitBounds::Physical
    } else {
        FitBounds::None
    }
}
