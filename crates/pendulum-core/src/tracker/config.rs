use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_FRAME_RATE, DEFAULT_MAX_SAMPLES, DEFAULT_MIN_AREA, DEFAULT_SAMPLE_CADENCE,
};
use crate::fit::circle::CircleFit;
use crate::fit::lm::LmOptions;
use crate::fit::oscillator::OscillatorFitConfig;
use crate::physics::FrequencyConvention;
use crate::segment::SegmentationConfig;

/// Everything a tracking run needs apart from the source and the live thresholds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub convention: FrequencyConvention,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub circle: CircleConfig,
    #[serde(default)]
    pub oscillator: OscillatorFitConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl TrackerConfig {
    pub fn from_toml(text: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> crate::error::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Regions smaller than this many pixels are ignored.
    pub min_area: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_area: DEFAULT_MIN_AREA,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Sample every Nth frame.
    #[serde(default = "default_cadence")]
    pub cadence: usize,
    /// Circle refits stop once this many samples are held.
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
    /// Used when the source reports no usable frame rate.
    #[serde(default = "default_frame_rate")]
    pub fallback_frame_rate: f64,
}

fn default_cadence() -> usize {
    DEFAULT_SAMPLE_CADENCE
}

fn default_max_samples() -> usize {
    DEFAULT_MAX_SAMPLES
}

fn default_frame_rate() -> f64 {
    DEFAULT_FRAME_RATE
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            cadence: DEFAULT_SAMPLE_CADENCE,
            max_samples: DEFAULT_MAX_SAMPLES,
            fallback_frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CircleConfig {
    /// Seed for the first refit of a run.
    #[serde(default)]
    pub initial_guess: CircleFit,
    #[serde(default)]
    pub solver: LmOptions,
}

/// What the worker attaches to each frame event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FramePayloadKind {
    /// No image data, only the frame index and detection.
    #[default]
    None,
    Raw,
    /// Frame with the detection box and fitted geometry drawn on it.
    Annotated,
    Mask,
}

impl std::fmt::Display for FramePayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Raw => write!(f, "Raw"),
            Self::Annotated => write!(f, "Annotated"),
            Self::Mask => write!(f, "Mask"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub payload: FramePayloadKind,
}
