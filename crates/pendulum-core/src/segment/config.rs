use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BLUR_KERNEL_SIZE, DEFAULT_CANNY_HIGH, DEFAULT_CANNY_LOW,
    DEFAULT_HOUGH_ACCUMULATOR_THRESHOLD, DEFAULT_HOUGH_EDGE_THRESHOLD, DEFAULT_HOUGH_MAX_RADIUS,
    DEFAULT_HOUGH_MIN_DIST, DEFAULT_HOUGH_MIN_RADIUS,
};

/// Strategy used to turn a frame into a mask of candidate bob pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentationMode {
    /// HSV in-range test against the live threshold set.
    #[default]
    ColorThreshold,
    /// Blur followed by Canny edges.
    EdgeDetect,
    /// Blur followed by the gradient circle transform.
    CircleDetect {
        /// Keep only the largest circle instead of every detection.
        best_only: bool,
    },
}

impl std::fmt::Display for SegmentationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColorThreshold => write!(f, "Color Threshold"),
            Self::EdgeDetect => write!(f, "Edge Detection"),
            Self::CircleDetect { best_only: false } => write!(f, "Circle Detection"),
            Self::CircleDetect { best_only: true } => write!(f, "Best Circle"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_CANNY_LOW,
            high_threshold: DEFAULT_CANNY_HIGH,
        }
    }
}

/// Geometry of the circle transform. Accumulator resolution equals image resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    pub min_dist: f64,
    /// Upper Canny threshold; the lower one is half of it.
    pub edge_threshold: f32,
    pub accumulator_threshold: u32,
    pub min_radius: usize,
    pub max_radius: usize,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            min_dist: DEFAULT_HOUGH_MIN_DIST,
            edge_threshold: DEFAULT_HOUGH_EDGE_THRESHOLD,
            accumulator_threshold: DEFAULT_HOUGH_ACCUMULATOR_THRESHOLD,
            min_radius: DEFAULT_HOUGH_MIN_RADIUS,
            max_radius: DEFAULT_HOUGH_MAX_RADIUS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    #[serde(default = "default_blur_kernel_size")]
    pub blur_kernel_size: usize,
    #[serde(default)]
    pub mode: SegmentationMode,
    #[serde(default)]
    pub edge: EdgeParams,
    #[serde(default)]
    pub hough: HoughParams,
}

fn default_blur_kernel_size() -> usize {
    DEFAULT_BLUR_KERNEL_SIZE
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: DEFAULT_BLUR_KERNEL_SIZE,
            mode: SegmentationMode::default(),
            edge: EdgeParams::default(),
            hough: HoughParams::default(),
        }
    }
}
