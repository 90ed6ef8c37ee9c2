pub mod config;
pub mod edges;
pub mod hough;

pub use config::{EdgeParams, HoughParams, SegmentationConfig, SegmentationMode};
pub use hough::{best_circle, circles_mask, hough_circles, Circle};

use ndarray::Array2;
use tracing::trace;

use crate::color::{in_range_mask, HsvRange};
use crate::filters::gaussian_blur::gaussian_blur;
use crate::frame::{Frame, Mask};

/// Turns frames into masks of candidate bob pixels.
///
/// Fixed parameters (kernel size, edge and circle settings) are set at
/// construction; the HSV window is passed per call because it may change
/// between frames.
#[derive(Clone, Debug, Default)]
pub struct Segmenter {
    config: SegmentationConfig,
}

impl Segmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    pub fn segment(&self, frame: &Frame, mode: SegmentationMode, hsv: &HsvRange) -> Mask {
        match mode {
            SegmentationMode::ColorThreshold => in_range_mask(frame, hsv),
            SegmentationMode::EdgeDetect => {
                let blurred = self.blurred_gray(frame);
                edges::canny(
                    &blurred,
                    self.config.edge.low_threshold,
                    self.config.edge.high_threshold,
                )
            }
            SegmentationMode::CircleDetect { best_only } => {
                let blurred = self.blurred_gray(frame);
                let circles = hough_circles(&blurred, &self.config.hough);
                trace!(count = circles.len(), "Circle transform");
                let (h, w) = blurred.dim();
                if best_only {
                    circles_mask(h, w, best_circle(&circles))
                } else {
                    circles_mask(h, w, &circles)
                }
            }
        }
    }

    fn blurred_gray(&self, frame: &Frame) -> Array2<f32> {
        gaussian_blur(&frame.luminance(), self.config.blur_kernel_size)
    }
}
