use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::consts::{COLOR_CHANNEL_COUNT, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};

/// A single RGB video frame.
/// Pixel data is 8-bit, shape = (height, width, 3), channel order R, G, B.
#[derive(Clone, Debug)]
pub struct Frame {
    pub data: Array3<u8>,
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array3<u8>) -> Self {
        Self {
            data,
            metadata: FrameMetadata::default(),
        }
    }

    /// Solid-color frame, mostly useful for synthetic input.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let data = Array3::from_shape_fn((height, width, COLOR_CHANNEL_COUNT), |(_, _, c)| rgb[c]);
        Self::new(data)
    }

    pub fn with_index(mut self, frame_index: usize) -> Self {
        self.metadata.frame_index = frame_index;
        self
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn pixel(&self, row: usize, col: usize) -> [u8; 3] {
        [
            self.data[[row, col, 0]],
            self.data[[row, col, 1]],
            self.data[[row, col, 2]],
        ]
    }

    pub fn set_pixel(&mut self, row: usize, col: usize, rgb: [u8; 3]) {
        for (c, &v) in rgb.iter().enumerate() {
            self.data[[row, col, c]] = v;
        }
    }

    /// BT.601 luminance on the 8-bit scale (0.0..=255.0).
    pub fn luminance(&self) -> Array2<f32> {
        let (h, w, _) = self.data.dim();
        Array2::from_shape_fn((h, w), |(row, col)| {
            LUMINANCE_R * self.data[[row, col, 0]] as f32
                + LUMINANCE_G * self.data[[row, col, 1]] as f32
                + LUMINANCE_B * self.data[[row, col, 2]] as f32
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    pub frame_index: usize,
    pub timestamp_us: Option<u64>,
}

/// Binary raster aligned to a frame; `true` marks candidate bob pixels.
pub type Mask = Array2<bool>;

/// A point in image coordinates (origin top-left, y down) unless stated otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl BoundingBox {
    pub fn contains(&self, p: Point) -> bool {
        let (x0, y0) = (self.x as f64, self.y as f64);
        p.x >= x0
            && p.x <= x0 + self.width as f64 - 1.0
            && p.y >= y0
            && p.y <= y0 + self.height as f64 - 1.0
    }
}

/// Measurement of the bob in one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub center: Point,
    pub bbox: BoundingBox,
    /// Region area in pixels, always > 0.
    pub area: usize,
}

impl Detection {
    /// Bob radius estimated from the bounding box: (w + h) / 4.
    pub fn radius(&self) -> f64 {
        (self.bbox.width + self.bbox.height) as f64 / 4.0
    }
}

/// Centroid sample feeding the rotated-circle fit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub frame_index: usize,
}

/// One entry of the position series: time in seconds and the transformed position.
/// `x` is the along-swing coordinate handed to the oscillator fit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub time: f64,
    pub x: f64,
    pub y: f64,
}

/// Metadata about a video source.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub frame_rate: f64,
    pub description: String,
}
