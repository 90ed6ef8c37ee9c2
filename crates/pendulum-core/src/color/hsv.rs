//! HSV conversion and in-range thresholding.
//!
//! Values follow the 8-bit OpenCV convention so threshold sets captured with
//! common tuning tools carry over unchanged: hue in [0, 179] (degrees / 2),
//! saturation and value in [0, 255].

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_HSV_HMAX, DEFAULT_HSV_HMIN, DEFAULT_HSV_SMAX, DEFAULT_HSV_SMIN, DEFAULT_HSV_VMAX,
    DEFAULT_HSV_VMIN, PARALLEL_PIXEL_THRESHOLD,
};
use crate::frame::{Frame, Mask};

/// Inclusive HSV window. Field names match the persisted key-value layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HsvRange {
    pub hmin: u8,
    pub hmax: u8,
    pub smin: u8,
    pub smax: u8,
    pub vmin: u8,
    pub vmax: u8,
}

impl Default for HsvRange {
    fn default() -> Self {
        Self {
            hmin: DEFAULT_HSV_HMIN,
            hmax: DEFAULT_HSV_HMAX,
            smin: DEFAULT_HSV_SMIN,
            smax: DEFAULT_HSV_SMAX,
            vmin: DEFAULT_HSV_VMIN,
            vmax: DEFAULT_HSV_VMAX,
        }
    }
}

impl HsvRange {
    pub fn contains(&self, [h, s, v]: [u8; 3]) -> bool {
        (self.hmin..=self.hmax).contains(&h)
            && (self.smin..=self.smax).contains(&s)
            && (self.vmin..=self.vmax).contains(&v)
    }
}

/// Convert one RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    let mut h8 = (h / 2.0).round() as u32;
    if h8 >= 180 {
        h8 -= 180;
    }

    [h8 as u8, s.round().min(255.0) as u8, v as u8]
}

/// Mark every pixel whose HSV value falls inside `range`.
pub fn in_range_mask(frame: &Frame, range: &HsvRange) -> Mask {
    let (h, w) = (frame.height(), frame.width());

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<bool>> = (0..h)
            .into_par_iter()
            .map(|row| {
                (0..w)
                    .map(|col| range.contains(rgb_to_hsv(frame.pixel(row, col))))
                    .collect()
            })
            .collect();

        let mut mask = Array2::from_elem((h, w), false);
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                mask[[row, col]] = val;
            }
        }
        mask
    } else {
        Array2::from_shape_fn((h, w), |(row, col)| {
            range.contains(rgb_to_hsv(frame.pixel(row, col)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_colors() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
    }

    #[test]
    fn gray_has_no_saturation() {
        assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
    }

    #[test]
    fn magenta_red_is_in_default_range() {
        // Hue ~ 165 on the 0..179 scale.
        assert!(HsvRange::default().contains(rgb_to_hsv([230, 20, 110])));
        assert!(!HsvRange::default().contains(rgb_to_hsv([20, 200, 20])));
    }
}
