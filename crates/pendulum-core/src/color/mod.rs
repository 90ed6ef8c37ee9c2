pub mod hsv;

pub use hsv::{in_range_mask, rgb_to_hsv, HsvRange};
