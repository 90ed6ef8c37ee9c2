use std::path::Path;

use image::{GrayImage, ImageFormat, Luma, RgbImage};
use ndarray::Array3;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{PendulumError, Result};
use crate::frame::{Frame, Mask};

/// Load any image the `image` crate understands as an RGB frame.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let rgb = image::open(path)?.to_rgb8();
    let (w, h) = rgb.dimensions();
    let raw = rgb.into_raw();

    let data = Array3::from_shape_vec((h as usize, w as usize, COLOR_CHANNEL_COUNT), raw)
        .map_err(|_| PendulumError::InvalidDimensions {
            width: w,
            height: h,
        })?;
    Ok(Frame::new(data))
}

/// Save a frame as 8-bit RGB PNG.
pub fn save_frame_png(frame: &Frame, path: &Path) -> Result<()> {
    let (w, h) = (frame.width() as u32, frame.height() as u32);
    let img = RgbImage::from_fn(w, h, |col, row| {
        image::Rgb(frame.pixel(row as usize, col as usize))
    });
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a mask as a black/white PNG.
pub fn save_mask_png(mask: &Mask, path: &Path) -> Result<()> {
    let (h, w) = mask.dim();
    let img = GrayImage::from_fn(w as u32, h as u32, |col, row| {
        Luma([if mask[[row as usize, col as usize]] { 255 } else { 0 }])
    });
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Render a mask as a white-on-black frame.
pub fn mask_to_frame(mask: &Mask) -> Frame {
    let (h, w) = mask.dim();
    let data = Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(row, col, _)| {
        if mask[[row, col]] { 255 } else { 0 }
    });
    Frame::new(data)
}
