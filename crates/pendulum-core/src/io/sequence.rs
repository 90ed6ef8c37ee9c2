use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PendulumError, Result};
use crate::frame::{Frame, SourceInfo};

use super::image_io::load_frame;
use super::source::VideoSource;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Directory of still images played back in file-name order.
pub struct ImageSequenceSource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    frame_rate: f64,
    dimensions: (usize, usize),
    cursor: usize,
}

impl ImageSequenceSource {
    pub fn open(dir: &Path, frame_rate: f64) -> Result<Self> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_image(p))
            .collect();
        files.sort();

        let first = files.first().ok_or_else(|| {
            PendulumError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no images in {}", dir.display()),
            ))
        })?;
        let (w, h) = image::image_dimensions(first)?;

        debug!(dir = %dir.display(), frames = files.len(), "Opened image sequence");
        Ok(Self {
            dir: dir.to_path_buf(),
            files,
            frame_rate,
            dimensions: (w as usize, h as usize),
            cursor: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn source_info(&self) -> SourceInfo {
        SourceInfo {
            filename: self.dir.clone(),
            total_frames: self.files.len(),
            width: self.dimensions.0 as u32,
            height: self.dimensions.1 as u32,
            bit_depth: 8,
            frame_rate: self.frame_rate,
            description: "Image sequence".into(),
        }
    }
}

impl VideoSource for ImageSequenceSource {
    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(path) = self.files.get(self.cursor) else {
            return Ok(None);
        };

        let frame = load_frame(path)?;
        if (frame.width(), frame.height()) != self.dimensions {
            return Err(PendulumError::InvalidDimensions {
                width: frame.width() as u32,
                height: frame.height() as u32,
            });
        }

        let index = self.cursor;
        self.cursor += 1;
        Ok(Some(frame.with_index(index)))
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
