use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array3;
use tracing::debug;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{PendulumError, Result};
use crate::frame::{Frame, FrameMetadata, SourceInfo};

use super::source::VideoSource;

pub const SER_HEADER_SIZE: usize = 178;
const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";
/// Trailer timestamps count 100 ns ticks.
const TICKS_PER_SECOND: f64 = 10_000_000.0;

/// Pixel layout of a SER recording that can be turned into RGB frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerColor {
    Mono,
    Rgb,
    Bgr,
}

impl std::fmt::Display for SerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mono => write!(f, "Mono"),
            Self::Rgb => write!(f, "RGB"),
            Self::Bgr => write!(f, "BGR"),
        }
    }
}

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color: SerColor,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
}

impl SerHeader {
    pub fn bytes_per_sample(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    pub fn planes(&self) -> usize {
        match self.color {
            SerColor::Mono => 1,
            SerColor::Rgb | SerColor::Bgr => COLOR_CHANNEL_COUNT,
        }
    }

    pub fn frame_byte_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.bytes_per_sample() * self.planes())
    }
}

/// Memory-mapped SER recording read front to back as a [`VideoSource`].
pub struct SerSource {
    mmap: Mmap,
    path: PathBuf,
    header: SerHeader,
    frame_size: usize,
    frame_rate: f64,
    cursor: usize,
}

impl SerSource {
    /// Open a SER file. `fallback_fps` is used when the file has no usable
    /// timestamp trailer.
    pub fn open(path: &Path, fallback_fps: f64) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and lives as long as the source.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(PendulumError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }
        if &mmap[0..14] != SER_MAGIC {
            return Err(PendulumError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;
        let frame_size = header
            .frame_byte_size()
            .ok_or(PendulumError::InvalidDimensions {
                width: header.width,
                height: header.height,
            })?;

        let expected = SER_HEADER_SIZE + frame_size * header.frame_count as usize;
        if mmap.len() < expected {
            return Err(PendulumError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected,
                mmap.len()
            )));
        }

        let mut source = Self {
            mmap,
            path: path.to_path_buf(),
            header,
            frame_size,
            frame_rate: fallback_fps,
            cursor: 0,
        };
        if let Some(fps) = source.trailer_frame_rate() {
            source.frame_rate = fps;
        }
        debug!(
            path = %path.display(),
            frames = source.frame_count(),
            fps = source.frame_rate,
            "Opened SER source"
        );
        Ok(source)
    }

    pub fn header(&self) -> &SerHeader {
        &self.header
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Decode one frame to 8-bit RGB.
    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let count = self.frame_count();
        if index >= count {
            return Err(PendulumError::FrameIndexOutOfRange { index, total: count });
        }

        let offset = SER_HEADER_SIZE + index * self.frame_size;
        let raw = &self.mmap[offset..offset + self.frame_size];
        let data = decode_rgb(raw, &self.header);

        Ok(Frame {
            data,
            metadata: FrameMetadata {
                frame_index: index,
                timestamp_us: self.timestamp_ticks(index).map(|t| t / 10),
            },
        })
    }

    pub fn source_info(&self) -> SourceInfo {
        let mut description = format!("{} {}-bit", self.header.color, self.header.pixel_depth);
        for field in [
            &self.header.observer,
            &self.header.instrument,
            &self.header.telescope,
        ] {
            if !field.is_empty() {
                description.push_str(", ");
                description.push_str(field);
            }
        }

        SourceInfo {
            filename: self.path.clone(),
            total_frames: self.frame_count(),
            width: self.header.width,
            height: self.header.height,
            bit_depth: self.header.pixel_depth as u8,
            frame_rate: self.frame_rate,
            description,
        }
    }

    fn timestamp_ticks(&self, index: usize) -> Option<u64> {
        let trailer = SER_HEADER_SIZE + self.frame_size * self.frame_count();
        let at = trailer + index * 8;
        let bytes = self.mmap.get(at..at + 8)?;
        let ticks = u64::from_le_bytes(bytes.try_into().ok()?);
        (ticks > 0).then_some(ticks)
    }

    /// Mean frame rate over the recording, from first and last timestamps.
    fn trailer_frame_rate(&self) -> Option<f64> {
        let count = self.frame_count();
        if count < 2 {
            return None;
        }
        let first = self.timestamp_ticks(0)?;
        let last = self.timestamp_ticks(count - 1)?;
        if last <= first {
            return None;
        }
        let seconds = (last - first) as f64 / TICKS_PER_SECOND;
        Some((count - 1) as f64 / seconds)
    }
}

impl VideoSource for SerSource {
    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.header.width as usize, self.header.height as usize)
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.cursor >= self.frame_count() {
            return Ok(None);
        }
        let frame = self.read_frame(self.cursor)?;
        self.cursor += 1;
        Ok(Some(frame))
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]);

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()? as u32;
    let height = cursor.read_i32::<LittleEndian>()? as u32;
    let pixel_depth = cursor.read_i32::<LittleEndian>()? as u32;
    let frame_count = cursor.read_i32::<LittleEndian>()? as u32;

    if width == 0 || height == 0 {
        return Err(PendulumError::InvalidDimensions { width, height });
    }
    if pixel_depth == 0 || pixel_depth > 16 {
        return Err(PendulumError::InvalidSer(format!(
            "Unsupported pixel depth {pixel_depth}"
        )));
    }

    let color = match color_id {
        0 => SerColor::Mono,
        100 => SerColor::Rgb,
        101 => SerColor::Bgr,
        other => {
            return Err(PendulumError::UnsupportedColorMode(format!(
                "SER color id {other}"
            )))
        }
    };

    Ok(SerHeader {
        color,
        // Most writers put 0 here for little-endian data.
        little_endian: le_flag != 1,
        width,
        height,
        pixel_depth,
        frame_count,
        observer: read_fixed_string(&buf[42..82]),
        instrument: read_fixed_string(&buf[82..122]),
        telescope: read_fixed_string(&buf[122..162]),
    })
}

fn read_fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

/// Interleaved samples to (h, w, 3) RGB, scaled down to 8 bits.
fn decode_rgb(raw: &[u8], header: &SerHeader) -> Array3<u8> {
    let h = header.height as usize;
    let w = header.width as usize;
    let bps = header.bytes_per_sample();
    let planes = header.planes();
    let shift = header.pixel_depth.saturating_sub(8);

    let sample = |idx: usize| -> u8 {
        let value = if bps == 1 {
            raw[idx] as u16
        } else {
            let pair = [raw[idx], raw[idx + 1]];
            if header.little_endian {
                u16::from_le_bytes(pair)
            } else {
                u16::from_be_bytes(pair)
            }
        };
        (value >> shift).min(255) as u8
    };

    Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(row, col, c)| {
        let pixel = (row * w + col) * planes * bps;
        let plane = match header.color {
            SerColor::Mono => 0,
            SerColor::Rgb => c,
            SerColor::Bgr => 2 - c,
        };
        sample(pixel + plane * bps)
    })
}
