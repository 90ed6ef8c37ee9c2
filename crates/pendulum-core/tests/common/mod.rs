#![allow(dead_code)]

use pendulum_core::frame::Frame;
use pendulum_core::io::ser::SER_HEADER_SIZE;

/// Crimson: hue 174, well inside the default threshold band.
pub const BOB_COLOR: [u8; 3] = [220, 20, 60];
/// Neutral gray, zero saturation.
pub const BACKGROUND: [u8; 3] = [200, 200, 200];

/// Frame with a filled disc drawn over a uniform background.
pub fn disc_frame(
    width: usize,
    height: usize,
    center: (f64, f64),
    radius: f64,
    color: [u8; 3],
    background: [u8; 3],
) -> Frame {
    let mut frame = Frame::filled(width, height, background);
    let r_sq = radius * radius;
    for row in 0..height {
        for col in 0..width {
            let dx = col as f64 - center.0;
            let dy = row as f64 - center.1;
            if dx * dx + dy * dy <= r_sq {
                frame.set_pixel(row, col, color);
            }
        }
    }
    frame
}

/// Bob position of a synthetic pendulum hanging from `pivot` with arm
/// `length`, swinging horizontally as `amplitude * cos(omega * t)`.
pub fn pendulum_position(
    pivot: (f64, f64),
    length: f64,
    amplitude: f64,
    omega: f64,
    t: f64,
) -> (f64, f64) {
    let dx = amplitude * (omega * t).cos();
    let dy = (length * length - dx * dx).sqrt();
    (pivot.0 + dx, pivot.1 + dy)
}

/// `count` frames of a swinging crimson bob sampled at `fps`.
pub fn pendulum_frames(count: usize, fps: f64) -> Vec<Frame> {
    (0..count)
        .map(|i| {
            let t = i as f64 / fps;
            let center = pendulum_position((160.0, 20.0), 150.0, 50.0, std::f64::consts::PI, t);
            disc_frame(320, 240, center, 10.0, BOB_COLOR, BACKGROUND)
        })
        .collect()
}

/// `count` 400x240 frames of a bob sliding along a horizontal line,
/// `x = 50 cos(pi t) + 300` at fixed `y = 120`.
pub fn horizontal_frames(count: usize, fps: f64) -> Vec<Frame> {
    (0..count)
        .map(|i| {
            let t = i as f64 / fps;
            let x = 50.0 * (std::f64::consts::PI * t).cos() + 300.0;
            disc_frame(400, 240, (x, 120.0), 10.0, BOB_COLOR, BACKGROUND)
        })
        .collect()
}

/// Build a SER file header with configurable bit depth and color mode.
///
/// `color_id`: 0=MONO, 8=BAYER_RGGB, 100=RGB, 101=BGR
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer (40 bytes)
    let mut observer = [0u8; 40];
    observer[..4].copy_from_slice(b"Test");
    buf.extend_from_slice(&observer);
    // Instrument, Telescope (40 bytes each)
    buf.extend_from_slice(&[0u8; 40]);
    buf.extend_from_slice(&[0u8; 40]);
    // DateTime, DateTimeUTC
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Complete SER buffer: header followed by raw frame bytes.
pub fn build_ser(
    width: u32,
    height: u32,
    bit_depth: u32,
    color_id: i32,
    frames: &[Vec<u8>],
) -> Vec<u8> {
    let mut buf = build_ser_header_full(width, height, bit_depth, frames.len(), color_id);
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Append a timestamp trailer (100 ns ticks, one per frame).
pub fn append_timestamps(buf: &mut Vec<u8>, ticks: &[u64]) {
    for t in ticks {
        buf.extend_from_slice(&t.to_le_bytes());
    }
}

/// Write a buffer to a temporary file that lives as long as the handle.
pub fn write_temp(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write data");
    f.flush().expect("flush");
    f
}
