use std::collections::VecDeque;

use crate::error::Result;
use crate::frame::Frame;

/// A sequential supplier of frames.
///
/// `Ok(None)` marks the end of the stream; an `Err` is an acquisition failure.
pub trait VideoSource: Send {
    /// Frames per second used to timestamp samples.
    fn frame_rate(&self) -> f64;

    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (usize, usize);

    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

impl<S: VideoSource + ?Sized> VideoSource for Box<S> {
    fn frame_rate(&self) -> f64 {
        (**self).frame_rate()
    }

    fn dimensions(&self) -> (usize, usize) {
        (**self).dimensions()
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        (**self).next_frame()
    }
}

/// Frames held in memory, handed out in order.
pub struct InMemorySource {
    frames: VecDeque<Frame>,
    frame_rate: f64,
    dimensions: (usize, usize),
    next_index: usize,
}

impl InMemorySource {
    pub fn new(frames: Vec<Frame>, frame_rate: f64) -> Self {
        let dimensions = frames
            .first()
            .map(|f| (f.width(), f.height()))
            .unwrap_or((0, 0));
        Self {
            frames: frames.into(),
            frame_rate,
            dimensions,
            next_index: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl VideoSource for InMemorySource {
    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(frame) = self.frames.pop_front() else {
            return Ok(None);
        };
        let index = self.next_index;
        self.next_index += 1;
        Ok(Some(frame.with_index(index)))
    }
}
