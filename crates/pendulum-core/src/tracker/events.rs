use crate::fit::circle::CircleFit;
use crate::frame::{Detection, Frame, Mask, PositionSample};
use crate::io::image_io::mask_to_frame;

#[derive(Clone, Debug)]
pub enum FramePayload {
    Raw(Frame),
    Annotated(Frame),
    Mask(Mask),
}

impl FramePayload {
    /// The payload as an image; masks render white on black.
    pub fn to_frame(&self) -> Frame {
        match self {
            Self::Raw(f) | Self::Annotated(f) => f.clone(),
            Self::Mask(m) => mask_to_frame(m),
        }
    }
}

/// Geometry known after a sampling frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryUpdate {
    /// Last successful circle fit, if any.
    pub circle: Option<CircleFit>,
    /// `(bbox_w + bbox_h) / 4` of the latest detection.
    pub bob_radius: f64,
    /// Horizontal extent of the bob's raw centroid over the run so far.
    pub x_min: f64,
    pub x_max: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FinishReason {
    EndOfStream,
    Stopped,
    /// The source failed; the run ended with what it had.
    SourceError(String),
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOfStream => write!(f, "end of stream"),
            Self::Stopped => write!(f, "stopped"),
            Self::SourceError(e) => write!(f, "source error: {e}"),
        }
    }
}

/// Notifications from the tracker worker, in the order they happen.
#[derive(Clone, Debug)]
pub enum TrackerEvent {
    Frame {
        frame_index: usize,
        detection: Option<Detection>,
        payload: Option<FramePayload>,
    },
    Sample(PositionSample),
    Geometry(GeometryUpdate),
    Finished {
        frames: usize,
        samples: usize,
        reason: FinishReason,
    },
}
