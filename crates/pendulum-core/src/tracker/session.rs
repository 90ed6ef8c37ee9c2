use tracing::debug;

use crate::color::HsvRange;
use crate::detection::{annotate, draw_geometry, locate};
use crate::fit::circle::{CircleFit, RotatedCircleEstimator};
use crate::frame::{Detection, Frame, PositionSample, SamplePoint};
use crate::segment::Segmenter;
use crate::transform::to_circle_frame;

use super::config::{FramePayloadKind, TrackerConfig};
use super::events::{FramePayload, GeometryUpdate};

/// What one frame produced.
#[derive(Clone, Debug)]
pub struct FrameOutcome {
    pub frame_index: usize,
    pub detection: Option<Detection>,
    pub payload: Option<FramePayload>,
    pub sample: Option<PositionSample>,
    pub geometry: Option<GeometryUpdate>,
}

/// Everything a run has accumulated.
#[derive(Clone, Debug, Default)]
pub struct RunRecord {
    pub samples: Vec<SamplePoint>,
    pub series: Vec<PositionSample>,
    /// Last successful circle fit.
    pub circle: Option<CircleFit>,
    /// Bob radius from the latest sampled detection.
    pub bob_radius: Option<f64>,
    pub frames_processed: usize,
    pub frame_rate: f64,
}

/// Per-run tracking state, driven one frame at a time.
///
/// Holds no thread or channel; the worker wraps it.
pub struct TrackingSession {
    config: TrackerConfig,
    segmenter: Segmenter,
    estimator: RotatedCircleEstimator,
    frame_rate: f64,
    frame_number: usize,
    samples: Vec<SamplePoint>,
    series: Vec<PositionSample>,
    bob_radius: Option<f64>,
    x_extent: Option<(f64, f64)>,
}

impl TrackingSession {
    pub fn new(config: TrackerConfig, frame_rate: f64) -> Self {
        let frame_rate = if frame_rate.is_finite() && frame_rate > 0.0 {
            frame_rate
        } else {
            debug!(
                reported = frame_rate,
                fallback = config.sampling.fallback_frame_rate,
                "Source frame rate unusable"
            );
            config.sampling.fallback_frame_rate
        };

        Self {
            segmenter: Segmenter::new(config.segmentation.clone()),
            estimator: RotatedCircleEstimator::new(
                config.circle.initial_guess,
                config.circle.solver.clone(),
            ),
            config,
            frame_rate,
            frame_number: 0,
            samples: Vec::new(),
            series: Vec::new(),
            bob_radius: None,
            x_extent: None,
        }
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn frames_processed(&self) -> usize {
        self.frame_number
    }

    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    pub fn series(&self) -> &[PositionSample] {
        &self.series
    }

    pub fn circle(&self) -> Option<&CircleFit> {
        self.estimator.current()
    }

    /// Segment, locate, and on sampling frames refit and extend the series.
    pub fn process(&mut self, frame: Frame, hsv: &HsvRange) -> FrameOutcome {
        let frame_index = self.frame_number;
        self.frame_number += 1;

        let mask = self
            .segmenter
            .segment(&frame, self.config.segmentation.mode, hsv);
        let detection = locate(&mask, self.config.detection.min_area);

        let cadence = self.config.sampling.cadence.max(1);
        let mut sample = None;
        let mut geometry = None;

        if let Some(d) = detection.as_ref().filter(|_| frame_index % cadence == 0) {
            let bob_radius = d.radius();
            self.bob_radius = Some(bob_radius);
            let (x_min, x_max) = match self.x_extent {
                Some((lo, hi)) => (lo.min(d.center.x), hi.max(d.center.x)),
                None => (d.center.x, d.center.x),
            };
            self.x_extent = Some((x_min, x_max));

            if self.samples.len() < self.config.sampling.max_samples {
                self.samples.push(SamplePoint {
                    x: d.center.x,
                    y: d.center.y,
                    frame_index,
                });
                self.estimator.refit(&self.samples);
            }

            let transformed = to_circle_frame(
                d.center,
                &self.estimator.geometry(),
                frame.height() as f64,
            );
            let entry = PositionSample {
                time: frame_index as f64 / self.frame_rate,
                x: transformed.x,
                y: transformed.y,
            };
            self.series.push(entry);
            sample = Some(entry);

            geometry = Some(GeometryUpdate {
                circle: self.estimator.current().copied(),
                bob_radius,
                x_min,
                x_max,
            });
        }

        let payload = match self.config.output.payload {
            FramePayloadKind::None => None,
            FramePayloadKind::Raw => Some(FramePayload::Raw(frame)),
            FramePayloadKind::Mask => Some(FramePayload::Mask(mask)),
            FramePayloadKind::Annotated => Some(FramePayload::Annotated(
                self.annotated(frame, detection.as_ref()),
            )),
        };

        FrameOutcome {
            frame_index,
            detection,
            payload,
            sample,
            geometry,
        }
    }

    fn annotated(&self, frame: Frame, detection: Option<&Detection>) -> Frame {
        let Some(d) = detection else {
            return frame;
        };
        let mut out = annotate(&frame, d);
        if let Some(circle) = self.estimator.current() {
            draw_geometry(&mut out, circle, d);
        }
        out
    }

    pub fn into_record(self) -> RunRecord {
        RunRecord {
            samples: self.samples,
            series: self.series,
            circle: self.estimator.current().copied(),
            bob_radius: self.bob_radius,
            frames_processed: self.frame_number,
            frame_rate: self.frame_rate,
        }
    }
}
