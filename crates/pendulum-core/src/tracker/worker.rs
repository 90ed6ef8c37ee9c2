use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{info, warn};

use crate::error::{PendulumError, Result};
use crate::io::source::VideoSource;

use super::config::TrackerConfig;
use super::events::{FinishReason, TrackerEvent};
use super::session::{RunRecord, TrackingSession};
use super::shared::ThresholdHandle;

/// Pull frames from `source` until it ends, fails, or `stop` is set.
///
/// Events go to `tx`; a dropped receiver is ignored. The source is dropped
/// before `Finished` is sent.
pub fn run_tracker<S: VideoSource>(
    mut source: S,
    config: TrackerConfig,
    thresholds: &ThresholdHandle,
    stop: &AtomicBool,
    tx: &mpsc::Sender<TrackerEvent>,
) -> (RunRecord, FinishReason) {
    let (width, height) = source.dimensions();
    let mut session = TrackingSession::new(config, source.frame_rate());
    info!(
        width,
        height,
        fps = session.frame_rate(),
        "Tracking started"
    );

    let reason = loop {
        if stop.load(Ordering::Relaxed) {
            break FinishReason::Stopped;
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break FinishReason::EndOfStream,
            Err(e) => {
                warn!(error = %e, frame = session.frames_processed(), "Frame acquisition failed");
                break FinishReason::SourceError(e.to_string());
            }
        };

        let hsv = thresholds.get();
        let outcome = session.process(frame, &hsv);

        let _ = tx.send(TrackerEvent::Frame {
            frame_index: outcome.frame_index,
            detection: outcome.detection,
            payload: outcome.payload,
        });
        if let Some(sample) = outcome.sample {
            let _ = tx.send(TrackerEvent::Sample(sample));
        }
        if let Some(geometry) = outcome.geometry {
            let _ = tx.send(TrackerEvent::Geometry(geometry));
        }
    };

    drop(source);
    let record = session.into_record();
    info!(
        frames = record.frames_processed,
        samples = record.samples.len(),
        series = record.series.len(),
        reason = %reason,
        "Tracking finished"
    );

    let _ = tx.send(TrackerEvent::Finished {
        frames: record.frames_processed,
        samples: record.samples.len(),
        reason: reason.clone(),
    });

    (record, reason)
}

/// Control side of a running tracker thread.
pub struct TrackerHandle {
    stop: Arc<AtomicBool>,
    thresholds: ThresholdHandle,
    thread: JoinHandle<(RunRecord, FinishReason)>,
}

impl TrackerHandle {
    /// Ask the worker to stop at the next frame boundary.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn thresholds(&self) -> &ThresholdHandle {
        &self.thresholds
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the worker and take its record.
    pub fn join(self) -> Result<(RunRecord, FinishReason)> {
        self.thread.join().map_err(|_| PendulumError::WorkerPanicked)
    }
}

/// Start a tracker on its own thread.
pub fn spawn_tracker<S: VideoSource + 'static>(
    source: S,
    config: TrackerConfig,
    thresholds: ThresholdHandle,
) -> Result<(TrackerHandle, mpsc::Receiver<TrackerEvent>)> {
    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));

    let worker_stop = Arc::clone(&stop);
    let worker_thresholds = thresholds.clone();
    let thread = std::thread::Builder::new()
        .name("pendulum-tracker".into())
        .spawn(move || run_tracker(source, config, &worker_thresholds, &worker_stop, &tx))?;

    Ok((
        TrackerHandle {
            stop,
            thresholds,
            thread,
        },
        rx,
    ))
}
