mod common;

use std::sync::atomic::AtomicBool;
use std::sync::mpsc;

use common::{disc_frame, horizontal_frames, pendulum_frames, BACKGROUND, BOB_COLOR};
use pendulum_core::color::HsvRange;
use pendulum_core::error::{PendulumError, Result};
use pendulum_core::frame::Frame;
use pendulum_core::io::{InMemorySource, VideoSource};
use pendulum_core::physics::{pendulum_length, FrequencyConvention};
use pendulum_core::tracker::{
    analyze, run_tracker, spawn_tracker, FinishReason, FramePayload, FramePayloadKind,
    ThresholdHandle, TrackerConfig, TrackerEvent, TrackingSession,
};

const FPS: f64 = 10.0;

/// Yields `good` frames, then fails.
struct FailingSource {
    frames: Vec<Frame>,
}

impl VideoSource for FailingSource {
    fn frame_rate(&self) -> f64 {
        FPS
    }

    fn dimensions(&self) -> (usize, usize) {
        (320, 240)
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        match self.frames.pop() {
            Some(f) => Ok(Some(f)),
            None => Err(PendulumError::InvalidSer("device unplugged".into())),
        }
    }
}

fn bob_frame() -> Frame {
    disc_frame(320, 240, (100.0, 120.0), 10.0, BOB_COLOR, BACKGROUND)
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[test]
fn test_end_to_end_recovers_motion() {
    let source = InMemorySource::new(pendulum_frames(120, FPS), FPS);
    let config = TrackerConfig::default();

    let (handle, events) =
        spawn_tracker(source, config.clone(), ThresholdHandle::default()).unwrap();
    let events: Vec<TrackerEvent> = events.iter().collect();
    let (record, reason) = handle.join().unwrap();

    assert_eq!(reason, FinishReason::EndOfStream);
    assert_eq!(record.frames_processed, 120);
    assert_eq!(record.series.len(), 24);
    assert_eq!(record.samples.len(), 24);
    assert!(record.circle.is_some());
    assert!((record.bob_radius.unwrap() - 10.0).abs() < 1.0);

    let frame_events = events
        .iter()
        .filter(|e| matches!(e, TrackerEvent::Frame { .. }))
        .count();
    let sample_events = events
        .iter()
        .filter(|e| matches!(e, TrackerEvent::Sample(_)))
        .count();
    assert_eq!(frame_events, 120);
    assert_eq!(sample_events, 24);
    assert!(matches!(
        events.last(),
        Some(TrackerEvent::Finished {
            frames: 120,
            samples: 24,
            reason: FinishReason::EndOfStream
        })
    ));

    for (i, s) in record.series.iter().enumerate() {
        assert!((s.time - i as f64 * 0.5).abs() < 1e-12);
    }

    let analysis =
        analyze(&record, &config.oscillator, FrequencyConvention::AngularFrequency).unwrap();
    let omega = analysis.params.angular_frequency;
    let amplitude = analysis.params.amplitude;
    let pi = std::f64::consts::PI;
    assert!((omega - pi).abs() / pi < 0.05, "omega {omega}");
    assert!((amplitude - 50.0).abs() / 50.0 < 0.05, "amplitude {amplitude}");
    assert!((analysis.length - pendulum_length(omega)).abs() < 1e-12);
    assert!(analysis.surface_length.is_some());
}

#[test]
fn test_horizontal_motion_recovers_frequency_without_pivot() {
    let source = InMemorySource::new(horizontal_frames(120, FPS), FPS);
    let config = TrackerConfig::default();

    let (handle, _events) =
        spawn_tracker(source, config.clone(), ThresholdHandle::default()).unwrap();
    let (record, reason) = handle.join().unwrap();

    assert_eq!(reason, FinishReason::EndOfStream);
    assert_eq!(record.series.len(), 24);
    // Collinear samples never yield a pivot.
    assert!(record.circle.is_none());
    for s in &record.series {
        assert!((s.y - 120.0).abs() < 0.5);
    }

    let analysis =
        analyze(&record, &config.oscillator, FrequencyConvention::AngularFrequency).unwrap();
    let pi = std::f64::consts::PI;
    let omega = analysis.params.angular_frequency;
    let amplitude = analysis.params.amplitude;
    assert!((omega - pi).abs() / pi < 0.05, "omega {omega}");
    assert!((amplitude - 50.0).abs() / 50.0 < 0.05, "amplitude {amplitude}");
    assert!(analysis.surface_length.is_none());
}

#[test]
fn test_geometry_updates_track_extent() {
    let frames = pendulum_frames(40, FPS);
    let (tx, rx) = mpsc::channel();
    let stop = AtomicBool::new(false);

    run_tracker(
        InMemorySource::new(frames, FPS),
        TrackerConfig::default(),
        &ThresholdHandle::default(),
        &stop,
        &tx,
    );
    drop(tx);

    let updates: Vec<_> = rx
        .iter()
        .filter_map(|e| match e {
            TrackerEvent::Geometry(g) => Some(g),
            _ => None,
        })
        .collect();
    assert_eq!(updates.len(), 8);

    let last = updates.last().unwrap();
    assert!(last.x_min < 115.0 && last.x_max > 205.0);
    for pair in updates.windows(2) {
        assert!(pair[1].x_min <= pair[0].x_min);
        assert!(pair[1].x_max >= pair[0].x_max);
    }
    // Four samples are needed before the first circle fit.
    assert!(updates[0].circle.is_none());
    assert!(last.circle.is_some());
}

// ---------------------------------------------------------------------------
// Sampling policy
// ---------------------------------------------------------------------------

#[test]
fn test_sampling_cadence_and_cap() {
    let mut config = TrackerConfig::default();
    config.sampling.cadence = 2;
    config.sampling.max_samples = 5;

    let mut session = TrackingSession::new(config, FPS);
    let hsv = HsvRange::default();
    for frame in pendulum_frames(30, FPS) {
        session.process(frame, &hsv);
    }

    assert_eq!(session.frames_processed(), 30);
    assert_eq!(session.samples().len(), 5);
    assert_eq!(session.series().len(), 15);
    let indices: Vec<usize> = session.samples().iter().map(|s| s.frame_index).collect();
    assert_eq!(indices, vec![0, 2, 4, 6, 8]);
}

#[test]
fn test_frames_without_detection_are_skipped() {
    let mut session = TrackingSession::new(TrackerConfig::default(), FPS);
    let hsv = HsvRange::default();

    let outcome = session.process(Frame::filled(320, 240, BACKGROUND), &hsv);
    assert!(outcome.detection.is_none());
    assert!(outcome.sample.is_none());

    // Frame 1 is off-cadence, frame 5 is sampled.
    for _ in 1..5 {
        session.process(bob_frame(), &hsv);
    }
    let outcome = session.process(bob_frame(), &hsv);
    assert_eq!(outcome.frame_index, 5);
    let sample = outcome.sample.unwrap();
    assert!((sample.time - 0.5).abs() < 1e-12);
    assert_eq!(session.series().len(), 1);
}

#[test]
fn test_unusable_frame_rate_uses_fallback() {
    let session = TrackingSession::new(TrackerConfig::default(), 0.0);
    assert_eq!(session.frame_rate(), 30.0);
}

#[test]
fn test_payload_kinds() {
    let hsv = HsvRange::default();
    let mut config = TrackerConfig::default();

    config.output.payload = FramePayloadKind::Mask;
    let outcome = TrackingSession::new(config.clone(), FPS).process(bob_frame(), &hsv);
    match outcome.payload {
        Some(FramePayload::Mask(mask)) => assert!(mask[[120, 100]]),
        other => panic!("expected mask payload, got {other:?}"),
    }

    config.output.payload = FramePayloadKind::Annotated;
    let outcome = TrackingSession::new(config.clone(), FPS).process(bob_frame(), &hsv);
    match outcome.payload {
        Some(FramePayload::Annotated(frame)) => assert_ne!(frame.data, bob_frame().data),
        other => panic!("expected annotated payload, got {other:?}"),
    }

    config.output.payload = FramePayloadKind::None;
    let outcome = TrackingSession::new(config, FPS).process(bob_frame(), &hsv);
    assert!(outcome.payload.is_none());
}

// ---------------------------------------------------------------------------
// Cancellation, failures, shared thresholds
// ---------------------------------------------------------------------------

#[test]
fn test_stop_before_first_frame() {
    let (tx, rx) = mpsc::channel();
    let stop = AtomicBool::new(true);

    let (record, reason) = run_tracker(
        InMemorySource::new(pendulum_frames(10, FPS), FPS),
        TrackerConfig::default(),
        &ThresholdHandle::default(),
        &stop,
        &tx,
    );

    assert_eq!(reason, FinishReason::Stopped);
    assert_eq!(record.frames_processed, 0);
    assert!(matches!(
        rx.try_recv(),
        Ok(TrackerEvent::Finished {
            reason: FinishReason::Stopped,
            ..
        })
    ));
}

#[test]
fn test_stop_handle_ends_run() {
    let source = InMemorySource::new(pendulum_frames(200, FPS), FPS);
    let (handle, events) =
        spawn_tracker(source, TrackerConfig::default(), ThresholdHandle::default()).unwrap();
    handle.stop();

    let last = events.iter().last();
    let (record, reason) = handle.join().unwrap();
    assert!(matches!(last, Some(TrackerEvent::Finished { .. })));
    assert!(record.frames_processed <= 200);
    assert!(reason == FinishReason::Stopped || reason == FinishReason::EndOfStream);
}

#[test]
fn test_source_failure_ends_run_gracefully() {
    let (tx, rx) = mpsc::channel();
    let stop = AtomicBool::new(false);
    let source = FailingSource {
        frames: vec![bob_frame(); 3],
    };

    let (record, reason) = run_tracker(
        source,
        TrackerConfig::default(),
        &ThresholdHandle::default(),
        &stop,
        &tx,
    );

    assert!(matches!(reason, FinishReason::SourceError(_)));
    assert_eq!(record.frames_processed, 3);
    assert_eq!(record.series.len(), 1);
    drop(tx);
    assert!(matches!(rx.iter().last(), Some(TrackerEvent::Finished { .. })));
}

#[test]
fn test_dropped_observer_does_not_block() {
    let (tx, rx) = mpsc::channel();
    drop(rx);
    let stop = AtomicBool::new(false);

    let (record, reason) = run_tracker(
        InMemorySource::new(pendulum_frames(20, FPS), FPS),
        TrackerConfig::default(),
        &ThresholdHandle::default(),
        &stop,
        &tx,
    );
    assert_eq!(reason, FinishReason::EndOfStream);
    assert_eq!(record.series.len(), 4);
}

#[test]
fn test_thresholds_read_each_frame() {
    let (tx, _rx) = mpsc::channel();
    let stop = AtomicBool::new(false);
    let excluding = HsvRange {
        hmin: 50,
        hmax: 70,
        ..HsvRange::default()
    };

    let (record, _) = run_tracker(
        InMemorySource::new(pendulum_frames(20, FPS), FPS),
        TrackerConfig::default(),
        &ThresholdHandle::new(excluding),
        &stop,
        &tx,
    );
    assert!(record.series.is_empty());
    assert!(matches!(
        analyze(
            &record,
            &TrackerConfig::default().oscillator,
            FrequencyConvention::AngularFrequency
        ),
        Err(PendulumError::EmptySeries)
    ));
}

#[test]
fn test_threshold_handle_is_shared() {
    let handle = ThresholdHandle::default();
    let other = handle.clone();
    let range = HsvRange {
        hmin: 1,
        ..HsvRange::default()
    };
    other.set(range);
    assert_eq!(handle.get(), range);
}
