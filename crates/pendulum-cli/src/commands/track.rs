use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use pendulum_core::color::HsvRange;
use pendulum_core::consts::DEFAULT_FRAME_RATE;
use pendulum_core::io::export::{save_params, save_series};
use pendulum_core::io::image_io::save_frame_png;
use pendulum_core::io::thresholds::load_thresholds;
use pendulum_core::segment::SegmentationMode;
use pendulum_core::tracker::{
    analyze, spawn_tracker, FramePayloadKind, ThresholdHandle, TrackerEvent, TrackerHandle,
};

use tracing::debug;

use super::{bounds_for, load_config, open_source, ConventionArg};
use crate::summary::{print_analysis, print_run_summary};

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Color,
    Edge,
    Circle,
    BestCircle,
}

impl From<ModeArg> for SegmentationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Color => SegmentationMode::ColorThreshold,
            ModeArg::Edge => SegmentationMode::EdgeDetect,
            ModeArg::Circle => SegmentationMode::CircleDetect { best_only: false },
            ModeArg::BestCircle => SegmentationMode::CircleDetect { best_only: true },
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DumpArg {
    Raw,
    Annotated,
    Mask,
}

impl From<DumpArg> for FramePayloadKind {
    fn from(arg: DumpArg) -> Self {
        match arg {
            DumpArg::Raw => FramePayloadKind::Raw,
            DumpArg::Annotated => FramePayloadKind::Annotated,
            DumpArg::Mask => FramePayloadKind::Mask,
        }
    }
}

#[derive(Args)]
pub struct TrackArgs {
    /// Input SER file or image directory
    pub input: PathBuf,

    /// TOML tracker config (see `pendulum config`)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// HSV threshold JSON; defaults are used if it cannot be read
    #[arg(long)]
    pub thresholds: Option<PathBuf>,

    /// Segmentation strategy, overrides the config
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Minimum region area in pixels, overrides the config
    #[arg(long)]
    pub min_area: Option<usize>,

    /// Sample every Nth frame, overrides the config
    #[arg(long)]
    pub cadence: Option<usize>,

    /// Frame rate assumed when the source has no timestamps
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE)]
    pub fps: f64,

    /// Position series CSV output
    #[arg(short, long, default_value = "series.csv")]
    pub output: PathBuf,

    /// Fitted parameter CSV output
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Skip the oscillator fit
    #[arg(long)]
    pub no_fit: bool,

    /// Constrain amplitude and frequency to be non-negative
    #[arg(long)]
    pub bounded: bool,

    /// Frequency convention for reported results, overrides the config
    #[arg(long, value_enum)]
    pub convention: Option<ConventionArg>,

    /// Write every frame as PNG into this directory
    #[arg(long)]
    pub dump_frames: Option<PathBuf>,

    /// What to draw into dumped frames
    #[arg(long, value_enum, default_value = "annotated")]
    pub dump: DumpArg,
}

pub fn run(args: &TrackArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(mode) = args.mode {
        config.segmentation.mode = mode.into();
    }
    if let Some(min_area) = args.min_area {
        config.detection.min_area = min_area;
    }
    if let Some(cadence) = args.cadence {
        config.sampling.cadence = cadence;
    }
    if let Some(convention) = args.convention {
        config.convention = convention.into();
    }
    if args.bounded {
        config.oscillator.bounds = bounds_for(true);
    }
    if let Some(ref dir) = args.dump_frames {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        config.output.payload = args.dump.into();
    }
    config.sampling.fallback_frame_rate = args.fps;

    let hsv = args
        .thresholds
        .as_deref()
        .map(load_thresholds)
        .unwrap_or_else(HsvRange::default);

    let (source, info) = open_source(&args.input, args.fps)?;
    println!(
        "Tracking {} frames ({}x{}, {:.2} fps, {})",
        info.total_frames, info.width, info.height, info.frame_rate, config.segmentation.mode
    );

    let oscillator = config.oscillator.clone();
    let convention = config.convention;
    let (handle, events) = spawn_tracker(source, config, ThresholdHandle::new(hsv))?;

    let pb = ProgressBar::new(info.total_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Tracking [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    drain_events(&handle, events, args.dump_frames.as_deref(), &pb)?;
    pb.finish();

    let (record, reason) = handle.join()?;
    print_run_summary(&record, &reason);

    save_series(&args.output, &record.series)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("Series saved to {}", args.output.display());

    if args.no_fit {
        return Ok(());
    }

    let analysis = analyze(&record, &oscillator, convention).context("Oscillator fit failed")?;
    print_analysis(&analysis);

    if let Some(ref path) = args.params {
        save_params(path, &analysis.params, convention)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Parameters saved to {}", path.display());
    }

    Ok(())
}

/// Follow the worker until it finishes, dumping frame payloads into `dump_dir`.
///
/// On a write failure the worker is told to stop before the error is returned.
fn drain_events(
    handle: &TrackerHandle,
    events: Receiver<TrackerEvent>,
    dump_dir: Option<&Path>,
    pb: &ProgressBar,
) -> Result<()> {
    let mut samples = 0usize;
    for event in events {
        match event {
            TrackerEvent::Frame {
                frame_index,
                payload,
                ..
            } => {
                pb.inc(1);
                if let (Some(dir), Some(payload)) = (dump_dir, payload) {
                    let path = dir.join(format!("frame_{frame_index:05}.png"));
                    if let Err(e) = save_frame_png(&payload.to_frame(), &path) {
                        pb.abandon();
                        handle.stop();
                        return Err(e)
                            .with_context(|| format!("Failed to write {}", path.display()));
                    }
                }
            }
            TrackerEvent::Sample(_) => {
                samples += 1;
                pb.set_message(format!("{samples} samples"));
            }
            TrackerEvent::Geometry(update) => {
                debug!(
                    bob_radius = update.bob_radius,
                    x_min = update.x_min,
                    x_max = update.x_max,
                    has_circle = update.circle.is_some(),
                    "geometry update"
                );
            }
            TrackerEvent::Finished { .. } => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pendulum_core::error::Result as CoreResult;
    use pendulum_core::frame::Frame;
    use pendulum_core::io::VideoSource;
    use pendulum_core::tracker::{FinishReason, TrackerConfig};

    /// Never runs out of frames.
    struct EndlessSource;

    impl VideoSource for EndlessSource {
        fn frame_rate(&self) -> f64 {
            10.0
        }

        fn dimensions(&self) -> (usize, usize) {
            (8, 8)
        }

        fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
            Ok(Some(Frame::filled(8, 8, [0, 0, 0])))
        }
    }

    #[test]
    fn test_dump_failure_stops_worker() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        // A regular file cannot hold frame dumps.
        let dump_dir = blocker.path().join("frames");

        let mut config = TrackerConfig::default();
        config.output.payload = FramePayloadKind::Raw;
        let (handle, events) =
            spawn_tracker(EndlessSource, config, ThresholdHandle::default()).unwrap();

        let result = drain_events(&handle, events, Some(&dump_dir), &ProgressBar::hidden());
        assert!(result.is_err());

        let (record, reason) = handle.join().unwrap();
        assert_eq!(reason, FinishReason::Stopped);
        assert!(record.frames_processed >= 1);
    }
}
