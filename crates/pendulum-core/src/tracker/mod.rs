//! Frame-by-frame tracking run on a worker thread, and on-demand analysis
//! of what it recorded.

pub mod analysis;
pub mod config;
pub mod events;
pub mod session;
pub mod shared;
pub mod worker;

pub use analysis::{analyze, analyze_series, Analysis};
pub use config::{FramePayloadKind, TrackerConfig};
pub use events::{FinishReason, FramePayload, GeometryUpdate, TrackerEvent};
pub use session::{FrameOutcome, RunRecord, TrackingSession};
pub use shared::ThresholdHandle;
pub use worker::{run_tracker, spawn_tracker, TrackerHandle};
