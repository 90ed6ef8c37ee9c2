use tracing::info;

use crate::error::{PendulumError, Result};
use crate::fit::oscillator::{fit_series, OscillatorFitConfig, OscillatorParams};
use crate::frame::PositionSample;
use crate::physics::{length_for, surface_length, FrequencyConvention};

use super::session::RunRecord;

/// Fitted motion and the quantities derived from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Analysis {
    pub params: OscillatorParams,
    pub convention: FrequencyConvention,
    /// Pendulum length in metres.
    pub length: f64,
    /// Pivot to bob surface, when the pixel geometry is known.
    pub surface_length: Option<f64>,
    pub samples: usize,
}

/// Fit a finished (or paused) run.
pub fn analyze(
    record: &RunRecord,
    config: &OscillatorFitConfig,
    convention: FrequencyConvention,
) -> Result<Analysis> {
    analyze_series(
        &record.series,
        record.circle.map(|c| c.radius),
        record.bob_radius,
        config,
        convention,
    )
}

/// Fit a bare series; pixel radii are optional.
pub fn analyze_series(
    series: &[PositionSample],
    circle_radius_px: Option<f64>,
    bob_radius_px: Option<f64>,
    config: &OscillatorFitConfig,
    convention: FrequencyConvention,
) -> Result<Analysis> {
    if series.is_empty() {
        return Err(PendulumError::EmptySeries);
    }

    let params = fit_series(series, config)?;
    let length = length_for(&params, convention);
    let surface = match (circle_radius_px, bob_radius_px) {
        (Some(circle), Some(bob)) => surface_length(length, circle, bob),
        _ => None,
    };

    info!(length, surface_length = ?surface, %convention, "Derived quantities");
    Ok(Analysis {
        params,
        convention,
        length,
        surface_length: surface,
        samples: series.len(),
    })
}
