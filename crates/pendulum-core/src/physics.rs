use serde::{Deserialize, Serialize};

use crate::consts::STANDARD_GRAVITY;
use crate::fit::oscillator::OscillatorParams;

/// Which frequency parameterization results are reported in.
///
/// The fit itself always solves for angular frequency; this only picks the
/// length formula and the exported frequency column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrequencyConvention {
    /// ω in rad/s.
    #[default]
    AngularFrequency,
    /// f in Hz.
    Hertz,
}

impl FrequencyConvention {
    /// Fitted frequency expressed in this convention.
    pub fn frequency(self, params: &OscillatorParams) -> f64 {
        match self {
            Self::AngularFrequency => params.angular_frequency,
            Self::Hertz => params.frequency_hz(),
        }
    }

    /// Column header used when exporting parameters.
    pub fn column(self) -> &'static str {
        match self {
            Self::AngularFrequency => "omega",
            Self::Hertz => "f",
        }
    }
}

impl std::fmt::Display for FrequencyConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AngularFrequency => write!(f, "angular (rad/s)"),
            Self::Hertz => write!(f, "hertz"),
        }
    }
}

/// Small-oscillation pendulum length `g / ω²`, in metres.
pub fn pendulum_length(angular_frequency: f64) -> f64 {
    STANDARD_GRAVITY / (angular_frequency * angular_frequency)
}

/// Same relation for a frequency in Hz: `g / (2πf)²`.
pub fn pendulum_length_from_frequency(frequency_hz: f64) -> f64 {
    pendulum_length(std::f64::consts::TAU * frequency_hz)
}

/// Length from fitted parameters using the formula matching `convention`.
pub fn length_for(params: &OscillatorParams, convention: FrequencyConvention) -> f64 {
    match convention {
        FrequencyConvention::AngularFrequency => pendulum_length(params.angular_frequency),
        FrequencyConvention::Hertz => pendulum_length_from_frequency(params.frequency_hz()),
    }
}

/// Distance from the pivot to the surface of the bob, `L - L / ratio` with
/// `ratio = circle_radius_px / bob_radius_px`.
///
/// `None` when the ratio is undefined or any input is not finite.
pub fn surface_length(length: f64, circle_radius_px: f64, bob_radius_px: f64) -> Option<f64> {
    if !length.is_finite() || !circle_radius_px.is_finite() || !bob_radius_px.is_finite() {
        return None;
    }
    if bob_radius_px == 0.0 || circle_radius_px == 0.0 {
        return None;
    }

    let ratio = circle_radius_px / bob_radius_px;
    Some(length - length / ratio)
}
