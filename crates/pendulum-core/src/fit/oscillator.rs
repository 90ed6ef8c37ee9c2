//! Underdamped harmonic oscillator fit.
//!
//! Model: `x(t) = A·exp(-γt)·cos(ωt + φ) + C`, with ω in rad/s.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PendulumError, Result};
use crate::frame::PositionSample;

use super::guess::spectral_guess;
use super::lm::{levenberg_marquardt, Bounds, LeastSquaresProblem, LmOptions};

const PARAM_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OscillatorParams {
    pub amplitude: f64,
    pub damping: f64,
    pub angular_frequency: f64,
    pub phase: f64,
    pub offset: f64,
}

impl OscillatorParams {
    pub fn position(&self, t: f64) -> f64 {
        self.amplitude
            * (-self.damping * t).exp()
            * (self.angular_frequency * t + self.phase).cos()
            + self.offset
    }

    /// `C + A·exp(-γt)`
    pub fn upper_envelope(&self, t: f64) -> f64 {
        self.offset + self.amplitude * (-self.damping * t).exp()
    }

    /// `C - A·exp(-γt)`
    pub fn lower_envelope(&self, t: f64) -> f64 {
        self.offset - self.amplitude * (-self.damping * t).exp()
    }

    /// Oscillation frequency in Hz.
    pub fn frequency_hz(&self) -> f64 {
        self.angular_frequency / std::f64::consts::TAU
    }

    fn to_vector(self) -> DVector<f64> {
        DVector::from_vec(vec![
            self.amplitude,
            self.damping,
            self.angular_frequency,
            self.phase,
            self.offset,
        ])
    }

    fn from_vector(v: &DVector<f64>) -> Self {
        Self {
            amplitude: v[0],
            damping: v[1],
            angular_frequency: v[2],
            phase: v[3],
            offset: v[4],
        }
    }

    /// Equivalent parameters with `A ≥ 0`, `ω ≥ 0` and `φ` in (-π, π].
    pub fn canonical(self) -> Self {
        let mut p = self;
        if p.angular_frequency < 0.0 {
            p.angular_frequency = -p.angular_frequency;
            p.phase = -p.phase;
        }
        if p.amplitude < 0.0 {
            p.amplitude = -p.amplitude;
            p.phase += std::f64::consts::PI;
        }
        p.phase = wrap_phase(p.phase);
        p
    }
}

/// Wrap an angle into (-π, π].
pub fn wrap_phase(phase: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let mut p = phase.rem_euclid(TAU);
    if p > PI {
        p -= TAU;
    }
    p
}

/// Upper and lower envelope curves evaluated at `times`.
pub fn envelopes(params: &OscillatorParams, times: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let upper = times.iter().map(|&t| params.upper_envelope(t)).collect();
    let lower = times.iter().map(|&t| params.lower_envelope(t)).collect();
    (upper, lower)
}

/// Parameter constraints for the fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitBounds {
    /// Every parameter free.
    #[default]
    None,
    /// `A ≥ 0` and `ω ≥ 0`; damping, phase and offset free.
    Physical,
}

impl FitBounds {
    fn to_bounds(self) -> Option<Bounds> {
        match self {
            Self::None => None,
            Self::Physical => {
                let inf = f64::INFINITY;
                Some(Bounds {
                    lower: vec![0.0, -inf, 0.0, -inf, -inf],
                    upper: vec![inf; PARAM_COUNT],
                })
            }
        }
    }
}

/// Where the solver starts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum InitialGuess {
    /// Estimate from the dominant spectral peak of the series.
    #[default]
    Spectral,
    Fixed(OscillatorParams),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OscillatorFitConfig {
    #[serde(default)]
    pub bounds: FitBounds,
    #[serde(default)]
    pub initial_guess: InitialGuess,
    #[serde(default)]
    pub solver: LmOptions,
}

struct OscillatorProblem<'a> {
    times: &'a [f64],
    positions: &'a [f64],
}

impl LeastSquaresProblem for OscillatorProblem<'_> {
    fn num_params(&self) -> usize {
        PARAM_COUNT
    }

    fn num_residuals(&self) -> usize {
        self.times.len()
    }

    fn residuals(&self, params: &DVector<f64>) -> DVector<f64> {
        let p = OscillatorParams::from_vector(params);
        DVector::from_iterator(
            self.times.len(),
            self.times
                .iter()
                .zip(self.positions)
                .map(|(&t, &x)| p.position(t) - x),
        )
    }

    fn jacobian(&self, params: &DVector<f64>) -> DMatrix<f64> {
        let p = OscillatorParams::from_vector(params);
        let mut j = DMatrix::<f64>::zeros(self.times.len(), PARAM_COUNT);

        for (i, &t) in self.times.iter().enumerate() {
            let decay = (-p.damping * t).exp();
            let arg = p.angular_frequency * t + p.phase;
            let (sin, cos) = arg.sin_cos();

            j[(i, 0)] = decay * cos;
            j[(i, 1)] = -t * p.amplitude * decay * cos;
            j[(i, 2)] = -t * p.amplitude * decay * sin;
            j[(i, 3)] = -p.amplitude * decay * sin;
            j[(i, 4)] = 1.0;
        }

        j
    }
}

/// Fit the oscillator model to `(times, positions)` starting from `guess`.
///
/// Poorly conditioned input (fewer samples than parameters, a rank-deficient
/// Jacobian, non-finite values, no convergence) is an error; no fallback
/// parameters are substituted.
pub fn fit_oscillator(
    times: &[f64],
    positions: &[f64],
    guess: &OscillatorParams,
    bounds: FitBounds,
    options: &LmOptions,
) -> Result<OscillatorParams> {
    if times.len() != positions.len() {
        return Err(PendulumError::MismatchedSeries {
            times: times.len(),
            positions: positions.len(),
        });
    }
    if times.is_empty() {
        return Err(PendulumError::EmptySeries);
    }

    let problem = OscillatorProblem { times, positions };
    let box_bounds = bounds.to_bounds();
    let solution =
        levenberg_marquardt(&problem, guess.to_vector(), options, box_bounds.as_ref())?;

    let params = OscillatorParams::from_vector(&solution.params).canonical();
    debug!(
        iterations = solution.iterations,
        cost = solution.cost,
        "Oscillator solve finished"
    );
    Ok(params)
}

/// Fit a recorded position series, resolving the initial guess from `config`.
pub fn fit_series(
    series: &[PositionSample],
    config: &OscillatorFitConfig,
) -> Result<OscillatorParams> {
    let times: Vec<f64> = series.iter().map(|s| s.time).collect();
    let positions: Vec<f64> = series.iter().map(|s| s.x).collect();

    let guess = match &config.initial_guess {
        InitialGuess::Fixed(p) => *p,
        InitialGuess::Spectral => spectral_guess(&times, &positions)?,
    };

    let params = fit_oscillator(&times, &positions, &guess, config.bounds, &config.solver)?;
    info!(
        amplitude = params.amplitude,
        damping = params.damping,
        omega = params.angular_frequency,
        phase = params.phase,
        offset = params.offset,
        samples = series.len(),
        "Oscillator fit"
    );
    Ok(params)
}
