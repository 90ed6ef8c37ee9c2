use approx::assert_abs_diff_eq;
use pendulum_core::error::PendulumError;
use pendulum_core::fit::guess::spectral_guess;
use pendulum_core::fit::lm::{LmOptions, SolverError};
use pendulum_core::fit::oscillator::{
    envelopes, fit_oscillator, fit_series, wrap_phase, FitBounds, InitialGuess,
    OscillatorFitConfig, OscillatorParams,
};
use pendulum_core::frame::PositionSample;

const TRUTH: OscillatorParams = OscillatorParams {
    amplitude: 50.0,
    damping: 0.05,
    angular_frequency: std::f64::consts::PI,
    phase: 0.3,
    offset: 160.0,
};

fn sample(params: &OscillatorParams, start: f64, end: f64, n: usize) -> (Vec<f64>, Vec<f64>) {
    let times: Vec<f64> = (0..n)
        .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
        .collect();
    let positions = times.iter().map(|&t| params.position(t)).collect();
    (times, positions)
}

fn series(times: &[f64], positions: &[f64]) -> Vec<PositionSample> {
    times
        .iter()
        .zip(positions)
        .map(|(&time, &x)| PositionSample { time, x, y: 0.0 })
        .collect()
}

fn assert_params_close(fit: &OscillatorParams, truth: &OscillatorParams, eps: f64) {
    assert_abs_diff_eq!(fit.amplitude, truth.amplitude, epsilon = eps);
    assert_abs_diff_eq!(fit.damping, truth.damping, epsilon = eps);
    assert_abs_diff_eq!(fit.angular_frequency, truth.angular_frequency, epsilon = eps);
    assert_abs_diff_eq!(wrap_phase(fit.phase - truth.phase), 0.0, epsilon = eps);
    assert_abs_diff_eq!(fit.offset, truth.offset, epsilon = eps);
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[test]
fn test_position_and_envelopes() {
    assert_abs_diff_eq!(TRUTH.position(0.0), 50.0 * 0.3f64.cos() + 160.0, epsilon = 1e-12);
    assert_abs_diff_eq!(TRUTH.upper_envelope(0.0), 210.0, epsilon = 1e-12);
    assert_abs_diff_eq!(TRUTH.lower_envelope(0.0), 110.0, epsilon = 1e-12);

    let times = [0.0, 1.0, 10.0];
    let (upper, lower) = envelopes(&TRUTH, &times);
    for (i, &t) in times.iter().enumerate() {
        let p = TRUTH.position(t);
        assert!(p <= upper[i] + 1e-9 && p >= lower[i] - 1e-9);
        assert_abs_diff_eq!(upper[i] + lower[i], 2.0 * TRUTH.offset, epsilon = 1e-9);
    }
}

#[test]
fn test_frequency_hz() {
    assert_abs_diff_eq!(TRUTH.frequency_hz(), 0.5, epsilon = 1e-12);
}

#[test]
fn test_canonical_form() {
    let flipped = OscillatorParams {
        amplitude: -50.0,
        phase: 0.3 + std::f64::consts::PI,
        ..TRUTH
    };
    let c = flipped.canonical();
    assert_abs_diff_eq!(c.amplitude, 50.0, epsilon = 1e-12);
    assert_abs_diff_eq!(wrap_phase(c.phase - 0.3), 0.0, epsilon = 1e-12);

    let mirrored = OscillatorParams {
        angular_frequency: -TRUTH.angular_frequency,
        phase: -TRUTH.phase,
        ..TRUTH
    };
    for t in [0.0, 0.7, 3.1] {
        assert_abs_diff_eq!(mirrored.canonical().position(t), TRUTH.position(t), epsilon = 1e-9);
    }
}

// ---------------------------------------------------------------------------
// Spectral initial guess
// ---------------------------------------------------------------------------

#[test]
fn test_spectral_guess_near_truth() {
    let undamped = OscillatorParams {
        damping: 0.0,
        ..TRUTH
    };
    let (times, positions) = sample(&undamped, 0.0, 12.0, 121);
    let guess = spectral_guess(&times, &positions).unwrap();

    assert_abs_diff_eq!(guess.angular_frequency, std::f64::consts::PI, epsilon = 0.05);
    assert_abs_diff_eq!(guess.offset, 160.0, epsilon = 1.0);
    assert!((guess.amplitude - 50.0).abs() < 10.0);
    assert_eq!(guess.damping, 0.0);
}

#[test]
fn test_spectral_guess_rejects_flat_series() {
    let times: Vec<f64> = (0..20).map(|i| i as f64 * 0.1).collect();
    let positions = vec![3.0; 20];
    assert!(matches!(
        spectral_guess(&times, &positions),
        Err(PendulumError::DegenerateSeries(_))
    ));
}

// ---------------------------------------------------------------------------
// Fit
// ---------------------------------------------------------------------------

#[test]
fn test_exact_recovery() {
    let (times, positions) = sample(&TRUTH, 0.0, 10.0, 101);
    let fit = fit_series(&series(&times, &positions), &OscillatorFitConfig::default()).unwrap();
    assert_params_close(&fit, &TRUTH, 1e-6);
}

#[test]
fn test_time_shift_invariance() {
    let (times, positions) = sample(&TRUTH, 5.0, 15.0, 101);
    let fit = fit_series(&series(&times, &positions), &OscillatorFitConfig::default()).unwrap();
    assert_params_close(&fit, &TRUTH, 1e-6);
}

#[test]
fn test_bounded_variant_recovers() {
    let (times, positions) = sample(&TRUTH, 0.0, 10.0, 101);
    let config = OscillatorFitConfig {
        bounds: FitBounds::Physical,
        ..OscillatorFitConfig::default()
    };
    let fit = fit_series(&series(&times, &positions), &config).unwrap();
    assert_params_close(&fit, &TRUTH, 1e-6);
    assert!(fit.amplitude >= 0.0 && fit.angular_frequency >= 0.0);
}

#[test]
fn test_fixed_guess() {
    let (times, positions) = sample(&TRUTH, 0.0, 10.0, 101);
    let start = OscillatorParams {
        amplitude: 48.0,
        damping: 0.0,
        angular_frequency: 3.1,
        phase: 0.2,
        offset: 159.0,
    };
    let config = OscillatorFitConfig {
        initial_guess: InitialGuess::Fixed(start),
        ..OscillatorFitConfig::default()
    };
    let fit = fit_series(&series(&times, &positions), &config).unwrap();
    assert_params_close(&fit, &TRUTH, 1e-6);
}

#[test]
fn test_too_few_samples_is_fit_failure() {
    let (times, positions) = sample(&TRUTH, 0.0, 1.0, 3);
    let err = fit_oscillator(&times, &positions, &TRUTH, FitBounds::None, &LmOptions::default());
    assert!(matches!(
        err,
        Err(PendulumError::Fit(SolverError::Underdetermined {
            residuals: 3,
            params: 5
        }))
    ));
}

#[test]
fn test_empty_and_mismatched_input() {
    let opts = LmOptions::default();
    assert!(matches!(
        fit_oscillator(&[], &[], &TRUTH, FitBounds::None, &opts),
        Err(PendulumError::EmptySeries)
    ));
    assert!(matches!(
        fit_oscillator(&[0.0, 1.0], &[0.0], &TRUTH, FitBounds::None, &opts),
        Err(PendulumError::MismatchedSeries {
            times: 2,
            positions: 1
        })
    ));
}

#[test]
fn test_non_finite_data_is_fit_failure() {
    let (times, mut positions) = sample(&TRUTH, 0.0, 10.0, 50);
    positions[7] = f64::NAN;
    let err = fit_oscillator(&times, &positions, &TRUTH, FitBounds::None, &LmOptions::default());
    assert!(matches!(err, Err(PendulumError::Fit(SolverError::NonFinite))));
}
