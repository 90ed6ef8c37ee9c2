use num_complex::Complex;
use rustfft::FftPlanner;

use crate::consts::SPECTRAL_PADDING_FACTOR;
use crate::error::{PendulumError, Result};

use super::oscillator::{wrap_phase, OscillatorParams};

const MIN_GUESS_SAMPLES: usize = 3;

/// Starting point for the oscillator fit from the dominant spectral peak.
///
/// Samples are treated as evenly spaced between the first and last time. The
/// mean-removed series is zero-padded before the FFT so the peak lands close
/// to the true frequency. Damping starts at zero.
pub fn spectral_guess(times: &[f64], positions: &[f64]) -> Result<OscillatorParams> {
    let n = times.len().min(positions.len());
    if n < MIN_GUESS_SAMPLES {
        return Err(PendulumError::InsufficientSamples {
            needed: MIN_GUESS_SAMPLES,
            got: n,
        });
    }

    let t0 = times[0];
    let dt = (times[n - 1] - t0) / (n - 1) as f64;
    if !(dt > 0.0) || !dt.is_finite() {
        return Err(PendulumError::DegenerateSeries(
            "sample times do not increase".into(),
        ));
    }

    let mean = positions[..n].iter().sum::<f64>() / n as f64;
    let len = (n * SPECTRAL_PADDING_FACTOR).next_power_of_two();

    let mut buffer: Vec<Complex<f64>> = positions[..n]
        .iter()
        .map(|&x| Complex::new(x - mean, 0.0))
        .collect();
    buffer.resize(len, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(len).process(&mut buffer);

    let (peak, value) = buffer[1..len / 2]
        .iter()
        .enumerate()
        .fold((0usize, Complex::new(0.0, 0.0)), |best, (i, &v)| {
            if v.norm() > best.1.norm() {
                (i + 1, v)
            } else {
                best
            }
        });

    if peak == 0 {
        return Err(PendulumError::DegenerateSeries(
            "series has no oscillating component".into(),
        ));
    }

    let omega = std::f64::consts::TAU * peak as f64 / (len as f64 * dt);

    Ok(OscillatorParams {
        amplitude: 2.0 * value.norm() / n as f64,
        damping: 0.0,
        angular_frequency: omega,
        phase: wrap_phase(value.arg() - omega * t0),
        offset: mean,
    })
}
