pub mod circle;
pub mod guess;
pub mod lm;
pub mod oscillator;

pub use circle::{fit_rotated_circle, CircleFit, RotatedCircleEstimator};
pub use oscillator::{
    envelopes, fit_oscillator, fit_series, FitBounds, InitialGuess, OscillatorFitConfig,
    OscillatorParams,
};
