//! Rotated-circle fit for the pivot geometry.
//!
//! Samples are modelled as lying on a circle of center `(a, b)` and radius `r`
//! seen through a frame rotated by `theta`. Each residual rotates
//! `(x - a, y - b)` by `-theta` and compares the squared distance with `r²`.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::MIN_CIRCLE_SAMPLES;
use crate::error::{PendulumError, Result};
use crate::frame::{Point, SamplePoint};
use crate::transform::rotation;

use super::lm::{levenberg_marquardt, LeastSquaresProblem, LmOptions};

/// Pivot geometry estimate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleFit {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub rotation_angle: f64,
}

impl CircleFit {
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    fn to_vector(self) -> DVector<f64> {
        DVector::from_vec(vec![
            self.center_x,
            self.center_y,
            self.radius,
            self.rotation_angle,
        ])
    }

    fn from_vector(v: &DVector<f64>) -> Self {
        Self {
            center_x: v[0],
            center_y: v[1],
            radius: v[2],
            rotation_angle: v[3],
        }
    }
}

impl Default for CircleFit {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            radius: 1.0,
            rotation_angle: 0.0,
        }
    }
}

struct RotatedCircleProblem<'a> {
    samples: &'a [Point],
}

impl RotatedCircleProblem<'_> {
    /// Sample offset from the center, rotated by `-theta`.
    fn rotated(&self, p: &Point, a: f64, b: f64, cos: f64, sin: f64) -> (f64, f64) {
        let dx = p.x - a;
        let dy = p.y - b;
        (dx * cos + dy * sin, -dx * sin + dy * cos)
    }
}

impl LeastSquaresProblem for RotatedCircleProblem<'_> {
    fn num_params(&self) -> usize {
        4
    }

    fn num_residuals(&self) -> usize {
        self.samples.len()
    }

    /// Theta never changes a residual, so only `(a, b, r)` are identifiable.
    fn identifiable_params(&self) -> usize {
        3
    }

    fn residuals(&self, params: &DVector<f64>) -> DVector<f64> {
        let (a, b, r) = (params[0], params[1], params[2]);
        let (cos, sin) = rotation(params[3]);
        DVector::from_iterator(
            self.samples.len(),
            self.samples.iter().map(|p| {
                let (xr, yr) = self.rotated(p, a, b, cos, sin);
                xr * xr + yr * yr - r * r
            }),
        )
    }

    fn jacobian(&self, params: &DVector<f64>) -> DMatrix<f64> {
        let (a, b, r) = (params[0], params[1], params[2]);
        let (cos, sin) = rotation(params[3]);
        let mut j = DMatrix::<f64>::zeros(self.samples.len(), 4);

        for (i, p) in self.samples.iter().enumerate() {
            let (xr, yr) = self.rotated(p, a, b, cos, sin);
            j[(i, 0)] = -2.0 * (xr * cos - yr * sin);
            j[(i, 1)] = -2.0 * (xr * sin + yr * cos);
            j[(i, 2)] = -2.0 * r;
            // d(xr)/dθ = yr and d(yr)/dθ = -xr.
            j[(i, 3)] = 2.0 * (xr * yr + yr * -xr);
        }

        j
    }
}

/// Least-squares rotated circle through `samples`, seeded from `initial_guess`.
/// No parameter is bounded.
///
/// Coincident or collinear samples leave the center and radius undetermined
/// and fail with a singular-Jacobian error.
pub fn fit_rotated_circle(
    samples: &[Point],
    initial_guess: &CircleFit,
    options: &LmOptions,
) -> Result<CircleFit> {
    if samples.len() < MIN_CIRCLE_SAMPLES {
        return Err(PendulumError::InsufficientSamples {
            needed: MIN_CIRCLE_SAMPLES,
            got: samples.len(),
        });
    }

    let problem = RotatedCircleProblem { samples };
    let solution = levenberg_marquardt(&problem, initial_guess.to_vector(), options, None)?;

    // The residual depends on r² only.
    let mut fit = CircleFit::from_vector(&solution.params);
    fit.radius = fit.radius.abs();
    Ok(fit)
}

/// Keeps the latest successful circle fit across refits.
///
/// A refit is always computed from the full sample set, seeded from the last
/// success (or the fixed initial guess). The stored fit changes only when a
/// refit succeeds.
#[derive(Clone, Debug)]
pub struct RotatedCircleEstimator {
    initial_guess: CircleFit,
    options: LmOptions,
    current: Option<CircleFit>,
}

impl RotatedCircleEstimator {
    pub fn new(initial_guess: CircleFit, options: LmOptions) -> Self {
        Self {
            initial_guess,
            options,
            current: None,
        }
    }

    /// Last successful fit, if any.
    pub fn current(&self) -> Option<&CircleFit> {
        self.current.as_ref()
    }

    /// Geometry to use right now: the last fit, else the initial guess.
    pub fn geometry(&self) -> CircleFit {
        self.current.unwrap_or(self.initial_guess)
    }

    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Refit from all samples. Returns `true` when the stored fit was replaced.
    pub fn refit(&mut self, samples: &[SamplePoint]) -> bool {
        if samples.len() < MIN_CIRCLE_SAMPLES {
            debug!(samples = samples.len(), "Too few samples for circle fit");
            return false;
        }

        let points: Vec<Point> = samples.iter().map(|s| Point::new(s.x, s.y)).collect();
        let seed = self.geometry();

        match fit_rotated_circle(&points, &seed, &self.options) {
            Ok(fit) if is_usable(&fit) => {
                debug!(
                    center_x = fit.center_x,
                    center_y = fit.center_y,
                    radius = fit.radius,
                    theta = fit.rotation_angle,
                    "Circle refit"
                );
                self.current = Some(fit);
                true
            }
            Ok(fit) => {
                warn!(?fit, "Discarding degenerate circle fit");
                false
            }
            Err(e) => {
                warn!(error = %e, samples = samples.len(), "Circle fit failed, keeping previous");
                false
            }
        }
    }
}

fn is_usable(fit: &CircleFit) -> bool {
    fit.center_x.is_finite()
        && fit.center_y.is_finite()
        && fit.radius.is_finite()
        && fit.rotation_angle.is_finite()
        && fit.radius != 0.0
}
