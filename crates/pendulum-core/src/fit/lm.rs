//! Levenberg-Marquardt for small dense problems.
//!
//! Normal equations are damped with `lambda * diag(JᵀJ)` and solved by
//! Cholesky. Optional box bounds are enforced by projecting every trial point.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{
    LM_FTOL, LM_GTOL, LM_INITIAL_LAMBDA, LM_MAX_ITERATIONS, LM_SINGULAR_RATIO, LM_XTOL,
};

const MAX_LAMBDA: f64 = 1e16;
const MIN_LAMBDA: f64 = 1e-15;
/// Keeps the damping term positive for parameters the residuals ignore.
const DIAG_FLOOR: f64 = 1e-12;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("{residuals} residuals cannot determine {params} parameters")]
    Underdetermined { residuals: usize, params: usize },

    #[error("residuals or Jacobian became non-finite")]
    NonFinite,

    #[error("Jacobian is singular at the solution (singular value ratio {ratio:e})")]
    Singular { ratio: f64 },

    #[error("no convergence after {iterations} iterations")]
    NotConverged { iterations: usize },
}

/// A residual vector and its Jacobian as functions of the parameter vector.
pub trait LeastSquaresProblem {
    fn num_params(&self) -> usize;
    fn num_residuals(&self) -> usize;
    fn residuals(&self, params: &DVector<f64>) -> DVector<f64>;
    /// Shape: (num_residuals, num_params).
    fn jacobian(&self, params: &DVector<f64>) -> DMatrix<f64>;

    /// Leading parameters the residuals can pin down. The rank check only
    /// looks at these Jacobian columns; trailing ones may be gauge freedoms.
    fn identifiable_params(&self) -> usize {
        self.num_params()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LmOptions {
    pub max_iterations: usize,
    pub initial_lambda: f64,
    /// Relative cost reduction below which the solve stops.
    pub ftol: f64,
    /// Relative step size below which the solve stops.
    pub xtol: f64,
    /// Gradient max-norm below which the solve stops.
    pub gtol: f64,
    /// Reject solutions whose Jacobian is rank deficient over the
    /// identifiable parameters.
    pub check_rank: bool,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            max_iterations: LM_MAX_ITERATIONS,
            initial_lambda: LM_INITIAL_LAMBDA,
            ftol: LM_FTOL,
            xtol: LM_XTOL,
            gtol: LM_GTOL,
            check_rank: true,
        }
    }
}

/// Per-parameter box constraints. Use infinities for open sides.
#[derive(Clone, Debug, PartialEq)]
pub struct Bounds {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Bounds {
    fn project(&self, x: &mut DVector<f64>) {
        for (i, v) in x.iter_mut().enumerate() {
            *v = v.clamp(self.lower[i], self.upper[i]);
        }
    }
}

#[derive(Clone, Debug)]
pub struct LmSolution {
    pub params: DVector<f64>,
    /// Half the sum of squared residuals.
    pub cost: f64,
    pub iterations: usize,
}

pub fn levenberg_marquardt<P: LeastSquaresProblem>(
    problem: &P,
    initial: DVector<f64>,
    options: &LmOptions,
    bounds: Option<&Bounds>,
) -> Result<LmSolution, SolverError> {
    let n = problem.num_params();
    let m = problem.num_residuals();
    if m < n {
        return Err(SolverError::Underdetermined {
            residuals: m,
            params: n,
        });
    }

    let mut x = initial;
    if let Some(b) = bounds {
        b.project(&mut x);
    }

    let mut r = problem.residuals(&x);
    if !all_finite(r.iter()) {
        return Err(SolverError::NonFinite);
    }
    let mut cost = 0.5 * r.norm_squared();
    let mut lambda = options.initial_lambda;

    for iteration in 1..=options.max_iterations {
        let j = problem.jacobian(&x);
        if !all_finite(j.iter()) {
            return Err(SolverError::NonFinite);
        }

        let g = j.tr_mul(&r);
        if cost == 0.0 || g.amax() <= options.gtol {
            return finish(problem, x, cost, iteration, options);
        }

        let jtj = j.tr_mul(&j);
        loop {
            let mut a = jtj.clone();
            for i in 0..n {
                a[(i, i)] += lambda * jtj[(i, i)].max(DIAG_FLOOR);
            }

            let Some(chol) = a.cholesky() else {
                lambda *= 10.0;
                if lambda > MAX_LAMBDA {
                    return finish(problem, x, cost, iteration, options);
                }
                continue;
            };

            let mut candidate = &x + chol.solve(&(-&g));
            if let Some(b) = bounds {
                b.project(&mut candidate);
            }

            let r_new = problem.residuals(&candidate);
            let cost_new = if all_finite(r_new.iter()) {
                0.5 * r_new.norm_squared()
            } else {
                f64::INFINITY
            };

            if cost_new < cost {
                let step_norm = (&candidate - &x).norm();
                let reduction = cost - cost_new;
                let previous = cost;

                x = candidate;
                r = r_new;
                cost = cost_new;
                lambda = (lambda / 10.0).max(MIN_LAMBDA);

                if reduction <= options.ftol * previous
                    || step_norm <= options.xtol * (x.norm() + options.xtol)
                {
                    return finish(problem, x, cost, iteration, options);
                }
                break;
            }

            lambda *= 10.0;
            if lambda > MAX_LAMBDA {
                // No descent left at machine precision.
                return finish(problem, x, cost, iteration, options);
            }
        }
    }

    Err(SolverError::NotConverged {
        iterations: options.max_iterations,
    })
}

fn finish<P: LeastSquaresProblem>(
    problem: &P,
    params: DVector<f64>,
    cost: f64,
    iterations: usize,
    options: &LmOptions,
) -> Result<LmSolution, SolverError> {
    if options.check_rank {
        let j = problem.jacobian(&params);
        let k = problem.identifiable_params().clamp(1, j.ncols());
        let sv = j.columns(0, k).clone_owned().singular_values();
        let max = sv.max();
        let min = sv.min();
        let ratio = if max > 0.0 { min / max } else { 0.0 };
        if !ratio.is_finite() || ratio < LM_SINGULAR_RATIO {
            return Err(SolverError::Singular { ratio });
        }
    }

    Ok(LmSolution {
        params,
        cost,
        iterations,
    })
}

fn all_finite<'a>(mut values: impl Iterator<Item = &'a f64>) -> bool {
    values.all(|v| v.is_finite())
}
