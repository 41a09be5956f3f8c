//! The outer optimization strategies walking the nonlinear fit parameters.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::FitError;

/// One nonlinear fit parameter: name, starting guess and bounds.
#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: String,
    pub guess: f64,
    pub bounds: (f64, f64),
}

impl Parameter {
    pub fn new(name: &str, guess: f64, bounds: (f64, f64)) -> Parameter {
        Parameter { name: name.to_string(), guess, bounds }
    }

    fn span(&self) -> f64 {
        self.bounds.1 - self.bounds.0
    }

    fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.bounds.0, self.bounds.1)
    }
}

/// The outcome of a minimization.
#[derive(Clone, Debug)]
pub struct MinimizerResult {
    /// the best parameter vector found
    pub x: Vec<f64>,
    /// the function value at `x`
    pub fval: f64,
    /// how many function evaluations were spent
    pub evaluated_points: usize,
    /// whether the strategy reached its own convergence criterion
    pub converged: bool,
}

/// An outer minimization strategy.
///
/// Implementations never propagate non-finite function values; the driver
/// converts them to penalties before they reach the strategy.
pub trait Minimizer {
    fn minimize(
        &self,
        function: &mut dyn FnMut(&[f64]) -> f64,
        parameters: &[Parameter],
    ) -> Result<MinimizerResult, FitError>;
}

/// Exhaustive grid scan over the parameter bounds.
///
/// Supports one or two parameters; the spacing is `span / evals` per axis.
pub struct Scan {
    pub evals: usize,
}

impl Default for Scan {
    fn default() -> Self {
        Scan { evals: 50 }
    }
}

impl Minimizer for Scan {
    fn minimize(
        &self,
        function: &mut dyn FnMut(&[f64]) -> f64,
        parameters: &[Parameter],
    ) -> Result<MinimizerResult, FitError> {
        if parameters.is_empty() || parameters.len() > 2 {
            return Err(FitError::TooManyParameters("scan", 2));
        }
        let mut best = MinimizerResult {
            x: parameters.iter().map(|p| p.guess).collect(),
            fval: f64::MAX,
            evaluated_points: 0,
            converged: true,
        };
        let axis = |p: &Parameter| -> Vec<f64> {
            (0..=self.evals).map(|k| p.bounds.0 + p.span() * k as f64 / self.evals as f64).collect()
        };
        if parameters.len() == 1 {
            for v in axis(&parameters[0]) {
                let fval = function(&[v]);
                best.evaluated_points += 1;
                if fval < best.fval {
                    best.fval = fval;
                    best.x = vec![v];
                }
            }
        } else {
            for v0 in axis(&parameters[0]) {
                for v1 in axis(&parameters[1]) {
                    let fval = function(&[v0, v1]);
                    best.evaluated_points += 1;
                    if fval < best.fval {
                        best.fval = fval;
                        best.x = vec![v0, v1];
                    }
                }
            }
        }
        return Ok(best);
    }
}

/// A one-dimensional scan that may terminate early.
///
/// The scan starts at the upper bound and walks downward. Once 70% of the
/// planned evaluations are spent, it stops after three consecutive values
/// that lie above the running average of the last seven evaluations, i.e.
/// when the scan is clearly walking uphill away from the minimum.
pub struct LimitedScan {
    pub evals: usize,
}

impl Default for LimitedScan {
    fn default() -> Self {
        LimitedScan { evals: 30 }
    }
}

impl Minimizer for LimitedScan {
    fn minimize(
        &self,
        function: &mut dyn FnMut(&[f64]) -> f64,
        parameters: &[Parameter],
    ) -> Result<MinimizerResult, FitError> {
        if parameters.len() != 1 {
            return Err(FitError::TooManyParameters("limited scan", 1));
        }
        let p = &parameters[0];
        let step = p.span() / self.evals as f64;

        let mut best = MinimizerResult {
            x: vec![p.guess],
            fval: f64::MAX,
            evaluated_points: 0,
            converged: true,
        };
        let mut last_evals: Vec<f64> = Vec::new();
        let mut uphill = 0;

        let mut value = p.bounds.1;
        while p.bounds.0 < value {
            let fval = function(&[value]);
            best.evaluated_points += 1;
            if fval < best.fval {
                best.fval = fval;
                best.x = vec![value];
            }

            last_evals.insert(0, fval);
            last_evals.truncate(7);
            let avg: f64 = last_evals.iter().sum::<f64>() / last_evals.len() as f64;

            if best.evaluated_points as f64 > 0.7 * self.evals as f64 {
                if fval > avg && fval > best.fval {
                    uphill += 1;
                    if uphill == 3 {
                        debug!("limited scan terminating early after {} evaluations", best.evaluated_points);
                        break;
                    }
                } else {
                    uphill = 0;
                }
            }
            value -= step;
        }
        return Ok(best);
    }
}

/// Bounded quasi-Newton minimizer with finite-difference gradients.
///
/// Maintains a BFGS approximation of the inverse Hessian, takes Armijo
/// backtracking steps, and clamps every iterate to the parameter bounds.
pub struct Bfgs {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for Bfgs {
    fn default() -> Self {
        Bfgs { max_iterations: 100, tolerance: 1e-10 }
    }
}

impl Bfgs {
    fn gradient(
        function: &mut dyn FnMut(&[f64]) -> f64,
        parameters: &[Parameter],
        x: &DVector<f64>,
        evals: &mut usize,
    ) -> DVector<f64> {
        let n = x.len();
        let mut grad = DVector::zeros(n);
        for k in 0..n {
            let h = (parameters[k].span() * 1e-6).max(1e-10);
            let mut xp = x.clone();
            let mut xm = x.clone();
            xp[k] = parameters[k].clamp(x[k] + h);
            xm[k] = parameters[k].clamp(x[k] - h);
            let fp = function(xp.as_slice());
            let fm = function(xm.as_slice());
            *evals += 2;
            let denom = xp[k] - xm[k];
            grad[k] = if denom != 0.0 { (fp - fm) / denom } else { 0.0 };
        }
        return grad;
    }
}

impl Minimizer for Bfgs {
    fn minimize(
        &self,
        function: &mut dyn FnMut(&[f64]) -> f64,
        parameters: &[Parameter],
    ) -> Result<MinimizerResult, FitError> {
        if parameters.is_empty() {
            return Err(FitError::NothingToFit);
        }
        let n = parameters.len();
        let mut x = DVector::from_iterator(n, parameters.iter().map(|p| p.clamp(p.guess)));
        let mut fx = function(x.as_slice());
        let mut evals = 1usize;
        let mut h_inv = DMatrix::<f64>::identity(n, n);
        let mut converged = false;

        let mut best_x = x.clone();
        let mut best_f = fx;

        let mut grad = Bfgs::gradient(function, parameters, &x, &mut evals);
        for _ in 0..self.max_iterations {
            if grad.norm() < self.tolerance {
                converged = true;
                break;
            }

            let direction = -(&h_inv * &grad);
            let slope = grad.dot(&direction);
            let mut direction = if slope < 0.0 {
                direction
            } else {
                // reset a corrupted curvature estimate
                h_inv = DMatrix::identity(n, n);
                -grad.clone()
            };

            // χ² surfaces are steep in absolute units; cap the raw step at a
            // tenth of each parameter's span so the line search starts inside
            // a sensible trust region
            let overshoot = (0..n)
                .map(|k| direction[k].abs() / (0.1 * parameters[k].span()))
                .fold(0.0f64, f64::max);
            if overshoot > 1.0 {
                direction /= overshoot;
            }

            // Armijo backtracking line search, bounds enforced per coordinate
            let mut step = 1.0;
            let mut x_new = x.clone();
            let mut f_new = fx;
            let mut improved = false;
            for _ in 0..40 {
                for k in 0..n {
                    x_new[k] = parameters[k].clamp(x[k] + step * direction[k]);
                }
                f_new = function(x_new.as_slice());
                evals += 1;
                if f_new <= fx + 1e-4 * step * grad.dot(&(&x_new - &x)) && f_new < fx {
                    improved = true;
                    break;
                }
                step *= 0.5;
            }
            if !improved {
                converged = true; // no descent direction within the bounds
                break;
            }

            let grad_new = Bfgs::gradient(function, parameters, &x_new, &mut evals);
            let s = &x_new - &x;
            let y = &grad_new - &grad;
            let sy = s.dot(&y);
            if sy > 1e-12 {
                // BFGS update of the inverse Hessian
                let rho = 1.0 / sy;
                let identity = DMatrix::<f64>::identity(n, n);
                let left = &identity - rho * &s * y.transpose();
                let right = &identity - rho * &y * s.transpose();
                h_inv = &left * h_inv * &right + rho * &s * s.transpose();
            }

            x = x_new;
            fx = f_new;
            grad = grad_new;
            if fx < best_f {
                best_f = fx;
                best_x = x.clone();
            }
        }

        if fx < best_f {
            best_f = fx;
            best_x = x.clone();
        }
        return Ok(MinimizerResult {
            x: best_x.as_slice().to_vec(),
            fval: best_f,
            evaluated_points: evals,
            converged,
        });
    }
}
