use log::{info, warn};
use saxskit_hist::{CompositeHistogram, HistogramParams};
use saxskit_io::SimpleDataset;

use crate::minimizer::{Bfgs, LimitedScan, Minimizer, Parameter};
use crate::{FitError, SimpleLeastSquares};

/// χ² penalty substituted for non-finite model evaluations.
const NONFINITE_PENALTY: f64 = 1e10;

/// Which of the five nonlinear parameters take part in a fit.
///
/// Inactive parameters keep their defaults. The excluded-volume family
/// (exv scale, solvent density, exv Debye-Waller) requires a histogram
/// variant that carries excluded-volume partials; a mismatch fails the fit
/// before any evaluation.
#[derive(Clone, Copy, Debug)]
pub struct EnabledFitParameters {
    pub hydration: bool,
    pub exv: bool,
    pub solvent_density: bool,
    pub atomic_debye_waller: bool,
    pub exv_debye_waller: bool,
}

impl Default for EnabledFitParameters {
    fn default() -> Self {
        EnabledFitParameters {
            hydration: true,
            exv: false,
            solvent_density: false,
            atomic_debye_waller: false,
            exv_debye_waller: false,
        }
    }
}

impl EnabledFitParameters {
    /// The number of active parameters
    pub fn count(&self) -> usize {
        self.hydration as usize
            + self.exv as usize
            + self.solvent_density as usize
            + self.atomic_debye_waller as usize
            + self.exv_debye_waller as usize
    }

    /// Fails when the active set exceeds what the histogram variant supports
    pub fn validate(&self, model: &dyn CompositeHistogram) -> Result<(), FitError> {
        if self.count() == 0 {
            return Err(FitError::NothingToFit);
        }
        if !model.supports_exv() {
            if self.exv {
                return Err(FitError::IncompatibleParameter("excluded-volume scale"));
            }
            if self.solvent_density {
                return Err(FitError::IncompatibleParameter("solvent density"));
            }
            if self.exv_debye_waller {
                return Err(FitError::IncompatibleParameter("excluded-volume Debye-Waller"));
            }
        }
        return Ok(());
    }

    /// The parameter list handed to the outer minimizer, in canonical order
    fn build(&self, model: &dyn CompositeHistogram, hydration_guess: f64) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        if self.hydration {
            parameters.push(Parameter::new("hydration", hydration_guess, model.water_scaling_limits()));
        }
        if self.exv {
            parameters.push(Parameter::new("exv", 1.0, model.exv_scaling_limits()));
        }
        if self.solvent_density {
            parameters.push(Parameter::new("solvent_density", 1.0, model.solvent_density_limits()));
        }
        if self.atomic_debye_waller {
            parameters.push(Parameter::new("atomic_dw", 0.0, model.debye_waller_limits()));
        }
        if self.exv_debye_waller {
            parameters.push(Parameter::new("exv_dw", 0.0, model.debye_waller_limits()));
        }
        return parameters;
    }

    /// Translates an active-parameter vector into histogram parameters
    fn to_histogram_params(&self, values: &[f64]) -> HistogramParams {
        let mut params = HistogramParams::default();
        let mut index = 0;
        let mut take = || {
            let v = values[index];
            index += 1;
            v
        };
        if self.hydration {
            params.cw = take();
        }
        if self.exv {
            params.cx = take();
        }
        if self.solvent_density {
            params.crho = take();
        }
        if self.atomic_debye_waller {
            params.ba = take();
        }
        if self.exv_debye_waller {
            params.bx = take();
        }
        return params;
    }
}

/// The result of a fit: the optimal parameters and their quality.
#[derive(Clone, Debug)]
pub struct FitResult {
    /// the fitted nonlinear parameters, in the order they were optimized
    pub params: Vec<(String, f64)>,
    /// the linear intensity scale
    pub a: f64,
    /// the constant background
    pub b: f64,
    pub chi2: f64,
    /// degrees of freedom: data points minus all fitted parameters
    pub dof: usize,
    pub evaluated_points: usize,
    pub converged: bool,
}

impl FitResult {
    /// χ² per degree of freedom
    pub fn reduced_chi2(&self) -> f64 {
        if self.dof == 0 {
            return self.chi2;
        }
        return self.chi2 / self.dof as f64;
    }

    /// The fitted value of a named parameter
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }
}

/// Two-layer fitter: closed-form linear scale and offset inside, bounded
/// quasi-Newton over the active nonlinear parameters outside.
///
/// The hydration scale is pre-fitted with a cheap one-dimensional scan to
/// shrink the outer search space before the quasi-Newton stage starts.
pub struct SmartFitter {
    data: SimpleDataset,
    enabled: EnabledFitParameters,
}

impl SmartFitter {
    pub fn new(data: SimpleDataset, enabled: EnabledFitParameters) -> Result<SmartFitter, FitError> {
        if data.is_empty() {
            return Err(FitError::EmptyData);
        }
        if data.sigma.iter().any(|&s| s <= 0.0) {
            return Err(FitError::InvalidSigma);
        }
        return Ok(SmartFitter { data, enabled });
    }

    /// The experimental dataset this fitter works against
    pub fn data(&self) -> &SimpleDataset {
        &self.data
    }

    /// χ² of the model under a trial parameter vector, with the inner linear
    /// fit already applied. Non-finite model values score the penalty.
    fn chi2(&self, model: &mut dyn CompositeHistogram, params: HistogramParams) -> f64 {
        model.set_params(params);
        let ym = model.debye_transform_on(&self.data.q);
        if ym.iter().any(|v| !v.is_finite()) {
            warn!("non-finite model intensity, penalizing this step");
            return NONFINITE_PENALTY;
        }
        match SimpleLeastSquares::new(&ym, &self.data.i, &self.data.sigma) {
            Ok(lsq) => {
                let chi2 = lsq.fit_chi2_only();
                if chi2.is_finite() {
                    chi2
                } else {
                    NONFINITE_PENALTY
                }
            }
            Err(_) => NONFINITE_PENALTY,
        }
    }

    /// Runs the fit against a composite histogram.
    ///
    /// The model is left with the optimal parameters applied, so a
    /// subsequent transform produces the fitted curve.
    pub fn fit(&self, model: &mut dyn CompositeHistogram) -> Result<FitResult, FitError> {
        self.enabled.validate(model)?;
        let mut total_evals = 0usize;

        // stage 1: one-dimensional hydration pre-fit
        let hydration_guess = if self.enabled.hydration {
            let scan = LimitedScan::default();
            let bounds = model.water_scaling_limits();
            let pre = scan.minimize(
                &mut |values: &[f64]| {
                    let params = HistogramParams { cw: values[0], ..HistogramParams::default() };
                    self.chi2(model, params)
                },
                &[Parameter::new("hydration", 1.0, bounds)],
            )?;
            total_evals += pre.evaluated_points;
            info!("hydration pre-fit: cw = {:.4}", pre.x[0]);
            pre.x[0]
        } else {
            1.0
        };

        // stage 2: quasi-Newton over the active parameter set
        let parameters = self.enabled.build(model, hydration_guess);
        let enabled = self.enabled;
        let outer = Bfgs::default();
        let result = outer.minimize(
            &mut |values: &[f64]| self.chi2(model, enabled.to_histogram_params(values)),
            &parameters,
        )?;
        total_evals += result.evaluated_points;

        if !result.converged {
            warn!("outer minimizer did not converge, returning the best point found");
        }

        // stage 3: apply the optimum and extract the linear parameters
        let best = enabled.to_histogram_params(&result.x);
        model.set_params(best);
        let ym = model.debye_transform_on(&self.data.q);
        let lsq = SimpleLeastSquares::new(&ym, &self.data.i, &self.data.sigma)?;
        let (a, b, chi2) = lsq.fit();

        let params: Vec<(String, f64)> = parameters
            .iter()
            .zip(result.x.iter())
            .map(|(p, &v)| (p.name.clone(), v))
            .collect();
        let dof = self.data.len().saturating_sub(2 + params.len());

        info!("fit finished: chi2 = {chi2:.6}, {total_evals} evaluations");
        return Ok(FitResult {
            params,
            a,
            b,
            chi2,
            dof,
            evaluated_points: total_evals,
            converged: result.converged,
        });
    }
}
