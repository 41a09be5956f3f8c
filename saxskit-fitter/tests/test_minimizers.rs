#[cfg(test)]
mod test_minimizers {
    use saxskit_fitter::{Bfgs, FitError, LimitedScan, Minimizer, Parameter, Scan};

    fn quadratic_1d(x: &[f64]) -> f64 {
        (x[0] - 1.3) * (x[0] - 1.3) + 0.25
    }

    #[test]
    fn scan_finds_the_minimum_of_a_parabola() {
        let scan = Scan { evals: 1000 };
        let result = scan
            .minimize(&mut quadratic_1d, &[Parameter::new("x", 0.0, (0.0, 2.0))])
            .unwrap();
        assert!((result.x[0] - 1.3).abs() < 5e-3);
        assert!(result.evaluated_points == 1001);
    }

    #[test]
    fn scan_handles_two_parameters() {
        let scan = Scan { evals: 100 };
        let mut f = |x: &[f64]| (x[0] - 0.5).powi(2) + (x[1] + 0.5).powi(2);
        let result = scan
            .minimize(
                &mut f,
                &[Parameter::new("a", 0.0, (-1.0, 1.0)), Parameter::new("b", 0.0, (-1.0, 1.0))],
            )
            .unwrap();
        assert!((result.x[0] - 0.5).abs() < 2e-2);
        assert!((result.x[1] + 0.5).abs() < 2e-2);
    }

    #[test]
    fn scan_rejects_three_parameters() {
        let scan = Scan::default();
        let params = vec![
            Parameter::new("a", 0.0, (0.0, 1.0)),
            Parameter::new("b", 0.0, (0.0, 1.0)),
            Parameter::new("c", 0.0, (0.0, 1.0)),
        ];
        assert!(matches!(
            scan.minimize(&mut |_: &[f64]| 0.0, &params),
            Err(FitError::TooManyParameters(_, 2))
        ));
    }

    #[test]
    fn limited_scan_walks_from_the_top() {
        let scan = LimitedScan { evals: 50 };
        let mut first_value = None;
        let mut f = |x: &[f64]| {
            first_value.get_or_insert(x[0]);
            quadratic_1d(x)
        };
        let result = scan.minimize(&mut f, &[Parameter::new("x", 1.0, (0.0, 2.0))]).unwrap();
        assert_eq!(first_value, Some(2.0));
        assert!((result.x[0] - 1.3).abs() < 0.05);
    }

    #[test]
    fn limited_scan_terminates_early_on_an_uphill_run() {
        // minimum near the upper bound: walking down is uphill all the way
        let scan = LimitedScan { evals: 100 };
        let mut f = |x: &[f64]| (x[0] - 1.95).powi(2);
        let result = scan.minimize(&mut f, &[Parameter::new("x", 1.0, (0.0, 2.0))]).unwrap();
        assert!((result.x[0] - 1.95).abs() < 0.05);
        assert!(result.evaluated_points < 100);
    }

    #[test]
    fn bfgs_converges_on_a_smooth_bowl() {
        let bfgs = Bfgs::default();
        let mut f = |x: &[f64]| {
            (x[0] - 1.1).powi(2) + 2.0 * (x[1] - 0.9).powi(2) + 0.5 * (x[0] - 1.1) * (x[1] - 0.9)
        };
        let result = bfgs
            .minimize(
                &mut f,
                &[Parameter::new("a", 0.6, (0.5, 1.5)), Parameter::new("b", 1.4, (0.5, 1.5))],
            )
            .unwrap();
        assert!((result.x[0] - 1.1).abs() < 1e-4);
        assert!((result.x[1] - 0.9).abs() < 1e-4);
    }

    #[test]
    fn bfgs_respects_the_bounds() {
        let bfgs = Bfgs::default();
        // unconstrained minimum at 3, outside the box
        let mut f = |x: &[f64]| (x[0] - 3.0).powi(2);
        let result = bfgs.minimize(&mut f, &[Parameter::new("x", 1.0, (0.0, 2.0))]).unwrap();
        assert!((result.x[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn bfgs_returns_best_point_under_a_penalty_plateau() {
        // a function that is flat at the penalty value except near the minimum
        let bfgs = Bfgs::default();
        let mut f = |x: &[f64]| {
            if (x[0] - 1.0).abs() > 0.5 {
                1e10
            } else {
                (x[0] - 1.0).powi(2)
            }
        };
        let result = bfgs.minimize(&mut f, &[Parameter::new("x", 1.2, (0.0, 2.0))]).unwrap();
        assert!((result.x[0] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn minimization_is_deterministic() {
        let bfgs = Bfgs::default();
        let run = || {
            bfgs.minimize(
                &mut |x: &[f64]| (x[0] - 0.7).powi(2) + (x[0] - 0.7).powi(4),
                &[Parameter::new("x", 0.0, (0.0, 2.0))],
            )
            .unwrap()
        };
        let r1 = run();
        let r2 = run();
        assert_eq!(r1.x, r2.x);
        assert_eq!(r1.fval, r2.fval);
        assert_eq!(r1.evaluated_points, r2.evaluated_points);
    }
}
