#[cfg(test)]
mod test_least_squares {
    use saxskit_fitter::{FitError, SimpleLeastSquares};

    #[test]
    fn exact_line_has_zero_chi2() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 2.5 * v - 0.5).collect();
        let sigma = vec![0.2; 4];
        let (a, b, chi2) = SimpleLeastSquares::new(&x, &y, &sigma).unwrap().fit();
        assert!((a - 2.5).abs() < 1e-12);
        assert!((b + 0.5).abs() < 1e-12);
        assert!(chi2 < 1e-20);
    }

    #[test]
    fn weights_pull_the_fit_toward_precise_points() {
        // two points say y = x, one noisy outlier says otherwise
        let x = vec![1.0, 2.0, 3.0];
        let y = vec![1.0, 2.0, 30.0];
        let sigma = vec![0.01, 0.01, 100.0];
        let (a, b, _) = SimpleLeastSquares::new(&x, &y, &sigma).unwrap().fit();
        assert!((a - 1.0).abs() < 1e-2);
        assert!(b.abs() < 1e-2);
    }

    #[test]
    fn residuals_are_sigma_weighted() {
        let x = vec![0.0, 1.0];
        let y = vec![1.0, 1.0];
        let sigma = vec![0.5, 0.5];
        // a perfect fit exists (a = 0, b = 1)
        let (a, b, chi2) = SimpleLeastSquares::new(&x, &y, &sigma).unwrap().fit();
        assert!(a.abs() < 1e-12);
        assert!((b - 1.0).abs() < 1e-12);
        assert!(chi2 < 1e-20);
    }

    #[test]
    fn zero_sigma_is_rejected() {
        let x = vec![0.0, 1.0];
        let y = vec![1.0, 1.0];
        let sigma = vec![0.5, 0.0];
        assert!(matches!(
            SimpleLeastSquares::new(&x, &y, &sigma),
            Err(FitError::InvalidSigma)
        ));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let x = vec![0.0, 1.0];
        let y = vec![1.0];
        let sigma = vec![0.5];
        assert!(SimpleLeastSquares::new(&x, &y, &sigma).is_err());
    }

    #[test]
    fn degenerate_constant_model_falls_back_to_offset() {
        // all model values identical: the scale is undetermined, the offset
        // absorbs the data mean
        let x = vec![1.0, 1.0, 1.0];
        let y = vec![2.0, 4.0, 6.0];
        let sigma = vec![1.0; 3];
        let (a, b, _) = SimpleLeastSquares::new(&x, &y, &sigma).unwrap().fit();
        assert_eq!(a, 0.0);
        assert!((b - 4.0).abs() < 1e-9);
    }
}
