#[cfg(test)]
mod test_smart_fitter {
    use saxskit_data::{Atom, Body, FormFactorClass, Molecule};
    use saxskit_fitter::{EnabledFitParameters, FitError, SmartFitter};
    use saxskit_hist::{
        CompositeHistogram, Distribution1D, Distribution2D, Distribution3D, HistogramManager,
        HistogramManagerFFExplicit, HistogramParams,
    };
    use saxskit_io::SimpleDataset;
    use saxskit_numerical::Vec3;

    fn hydrated_molecule() -> Molecule {
        let body = Body::with_waters(
            0,
            vec![
                Atom::of_class(Vec3::new(0.0, 0.0, 0.0), FormFactorClass::C),
                Atom::of_class(Vec3::new(1.5, 0.0, 0.0), FormFactorClass::N),
                Atom::of_class(Vec3::new(0.0, 2.0, 0.0), FormFactorClass::O),
                Atom::of_class(Vec3::new(0.0, 0.0, 2.5), FormFactorClass::C),
            ],
            vec![
                Atom::water(Vec3::new(4.0, 0.0, 0.0)),
                Atom::water(Vec3::new(0.0, 4.0, 0.0)),
                Atom::water(Vec3::new(0.0, 0.0, 4.5)),
            ],
        );
        Molecule::new(vec![body]).unwrap()
    }

    /// Synthetic data generated from the model itself under known parameters.
    fn synthetic_data(
        model: &mut dyn CompositeHistogram,
        params: HistogramParams,
        a: f64,
        b: f64,
    ) -> SimpleDataset {
        let q: Vec<f64> = (1..=80).map(|k| k as f64 * 0.01).collect();
        model.set_params(params);
        let i: Vec<f64> = model.debye_transform_on(&q).iter().map(|v| a * v + b).collect();
        model.set_params(HistogramParams::default());
        let sigma = vec![1e-3; q.len()];
        return SimpleDataset::new(q, i, sigma);
    }

    #[test]
    fn recovers_the_generating_hydration_scale() {
        let molecule = hydrated_molecule();
        let mut model = HistogramManager::<Distribution1D>::new(&molecule).calculate_all();
        let truth = HistogramParams { cw: 1.2, ..HistogramParams::default() };
        let data = synthetic_data(&mut model, truth, 2.0, 0.01);

        let fitter = SmartFitter::new(data, EnabledFitParameters::default()).unwrap();
        let result = fitter.fit(&mut model).unwrap();

        assert!((result.parameter("hydration").unwrap() - 1.2).abs() < 1e-3);
        assert!((result.a - 2.0).abs() < 1e-3);
        assert!((result.b - 0.01).abs() < 1e-3);
        assert!(result.chi2 < 1e-6);
    }

    #[test]
    fn recovers_hydration_and_exv_together() {
        let molecule = hydrated_molecule();
        let mut model = HistogramManagerFFExplicit::<
            Distribution1D,
            Distribution2D,
            Distribution3D,
        >::new(&molecule)
        .calculate_all();
        let truth = HistogramParams { cw: 0.8, cx: 1.1, ..HistogramParams::default() };
        let data = synthetic_data(&mut model, truth, 1.5, 0.0);

        let enabled = EnabledFitParameters { exv: true, ..EnabledFitParameters::default() };
        let fitter = SmartFitter::new(data, enabled).unwrap();
        let result = fitter.fit(&mut model).unwrap();

        assert!((result.parameter("hydration").unwrap() - 0.8).abs() < 5e-3);
        assert!((result.parameter("exv").unwrap() - 1.1).abs() < 5e-3);
        assert!(result.chi2 < 1e-3);
    }

    #[test]
    fn fitting_is_idempotent() {
        let molecule = hydrated_molecule();
        let mut model = HistogramManager::<Distribution1D>::new(&molecule).calculate_all();
        let truth = HistogramParams { cw: 1.1, ..HistogramParams::default() };
        let data = synthetic_data(&mut model, truth, 1.0, 0.0);
        let fitter = SmartFitter::new(data, EnabledFitParameters::default()).unwrap();

        let r1 = fitter.fit(&mut model).unwrap();
        model.set_params(HistogramParams::default());
        let r2 = fitter.fit(&mut model).unwrap();

        assert_eq!(r1.params, r2.params);
        assert_eq!(r1.chi2, r2.chi2);
        assert_eq!(r1.evaluated_points, r2.evaluated_points);
    }

    #[test]
    fn reported_optimum_beats_nearby_parameters() {
        let molecule = hydrated_molecule();
        let mut model = HistogramManager::<Distribution1D>::new(&molecule).calculate_all();
        let truth = HistogramParams { cw: 1.15, ..HistogramParams::default() };
        let data = synthetic_data(&mut model, truth, 1.0, 0.0);
        let fitter = SmartFitter::new(data.clone(), EnabledFitParameters::default()).unwrap();
        let result = fitter.fit(&mut model).unwrap();
        let best_cw = result.parameter("hydration").unwrap();

        let chi2_at = |model: &mut dyn CompositeHistogram, cw: f64| {
            model.set_params(HistogramParams { cw, ..HistogramParams::default() });
            let ym = model.debye_transform_on(&data.q);
            saxskit_fitter::SimpleLeastSquares::new(&ym, &data.i, &data.sigma)
                .unwrap()
                .fit_chi2_only()
        };

        let best = chi2_at(&mut model, best_cw);
        for offset in [-0.05, -0.01, 0.01, 0.05] {
            assert!(best <= chi2_at(&mut model, best_cw + offset) + 1e-12);
        }
    }

    #[test]
    fn exv_fit_requires_an_exv_capable_histogram() {
        let molecule = hydrated_molecule();
        let mut model = HistogramManager::<Distribution1D>::new(&molecule).calculate_all();
        let data = synthetic_data(&mut model, HistogramParams::default(), 1.0, 0.0);

        let enabled = EnabledFitParameters { exv: true, ..EnabledFitParameters::default() };
        let fitter = SmartFitter::new(data, enabled).unwrap();
        assert!(matches!(
            fitter.fit(&mut model),
            Err(FitError::IncompatibleParameter(_))
        ));
    }

    #[test]
    fn empty_dataset_is_rejected_up_front() {
        let data = SimpleDataset::default();
        assert!(matches!(
            SmartFitter::new(data, EnabledFitParameters::default()),
            Err(FitError::EmptyData)
        ));
    }

    #[test]
    fn zero_sigma_is_rejected_up_front() {
        let data = SimpleDataset::new(vec![0.1], vec![1.0], vec![0.0]);
        assert!(matches!(
            SmartFitter::new(data, EnabledFitParameters::default()),
            Err(FitError::InvalidSigma)
        ));
    }

    #[test]
    fn dof_counts_all_fitted_parameters() {
        let molecule = hydrated_molecule();
        let mut model = HistogramManager::<Distribution1D>::new(&molecule).calculate_all();
        let data = synthetic_data(&mut model, HistogramParams::default(), 1.0, 0.0);
        let n = data.len();
        let fitter = SmartFitter::new(data, EnabledFitParameters::default()).unwrap();
        let result = fitter.fit(&mut model).unwrap();
        // n points minus scale, offset and the hydration parameter
        assert_eq!(result.dof, n - 3);
    }
}
