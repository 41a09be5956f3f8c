#[cfg(test)]
mod test_composites {
    use saxskit_data::{Atom, Body, FormFactorClass, Molecule};
    use saxskit_hist::{
        atomic_table, exv_factor, sinc, CompositeHistogram, Distribution1D, Distribution2D,
        Distribution3D, ExvFormFactor, HistogramManager, HistogramManagerFFExplicit,
        HistogramManagerFFGrid, HistogramManagerFFGridSurface, WeightedDistribution1D,
        WeightedDistribution2D, WeightedDistribution3D,
    };
    use saxskit_numerical::Vec3;

    #[test]
    fn exv_factor_is_identity_at_unit_scale() {
        for &q in &[0.0, 0.01, 0.1, 0.5, 1.0] {
            assert!((exv_factor(q, 1.0, 1.5) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn exv_factor_at_zero_q_is_the_volume_scale() {
        for &cx in &[0.8, 0.95, 1.1, 1.2] {
            assert!((exv_factor(0.0, cx, 1.5) - cx.powi(3)).abs() < 1e-12);
        }
    }

    #[test]
    fn exv_factor_decays_with_q_for_cx_above_one() {
        let cx = 1.2;
        let mut last = exv_factor(0.0, cx, 1.5);
        for i in 1..20 {
            let q = i as f64 * 0.05;
            let val = exv_factor(q, cx, 1.5);
            assert!(val < last);
            last = val;
        }
    }

    #[test]
    fn plain_debye_round_trip() {
        // two unit scatterers at an exact bin center
        let d = 2.0;
        let molecule = Molecule::from_atoms(vec![
            Atom::new(Vec3::new(0.0, 0.0, 0.0), 1.0, FormFactorClass::H),
            Atom::new(Vec3::new(0.0, 0.0, d), 1.0, FormFactorClass::H),
        ])
        .unwrap();
        let profile = HistogramManager::<Distribution1D>::new(&molecule).calculate().debye_transform();

        for (qi, &qv) in profile.q().iter().enumerate() {
            let expected = (2.0 + 2.0 * sinc(qv * d)) * (-qv * qv).exp();
            let got = profile.intensity()[qi];
            assert!(
                (got - expected).abs() <= 1e-6 * expected.abs().max(1e-12),
                "q {qv}: {got} vs {expected}"
            );
        }
    }

    #[test]
    fn ff_explicit_round_trip_for_a_homoatomic_pair() {
        // two carbons: the contrast amplitude is A(q) = w f(q) - x(q), and
        // I(q) = 2 A^2 (1 + sinc(qd)) for a pair at distance d
        let d = 3.0;
        let w = 6.0;
        let molecule = Molecule::from_atoms(vec![
            Atom::of_class(Vec3::new(0.0, 0.0, 0.0), FormFactorClass::C),
            Atom::of_class(Vec3::new(0.0, 0.0, d), FormFactorClass::C),
        ])
        .unwrap();
        let mut composite = HistogramManagerFFExplicit::<
            Distribution1D,
            Distribution2D,
            Distribution3D,
        >::new(&molecule)
        .calculate_all();
        let profile = composite.debye_transform();

        let f = atomic_table().get(FormFactorClass::C);
        let x = ExvFormFactor::of_class(FormFactorClass::C);
        for (qi, &qv) in profile.q().iter().enumerate() {
            let a = w * f.evaluate(qv) - x.evaluate(qv);
            let expected = 2.0 * a * a * (1.0 + sinc(qv * d));
            let got = profile.intensity()[qi];
            assert!(
                (got - expected).abs() <= 1e-6 * expected.abs().max(1e-6),
                "q {qv}: {got} vs {expected}"
            );
        }
    }

    #[test]
    fn water_scaling_reweights_the_water_terms() {
        let body = Body::with_waters(
            0,
            vec![Atom::of_class(Vec3::from_float(0.0), FormFactorClass::C)],
            vec![Atom::water(Vec3::new(3.0, 0.0, 0.0))],
        );
        let molecule = Molecule::new(vec![body]).unwrap();
        let mut composite = HistogramManager::<Distribution1D>::new(&molecule).calculate_all();

        let i_default = composite.debye_transform().intensity().to_vec();
        composite.apply_water_scaling_factor(0.0);
        let i_dry = composite.debye_transform().intensity().to_vec();

        // with cw = 0 only the atom-atom term remains
        assert!(i_dry[0] < i_default[0]);
        assert!((i_dry[0] - 36.0).abs() < 1e-3);
    }

    #[test]
    fn parameter_only_changes_hit_the_intensity_cache() {
        let molecule = Molecule::from_atoms(vec![
            Atom::of_class(Vec3::new(0.0, 0.0, 0.0), FormFactorClass::C),
            Atom::of_class(Vec3::new(0.0, 0.0, 2.0), FormFactorClass::O),
        ])
        .unwrap();
        let mut composite = HistogramManagerFFExplicit::<
            Distribution1D,
            Distribution2D,
            Distribution3D,
        >::new(&molecule)
        .calculate_all();

        let i1 = composite.debye_transform().intensity().to_vec();
        composite.apply_excluded_volume_scaling_factor(1.1);
        let i2 = composite.debye_transform().intensity().to_vec();
        composite.apply_excluded_volume_scaling_factor(1.0);
        let i3 = composite.debye_transform().intensity().to_vec();

        // restoring the parameter restores the profile exactly
        assert_ne!(i1, i2);
        assert_eq!(i1, i3);
    }

    #[test]
    fn transform_on_experimental_grid_interpolates() {
        let molecule = Molecule::from_atoms(vec![
            Atom::of_class(Vec3::new(0.0, 0.0, 0.0), FormFactorClass::C),
            Atom::of_class(Vec3::new(0.0, 0.0, 2.0), FormFactorClass::O),
        ])
        .unwrap();
        let mut composite = HistogramManager::<Distribution1D>::new(&molecule).calculate_all();
        let q_exp: Vec<f64> = (1..50).map(|i| i as f64 * 0.01).collect();
        let i_exp = composite.debye_transform_on(&q_exp);
        assert_eq!(i_exp.len(), q_exp.len());
        // interpolation stays within the profile's range
        let full = composite.debye_transform();
        let max = full.intensity().iter().cloned().fold(f64::MIN, f64::max);
        for v in &i_exp {
            assert!(*v <= max * (1.0 + 1e-12));
        }
    }

    #[test]
    fn zero_pddf_gives_a_zero_profile() {
        let molecule =
            Molecule::new(vec![Body::new(0, Vec::new())]).unwrap();
        let hist = HistogramManager::<Distribution1D>::new(&molecule).calculate();
        let profile = hist.debye_transform();
        assert!(profile.intensity().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn grid_variant_supports_exv() {
        let molecule = Molecule::from_atoms(vec![
            Atom::of_class(Vec3::new(0.0, 0.0, 0.0), FormFactorClass::C),
            Atom::of_class(Vec3::new(0.0, 0.0, 2.0), FormFactorClass::C),
        ])
        .unwrap();
        let mut composite = HistogramManagerFFGrid::<
            WeightedDistribution1D,
            WeightedDistribution2D,
            WeightedDistribution3D,
        >::new(&molecule)
        .calculate_all();
        assert!(composite.supports_exv());

        let i1 = composite.debye_transform().intensity().to_vec();
        composite.apply_solvent_density_scaling_factor(1.05);
        let i2 = composite.debye_transform().intensity().to_vec();
        assert_ne!(i1, i2);
    }

    #[test]
    fn grid_surface_variant_scales_the_surface_term() {
        let mut atoms = Vec::new();
        for i in -2..=2 {
            for j in -2..=2 {
                for k in -2..=2 {
                    atoms.push(Atom::of_class(
                        Vec3::new(i as f64 * 1.5, j as f64 * 1.5, k as f64 * 1.5),
                        FormFactorClass::C,
                    ));
                }
            }
        }
        let molecule = Molecule::from_atoms(atoms).unwrap();
        let mut composite = HistogramManagerFFGridSurface::<
            WeightedDistribution1D,
            WeightedDistribution2D,
            WeightedDistribution3D,
        >::new(&molecule)
        .calculate_all();

        let i1 = composite.debye_transform().intensity().to_vec();
        composite.apply_excluded_volume_scaling_factor(1.2);
        let i2 = composite.debye_transform().intensity().to_vec();
        assert_ne!(i1, i2);
    }

    #[test]
    fn lattice_pddfs_read_as_highly_ordered() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        // atoms on a line with one repeated spacing concentrate the PDDF
        // on isolated spikes
        let lattice: Vec<Atom> = (0..20)
            .map(|i| Atom::of_class(Vec3::new(i as f64 * 3.0, 0.0, 0.0), FormFactorClass::C))
            .collect();
        let molecule = Molecule::from_atoms(lattice).unwrap();
        let hist = HistogramManager::<Distribution1D>::new(&molecule).calculate();
        assert!(hist.is_highly_ordered());

        // a disordered blob fills its distance range smoothly
        let mut rng = SmallRng::seed_from_u64(3);
        let blob: Vec<Atom> = (0..40)
            .map(|_| {
                Atom::of_class(
                    Vec3::new(
                        rng.gen_range(-5.0..5.0),
                        rng.gen_range(-5.0..5.0),
                        rng.gen_range(-5.0..5.0),
                    ),
                    FormFactorClass::C,
                )
            })
            .collect();
        let molecule = Molecule::from_atoms(blob).unwrap();
        let hist = HistogramManager::<Distribution1D>::new(&molecule).calculate();
        assert!(!hist.is_highly_ordered());
    }

    #[test]
    fn exv_debye_waller_damps_only_at_high_q() {
        let molecule = Molecule::from_atoms(vec![
            Atom::of_class(Vec3::new(0.0, 0.0, 0.0), FormFactorClass::C),
            Atom::of_class(Vec3::new(0.0, 0.0, 2.0), FormFactorClass::C),
        ])
        .unwrap();
        let mut composite = HistogramManagerFFExplicit::<
            Distribution1D,
            Distribution2D,
            Distribution3D,
        >::new(&molecule)
        .calculate_all();

        let i1 = composite.debye_transform().intensity().to_vec();
        composite.apply_exv_debye_waller_factor(2.0);
        let i2 = composite.debye_transform().intensity().to_vec();
        // damping the exv term leaves the q -> 0 limit nearly unchanged
        assert!((i1[0] - i2[0]).abs() < 1e-4 * i1[0].abs().max(1.0));
        assert_ne!(i1, i2);
    }
}
