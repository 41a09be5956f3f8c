#[cfg(test)]
mod test_partial_cache {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use saxskit_data::{Atom, Body, FormFactorClass, Molecule};
    use saxskit_hist::{
        CompositeHistogram, Distribution1D, HistogramManager, PartialHistogramManager,
    };
    use saxskit_numerical::Vec3;

    fn make_molecule() -> Molecule {
        let body0 = Body::new(
            0,
            vec![
                Atom::of_class(Vec3::new(0.0, 0.0, 0.0), FormFactorClass::C),
                Atom::of_class(Vec3::new(1.5, 0.0, 0.0), FormFactorClass::N),
                Atom::of_class(Vec3::new(0.0, 1.5, 0.0), FormFactorClass::O),
            ],
        );
        let body1 = Body::new(
            1,
            vec![
                Atom::of_class(Vec3::new(8.0, 0.0, 0.0), FormFactorClass::C),
                Atom::of_class(Vec3::new(9.5, 0.0, 0.0), FormFactorClass::S),
            ],
        );
        let body2 = Body::with_waters(
            2,
            vec![Atom::of_class(Vec3::new(0.0, 8.0, 0.0), FormFactorClass::CH2)],
            vec![Atom::water(Vec3::new(0.0, 11.0, 0.0))],
        );
        Molecule::new(vec![body0, body1, body2]).unwrap()
    }

    fn assert_matches_full_recompute(
        cache: &mut PartialHistogramManager<Distribution1D>,
        molecule: &Molecule,
    ) {
        let incremental = cache.recalculate(molecule);
        let scratch = HistogramManager::<Distribution1D>::new(molecule).calculate_all();

        let a = incremental.total().counts();
        let b = scratch.total().counts();
        assert_eq!(a.len(), b.len());
        for i in 0..a.len() {
            assert!(
                (a[i] - b[i]).abs() <= 1e-6 * b[i].abs().max(1.0),
                "bin {i}: incremental {} vs scratch {}",
                a[i],
                b[i]
            );
        }
    }

    #[test]
    fn first_recalculation_equals_full_computation() {
        let mut molecule = make_molecule();
        let mut cache = PartialHistogramManager::<Distribution1D>::new(&mut molecule);
        assert_matches_full_recompute(&mut cache, &molecule);
    }

    #[test]
    fn translation_invalidates_only_cross_partials() {
        let mut molecule = make_molecule();
        let mut cache = PartialHistogramManager::<Distribution1D>::new(&mut molecule);
        cache.recalculate(&molecule);

        molecule.bodies_mut()[1].translate(&Vec3::new(0.0, 0.0, 2.0));
        assert!(cache.state().is_externally_modified(1));
        assert!(!cache.state().is_internally_modified(1));
        assert_matches_full_recompute(&mut cache, &molecule);
    }

    #[test]
    fn rotation_matches_full_recompute() {
        let mut molecule = make_molecule();
        let mut cache = PartialHistogramManager::<Distribution1D>::new(&mut molecule);
        cache.recalculate(&molecule);

        molecule.bodies_mut()[0].rotate(&Vec3::new(0.0, 0.0, 1.0), 0.7);
        assert_matches_full_recompute(&mut cache, &molecule);
    }

    #[test]
    fn atom_replacement_rebuilds_the_self_partial() {
        let mut molecule = make_molecule();
        let mut cache = PartialHistogramManager::<Distribution1D>::new(&mut molecule);
        cache.recalculate(&molecule);

        molecule.bodies_mut()[0].set_atoms(vec![
            Atom::of_class(Vec3::new(0.0, 0.0, 0.0), FormFactorClass::C),
            Atom::of_class(Vec3::new(0.0, 0.0, 2.0), FormFactorClass::C),
        ]);
        assert!(cache.state().is_internally_modified(0));
        assert_matches_full_recompute(&mut cache, &molecule);
    }

    #[test]
    fn hydration_regeneration_rebuilds_water_partials() {
        let mut molecule = make_molecule();
        let mut cache = PartialHistogramManager::<Distribution1D>::new(&mut molecule);
        cache.recalculate(&molecule);

        molecule.bodies_mut()[2].set_waters(vec![
            Atom::water(Vec3::new(0.0, 12.0, 0.0)),
            Atom::water(Vec3::new(2.0, 10.0, 0.0)),
        ]);
        cache.signal_modified_hydration_layer();
        assert_matches_full_recompute(&mut cache, &molecule);
    }

    #[test]
    fn random_walk_of_rigid_moves_stays_consistent() {
        let mut molecule = make_molecule();
        let mut cache = PartialHistogramManager::<Distribution1D>::new(&mut molecule);
        cache.recalculate(&molecule);

        let mut rng = SmallRng::seed_from_u64(17);
        for _ in 0..12 {
            let which = rng.gen_range(0..molecule.size_bodies());
            if rng.gen_bool(0.5) {
                let shift = Vec3::new(
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                );
                molecule.bodies_mut()[which].translate(&shift);
            } else {
                let axis = Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(0.1..1.0),
                );
                let angle = rng.gen_range(-1.0..1.0);
                molecule.bodies_mut()[which].rotate(&axis, angle);
            }
            assert_matches_full_recompute(&mut cache, &molecule);
        }
    }

    #[test]
    fn flags_are_clear_after_recalculation() {
        let mut molecule = make_molecule();
        let mut cache = PartialHistogramManager::<Distribution1D>::new(&mut molecule);
        cache.recalculate(&molecule);
        assert!(!cache.state().is_modified());
    }
}
