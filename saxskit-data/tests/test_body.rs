#[cfg(test)]
mod test_body {
    use saxskit_data::{Atom, Body, FormFactorClass, Molecule, Symmetry, SymmetryRelation};
    use saxskit_numerical::{assert_delta, Vec3};

    #[test]
    fn center_of_mass_is_weight_averaged() {
        let atoms = vec![
            Atom::new(Vec3::new(0.0, 0.0, 0.0), 1.0, FormFactorClass::H),
            Atom::new(Vec3::new(0.0, 0.0, 3.0), 2.0, FormFactorClass::H),
        ];
        let body = Body::new(0, atoms);
        assert_delta!(body.center_of_mass().z, 2.0, 1e-12);
    }

    #[test]
    fn translation_moves_waters_along() {
        let atoms = vec![Atom::of_class(Vec3::from_float(0.0), FormFactorClass::C)];
        let waters = vec![Atom::water(Vec3::new(0.0, 0.0, 3.0))];
        let mut body = Body::with_waters(0, atoms, waters);
        body.translate(&Vec3::new(1.0, 0.0, 0.0));
        assert_delta!(body.atoms()[0].pos.x, 1.0, 1e-12);
        assert_delta!(body.waters()[0].pos.x, 1.0, 1e-12);
    }

    #[test]
    fn rotation_preserves_intra_body_distances() {
        let atoms = vec![
            Atom::of_class(Vec3::new(0.0, 0.0, 0.0), FormFactorClass::C),
            Atom::of_class(Vec3::new(1.5, 0.0, 0.0), FormFactorClass::N),
            Atom::of_class(Vec3::new(0.0, 2.5, 0.0), FormFactorClass::O),
        ];
        let mut body = Body::new(0, atoms);
        let d01 = body.atoms()[0].pos.distance_to(&body.atoms()[1].pos);
        let d12 = body.atoms()[1].pos.distance_to(&body.atoms()[2].pos);

        body.rotate(&Vec3::new(1.0, 1.0, 0.0), 1.1);

        assert_delta!(body.atoms()[0].pos.distance_to(&body.atoms()[1].pos), d01, 1e-9);
        assert_delta!(body.atoms()[1].pos.distance_to(&body.atoms()[2].pos), d12, 1e-9);
    }

    #[test]
    fn symmetry_copy_is_generated_on_demand() {
        let sym = Symmetry::repeating(SymmetryRelation::translation(Vec3::new(0.0, 10.0, 0.0)), 2);
        let cm = Vec3::from_float(0.0);
        let p = Vec3::new(1.0, 0.0, 0.0);
        let copy2 = sym.transform_point(&cm, 2, &p);
        assert_delta!(copy2.y, 20.0, 1e-12);
        assert_delta!(copy2.x, 1.0, 1e-12);
    }

    #[test]
    fn molecule_rejects_empty_body_list() {
        assert!(Molecule::new(Vec::new()).is_err());
    }

    #[test]
    fn molecule_rejects_duplicate_body_ids() {
        let a = Body::new(7, vec![Atom::of_class(Vec3::from_float(0.0), FormFactorClass::C)]);
        let b = Body::new(7, vec![Atom::of_class(Vec3::from_float(1.0), FormFactorClass::C)]);
        assert!(Molecule::new(vec![a, b]).is_err());
    }

    #[test]
    fn molecule_aggregates_hydration() {
        let a = Body::with_waters(
            0,
            vec![Atom::of_class(Vec3::from_float(0.0), FormFactorClass::C)],
            vec![Atom::water(Vec3::new(0.0, 0.0, 3.0))],
        );
        let b = Body::with_waters(
            1,
            vec![Atom::of_class(Vec3::from_float(1.0), FormFactorClass::C)],
            vec![Atom::water(Vec3::new(0.0, 0.0, -3.0)), Atom::water(Vec3::new(0.0, 3.0, 0.0))],
        );
        let molecule = Molecule::new(vec![a, b]).unwrap();
        assert_eq!(molecule.waters().len(), 3);
        assert_eq!(molecule.atom_count(), 2);
    }
}
