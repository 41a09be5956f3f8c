#[cfg(test)]
mod test_grid {
    use saxskit_data::{Atom, Body, FormFactorClass, Molecule};
    use saxskit_grid::{excluded_volume, generate_hydration, CellState, Grid, GridConfig};
    use saxskit_numerical::Vec3;

    fn single_carbon() -> Molecule {
        Molecule::from_atoms(vec![Atom::of_class(Vec3::from_float(0.0), FormFactorClass::C)]).unwrap()
    }

    /// A compact ball of atoms on a cubic lattice, to exercise surface detection.
    fn atom_ball(radius: f64) -> Molecule {
        let mut atoms = Vec::new();
        let n = radius.ceil() as i32;
        for i in -n..=n {
            for j in -n..=n {
                for k in -n..=n {
                    let p = Vec3::new(i as f64, j as f64, k as f64);
                    if p.length() <= radius {
                        atoms.push(Atom::of_class(p, FormFactorClass::C));
                    }
                }
            }
        }
        Molecule::from_atoms(atoms).unwrap()
    }

    #[test]
    fn atom_center_implies_atom_area_ball() {
        let molecule = single_carbon();
        let grid = Grid::from_molecule(&molecule, GridConfig::default());
        let [x, y, z] = grid.to_bins(&Vec3::from_float(0.0)).unwrap();

        assert_eq!(grid.state(x, y, z), CellState::AtomCenter);
        assert_eq!(grid.state(x + 1, y, z), CellState::AtomArea);
        assert_eq!(grid.state(x, y + 2, z), CellState::AtomArea);
    }

    #[test]
    fn far_cells_stay_empty() {
        let molecule = single_carbon();
        let grid = Grid::from_molecule(&molecule, GridConfig::default());
        let [x, y, z] = grid.to_bins(&Vec3::from_float(0.0)).unwrap();
        assert_eq!(grid.state(x + 8, y, z), CellState::Empty);
    }

    #[test]
    fn occupied_volume_of_single_atom_is_positive() {
        let molecule = single_carbon();
        let grid = Grid::from_molecule(&molecule, GridConfig::default());
        let ball = 4.0 / 3.0 * std::f64::consts::PI * 2.4f64.powi(3);
        // the discretized ball volume is within a factor of two of the analytic one
        assert!(grid.occupied_volume() > ball / 2.0);
        assert!(grid.occupied_volume() < ball * 2.0);
    }

    #[test]
    fn exv_points_cover_the_particle() {
        let molecule = atom_ball(4.0);
        let grid = Grid::from_molecule(&molecule, GridConfig::default());
        let vol = excluded_volume(&grid, false);
        assert!(!vol.is_empty());
        assert!(vol.surface.is_empty());

        // all points lie within the stamped particle plus one atom radius
        for p in &vol.interior {
            assert!(p.length() < 4.0 + 2.4 + 1.0);
        }
    }

    #[test]
    fn surface_detection_separates_interior_from_surface() {
        let molecule = atom_ball(6.0);
        let grid = Grid::from_molecule(&molecule, GridConfig::default());
        let vol = excluded_volume(&grid, true);

        assert!(!vol.surface.is_empty());
        assert!(!vol.interior.is_empty());

        // surface points sit farther from the center than interior ones on average
        let avg = |points: &Vec<saxskit_numerical::Vec3>| {
            points.iter().map(|p| p.length()).sum::<f64>() / points.len() as f64
        };
        assert!(avg(&vol.surface) > avg(&vol.interior));
    }

    #[test]
    fn hydration_sits_on_the_surface() {
        let mut molecule = single_carbon();
        let mut grid = Grid::from_molecule(&molecule, GridConfig::default());
        let placed = generate_hydration(&mut molecule, &mut grid);

        assert!(placed > 0);
        assert_eq!(molecule.waters().len(), placed);
        let r_eff = 2.4 + 1.5;
        for water in molecule.waters() {
            assert!((water.pos.length() - r_eff).abs() < 1e-9);
        }
    }

    #[test]
    fn hydration_waters_do_not_land_inside_the_particle() {
        let mut molecule = atom_ball(4.0);
        let mut grid = Grid::from_molecule(&molecule, GridConfig::default());
        generate_hydration(&mut molecule, &mut grid);
        for water in molecule.waters() {
            // outside the lattice ball
            assert!(water.pos.length() > 4.0);
        }
    }

    #[test]
    fn moving_a_body_requires_a_rebuild() {
        let mut molecule = single_carbon();
        let grid_before = Grid::from_molecule(&molecule, GridConfig::default());
        let occupied_before = grid_before.occupied_volume();

        molecule.bodies_mut()[0].translate(&Vec3::new(3.0, 0.0, 0.0));
        let grid_after = Grid::from_molecule(&molecule, GridConfig::default());

        // same particle, same volume, different location
        assert!((grid_after.occupied_volume() - occupied_before).abs() < 1e-9);
        let [x, y, z] = grid_after.to_bins(&Vec3::new(3.0, 0.0, 0.0)).unwrap();
        assert_eq!(grid_after.state(x, y, z), CellState::AtomCenter);
    }
}
