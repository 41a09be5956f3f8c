use std::collections::HashSet;

use saxskit_numerical::Vec3;

use crate::{Atom, Body, DataError};

/// A molecule: an ordered, nonempty sequence of rigid bodies.
///
/// The hydration layer of a molecule is the union of the per-body water
/// shells. Bodies may be rotated and translated in place after construction;
/// each such mutation is reported through the body's signaller.
#[derive(Clone, Debug)]
pub struct Molecule {
    bodies: Vec<Body>,
}

impl Molecule {
    /// Creates a molecule from a nonempty sequence of bodies with unique identifiers
    pub fn new(bodies: Vec<Body>) -> Result<Molecule, DataError> {
        if bodies.is_empty() {
            return Err(DataError::EmptyMolecule);
        }
        let mut seen = HashSet::new();
        for body in &bodies {
            if !seen.insert(body.id()) {
                return Err(DataError::DuplicateBodyId(body.id()));
            }
        }
        return Ok(Molecule { bodies });
    }

    /// Creates a single-body molecule from a plain list of atoms
    pub fn from_atoms(atoms: Vec<Atom>) -> Result<Molecule, DataError> {
        Molecule::new(vec![Body::new(0, atoms)])
    }

    /// Bodies of this molecule
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable access to the bodies of this molecule
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    /// The `i`-th body
    pub fn body(&self, i: usize) -> &Body {
        &self.bodies[i]
    }

    /// The number of bodies
    pub fn size_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// The total number of atoms across all bodies, hydration excluded
    pub fn atom_count(&self) -> usize {
        self.bodies.iter().map(|b| b.size()).sum()
    }

    /// The hydration layer: all waters of all bodies, in body order
    pub fn waters(&self) -> Vec<Atom> {
        self.bodies.iter().flat_map(|b| b.waters().iter().copied()).collect()
    }

    /// Iterates over all atoms of all bodies, hydration excluded
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.bodies.iter().flat_map(|b| b.atoms().iter())
    }

    /// Sum of the scattering weights of all atoms, hydration excluded
    pub fn total_weight(&self) -> f64 {
        self.atoms().map(|a| a.weight).sum()
    }

    /// Center of mass of the whole molecule, weighted by scattering weights
    pub fn center_of_mass(&self) -> Vec3 {
        let mut cm = Vec3::from_float(0.0);
        let mut total = 0.0;
        for atom in self.atoms() {
            let mut p = atom.pos;
            p *= atom.weight;
            cm += &p;
            total += atom.weight;
        }
        if total > 0.0 {
            cm /= total;
        }
        return cm;
    }

    /// Axis-aligned bounding box of all atoms, as `(min, max)` corners
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::from_float(f64::MAX);
        let mut max = Vec3::from_float(f64::MIN);
        for atom in self.atoms() {
            for k in 0..3 {
                min[k] = min[k].min(atom.pos[k]);
                max[k] = max[k].max(atom.pos[k]);
            }
        }
        return (min, max);
    }

    /// Removes all waters from every body
    pub fn clear_hydration(&mut self) {
        for body in &mut self.bodies {
            body.set_waters(Vec::new());
        }
    }
}
