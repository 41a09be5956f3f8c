use log::debug;
use saxskit_numerical::{Rototranslation, Vec3};

use crate::{Atom, Signaller, Symmetry};

/// A contiguous group of atoms that move rigidly together.
///
/// A body owns its atoms exclusively, may carry a hydration shell and a list
/// of [`Symmetry`] descriptors, and announces its mutations through the
/// [`Signaller`] installed by the owning histogram manager. Moving a body
/// (translation, rotation) raises the *external* flag only; intra-body
/// distances are unchanged by rigid moves. Replacing its atoms raises the
/// *internal* flag.
#[derive(Clone, Debug, Default)]
pub struct Body {
    id: u32,
    atoms: Vec<Atom>,
    waters: Vec<Atom>,
    symmetries: Vec<Symmetry>,
    signaller: Signaller,
}

impl Body {
    /// Creates a body from its atoms
    pub fn new(id: u32, atoms: Vec<Atom>) -> Body {
        Body { id, atoms, ..Default::default() }
    }

    /// Creates a body with a hydration shell
    pub fn with_waters(id: u32, atoms: Vec<Atom>, waters: Vec<Atom>) -> Body {
        Body { id, atoms, waters, ..Default::default() }
    }

    /// Identifier of this body, unique within its molecule
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Atoms of this body
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Hydration shell of this body; may be empty
    pub fn waters(&self) -> &[Atom] {
        &self.waters
    }

    /// The number of atoms in this body
    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    /// Symmetry descriptors of this body
    pub fn symmetries(&self) -> &[Symmetry] {
        &self.symmetries
    }

    /// Adds a symmetry descriptor
    pub fn add_symmetry(&mut self, symmetry: Symmetry) {
        self.symmetries.push(symmetry);
    }

    /// Installs the signaller through which this body announces its mutations
    pub fn set_signaller(&mut self, signaller: Signaller) {
        self.signaller = signaller;
    }

    /// Center of mass of this body, weighted by the scattering weights
    pub fn center_of_mass(&self) -> Vec3 {
        let mut cm = Vec3::from_float(0.0);
        let mut total = 0.0;
        for atom in &self.atoms {
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

    /// Translates this body (atoms and waters) by a given shift.
    ///
    /// Signals an external modification.
    pub fn translate(&mut self, shift: &Vec3) {
        for atom in self.atoms.iter_mut().chain(self.waters.iter_mut()) {
            atom.pos += shift;
        }
        debug!("body {} translated by {}", self.id, shift);
        self.signaller.modified_external();
    }

    /// Rotates this body by a given angle around an axis through its center of mass.
    ///
    /// Signals an external modification.
    pub fn rotate(&mut self, axis: &Vec3, angle_rad: f64) {
        let rt = Rototranslation::around_axis(&self.center_of_mass(), axis, angle_rad);
        self.transform(&rt);
    }

    /// Applies an arbitrary rigid transformation to this body (atoms and waters).
    ///
    /// Signals an external modification.
    pub fn transform(&mut self, rt: &Rototranslation) {
        for atom in self.atoms.iter_mut().chain(self.waters.iter_mut()) {
            rt.apply_mut(&mut atom.pos);
        }
        debug!("body {} transformed", self.id);
        self.signaller.modified_external();
    }

    /// Replaces the atom sequence of this body.
    ///
    /// Signals an internal modification: the intra-body distances changed.
    pub fn set_atoms(&mut self, atoms: Vec<Atom>) {
        self.atoms = atoms;
        self.signaller.modified_internal();
    }

    /// Replaces the hydration shell of this body.
    ///
    /// The caller is responsible for flagging the hydration layer on the
    /// owning state manager; waters do not belong to any single partial.
    pub fn set_waters(&mut self, waters: Vec<Atom>) {
        self.waters = waters;
    }
}
