use saxskit_numerical::Vec3;

use crate::FormFactorClass;

/// A scatterer: position, scattering weight and form factor class.
///
/// The weight is the effective electron count of the atom multiplied by its
/// occupancy; for a fully occupied carbon it equals 6.
///
/// # Example
/// ```
/// use saxskit_data::{Atom, FormFactorClass};
/// use saxskit_numerical::Vec3;
/// let a = Atom::new(Vec3::new(1.0, 2.0, 3.0), 6.0, FormFactorClass::C);
/// assert_eq!(a.weight, 6.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Atom {
    /// position of this atom in Å
    pub pos: Vec3,
    /// scattering weight: effective electron count times occupancy
    pub weight: f64,
    /// form factor class of this atom
    pub class: FormFactorClass,
}

impl Atom {
    /// Creates a new atom
    pub fn new(pos: Vec3, weight: f64, class: FormFactorClass) -> Atom {
        Atom { pos, weight, class }
    }

    /// Creates a fully occupied atom of a given class; the weight is the class' electron count
    pub fn of_class(pos: Vec3, class: FormFactorClass) -> Atom {
        Atom { pos, weight: class.electrons(), class }
    }

    /// Creates a water molecule scatterer at a given position.
    ///
    /// Waters scatter with the ten electrons of H₂O and carry the OH class.
    pub fn water(pos: Vec3) -> Atom {
        Atom { pos, weight: 10.0, class: FormFactorClass::OH }
    }
}
