use saxskit_numerical::{Rototranslation, Vec3};

/// One step of a symmetry: a rotation about the body's center of mass
/// followed by a translation.
#[derive(Clone, Debug)]
pub struct SymmetryRelation {
    /// direction of the rotation axis through the center of mass
    pub axis: Vec3,
    /// rotation angle in radians
    pub angle: f64,
    /// translation applied after the rotation
    pub translation: Vec3,
}

impl SymmetryRelation {
    /// A relation that leaves the body unchanged
    pub fn identity() -> SymmetryRelation {
        SymmetryRelation { axis: Vec3::new(0.0, 0.0, 1.0), angle: 0.0, translation: Vec3::from_float(0.0) }
    }

    /// A pure translation
    pub fn translation(shift: Vec3) -> SymmetryRelation {
        SymmetryRelation { axis: Vec3::new(0.0, 0.0, 1.0), angle: 0.0, translation: shift }
    }

    fn as_rototranslation(&self, origin: &Vec3) -> Rototranslation {
        Rototranslation::new(origin, &self.axis, self.angle, self.translation)
    }
}

/// Symmetry descriptor of a body.
///
/// The descriptor generates `repetitions` additional copies of the body's
/// atoms: copy `k` (1-based) is obtained by applying the initial relation
/// once and the repeat relation `k` times, all relative to the body's center
/// of mass. The copies are generated on demand; they are never stored.
///
/// # Example
/// ```
/// use saxskit_data::{Symmetry, SymmetryRelation};
/// use saxskit_numerical::Vec3;
/// // a dimer partner displaced by 10 Å along x
/// let sym = Symmetry::repeating(SymmetryRelation::translation(Vec3::new(10.0, 0.0, 0.0)), 1);
/// let p = sym.transform_point(&Vec3::from_float(0.0), 1, &Vec3::new(1.0, 0.0, 0.0));
/// assert!((p.x - 11.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct Symmetry {
    initial: SymmetryRelation,
    repeat: SymmetryRelation,
    repetitions: usize,
}

impl Symmetry {
    /// Creates a symmetry from an initial relation, a repeat relation and a repetition count
    pub fn new(initial: SymmetryRelation, repeat: SymmetryRelation, repetitions: usize) -> Symmetry {
        Symmetry { initial, repeat, repetitions }
    }

    /// Creates a symmetry with an identity initial relation
    pub fn repeating(repeat: SymmetryRelation, repetitions: usize) -> Symmetry {
        Symmetry { initial: SymmetryRelation::identity(), repeat, repetitions }
    }

    /// The number of additional copies this symmetry generates
    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Transforms a point into the `k`-th symmetry copy (1-based)
    pub fn transform_point(&self, cm: &Vec3, k: usize, point: &Vec3) -> Vec3 {
        let initial = self.initial.as_rototranslation(cm);
        let repeat = self.repeat.as_rototranslation(cm);
        let mut p = initial.apply(point);
        for _ in 0..k {
            repeat.apply_mut(&mut p);
        }
        return p;
    }
}
