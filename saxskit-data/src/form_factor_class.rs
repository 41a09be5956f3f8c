use std::fmt::{Display, Formatter};

/// Form factor class of an atom.
///
/// The enumeration covers the explicit-hydrogen groups encountered in
/// biomolecules plus the bare elements and the excluded-volume pseudo-class.
/// The discriminant is used directly as an index into form-factor tables.
///
/// # Example
/// ```
/// use saxskit_data::FormFactorClass;
/// let c = FormFactorClass::from_element("C", 2).unwrap();
/// assert_eq!(c, FormFactorClass::CH2);
/// assert_eq!(c as usize, 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FormFactorClass {
    /// neutral hydrogen
    H = 0,
    /// neutral carbon
    C,
    /// carbon with one bound hydrogen
    CH,
    /// carbon with two bound hydrogens
    CH2,
    /// carbon with three bound hydrogens
    CH3,
    /// neutral nitrogen
    N,
    /// nitrogen with one bound hydrogen
    NH,
    /// nitrogen with two bound hydrogens
    NH2,
    /// neutral oxygen
    O,
    /// oxygen with one bound hydrogen
    OH,
    /// neutral sulfur
    S,
    /// sulfur with one bound hydrogen
    SH,
    /// all other atoms
    Other,
    /// excluded-volume pseudo-atom
    ExcludedVolume,
}

/// The number of form factor classes; can be used to allocate per-class arrays.
pub const FF_CLASS_COUNT: usize = 14;

impl FormFactorClass {
    /// The number of form factor classes, excluding the excluded-volume pseudo-class.
    pub const COUNT_WITHOUT_EXV: usize = FF_CLASS_COUNT - 1;

    /// Returns the class for a chemical element with a given number of bound hydrogens.
    ///
    /// Unrecognized elements map to [`FormFactorClass::Other`]; a `None` is
    /// returned only for an empty element symbol.
    pub fn from_element(element: &str, bound_hydrogens: u8) -> Option<FormFactorClass> {
        if element.is_empty() {
            return None;
        }
        let class = match (element.to_ascii_uppercase().as_str(), bound_hydrogens) {
            ("H", _) => FormFactorClass::H,
            ("C", 0) => FormFactorClass::C,
            ("C", 1) => FormFactorClass::CH,
            ("C", 2) => FormFactorClass::CH2,
            ("C", _) => FormFactorClass::CH3,
            ("N", 0) => FormFactorClass::N,
            ("N", 1) => FormFactorClass::NH,
            ("N", _) => FormFactorClass::NH2,
            ("O", 0) => FormFactorClass::O,
            ("O", _) => FormFactorClass::OH,
            ("S", 0) => FormFactorClass::S,
            ("S", _) => FormFactorClass::SH,
            _ => FormFactorClass::Other,
        };
        return Some(class);
    }

    /// Returns the class with a given index, the inverse of `class as usize`
    pub fn from_index(index: usize) -> Option<FormFactorClass> {
        use FormFactorClass::*;
        const ALL: [FormFactorClass; FF_CLASS_COUNT] =
            [H, C, CH, CH2, CH3, N, NH, NH2, O, OH, S, SH, Other, ExcludedVolume];
        return ALL.get(index).copied();
    }

    /// Effective number of electrons for an atom of this class.
    ///
    /// Grouped classes count their bound hydrogens; the value for
    /// [`FormFactorClass::Other`] is that of argon.
    pub fn electrons(&self) -> f64 {
        match self {
            FormFactorClass::H => 1.0,
            FormFactorClass::C => 6.0,
            FormFactorClass::CH => 7.0,
            FormFactorClass::CH2 => 8.0,
            FormFactorClass::CH3 => 9.0,
            FormFactorClass::N => 7.0,
            FormFactorClass::NH => 8.0,
            FormFactorClass::NH2 => 9.0,
            FormFactorClass::O => 8.0,
            FormFactorClass::OH => 9.0,
            FormFactorClass::S => 16.0,
            FormFactorClass::SH => 17.0,
            FormFactorClass::Other => 18.0,
            FormFactorClass::ExcludedVolume => 1.0,
        }
    }
}

impl Display for FormFactorClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FormFactorClass::H => "H",
            FormFactorClass::C => "C",
            FormFactorClass::CH => "CH",
            FormFactorClass::CH2 => "CH2",
            FormFactorClass::CH3 => "CH3",
            FormFactorClass::N => "N",
            FormFactorClass::NH => "NH",
            FormFactorClass::NH2 => "NH2",
            FormFactorClass::O => "O",
            FormFactorClass::OH => "OH",
            FormFactorClass::S => "S",
            FormFactorClass::SH => "SH",
            FormFactorClass::Other => "other",
            FormFactorClass::ExcludedVolume => "excluded volume",
        };
        write!(f, "{}", name)
    }
}
