//! Analytic atomic form factors and their precalculated products.
//!
//! Element form factors use the standard four-Gaussian Cromer–Mann
//! parameterizations; the explicit-hydrogen groups (CH, NH₂, …) sum the
//! Gaussians of their constituents. All atomic form factors are normalized
//! to f(0) = 1, so the scattering amplitude of an atom is its weight times
//! the normalized form factor. Excluded-volume pseudo-atoms scatter with a
//! Gaussian-sphere profile scaled by the solvent electron density and the
//! displaced volume of their class.

use once_cell::sync::Lazy;
use saxskit_data::{FormFactorClass, FF_CLASS_COUNT};

use crate::axis::Axis;

/// Electron density of bulk water, e/Å³.
pub const RHO_WATER: f64 = 0.334;

/// Normalized analytic form factor: a sum of Gaussians plus a constant.
#[derive(Clone, Debug)]
pub struct FormFactor {
    a: [f64; 8],
    b: [f64; 8],
    c: f64,
    norm: f64,
}

impl FormFactor {
    fn from_parts(a: [f64; 8], b: [f64; 8], c: f64) -> FormFactor {
        let norm = a.iter().sum::<f64>() + c;
        FormFactor { a, b, c, norm }
    }

    fn element(a: [f64; 4], b: [f64; 4], c: f64) -> FormFactor {
        FormFactor::from_parts(
            [a[0], a[1], a[2], a[3], 0.0, 0.0, 0.0, 0.0],
            [b[0], b[1], b[2], b[3], 1.0, 1.0, 1.0, 1.0],
            c,
        )
    }

    /// The group formed by an element with `n` bound hydrogens
    fn group(base: &FormFactor, hydrogen: &FormFactor, n: usize) -> FormFactor {
        let mut a = base.a;
        let mut b = base.b;
        for k in 0..4 {
            a[4 + k] = n as f64 * hydrogen.a[k];
            b[4 + k] = hydrogen.b[k];
        }
        return FormFactor::from_parts(a, b, base.c + n as f64 * hydrogen.c);
    }

    /// Evaluates the normalized form factor at a given q
    pub fn evaluate(&self, q: f64) -> f64 {
        let s = q / (4.0 * std::f64::consts::PI);
        let s2 = s * s;
        let mut f = self.c;
        for k in 0..8 {
            f += self.a[k] * (-self.b[k] * s2).exp();
        }
        return f / self.norm;
    }
}

// Cromer-Mann coefficients, International Tables for Crystallography vol. C.
fn cm_h() -> FormFactor {
    FormFactor::element(
        [0.489918, 0.262003, 0.196767, 0.049879],
        [20.6593, 7.74039, 49.5519, 2.20159],
        0.001305,
    )
}

fn cm_c() -> FormFactor {
    FormFactor::element(
        [2.31000, 1.02000, 1.58860, 0.865000],
        [20.8439, 10.2075, 0.568700, 51.6512],
        0.215600,
    )
}

fn cm_n() -> FormFactor {
    FormFactor::element(
        [12.2126, 3.13220, 2.01250, 1.16630],
        [0.005700, 9.89330, 28.9975, 0.582600],
        -11.529,
    )
}

fn cm_o() -> FormFactor {
    FormFactor::element(
        [3.04850, 2.28680, 1.54630, 0.867000],
        [13.2771, 5.70110, 0.323900, 32.9089],
        0.250800,
    )
}

fn cm_s() -> FormFactor {
    FormFactor::element(
        [6.90530, 5.20340, 1.43790, 1.58630],
        [1.46790, 22.2151, 0.253600, 56.1720],
        0.866900,
    )
}

fn cm_ar() -> FormFactor {
    FormFactor::element(
        [7.48450, 6.77230, 0.653900, 1.64420],
        [0.907200, 14.8407, 43.8983, 33.3929],
        1.44450,
    )
}

/// Displaced solvent volume of an atom of a given class, in Å³.
///
/// Element values follow Fraser, MacRae & Suzuki; groups add 5.15 Å³ per
/// bound hydrogen.
pub fn displaced_volume(class: FormFactorClass) -> f64 {
    match class {
        FormFactorClass::H => 5.15,
        FormFactorClass::C => 16.44,
        FormFactorClass::CH => 21.59,
        FormFactorClass::CH2 => 26.74,
        FormFactorClass::CH3 => 31.89,
        FormFactorClass::N => 2.49,
        FormFactorClass::NH => 7.64,
        FormFactorClass::NH2 => 12.79,
        FormFactorClass::O => 9.13,
        FormFactorClass::OH => 14.28,
        FormFactorClass::S => 19.86,
        FormFactorClass::SH => 25.01,
        FormFactorClass::Other => 16.44,
        FormFactorClass::ExcludedVolume => 4.0 / 3.0 * std::f64::consts::PI * 1.5f64.powi(3),
    }
}

/// Gaussian-sphere excluded-volume form factor.
///
/// The amplitude is the number of displaced solvent electrons, `ρ·V`; the
/// shape is a Gaussian with width coupled to the displaced volume.
#[derive(Clone, Debug)]
pub struct ExvFormFactor {
    volume: f64,
}

impl ExvFormFactor {
    pub fn new(volume: f64) -> ExvFormFactor {
        ExvFormFactor { volume }
    }

    /// The excluded-volume form factor of an atomic class
    pub fn of_class(class: FormFactorClass) -> ExvFormFactor {
        ExvFormFactor { volume: displaced_volume(class) }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Number of displaced solvent electrons
    pub fn amplitude(&self) -> f64 {
        RHO_WATER * self.volume
    }

    /// Evaluates the amplitude-carrying form factor at a given q
    pub fn evaluate(&self, q: f64) -> f64 {
        let width = self.volume.powf(2.0 / 3.0) / (4.0 * std::f64::consts::PI);
        return self.amplitude() * (-q * q * width).exp();
    }
}

/// The distance-dependent excluded-volume scaling factor.
///
/// `exv_factor(q, 1)` is exactly 1 for every q, and `exv_factor(0, cx)` is
/// cx³; the Gaussian tail couples the scaling to the length scale `r0`.
///
/// # Example
/// ```
/// use saxskit_hist::exv_factor;
/// assert!((exv_factor(0.3, 1.0, 1.5) - 1.0).abs() < 1e-12);
/// assert!((exv_factor(0.0, 1.1, 1.5) - 1.1f64.powi(3)).abs() < 1e-12);
/// ```
pub fn exv_factor(q: f64, cx: f64, r0: f64) -> f64 {
    let qr = q * r0;
    return cx.powi(3) * (-qr * qr * (cx * cx - 1.0) / (4.0 * std::f64::consts::PI)).exp();
}

fn atomic_form_factor(class: FormFactorClass) -> FormFactor {
    let h = cm_h();
    match class {
        FormFactorClass::H => h,
        FormFactorClass::C => cm_c(),
        FormFactorClass::CH => FormFactor::group(&cm_c(), &h, 1),
        FormFactorClass::CH2 => FormFactor::group(&cm_c(), &h, 2),
        FormFactorClass::CH3 => FormFactor::group(&cm_c(), &h, 3),
        FormFactorClass::N => cm_n(),
        FormFactorClass::NH => FormFactor::group(&cm_n(), &h, 1),
        FormFactorClass::NH2 => FormFactor::group(&cm_n(), &h, 2),
        FormFactorClass::O => cm_o(),
        FormFactorClass::OH => FormFactor::group(&cm_o(), &h, 1),
        FormFactorClass::S => cm_s(),
        FormFactorClass::SH => FormFactor::group(&cm_s(), &h, 1),
        FormFactorClass::Other => cm_ar(),
        // the excluded-volume pseudo-class uses its normalized Gaussian shape
        FormFactorClass::ExcludedVolume => {
            let exv = ExvFormFactor::of_class(FormFactorClass::ExcludedVolume);
            let width = exv.volume().powf(2.0 / 3.0) / (4.0 * std::f64::consts::PI);
            FormFactor::from_parts(
                [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                [width * (4.0 * std::f64::consts::PI).powi(2), 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                0.0,
            )
        }
    }
}

/// The normalized atomic form factors of all classes.
pub struct FormFactorTable {
    factors: Vec<FormFactor>,
}

impl FormFactorTable {
    fn build() -> FormFactorTable {
        let factors = (0..FF_CLASS_COUNT)
            .map(|i| atomic_form_factor(FormFactorClass::from_index(i).unwrap()))
            .collect();
        FormFactorTable { factors }
    }

    /// The normalized form factor of a class
    pub fn get(&self, class: FormFactorClass) -> &FormFactor {
        &self.factors[class as usize]
    }

    pub fn get_by_index(&self, index: usize) -> &FormFactor {
        &self.factors[index]
    }
}

static ATOMIC_TABLE: Lazy<FormFactorTable> = Lazy::new(FormFactorTable::build);

/// The shared atomic form factor table, built on first use.
pub fn atomic_table() -> &'static FormFactorTable {
    &ATOMIC_TABLE
}

/// Form-factor products pre-evaluated on the default q axis.
///
/// Three tables are kept: atom·atom, atom·exv (symmetrized over the class
/// pair) and exv·exv, each indexed by an unordered class pair.
pub struct FormFactorProductTable {
    q: Vec<f64>,
    aa: Vec<Vec<f64>>,
    ax: Vec<Vec<f64>>,
    xx: Vec<Vec<f64>>,
}

impl FormFactorProductTable {
    /// Builds the products on an arbitrary q grid
    pub fn new(q: &[f64]) -> FormFactorProductTable {
        let table = atomic_table();
        let n = FF_CLASS_COUNT;
        let mut aa = vec![Vec::new(); n * n];
        let mut ax = vec![Vec::new(); n * n];
        let mut xx = vec![Vec::new(); n * n];
        for c1 in 0..n {
            let f1 = table.get_by_index(c1);
            let x1 = ExvFormFactor::of_class(FormFactorClass::from_index(c1).unwrap());
            for c2 in c1..n {
                let f2 = table.get_by_index(c2);
                let x2 = ExvFormFactor::of_class(FormFactorClass::from_index(c2).unwrap());
                let idx = c1 * n + c2;
                aa[idx] = q.iter().map(|&qv| f1.evaluate(qv) * f2.evaluate(qv)).collect();
                ax[idx] = q
                    .iter()
                    .map(|&qv| {
                        0.5 * (f1.evaluate(qv) * x2.evaluate(qv) + f2.evaluate(qv) * x1.evaluate(qv))
                    })
                    .collect();
                xx[idx] = q.iter().map(|&qv| x1.evaluate(qv) * x2.evaluate(qv)).collect();
            }
        }
        return FormFactorProductTable { q: q.to_vec(), aa, ax, xx };
    }

    pub fn q_values(&self) -> &[f64] {
        &self.q
    }

    /// atom·atom product for an unordered class pair; requires `c1 <= c2`
    pub fn aa(&self, c1: usize, c2: usize) -> &[f64] {
        debug_assert!(c1 <= c2);
        &self.aa[c1 * FF_CLASS_COUNT + c2]
    }

    /// atom·exv product for an unordered class pair; requires `c1 <= c2`
    pub fn ax(&self, c1: usize, c2: usize) -> &[f64] {
        debug_assert!(c1 <= c2);
        &self.ax[c1 * FF_CLASS_COUNT + c2]
    }

    /// exv·exv product for an unordered class pair; requires `c1 <= c2`
    pub fn xx(&self, c1: usize, c2: usize) -> &[f64] {
        debug_assert!(c1 <= c2);
        &self.xx[c1 * FF_CLASS_COUNT + c2]
    }
}

static PRODUCT_TABLE: Lazy<FormFactorProductTable> =
    Lazy::new(|| FormFactorProductTable::new(&Axis::default_q_axis().as_vector()));

/// The shared product table on the default q axis, built on first use.
pub fn product_table() -> &'static FormFactorProductTable {
    &PRODUCT_TABLE
}
