//! Compact structure-of-arrays coordinate storage and the vectorized
//! distance kernels operating on it.
//!
//! Each atom occupies 16 aligned bytes: three position floats and the
//! scattering weight in the fourth lane. Sequences are padded with
//! zero-weight sentinels so the eight-wide kernels may always read a full
//! block. When SSE2/SSE4.1/AVX are available the squared distances are
//! evaluated in packed registers; the scalar fallback produces identical
//! results for the rounded (bin-index) variant.

use saxskit_data::{Atom, Body, FormFactorClass};
use saxskit_numerical::Vec3;
use std::ops::Index;

use crate::axis::Binning;
use crate::distribution::{GenericDistribution1D, GenericDistribution2D, GenericDistribution3D};

/// One atom in compact form: position and weight in a single 16-byte pack.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, Default)]
pub struct CompactCoordinatesData {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl CompactCoordinatesData {
    pub fn new(pos: &Vec3, weight: f64) -> CompactCoordinatesData {
        CompactCoordinatesData { x: pos.x as f32, y: pos.y as f32, z: pos.z as f32, w: weight as f32 }
    }

    /// Squared distance to another pack.
    #[inline(always)]
    pub fn distance2(&self, other: &CompactCoordinatesData) -> f32 {
        #[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
        unsafe {
            return simd::squared_distance(self, other);
        }
        #[cfg(not(all(target_arch = "x86_64", target_feature = "sse2")))]
        {
            return self.distance2_scalar(other);
        }
    }

    #[inline(always)]
    #[allow(dead_code)]
    fn distance2_scalar(&self, other: &CompactCoordinatesData) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        return dx * dx + dy * dy + dz * dz;
    }
}

#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
mod simd {
    use super::CompactCoordinatesData;
    use std::arch::x86_64::*;

    /// Squared distance of two packs via 128-bit registers.
    ///
    /// The weight lane is masked out of the subtraction so only x, y, z
    /// enter the dot product.
    #[inline(always)]
    pub(super) unsafe fn squared_distance(
        a: &CompactCoordinatesData,
        b: &CompactCoordinatesData,
    ) -> f32 {
        let va = _mm_load_ps(a as *const CompactCoordinatesData as *const f32);
        let vb = _mm_load_ps(b as *const CompactCoordinatesData as *const f32);
        let diff = _mm_sub_ps(va, vb);
        #[cfg(target_feature = "sse4.1")]
        {
            // multiply x, y, z and store the sum in the first lane
            return _mm_cvtss_f32(_mm_dp_ps(diff, diff, 0b0111_0001));
        }
        #[cfg(not(target_feature = "sse4.1"))]
        {
            let mask = _mm_castsi128_ps(_mm_set_epi32(0, -1, -1, -1));
            let masked = _mm_and_ps(diff, mask);
            let sq = _mm_mul_ps(masked, masked);
            // horizontal sum of the low three lanes
            let shuf = _mm_shuffle_ps(sq, sq, 0b00_00_00_01);
            let sum1 = _mm_add_ss(sq, shuf);
            let shuf2 = _mm_shuffle_ps(sq, sq, 0b00_00_00_10);
            return _mm_cvtss_f32(_mm_add_ss(sum1, shuf2));
        }
    }

    /// Squared distances from one pack to two consecutive packs via a single
    /// 256-bit subtraction and dot product.
    #[cfg(target_feature = "avx")]
    #[inline(always)]
    pub(super) unsafe fn squared_distance_pair(
        a: &CompactCoordinatesData,
        b1: &CompactCoordinatesData,
        b2: &CompactCoordinatesData,
    ) -> (f32, f32) {
        let va = _mm_load_ps(a as *const CompactCoordinatesData as *const f32);
        let vb1 = _mm_load_ps(b1 as *const CompactCoordinatesData as *const f32);
        let vb2 = _mm_load_ps(b2 as *const CompactCoordinatesData as *const f32);
        let vaa: __m256 = _mm256_broadcast_ps(&va);
        let vb = _mm256_set_m128(vb2, vb1);
        let diff = _mm256_sub_ps(vaa, vb);
        let dp = _mm256_dp_ps(diff, diff, 0b0111_0001);
        let mut out = [0.0f32; 8];
        _mm256_storeu_ps(out.as_mut_ptr(), dp);
        return (out[0], out[4]);
    }
}

/// A padded sequence of compact coordinates.
///
/// # Example
/// ```
/// use saxskit_data::{Atom, FormFactorClass};
/// use saxskit_hist::CompactCoordinates;
/// use saxskit_numerical::Vec3;
/// let atoms = vec![Atom::new(Vec3::new(0.0, 0.0, 1.0), 6.0, FormFactorClass::C)];
/// let cc = CompactCoordinates::from_atoms(&atoms);
/// assert_eq!(cc.size(), 1);
/// assert_eq!(cc[0].w, 6.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CompactCoordinates {
    data: Vec<CompactCoordinatesData>,
    size: usize,
}

impl CompactCoordinates {
    fn with_padding(mut data: Vec<CompactCoordinatesData>) -> CompactCoordinates {
        let size = data.len();
        let padded = size.div_ceil(8) * 8;
        data.resize(padded, CompactCoordinatesData::default());
        return CompactCoordinates { data, size };
    }

    /// Packs a sequence of atoms
    pub fn from_atoms(atoms: &[Atom]) -> CompactCoordinates {
        CompactCoordinates::with_padding(
            atoms.iter().map(|a| CompactCoordinatesData::new(&a.pos, a.weight)).collect(),
        )
    }

    /// Packs plain positions with a constant weight (excluded-volume points)
    pub fn from_positions(positions: &[Vec3], weight: f64) -> CompactCoordinates {
        CompactCoordinates::with_padding(
            positions.iter().map(|p| CompactCoordinatesData::new(p, weight)).collect(),
        )
    }

    /// Packs a body's atoms together with all of its symmetry copies.
    ///
    /// Copy `k` of each symmetry is generated on demand from the parent atoms;
    /// the base atoms come first, then the copies in symmetry order.
    pub fn from_body_expanded(body: &Body) -> CompactCoordinates {
        let cm = body.center_of_mass();
        let mut data: Vec<CompactCoordinatesData> =
            body.atoms().iter().map(|a| CompactCoordinatesData::new(&a.pos, a.weight)).collect();
        for symmetry in body.symmetries() {
            for k in 1..=symmetry.repetitions() {
                for atom in body.atoms() {
                    let pos = symmetry.transform_point(&cm, k, &atom.pos);
                    data.push(CompactCoordinatesData::new(&pos, atom.weight));
                }
            }
        }
        return CompactCoordinates::with_padding(data);
    }

    /// Packs every body of a molecule, symmetry copies included
    pub fn from_molecule_expanded(molecule: &saxskit_data::Molecule) -> CompactCoordinates {
        let mut data = Vec::new();
        for body in molecule.bodies() {
            let set = CompactCoordinates::from_body_expanded(body);
            data.extend_from_slice(&set.data[..set.size]);
        }
        return CompactCoordinates::with_padding(data);
    }

    /// The number of real (non-padding) entries
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The padded backing storage
    pub fn data(&self) -> &[CompactCoordinatesData] {
        &self.data
    }

    /// Sum of squared weights, the self-correlation contribution
    pub fn sum_w2(&self) -> f64 {
        self.data[..self.size].iter().map(|d| (d.w as f64) * (d.w as f64)).sum()
    }
}

impl Index<usize> for CompactCoordinates {
    type Output = CompactCoordinatesData;
    fn index(&self, i: usize) -> &CompactCoordinatesData {
        &self.data[i]
    }
}

/// Compact coordinates with a parallel array of form-factor class indexes.
#[derive(Clone, Debug, Default)]
pub struct CompactCoordinatesFF {
    inner: CompactCoordinates,
    ff: Vec<u8>,
}

impl CompactCoordinatesFF {
    /// Packs a sequence of atoms, keeping their form-factor classes
    pub fn from_atoms(atoms: &[Atom]) -> CompactCoordinatesFF {
        let inner = CompactCoordinates::from_atoms(atoms);
        let mut ff: Vec<u8> = atoms.iter().map(|a| a.class as u8).collect();
        ff.resize(inner.data.len(), FormFactorClass::H as u8);
        return CompactCoordinatesFF { inner, ff };
    }

    /// Packs a body's atoms together with all of its symmetry copies
    pub fn from_body_expanded(body: &Body) -> CompactCoordinatesFF {
        let inner = CompactCoordinates::from_body_expanded(body);
        let mut ff: Vec<u8> = body.atoms().iter().map(|a| a.class as u8).collect();
        let copies = body.symmetries().iter().map(|s| s.repetitions()).sum::<usize>();
        let base: Vec<u8> = ff.clone();
        for _ in 0..copies {
            ff.extend_from_slice(&base);
        }
        ff.resize(inner.data.len(), FormFactorClass::H as u8);
        return CompactCoordinatesFF { inner, ff };
    }

    /// Packs every body of a molecule, symmetry copies included
    pub fn from_molecule_expanded(molecule: &saxskit_data::Molecule) -> CompactCoordinatesFF {
        let mut data = Vec::new();
        let mut ff = Vec::new();
        for body in molecule.bodies() {
            let set = CompactCoordinatesFF::from_body_expanded(body);
            data.extend_from_slice(&set.inner.data[..set.inner.size]);
            ff.extend_from_slice(&set.ff[..set.inner.size]);
        }
        let inner = CompactCoordinates::with_padding(data);
        ff.resize(inner.data.len(), FormFactorClass::H as u8);
        return CompactCoordinatesFF { inner, ff };
    }

    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn coordinates(&self) -> &CompactCoordinates {
        &self.inner
    }

    /// Form-factor class index of the `i`-th entry
    #[inline(always)]
    pub fn class(&self, i: usize) -> usize {
        self.ff[i] as usize
    }
}

impl Index<usize> for CompactCoordinatesFF {
    type Output = CompactCoordinatesData;
    fn index(&self, i: usize) -> &CompactCoordinatesData {
        &self.inner[i]
    }
}

/// Distance and pair weight of a single evaluated pair.
#[derive(Clone, Copy, Debug)]
pub struct EvaluatedResult {
    pub distance: f32,
    pub weight: f32,
}

#[inline(always)]
fn evaluate_pair(a: &CompactCoordinatesData, b: &CompactCoordinatesData) -> EvaluatedResult {
    let d2 = a.distance2(b);
    EvaluatedResult { distance: d2.sqrt(), weight: a.w * b.w }
}

#[inline(always)]
#[allow(unused_variables)]
fn evaluate_block<const N: usize>(
    a: &CompactCoordinates,
    b: &CompactCoordinates,
    i: usize,
    j: usize,
) -> [EvaluatedResult; N] {
    let mut out = [EvaluatedResult { distance: 0.0, weight: 0.0 }; N];
    #[cfg(all(target_arch = "x86_64", target_feature = "avx"))]
    {
        let mut k = 0;
        while k + 1 < N {
            let (d1, d2) = unsafe { simd::squared_distance_pair(&a[i], &b[j + k], &b[j + k + 1]) };
            out[k] = EvaluatedResult { distance: d1.sqrt(), weight: a[i].w * b[j + k].w };
            out[k + 1] = EvaluatedResult { distance: d2.sqrt(), weight: a[i].w * b[j + k + 1].w };
            k += 2;
        }
        return out;
    }
    #[cfg(not(all(target_arch = "x86_64", target_feature = "avx")))]
    {
        for k in 0..N {
            out[k] = evaluate_pair(&a[i], &b[j + k]);
        }
        return out;
    }
}

/// Evaluates one pair and adds it to a 1D distribution.
///
/// `factor` carries the pair multiplicity: 2 for the upper triangle of a
/// symmetric loop, 1 when both orders are visited explicitly.
#[inline(always)]
pub fn evaluate1<B: Binning, D: GenericDistribution1D>(
    p: &mut D,
    binning: &B,
    a: &CompactCoordinates,
    b: &CompactCoordinates,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_pair(&a[i], &b[j]);
    p.add(binning.bin(res.distance as f64), res.distance as f64, factor * res.weight as f64);
}

/// Evaluates four consecutive pairs and adds them to a 1D distribution.
#[inline(always)]
pub fn evaluate4<B: Binning, D: GenericDistribution1D>(
    p: &mut D,
    binning: &B,
    a: &CompactCoordinates,
    b: &CompactCoordinates,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_block::<4>(a, b, i, j);
    for r in res {
        p.add(binning.bin(r.distance as f64), r.distance as f64, factor * r.weight as f64);
    }
}

/// Evaluates eight consecutive pairs and adds them to a 1D distribution.
#[inline(always)]
pub fn evaluate8<B: Binning, D: GenericDistribution1D>(
    p: &mut D,
    binning: &B,
    a: &CompactCoordinates,
    b: &CompactCoordinates,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_block::<8>(a, b, i, j);
    for r in res {
        p.add(binning.bin(r.distance as f64), r.distance as f64, factor * r.weight as f64);
    }
}

/// Evaluates one pair for a class-resolved 2D distribution; the class axis
/// carries the class of atom `i`.
#[inline(always)]
pub fn evaluate1_ff2<B: Binning, D: GenericDistribution2D>(
    p: &mut D,
    binning: &B,
    a: &CompactCoordinatesFF,
    b: &CompactCoordinates,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_pair(&a[i], &b[j]);
    p.add(
        a.class(i),
        binning.bin(res.distance as f64),
        res.distance as f64,
        factor * res.weight as f64,
    );
}

/// Evaluates eight consecutive pairs for a class-resolved 2D distribution.
#[inline(always)]
pub fn evaluate8_ff2<B: Binning, D: GenericDistribution2D>(
    p: &mut D,
    binning: &B,
    a: &CompactCoordinatesFF,
    b: &CompactCoordinates,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_block::<8>(a.coordinates(), b, i, j);
    for r in res {
        p.add(
            a.class(i),
            binning.bin(r.distance as f64),
            r.distance as f64,
            factor * r.weight as f64,
        );
    }
}

/// Evaluates one pair for the one-side-class-resolved model, crediting the
/// class of both endpoints with the pair weight.
#[inline(always)]
pub fn evaluate1_ff2_sym<B: Binning, D: GenericDistribution2D>(
    p: &mut D,
    binning: &B,
    a: &CompactCoordinatesFF,
    b: &CompactCoordinatesFF,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_pair(&a[i], &b[j]);
    let bin = binning.bin(res.distance as f64);
    let dist = res.distance as f64;
    let w = factor * res.weight as f64;
    p.add(a.class(i), bin, dist, w);
    p.add(b.class(j), bin, dist, w);
}

/// Evaluates eight consecutive pairs, crediting both endpoint classes.
#[inline(always)]
pub fn evaluate8_ff2_sym<B: Binning, D: GenericDistribution2D>(
    p: &mut D,
    binning: &B,
    a: &CompactCoordinatesFF,
    b: &CompactCoordinatesFF,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_block::<8>(a.coordinates(), b.coordinates(), i, j);
    for (k, r) in res.iter().enumerate() {
        let bin = binning.bin(r.distance as f64);
        let dist = r.distance as f64;
        let w = factor * r.weight as f64;
        p.add(a.class(i), bin, dist, w);
        p.add(b.class(j + k), bin, dist, w);
    }
}

/// Evaluates eight consecutive pairs for the class-pair-resolved 3D model.
#[inline(always)]
pub fn evaluate8_ff3<B: Binning, D: GenericDistribution3D>(
    p_aa: &mut D,
    p_ax: &mut D,
    p_xx: &mut D,
    binning: &B,
    a: &CompactCoordinatesFF,
    b: &CompactCoordinatesFF,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_block::<8>(a.coordinates(), b.coordinates(), i, j);
    for (k, r) in res.iter().enumerate() {
        let bin = binning.bin(r.distance as f64);
        let dist = r.distance as f64;
        let (ci, cj) = (a.class(i), b.class(j + k));
        p_aa.add(ci, cj, bin, dist, factor * r.weight as f64);
        p_ax.add(ci, cj, bin, dist, factor * (a[i].w + b[j + k].w) as f64);
        p_xx.add(ci, cj, bin, dist, factor);
    }
}

/// Evaluates one pair for the class-pair-resolved atom-atom distribution only.
#[inline(always)]
pub fn evaluate1_ff3_aa<B: Binning, D: GenericDistribution3D>(
    p_aa: &mut D,
    binning: &B,
    a: &CompactCoordinatesFF,
    b: &CompactCoordinatesFF,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_pair(&a[i], &b[j]);
    p_aa.add(
        a.class(i),
        b.class(j),
        binning.bin(res.distance as f64),
        res.distance as f64,
        factor * res.weight as f64,
    );
}

/// Evaluates eight consecutive pairs for the atom-atom 3D distribution only.
#[inline(always)]
pub fn evaluate8_ff3_aa<B: Binning, D: GenericDistribution3D>(
    p_aa: &mut D,
    binning: &B,
    a: &CompactCoordinatesFF,
    b: &CompactCoordinatesFF,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_block::<8>(a.coordinates(), b.coordinates(), i, j);
    for (k, r) in res.iter().enumerate() {
        p_aa.add(
            a.class(i),
            b.class(j + k),
            binning.bin(r.distance as f64),
            r.distance as f64,
            factor * r.weight as f64,
        );
    }
}

/// Evaluates one water-atom pair, feeding both the atom-water and the
/// water-exv partials; the excluded-volume pseudo-atom sits at the atom
/// position with unit weight.
#[inline(always)]
pub fn evaluate1_aw<B: Binning, D: GenericDistribution2D>(
    p_aw: &mut D,
    p_wx: &mut D,
    binning: &B,
    waters: &CompactCoordinates,
    atoms: &CompactCoordinatesFF,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_pair(&waters[i], &atoms[j]);
    let bin = binning.bin(res.distance as f64);
    let dist = res.distance as f64;
    p_aw.add(atoms.class(j), bin, dist, factor * res.weight as f64);
    p_wx.add(atoms.class(j), bin, dist, factor * waters[i].w as f64);
}

/// Evaluates eight consecutive water-atom pairs.
#[inline(always)]
pub fn evaluate8_aw<B: Binning, D: GenericDistribution2D>(
    p_aw: &mut D,
    p_wx: &mut D,
    binning: &B,
    waters: &CompactCoordinates,
    atoms: &CompactCoordinatesFF,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_block::<8>(waters, atoms.coordinates(), i, j);
    for (k, r) in res.iter().enumerate() {
        let bin = binning.bin(r.distance as f64);
        let dist = r.distance as f64;
        p_aw.add(atoms.class(j + k), bin, dist, factor * r.weight as f64);
        p_wx.add(atoms.class(j + k), bin, dist, factor * waters[i].w as f64);
    }
}

/// Evaluates one pair for the class-pair-resolved 3D distributions.
///
/// The same distance feeds three histograms: atom-atom with the pair weight,
/// atom-exv with the summed single weights, and exv-exv with the bare pair
/// multiplicity; the excluded-volume pseudo-atoms sit at the atom positions.
#[inline(always)]
pub fn evaluate1_ff3<B: Binning, D: GenericDistribution3D>(
    p_aa: &mut D,
    p_ax: &mut D,
    p_xx: &mut D,
    binning: &B,
    a: &CompactCoordinatesFF,
    b: &CompactCoordinatesFF,
    i: usize,
    j: usize,
    factor: f64,
) {
    let res = evaluate_pair(&a[i], &b[j]);
    let bin = binning.bin(res.distance as f64);
    let dist = res.distance as f64;
    let (ci, cj) = (a.class(i), b.class(j));
    p_aa.add(ci, cj, bin, dist, factor * res.weight as f64);
    p_ax.add(ci, cj, bin, dist, factor * (a[i].w + b[j].w) as f64);
    p_xx.add(ci, cj, bin, dist, factor);
}
