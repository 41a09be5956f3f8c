use std::marker::PhantomData;

use saxskit_data::Molecule;

use crate::axis::{Binning, UniformBinning};
use crate::compact::CompactCoordinates;
use crate::composite::CompositeDistanceHistogram;
use crate::distance_histogram::DistanceHistogram;
use crate::distribution::GenericDistribution1D;
use crate::manager::{accumulate_cross, accumulate_self};

/// The plain histogram manager: produces the total 1D PDDF and the
/// atom-atom / atom-water / water-water split, without form factors.
///
/// Monomorphized over the distribution type and the binning, so both the
/// weighted-bins and the variable-bin-widths variants are selected at
/// compile time:
///
/// ```
/// use saxskit_data::{Atom, FormFactorClass, Molecule};
/// use saxskit_hist::{Distribution1D, HistogramManager};
/// use saxskit_numerical::Vec3;
/// let molecule = Molecule::from_atoms(vec![
///     Atom::new(Vec3::new(0.0, 0.0, 0.0), 1.0, FormFactorClass::H),
///     Atom::new(Vec3::new(0.0, 0.0, 1.0), 1.0, FormFactorClass::H),
/// ]).unwrap();
/// let manager = HistogramManager::<Distribution1D>::new(&molecule);
/// let hist = manager.calculate();
/// assert_eq!(hist.counts()[10], 2.0);  // the 1 Å pair, both orders
/// assert_eq!(hist.counts()[0], 2.0);   // self-correlation
/// ```
pub struct HistogramManager<'a, D: GenericDistribution1D, B: Binning = UniformBinning> {
    molecule: &'a Molecule,
    binning: B,
    _marker: PhantomData<D>,
}

impl<'a, D: GenericDistribution1D> HistogramManager<'a, D, UniformBinning> {
    pub fn new(molecule: &'a Molecule) -> Self {
        HistogramManager { molecule, binning: UniformBinning::default_d(), _marker: PhantomData }
    }
}

impl<'a, D: GenericDistribution1D, B: Binning> HistogramManager<'a, D, B> {
    /// Creates a manager with an explicit binning, uniform or variable
    pub fn with_binning(molecule: &'a Molecule, binning: B) -> Self {
        HistogramManager { molecule, binning, _marker: PhantomData }
    }

    /// All scatterers of the molecule, symmetry copies included
    fn atoms(&self) -> CompactCoordinates {
        CompactCoordinates::from_molecule_expanded(self.molecule)
    }

    fn waters(&self) -> CompactCoordinates {
        CompactCoordinates::from_atoms(&self.molecule.waters())
    }

    /// The total PDDF over all scatterers, atoms and waters alike
    pub fn calculate(&self) -> DistanceHistogram {
        let atoms = self.atoms();
        let waters = self.waters();

        let mut p_tot: D = accumulate_self(&self.binning, &atoms);
        if !waters.is_empty() {
            let p_ww: D = accumulate_self(&self.binning, &waters);
            let p_aw: D = accumulate_cross(&self.binning, &atoms, &waters);
            p_tot.merge(&p_ww);
            p_tot.merge(&p_aw);
        }
        return DistanceHistogram::from_distribution_binned(&p_tot, &self.binning);
    }

    /// The composite PDDF carrying the atom-atom, atom-water and water-water partials
    pub fn calculate_all(&self) -> CompositeDistanceHistogram {
        let atoms = self.atoms();
        let waters = self.waters();

        let p_aa: D = accumulate_self(&self.binning, &atoms);
        let (p_aw, p_ww) = if waters.is_empty() {
            (D::with_bins(self.binning.bins()), D::with_bins(self.binning.bins()))
        } else {
            (
                accumulate_cross(&self.binning, &atoms, &waters),
                accumulate_self(&self.binning, &waters),
            )
        };

        let mut p_tot = p_aa.clone();
        p_tot.merge(&p_aw);
        p_tot.merge(&p_ww);

        return CompositeDistanceHistogram::new_binned(&p_aa, &p_aw, &p_ww, &p_tot, &self.binning);
    }
}
