use std::marker::PhantomData;

use saxskit_data::{Molecule, FF_CLASS_COUNT};

use crate::axis::{Binning, UniformBinning};
use crate::compact::{evaluate1_ff2_sym, evaluate8_ff2_sym, CompactCoordinates, CompactCoordinatesFF};
use crate::composite::CompositeDistanceHistogramFFAvg;
use crate::distribution::{GenericDistribution1D, GenericDistribution2D};
use crate::manager::{accumulate_cross, accumulate_self, parallel_tiles};

/// Histogram manager with averaged form factors: the atom-atom partial is
/// resolved by the class of each endpoint, waters stay unresolved.
pub struct HistogramManagerFFAvg<'a, D1, D2>
where
    D1: GenericDistribution1D,
    D2: GenericDistribution2D,
{
    molecule: &'a Molecule,
    binning: UniformBinning,
    _marker: PhantomData<(D1, D2)>,
}

impl<'a, D1, D2> HistogramManagerFFAvg<'a, D1, D2>
where
    D1: GenericDistribution1D,
    D2: GenericDistribution2D,
{
    pub fn new(molecule: &'a Molecule) -> Self {
        HistogramManagerFFAvg { molecule, binning: UniformBinning::default_d(), _marker: PhantomData }
    }

    /// The class-resolved atom-atom partial over all atoms, both endpoint
    /// classes credited per pair.
    fn accumulate_aa(&self, atoms: &CompactCoordinatesFF) -> D2 {
        let n = atoms.size();
        let binning = &self.binning;
        let mut p: D2 = parallel_tiles(
            n,
            || D2::with_bins(binning.bins()),
            |p, rows| {
                for i in rows {
                    let mut j = i + 1;
                    while j + 7 < n {
                        evaluate8_ff2_sym(p, binning, atoms, atoms, i, j, 1.0);
                        j += 8;
                    }
                    while j < n {
                        evaluate1_ff2_sym(p, binning, atoms, atoms, i, j, 1.0);
                        j += 1;
                    }
                }
            },
            |a, b| a.merge(&b),
        );
        // self-correlation, once per atom in its own class row
        for i in 0..n {
            p.add_count(atoms.class(i), 0, (atoms[i].w as f64).powi(2));
        }
        return p;
    }

    /// The total PDDF only
    pub fn calculate(&self) -> crate::DistanceHistogram {
        use crate::composite::CompositeHistogram;
        self.calculate_all().total().clone()
    }

    /// The composite PDDF with per-class atom-atom resolution
    pub fn calculate_all(&self) -> CompositeDistanceHistogramFFAvg {
        let atoms = CompactCoordinatesFF::from_molecule_expanded(self.molecule);
        let waters = CompactCoordinates::from_atoms(&self.molecule.waters());

        let p_aa = self.accumulate_aa(&atoms);
        let (p_aw, p_ww) = if waters.is_empty() {
            (D1::with_bins(self.binning.bins()), D1::with_bins(self.binning.bins()))
        } else {
            (
                accumulate_cross(&self.binning, atoms.coordinates(), &waters),
                accumulate_self(&self.binning, &waters),
            )
        };

        let mut class_weights = [0.0; FF_CLASS_COUNT];
        for i in 0..atoms.size() {
            class_weights[atoms.class(i)] += atoms[i].w as f64;
        }

        let mut p_tot = D1::with_bins(self.binning.bins());
        let projected = p_aa.project();
        for (bin, &v) in projected.iter().enumerate() {
            p_tot.add_count(bin, v);
        }
        p_tot.merge(&p_aw);
        p_tot.merge(&p_ww);

        return CompositeDistanceHistogramFFAvg::new(
            &p_aa,
            &p_aw,
            &p_ww,
            &p_tot,
            class_weights,
            self.binning.width(),
        );
    }
}
