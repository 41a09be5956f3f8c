use std::marker::PhantomData;

use saxskit_data::Molecule;

use crate::axis::{Binning, UniformBinning};
use crate::compact::{
    evaluate1_aw, evaluate1_ff2, evaluate1_ff3, evaluate1_ff3_aa, evaluate8_aw, evaluate8_ff2,
    evaluate8_ff3, evaluate8_ff3_aa, CompactCoordinates, CompactCoordinatesFF,
};
use crate::composite::CompositeDistanceHistogramFFExplicit;
use crate::distribution::{GenericDistribution1D, GenericDistribution2D, GenericDistribution3D};
use crate::manager::{accumulate_self, parallel_tiles};

/// Accumulates the atomic partials shared by the explicit and grid-based
/// managers: class-pair atom-atom, class-resolved atom-water, water-water,
/// and their total over the real scatterers.
pub(crate) fn atomic_partials<D1, D2, D3>(
    binning: &UniformBinning,
    atoms: &CompactCoordinatesFF,
    waters: &CompactCoordinates,
) -> (D3, D2, D1, D1)
where
    D1: GenericDistribution1D,
    D2: GenericDistribution2D,
    D3: GenericDistribution3D,
{
    let bins = binning.bins();
    let n = atoms.size();

    let mut p_aa: D3 = parallel_tiles(
        n,
        || D3::with_bins(bins),
        |p, rows| {
            for i in rows {
                let mut j = i + 1;
                while j + 7 < n {
                    evaluate8_ff3_aa(p, binning, atoms, atoms, i, j, 2.0);
                    j += 8;
                }
                while j < n {
                    evaluate1_ff3_aa(p, binning, atoms, atoms, i, j, 2.0);
                    j += 1;
                }
            }
        },
        |a, b| a.merge(&b),
    );
    for i in 0..n {
        let c = atoms.class(i);
        p_aa.add_count(c, c, 0, (atoms[i].w as f64).powi(2));
    }

    let n_w = waters.size();
    let p_aw: D2 = parallel_tiles(
        n,
        || D2::with_bins(bins),
        |p, rows| {
            for i in rows {
                let mut j = 0;
                while j + 7 < n_w {
                    evaluate8_ff2(p, binning, atoms, waters, i, j, 2.0);
                    j += 8;
                }
                while j < n_w {
                    evaluate1_ff2(p, binning, atoms, waters, i, j, 2.0);
                    j += 1;
                }
            }
        },
        |a, b| a.merge(&b),
    );

    let p_ww: D1 =
        if waters.is_empty() { D1::with_bins(bins) } else { accumulate_self(binning, waters) };

    let mut p_tot = D1::with_bins(bins);
    for (bin, v) in p_aa.project().into_iter().enumerate() {
        p_tot.add_count(bin, v);
    }
    for (bin, v) in p_aw.project().into_iter().enumerate() {
        p_tot.add_count(bin, v);
    }
    for (bin, &v) in p_ww.counts().iter().enumerate() {
        p_tot.add_count(bin, v);
    }

    return (p_aa, p_aw, p_ww, p_tot);
}

/// Histogram manager with full per-class-pair form-factor resolution.
///
/// One pass over the atom pairs feeds three class-pair distributions at
/// once: atom-atom, atom-exv and exv-exv, with the excluded-volume
/// pseudo-atoms sitting at the atom positions. The water loop feeds the
/// atom-water and water-exv partials the same way.
pub struct HistogramManagerFFExplicit<'a, D1, D2, D3>
where
    D1: GenericDistribution1D,
    D2: GenericDistribution2D,
    D3: GenericDistribution3D,
{
    molecule: &'a Molecule,
    binning: UniformBinning,
    _marker: PhantomData<(D1, D2, D3)>,
}

impl<'a, D1, D2, D3> HistogramManagerFFExplicit<'a, D1, D2, D3>
where
    D1: GenericDistribution1D,
    D2: GenericDistribution2D,
    D3: GenericDistribution3D,
{
    pub fn new(molecule: &'a Molecule) -> Self {
        HistogramManagerFFExplicit {
            molecule,
            binning: UniformBinning::default_d(),
            _marker: PhantomData,
        }
    }

    /// The total PDDF only
    pub fn calculate(&self) -> crate::DistanceHistogram {
        use crate::composite::CompositeHistogram;
        self.calculate_all().total().clone()
    }

    /// The composite PDDF with explicit form factors for every class pair
    pub fn calculate_all(&self) -> CompositeDistanceHistogramFFExplicit {
        let atoms = CompactCoordinatesFF::from_molecule_expanded(self.molecule);
        let waters = CompactCoordinates::from_atoms(&self.molecule.waters());
        let binning = &self.binning;
        let bins = binning.bins();
        let n = atoms.size();

        // one pass over atom pairs feeds aa, ax and xx
        let (mut p_aa, mut p_ax, mut p_xx) = parallel_tiles(
            n,
            || (D3::with_bins(bins), D3::with_bins(bins), D3::with_bins(bins)),
            |(p_aa, p_ax, p_xx), rows| {
                for i in rows {
                    let mut j = i + 1;
                    while j + 7 < n {
                        evaluate8_ff3(p_aa, p_ax, p_xx, binning, &atoms, &atoms, i, j, 2.0);
                        j += 8;
                    }
                    while j < n {
                        evaluate1_ff3(p_aa, p_ax, p_xx, binning, &atoms, &atoms, i, j, 2.0);
                        j += 1;
                    }
                }
            },
            |a, b| {
                a.0.merge(&b.0);
                a.1.merge(&b.1);
                a.2.merge(&b.2);
            },
        );

        // self-correlation: the atom with itself and with its own pseudo-atom;
        // the atom-exv term carries both orders of the amplitude product
        for i in 0..n {
            let c = atoms.class(i);
            let w = atoms[i].w as f64;
            p_aa.add_count(c, c, 0, w * w);
            p_ax.add_count(c, c, 0, 2.0 * w);
            p_xx.add_count(c, c, 0, 1.0);
        }

        let n_w = waters.size();
        let (p_aw, p_wx) = parallel_tiles(
            n_w,
            || (D2::with_bins(bins), D2::with_bins(bins)),
            |(p_aw, p_wx), rows| {
                for i in rows {
                    let mut j = 0;
                    while j + 7 < n {
                        evaluate8_aw(p_aw, p_wx, binning, &waters, &atoms, i, j, 2.0);
                        j += 8;
                    }
                    while j < n {
                        evaluate1_aw(p_aw, p_wx, binning, &waters, &atoms, i, j, 2.0);
                        j += 1;
                    }
                }
            },
            |a, b| {
                a.0.merge(&b.0);
                a.1.merge(&b.1);
            },
        );

        let p_ww: D1 = if waters.is_empty() {
            D1::with_bins(bins)
        } else {
            accumulate_self(binning, &waters)
        };

        // the total covers the real scatterers only
        let mut p_tot = D1::with_bins(bins);
        for (bin, v) in p_aa.project().into_iter().enumerate() {
            p_tot.add_count(bin, v);
        }
        for (bin, v) in p_aw.project().into_iter().enumerate() {
            p_tot.add_count(bin, v);
        }
        for (bin, &v) in p_ww.counts().iter().enumerate() {
            p_tot.add_count(bin, v);
        }

        return CompositeDistanceHistogramFFExplicit::new(
            &p_aa,
            &p_ax,
            &p_xx,
            &p_aw,
            &p_wx,
            &p_ww,
            &p_tot,
            binning.width(),
        );
    }
}
