use log::debug;
use saxskit_data::{Molecule, StateManager};

use crate::axis::{Binning, UniformBinning};
use crate::compact::CompactCoordinates;
use crate::composite::CompositeDistanceHistogram;
use crate::distance_histogram::DistanceHistogram;
use crate::distribution::GenericDistribution1D;
use crate::manager::{accumulate_cross, accumulate_self};

/// Incremental histogram manager built on per-body partials.
///
/// The total PDDF of a molecule with B bodies decomposes into B
/// self-partials, B·(B-1)/2 body-body cross partials, B hydration-body
/// partials and one hydration-hydration partial:
///
/// ```text
/// 4       x
/// 3     x
/// 2   x
/// 1 x
///   1 2 3 4
/// ```
///
/// The self-partials on the diagonal are invariant under rigid body moves
/// and are reused; when body 2 moves, only the cross partials (1,2), (2,3),
/// (2,4) and the hydration partial of body 2 are recomputed. Bodies report
/// their mutations through signallers installed at construction.
///
/// After every [`PartialHistogramManager::recalculate`] the assembled
/// composite matches a from-scratch computation.
pub struct PartialHistogramManager<D: GenericDistribution1D> {
    state: StateManager,
    binning: UniformBinning,
    coords: Vec<CompactCoordinates>,
    coords_w: CompactCoordinates,
    partials_self: Vec<D>,
    partials_pp: Vec<Vec<D>>, // upper triangle, indexed [i][j - i - 1] for i < j
    partials_hp: Vec<D>,
    partials_hh: D,
}

impl<D: GenericDistribution1D> PartialHistogramManager<D> {
    /// Creates a manager for a molecule and installs a signaller in each body.
    ///
    /// All partials start dirty; the first [`recalculate`](Self::recalculate)
    /// performs the full computation.
    pub fn new(molecule: &mut Molecule) -> Self {
        let size = molecule.size_bodies();
        let symmetry_sizes: Vec<usize> =
            molecule.bodies().iter().map(|b| b.symmetries().len()).collect();
        let state = StateManager::with_symmetries(size, &symmetry_sizes);
        for (i, body) in molecule.bodies_mut().iter_mut().enumerate() {
            body.set_signaller(state.probe(i));
        }

        let binning = UniformBinning::default_d();
        let empty = || D::with_bins(binning.bins());
        return PartialHistogramManager {
            state,
            coords: vec![CompactCoordinates::default(); size],
            coords_w: CompactCoordinates::default(),
            partials_self: (0..size).map(|_| empty()).collect(),
            partials_pp: (0..size).map(|i| (i + 1..size).map(|_| empty()).collect()).collect(),
            partials_hp: (0..size).map(|_| empty()).collect(),
            partials_hh: empty(),
            binning,
        };
    }

    /// The state manager tracking body mutations
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Signals that the hydration layer was regenerated
    pub fn signal_modified_hydration_layer(&self) {
        self.state.modified_hydration_layer();
    }

    fn cross_slot(&mut self, i: usize, j: usize) -> &mut D {
        debug_assert!(i < j, "cross partials are stored for i < j");
        &mut self.partials_pp[i][j - i - 1]
    }

    /// Rebuilds the partials invalidated by the tracked mutations, then
    /// assembles the composite.
    ///
    /// The invalidation rules follow the body flags: an internal
    /// modification rebuilds the body's self-partial and every partial it
    /// participates in; an external (rigid-move) modification spares the
    /// self-partial; a hydration modification rebuilds all water partials.
    pub fn recalculate(&mut self, molecule: &Molecule) -> CompositeDistanceHistogram {
        let size = self.state.size();
        let internally: Vec<bool> = (0..size)
            .map(|i| {
                self.state.is_internally_modified(i)
                    || (0..molecule.body(i).symmetries().len())
                        .any(|j| self.state.is_modified_symmetry(i, j))
            })
            .collect();
        let externally: Vec<bool> =
            (0..size).map(|i| self.state.is_externally_modified(i)).collect();
        // a moved body drags its own waters along, so any mutation of a
        // water-carrying body also invalidates the hydration partials
        let hydration = self.state.is_modified_hydration()
            || (0..size).any(|i| {
                (internally[i] || externally[i]) && !molecule.body(i).waters().is_empty()
            });

        // refresh the compact coordinates of every touched body
        for i in 0..size {
            if internally[i] || externally[i] {
                self.coords[i] = CompactCoordinates::from_body_expanded(molecule.body(i));
            }
        }
        if hydration {
            self.coords_w = CompactCoordinates::from_atoms(&molecule.waters());
        }

        for i in 0..size {
            if internally[i] {
                debug!("rebuilding self-partial of body {i}");
                self.partials_self[i] = accumulate_self(&self.binning, &self.coords[i]);
            }
        }

        for i in 0..size {
            for j in i + 1..size {
                if internally[i] || internally[j] || externally[i] || externally[j] {
                    let p = accumulate_cross(&self.binning, &self.coords[i], &self.coords[j]);
                    *self.cross_slot(i, j) = p;
                }
            }
        }

        for i in 0..size {
            if internally[i] || externally[i] || hydration {
                self.partials_hp[i] = if self.coords_w.is_empty() {
                    D::with_bins(self.binning.bins())
                } else {
                    accumulate_cross(&self.binning, &self.coords[i], &self.coords_w)
                };
            }
        }

        if hydration {
            self.partials_hh = if self.coords_w.is_empty() {
                D::with_bins(self.binning.bins())
            } else {
                accumulate_self(&self.binning, &self.coords_w)
            };
        }

        self.state.reset_to_false();
        return self.assemble();
    }

    /// Assembles the composite from the current partials
    fn assemble(&self) -> CompositeDistanceHistogram {
        let size = self.state.size();
        let mut p_aa = D::with_bins(self.binning.bins());
        for p in &self.partials_self {
            p_aa.merge(p);
        }
        for i in 0..size {
            for p in &self.partials_pp[i] {
                p_aa.merge(p);
            }
        }

        let mut p_aw = D::with_bins(self.binning.bins());
        for p in &self.partials_hp {
            p_aw.merge(p);
        }
        let p_ww = self.partials_hh.clone();

        let mut p_tot = p_aa.clone();
        p_tot.merge(&p_aw);
        p_tot.merge(&p_ww);

        return CompositeDistanceHistogram::new(&p_aa, &p_aw, &p_ww, &p_tot, self.binning.width());
    }

    /// Recalculates and returns only the total PDDF
    pub fn calculate(&mut self, molecule: &Molecule) -> DistanceHistogram {
        use crate::composite::CompositeHistogram;
        self.recalculate(molecule).total().clone()
    }
}
