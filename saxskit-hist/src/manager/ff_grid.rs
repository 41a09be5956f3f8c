use std::marker::PhantomData;

use saxskit_data::Molecule;
use saxskit_grid::{excluded_volume, Grid, GridConfig};

use crate::axis::{Binning, UniformBinning};
use crate::compact::{
    evaluate1_ff2, evaluate8_ff2, CompactCoordinates, CompactCoordinatesFF,
};
use crate::composite::{
    CompositeDistanceHistogramFFGrid, CompositeDistanceHistogramFFGridSurface, GridExvPartials,
    GridSurfaceExvPartials,
};
use crate::distribution::{GenericDistribution1D, GenericDistribution2D, GenericDistribution3D};
use crate::manager::ff_explicit::atomic_partials;
use crate::manager::{accumulate_cross, accumulate_self, parallel_tiles};

/// Histogram manager modelling the excluded volume with a space-filling grid
/// of dummy scatterers.
///
/// The molecule is stamped into an occupancy grid; the covered cells,
/// enumerated on a stride of one pseudo-atom diameter, become the
/// excluded-volume point set. Atom-grid, grid-grid and water-grid partials
/// are accumulated against that set.
pub struct HistogramManagerFFGrid<'a, D1, D2, D3>
where
    D1: GenericDistribution1D,
    D2: GenericDistribution2D,
    D3: GenericDistribution3D,
{
    molecule: &'a Molecule,
    binning: UniformBinning,
    grid_config: GridConfig,
    _marker: PhantomData<(D1, D2, D3)>,
}

/// The atom-grid partial: class-resolved on the atom side.
fn accumulate_ax<D2: GenericDistribution2D>(
    binning: &UniformBinning,
    atoms: &CompactCoordinatesFF,
    points: &CompactCoordinates,
) -> D2 {
    let n_points = points.size();
    let n_atoms = atoms.size();
    if n_points == 0 {
        return D2::with_bins(binning.bins());
    }
    return parallel_tiles(
        n_atoms,
        || D2::with_bins(binning.bins()),
        |p, rows| {
            for i in rows {
                let mut j = 0;
                while j + 7 < n_points {
                    evaluate8_ff2(p, binning, atoms, points, i, j, 2.0);
                    j += 8;
                }
                while j < n_points {
                    evaluate1_ff2(p, binning, atoms, points, i, j, 2.0);
                    j += 1;
                }
            }
        },
        |a, b| a.merge(&b),
    );
}

impl<'a, D1, D2, D3> HistogramManagerFFGrid<'a, D1, D2, D3>
where
    D1: GenericDistribution1D,
    D2: GenericDistribution2D,
    D3: GenericDistribution3D,
{
    pub fn new(molecule: &'a Molecule) -> Self {
        HistogramManagerFFGrid {
            molecule,
            binning: UniformBinning::default_d(),
            grid_config: GridConfig::default(),
            _marker: PhantomData,
        }
    }

    pub fn with_grid_config(molecule: &'a Molecule, grid_config: GridConfig) -> Self {
        HistogramManagerFFGrid {
            molecule,
            binning: UniformBinning::default_d(),
            grid_config,
            _marker: PhantomData,
        }
    }

    /// The total PDDF only
    pub fn calculate(&self) -> crate::DistanceHistogram {
        use crate::composite::CompositeHistogram;
        self.calculate_all().total().clone()
    }

    /// The composite PDDF with grid-based excluded volume
    pub fn calculate_all(&self) -> CompositeDistanceHistogramFFGrid {
        let binning = &self.binning;
        let atoms = CompactCoordinatesFF::from_molecule_expanded(self.molecule);
        let waters = CompactCoordinates::from_atoms(&self.molecule.waters());

        let grid = Grid::from_molecule(self.molecule, self.grid_config.clone());
        let exv = excluded_volume(&grid, false);
        let points = CompactCoordinates::from_positions(&exv.interior, 1.0);

        let (p_aa, p_aw, p_ww, p_tot) =
            atomic_partials::<D1, D2, D3>(binning, &atoms, &waters);

        let p_xx: D1 = accumulate_self(binning, &points);
        let p_wx: D1 = if waters.is_empty() || points.is_empty() {
            D1::with_bins(binning.bins())
        } else {
            accumulate_cross(binning, &points, &waters)
        };
        let p_ax: D2 = accumulate_ax(binning, &atoms, &points);

        let point_volume = (2.0 * self.grid_config.exv_radius).powi(3);
        let r0 = 2.0 * self.grid_config.exv_radius;

        let exv_partials = GridExvPartials { ax: p_ax, xx: p_xx, wx: p_wx };
        return CompositeDistanceHistogramFFGrid::new(
            &p_aa,
            &p_aw,
            &p_ww,
            &p_tot,
            &exv_partials,
            point_volume,
            r0,
            binning.width(),
        );
    }
}

/// Grid-based histogram manager that splits the excluded-volume points into
/// surface and interior sets, so the surface contribution can be scaled
/// independently during fitting.
pub struct HistogramManagerFFGridSurface<'a, D1, D2, D3>
where
    D1: GenericDistribution1D,
    D2: GenericDistribution2D,
    D3: GenericDistribution3D,
{
    molecule: &'a Molecule,
    binning: UniformBinning,
    grid_config: GridConfig,
    _marker: PhantomData<(D1, D2, D3)>,
}

impl<'a, D1, D2, D3> HistogramManagerFFGridSurface<'a, D1, D2, D3>
where
    D1: GenericDistribution1D,
    D2: GenericDistribution2D,
    D3: GenericDistribution3D,
{
    pub fn new(molecule: &'a Molecule) -> Self {
        HistogramManagerFFGridSurface {
            molecule,
            binning: UniformBinning::default_d(),
            grid_config: GridConfig::default(),
            _marker: PhantomData,
        }
    }

    /// The total PDDF only
    pub fn calculate(&self) -> crate::DistanceHistogram {
        use crate::composite::CompositeHistogram;
        self.calculate_all().total().clone()
    }

    /// The composite PDDF with surface-resolved grid excluded volume
    pub fn calculate_all(&self) -> CompositeDistanceHistogramFFGridSurface {
        let binning = &self.binning;
        let atoms = CompactCoordinatesFF::from_molecule_expanded(self.molecule);
        let waters = CompactCoordinates::from_atoms(&self.molecule.waters());

        let grid = Grid::from_molecule(self.molecule, self.grid_config.clone());
        let exv = excluded_volume(&grid, true);
        let interior = CompactCoordinates::from_positions(&exv.interior, 1.0);
        let surface = CompactCoordinates::from_positions(&exv.surface, 1.0);

        let (p_aa, p_aw, p_ww, p_tot) =
            atomic_partials::<D1, D2, D3>(binning, &atoms, &waters);

        let bins = binning.bins();
        let empty = || D1::with_bins(bins);
        let cross_or_empty = |a: &CompactCoordinates, b: &CompactCoordinates| -> D1 {
            if a.is_empty() || b.is_empty() {
                empty()
            } else {
                accumulate_cross(binning, a, b)
            }
        };

        let exv_partials = GridSurfaceExvPartials {
            ax_interior: accumulate_ax(binning, &atoms, &interior),
            ax_surface: accumulate_ax(binning, &atoms, &surface),
            xx_ii: accumulate_self(binning, &interior),
            xx_is: cross_or_empty(&interior, &surface),
            xx_ss: accumulate_self(binning, &surface),
            wx_interior: cross_or_empty(&interior, &waters),
            wx_surface: cross_or_empty(&surface, &waters),
        };

        let point_volume = (2.0 * self.grid_config.exv_radius).powi(3);

        return CompositeDistanceHistogramFFGridSurface::new(
            &p_aa,
            &p_aw,
            &p_ww,
            &p_tot,
            &exv_partials,
            point_volume,
            binning.width(),
        );
    }
}
