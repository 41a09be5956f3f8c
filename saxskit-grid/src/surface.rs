use saxskit_numerical::Vec3;

use crate::{CellState, Grid};

/// Excluded-volume pseudo-atom positions enumerated from a grid.
#[derive(Clone, Debug, Default)]
pub struct GridExcludedVolume {
    /// points in the particle interior
    pub interior: Vec<Vec3>,
    /// points on the particle surface; empty unless surface detection was requested
    pub surface: Vec<Vec3>,
}

impl GridExcludedVolume {
    /// The total number of excluded-volume points
    pub fn len(&self) -> usize {
        self.interior.len() + self.surface.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interior.is_empty() && self.surface.is_empty()
    }
}

// Probe directions: the six axes and the eight cube diagonals.
const DIRECTIONS: [[f64; 3]; 14] = [
    [1.0, 0.0, 0.0], [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0], [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0], [0.0, 0.0, -1.0],
    [1.0, 1.0, 1.0], [1.0, 1.0, -1.0],
    [1.0, -1.0, 1.0], [1.0, -1.0, -1.0],
    [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0],
];

// Occlusion contribution of a probe blocked at radius r, 2r, 3r or 4r.
const RADIUS_SCORES: [i32; 4] = [4, 3, 2, 1];

// Cells scoring below this are exposed enough to count as surface.
const SURFACE_THRESHOLD: i32 = 30;

struct RadialProbes {
    // per direction, per radius, integer cell offsets
    offsets: Vec<[[i64; 3]; 4]>,
}

impl RadialProbes {
    fn new(grid: &Grid) -> RadialProbes {
        let radii = [grid.width(), 2.0 * grid.width(), 3.0 * grid.width(), 4.0 * grid.width()];
        let mut offsets = Vec::with_capacity(DIRECTIONS.len());
        for dir in DIRECTIONS {
            let norm = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
            let mut per_radius = [[0i64; 3]; 4];
            for (ri, r) in radii.iter().enumerate() {
                for d in 0..3 {
                    per_radius[ri][d] = (dir[d] / norm * r / grid.width()).round() as i64;
                }
            }
            offsets.push(per_radius);
        }
        return RadialProbes { offsets }
    }

    /// Occlusion score of a cell: the more probes hit filled cells close by,
    /// the higher the score.
    fn occlusion(&self, grid: &Grid, i: usize, j: usize, k: usize) -> i32 {
        let mut score = 0;
        for probes in &self.offsets {
            for (ri, offset) in probes.iter().enumerate() {
                let (pi, pj, pk) =
                    (i as i64 + offset[0], j as i64 + offset[1], k as i64 + offset[2]);
                if !grid.is_empty_or_water(pi, pj, pk) {
                    score += RADIUS_SCORES[ri];
                    break;
                }
            }
        }
        return score;
    }
}

/// Enumerates the excluded-volume pseudo-atom positions of a grid.
///
/// Cells covered by the particle (interior volume or van-der-Waals balls)
/// are visited on a stride of one excluded-volume diameter; when
/// `detect_surface` is set, radial line probes split them into surface and
/// interior points, otherwise everything lands in `interior`.
pub fn excluded_volume(grid: &Grid, detect_surface: bool) -> GridExcludedVolume {
    let stride = ((2.0 * grid.config().exv_radius / grid.width()).round() as usize).max(1);
    let buffer = (2.0 / grid.width()).ceil() as usize;
    let probes = RadialProbes::new(grid);

    let (vmin, vmax) = grid.bounding_box_index();
    let bins = grid.bins();
    let mut vol = GridExcludedVolume::default();

    let lo = |v: usize| v.saturating_sub(buffer);
    let hi = |v: usize, axis: usize| (v + buffer + 1).min(bins[axis]);

    let mut i = lo(vmin[0]);
    while i < hi(vmax[0], 0) {
        let mut j = lo(vmin[1]);
        while j < hi(vmax[1], 1) {
            let mut k = lo(vmin[2]);
            while k < hi(vmax[2], 2) {
                match grid.state(i, j, k) {
                    CellState::Volume | CellState::AtomArea | CellState::AtomCenter => {
                        if detect_surface && probes.occlusion(grid, i, j, k) < SURFACE_THRESHOLD {
                            vol.surface.push(grid.to_xyz(i, j, k));
                        } else {
                            vol.interior.push(grid.to_xyz(i, j, k));
                        }
                    }
                    _ => {}
                }
                k += stride;
            }
            j += stride;
        }
        i += stride;
    }

    return vol;
}
