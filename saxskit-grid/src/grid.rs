use log::debug;
use saxskit_data::{Body, Molecule};
use saxskit_numerical::Vec3;

/// Occupancy state of a single grid cell.
///
/// The states are mutually coherent: a cell marked [`CellState::AtomCenter`]
/// implies that the surrounding van-der-Waals ball is marked
/// [`CellState::AtomArea`]; the analogous relation holds for waters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Empty,
    /// interior volume not covered by any atomic ball
    Volume,
    /// inside the van-der-Waals ball of an atom
    AtomArea,
    /// the cell containing an atom position
    AtomCenter,
    /// inside the ball of a placed water
    WaterArea,
    /// the cell containing a water position
    WaterCenter,
}

/// Geometry parameters of a [`Grid`].
#[derive(Clone, Debug)]
pub struct GridConfig {
    /// cell width in Å
    pub width: f64,
    /// van-der-Waals radius stamped around atom centers, in Å
    pub atom_radius: f64,
    /// radius stamped around placed waters, in Å
    pub water_radius: f64,
    /// radius of an excluded-volume pseudo-atom, in Å
    pub exv_radius: f64,
    /// margin added on every side of the molecule's bounding box, in Å
    pub margin: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig { width: 1.0, atom_radius: 2.4, water_radius: 1.5, exv_radius: 1.5, margin: 10.0 }
    }
}

/// Uniform-cell occupancy grid covering a molecule's bounding box.
pub struct Grid {
    config: GridConfig,
    origin: Vec3,
    bins: [usize; 3],
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates an empty grid covering a molecule's bounding box plus the configured margin
    pub fn new(molecule: &Molecule, config: GridConfig) -> Grid {
        let (mut min, mut max) = molecule.bounding_box();
        for k in 0..3 {
            min[k] -= config.margin;
            max[k] += config.margin;
        }
        let bins = [
            ((max.x - min.x) / config.width).ceil() as usize + 1,
            ((max.y - min.y) / config.width).ceil() as usize + 1,
            ((max.z - min.z) / config.width).ceil() as usize + 1,
        ];
        debug!("grid of {}x{}x{} cells, width {} Å", bins[0], bins[1], bins[2], config.width);
        let cells = vec![CellState::Empty; bins[0] * bins[1] * bins[2]];
        return Grid { config, origin: min, bins, cells };
    }

    /// Creates a grid and stamps every body of the molecule into it
    pub fn from_molecule(molecule: &Molecule, config: GridConfig) -> Grid {
        let mut grid = Grid::new(molecule, config);
        for body in molecule.bodies() {
            grid.add_body(body);
        }
        grid.fill_volume();
        return grid;
    }

    /// Geometry parameters of this grid
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Cell width in Å
    pub fn width(&self) -> f64 {
        self.config.width
    }

    /// The number of cells along each axis
    pub fn bins(&self) -> [usize; 3] {
        self.bins
    }

    /// State of the cell at integer coordinates
    pub fn state(&self, i: usize, j: usize, k: usize) -> CellState {
        self.cells[self.flat_index(i, j, k)]
    }

    fn flat_index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.bins[1] + j) * self.bins[2] + k
    }

    /// The position of a cell's center
    pub fn to_xyz(&self, i: usize, j: usize, k: usize) -> Vec3 {
        Vec3::new(
            self.origin.x + (i as f64 + 0.5) * self.config.width,
            self.origin.y + (j as f64 + 0.5) * self.config.width,
            self.origin.z + (k as f64 + 0.5) * self.config.width,
        )
    }

    /// The integer cell coordinates containing a position, or `None` when outside the grid
    pub fn to_bins(&self, pos: &Vec3) -> Option<[usize; 3]> {
        let mut out = [0usize; 3];
        for k in 0..3 {
            let rel = (pos[k] - self.origin[k]) / self.config.width;
            if rel < 0.0 {
                return None;
            }
            let bin = rel.floor() as usize;
            if bin >= self.bins[k] {
                return None;
            }
            out[k] = bin;
        }
        return Some(out);
    }

    /// Whether a cell is empty or covered only by water
    pub fn is_empty_or_water(&self, i: i64, j: i64, k: i64) -> bool {
        if i < 0 || j < 0 || k < 0 {
            return true;
        }
        let (i, j, k) = (i as usize, j as usize, k as usize);
        if i >= self.bins[0] || j >= self.bins[1] || k >= self.bins[2] {
            return true;
        }
        matches!(
            self.state(i, j, k),
            CellState::Empty | CellState::WaterArea | CellState::WaterCenter
        )
    }

    /// Stamps the atoms of a body into the grid: atom centers and their van-der-Waals balls
    pub fn add_body(&mut self, body: &Body) {
        for atom in body.atoms() {
            if let Some([i, j, k]) = self.to_bins(&atom.pos) {
                self.stamp_ball(i, j, k, self.config.atom_radius, CellState::AtomArea);
                let idx = self.flat_index(i, j, k);
                self.cells[idx] = CellState::AtomCenter;
            }
        }
    }

    /// Stamps a water position into the grid
    pub fn add_water(&mut self, pos: &Vec3) {
        if let Some([i, j, k]) = self.to_bins(pos) {
            self.stamp_ball(i, j, k, self.config.water_radius, CellState::WaterArea);
            let idx = self.flat_index(i, j, k);
            self.cells[idx] = CellState::WaterCenter;
        }
    }

    fn stamp_ball(&mut self, ci: usize, cj: usize, ck: usize, radius: f64, state: CellState) {
        let r_bins = (radius / self.config.width).ceil() as i64;
        let r2 = (radius / self.config.width) * (radius / self.config.width);
        for di in -r_bins..=r_bins {
            for dj in -r_bins..=r_bins {
                for dk in -r_bins..=r_bins {
                    if (di * di + dj * dj + dk * dk) as f64 > r2 {
                        continue;
                    }
                    let (i, j, k) = (ci as i64 + di, cj as i64 + dj, ck as i64 + dk);
                    if i < 0 || j < 0 || k < 0 {
                        continue;
                    }
                    let (i, j, k) = (i as usize, j as usize, k as usize);
                    if i >= self.bins[0] || j >= self.bins[1] || k >= self.bins[2] {
                        continue;
                    }
                    let idx = self.flat_index(i, j, k);
                    if self.cells[idx] == CellState::Empty || self.cells[idx] == CellState::Volume {
                        self.cells[idx] = state;
                    }
                }
            }
        }
    }

    /// Marks empty cells fully enclosed by occupied neighbours as interior volume.
    ///
    /// This plugs the small gaps between overlapping van-der-Waals balls so
    /// the excluded-volume enumeration sees a solid particle.
    pub fn fill_volume(&mut self) {
        let mut to_fill = Vec::new();
        for i in 1..self.bins[0] - 1 {
            for j in 1..self.bins[1] - 1 {
                for k in 1..self.bins[2] - 1 {
                    if self.state(i, j, k) != CellState::Empty {
                        continue;
                    }
                    let neighbours = [
                        self.state(i - 1, j, k), self.state(i + 1, j, k),
                        self.state(i, j - 1, k), self.state(i, j + 1, k),
                        self.state(i, j, k - 1), self.state(i, j, k + 1),
                    ];
                    let enclosed = neighbours.iter().all(|s| {
                        matches!(s, CellState::AtomArea | CellState::AtomCenter | CellState::Volume)
                    });
                    if enclosed {
                        to_fill.push(self.flat_index(i, j, k));
                    }
                }
            }
        }
        for idx in to_fill {
            self.cells[idx] = CellState::Volume;
        }
    }

    /// The integer bounding box of all non-empty cells, as inclusive `(min, max)` corners
    pub fn bounding_box_index(&self) -> ([usize; 3], [usize; 3]) {
        let mut min = [usize::MAX; 3];
        let mut max = [0usize; 3];
        for i in 0..self.bins[0] {
            for j in 0..self.bins[1] {
                for k in 0..self.bins[2] {
                    if self.state(i, j, k) == CellState::Empty {
                        continue;
                    }
                    let pos = [i, j, k];
                    for d in 0..3 {
                        min[d] = min[d].min(pos[d]);
                        max[d] = max[d].max(pos[d]);
                    }
                }
            }
        }
        if min[0] == usize::MAX {
            return ([0; 3], [0; 3]);
        }
        return (min, max);
    }

    /// Total volume of all occupied cells, in Å³
    pub fn occupied_volume(&self) -> f64 {
        let cell_volume = self.config.width.powi(3);
        let occupied = self
            .cells
            .iter()
            .filter(|s| matches!(s, CellState::Volume | CellState::AtomArea | CellState::AtomCenter))
            .count();
        return occupied as f64 * cell_volume;
    }
}
