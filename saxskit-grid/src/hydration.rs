use log::info;
use saxskit_data::{Atom, Molecule};
use saxskit_numerical::Vec3;

use crate::{CellState, Grid};

/// Places a hydration layer on the molecule surface.
///
/// For every atom, candidate water sites are probed along the six axis
/// directions at the touch distance (atom radius + water radius). A site is
/// accepted when its cell is empty and no occupied cell lies within a water
/// radius of it. Accepted waters are stamped into the grid and attached to
/// the body owning the seeding atom. Returns the number of placed waters.
///
/// The caller must signal the hydration-layer modification on its state
/// manager after calling this.
pub fn generate_hydration(molecule: &mut Molecule, grid: &mut Grid) -> usize {
    let r_eff = grid.config().atom_radius + grid.config().water_radius;
    let mut placed_total = 0;

    for body_idx in 0..molecule.size_bodies() {
        let mut placed: Vec<Atom> = Vec::new();
        for atom in molecule.body(body_idx).atoms() {
            for site in axis_sites(&atom.pos, r_eff) {
                if accepts_water(grid, &site) {
                    grid.add_water(&site);
                    placed.push(Atom::water(site));
                }
            }
        }
        placed_total += placed.len();
        molecule.bodies_mut()[body_idx].set_waters(placed);
    }

    info!("placed {} hydration waters", placed_total);
    return placed_total;
}

fn axis_sites(center: &Vec3, r_eff: f64) -> [Vec3; 6] {
    [
        Vec3::new(center.x - r_eff, center.y, center.z),
        Vec3::new(center.x + r_eff, center.y, center.z),
        Vec3::new(center.x, center.y - r_eff, center.z),
        Vec3::new(center.x, center.y + r_eff, center.z),
        Vec3::new(center.x, center.y, center.z - r_eff),
        Vec3::new(center.x, center.y, center.z + r_eff),
    ]
}

fn accepts_water(grid: &Grid, site: &Vec3) -> bool {
    let Some([x, y, z]) = grid.to_bins(site) else {
        return false;
    };
    if grid.state(x, y, z) != CellState::Empty {
        return false;
    }

    // nothing may occupy the water ball around the candidate site; the ball
    // is shrunk by one cell so a water touching its seeding atom is not
    // rejected by discretization overlap
    let r = grid.config().water_radius / grid.width() - 1.0;
    if r <= 0.0 {
        return true;
    }
    let r_bins = r.ceil() as i64;
    let r2 = r * r;
    for di in -r_bins..=r_bins {
        for dj in -r_bins..=r_bins {
            for dk in -r_bins..=r_bins {
                if (di * di + dj * dj + dk * dk) as f64 >= r2 {
                    continue;
                }
                let (i, j, k) = (x as i64 + di, y as i64 + dj, z as i64 + dk);
                if i < 0 || j < 0 || k < 0 {
                    continue;
                }
                let (i, j, k) = (i as usize, j as usize, k as usize);
                let bins = grid.bins();
                if i >= bins[0] || j >= bins[1] || k >= bins[2] {
                    continue;
                }
                if grid.state(i, j, k) != CellState::Empty {
                    return false;
                }
            }
        }
    }
    return true;
}
