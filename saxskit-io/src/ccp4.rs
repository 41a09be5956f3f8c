use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;

use crate::IoError;

const HEADER_SIZE: usize = 1024;

/// An electron-density map read from a CCP4/MRC file.
///
/// Voxels are stored in (x, y, z) order after undoing the file's axis
/// permutation; all voxel formats are widened to f32.
#[derive(Clone, Debug)]
pub struct DensityMap {
    /// voxel counts along x, y, z
    pub dims: [usize; 3],
    /// unit cell dimensions in Å
    pub cell: [f64; 3],
    /// density statistics from the header: min, max, mean
    pub dmin: f32,
    pub dmax: f32,
    pub dmean: f32,
    /// voxel data, x fastest
    pub data: Vec<f32>,
}

impl DensityMap {
    /// The voxel at integer coordinates
    pub fn at(&self, x: usize, y: usize, z: usize) -> f32 {
        self.data[(z * self.dims[1] + y) * self.dims[0] + x]
    }

    /// Edge lengths of a single voxel in Å
    pub fn voxel_size(&self) -> [f64; 3] {
        [
            self.cell[0] / self.dims[0] as f64,
            self.cell[1] / self.dims[1] as f64,
            self.cell[2] / self.dims[2] as f64,
        ]
    }
}

/// Reads a CCP4/MRC density map.
///
/// The header must be exactly 1024 bytes; byte order is taken from the
/// machine stamp. Modes 0 (int8), 1 (int16), 2 (float32) and 6 (uint16) are
/// supported; the complex and packed modes 3, 4 and 12 are rejected.
pub fn read_ccp4<P: AsRef<Path>>(path: P) -> Result<DensityMap, IoError> {
    let mut reader = BufReader::new(File::open(path)?);
    return read_ccp4_reader(&mut reader);
}

pub fn read_ccp4_reader<R: Read>(reader: &mut R) -> Result<DensityMap, IoError> {
    let mut header = [0u8; HEADER_SIZE];
    let mut got = 0;
    while got < HEADER_SIZE {
        let n = reader.read(&mut header[got..])?;
        if n == 0 {
            return Err(IoError::ShortCcp4Header(got));
        }
        got += n;
    }

    // the machine stamp at byte 212 decides the byte order of every word
    let little_endian = header[212] == 0x44 || header[212] == 0x00;
    let word_i32 = |index: usize| -> i32 {
        let bytes: [u8; 4] = header[index * 4..index * 4 + 4].try_into().unwrap();
        if little_endian {
            i32::from_le_bytes(bytes)
        } else {
            i32::from_be_bytes(bytes)
        }
    };
    let word_f32 = |index: usize| -> f32 {
        let bytes: [u8; 4] = header[index * 4..index * 4 + 4].try_into().unwrap();
        if little_endian {
            f32::from_le_bytes(bytes)
        } else {
            f32::from_be_bytes(bytes)
        }
    };

    let nc = word_i32(0) as usize; // columns
    let nr = word_i32(1) as usize; // rows
    let ns = word_i32(2) as usize; // sections
    let mode = word_i32(3);
    let cell = [word_f32(10) as f64, word_f32(11) as f64, word_f32(12) as f64];
    // axis order: which of x, y, z varies with columns, rows, sections
    let mapc = word_i32(16) as usize;
    let mapr = word_i32(17) as usize;
    let maps = word_i32(18) as usize;
    let dmin = word_f32(19);
    let dmax = word_f32(20);
    let dmean = word_f32(21);
    let nsymbt = word_i32(23) as usize;

    let n_voxels = nc * nr * ns;
    info!("CCP4 map: {nc}x{nr}x{ns} voxels, mode {mode}");

    // skip the symmetry records between the header and the voxels
    let mut skip = vec![0u8; nsymbt];
    reader.read_exact(&mut skip)?;

    let raw = read_voxels(reader, mode, n_voxels, little_endian)?;

    // undo the axis permutation so x is fastest in the output
    let axis_of = |m: usize| m.saturating_sub(1).min(2);
    let (ax_c, ax_r, ax_s) = (axis_of(mapc), axis_of(mapr), axis_of(maps));
    let mut dims = [0usize; 3];
    dims[ax_c] = nc;
    dims[ax_r] = nr;
    dims[ax_s] = ns;

    let mut data = vec![0.0f32; n_voxels];
    let mut index = 0;
    for s in 0..ns {
        for r in 0..nr {
            for c in 0..nc {
                let mut xyz = [0usize; 3];
                xyz[ax_c] = c;
                xyz[ax_r] = r;
                xyz[ax_s] = s;
                data[(xyz[2] * dims[1] + xyz[1]) * dims[0] + xyz[0]] = raw[index];
                index += 1;
            }
        }
    }

    let cell = [cell[0].max(1.0), cell[1].max(1.0), cell[2].max(1.0)];
    return Ok(DensityMap { dims, cell, dmin, dmax, dmean, data });
}

fn read_voxels<R: Read>(
    reader: &mut R,
    mode: i32,
    n_voxels: usize,
    little_endian: bool,
) -> Result<Vec<f32>, IoError> {
    let value_size = match mode {
        0 => 1,
        1 | 6 => 2,
        2 => 4,
        other => return Err(IoError::UnsupportedCcp4Mode(other)),
    };

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    if bytes.len() < n_voxels * value_size {
        return Err(IoError::TruncatedCcp4Data {
            expected: n_voxels,
            got: bytes.len() / value_size,
        });
    }

    let mut out = Vec::with_capacity(n_voxels);
    for k in 0..n_voxels {
        let chunk = &bytes[k * value_size..(k + 1) * value_size];
        let value = match mode {
            0 => chunk[0] as i8 as f32,
            1 => {
                let b: [u8; 2] = chunk.try_into().unwrap();
                (if little_endian { i16::from_le_bytes(b) } else { i16::from_be_bytes(b) }) as f32
            }
            6 => {
                let b: [u8; 2] = chunk.try_into().unwrap();
                (if little_endian { u16::from_le_bytes(b) } else { u16::from_be_bytes(b) }) as f32
            }
            _ => {
                let b: [u8; 4] = chunk.try_into().unwrap();
                if little_endian {
                    f32::from_le_bytes(b)
                } else {
                    f32::from_be_bytes(b)
                }
            }
        };
        out.push(value);
    }
    return Ok(out);
}
