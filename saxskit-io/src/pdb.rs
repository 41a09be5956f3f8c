use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use log::{info, warn};
use saxskit_data::{Atom, Body, FormFactorClass, Molecule};
use saxskit_numerical::Vec3;

use crate::IoError;

const WATER_RESIDUES: [&str; 3] = ["HOH", "SOL", "WAT"];

/// Reads a molecule from a PDB file.
///
/// Only `ATOM` and `HETATM` records are consumed; water residues become the
/// hydration shell. Each chain becomes one rigid body, so multi-chain
/// structures can be refined with rigid-body moves out of the box.
pub fn read_pdb<P: AsRef<Path>>(path: P) -> Result<Molecule, IoError> {
    let reader = BufReader::new(File::open(path)?);
    return read_pdb_reader(reader);
}

/// Reads a molecule from any PDB-formatted source.
///
/// # Example
/// ```
/// use std::io::BufReader;
/// use saxskit_io::read_pdb_reader;
/// let line = "ATOM      1  CA  ALA A   1       1.000   2.000   3.000  1.00  0.00           C  \n";
/// let molecule = read_pdb_reader(BufReader::new(line.as_bytes())).unwrap();
/// assert_eq!(molecule.atom_count(), 1);
/// ```
pub fn read_pdb_reader<R: Read>(reader: BufReader<R>) -> Result<Molecule, IoError> {
    let mut chains: Vec<(String, Vec<Atom>, Vec<Atom>)> = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if !(line.starts_with("ATOM") || line.starts_with("HETATM")) {
            continue;
        }
        let (atom, res_name, chain_id) = parse_atom_line(&line, lineno + 1)?;

        let chain = match chains.iter_mut().find(|(id, _, _)| *id == chain_id) {
            Some(entry) => entry,
            None => {
                chains.push((chain_id.clone(), Vec::new(), Vec::new()));
                chains.last_mut().unwrap()
            }
        };
        if WATER_RESIDUES.contains(&res_name.as_str()) {
            chain.2.push(Atom::water(atom.pos));
        } else {
            chain.1.push(atom);
        }
    }

    let bodies: Vec<Body> = chains
        .into_iter()
        .enumerate()
        .filter(|(_, (_, atoms, waters))| !atoms.is_empty() || !waters.is_empty())
        .map(|(i, (_, atoms, waters))| Body::with_waters(i as u32, atoms, waters))
        .collect();

    let molecule = Molecule::new(bodies).map_err(|_| IoError::EmptyStructure)?;
    info!(
        "read {} atoms and {} waters in {} bodies",
        molecule.atom_count(),
        molecule.waters().len(),
        molecule.size_bodies()
    );
    return Ok(molecule);
}

fn parse_atom_line(line: &str, lineno: usize) -> Result<(Atom, String, String), IoError> {
    let malformed = |reason: &str| IoError::MalformedLine { line: lineno, reason: reason.to_string() };
    if line.len() < 54 {
        return Err(malformed("record shorter than the coordinate columns"));
    }

    let field = |range: std::ops::Range<usize>| line.get(range).unwrap_or("").trim().to_string();
    let coord = |range: std::ops::Range<usize>| -> Result<f64, IoError> {
        line.get(range.clone())
            .unwrap_or("")
            .trim()
            .parse::<f64>()
            .map_err(|_| malformed(&format!("cannot parse coordinate columns {range:?}")))
    };

    let res_name = field(17..20);
    let chain_id = field(21..22);
    let x = coord(30..38)?;
    let y = coord(38..46)?;
    let z = coord(46..54)?;
    let occupancy = if line.len() >= 60 { field(54..60).parse::<f64>().unwrap_or(1.0) } else { 1.0 };
    let element = if line.len() >= 78 { field(76..78) } else { String::new() };

    let class = match FormFactorClass::from_element(&element, 0) {
        Some(class) => class,
        None => {
            // fall back to the first character of the atom name
            let name = field(12..16);
            let guess = name.chars().find(|c| c.is_ascii_alphabetic()).unwrap_or('C');
            warn!("line {lineno}: no element symbol, guessing '{guess}' from atom name '{name}'");
            FormFactorClass::from_element(&guess.to_string(), 0).unwrap_or(FormFactorClass::Other)
        }
    };

    let atom = Atom::new(Vec3::new(x, y, z), class.electrons() * occupancy, class);
    return Ok((atom, res_name, chain_id));
}

/// Writes a molecule in PDB format; waters follow the atoms as `HETATM` records.
pub fn write_pdb<W: Write>(out: &mut W, molecule: &Molecule) -> Result<(), IoError> {
    let mut serial = 1;
    for (body_idx, body) in molecule.bodies().iter().enumerate() {
        let chain = chain_letter(body_idx);
        for atom in body.atoms() {
            write_atom_record(out, "ATOM  ", serial, atom, "ALA", chain, element_of(atom))?;
            serial += 1;
        }
    }
    for (body_idx, body) in molecule.bodies().iter().enumerate() {
        let chain = chain_letter(body_idx);
        for water in body.waters() {
            write_atom_record(out, "HETATM", serial, water, "HOH", chain, "O")?;
            serial += 1;
        }
    }
    writeln!(out, "END")?;
    return Ok(());
}

fn chain_letter(body_idx: usize) -> char {
    (b'A' + (body_idx % 26) as u8) as char
}

fn element_of(atom: &Atom) -> &'static str {
    match atom.class {
        FormFactorClass::H => "H",
        FormFactorClass::C | FormFactorClass::CH | FormFactorClass::CH2 | FormFactorClass::CH3 => "C",
        FormFactorClass::N | FormFactorClass::NH | FormFactorClass::NH2 => "N",
        FormFactorClass::O | FormFactorClass::OH => "O",
        FormFactorClass::S | FormFactorClass::SH => "S",
        _ => "C",
    }
}

fn write_atom_record<W: Write>(
    out: &mut W,
    record: &str,
    serial: usize,
    atom: &Atom,
    res_name: &str,
    chain: char,
    element: &str,
) -> Result<(), IoError> {
    writeln!(
        out,
        "{record}{serial:>5}  {:<3} {res_name:<3} {chain}{:>4}    {:8.3}{:8.3}{:8.3}{:6.2}{:6.2}          {element:>2}",
        element, serial, atom.pos.x, atom.pos.y, atom.pos.z, 1.00, 0.00
    )?;
    return Ok(());
}
