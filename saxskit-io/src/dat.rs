use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use itertools::Itertools;
use log::{info, warn};

use crate::IoError;

/// An experimental scattering dataset: q, I(q) and the measurement errors.
///
/// # Example
/// ```
/// use std::io::BufReader;
/// use saxskit_io::read_saxs_data;
/// let text = "# synthetic data\n0.01 1.00 0.05\n0.02 0.98 0.05\n";
/// let data = read_saxs_data(BufReader::new(text.as_bytes())).unwrap();
/// assert_eq!(data.len(), 2);
/// assert_eq!(data.sigma[0], 0.05);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SimpleDataset {
    pub q: Vec<f64>,
    pub i: Vec<f64>,
    pub sigma: Vec<f64>,
}

impl SimpleDataset {
    pub fn new(q: Vec<f64>, i: Vec<f64>, sigma: Vec<f64>) -> SimpleDataset {
        assert_eq!(q.len(), i.len());
        assert_eq!(q.len(), sigma.len());
        SimpleDataset { q, i, sigma }
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// Loads a dataset from a DAT/XVG/TXT file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SimpleDataset, IoError> {
        let reader = BufReader::new(File::open(path)?);
        return read_saxs_data(reader);
    }

    /// Restricts the dataset to a q window, clamping the requested limits to
    /// the available range.
    pub fn restrict(&mut self, qmin: f64, qmax: f64) {
        let available = (self.q.first().copied(), self.q.last().copied());
        if let (Some(lo), Some(hi)) = available {
            if qmin < lo || hi < qmax {
                warn!("requested q window [{qmin}, {qmax}] clamped to the data range [{lo}, {hi}]");
            }
        }
        let keep: Vec<usize> =
            (0..self.q.len()).filter(|&k| qmin <= self.q[k] && self.q[k] <= qmax).collect();
        self.q = keep.iter().map(|&k| self.q[k]).collect();
        self.i = keep.iter().map(|&k| self.i[k]).collect();
        self.sigma = keep.iter().map(|&k| self.sigma[k]).collect();
    }
}

fn is_comment(line: &str) -> bool {
    matches!(line.chars().next(), Some('#') | Some('@') | Some('&'))
}

/// Reads a whitespace-separated SAXS dataset.
///
/// Rows carry 2, 3 or 4 columns (q, I, σ, extra); a missing σ column yields
/// unit errors. Comment lines start with `#`, `@` or `&`. The q column must
/// increase monotonically.
pub fn read_saxs_data<R: Read>(reader: BufReader<R>) -> Result<SimpleDataset, IoError> {
    let mut q = Vec::new();
    let mut i = Vec::new();
    let mut sigma = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || is_comment(trimmed) {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < 2 || fields.len() > 4 {
            return Err(IoError::MalformedLine {
                line: lineno + 1,
                reason: format!("expected 2-4 columns, found {}", fields.len()),
            });
        }
        let parse = |s: &str| -> Result<f64, IoError> {
            s.parse::<f64>().map_err(|_| IoError::MalformedLine {
                line: lineno + 1,
                reason: format!("cannot parse '{s}' as a number"),
            })
        };
        q.push(parse(fields[0])?);
        i.push(parse(fields[1])?);
        sigma.push(if fields.len() >= 3 { parse(fields[2])? } else { 1.0 });
    }

    if q.is_empty() {
        return Err(IoError::EmptyDataset);
    }
    if let Some(pos) = q.iter().tuple_windows().position(|(a, b)| b <= a) {
        return Err(IoError::NonMonotonicQ { row: pos + 2 });
    }

    info!("read {} data points, q in [{}, {}]", q.len(), q[0], q[q.len() - 1]);
    return Ok(SimpleDataset { q, i, sigma });
}

/// Writes a dataset as whitespace-separated text with a header comment.
pub fn write_saxs_data<W: Write>(out: &mut W, data: &SimpleDataset) -> Result<(), IoError> {
    writeln!(out, "# q I sigma")?;
    for k in 0..data.len() {
        writeln!(out, "{:.6e} {:.6e} {:.6e}", data.q[k], data.i[k], data.sigma[k])?;
    }
    return Ok(());
}
