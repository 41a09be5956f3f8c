use std::env;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};

use anyhow::Context;
use clap::Parser;

use saxskit_grid::{generate_hydration, Grid, GridConfig};
use saxskit_hist::{Distribution1D, HistogramManager, WeightedDistribution1D};
use saxskit_io::{read_pdb, write_saxs_data, SimpleDataset};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
/// Compute the theoretical scattering profile I(q) of an atomic structure.
struct Args {
    /// input structure in PDB format
    #[clap(short, long, short = 's')]
    structure: String,
    /// output file; stdout when omitted
    #[clap(short, long, short = 'o')]
    output: Option<String>,
    /// add a hydration layer before computing the profile
    #[clap(long)]
    hydrate: bool,
    /// use weighted bin centers for a sparser, more accurate transform
    #[clap(long)]
    weighted: bool,
    /// be more verbose and log program actions on the screen
    #[clap(short, long, short = 'v')]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    if args.verbose {
        env::set_var("RUST_LOG", "debug");
    }
    env_logger::init();

    let mut molecule =
        read_pdb(&args.structure).with_context(|| format!("reading {}", args.structure))?;

    if args.hydrate {
        let mut grid = Grid::from_molecule(&molecule, GridConfig::default());
        generate_hydration(&mut molecule, &mut grid);
    }

    let profile = if args.weighted {
        HistogramManager::<WeightedDistribution1D>::new(&molecule).calculate().debye_transform()
    } else {
        HistogramManager::<Distribution1D>::new(&molecule).calculate().debye_transform()
    };

    let dataset = SimpleDataset::new(
        profile.q().to_vec(),
        profile.intensity().to_vec(),
        vec![1.0; profile.len()],
    );
    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => {
            Box::new(BufWriter::new(File::create(path).with_context(|| format!("creating {path}"))?))
        }
        None => Box::new(stdout()),
    };
    write_saxs_data(&mut out, &dataset)?;

    return Ok(());
}
