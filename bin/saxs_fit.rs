use std::env;
use std::fs::File;
use std::io::BufWriter;

use anyhow::{bail, Context};
use clap::Parser;
use log::info;

use saxskit_fitter::{EnabledFitParameters, SmartFitter};
use saxskit_grid::{generate_hydration, Grid, GridConfig};
use saxskit_hist::{
    CompositeHistogram, Distribution1D, Distribution2D, Distribution3D, HistogramManager,
    HistogramManagerFFAvg, HistogramManagerFFExplicit, HistogramManagerFFGrid,
    HistogramManagerFFGridSurface, WeightedDistribution1D, WeightedDistribution2D,
    WeightedDistribution3D,
};
use saxskit_io::{
    read_pdb, write_pdb, write_saxs_data, ExvModel, RunConfig, Settings, SimpleDataset,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
/// Fit a theoretical scattering profile of an atomic structure against
/// experimental SAXS data.
struct Args {
    /// input structure in PDB format
    #[clap(short, long, short = 's')]
    structure: String,
    /// experimental SAXS dataset (DAT/XVG/TXT: q, I, sigma columns)
    #[clap(short, long, short = 'd')]
    saxs: String,
    /// settings file to initialize the configuration
    #[clap(long)]
    settings: Option<String>,
    /// write the fitted profile to this file
    #[clap(short, long, short = 'o')]
    output: Option<String>,
    /// write the hydrated structure to this PDB file
    #[clap(long)]
    output_pdb: Option<String>,
    /// number of worker threads; 0 uses all cores
    #[clap(long, default_value = "0")]
    threads: usize,
    /// lower q cutoff
    #[clap(long)]
    qmin: Option<f64>,
    /// upper q cutoff
    #[clap(long)]
    qmax: Option<f64>,
    /// excluded-volume model: plain, average, explicit, grid or grid-surface
    #[clap(long)]
    exv_model: Option<ExvModel>,
    /// fit the excluded-volume scale
    #[clap(long)]
    fit_exv: bool,
    /// fit the hydration-shell scale
    #[clap(long, action = clap::ArgAction::Set, default_value_t = true)]
    fit_hydration: bool,
    /// fit the solvent density scale
    #[clap(long)]
    fit_solvent: bool,
    /// fit the Debye-Waller B factors
    #[clap(long)]
    fit_bfactor: bool,
    /// skip hydration-layer generation
    #[clap(long)]
    no_hydrate: bool,
    /// be more verbose and log program actions on the screen
    #[clap(short, long, short = 'v')]
    verbose: bool,
}

fn build_config(args: &Args) -> anyhow::Result<RunConfig> {
    let mut config = match &args.settings {
        Some(path) => {
            let settings = Settings::from_file(path).with_context(|| format!("reading {path}"))?;
            RunConfig::from_settings(&settings)
        }
        None => RunConfig::default(),
    };
    config.threads = args.threads;
    if let Some(qmin) = args.qmin {
        config.qmin = qmin;
    }
    if let Some(qmax) = args.qmax {
        config.qmax = qmax;
    }
    if let Some(model) = args.exv_model {
        config.exv_model = model;
    }
    if args.no_hydrate {
        config.hydrate = false;
    }
    config.fit_hydration = args.fit_hydration && config.hydrate;
    config.fit_exv |= args.fit_exv;
    config.fit_solvent_density |= args.fit_solvent;
    config.fit_debye_waller |= args.fit_bfactor;
    if args.output.is_some() {
        config.output = args.output.clone();
    }
    if config.qmax <= config.qmin {
        bail!("qmin {} must be below qmax {}", config.qmin, config.qmax);
    }
    return Ok(config);
}

fn build_model(
    molecule: &saxskit_data::Molecule,
    model: ExvModel,
) -> Box<dyn CompositeHistogram> {
    match model {
        ExvModel::Plain => {
            Box::new(HistogramManager::<Distribution1D>::new(molecule).calculate_all())
        }
        ExvModel::Average => Box::new(
            HistogramManagerFFAvg::<Distribution1D, Distribution2D>::new(molecule).calculate_all(),
        ),
        ExvModel::Explicit => Box::new(
            HistogramManagerFFExplicit::<Distribution1D, Distribution2D, Distribution3D>::new(
                molecule,
            )
            .calculate_all(),
        ),
        // the regular exv lattice needs weighted bin centers
        ExvModel::Grid => Box::new(
            HistogramManagerFFGrid::<
                WeightedDistribution1D,
                WeightedDistribution2D,
                WeightedDistribution3D,
            >::new(molecule)
            .calculate_all(),
        ),
        ExvModel::GridSurface => Box::new(
            HistogramManagerFFGridSurface::<
                WeightedDistribution1D,
                WeightedDistribution2D,
                WeightedDistribution3D,
            >::new(molecule)
            .calculate_all(),
        ),
    }
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

    let config = build_config(&args)?;
    if config.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()
            .context("initializing the thread pool")?;
    }

    let mut molecule =
        read_pdb(&args.structure).with_context(|| format!("reading {}", args.structure))?;
    let mut data =
        SimpleDataset::from_file(&args.saxs).with_context(|| format!("reading {}", args.saxs))?;
    data.restrict(config.qmin, config.qmax);

    if config.hydrate {
        let mut grid = Grid::from_molecule(&molecule, GridConfig::default());
        generate_hydration(&mut molecule, &mut grid);
    }

    let mut model = build_model(&molecule, config.exv_model);
    let enabled = EnabledFitParameters {
        hydration: config.fit_hydration,
        exv: config.fit_exv,
        solvent_density: config.fit_solvent_density,
        atomic_debye_waller: config.fit_debye_waller,
        exv_debye_waller: config.fit_debye_waller && model.supports_exv(),
    };

    let fitter = SmartFitter::new(data.clone(), enabled)?;
    let result = fitter.fit(model.as_mut())?;

    println!("chi2:         {:.6}", result.chi2);
    println!("chi2/dof:     {:.6}", result.reduced_chi2());
    println!("scale (a):    {:.6e}", result.a);
    println!("offset (b):   {:.6e}", result.b);
    for (name, value) in &result.params {
        println!("{name:<13} {value:.6}");
    }
    println!("evaluations:  {}", result.evaluated_points);
    if !result.converged {
        println!("warning: the outer minimizer did not converge; best point reported");
    }

    if let Some(path) = &config.output {
        let ym = model.debye_transform_on(&data.q);
        let fitted = SimpleDataset::new(
            data.q.clone(),
            ym.iter().map(|v| result.a * v + result.b).collect(),
            data.sigma.clone(),
        );
        let mut out = BufWriter::new(File::create(path).with_context(|| format!("creating {path}"))?);
        write_saxs_data(&mut out, &fitted)?;
        info!("fitted profile written to {path}");
    }

    if let Some(path) = &args.output_pdb {
        let mut out = BufWriter::new(File::create(path).with_context(|| format!("creating {path}"))?);
        write_pdb(&mut out, &molecule)?;
        info!("hydrated structure written to {path}");
    }

    return Ok(());
}
