use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use log::warn;

use crate::IoError;

/// A key-value settings file.
///
/// The format is one `<namespace>::<name> <value>` pair per line, with `#`
/// starting a comment:
///
/// ```text
/// general::threads 8
/// axes::qmin 0.01      # lower q cutoff
/// fit::hydration true
/// ```
///
/// Values are stored as strings and parsed on access.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings, IoError> {
        let reader = BufReader::new(File::open(path)?);
        return Settings::from_reader(reader);
    }

    pub fn from_reader<R: Read>(reader: BufReader<R>) -> Result<Settings, IoError> {
        let mut values = BTreeMap::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let content = line.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            let Some((key, value)) = content.split_once(char::is_whitespace) else {
                return Err(IoError::InvalidSetting {
                    line: lineno + 1,
                    reason: "expected '<namespace>::<name> <value>'".to_string(),
                });
            };
            if !key.contains("::") {
                return Err(IoError::InvalidSetting {
                    line: lineno + 1,
                    reason: format!("key '{key}' is missing its namespace"),
                });
            }
            values.insert(key.to_string(), value.trim().to_string());
        }
        return Ok(Settings { values });
    }

    /// Fetches and parses a value; `None` when absent or unparsable
    pub fn get<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.values.get(key)?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("setting '{key}' has unparsable value '{raw}', using the default");
                None
            }
        }
    }

    /// The raw string value of a key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The excluded-volume model selecting a histogram-manager variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExvModel {
    /// plain 1D histogram, no excluded volume
    Plain,
    /// averaged form factors, contrast-subtracted excluded volume
    #[default]
    Average,
    /// explicit per-class-pair form factors
    Explicit,
    /// space-filling grid of dummy scatterers
    Grid,
    /// grid with separate surface and interior points
    GridSurface,
}

impl FromStr for ExvModel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "none" => Ok(ExvModel::Plain),
            "average" | "avg" => Ok(ExvModel::Average),
            "explicit" => Ok(ExvModel::Explicit),
            "grid" => Ok(ExvModel::Grid),
            "grid-surface" | "surface" => Ok(ExvModel::GridSurface),
            other => Err(format!("unknown excluded-volume model '{other}'")),
        }
    }
}

/// Typed run configuration assembled from defaults, a settings file and
/// command-line overrides; passed explicitly into the pipeline.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub threads: usize,
    pub qmin: f64,
    pub qmax: f64,
    pub exv_model: ExvModel,
    pub hydrate: bool,
    pub fit_hydration: bool,
    pub fit_exv: bool,
    pub fit_solvent_density: bool,
    pub fit_debye_waller: bool,
    pub output: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            threads: 0, // 0 = hardware concurrency
            qmin: 1e-4,
            qmax: 1.0,
            exv_model: ExvModel::default(),
            hydrate: true,
            fit_hydration: true,
            fit_exv: false,
            fit_solvent_density: false,
            fit_debye_waller: false,
            output: None,
        }
    }
}

impl RunConfig {
    /// Applies a settings file on top of the defaults
    pub fn from_settings(settings: &Settings) -> RunConfig {
        let mut config = RunConfig::default();
        if let Some(threads) = settings.get("general::threads") {
            config.threads = threads;
        }
        if let Some(qmin) = settings.get("axes::qmin") {
            config.qmin = qmin;
        }
        if let Some(qmax) = settings.get("axes::qmax") {
            config.qmax = qmax;
        }
        if let Some(model) = settings.get("exv::model") {
            config.exv_model = model;
        }
        if let Some(hydrate) = settings.get("hydrate::enabled") {
            config.hydrate = hydrate;
        }
        if let Some(v) = settings.get("fit::hydration") {
            config.fit_hydration = v;
        }
        if let Some(v) = settings.get("fit::exv") {
            config.fit_exv = v;
        }
        if let Some(v) = settings.get("fit::solvent_density") {
            config.fit_solvent_density = v;
        }
        if let Some(v) = settings.get("fit::debye_waller") {
            config.fit_debye_waller = v;
        }
        if let Some(output) = settings.get_str("general::output") {
            config.output = Some(output.to_string());
        }
        return config;
    }
}
