//! JSON run configuration.
//!
//! ```json
//! {
//!   "network":    "input/output_network.xml.gz",
//!   "events":     "input/output_events.xml.gz",
//!   "plans":      "input/output_plans.xml.gz",
//!   "output_dir": "output",
//!   "backend":    "parquet",
//!   "malformed":  "skip",
//!   "vehicles":   ["1042:car", "1043:car"]
//! }
//! ```
//!
//! The topology comes either from a MATSim `network` file or from a `links`
//! and `nodes` CSV pair, never both.  Events and plans are read as XML when
//! the path ends in `.xml` or `.xml.gz` and as CSV otherwise; an explicit
//! `"format": "xml"` or `"format": "csv"` overrides the extension for both.
//!
//! `plans`, `format`, `backend` (default `"csv"`), `malformed` (default
//! `"skip"`) and `vehicles` (default: every car) are optional.  Relative
//! paths are resolved against the directory holding the config file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use tt_core::{InputFormat, VehicleId};
use tt_events::{MalformedPolicy, ReducerConfig};
use tt_output::{CsvWriter, TimetableWriter};

use crate::{PipelineError, PipelineResult};

/// Output format written by [`run_from_config`](crate::run_from_config).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputBackend {
    #[default]
    Csv,
    Sqlite,
    Parquet,
}

impl OutputBackend {
    /// `true` when this build was compiled with the backend's feature.
    pub fn is_available(self) -> bool {
        match self {
            OutputBackend::Csv     => true,
            OutputBackend::Sqlite  => cfg!(feature = "sqlite"),
            OutputBackend::Parquet => cfg!(feature = "parquet"),
        }
    }

    /// Open a writer for this backend in `dir`, creating `dir` if needed.
    pub fn open(self, dir: &Path) -> PipelineResult<Box<dyn TimetableWriter>> {
        std::fs::create_dir_all(dir)?;
        match self {
            OutputBackend::Csv => Ok(Box::new(CsvWriter::new(dir)?)),
            #[cfg(feature = "sqlite")]
            OutputBackend::Sqlite => Ok(Box::new(tt_output::SqliteWriter::new(dir)?)),
            #[cfg(feature = "parquet")]
            OutputBackend::Parquet => Ok(Box::new(tt_output::ParquetWriter::new(dir)?)),
            #[allow(unreachable_patterns)]
            other => Err(PipelineError::Config(format!(
                "output backend {other:?} requires the `{}` feature",
                other.feature_name()
            ))),
        }
    }

    fn feature_name(self) -> &'static str {
        match self {
            OutputBackend::Csv     => "default",
            OutputBackend::Sqlite  => "sqlite",
            OutputBackend::Parquet => "parquet",
        }
    }
}

/// Where the road topology is read from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TopologySource<'a> {
    /// A MATSim network file.
    Xml(&'a Path),
    /// A links table and a nodes table.
    Csv { links: &'a Path, nodes: &'a Path },
}

/// Everything needed for a file-driven run.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default)]
    pub network:    Option<PathBuf>,
    #[serde(default)]
    pub links:      Option<PathBuf>,
    #[serde(default)]
    pub nodes:      Option<PathBuf>,
    pub events:     PathBuf,
    #[serde(default)]
    pub plans:      Option<PathBuf>,
    /// Layout of `events` and `plans`; absent means decide by extension.
    #[serde(default)]
    pub format:     Option<InputFormat>,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub backend:    OutputBackend,
    #[serde(default)]
    pub malformed:  MalformedPolicy,
    /// Car ids to track; absent means every car.
    #[serde(default)]
    pub vehicles:   Option<Vec<String>>,
}

impl PipelineConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let file = std::fs::File::open(path)?;
        let mut config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a JSON string.  Paths are kept as written.
    pub fn from_json_str(json: &str) -> PipelineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Prefix every relative path with `base`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.events);
        resolve(&mut self.output_dir);
        for p in [&mut self.network, &mut self.links, &mut self.nodes, &mut self.plans]
            .into_iter()
            .flatten()
        {
            resolve(p);
        }
    }

    /// Reject configs that cannot run in this build.
    pub fn validate(&self) -> PipelineResult<()> {
        let optional = [
            ("network", &self.network),
            ("links", &self.links),
            ("nodes", &self.nodes),
            ("plans", &self.plans),
        ];
        let named = optional
            .into_iter()
            .filter_map(|(name, path)| path.as_ref().map(|p| (name, p)))
            .chain([("events", &self.events)]);
        for (name, path) in named {
            if path.as_os_str().is_empty() {
                return Err(PipelineError::Config(format!("`{name}` path is empty")));
            }
        }
        self.topology_source()?;
        if self.output_dir.as_os_str().is_empty() {
            return Err(PipelineError::Config("`output_dir` is empty".to_owned()));
        }
        if !self.backend.is_available() {
            return Err(PipelineError::Config(format!(
                "output backend {:?} requires the `{}` feature",
                self.backend,
                self.backend.feature_name()
            )));
        }
        if self.vehicles.as_ref().is_some_and(|ids| ids.iter().any(String::is_empty)) {
            return Err(PipelineError::Config("`vehicles` contains an empty id".to_owned()));
        }
        if self.vehicles.as_ref().is_some_and(Vec::is_empty) {
            return Err(PipelineError::Config(
                "`vehicles` is empty; omit it to track every car".to_owned(),
            ));
        }
        Ok(())
    }

    /// The configured topology input.  Exactly one of `network` or the
    /// `links` + `nodes` pair must be set.
    pub fn topology_source(&self) -> PipelineResult<TopologySource<'_>> {
        match (&self.network, &self.links, &self.nodes) {
            (Some(network), None, None) => Ok(TopologySource::Xml(network)),
            (None, Some(links), Some(nodes)) => Ok(TopologySource::Csv { links, nodes }),
            (Some(_), _, _) => Err(PipelineError::Config(
                "give either `network` or `links` + `nodes`, not both".to_owned(),
            )),
            (None, None, None) => Err(PipelineError::Config(
                "no topology: set `network` or `links` + `nodes`".to_owned(),
            )),
            (None, _, _) => Err(PipelineError::Config(
                "`links` and `nodes` must be given together".to_owned(),
            )),
        }
    }

    /// Layout of the events file.
    pub fn events_format(&self) -> InputFormat {
        self.format.unwrap_or_else(|| InputFormat::from_path(&self.events))
    }

    /// Layout of the plans file, if one is configured.
    pub fn plans_format(&self) -> Option<InputFormat> {
        let plans = self.plans.as_deref()?;
        Some(self.format.unwrap_or_else(|| InputFormat::from_path(plans)))
    }

    pub fn reducer_config(&self) -> ReducerConfig {
        ReducerConfig { malformed: self.malformed }
    }

    /// The vehicle filter, or `None` to track every car.
    pub fn vehicle_filter(&self) -> Option<HashSet<VehicleId>> {
        self.vehicles
            .as_ref()
            .map(|ids| ids.iter().map(|id| VehicleId::from(id.as_str())).collect())
    }
}
