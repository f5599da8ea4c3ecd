//! The `Pipeline` driver and the file-driven `run_from_config` entry point.

use std::collections::{HashMap, HashSet};

use tt_core::{PersonId, VehicleId};
use tt_events::{
    ActivityEvent, EventResult, RawEvent, ReduceReport, ReducerConfig, Trip, read_events, reduce,
};
use tt_network::{TopologyLookup, load_network_xml, load_topology_csv};
use tt_output::write_timetable;
use tt_timetable::{
    ActivityMatcher, EnrichedTimetable, MatchReport, PlanActivity, load_plans, stitch,
};

use crate::config::{PipelineConfig, TopologySource};
use crate::observer::PipelineObserver;
use crate::PipelineResult;

/// Stage counters from one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReports {
    pub reduce:   ReduceReport,
    pub matching: MatchReport,
}

/// Everything one run produces.
#[derive(Clone, Debug, Default)]
pub struct PipelineOutput {
    pub trips:             Vec<Trip>,
    pub activities:        Vec<ActivityEvent>,
    pub person_to_vehicle: HashMap<PersonId, VehicleId>,
    pub timetable:         EnrichedTimetable,
    pub reports:           PipelineReports,
}

/// Reduce → stitch → match over one topology.
///
/// # Example
///
/// ```rust,ignore
/// let topo = load_network_xml(Path::new("output_network.xml.gz"))?;
/// let plans = load_plans_xml(Path::new("output_plans.xml.gz"))?;
/// let events = read_events_xml(Path::new("output_events.xml.gz"))?;
/// let output = Pipeline::new(&topo, ReducerConfig::default())
///     .run(events, &plans, &mut LoggingObserver)?;
/// ```
pub struct Pipeline<'t, T: TopologyLookup + Sync + ?Sized> {
    topology: &'t T,
    config:   ReducerConfig,
    filter:   Option<HashSet<VehicleId>>,
}

impl<'t, T: TopologyLookup + Sync + ?Sized> Pipeline<'t, T> {
    pub fn new(topology: &'t T, config: ReducerConfig) -> Self {
        Self { topology, config, filter: None }
    }

    /// Only reconstruct the listed cars.
    pub fn with_vehicle_filter(mut self, filter: HashSet<VehicleId>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Run every stage.  `events` is consumed lazily.
    pub fn run<I, O>(
        &self,
        events:   I,
        plans:    &[PlanActivity],
        observer: &mut O,
    ) -> PipelineResult<PipelineOutput>
    where
        I: IntoIterator<Item = EventResult<RawEvent>>,
        O: PipelineObserver + ?Sized,
    {
        // ── Stage 1: reduce ───────────────────────────────────────────────
        let log = reduce(events, self.topology, self.filter.as_ref(), self.config.clone())?;
        observer.on_events_reduced(&log.report);

        // ── Stage 2: stitch ───────────────────────────────────────────────
        let episodes = stitch(&log.trips)?;
        observer.on_timetable_stitched(&episodes);

        // ── Stage 3: match ────────────────────────────────────────────────
        let matcher = ActivityMatcher::new(plans, self.topology);
        let (timetable, matching) = matcher.match_timetable(episodes);
        observer.on_activities_matched(&matching);

        let output = PipelineOutput {
            trips:             log.trips,
            activities:        log.activities,
            person_to_vehicle: log.person_to_vehicle,
            timetable,
            reports:           PipelineReports { reduce: log.report, matching },
        };
        observer.on_pipeline_end(&output);
        Ok(output)
    }
}

/// Load every input named by `config`, run, and write the configured backend
/// into `config.output_dir`.
pub fn run_from_config<O: PipelineObserver + ?Sized>(
    config:   &PipelineConfig,
    observer: &mut O,
) -> PipelineResult<PipelineOutput> {
    config.validate()?;

    let topology = match config.topology_source()? {
        TopologySource::Xml(network) => load_network_xml(network)?,
        TopologySource::Csv { links, nodes } => load_topology_csv(links, nodes)?,
    };
    let plans = match (&config.plans, config.plans_format()) {
        (Some(path), Some(format)) => {
            tracing::info!(path = %path.display(), ?format, "loading plans");
            load_plans(path, format)?
        }
        _ => {
            tracing::info!("no plans file configured; every parked episode uses the link fallback");
            Vec::new()
        }
    };

    let mut pipeline = Pipeline::new(&topology, config.reducer_config());
    if let Some(filter) = config.vehicle_filter() {
        tracing::info!(vehicles = filter.len(), "vehicle filter active");
        pipeline = pipeline.with_vehicle_filter(filter);
    }
    let events_format = config.events_format();
    tracing::info!(path = %config.events.display(), format = ?events_format, "streaming events");
    let output = pipeline.run(read_events(&config.events, events_format)?, &plans, observer)?;

    let mut writer = config.backend.open(&config.output_dir)?;
    write_timetable(&mut writer, &output.trips, &output.activities, &output.timetable)?;
    tracing::info!(dir = %config.output_dir.display(), backend = ?config.backend, "results written");

    Ok(output)
}
