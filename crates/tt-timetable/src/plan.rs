//! Planned activities and the plan loaders.
//!
//! Both loaders apply the same normalization (table below) and accept
//! `.gz`-compressed files.
//!
//! # MATSim XML
//!
//! `output_plans.xml(.gz)`.  Of each person only the first plan marked
//! `selected="yes"` is read; persons without one contribute nothing.
//! Activity attributes map onto the CSV columns (`type` → `activity_type`,
//! `link` → `link_id`); legs and routes are skipped.
//!
//! ```xml
//! <population>
//!   <person id="p1">
//!     <plan score="112.4" selected="yes">
//!       <activity type="home" link="L1" x="0.0" y="0.0" end_time="07:00:00"/>
//!       <leg mode="car"><route type="links">L1 L2</route></leg>
//!       <activity type="car interaction" link="L2" x="500.0" y="0.0" max_dur="00:00:00"/>
//!       <activity type="work" link="L2" x="500.0" y="0.0" start_time="08:00:00"/>
//!     </plan>
//!     <plan score="98.0" selected="no"> … </plan>
//!   </person>
//! </population>
//! ```
//!
//! # CSV format
//!
//! One row per planned activity, in plan order per person.
//!
//! ```csv
//! person_id,activity_type,link_id,x,y,start_time
//! p1,home,L1,0.0,0.0,
//! p1,car interaction,L1,0.0,0.0,07:00:00
//! p1,work,L2,500.0,0.0,08:00:00
//! p1,home,L1,0.0,0.0,17:30:00
//! ```
//!
//! | Column          | Meaning                                                  |
//! |-----------------|----------------------------------------------------------|
//! | `start_time`    | `HH:MM:SS`, hours may exceed 23; empty or invalid → 0    |
//! | `x`, `y`        | projected coordinates; empty → NaN, non-numeric → error  |
//! | `link_id`       | empty → the activity can never be matched to an episode  |
//! | `activity_type` | types ending in `" interaction"` are skipped             |

use std::collections::HashSet;
use std::io::{BufRead, Read};
use std::path::Path;

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use serde::Deserialize;

use tt_core::{Coord, InputFormat, LinkId, PersonId, UNKNOWN, open_input, try_parse_hms};

use crate::{TimetableError, TimetableResult};

/// Suffix of routing-stage activities inserted between legs.
const INTERACTION_SUFFIX: &str = " interaction";

/// One activity from a person's plan.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanActivity {
    pub person_id:     PersonId,
    pub activity_type: String,
    /// `None` when the plan gives no link; such activities never match.
    pub link_id:       Option<LinkId>,
    pub coord:         Coord,
    /// Seconds from midnight.  The day's first activity usually has no start
    /// and is normalized to 0.
    pub start_time_s:  f64,
}

impl PlanActivity {
    pub fn new(
        person_id:     impl Into<PersonId>,
        activity_type: impl Into<String>,
        link_id:       impl Into<LinkId>,
        coord:         Coord,
        start_time_s:  f64,
    ) -> Self {
        Self {
            person_id:     person_id.into(),
            activity_type: activity_type.into(),
            link_id:       Some(link_id.into()),
            coord,
            start_time_s,
        }
    }
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PlanRecord {
    person_id:     String,
    #[serde(default)]
    activity_type: Option<String>,
    #[serde(default)]
    link_id:       Option<String>,
    #[serde(default)]
    x:             Option<f64>,
    #[serde(default)]
    y:             Option<f64>,
    #[serde(default)]
    start_time:    Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load planned activities from `path` in `format`.
pub fn load_plans(path: &Path, format: InputFormat) -> TimetableResult<Vec<PlanActivity>> {
    match format {
        InputFormat::Csv => load_plans_csv(path),
        InputFormat::Xml => load_plans_xml(path),
    }
}

/// Load planned activities from a CSV file.
pub fn load_plans_csv(path: &Path) -> TimetableResult<Vec<PlanActivity>> {
    load_plans_reader(open_input(path)?)
}

/// Like [`load_plans_csv`] but accepts any `Read` source.
pub fn load_plans_reader<R: Read>(reader: R) -> TimetableResult<Vec<PlanActivity>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut collector = Collector::default();
    for result in csv_reader.deserialize::<PlanRecord>() {
        collector.push(result?);
    }
    Ok(collector.finish())
}

/// Load the selected plan of every person from a MATSim population file
/// (`.xml` or `.xml.gz`).
pub fn load_plans_xml(path: &Path) -> TimetableResult<Vec<PlanActivity>> {
    load_plans_xml_reader(open_input(path)?)
}

/// Like [`load_plans_xml`] but accepts any `BufRead` source.
///
/// Only the first `<plan selected="yes">` of each `<person>` is read; the
/// person's other plans and everything but `<activity>` are skipped.
pub fn load_plans_xml_reader<R: BufRead>(reader: R) -> TimetableResult<Vec<PlanActivity>> {
    let mut reader = Reader::from_reader(reader);
    let mut buf = Vec::new();
    let mut collector = Collector::default();

    let mut person: Option<String> = None;
    let mut took_plan = false;
    let mut in_selected = false;

    loop {
        buf.clear();
        let (e, is_empty) = match reader.read_event_into(&mut buf)? {
            XmlEvent::Start(e) => (e, false),
            XmlEvent::Empty(e) => (e, true),
            XmlEvent::End(e) => {
                match e.name().as_ref() {
                    b"plan" => in_selected = false,
                    b"person" => {
                        collector.no_selected_plan += usize::from(!took_plan);
                        person = None;
                    }
                    _ => {}
                }
                continue;
            }
            XmlEvent::Eof => break,
            _ => continue,
        };

        match e.name().as_ref() {
            b"person" => {
                person = Some(required(&e, "person", "id")?);
                took_plan = false;
                if is_empty {
                    collector.no_selected_plan += 1;
                    person = None;
                }
            }
            b"plan" => {
                let selected = !took_plan && attribute(&e, "selected")?.as_deref() == Some("yes");
                took_plan |= selected;
                in_selected = selected && !is_empty && person.is_some();
            }
            b"activity" if in_selected => {
                if let Some(person_id) = &person {
                    collector.push(activity_record(&e, person_id)?);
                }
            }
            _ => {}
        }
    }

    Ok(collector.finish())
}

// ── Shared row handling ───────────────────────────────────────────────────────

/// Normalizes rows from either format and keeps the load counters.
#[derive(Default)]
struct Collector {
    plans:            Vec<PlanActivity>,
    persons:          HashSet<String>,
    interactions:     usize,
    bad_times:        usize,
    no_selected_plan: usize,
}

impl Collector {
    fn push(&mut self, row: PlanRecord) {
        let activity_type = row
            .activity_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_owned());
        if activity_type.ends_with(INTERACTION_SUFFIX) {
            self.interactions += 1;
            return;
        }

        let start_time_s = match row.start_time.as_deref().map(str::trim) {
            None | Some("") => 0.0,
            Some(clock) => try_parse_hms(clock).unwrap_or_else(|e| {
                self.bad_times += 1;
                tracing::debug!(person = %row.person_id, error = %e, "unparseable start time");
                0.0
            }),
        };

        self.persons.insert(row.person_id.clone());
        self.plans.push(PlanActivity {
            person_id:     PersonId(row.person_id),
            activity_type,
            link_id:       row.link_id.filter(|l| !l.is_empty()).map(LinkId),
            coord:         Coord::from_parts(row.x, row.y),
            start_time_s,
        });
    }

    fn finish(self) -> Vec<PlanActivity> {
        tracing::info!(
            persons              = self.persons.len(),
            activities           = self.plans.len(),
            interactions_skipped = self.interactions,
            "plans loaded"
        );
        if self.bad_times > 0 {
            tracing::warn!(records = self.bad_times, "plan start times unparseable; treated as 00:00:00");
        }
        if self.no_selected_plan > 0 {
            tracing::warn!(persons = self.no_selected_plan, "persons without a selected plan skipped");
        }
        self.plans
    }
}

// ── XML attributes ────────────────────────────────────────────────────────────

fn activity_record(e: &BytesStart<'_>, person_id: &str) -> TimetableResult<PlanRecord> {
    Ok(PlanRecord {
        person_id:     person_id.to_owned(),
        activity_type: attribute(e, "type")?,
        link_id:       attribute(e, "link")?,
        x:             number(e, "x")?,
        y:             number(e, "y")?,
        start_time:    attribute(e, "start_time")?,
    })
}

fn attribute(e: &BytesStart<'_>, name: &str) -> TimetableResult<Option<String>> {
    let Some(attr) = e.try_get_attribute(name).map_err(quick_xml::Error::from)? else {
        return Ok(None);
    };
    Ok(Some(attr.unescape_value()?.into_owned()))
}

fn required(e: &BytesStart<'_>, element: &'static str, name: &'static str) -> TimetableResult<String> {
    attribute(e, name)?.ok_or_else(|| TimetableError::MissingAttribute { element, attribute: name })
}

fn number(e: &BytesStart<'_>, name: &'static str) -> TimetableResult<Option<f64>> {
    attribute(e, name)?
        .map(|value| {
            value.trim().parse::<f64>().map_err(|_| TimetableError::InvalidNumber {
                element:   "activity",
                attribute: name,
                value,
            })
        })
        .transpose()
}
