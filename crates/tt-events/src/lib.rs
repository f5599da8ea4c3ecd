//! `tt-events` — reduce a simulation event log to trips and activities.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`event`]   | `RawEvent` (string boundary record), typed `Event` enum     |
//! | [`record`]  | `Trip`, `ActivityEvent`, and their open (in-progress) forms |
//! | [`reducer`] | `EventReducer`, `reduce`, `ReduceReport`, `ReducedLog`      |
//! | [`loader`]  | streaming CSV and MATSim XML readers, `read_events`         |
//! | [`error`]   | `EventError`, `EventResult<T>`                              |
//!
//! # Single pass, bounded state
//!
//! ```text
//! for event in log (non-decreasing time):
//!   boarding        → bind first occupant as driver of a car
//!   traffic enter   → open trip            (per vehicle)
//!   link enter      → accumulate distance  (per vehicle)
//!   traffic leave   → close trip → Trip
//!   activity start  → open activity        (per person)
//!   activity end    → close activity → ActivityEvent
//! end of log        → discard + count whatever is still open
//! ```
//!
//! The reducer holds only entities that are currently open, so memory is
//! bounded by concurrently active vehicles/persons, never by log length.

pub mod error;
pub mod event;
pub mod loader;
pub mod record;
pub mod reducer;

#[cfg(test)]
mod tests;

pub use error::{EventError, EventResult};
pub use event::{Event, RawEvent};
pub use loader::{
    EventStream, XmlEvents, read_events, read_events_csv, read_events_reader, read_events_xml,
    read_events_xml_reader,
};
pub use record::{ActivityEvent, OpenActivity, OpenTrip, Trip};
pub use reducer::{EventReducer, MalformedPolicy, ReduceReport, ReducedLog, ReducerConfig, reduce};
