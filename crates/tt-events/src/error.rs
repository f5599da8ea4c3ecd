//! Event-decoding error type.

use thiserror::Error;

/// Errors produced while decoding or reducing an event log.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("{event_type} event missing required attribute `{attribute}`")]
    MissingAttribute {
        event_type: &'static str,
        attribute:  &'static str,
    },

    #[error("{event_type} event has invalid time {value:?}")]
    InvalidTime {
        event_type: &'static str,
        value:      String,
    },

    /// A decoding error promoted to fatal by `MalformedPolicy::Abort`.
    #[error("malformed event at record {record}: {source}")]
    Malformed {
        record: u64,
        #[source]
        source: Box<EventError>,
    },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EventResult<T> = Result<T, EventError>;
