use thiserror::Error;

use tt_core::VehicleId;

#[derive(Debug, Error)]
pub enum TimetableError {
    /// Upstream produced two trips for one vehicle whose intervals intersect.
    #[error(
        "vehicle {vehicle}: trip starting at {next_start}s overlaps previous trip ending at {prev_end}s"
    )]
    OverlappingTrips {
        vehicle:    VehicleId,
        prev_end:   f64,
        next_start: f64,
    },

    /// A trip with `t_end <= t_start` (or a non-finite bound).
    #[error("vehicle {vehicle}: invalid trip interval [{t_start}, {t_end})")]
    InvalidTrip {
        vehicle: VehicleId,
        t_start: f64,
        t_end:   f64,
    },

    #[error("<{element}> missing required attribute `{attribute}`")]
    MissingAttribute {
        element:   &'static str,
        attribute: &'static str,
    },

    #[error("<{element}> attribute `{attribute}` is not a number: {value:?}")]
    InvalidNumber {
        element:   &'static str,
        attribute: &'static str,
        value:     String,
    },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TimetableResult<T> = Result<T, TimetableError>;
