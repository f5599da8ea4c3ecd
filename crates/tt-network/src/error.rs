//! Network-subsystem error type.

use thiserror::Error;

/// Errors produced by `tt-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("link {link}: invalid length {length_m}")]
    InvalidLength { link: String, length_m: f64 },

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

pub type NetworkResult<T> = Result<T, NetworkError>;
