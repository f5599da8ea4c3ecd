use thiserror::Error;

use tt_events::EventError;
use tt_network::NetworkError;
use tt_output::OutputError;
use tt_timetable::TimetableError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline configuration error: {0}")]
    Config(String),

    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("network: {0}")]
    Network(#[from] NetworkError),

    #[error("events: {0}")]
    Events(#[from] EventError),

    #[error("timetable: {0}")]
    Timetable(#[from] TimetableError),

    #[error("output: {0}")]
    Output(#[from] OutputError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
