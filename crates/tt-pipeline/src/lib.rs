//! `tt-pipeline` — runs the three reconstruction stages end to end.
//!
//! # Stage order
//!
//! ```text
//! events ──▶ EventReducer ──▶ trips ──▶ stitch ──▶ episodes ──▶ ActivityMatcher ──▶ enriched
//!                 │                                                   ▲
//!                 └── activities, person ↔ vehicle          plans ────┘
//! ```
//!
//! [`Pipeline::run`] works on in-memory inputs and reports each stage to a
//! [`PipelineObserver`].  [`run_from_config`] loads every input named by a
//! [`PipelineConfig`], runs, and writes the configured output backend.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                      |
//! |------------|---------------------------------------------|
//! | `sqlite`   | Enables the `"sqlite"` output backend.      |
//! | `parquet`  | Enables the `"parquet"` output backend.     |
//! | `parallel` | Rayon stitching and matching.               |
//! | `fx-hash`  | FxHash maps in the event reducer.           |

pub mod config;
pub mod error;
pub mod observer;
pub mod pipeline;


pub use config::{OutputBackend, PipelineConfig, TopologySource};
pub use error::{PipelineError, PipelineResult};
pub use observer::{LoggingObserver, NoopObserver, PipelineObserver};
pub use pipeline::{Pipeline, PipelineOutput, PipelineReports, run_from_config};
