//! `tt-core` — foundational types for the timeline reconstruction crates.
//!
//! Every other `tt-*` crate depends on this one.  It has no `tt-*`
//! dependencies; externally it uses `thiserror` and `flate2`, plus optional `serde`.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `PersonId`, `VehicleId`, `LinkId`, `NodeId`           |
//! | [`geo`]         | `Coord` (projected x/y, NaN when unresolved)          |
//! | [`time`]        | day window constants, `HH:MM:SS` conversion           |
//! | [`transport`]   | `TransportMode`, vehicle-id mode suffixes             |
//! | [`input`]       | `InputFormat`, `open_input` (transparent `.gz`)       |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod input;
pub mod time;
pub mod transport;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Coord;
pub use ids::{LinkId, NodeId, PersonId, VehicleId, UNKNOWN};
pub use input::{InputFormat, is_gzip, open_input};
pub use time::{DAY_END_S, DAY_START_S, format_hms, parse_hms, try_parse_hms};
pub use transport::TransportMode;
