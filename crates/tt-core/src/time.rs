//! Time-of-day model.
//!
//! # Design
//!
//! All timestamps are `f64` seconds from midnight of the simulated day, as
//! emitted by the simulation.  Values beyond `DAY_END_S` are legal: agents
//! still travelling after midnight produce events at e.g. `90_000.0`.
//!
//! Plan files carry clock strings (`"07:45:00"`).  The hour field is not
//! bounded by 24 for the same reason, so `"25:30:00"` is `91_800` seconds.

use crate::error::{CoreError, CoreResult};

/// First second of the reconstructed day.
pub const DAY_START_S: f64 = 0.0;

/// Exclusive end of the reconstructed day (24 h).
pub const DAY_END_S: f64 = 86_400.0;

/// Parse an `HH:MM:SS` clock string into seconds from midnight.
///
/// Hours may exceed 23.  Anything that is not three colon-separated
/// non-negative integers with `MM` and `SS` below 60 is rejected.
pub fn try_parse_hms(s: &str) -> CoreResult<f64> {
    let invalid = || CoreError::InvalidTime(s.to_owned());
    let mut parts = s.trim().split(':');
    let mut field = || -> CoreResult<u32> {
        parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)
    };
    let (h, m, sec) = (field()?, field()?, field()?);
    if parts.next().is_some() || m >= 60 || sec >= 60 {
        return Err(invalid());
    }
    Ok(f64::from(h) * 3_600.0 + f64::from(m) * 60.0 + f64::from(sec))
}

/// [`try_parse_hms`] without the error detail.
pub fn parse_hms(s: &str) -> Option<f64> {
    try_parse_hms(s).ok()
}

/// Format seconds from midnight as `HH:MM:SS` (fractional seconds truncated).
///
/// Negative or non-finite input renders as `"--:--:--"`.
pub fn format_hms(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "--:--:--".to_owned();
    }
    let total = secs as u64;
    format!("{:02}:{:02}:{:02}", total / 3_600, (total % 3_600) / 60, total % 60)
}
