//! Transport modes and the vehicle-id suffix convention.
//!
//! The simulation names each private vehicle after its owner plus a mode
//! marker: person `"1042"` drives `"1042:car"` and rides `"1042:bike"`.
//! Transit vehicles use unrelated ids (`"bus_12_3"`) and carry no marker.

use crate::{PersonId, VehicleId};

/// The mode encoded in a vehicle id's suffix.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum TransportMode {
    /// No recognised marker (transit fleets, freight, malformed ids).
    #[default]
    Other,
    /// Private car, the only mode the timeline tracks.
    Car,
    /// Private bicycle.
    Bike,
}

impl TransportMode {
    /// Separator between owner and mode marker in a vehicle id.
    pub const SEPARATOR: char = ':';

    /// The marker text after the separator, or `None` for [`TransportMode::Other`].
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            TransportMode::Car   => Some("car"),
            TransportMode::Bike  => Some("bike"),
            TransportMode::Other => None,
        }
    }

    /// Human-readable label, useful for log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Car   => "car",
            TransportMode::Bike  => "bike",
            TransportMode::Other => "other",
        }
    }

    /// Split `"<owner>:<mode>"` into its owner and mode.
    ///
    /// The owner is everything before the *last* separator.  Ids without a
    /// recognised marker yield `(None, Other)`.
    pub fn split_vehicle_id(vehicle: &VehicleId) -> (Option<PersonId>, TransportMode) {
        let Some((owner, marker)) = vehicle.as_str().rsplit_once(Self::SEPARATOR) else {
            return (None, TransportMode::Other);
        };
        let mode = match marker {
            "car"  => TransportMode::Car,
            "bike" => TransportMode::Bike,
            _      => return (None, TransportMode::Other),
        };
        (Some(PersonId::from(owner)), mode)
    }

    /// The mode marker of `vehicle`.
    #[inline]
    pub fn of_vehicle(vehicle: &VehicleId) -> TransportMode {
        Self::split_vehicle_id(vehicle).1
    }

    /// The vehicle id this mode would give to `person`.
    ///
    /// Returns `None` for [`TransportMode::Other`].
    pub fn vehicle_for(self, person: &PersonId) -> Option<VehicleId> {
        self.suffix()
            .map(|s| VehicleId(format!("{person}{}{s}", Self::SEPARATOR)))
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
