//! Strongly typed string identifier wrappers.
//!
//! Simulation logs identify persons, vehicles, links and nodes by free-form
//! strings (`"1042"`, `"1042:car"`, `"link_77"`).  Wrapping each in its own
//! type keeps a `LinkId` from being passed where a `NodeId` is expected.
//!
//! All IDs are `Clone + Ord + Hash` and implement `Borrow<str>`, so a
//! `HashMap<LinkId, _>` can be queried with a plain `&str`.

use std::borrow::Borrow;
use std::fmt;

/// Sentinel used for identifiers and activity types absent from the input.
pub const UNKNOWN: &str = "unknown";

/// Generate a typed ID wrapper around an owned `String`.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub String);

        impl $name {
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The `"unknown"` sentinel.
            #[inline]
            pub fn unknown() -> Self {
                Self(UNKNOWN.to_owned())
            }

            #[inline]
            pub fn is_unknown(&self) -> bool {
                self.0 == UNKNOWN
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            /// Returns the `"unknown"` sentinel so missing IDs stay visible.
            fn default() -> Self {
                Self::unknown()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            #[inline]
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// A simulated person (agent).
    pub struct PersonId;
}

string_id! {
    /// A simulated vehicle.  Private cars follow the `"<person>:car"` pattern;
    /// see [`TransportMode::split_vehicle_id`](crate::TransportMode::split_vehicle_id).
    pub struct VehicleId;
}

string_id! {
    /// A directed road-network link.
    pub struct LinkId;
}

string_id! {
    /// A road-network node.
    pub struct NodeId;
}
