//! Opaque integer identifiers.
//!
//! Records are owned by external storage; the engine only ever holds their
//! ids, never live references.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw id.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw id.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a location node in the routing graph.
    NodeId,
    "node"
);
define_id!(
    /// Identifier of a package.
    PackageId,
    "package"
);
define_id!(
    /// Identifier of a vehicle (container).
    VehicleId,
    "vehicle"
);
define_id!(
    /// Identifier of a pickup or delivery task.
    TaskId,
    "task"
);
define_id!(
    /// Identifier of a planned route.
    RouteId,
    "route"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(NodeId::new(7).to_string(), "node#7");
        assert_eq!(TaskId::new(3).to_string(), "task#3");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&PackageId::new(42)).expect("serialize");
        assert_eq!(json, "42");
        let back: PackageId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.get(), 42);
    }
}
