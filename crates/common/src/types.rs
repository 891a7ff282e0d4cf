use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Placeholder carried by an entity until the store assigns its id.
            pub const UNASSIGNED: $name = $name(0);

            /// Wraps a raw store-assigned identifier.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id! {
    /// Identifier of a registered user.
    UserId
}

entity_id! {
    /// Identifier of a venue.
    VenueId
}

entity_id! {
    /// Identifier of a scheduled event.
    EventId
}

entity_id! {
    /// Identifier of a booking in the ledger.
    BookingId
}
