//! Open string enums: known values are matched case-insensitively, anything
//! else is carried through verbatim in `Other`.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        $name:ident (default = $default:ident) {
            $( $variant:ident => $canonical:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $variant, )+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $canonical, )+
                    Self::Other(raw) => raw,
                }
            }

            /// Parses a raw cell; blank input yields the default.
            pub fn parse(raw: &str) -> Self {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Self::default();
                }
                $(
                    if trimmed.eq_ignore_ascii_case($canonical)
                        $( || trimmed.eq_ignore_ascii_case($alias) )*
                    {
                        return Self::$variant;
                    }
                )+
                Self::Other(trimmed.to_string())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::parse(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::parse(&raw)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum! {
    /// Order lifecycle status.
    OrderStatus (default = Pending) {
        Pending => "pending",
        InProgress => "in_progress" | "in progress" | "in-progress",
        Dispatched => "dispatched",
        Completed => "completed",
    }
}

open_enum! {
    /// Dispatch priority shared by orders and rakes.
    Priority (default = Normal) {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

open_enum! {
    /// Rake availability status.
    RakeStatus (default = Available) {
        Available => "Available",
        InTransit => "In Transit" | "in_transit" | "in-transit",
        Loading => "Loading",
        Maintenance => "Maintenance",
    }
}

impl RakeStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, RakeStatus::Available)
    }
}
