use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Row identifiers are assigned by the store and are always positive.
///
/// Zero, negative or non-numeric input never produces an id, which is how
/// lookups treat "no id" and "invalid id" uniformly as not found.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw store id; `None` for zero or negative values.
            pub fn new(raw: i64) -> Option<Self> {
                (raw > 0).then_some(Self(raw))
            }

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw: i64 = s
                    .trim()
                    .parse()
                    .map_err(|_| DomainError::invalid_id(format!("{}: {:?}", stringify!($name), s)))?;
                Self::new(raw).ok_or_else(|| {
                    DomainError::invalid_id(format!("{} must be positive: {}", stringify!($name), raw))
                })
            }
        }

        impl TryFrom<i64> for $name {
            type Error = DomainError;

            fn try_from(raw: i64) -> Result<Self, Self::Error> {
                Self::new(raw).ok_or_else(|| {
                    DomainError::invalid_id(format!("{} must be positive: {}", stringify!($name), raw))
                })
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Location hierarchy
define_id!(LocationId);

// Wells and boreholes
define_id!(WellId);
define_id!(BoreholeId);

// Parameter system
define_id!(ParameterGroupId);
define_id!(ParameterId);
define_id!(ParameterValueId);
