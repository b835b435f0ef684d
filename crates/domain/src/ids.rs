//! Strongly typed identifiers.
//!
//! Every identifier wraps a 128-bit UUID. The all-zero value is the nil
//! sentinel meaning "unset"; it is what an empty string parses to and what
//! `Default` returns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::DomainError;

/// Length of the canonical `8-4-4-4-12` textual form.
const CANONICAL_LEN: usize = 36;

/// Parse the canonical textual form of an identifier.
///
/// Only the hyphenated `8-4-4-4-12` grouping is accepted; the simple, braced
/// and URN encodings that `Uuid::parse_str` would also take are rejected.
fn parse_canonical(s: &str) -> Result<Uuid, DomainError> {
    if s.is_empty() {
        return Ok(Uuid::nil());
    }
    if s.len() != CANONICAL_LEN {
        return Err(DomainError::invalid_id(format!("malformed identifier: {s}")));
    }
    Uuid::parse_str(s).map_err(|e| DomainError::invalid_id(format!("malformed identifier: {s}: {e}")))
}

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The nil sentinel.
            pub const fn nil() -> Self {
                Self(Uuid::nil())
            }

            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            /// Parse the canonical string form. An empty string yields the nil
            /// sentinel.
            pub fn parse(s: &str) -> Result<Self, DomainError> {
                parse_canonical(s).map(Self)
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_id!(CategoryId);
define_id!(LocationId);
define_id!(UserId);
