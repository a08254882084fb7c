//! Strongly-typed resource identifiers.
//!
//! Each ID serializes transparently as its backing value, so an
//! `EnrolmentKeyId(7)` is `7` on the wire and cannot be passed where a
//! `DnsZoneId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};


macro_rules! int_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            pub fn value(&self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

    };
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

    };
}

string_id! {
    /// Identifies an organisation.
    OrgId
}

string_id! {
    /// Identifies an enrolled (or enrolling) system.
    SystemId
}

string_id! {
    /// Stable tag reference that survives renames of the tag.
    TagRefId
}

int_id! {
    /// Identifies an enrolment key.
    EnrolmentKeyId
}

int_id! {
    /// Identifies a DNS zone.
    DnsZoneId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_ids_are_transparent() {
        let id = EnrolmentKeyId(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: DnsZoneId = serde_json::from_str("7").unwrap();
        assert_eq!(back, DnsZoneId(7));
        assert_eq!(back.to_string(), "7");
    }

    #[test]
    fn string_ids_are_transparent() {
        let id = SystemId::new("Ab3xZ");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""Ab3xZ""#);
        let back: OrgId = serde_json::from_str(r#""org-1""#).unwrap();
        assert_eq!(back.as_str(), "org-1");
    }
}
