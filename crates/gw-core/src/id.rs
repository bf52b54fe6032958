//! Strongly-typed migration identity.

use crate::error::{CoreError, CoreResult};
use std::fmt;

/// Strongly-typed wrapper for a migration identity.
///
/// The identity is the leading digit run of a migration file name, by
/// convention a UTC timestamp such as `20221211085545`. Identities compare
/// numerically, so `007` and `7` are the same identity and `2` orders before
/// `10` regardless of zero padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MigrationId(u64);

impl MigrationId {
    /// Parse an identity from its textual form.
    ///
    /// The text must be one or more ASCII digits and fit in a `u64`.
    pub fn parse(text: &str) -> CoreResult<Self> {
        if text.is_empty() {
            return Err(CoreError::InvalidIdentity {
                text: text.to_string(),
                reason: "identity is empty".to_string(),
            });
        }
        if !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidIdentity {
                text: text.to_string(),
                reason: "identity must contain only digits".to_string(),
            });
        }
        let value = text.parse::<u64>().map_err(|_| CoreError::InvalidIdentity {
            text: text.to_string(),
            reason: "identity exceeds the supported numeric range".to_string(),
        })?;
        Ok(Self(value))
    }

    /// Return the identity as its numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MigrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MigrationId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl serde::Serialize for MigrationId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for MigrationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MigrationId::parse(&s).map_err(serde::de::Error::custom)
    }
}
