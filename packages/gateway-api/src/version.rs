//! Message schema versioning.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The message schema version this crate speaks.
pub const MESSAGE_SCHEMA_VERSION: &str = "1.0";

/// Errors returned when parsing a [`SchemaVersion`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaVersionError {
    #[error("schema version must not be empty")]
    Empty,

    #[error("schema version must be <major>[.<minor>[.<patch>]], got: {0:?}")]
    Malformed(String),
}

/// A parsed `MessageSchemaVersion` value.
///
/// The wire form is `"<major>.<minor>"`, optionally followed by `".<patch>"`;
/// missing parts read as `0`, so `"1"` and `"1.0.0"` both mean `1.0`. Two
/// versions with the same major number are compatible: the gateway only adds
/// optional fields within a major.
///
/// `Display` omits a zero patch, so [`SchemaVersion::current`] renders as
/// [`MESSAGE_SCHEMA_VERSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SchemaVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: 0,
        }
    }

    pub const fn with_patch(mut self, patch: u32) -> Self {
        self.patch = patch;
        self
    }

    /// The version named by [`MESSAGE_SCHEMA_VERSION`].
    pub const fn current() -> Self {
        Self::new(1, 0)
    }

    /// True when `other` can be read by a peer that speaks `self`.
    pub fn is_compatible_with(&self, other: &SchemaVersion) -> bool {
        self.major == other.major
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

impl FromStr for SchemaVersion {
    type Err = SchemaVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SchemaVersionError::Empty);
        }

        let malformed = || SchemaVersionError::Malformed(s.to_string());
        let mut parts = s
            .split('.')
            .map(|part| part.parse::<u32>().map_err(|_| malformed()));

        let major = parts.next().unwrap_or_else(|| Err(malformed()))?;
        let minor = parts.next().unwrap_or(Ok(0))?;
        let patch = parts.next().unwrap_or(Ok(0))?;
        if parts.next().is_some() {
            return Err(malformed());
        }
        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}
