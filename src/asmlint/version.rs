//! GKE release version decoding (`MAJOR.MINOR.PATCH-gke.BUILD`).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static GKE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)-gke\.(\d+)$").unwrap());

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version format: {value}")]
    InvalidFormat { value: String },
}

/// A decoded GKE version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GkeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: u32,
}

impl GkeVersion {
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        let value = value.trim();
        let invalid = || VersionError::InvalidFormat {
            value: value.to_string(),
        };
        let caps = GKE_VERSION.captures(value).ok_or_else(invalid)?;
        let component = |i: usize| -> Result<u32, VersionError> {
            caps.get(i)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(invalid)
        };
        Ok(Self {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            build: component(4)?,
        })
    }
}

impl fmt::Display for GkeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}-gke.{}",
            self.major, self.minor, self.patch, self.build
        )
    }
}

/// Lowest supported (MINOR, BUILD) within one major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFloor {
    pub minor: u32,
    pub build: u32,
}

/// Minimum supported version per major.
///
/// Serialized as a map from the major number (as a string key, so it
/// round-trips through TOML) to its floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTable(BTreeMap<String, VersionFloor>);

impl VersionTable {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with_floor(mut self, major: u32, minor: u32, build: u32) -> Self {
        self.0.insert(major.to_string(), VersionFloor { minor, build });
        self
    }

    pub fn floor(&self, major: u32) -> Option<VersionFloor> {
        self.0.get(&major.to_string()).copied()
    }

    /// Patch level is not part of the comparison.
    pub fn is_supported(&self, version: &GkeVersion) -> bool {
        match self.floor(version.major) {
            Some(floor) => {
                version.minor > floor.minor
                    || (version.minor == floor.minor && version.build >= floor.build)
            }
            None => false,
        }
    }

    /// Human-readable floors, e.g. `1.16.x-gke.401`.
    pub fn describe(&self) -> String {
        let mut floors: Vec<(u32, VersionFloor)> = self
            .0
            .iter()
            .filter_map(|(major, floor)| major.parse().ok().map(|m| (m, *floor)))
            .collect();
        floors.sort_by_key(|(major, _)| *major);
        floors
            .iter()
            .map(|(major, floor)| format!("{}.{}.x-gke.{}", major, floor.minor, floor.build))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for VersionTable {
    fn default() -> Self {
        Self::new().with_floor(1, 16, 401)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let v = GkeVersion::parse("1.16.13-gke.401").unwrap();
        assert_eq!(
            v,
            GkeVersion {
                major: 1,
                minor: 16,
                patch: 13,
                build: 401
            }
        );
        assert_eq!(v.to_string(), "1.16.13-gke.401");
    }

    #[test]
    fn test_parse_invalid() {
        for value in ["1.16", "1.16.13", "1.16.13-gke", "latest", "v1.16.13-gke.1", "1.16.13-gke.x"] {
            assert!(GkeVersion::parse(value).is_err(), "{value} should not parse");
        }
        let overflow = GkeVersion::parse("1.16.13-gke.99999999999");
        assert!(matches!(overflow, Err(VersionError::InvalidFormat { .. })));
    }

    #[test]
    fn test_supported_range() {
        let table = VersionTable::default();
        let supported = |s: &str| table.is_supported(&GkeVersion::parse(s).unwrap());
        assert!(supported("1.16.13-gke.401"));
        assert!(supported("1.16.0-gke.500"));
        assert!(supported("1.17.1-gke.1"));
        assert!(!supported("1.16.13-gke.400"));
        assert!(!supported("1.15.12-gke.9999"));
        assert!(!supported("2.0.0-gke.1"));
    }

    #[test]
    fn test_describe() {
        let table = VersionTable::new().with_floor(2, 1, 0).with_floor(1, 16, 401);
        assert_eq!(table.describe(), "1.16.x-gke.401, 2.1.x-gke.0");
    }
}
