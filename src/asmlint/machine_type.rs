//! Compute Engine machine-type decoding.
//!
//! Machine types come in several lexical families. Family and tier tokens
//! can themselves contain `custom` or a size word, so the families are tried
//! in a fixed order and the first matching predicate decides the extractor.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// `custom-4-8192` (N1 custom types without a family prefix).
static LEGACY_CUSTOM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)-(\d+)-(\d+)").unwrap());
/// `n2-custom-6-12288`, `e2-custom-4-8192`, ...
static CUSTOM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)-(\w+)-(\d+)-(\d+)").unwrap());
/// `n1-standard-4`, `e2-highcpu-16`, ...
static PREDEFINED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)-(\w+)-(\d+)").unwrap());

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineTypeError {
    #[error("invalid machineType format: {value}")]
    InvalidFormat { value: String },
}

/// Lexical family a machine type was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineFamily {
    LegacyCustom,
    Custom,
    SharedCore,
    Predefined,
}

impl MachineFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LegacyCustom => "custom-legacy",
            Self::Custom => "custom",
            Self::SharedCore => "shared-core",
            Self::Predefined => "predefined",
        }
    }
}

impl fmt::Display for MachineFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decoded machine type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineType {
    pub family: MachineFamily,
    /// vCPUs per node.
    pub vcpus: u32,
    /// Shared-core types never satisfy a vCPU minimum.
    pub shared_core: bool,
}

impl MachineType {
    /// Whether a node of this type has at least `min_vcpus` dedicated vCPUs.
    pub fn is_sufficient(&self, min_vcpus: u32) -> bool {
        !self.shared_core && self.vcpus >= min_vcpus
    }
}

type Predicate = fn(&str) -> bool;
type Extractor = fn(&str) -> Result<MachineType, MachineTypeError>;

/// Families in priority order. Reordering these changes results.
pub const FAMILIES: &[(MachineFamily, Predicate, Extractor)] = &[
    (MachineFamily::LegacyCustom, is_legacy_custom, decode_legacy_custom),
    (MachineFamily::Custom, is_custom, decode_custom),
    (MachineFamily::SharedCore, is_shared_core, decode_shared_core),
    (MachineFamily::Predefined, is_predefined, decode_predefined),
];

/// Decode a machine type string into its vCPU count.
pub fn decode(value: &str) -> Result<MachineType, MachineTypeError> {
    let value = value.trim();
    for (family, matches, extract) in FAMILIES {
        if matches(value) {
            log::trace!("machine type {:?} decoded as {}", value, family);
            return extract(value);
        }
    }
    Err(invalid(value))
}

fn is_legacy_custom(value: &str) -> bool {
    value.starts_with("custom")
}

fn is_custom(value: &str) -> bool {
    value.contains("custom")
}

fn is_shared_core(value: &str) -> bool {
    ["micro", "small", "medium"]
        .iter()
        .any(|size| value.contains(size))
}

fn is_predefined(_value: &str) -> bool {
    true
}

fn decode_legacy_custom(value: &str) -> Result<MachineType, MachineTypeError> {
    capture_vcpus(&LEGACY_CUSTOM, value, 2).map(|vcpus| MachineType {
        family: MachineFamily::LegacyCustom,
        vcpus,
        shared_core: false,
    })
}

fn decode_custom(value: &str) -> Result<MachineType, MachineTypeError> {
    capture_vcpus(&CUSTOM, value, 3).map(|vcpus| MachineType {
        family: MachineFamily::Custom,
        vcpus,
        shared_core: false,
    })
}

fn decode_shared_core(value: &str) -> Result<MachineType, MachineTypeError> {
    let vcpus = if value.starts_with("g1-") {
        1
    } else if value.starts_with("e2-") {
        2
    } else {
        0
    };
    Ok(MachineType {
        family: MachineFamily::SharedCore,
        vcpus,
        shared_core: true,
    })
}

fn decode_predefined(value: &str) -> Result<MachineType, MachineTypeError> {
    capture_vcpus(&PREDEFINED, value, 3).map(|vcpus| MachineType {
        family: MachineFamily::Predefined,
        vcpus,
        shared_core: false,
    })
}

fn capture_vcpus(pattern: &Regex, value: &str, group: usize) -> Result<u32, MachineTypeError> {
    pattern
        .captures(value)
        .and_then(|caps| caps.get(group))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(|| invalid(value))
}

fn invalid(value: &str) -> MachineTypeError {
    MachineTypeError::InvalidFormat {
        value: value.to_string(),
    }
}
