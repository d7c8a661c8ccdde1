//! Core types for the asmlint checks.
//!
//! - `Severity` - Finding severity (warning or error)
//! - `RuleCode` - Rule identifiers (e.g., "ASM001")
//! - `Finding` - A single reported rule outcome
//! - `ResourceKind` - Which rule subset a resource receives
//! - `RuleLevel` - Per-rule level in a profile or config override

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// API group shared by the Config Connector container resources.
pub const CONTAINER_API_GROUP: &str = "container.cnrm.cloud.google.com";
pub const CONTAINER_CLUSTER_KIND: &str = "ContainerCluster";
pub const CONTAINER_NODE_POOL_KIND: &str = "ContainerNodePool";

/// Severity of a finding.
///
/// Ordered from most severe to least severe: `Error > Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The prerequisite is not met; enabling the mesh is unsafe.
    Error,
    /// The configuration works but is below the recommended sizing.
    Warning,
}

impl Severity {
    /// Display text used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = |s: &Severity| match s {
            Severity::Error => 1,
            Severity::Warning => 0,
        };
        rank(self).cmp(&rank(other))
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Level a rule runs at. `Off` removes the rule from the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl RuleLevel {
    /// The severity findings are reported at, or `None` when disabled.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::Off => None,
            Self::Warn => Some(Severity::Warning),
            Self::Error => Some(Severity::Error),
        }
    }
}

/// A rule code identifier (e.g., "ASM001").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleCode(pub String);

impl RuleCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Findings raised before any rule ran (unreadable resource header).
    pub fn header() -> Self {
        Self::new("ASM000")
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RuleCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RuleCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One reported rule outcome. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// The rule that produced this finding.
    pub code: RuleCode,
    pub severity: Severity,
    /// Human-readable message, including the resource locator.
    pub message: String,
}

impl Finding {
    pub fn new(code: impl Into<RuleCode>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
        }
    }

    pub fn error(code: impl Into<RuleCode>, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message)
    }

    pub fn warning(code: impl Into<RuleCode>, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warning, message)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.severity, self.message)
    }
}

/// The rule subset a resource receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `ContainerCluster` in the container API group.
    Cluster,
    /// `ContainerNodePool` in the container API group.
    NodePool,
    /// Anything else; passed through without findings.
    Other,
}

impl ResourceKind {
    /// Classify by API group prefix and exact kind.
    pub fn classify(api_version: &str, kind: &str) -> Self {
        if !api_version.starts_with(CONTAINER_API_GROUP) {
            return Self::Other;
        }
        match kind {
            CONTAINER_CLUSTER_KIND => Self::Cluster,
            CONTAINER_NODE_POOL_KIND => Self::NodePool,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::NodePool => "node-pool",
            Self::Other => "other",
        }
    }

    /// Whether this kind takes part in mesh validation at all.
    pub fn is_mesh_relevant(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
