//! Configuration for the asmlint checks.
//!
//! Every threshold defaults to the documented Anthos Service Mesh
//! requirement. A TOML file can override any of them, pick a rule profile,
//! and set individual rules to `off`, `warn` or `error`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::asmlint::rules::{Rule, all_rules};
use crate::asmlint::types::RuleLevel;
use crate::asmlint::version::VersionTable;
use crate::error::{AsmError, ConfigError};

pub const LOGGING_SERVICE_VALUE: &str = "logging.googleapis.com/kubernetes";
pub const MONITORING_SERVICE_VALUE: &str = "monitoring.googleapis.com/kubernetes";
pub const SUPPORTED_RELEASE_CHANNELS: &[&str] = &["REGULAR", "RAPID", "STABLE"];
pub const MINIMUM_VCPUS_PER_NODE: u32 = 4;
pub const MINIMUM_TOTAL_VCPUS: u64 = 8;
pub const MINIMUM_NODE_COUNT: u64 = 4;

/// Named default assignment of levels to rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleProfile {
    /// Node-count warnings plus the cluster-wide vCPU minimum.
    #[default]
    Current,
    /// Master version gate with node-count errors, no vCPU aggregate.
    Legacy,
}

impl RuleProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for RuleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for a validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AsmConfig {
    /// Required value of `spec.loggingService`.
    pub logging_service: String,
    /// Required value of `spec.monitoringService`.
    pub monitoring_service: String,
    /// Allowed values of `spec.releaseChannel.channel`.
    pub release_channels: Vec<String>,
    /// Minimum dedicated vCPUs per node.
    pub min_vcpus_per_node: u32,
    /// Minimum vCPUs summed across all node pools of the batch.
    pub min_total_vcpus: u64,
    /// Minimum nodes per node pool.
    pub min_node_count: u64,
    /// Minimum supported master version per major.
    pub supported_versions: VersionTable,
    /// Default rule levels.
    pub profile: RuleProfile,
    /// Per-rule level overrides, keyed by rule code or rule name.
    pub rules: BTreeMap<String, RuleLevel>,
}

impl Default for AsmConfig {
    fn default() -> Self {
        Self {
            logging_service: LOGGING_SERVICE_VALUE.to_string(),
            monitoring_service: MONITORING_SERVICE_VALUE.to_string(),
            release_channels: SUPPORTED_RELEASE_CHANNELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_vcpus_per_node: MINIMUM_VCPUS_PER_NODE,
            min_total_vcpus: MINIMUM_TOTAL_VCPUS,
            min_node_count: MINIMUM_NODE_COUNT,
            supported_versions: VersionTable::default(),
            profile: RuleProfile::default(),
            rules: BTreeMap::new(),
        }
    }
}

impl AsmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AsmError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(Self::from_toml_str(&content)?)
    }

    pub fn with_profile(mut self, profile: RuleProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_min_total_vcpus(mut self, min: u64) -> Self {
        self.min_total_vcpus = min;
        self
    }

    pub fn with_min_vcpus_per_node(mut self, min: u32) -> Self {
        self.min_vcpus_per_node = min;
        self
    }

    pub fn with_min_node_count(mut self, min: u64) -> Self {
        self.min_node_count = min;
        self
    }

    pub fn with_supported_versions(mut self, table: VersionTable) -> Self {
        self.supported_versions = table;
        self
    }

    /// Override the level of one rule, by code or name.
    pub fn with_rule(mut self, rule: impl Into<String>, level: RuleLevel) -> Self {
        self.rules.insert(rule.into(), level);
        self
    }

    /// Disable a rule.
    pub fn ignore(self, rule: impl Into<String>) -> Self {
        self.with_rule(rule, RuleLevel::Off)
    }

    /// Level a rule runs at after profile and overrides.
    pub fn level_for(&self, rule: &dyn Rule) -> RuleLevel {
        self.rules
            .get(rule.code().as_str())
            .or_else(|| self.rules.get(rule.name()))
            .copied()
            .unwrap_or_else(|| rule.level(self.profile))
    }

    /// Check that overrides name real rules and allow-lists are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.release_channels.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "release_channels",
                reason: "at least one channel must be allowed".to_string(),
            });
        }
        let rules = all_rules();
        for key in self.rules.keys() {
            let known = rules
                .iter()
                .any(|r| r.code().as_str() == key || r.name() == key);
            if !known {
                return Err(ConfigError::UnknownRule(key.clone()));
            }
        }
        Ok(())
    }
}
