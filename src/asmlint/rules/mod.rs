//! Rule system for asmlint.
//!
//! Each prerequisite is a `Rule` registered under a stable code. Rules are
//! scoped to resource kinds, carry a default level per `RuleProfile`, and
//! produce at most one finding per resource. Rules that need state across
//! the batch receive the `VcpuTally` threaded through the pass and report in
//! `finish`.

use crate::asmlint::accessor::{self, FieldError};
use crate::asmlint::config::{AsmConfig, RuleProfile};
use crate::asmlint::machine_type::{self, MachineType};
use crate::asmlint::resource::{Resource, ResourceMeta};
use crate::asmlint::types::{Finding, ResourceKind, RuleCode, RuleLevel, Severity};

pub mod asm001;
pub mod asm002;
pub mod asm003;
pub mod asm004;
pub mod asm005;
pub mod asm006;
pub mod asm007;
pub mod asm008;
pub mod asm009;

pub const MACHINE_TYPE_PATH: &[&str] = &["spec", "nodeConfig", "machineType"];
pub const NODE_COUNT_PATH: &[&str] = &["spec", "nodeCount"];
pub const INITIAL_NODE_COUNT_PATH: &[&str] = &["spec", "initialNodeCount"];

/// Everything a rule sees while checking one resource.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub resource: &'a Resource,
    pub meta: &'a ResourceMeta,
    pub kind: ResourceKind,
    pub config: &'a AsmConfig,
    /// Code of the rule being run.
    pub code: &'a RuleCode,
    /// Severity the rule reports at in this pass.
    pub severity: Severity,
}

impl<'a> RuleContext<'a> {
    /// Build a finding for the running rule.
    pub fn finding(&self, message: impl Into<String>) -> Finding {
        Finding::new(self.code.clone(), self.severity, message)
    }

    pub fn field_finding(&self, err: FieldError) -> Finding {
        self.finding(err.to_string())
    }
}

/// Running vCPU capacity of one validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VcpuTally {
    /// vCPUs summed across node pools.
    pub total: u64,
    /// Node pools that contributed.
    pub node_pools: usize,
    /// Clusters and node pools seen, contributing or not.
    pub mesh_resources: usize,
}

/// A prerequisite check.
pub trait Rule: Send + Sync {
    /// Rule code (e.g., "ASM001").
    fn code(&self) -> &RuleCode;

    /// Human-readable rule name (e.g., "logging-service").
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Whether the rule runs on resources of this kind.
    fn applies_to(&self, kind: ResourceKind) -> bool;

    /// Default level under a profile.
    fn level(&self, profile: RuleProfile) -> RuleLevel;

    /// Check one resource.
    fn check(&self, ctx: &RuleContext<'_>, tally: &mut VcpuTally) -> Option<Finding>;

    /// Report on batch-wide state once every resource was checked.
    fn finish(
        &self,
        _tally: &VcpuTally,
        _config: &AsmConfig,
        _severity: Severity,
    ) -> Option<Finding> {
        None
    }
}

/// A stateless rule built from a check function.
pub struct SimpleRule<F>
where
    F: Fn(&RuleContext<'_>) -> Option<Finding> + Send + Sync,
{
    code: RuleCode,
    name: String,
    description: String,
    scope: &'static [ResourceKind],
    current: RuleLevel,
    legacy: RuleLevel,
    check_fn: F,
}

impl<F> SimpleRule<F>
where
    F: Fn(&RuleContext<'_>) -> Option<Finding> + Send + Sync,
{
    pub fn new(
        code: impl Into<RuleCode>,
        name: impl Into<String>,
        description: impl Into<String>,
        scope: &'static [ResourceKind],
        check_fn: F,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: description.into(),
            scope,
            current: RuleLevel::Error,
            legacy: RuleLevel::Error,
            check_fn,
        }
    }

    /// Set the default levels for the current and legacy profiles.
    pub fn with_levels(mut self, current: RuleLevel, legacy: RuleLevel) -> Self {
        self.current = current;
        self.legacy = legacy;
        self
    }
}

impl<F> Rule for SimpleRule<F>
where
    F: Fn(&RuleContext<'_>) -> Option<Finding> + Send + Sync,
{
    fn code(&self) -> &RuleCode {
        &self.code
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn applies_to(&self, kind: ResourceKind) -> bool {
        self.scope.contains(&kind)
    }

    fn level(&self, profile: RuleProfile) -> RuleLevel {
        match profile {
            RuleProfile::Current => self.current,
            RuleProfile::Legacy => self.legacy,
        }
    }

    fn check(&self, ctx: &RuleContext<'_>, _tally: &mut VcpuTally) -> Option<Finding> {
        (self.check_fn)(ctx)
    }
}

pub const CLUSTER_ONLY: &[ResourceKind] = &[ResourceKind::Cluster];
pub const NODE_POOL_ONLY: &[ResourceKind] = &[ResourceKind::NodePool];
pub const CLUSTER_AND_NODE_POOL: &[ResourceKind] = &[ResourceKind::Cluster, ResourceKind::NodePool];

/// All registered rules, in evaluation order.
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(asm001::rule()),
        Box::new(asm002::rule()),
        Box::new(asm003::rule()),
        Box::new(asm004::rule()),
        Box::new(asm005::rule()),
        Box::new(asm006::rule()),
        Box::new(asm007::rule()),
        Box::new(asm008::rule()),
        Box::new(asm009::rule()),
    ]
}

/// Rule definition for documentation/introspection.
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    pub code: RuleCode,
    pub name: String,
    pub description: String,
    pub current: RuleLevel,
    pub legacy: RuleLevel,
}

pub fn rule_definitions() -> Vec<RuleDefinition> {
    all_rules()
        .iter()
        .map(|r| RuleDefinition {
            code: r.code().clone(),
            name: r.name().to_string(),
            description: r.description().to_string(),
            current: r.level(RuleProfile::Current),
            legacy: r.level(RuleProfile::Legacy),
        })
        .collect()
}

// ============================================================================
// Shared check helpers
// ============================================================================

/// The field must equal `expected`.
pub fn expect_value(ctx: &RuleContext<'_>, path: &[&str], expected: &str) -> Option<Finding> {
    let value = match accessor::lookup_value(ctx.resource, ctx.meta, path) {
        Ok(value) => value,
        Err(e) => return Some(ctx.field_finding(e)),
    };
    if value == expected {
        return None;
    }
    Some(ctx.finding(unsupported_value(ctx, path, expected, &value)))
}

/// The field must be present.
pub fn expect_present(ctx: &RuleContext<'_>, path: &[&str]) -> Option<Finding> {
    accessor::lookup(ctx.resource, ctx.meta, path)
        .err()
        .map(|e| ctx.field_finding(e))
}

/// The field must be one of `allowed`.
pub fn expect_one_of(ctx: &RuleContext<'_>, path: &[&str], allowed: &[String]) -> Option<Finding> {
    let value = match accessor::lookup_value(ctx.resource, ctx.meta, path) {
        Ok(value) => value,
        Err(e) => return Some(ctx.field_finding(e)),
    };
    if allowed.iter().any(|a| *a == value) {
        return None;
    }
    Some(ctx.finding(unsupported_value(ctx, path, &allowed.join(","), &value)))
}

fn unsupported_value(ctx: &RuleContext<'_>, path: &[&str], expected: &str, actual: &str) -> String {
    format!(
        "unsupported {} value in {}, expected: {}, actual: {}",
        accessor::dotted(path),
        ctx.meta,
        expected,
        actual
    )
}

/// Node count of a node pool, from `nodeCount` or else `initialNodeCount`.
///
/// Both fields absent is `Ok(None)`.
pub fn node_count(ctx: &RuleContext<'_>) -> Result<Option<(u64, &'static [&'static str])>, FieldError> {
    for path in [NODE_COUNT_PATH, INITIAL_NODE_COUNT_PATH] {
        let Some(value) = accessor::lookup_optional(ctx.resource, ctx.meta, path)? else {
            continue;
        };
        let count = value.parse::<u64>().map_err(|_| FieldError::MalformedValue {
            path: accessor::dotted(path),
            value: value.clone(),
            locator: ctx.meta.to_string(),
        })?;
        return Ok(Some((count, path)));
    }
    Ok(None)
}

/// Machine type of the resource, decoded.
///
/// An absent field is `Ok(None)`; callers decide whether that is allowed.
pub fn machine_type(ctx: &RuleContext<'_>) -> Result<Option<(String, MachineType)>, String> {
    let value = match accessor::lookup_optional(ctx.resource, ctx.meta, MACHINE_TYPE_PATH) {
        Ok(Some(value)) => value,
        Ok(None) => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };
    match machine_type::decode(&value) {
        Ok(decoded) => Ok(Some((value, decoded))),
        Err(e) => Err(format!("{} in {}", e, ctx.meta)),
    }
}
