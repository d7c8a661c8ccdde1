//! ASM008: master-version
//!
//! The master must run a GKE version the mesh supports. Only the legacy
//! profile enables this rule by default.

use crate::asmlint::accessor::lookup_value;
use crate::asmlint::rules::{CLUSTER_ONLY, Rule, RuleContext, SimpleRule};
use crate::asmlint::types::{Finding, RuleLevel};
use crate::asmlint::version::GkeVersion;

const CODE: &str = "ASM008";
const NAME: &str = "master-version";
const DESCRIPTION: &str = "Clusters must run a supported GKE master version.";
const PATH: &[&str] = &["spec", "minMasterVersion"];

pub fn rule() -> impl Rule {
    SimpleRule::new(CODE, NAME, DESCRIPTION, CLUSTER_ONLY, check)
        .with_levels(RuleLevel::Off, RuleLevel::Error)
}

fn check(ctx: &RuleContext<'_>) -> Option<Finding> {
    let value = match lookup_value(ctx.resource, ctx.meta, PATH) {
        Ok(value) => value,
        Err(e) => return Some(ctx.field_finding(e)),
    };
    let version = match GkeVersion::parse(&value) {
        Ok(version) => version,
        Err(e) => return Some(ctx.finding(format!("{} in {}", e, ctx.meta))),
    };

    let table = &ctx.config.supported_versions;
    if table.is_supported(&version) {
        return None;
    }
    Some(ctx.finding(format!(
        "unsupported master version {} in {}, supported: {}",
        version,
        ctx.meta,
        table.describe()
    )))
}
