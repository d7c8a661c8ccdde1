//! ASM003: workload-identity
//!
//! Workload Identity must be enabled. Only presence of the identity
//! namespace is checked.

use crate::asmlint::rules::{CLUSTER_ONLY, Rule, RuleContext, SimpleRule, expect_present};
use crate::asmlint::types::Finding;

const CODE: &str = "ASM003";
const NAME: &str = "workload-identity";
const DESCRIPTION: &str = "Clusters must set spec.workloadIdentity.identityNamespace.";
const PATH: &[&str] = &["spec", "workloadIdentity", "identityNamespace"];

pub fn rule() -> impl Rule {
    SimpleRule::new(CODE, NAME, DESCRIPTION, CLUSTER_ONLY, check)
}

fn check(ctx: &RuleContext<'_>) -> Option<Finding> {
    expect_present(ctx, PATH)
}
