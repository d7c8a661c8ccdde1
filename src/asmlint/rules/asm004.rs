//! ASM004: mesh-id-label
//!
//! The cluster must carry the `mesh_id` label used for mesh membership.

use crate::asmlint::rules::{CLUSTER_ONLY, Rule, RuleContext, SimpleRule, expect_present};
use crate::asmlint::types::Finding;

const CODE: &str = "ASM004";
const NAME: &str = "mesh-id-label";
const DESCRIPTION: &str = "Clusters must set the mesh_id label.";
const PATH: &[&str] = &["spec", "labels", "mesh_id"];

pub fn rule() -> impl Rule {
    SimpleRule::new(CODE, NAME, DESCRIPTION, CLUSTER_ONLY, check)
}

fn check(ctx: &RuleContext<'_>) -> Option<Finding> {
    expect_present(ctx, PATH)
}
