//! ASM001: logging-service
//!
//! Cloud Logging must be enabled with the Kubernetes logging backend.

use crate::asmlint::rules::{CLUSTER_ONLY, Rule, RuleContext, SimpleRule, expect_value};
use crate::asmlint::types::Finding;

const CODE: &str = "ASM001";
const NAME: &str = "logging-service";
const DESCRIPTION: &str = "Clusters must send logs to logging.googleapis.com/kubernetes.";
const PATH: &[&str] = &["spec", "loggingService"];

pub fn rule() -> impl Rule {
    SimpleRule::new(CODE, NAME, DESCRIPTION, CLUSTER_ONLY, check)
}

fn check(ctx: &RuleContext<'_>) -> Option<Finding> {
    expect_value(ctx, PATH, &ctx.config.logging_service)
}
