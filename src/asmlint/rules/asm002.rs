//! ASM002: monitoring-service
//!
//! Cloud Monitoring must be enabled with the Kubernetes monitoring backend.

use crate::asmlint::rules::{CLUSTER_ONLY, Rule, RuleContext, SimpleRule, expect_value};
use crate::asmlint::types::Finding;

const CODE: &str = "ASM002";
const NAME: &str = "monitoring-service";
const DESCRIPTION: &str = "Clusters must send metrics to monitoring.googleapis.com/kubernetes.";
const PATH: &[&str] = &["spec", "monitoringService"];

pub fn rule() -> impl Rule {
    SimpleRule::new(CODE, NAME, DESCRIPTION, CLUSTER_ONLY, check)
}

fn check(ctx: &RuleContext<'_>) -> Option<Finding> {
    expect_value(ctx, PATH, &ctx.config.monitoring_service)
}
