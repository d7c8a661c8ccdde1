//! ASM005: release-channel
//!
//! The cluster must be enrolled in a supported release channel.

use crate::asmlint::rules::{CLUSTER_ONLY, Rule, RuleContext, SimpleRule, expect_one_of};
use crate::asmlint::types::Finding;

const CODE: &str = "ASM005";
const NAME: &str = "release-channel";
const DESCRIPTION: &str = "Clusters must use the REGULAR, RAPID or STABLE release channel.";
const PATH: &[&str] = &["spec", "releaseChannel", "channel"];

pub fn rule() -> impl Rule {
    SimpleRule::new(CODE, NAME, DESCRIPTION, CLUSTER_ONLY, check)
}

fn check(ctx: &RuleContext<'_>) -> Option<Finding> {
    expect_one_of(ctx, PATH, &ctx.config.release_channels)
}
