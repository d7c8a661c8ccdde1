//! ASM007: node-count
//!
//! Node pools should have enough nodes. `spec.nodeCount` is read first and
//! `spec.initialNodeCount` is the fallback; a pool declaring neither is not
//! reported. Only the below-minimum finding follows the rule level; a count
//! that cannot be read is always an error.

use crate::asmlint::accessor::dotted;
use crate::asmlint::rules::{NODE_POOL_ONLY, Rule, RuleContext, SimpleRule, node_count};
use crate::asmlint::types::{Finding, RuleLevel};

const CODE: &str = "ASM007";
const NAME: &str = "node-count";
const DESCRIPTION: &str = "Node pools should have at least the minimum number of nodes.";

pub fn rule() -> impl Rule {
    SimpleRule::new(CODE, NAME, DESCRIPTION, NODE_POOL_ONLY, check)
        .with_levels(RuleLevel::Warn, RuleLevel::Error)
}

fn check(ctx: &RuleContext<'_>) -> Option<Finding> {
    let (count, path) = match node_count(ctx) {
        Ok(Some(found)) => found,
        Ok(None) => return None,
        Err(e) => return Some(Finding::error(ctx.code.clone(), e.to_string())),
    };

    let min = ctx.config.min_node_count;
    if count >= min {
        return None;
    }
    Some(ctx.finding(format!(
        "{} is {} in {}. Anthos Service Mesh requires at least {} nodes per node pool",
        dotted(path),
        count,
        ctx.meta,
        min
    )))
}
