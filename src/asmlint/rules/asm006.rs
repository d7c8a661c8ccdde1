//! ASM006: machine-type
//!
//! Nodes need enough dedicated vCPUs for the mesh sidecars and control
//! plane. A cluster without `nodeConfig` uses the default node pool and is
//! not checked; a node pool must declare its machine type.

use crate::asmlint::accessor::{FieldError, dotted};
use crate::asmlint::rules::{
    CLUSTER_AND_NODE_POOL, MACHINE_TYPE_PATH, Rule, RuleContext, SimpleRule, machine_type,
};
use crate::asmlint::types::{Finding, ResourceKind};

const CODE: &str = "ASM006";
const NAME: &str = "machine-type";
const DESCRIPTION: &str = "Nodes must use a machine type with enough dedicated vCPUs.";
const MACHINE_TYPE_DOCS: &str = "https://bit.ly/2V0KPdu";

pub fn rule() -> impl Rule {
    SimpleRule::new(CODE, NAME, DESCRIPTION, CLUSTER_AND_NODE_POOL, check)
}

fn check(ctx: &RuleContext<'_>) -> Option<Finding> {
    let (value, decoded) = match machine_type(ctx) {
        Ok(Some(found)) => found,
        Ok(None) if ctx.kind == ResourceKind::Cluster => return None,
        Ok(None) => {
            return Some(ctx.field_finding(FieldError::Missing {
                path: dotted(MACHINE_TYPE_PATH),
                locator: ctx.meta.to_string(),
            }));
        }
        Err(message) => return Some(ctx.finding(message)),
    };

    let min = ctx.config.min_vcpus_per_node;
    if decoded.is_sufficient(min) {
        return None;
    }
    Some(ctx.finding(format!(
        "insufficient vCPUs with machine type {:?} in {}. \
         Anthos Service Mesh requires a machine type that has at least {} vCPUs, such as e2-standard-4. \
         If the machine type for your cluster doesn't have at least {} vCPUs, \
         consider changing the machine type as described here {}",
        value, ctx.meta, min, min, MACHINE_TYPE_DOCS
    )))
}
