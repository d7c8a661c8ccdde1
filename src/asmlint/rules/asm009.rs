//! ASM009: total-vcpus
//!
//! The node pools of the batch together need a minimum number of vCPUs.
//! Each node pool adds `count * vCPUs per node` to the tally; the total is
//! compared once every resource was checked.
//!
//! Unreadable counts and machine types contribute nothing here; ASM006 and
//! ASM007 report them. When node-count is switched off, an unreadable count
//! is reported here instead, always as an error.

use crate::asmlint::config::{AsmConfig, RuleProfile};
use crate::asmlint::rules::{
    CLUSTER_AND_NODE_POOL, Rule, RuleContext, VcpuTally, asm007, machine_type, node_count,
};
use crate::asmlint::types::{Finding, ResourceKind, RuleCode, RuleLevel, Severity};

const CODE: &str = "ASM009";
const NAME: &str = "total-vcpus";
const DESCRIPTION: &str = "Node pools must provide the minimum total vCPUs for the mesh.";
const ADD_NODES_DOCS: &str = "https://bit.ly/2RnVL2T";

pub fn rule() -> impl Rule {
    TotalVcpus {
        code: RuleCode::new(CODE),
    }
}

struct TotalVcpus {
    code: RuleCode,
}

impl Rule for TotalVcpus {
    fn code(&self) -> &RuleCode {
        &self.code
    }

    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn applies_to(&self, kind: ResourceKind) -> bool {
        CLUSTER_AND_NODE_POOL.contains(&kind)
    }

    fn level(&self, profile: RuleProfile) -> RuleLevel {
        match profile {
            RuleProfile::Current => RuleLevel::Error,
            RuleProfile::Legacy => RuleLevel::Off,
        }
    }

    fn check(&self, ctx: &RuleContext<'_>, tally: &mut VcpuTally) -> Option<Finding> {
        tally.mesh_resources += 1;
        if ctx.kind != ResourceKind::NodePool {
            return None;
        }

        let count = match node_count(ctx) {
            Ok(found) => found.map(|(count, _)| count),
            Err(e) => {
                if ctx.config.level_for(&asm007::rule()) == RuleLevel::Off {
                    return Some(Finding::error(ctx.code.clone(), e.to_string()));
                }
                None
            }
        };
        let vcpus = machine_type(ctx)
            .ok()
            .flatten()
            .map(|(_, decoded)| u64::from(decoded.vcpus));

        match (count, vcpus) {
            (Some(count), Some(vcpus)) => {
                let added = count.saturating_mul(vcpus);
                tally.total = tally.total.saturating_add(added);
                tally.node_pools += 1;
                log::debug!("{} adds {} vCPUs ({} x {})", ctx.meta, added, count, vcpus);
            }
            _ => log::debug!("{} adds no vCPUs to the total", ctx.meta),
        }
        None
    }

    fn finish(&self, tally: &VcpuTally, config: &AsmConfig, severity: Severity) -> Option<Finding> {
        if tally.mesh_resources == 0 || tally.total >= config.min_total_vcpus {
            return None;
        }
        Some(Finding::new(
            self.code.clone(),
            severity,
            format!(
                "the total vCPU count is {}. Anthos Service Mesh requires at least {} vCPUs. \
                 If you need to add nodes, see {}",
                tally.total, config.min_total_vcpus, ADD_NODES_DOCS
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asmlint::rules::test_support::{CONFORMING_CLUSTER, CONFORMING_NODE_POOL, run_rule};

    fn pool(count_line: &str, machine_type: &str) -> String {
        CONFORMING_NODE_POOL
            .replace("nodeCount: 4", count_line)
            .replace("e2-standard-4", machine_type)
    }

    #[test]
    fn test_contribution() {
        let (finding, tally) = run_rule(&rule(), &pool("nodeCount: 2", "e2-standard-4"), &AsmConfig::default());
        assert!(finding.is_none());
        assert_eq!(tally.total, 8);
        assert_eq!(tally.node_pools, 1);
    }

    #[test]
    fn test_initial_node_count_contribution() {
        let (_, tally) = run_rule(&rule(), &pool("initialNodeCount: 3", "n1-standard-4"), &AsmConfig::default());
        assert_eq!(tally.total, 12);
    }

    #[test]
    fn test_shared_core_still_counts() {
        let (_, tally) = run_rule(&rule(), &pool("nodeCount: 3", "e2-micro"), &AsmConfig::default());
        assert_eq!(tally.total, 6);
    }

    #[test]
    fn test_unreadable_pool_adds_nothing() {
        let (finding, tally) = run_rule(&rule(), &pool("nodeCount: many", "e2-standard-4"), &AsmConfig::default());
        assert!(finding.is_none());
        assert_eq!(tally.total, 0);
        assert_eq!(tally.node_pools, 0);
        assert_eq!(tally.mesh_resources, 1);
    }

    #[test]
    fn test_unreadable_count_reported_when_node_count_is_off() {
        let config = AsmConfig::default().ignore("node-count");
        let (finding, tally) = run_rule(&rule(), &pool("nodeCount: many", "e2-standard-4"), &config);
        let finding = finding.unwrap();
        assert_eq!(finding.code.as_str(), "ASM009");
        assert_eq!(finding.severity, Severity::Error);
        assert!(finding.message.starts_with("unknown format of spec.nodeCount: many"));
        assert_eq!(tally.total, 0);
    }

    #[test]
    fn test_unreadable_count_error_ignores_own_level() {
        let config = AsmConfig::default()
            .ignore("ASM007")
            .with_rule("total-vcpus", RuleLevel::Warn);
        let (finding, _) = run_rule(&rule(), &pool("nodeCount: many", "e2-standard-4"), &config);
        assert_eq!(finding.unwrap().severity, Severity::Error);
    }

    #[test]
    fn test_cluster_is_seen_but_adds_nothing() {
        let (_, tally) = run_rule(&rule(), CONFORMING_CLUSTER, &AsmConfig::default());
        assert_eq!(tally.total, 0);
        assert_eq!(tally.mesh_resources, 1);
    }

    #[test]
    fn test_finish_threshold() {
        let rule = rule();
        let tally = VcpuTally {
            total: 8,
            node_pools: 1,
            mesh_resources: 2,
        };
        let exact = AsmConfig::default().with_min_total_vcpus(8);
        assert!(rule.finish(&tally, &exact, Severity::Error).is_none());

        let above = AsmConfig::default().with_min_total_vcpus(9);
        let finding = rule.finish(&tally, &above, Severity::Error).unwrap();
        assert_eq!(finding.severity, Severity::Error);
        assert_eq!(
            finding.message,
            "the total vCPU count is 8. Anthos Service Mesh requires at least 9 vCPUs. \
             If you need to add nodes, see https://bit.ly/2RnVL2T"
        );
    }

    #[test]
    fn test_finish_without_mesh_resources() {
        let tally = VcpuTally::default();
        assert!(rule().finish(&tally, &AsmConfig::default(), Severity::Error).is_none());
    }
}
