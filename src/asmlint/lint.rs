//! Main validation orchestration for asmlint.
//!
//! Classifies each resource, runs the enabled rules that apply to its kind
//! in registry order, then lets batch-wide rules report on the tally.

use crate::asmlint::config::AsmConfig;
use crate::asmlint::parser::parse_resources;
use crate::asmlint::resource::Resource;
use crate::asmlint::rules::{Rule, RuleContext, VcpuTally, all_rules};
use crate::asmlint::types::{Finding, ResourceKind, RuleCode, Severity};
use crate::error::Result;

/// Findings of one validation pass, partitioned by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Error findings, in batch order.
    pub errors: Vec<Finding>,
    /// Warning findings, in batch order.
    pub warnings: Vec<Finding>,
    /// Number of resources in the batch.
    pub resources_analyzed: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finding to the list of its severity.
    pub fn push(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }

    /// No findings at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// No error findings.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get the maximum severity in the results.
    pub fn max_severity(&self) -> Option<Severity> {
        if self.has_errors() {
            Some(Severity::Error)
        } else if self.has_warnings() {
            Some(Severity::Warning)
        } else {
            None
        }
    }

    /// Check if the results should cause a non-zero exit.
    pub fn should_fail(&self, threshold: Severity) -> bool {
        self.max_severity().is_some_and(|max| max >= threshold)
    }

    /// All findings, warnings first.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.warnings.iter().chain(self.errors.iter())
    }
}

/// Validate a batch of resources.
pub fn lint(resources: &[Resource], config: &AsmConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.resources_analyzed = resources.len();

    let active = active_rules(config);
    let mut tally = VcpuTally::default();

    for resource in resources {
        let meta = match resource.meta() {
            Ok(meta) => meta,
            Err(e) => {
                log::warn!("{}", e);
                result.push(Finding::error(RuleCode::header(), e.to_string()));
                continue;
            }
        };

        let kind = ResourceKind::classify(&meta.api_version, &meta.kind);
        log::debug!("{} classified as {}", meta, kind);
        if !kind.is_mesh_relevant() {
            continue;
        }

        for (rule, severity) in &active {
            if !rule.applies_to(kind) {
                continue;
            }
            log::trace!("running {} on {}", rule.code(), meta);
            let ctx = RuleContext {
                resource,
                meta: &meta,
                kind,
                config,
                code: rule.code(),
                severity: *severity,
            };
            if let Some(finding) = rule.check(&ctx, &mut tally) {
                result.push(finding);
            }
        }
    }

    for (rule, severity) in &active {
        if let Some(finding) = rule.finish(&tally, config, *severity) {
            result.push(finding);
        }
    }

    log::info!(
        "validated {} resources ({} vCPUs across {} node pools): {} warning(s), {} error(s)",
        result.resources_analyzed,
        tally.total,
        tally.node_pools,
        result.warnings.len(),
        result.errors.len()
    );
    result
}

/// Parse a YAML batch and validate it.
pub fn lint_content(content: &str, config: &AsmConfig) -> Result<ValidationResult> {
    let resources = parse_resources(content, "<stdin>")?;
    Ok(lint(&resources, config))
}

/// Registered rules that are not switched off, with their severity.
fn active_rules(config: &AsmConfig) -> Vec<(Box<dyn Rule>, Severity)> {
    all_rules()
        .into_iter()
        .filter_map(|rule| {
            let severity = config.level_for(rule.as_ref()).severity();
            if severity.is_none() {
                log::debug!("rule {} ({}) is off", rule.code(), rule.name());
            }
            severity.map(|s| (rule, s))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asmlint::config::RuleProfile;
    use crate::asmlint::rules::test_support::{CONFORMING_CLUSTER, CONFORMING_NODE_POOL};
    use crate::asmlint::types::RuleLevel;
    use proptest::prelude::*;

    fn batch(docs: &[&str]) -> String {
        docs.join("\n---\n")
    }

    fn codes(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.code.as_str()).collect()
    }

    const CONFIG_MAP: &str = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
data:
  machineType: f1-micro
"#;

    #[test]
    fn test_conforming_batch_is_clean() {
        let yaml = batch(&[CONFORMING_CLUSTER, CONFORMING_NODE_POOL]);
        let result = lint_content(&yaml, &AsmConfig::default()).unwrap();
        assert!(result.is_clean(), "{result:?}");
        assert_eq!(result.resources_analyzed, 2);
    }

    #[test]
    fn test_unrelated_resources_pass_through() {
        let result = lint_content(CONFIG_MAP, &AsmConfig::default()).unwrap();
        assert!(result.is_clean());
        assert_eq!(result.resources_analyzed, 1);
    }

    #[test]
    fn test_other_api_group_ignored() {
        let yaml = CONFORMING_NODE_POOL
            .replace("container.cnrm.cloud.google.com", "example.com")
            .replace("e2-standard-4", "f1-micro");
        let result = lint_content(&yaml, &AsmConfig::default()).unwrap();
        assert!(result.is_clean());
    }

    #[test]
    fn test_missing_workload_identity_single_error() {
        let cluster = CONFORMING_CLUSTER.replace(
            "  workloadIdentity:\n    identityNamespace: my-project.svc.id.goog\n",
            "",
        );
        let yaml = batch(&[&cluster, CONFORMING_NODE_POOL]);
        let result = lint_content(&yaml, &AsmConfig::default()).unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(result.errors.len(), 1);
        let message = &result.errors[0].message;
        assert!(message.contains("spec.workloadIdentity.identityNamespace"));
        assert!(message.contains("asm-cluster"));
    }

    #[test]
    fn test_unsupported_channel_single_error() {
        let cluster = CONFORMING_CLUSTER.replace("channel: REGULAR", "channel: BETA");
        let yaml = batch(&[&cluster, CONFORMING_NODE_POOL]);
        let result = lint_content(&yaml, &AsmConfig::default()).unwrap();
        assert_eq!(result.errors.len(), 1);
        let message = &result.errors[0].message;
        for word in ["REGULAR", "RAPID", "STABLE", "BETA"] {
            assert!(message.contains(word), "{word} not in {message}");
        }
    }

    #[test]
    fn test_total_vcpus_aggregate() {
        let pool = CONFORMING_NODE_POOL.replace("nodeCount: 4", "nodeCount: 2");
        let yaml = batch(&[CONFORMING_CLUSTER, &pool]);

        let at_minimum = lint_content(&yaml, &AsmConfig::default().with_min_node_count(1)).unwrap();
        assert!(at_minimum.is_clean(), "{at_minimum:?}");

        let config = AsmConfig::default().with_min_node_count(1).with_min_total_vcpus(9);
        let result = lint_content(&yaml, &config).unwrap();
        assert_eq!(codes(&result.errors), vec!["ASM009"]);
        assert!(result.errors[0].message.starts_with("the total vCPU count is 8."));
    }

    #[test]
    fn test_cluster_without_pools_fails_total() {
        let result = lint_content(CONFORMING_CLUSTER, &AsmConfig::default()).unwrap();
        assert_eq!(codes(&result.errors), vec!["ASM009"]);
        assert!(result.errors[0].message.starts_with("the total vCPU count is 0."));
    }

    #[test]
    fn test_batch_findings_come_last() {
        let cluster = CONFORMING_CLUSTER.replace("channel: REGULAR", "channel: BETA");
        let pool = CONFORMING_NODE_POOL.replace("e2-standard-4", "n1-standard-1");
        let yaml = batch(&[&cluster, &pool]);
        let result = lint_content(&yaml, &AsmConfig::default()).unwrap();
        assert_eq!(codes(&result.errors), vec!["ASM005", "ASM006", "ASM009"]);
    }

    #[test]
    fn test_node_count_warning_only() {
        let pool = CONFORMING_NODE_POOL
            .replace("nodeCount: 4", "nodeCount: 3")
            .replace("e2-standard-4", "e2-standard-8");
        let yaml = batch(&[CONFORMING_CLUSTER, &pool]);
        let result = lint_content(&yaml, &AsmConfig::default()).unwrap();
        assert!(result.passed());
        assert!(!result.is_clean());
        assert_eq!(codes(&result.warnings), vec!["ASM007"]);
        assert!(result.should_fail(Severity::Warning));
        assert!(!result.should_fail(Severity::Error));
    }

    #[test]
    fn test_legacy_profile() {
        let cluster = CONFORMING_CLUSTER.replace("1.16.13-gke.401", "1.15.9-gke.24");
        let pool = CONFORMING_NODE_POOL.replace("nodeCount: 4", "nodeCount: 1");
        let yaml = batch(&[&cluster, &pool]);

        let current = lint_content(&yaml, &AsmConfig::default()).unwrap();
        assert_eq!(codes(&current.warnings), vec!["ASM007"]);
        assert_eq!(codes(&current.errors), vec!["ASM009"]);

        let legacy = AsmConfig::default().with_profile(RuleProfile::Legacy);
        let result = lint_content(&yaml, &legacy).unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(codes(&result.errors), vec!["ASM008", "ASM007"]);
    }

    #[test]
    fn test_rule_overrides() {
        let cluster = CONFORMING_CLUSTER.replace("  labels:\n    mesh_id: proj-123456\n", "");
        let yaml = batch(&[&cluster, CONFORMING_NODE_POOL]);

        let ignored = lint_content(&yaml, &AsmConfig::default().ignore("mesh-id-label")).unwrap();
        assert!(ignored.is_clean());

        let demoted = AsmConfig::default().with_rule("ASM004", RuleLevel::Warn);
        let result = lint_content(&yaml, &demoted).unwrap();
        assert_eq!(codes(&result.warnings), vec!["ASM004"]);
        assert_eq!(result.warnings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_unreadable_header() {
        let yaml = batch(&["- just\n- a list\n", "metadata:\n  name: nameless\n", CONFIG_MAP]);
        let result = lint_content(&yaml, &AsmConfig::default()).unwrap();
        assert_eq!(codes(&result.errors), vec!["ASM000", "ASM000"]);
        assert!(result.errors[1].message.contains("apiVersion is missing"));
        assert_eq!(result.resources_analyzed, 3);
    }

    #[test]
    fn test_findings_order() {
        let mut result = ValidationResult::new();
        result.push(Finding::error("ASM001", "first error"));
        result.push(Finding::warning("ASM007", "a warning"));
        result.push(Finding::error("ASM002", "second error"));
        let order: Vec<&str> = result.findings().map(|f| f.message.as_str()).collect();
        assert_eq!(order, vec!["a warning", "first error", "second error"]);
        assert_eq!(result.max_severity(), Some(Severity::Error));
    }

    #[test]
    fn test_empty_result() {
        let result = ValidationResult::new();
        assert!(result.is_clean());
        assert!(result.passed());
        assert!(!result.should_fail(Severity::Warning));
    }

    proptest! {
        #[test]
        fn prop_lint_is_idempotent(
            count in 0u32..8,
            vcpus in 1u32..17,
            channel in "(REGULAR|RAPID|STABLE|BETA)",
        ) {
            let cluster = CONFORMING_CLUSTER.replace("channel: REGULAR", &format!("channel: {channel}"));
            let pool = CONFORMING_NODE_POOL
                .replace("nodeCount: 4", &format!("nodeCount: {count}"))
                .replace("e2-standard-4", &format!("n2-standard-{vcpus}"));
            let yaml = batch(&[&cluster, &pool, CONFIG_MAP]);
            let first = lint_content(&yaml, &AsmConfig::default()).unwrap();
            let second = lint_content(&yaml, &AsmConfig::default()).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
