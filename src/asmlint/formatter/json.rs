//! JSON output formatter for asmlint.

use serde_json::json;

use crate::asmlint::lint::ValidationResult;
use crate::asmlint::types::Finding;

/// Format a validation result as JSON.
pub fn format(result: &ValidationResult) -> String {
    let output = json!({
        "passed": result.passed(),
        "resourcesAnalyzed": result.resources_analyzed,
        "warningCount": result.warnings.len(),
        "errorCount": result.errors.len(),
        "warnings": findings(&result.warnings),
        "errors": findings(&result.errors),
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

fn findings(findings: &[Finding]) -> Vec<serde_json::Value> {
    findings
        .iter()
        .map(|f| {
            json!({
                "code": f.code.as_str(),
                "severity": f.severity,
                "message": f.message,
            })
        })
        .collect()
}
