//! Plain text report.
//!
//! Warnings come first, then errors; each block is omitted when empty.

use crate::asmlint::lint::ValidationResult;
use crate::asmlint::types::Finding;

pub const CLEAN_REPORT: &str = "no warnings/errors occurred";

/// Format a validation result as the text report.
pub fn format(result: &ValidationResult) -> String {
    if result.is_clean() {
        return CLEAN_REPORT.to_string();
    }

    let mut output = String::new();
    if result.has_warnings() {
        output.push_str(&block("warning", &result.warnings));
    }
    if result.has_errors() {
        output.push_str(&block("error", &result.errors));
    }
    output
}

fn block(label: &str, findings: &[Finding]) -> String {
    let items: Vec<String> = findings.iter().map(|f| format!("* {}", f)).collect();
    format!(
        "{} {}(s) occurred:\n\t{}\n\n",
        findings.len(),
        label,
        items.join("\n\t")
    )
}
