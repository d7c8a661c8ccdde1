//! Output formatters for asmlint results.
//!
//! - Text - The report format of the pipeline stage (default)
//! - JSON - Machine-readable JSON output

pub mod json;
pub mod text;

use crate::asmlint::lint::ValidationResult;

/// Output format for validation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text report (default)
    #[default]
    Text,
    /// JSON format for machine processing
    Json,
}

/// Format a validation result according to the specified format.
pub fn format_result(result: &ValidationResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text::format(result),
        OutputFormat::Json => json::format(result),
    }
}
