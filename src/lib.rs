//! # validate-asm
//!
//! A configuration pipeline stage that checks Config Connector
//! `ContainerCluster` and `ContainerNodePool` resources against the
//! prerequisites of Anthos Service Mesh before the mesh is enabled.
//!
//! ## Features
//!
//! - **Rule Engine**: nine prerequisite rules with stable codes, scoped by resource kind
//! - **Profiles**: `current` and `legacy` rule levels, with per-rule overrides
//! - **Batch Checks**: vCPU capacity summed across every node pool of the batch
//! - **Pass-through**: the input stream is echoed unchanged; the report goes to stderr
//!
//! ## Example
//!
//! ```rust,no_run
//! use validate_asm::asmlint::{AsmConfig, OutputFormat, format_result, lint_content};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifests = std::fs::read_to_string("cluster.yaml")?;
//! let result = lint_content(&manifests, &AsmConfig::default())?;
//! eprintln!("{}", format_result(&result, OutputFormat::Text));
//! # Ok(())
//! # }
//! ```

pub mod asmlint;
pub mod cli;
pub mod error;
pub mod handlers;

// Re-export commonly used types and functions
pub use asmlint::{AsmConfig, Finding, ValidationResult, lint, lint_content};
pub use error::{AsmError, Result};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
