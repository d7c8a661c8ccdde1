//! asmlint: Anthos Service Mesh prerequisite checks for Config Connector
//! resources.
//!
//! Validates `ContainerCluster` and `ContainerNodePool` declarations against
//! what the mesh needs before it can be enabled: managed logging and
//! monitoring, workload identity, a mesh id label, a release channel, node
//! sizing and a supported master version. Every other resource passes
//! through untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use validate_asm::asmlint::{AsmConfig, OutputFormat, format_result, lint_content};
//!
//! let result = lint_content(manifests, &AsmConfig::default())?;
//! eprintln!("{}", format_result(&result, OutputFormat::Text));
//! ```
//!
//! # Rules
//!
//! | Code   | Name               | Applies to         | Current | Legacy |
//! |--------|--------------------|--------------------|---------|--------|
//! | ASM001 | logging-service    | cluster            | error   | error  |
//! | ASM002 | monitoring-service | cluster            | error   | error  |
//! | ASM003 | workload-identity  | cluster            | error   | error  |
//! | ASM004 | mesh-id-label      | cluster            | error   | error  |
//! | ASM005 | release-channel    | cluster            | error   | error  |
//! | ASM006 | machine-type       | cluster, node pool | error   | error  |
//! | ASM007 | node-count         | node pool          | warn    | error  |
//! | ASM008 | master-version     | cluster            | off     | error  |
//! | ASM009 | total-vcpus        | whole batch        | error   | off    |

pub mod accessor;
pub mod config;
pub mod formatter;
pub mod lint;
pub mod machine_type;
pub mod parser;
pub mod resource;
pub mod rules;
pub mod types;
pub mod version;

// Re-export main types and functions
pub use config::{AsmConfig, RuleProfile};
pub use formatter::{OutputFormat, format_result};
pub use lint::{ValidationResult, lint, lint_content};
pub use parser::parse_resources;
pub use resource::{Resource, ResourceMeta};
pub use types::{Finding, ResourceKind, RuleCode, RuleLevel, Severity};
