//! The `validate-asm` pipeline stage.
//!
//! The resource stream is echoed unchanged to stdout so the stage can sit
//! anywhere in a pipeline; the report goes to stderr.

use std::io::{Read, Write};
use std::path::PathBuf;

use crate::asmlint::{
    AsmConfig, OutputFormat, RuleProfile, Severity, format_result, lint, parse_resources,
};
use crate::error::{AsmError, Result};

/// No findings at or above the failure threshold.
pub const EXIT_CLEAN: i32 = 0;
/// Findings at or above the failure threshold.
pub const EXIT_FINDINGS: i32 = 1;
/// The input or configuration could not be read.
pub const EXIT_FAILURE: i32 = 2;

#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub input: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub profile: Option<RuleProfile>,
    pub format: OutputFormat,
    pub fail_on: Severity,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            input: None,
            config: None,
            profile: None,
            format: OutputFormat::Text,
            fail_on: Severity::Warning,
        }
    }
}

impl ValidateOptions {
    fn load_config(&self) -> Result<AsmConfig> {
        let config = match &self.config {
            Some(path) => AsmConfig::from_file(path)?,
            None => AsmConfig::default(),
        };
        Ok(match self.profile {
            Some(profile) => config.with_profile(profile),
            None => config,
        })
    }
}

/// Run the stage and return the process exit code.
pub fn handle_validate<R, W, E>(
    options: &ValidateOptions,
    stdin: R,
    mut stdout: W,
    mut stderr: E,
) -> Result<i32>
where
    R: Read,
    W: Write,
    E: Write,
{
    let config = options.load_config()?;
    log::debug!("using {} profile", config.profile);

    let (content, source) = read_input(options, stdin)?;
    let resources = parse_resources(&content, &source)?;
    let result = lint(&resources, &config);

    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;

    let report = format_result(&result, options.format);
    writeln!(stderr, "{}", report)?;

    if result.should_fail(options.fail_on) {
        Ok(EXIT_FINDINGS)
    } else {
        Ok(EXIT_CLEAN)
    }
}

fn read_input<R: Read>(options: &ValidateOptions, mut stdin: R) -> Result<(String, String)> {
    match &options.input {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| AsmError::ReadFile {
                path: path.clone(),
                source,
            })?;
            Ok((content, path.display().to_string()))
        }
        None => {
            let mut content = String::new();
            stdin.read_to_string(&mut content)?;
            Ok((content, "<stdin>".to_string()))
        }
    }
}
