use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::asmlint::{OutputFormat, RuleProfile, Severity};

#[derive(Parser)]
#[command(name = "validate-asm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate Config Connector clusters against Anthos Service Mesh prerequisites")]
#[command(long_about = "A configuration pipeline stage that reads ContainerCluster and ContainerNodePool resources, \
echoes them unchanged to stdout and reports unmet Anthos Service Mesh prerequisites on stderr.")]
pub struct Cli {
    /// Read resources from a file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rule profile (overrides the configuration file)
    #[arg(long, value_enum)]
    pub profile: Option<ProfileArg>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: FormatArg,

    /// Lowest severity that makes the stage fail
    #[arg(long, value_enum, default_value = "warning")]
    pub fail_on: FailOn,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all logging
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    Current,
    Legacy,
}

impl From<ProfileArg> for RuleProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Current => RuleProfile::Current,
            ProfileArg::Legacy => RuleProfile::Legacy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    Warning,
    Error,
}

impl From<FailOn> for Severity {
    fn from(arg: FailOn) -> Self {
        match arg {
            FailOn::Warning => Severity::Warning,
            FailOn::Error => Severity::Error,
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
