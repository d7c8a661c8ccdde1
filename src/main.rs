use clap::Parser;
use std::io;
use std::process;
use validate_asm::cli::Cli;
use validate_asm::handlers::{EXIT_FAILURE, ValidateOptions, handle_validate};

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    let options = ValidateOptions {
        input: cli.input.clone(),
        config: cli.config.clone(),
        profile: cli.profile.map(Into::into),
        format: cli.format.into(),
        fail_on: cli.fail_on.into(),
    };

    let code = match handle_validate(&options, io::stdin().lock(), io::stdout().lock(), io::stderr()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    };
    process::exit(code);
}
