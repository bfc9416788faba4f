//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;

pub mod check_patterns;
pub mod extract;
pub mod generate_config;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split a CSR into a narrative PDF and one PDF per TFL
    Extract(extract::ExtractArgs),

    /// Check an existing output directory against its manifest
    Validate(validate::ValidateArgs),

    /// Write the default pattern configuration to a file
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Compile a pattern configuration file and report
    CheckPatterns(check_patterns::CheckPatternsArgs),
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Extract(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::CheckPatterns(args) => args.execute(),
        }
    }
}

/// Initialize logging based on verbosity level
///
/// `RUST_LOG` still takes precedence over the verbosity flag.
pub fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    if !quiet {
        // a logger may already be installed when commands run in-process
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .try_init();
    }
}
