//! csrsplit: split an ICH E3 Clinical Study Report into narrative and TFL PDFs

use clap::Parser;
use csrsplit_cli::commands::Commands;

#[derive(Debug, Parser)]
#[command(name = "csrsplit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.command.execute() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from([
            "csrsplit", "extract", "-i", "csr.pdf", "-o", "out", "--dry-run", "-f", "json", "-vv",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract(args) => {
                assert!(args.dry_run);
                assert_eq!(args.verbose, 2);
                assert_eq!(args.format, Some(csrsplit_cli::output::OutputFormat::Json));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_extract_requires_output() {
        assert!(Cli::try_parse_from(["csrsplit", "extract", "-i", "csr.pdf"]).is_err());
    }
}
