//! Generate config command implementation

use anyhow::{bail, Context, Result};
use clap::Args;
use csrsplit_core::patterns::DEFAULT_PATTERNS_TOML;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        if self.output.exists() && !self.force {
            bail!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        println!("Generating pattern configuration template...");
        println!("  Output file: {}", self.output.display());

        fs::write(&self.output, DEFAULT_PATTERNS_TOML)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Pattern configuration generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the heading keywords, sections and caption patterns");
        println!("2. Check your configuration:");
        println!("   csrsplit check-patterns -p {}", self.output.display());
        println!("3. Use it for extraction:");
        println!(
            "   csrsplit extract -i csr.pdf -o out --patterns {}",
            self.output.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csrsplit_core::PatternConfig;
    use tempfile::TempDir;

    #[test]
    fn test_execute_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("patterns.toml");

        let args = GenerateConfigArgs {
            output: output_path.clone(),
            force: false,
        };
        assert!(args.execute().is_ok());

        let config = PatternConfig::from_file(&output_path).unwrap();
        assert_eq!(config.headings.sections, vec!["14".to_string()]);
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("patterns.toml");
        std::fs::write(&output_path, "keep me").unwrap();

        let args = GenerateConfigArgs {
            output: output_path.clone(),
            force: false,
        };
        assert!(args.execute().is_err());
        assert_eq!(std::fs::read_to_string(&output_path).unwrap(), "keep me");

        let forced = GenerateConfigArgs {
            output: output_path.clone(),
            force: true,
        };
        assert!(forced.execute().is_ok());
    }
}
