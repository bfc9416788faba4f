//! Check-patterns command implementation

use anyhow::Result;
use clap::Args;
use csrsplit_core::{PatternCatalog, PatternConfig};
use std::path::PathBuf;

/// Arguments for the check-patterns command
#[derive(Debug, Args)]
pub struct CheckPatternsArgs {
    /// Path to the pattern configuration file to check
    #[arg(short, long, value_name = "FILE", required = true)]
    pub patterns: PathBuf,

    /// Page text to run the compiled matchers against
    #[arg(long, value_name = "TEXT")]
    pub probe: Option<String>,
}

impl CheckPatternsArgs {
    /// Execute the check-patterns command
    pub fn execute(&self) -> Result<()> {
        println!(
            "Checking pattern configuration: {}",
            self.patterns.display()
        );

        let compiled = PatternConfig::from_file(&self.patterns)
            .and_then(|config| PatternCatalog::new(&config).map(|catalog| (config, catalog)));
        let (config, catalog) = match compiled {
            Ok(compiled) => compiled,
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e}");
                return Err(anyhow::anyhow!("Validation failed: {}", e));
            }
        };

        println!("✓ Configuration is valid!");
        println!("  Name: {}", catalog.name());
        let sections = if config.headings.sections.is_empty() {
            "any".to_string()
        } else {
            config.headings.sections.join(", ")
        };
        println!("  Heading sections: {sections}");
        let keywords = &config.headings.keywords;
        println!(
            "  Keywords: {} table, {} listing, {} figure",
            keywords.table.len(),
            keywords.listing.len(),
            keywords.figure.len()
        );
        println!(
            "  Caption patterns: {} population, {} program",
            config.captions.population.len(),
            config.captions.program.len()
        );
        println!(
            "  Back matter: {}",
            if config.back_matter.enabled {
                "enabled"
            } else {
                "disabled"
            }
        );

        if let Some(text) = &self.probe {
            // literal "\n" on the command line stands for a line break
            let text = text.replace("\\n", "\n");
            println!();
            println!("Probe:");
            match catalog.match_tfl_heading(&text) {
                Some(heading) => {
                    println!("  Heading: {} ({})", heading.canonical_id(), heading.kind);
                    if let Some(title) = catalog.match_title(&text, &heading) {
                        println!("  Title: {title}");
                    }
                }
                None => println!("  Heading: none"),
            }
            if let Some(population) = catalog.match_population(&text) {
                println!("  Population: {population}");
            }
            if let Some(program) = catalog.match_program_path(&text) {
                println!("  Program: {program}");
            }
            if let Some(pagination) = catalog.match_pagination(&text) {
                println!("  Pagination: {} of {}", pagination.page, pagination.total);
            }
            println!("  Back matter: {}", catalog.match_back_matter(&text));
        }

        Ok(())
    }
}
