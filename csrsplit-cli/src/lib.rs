//! csrsplit CLI library
//!
//! This library provides the command-line interface for splitting Clinical
//! Study Report PDFs into a narrative body and one file per table, listing
//! and figure.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
