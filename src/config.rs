//! Command-line configuration for the two binaries.
//!
//! Flags are declared with clap and resolved into plain option structs so
//! the library never sees clap types. Underscore spellings of the flags are
//! accepted as aliases for existing scripts.

use crate::render::RenderOptions;
use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "update-crypto-support")]
#[command(about = "Update the algorithm support ledger from a provider listing on stdin")]
pub struct UpdateArgs {
    /// The API level the listing was taken from.
    #[arg(long = "api-level", alias = "api_level")]
    pub api_level: u32,
    /// Rewrite the ledger file in place instead of printing the result.
    #[arg(long = "rewrite-file", alias = "rewrite_file")]
    pub rewrite_file: bool,
    /// The ledger JSON file to update.
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
#[command(name = "format-algorithm-table")]
#[command(about = "Print HTML tables of algorithm support from a ledger")]
pub struct FormatArgs {
    /// Prefix each line for inclusion in a doc comment.
    #[arg(long = "for-javadoc", alias = "for_javadoc")]
    pub for_javadoc: bool,
    /// Category to display; may be repeated.
    #[arg(long = "category")]
    pub category: Vec<String>,
    /// The ledger JSON file to read.
    pub file: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Stdout,
    Rewrite,
}

#[derive(Clone, Debug)]
pub struct UpdateOptions {
    pub api_level: u32,
    pub output: OutputMode,
    pub ledger_path: PathBuf,
}

impl UpdateArgs {
    pub fn into_options(self) -> Result<UpdateOptions> {
        if self.api_level == 0 {
            bail!("--api-level must be at least 1");
        }
        Ok(UpdateOptions {
            api_level: self.api_level,
            output: if self.rewrite_file {
                OutputMode::Rewrite
            } else {
                OutputMode::Stdout
            },
            ledger_path: self.file,
        })
    }
}

impl FormatArgs {
    pub fn into_options(self) -> (PathBuf, RenderOptions) {
        (
            self.file,
            RenderOptions {
                for_javadoc: self.for_javadoc,
                categories: self.category,
            },
        )
    }
}
