//! Print HTML tables of algorithm support from a ledger.
//!
//! Usage:
//!   format-algorithm-table data/crypto_support.json
//!   format-algorithm-table --for-javadoc --category Cipher data/crypto_support.json

use anyhow::{Context, Result};
use clap::Parser;
use crypto_support::config::FormatArgs;
use crypto_support::logging::init_tracing;
use crypto_support::{load_ledger, render_tables};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_tracing();
    let (path, options) = FormatArgs::parse().into_options();
    let ledger = load_ledger(&path).with_context(|| format!("loading {}", path.display()))?;
    let html = render_tables(&ledger, &options)
        .with_context(|| format!("rendering tables for {}", path.display()))?;
    println!("{html}");
    Ok(())
}
