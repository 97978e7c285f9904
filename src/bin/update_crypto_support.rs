//! Update the algorithm support ledger for a new API level.
//!
//! Usage:
//!   list-providers | update-crypto-support --api-level 29 data/crypto_support.json
//!   list-providers | update-crypto-support --api-level 29 --rewrite-file data/crypto_support.json
//!
//! Reads a `BEGIN ALGORITHM LIST` ... `END ALGORITHM LIST` block from stdin.
//! Without `--rewrite-file` the updated ledger is printed to stdout.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use crypto_support::config::UpdateArgs;
use crypto_support::logging::init_tracing;
use crypto_support::run_update;
use std::io::stdin;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_tracing();
    let options = UpdateArgs::parse().into_options()?;
    run_update(&options, stdin().lock(), Utc::now())?;
    Ok(())
}
