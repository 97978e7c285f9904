//! Crypto algorithm support ledger.
//!
//! Tracks, per API level, which algorithm names the installed providers
//! expose. `update-crypto-support` folds a fresh provider listing into the
//! JSON ledger; `format-algorithm-table` renders the ledger as HTML tables.

pub mod categories;
pub mod config;
pub mod error;
pub mod ledger;
pub mod levels;
pub mod logging;
pub mod names;
pub mod reconcile;
pub mod render;
pub mod snapshot;

pub use categories::{SUPPORTED_CATEGORIES, is_case_sensitive};
pub use config::{OutputMode, UpdateOptions};
pub use error::{LedgerError, RangeError, ReconcileError, RenderError, SnapshotError};
pub use ledger::{
    AlgorithmRecord, CategoryRecord, Ledger, load_ledger, parse_ledger, render_ledger_json,
    write_ledger,
};
pub use levels::{Interval, SupportRange};
pub use names::{fix_display_name, normalize_name};
pub use reconcile::update;
pub use render::{RenderOptions, render_tables};
pub use snapshot::{Snapshot, parse_snapshot, read_snapshot};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::BufRead;
use tracing::info;

/// Load the ledger named by `options`, fold in the listing read from
/// `input`, and either print or rewrite the result.
///
/// Nothing is written unless every step succeeds.
pub fn run_update<R: BufRead>(
    options: &UpdateOptions,
    input: R,
    now: DateTime<Utc>,
) -> Result<Ledger> {
    let previous = load_ledger(&options.ledger_path)
        .with_context(|| format!("loading {}", options.ledger_path.display()))?;
    let snapshot = read_snapshot(input).context("reading algorithm list from stdin")?;
    let updated = update(
        &previous,
        &snapshot.categories,
        &snapshot.display_names,
        options.api_level,
        now,
    )
    .with_context(|| format!("updating {}", options.ledger_path.display()))?;

    match options.output {
        OutputMode::Rewrite => {
            write_ledger(&options.ledger_path, &updated)
                .with_context(|| format!("rewriting {}", options.ledger_path.display()))?;
            info!(
                path = %options.ledger_path.display(),
                api_level = options.api_level,
                categories = updated.categories.len(),
                "ledger rewritten"
            );
        }
        OutputMode::Stdout => {
            println!("{}", render_ledger_json(&updated)?);
        }
    }
    Ok(updated)
}
