//! Ledger reconciliation.
//!
//! Merges the previous ledger with the algorithms observed at a new API level.
//! Algorithms are matched on their normalized name so spelling drift between
//! providers extends one history instead of starting a second one. Nothing is
//! ever removed: an algorithm that disappears has its open interval closed
//! and is marked deprecated.

use crate::categories::{self, SUPPORTED_CATEGORIES};
use crate::error::{RangeError, ReconcileError};
use crate::ledger::{
    AlgorithmRecord, CategoryRecord, Ledger, TIMESTAMP_FORMAT, find_by_name,
    find_by_normalized_name, sort_by_name,
};
use crate::levels::SupportRange;
use crate::names::{fix_display_name, normalize_name};
use crate::snapshot::{DisplayNames, Observations};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Produce the ledger for `target_level` from `previous` and the current
/// observations.
///
/// `observations` holds normalized names per category; `display_names`
/// supplies the provider spelling for algorithms the ledger has never seen.
/// The result covers every tracked category that has at least one algorithm,
/// sorted by category and algorithm name.
pub fn update(
    previous: &Ledger,
    observations: &Observations,
    display_names: &DisplayNames,
    target_level: u32,
    now: DateTime<Utc>,
) -> Result<Ledger, ReconcileError> {
    if target_level == 0 {
        return Err(ReconcileError::ZeroLevel);
    }
    if let Some(recorded) = previous.api_level {
        if target_level < recorded {
            warn!(
                recorded,
                target_level, "target api level is older than the ledger"
            );
        }
    }

    let mut categories = Vec::new();
    for &category in SUPPORTED_CATEGORIES {
        let previous_algorithms = find_by_name(&previous.categories, category)
            .map(|record| record.algorithms.as_slice())
            .unwrap_or_default();
        let current = observations
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let record = reconcile_category(
            category,
            previous_algorithms,
            current,
            display_names,
            target_level,
        )?;
        debug!(
            category,
            previous = previous_algorithms.len(),
            observed = current.len(),
            output = record.algorithms.len(),
            "reconciled category"
        );
        if !record.algorithms.is_empty() {
            categories.push(record);
        }
    }
    sort_by_name(&mut categories);

    Ok(Ledger {
        api_level: Some(target_level),
        categories,
        last_updated: Some(now.format(TIMESTAMP_FORMAT).to_string()),
    })
}

fn reconcile_category(
    category: &str,
    previous: &[AlgorithmRecord],
    current: &[String],
    display_names: &DisplayNames,
    target_level: u32,
) -> Result<CategoryRecord, ReconcileError> {
    let previous_keys: BTreeSet<String> = previous
        .iter()
        .map(|algorithm| normalize_name(&algorithm.name))
        .collect();
    let current_keys: BTreeSet<&str> = current.iter().map(String::as_str).collect();
    let union: BTreeSet<&str> = previous_keys
        .iter()
        .map(String::as_str)
        .chain(current_keys.iter().copied())
        .collect();

    let mut algorithms = Vec::with_capacity(union.len());
    for key in union {
        let prior = find_by_normalized_name(previous, key);
        let observed = current_keys.contains(key);
        algorithms.push(reconcile_algorithm(
            category,
            key,
            prior,
            observed,
            display_names,
            target_level,
        )?);
    }
    sort_by_name(&mut algorithms);

    Ok(CategoryRecord {
        algorithms,
        name: category.to_string(),
    })
}

fn reconcile_algorithm(
    category: &str,
    key: &str,
    prior: Option<&AlgorithmRecord>,
    observed: bool,
    display_names: &DisplayNames,
    target_level: u32,
) -> Result<AlgorithmRecord, ReconcileError> {
    let name = match prior {
        Some(prior) => prior.name.clone(),
        None => {
            let chosen = display_names.get(key).map(String::as_str).unwrap_or(key);
            if categories::is_case_sensitive(category) {
                chosen.to_string()
            } else {
                fix_display_name(chosen)
            }
        }
    };

    let range_err = |source: RangeError| ReconcileError::Range {
        category: category.to_string(),
        algorithm: name.clone(),
        source,
    };
    let (supported_api_levels, deprecated) = match prior {
        Some(prior) if observed => {
            let mut levels = prior.supported_api_levels.clone();
            levels.reopen(target_level).map_err(range_err)?;
            (levels, false)
        }
        Some(prior) => {
            let mut levels = prior.supported_api_levels.clone();
            levels.close(target_level).map_err(range_err)?;
            (levels, true)
        }
        None => (SupportRange::open_from(target_level), false),
    };

    Ok(AlgorithmRecord {
        deprecated,
        name,
        note: prior.and_then(|prior| prior.note.clone()),
        supported_api_levels,
    })
}
