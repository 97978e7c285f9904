#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, Utc};
use crypto_support::Ledger;
use crypto_support::snapshot::{DisplayNames, Observations};
use serde_json::Value;
use std::path::Path;

pub const API_LEVEL: u32 = 72;

// The timestamp 1234567890 in the ledger's text format.
pub const LAST_UPDATED_TEXT: &str = "2009-02-13 23:31:30 UTC";

pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_234_567_890, 0).expect("valid timestamp")
}

pub fn ledger(value: Value) -> Ledger {
    serde_json::from_value(value).expect("fixture ledger")
}

pub fn observations(value: Value) -> Observations {
    serde_json::from_value(value).expect("fixture observations")
}

pub fn display_names(value: Value) -> DisplayNames {
    serde_json::from_value(value).expect("fixture display names")
}

/// Reconcile at level 72 with the fixed clock and return the result as JSON.
pub fn do_update(previous: Value, current: Value, names: Value) -> Result<Value> {
    let updated = crypto_support::update(
        &ledger(previous),
        &observations(current),
        &display_names(names),
        API_LEVEL,
        fixed_now(),
    )?;
    Ok(serde_json::to_value(&updated)?)
}

pub fn write_fixture(path: &Path, value: &Value) -> Result<()> {
    let text = format!(
        "# This file is autogenerated.\n{}\n",
        serde_json::to_string_pretty(value)?
    );
    std::fs::write(path, text)?;
    Ok(())
}
