// Ledger file loading, validation and atomic rewrite.
mod support;

use anyhow::Result;
use crypto_support::ledger::LEDGER_HEADER;
use crypto_support::{LedgerError, load_ledger, write_ledger};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

use support::{do_update, ledger, write_fixture};

#[test]
fn rewritten_ledger_loads_back() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("crypto_support.json");
    let updated = ledger(do_update(
        json!({"categories": [{"name": "MessageDigest", "algorithms": [
            {"name": "SHA-1", "note": "legacy", "supported_api_levels": "1+"},
            {"name": "MD2", "supported_api_levels": "1-8"}
        ]}]}),
        json!({"MessageDigest": ["SHA-1"]}),
        json!({}),
    )?);

    write_ledger(&path, &updated)?;
    let text = fs::read_to_string(&path)?;
    assert!(text.starts_with(&format!("{LEDGER_HEADER}\n{{\n  \"api_level\": \"72\",")));

    let loaded = load_ledger(&path)?;
    assert_eq!(loaded, updated);
    assert_eq!(loaded.api_level, Some(72));
    assert!(loaded.categories[0].algorithms[0].deprecated);
    Ok(())
}

#[test]
fn write_replaces_existing_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("data.json");
    fs::write(&path, "stale contents that are much longer than the new ledger")?;
    write_ledger(&path, &ledger(json!({"categories": []})))?;
    assert_eq!(
        fs::read_to_string(&path)?,
        format!("{LEDGER_HEADER}\n{{\n  \"categories\": []\n}}\n")
    );
    let leftovers = fs::read_dir(dir.path())?.count();
    assert_eq!(leftovers, 1, "temporary file should be renamed into place");
    Ok(())
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    match load_ledger(&path) {
        Err(LedgerError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn malformed_documents_fail_fast() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("data.json");

    fs::write(&path, "# header\n{not json")?;
    assert!(matches!(load_ledger(&path), Err(LedgerError::Json(_))));

    write_fixture(
        &path,
        &json!({"categories": [{"name": "Mac", "algorithms": [{"supported_api_levels": "1+"}]}]}),
    )?;
    assert!(matches!(load_ledger(&path), Err(LedgerError::Schema(_))));

    write_fixture(
        &path,
        &json!({"categories": [{"name": "Mac", "algorithms": [
            {"name": "HmacMD5", "supported_api_levels": "1-22,abc"}
        ]}]}),
    )?;
    assert!(matches!(load_ledger(&path), Err(LedgerError::Schema(_))));

    // Shape is fine but the intervals run backwards.
    write_fixture(
        &path,
        &json!({"categories": [{"name": "Mac", "algorithms": [
            {"name": "HmacMD5", "supported_api_levels": "10-20,5+"}
        ]}]}),
    )?;
    assert!(matches!(load_ledger(&path), Err(LedgerError::Json(_))));
    Ok(())
}
