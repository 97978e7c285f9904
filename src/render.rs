//! HTML tables describing algorithm support, for inclusion in reference docs.
//!
//! Reads a finished ledger and never modifies it. Ciphers get a four-column
//! table in which names are split into algorithm, mode and padding and rows
//! that differ only in padding (then only in mode) are merged. Paired
//! `X.Supported`/`X.Enabled` categories share one table titled `X`.

use crate::error::RenderError;
use crate::ledger::{AlgorithmRecord, CategoryRecord, Ledger, find_by_name, sort_by_name};

const CIPHER_CATEGORY: &str = "Cipher";
const SUPPORTED_SUFFIX: &str = ".Supported";
const ENABLED_SUFFIX: &str = ".Enabled";

#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Prefix each line with ` * ` so the output can be pasted into a doc
    /// comment.
    pub for_javadoc: bool,
    /// Only emit tables for these categories; empty means all of them.
    pub categories: Vec<String>,
}

pub fn render_tables(ledger: &Ledger, options: &RenderOptions) -> Result<String, RenderError> {
    let mut categories = ledger.categories.clone();
    sort_by_name(&mut categories);

    let mut out = vec![
        r#"<h2 id="SupportedAlgorithms">Supported Algorithms</h2>"#.to_string(),
        String::new(),
        "<ul>".to_string(),
    ];
    for category in &categories {
        if category.name.ends_with(ENABLED_SUFFIX) {
            continue;
        }
        let title = table_title(&category.name);
        out.push(format!(
            r##"  <li><a href="#Supported{title}"><code>{title}</code></a></li>"##
        ));
    }
    out.push("</ul>".to_string());

    for category in &categories {
        if !options.categories.is_empty() && !options.categories.contains(&category.name) {
            continue;
        }
        if category.name.ends_with(ENABLED_SUFFIX) {
            continue;
        }
        if category.name == CIPHER_CATEGORY {
            render_cipher_table(category, &mut out)?;
        } else if let Some(base) = category.name.strip_suffix(SUPPORTED_SUFFIX) {
            let enabled_name = format!("{base}{ENABLED_SUFFIX}");
            let enabled = find_by_name(&categories, &enabled_name)
                .map(|record| record.algorithms.as_slice())
                .unwrap_or_default();
            render_paired_table(base, category, enabled, &mut out);
        } else {
            render_plain_table(category, &mut out);
        }
    }

    if options.for_javadoc {
        for line in &mut out {
            line.insert_str(0, " * ");
        }
    }
    Ok(out.join("\n"))
}

fn table_title(category: &str) -> &str {
    category.strip_suffix(SUPPORTED_SUFFIX).unwrap_or(category)
}

// Keeps identifiers such as OAEPwithSHA-1andMGF1Padding from wrapping at hyphens.
fn nowrap(value: &str) -> String {
    format!(r#"<span style="white-space: nowrap">{value}</span>"#)
}

fn has_notes(category: &CategoryRecord) -> bool {
    category.algorithms.iter().any(|alg| alg.note.is_some())
}

fn row_open(deprecated: bool) -> &'static str {
    if deprecated {
        r#"    <tr class="deprecated">"#
    } else {
        "    <tr>"
    }
}

fn push_table_head(out: &mut Vec<String>, id: &str, columns: &[&str], show_notes: bool) {
    out.push(format!(r#"<h3 id="Supported{id}">{id}</h3>"#));
    out.push("<table>".to_string());
    out.push("  <thead>".to_string());
    out.push("    <tr>".to_string());
    for column in columns {
        out.push(format!("      <th>{column}</th>"));
    }
    if show_notes {
        out.push("      <th>Notes</th>".to_string());
    }
    out.push("    </tr>".to_string());
    out.push("  </thead>".to_string());
    out.push("  <tbody>".to_string());
}

fn push_table_tail(out: &mut Vec<String>) {
    out.push("  </tbody>".to_string());
    out.push("</table>".to_string());
}

fn push_note_cell(out: &mut Vec<String>, algorithm: &AlgorithmRecord) {
    out.push(format!(
        "      <td>{}</td>",
        algorithm.note.as_deref().unwrap_or_default()
    ));
}

fn sorted_algorithms(algorithms: &[AlgorithmRecord]) -> Vec<AlgorithmRecord> {
    let mut sorted = algorithms.to_vec();
    sort_by_name(&mut sorted);
    sorted
}

fn render_plain_table(category: &CategoryRecord, out: &mut Vec<String>) {
    let show_notes = has_notes(category);
    push_table_head(
        out,
        &category.name,
        &["Algorithm", "Supported API Levels"],
        show_notes,
    );
    for algorithm in sorted_algorithms(&category.algorithms) {
        out.push(row_open(algorithm.deprecated).to_string());
        out.push(format!("      <td>{}</td>", nowrap(&algorithm.name)));
        out.push(format!(
            "      <td>{}</td>",
            nowrap(&algorithm.supported_api_levels.to_string())
        ));
        if show_notes {
            push_note_cell(out, &algorithm);
        }
        out.push("    </tr>".to_string());
    }
    push_table_tail(out);
}

fn render_paired_table(
    base: &str,
    supported: &CategoryRecord,
    enabled: &[AlgorithmRecord],
    out: &mut Vec<String>,
) {
    let show_notes = has_notes(supported);
    push_table_head(
        out,
        base,
        &["Algorithm", "Supported API Levels", "Enabled By Default"],
        show_notes,
    );
    for algorithm in sorted_algorithms(&supported.algorithms) {
        out.push(row_open(algorithm.deprecated).to_string());
        out.push(format!("      <td>{}</td>", nowrap(&algorithm.name)));
        out.push(format!(
            "      <td>{}</td>",
            nowrap(&algorithm.supported_api_levels.to_string())
        ));
        match find_by_name(enabled, &algorithm.name) {
            Some(on) => out.push(format!(
                "      <td>{}</td>",
                nowrap(&on.supported_api_levels.to_string())
            )),
            None => out.push("      <td></td>".to_string()),
        }
        if show_notes {
            push_note_cell(out, &algorithm);
        }
        out.push("    </tr>".to_string());
    }
    push_table_tail(out);
}

#[derive(Clone, Debug)]
struct CipherRow {
    algorithm: String,
    modes: Vec<String>,
    paddings: Vec<String>,
    levels: String,
    deprecated: bool,
    note: String,
}

impl CipherRow {
    fn parse(record: &AlgorithmRecord) -> Result<Self, RenderError> {
        let parts: Vec<&str> = record.name.split('/').collect();
        let [algorithm, mode, padding] = parts.as_slice() else {
            return Err(RenderError::CipherName(record.name.clone()));
        };
        Ok(Self {
            algorithm: algorithm.to_string(),
            modes: vec![mode.to_string()],
            paddings: vec![padding.to_string()],
            levels: record.supported_api_levels.to_string(),
            deprecated: record.deprecated,
            note: record.note.clone().unwrap_or_default(),
        })
    }

    fn same_history(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm
            && self.levels == other.levels
            && self.deprecated == other.deprecated
            && self.note == other.note
    }
}

// Merge neighbours that differ only in padding, then those that differ only
// in mode.
fn collapse_cipher_rows(mut rows: Vec<CipherRow>) -> Vec<CipherRow> {
    rows.sort_by(|a, b| {
        (&a.algorithm, &a.modes, &a.levels, a.deprecated).cmp(&(
            &b.algorithm,
            &b.modes,
            &b.levels,
            b.deprecated,
        ))
    });
    let mut by_padding: Vec<CipherRow> = Vec::with_capacity(rows.len());
    for row in rows {
        match by_padding.last_mut() {
            Some(last) if last.same_history(&row) && last.modes == row.modes => {
                last.paddings.extend(row.paddings);
            }
            _ => by_padding.push(row),
        }
    }

    by_padding.sort_by(|a, b| {
        (&a.algorithm, &a.paddings, &a.levels, a.deprecated).cmp(&(
            &b.algorithm,
            &b.paddings,
            &b.levels,
            b.deprecated,
        ))
    });
    let mut by_mode: Vec<CipherRow> = Vec::with_capacity(by_padding.len());
    for row in by_padding {
        match by_mode.last_mut() {
            Some(last) if last.same_history(&row) && last.paddings == row.paddings => {
                last.modes.extend(row.modes);
            }
            _ => by_mode.push(row),
        }
    }

    by_mode.sort_by(|a, b| {
        (&a.algorithm, a.deprecated, &a.modes, &a.paddings, &a.levels).cmp(&(
            &b.algorithm,
            b.deprecated,
            &b.modes,
            &b.paddings,
            &b.levels,
        ))
    });
    by_mode
}

fn push_spanned_cell(out: &mut Vec<String>, span: usize, content: &str) {
    if span > 1 {
        out.push(format!(r#"      <td rowspan="{span}">{content}</td>"#));
    } else {
        out.push(format!("      <td>{content}</td>"));
    }
}

fn joined(values: &[String]) -> String {
    values
        .iter()
        .map(|value| nowrap(value))
        .collect::<Vec<_>>()
        .join("<br>")
}

fn render_cipher_table(category: &CategoryRecord, out: &mut Vec<String>) -> Result<(), RenderError> {
    let rows = sorted_algorithms(&category.algorithms)
        .iter()
        .map(CipherRow::parse)
        .collect::<Result<Vec<_>, _>>()?;
    let rows = collapse_cipher_rows(rows);

    let show_notes = has_notes(category);
    push_table_head(
        out,
        &category.name,
        &["Algorithm", "Modes", "Paddings", "Supported API Levels"],
        show_notes,
    );

    // Algorithm and mode cells span runs of rows sharing the same
    // deprecation state and note.
    let mut group: Option<(bool, &str)> = None;
    let mut algorithm: Option<&str> = None;
    let mut modes: Option<&[String]> = None;
    for (idx, row) in rows.iter().enumerate() {
        let row_group = (row.deprecated, row.note.as_str());
        if group != Some(row_group) {
            group = Some(row_group);
            algorithm = None;
            modes = None;
        }
        out.push(row_open(row.deprecated).to_string());

        let rest = &rows[idx + 1..];
        let same_group =
            |next: &&CipherRow| next.deprecated == row.deprecated && next.note == row.note;
        if algorithm != Some(row.algorithm.as_str()) {
            algorithm = Some(row.algorithm.as_str());
            modes = None;
            let span = 1 + rest
                .iter()
                .take_while(|next| same_group(next) && next.algorithm == row.algorithm)
                .count();
            push_spanned_cell(out, span, &nowrap(&row.algorithm));
        }
        if modes != Some(row.modes.as_slice()) {
            modes = Some(row.modes.as_slice());
            let span = 1 + rest
                .iter()
                .take_while(|next| {
                    same_group(next) && next.algorithm == row.algorithm && next.modes == row.modes
                })
                .count();
            push_spanned_cell(out, span, &joined(&row.modes));
        }
        out.push(format!("      <td>{}</td>", joined(&row.paddings)));
        out.push(format!("      <td>{}</td>", nowrap(&row.levels)));
        if show_notes {
            out.push(format!("      <td>{}</td>", row.note));
        }
        out.push("    </tr>".to_string());
    }
    push_table_tail(out);
    Ok(())
}
