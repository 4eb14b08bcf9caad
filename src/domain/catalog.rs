//! Domain-block parsing.
//!
//! The "Dominios" sheet encodes each domain positionally: a row with a domain
//! name starts a new entry, and following rows whose domain cell is blank carry
//! further description fragments for that entry.

use crate::domain::model::{DomainEntry, DomainRow, Sheet};
use crate::utils::error::{ClassifierError, Result};

pub const DOMAIN_COLUMN: &str = "Dominios";
/// Header used by older workbooks for the domain column.
pub const LEGACY_DOMAIN_COLUMN: &str = "Domain";
pub const DESCRIPTION_COLUMN: &str = "Descrição";

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Folds the ordered domain rows into catalog entries.
///
/// Every row with a non-blank domain produces exactly one entry, in row order.
/// Description rows seen before the first domain row are dropped.
pub fn parse_domain_rows(rows: &[DomainRow]) -> Vec<DomainEntry> {
    let mut entries = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for row in rows {
        match non_blank(&row.domain) {
            Some(domain) => {
                if let Some((name, fragments)) = current.take() {
                    entries.push(finish_entry(name, fragments));
                }
                let fragments = non_blank(&row.description)
                    .map(|d| vec![d.to_string()])
                    .unwrap_or_default();
                current = Some((domain.to_string(), fragments));
            }
            None => {
                if let Some(description) = non_blank(&row.description) {
                    match current.as_mut() {
                        Some((_, fragments)) => fragments.push(description.to_string()),
                        None => tracing::debug!(
                            "Dropping description row with no preceding domain: {}",
                            description
                        ),
                    }
                }
            }
        }
    }

    if let Some((name, fragments)) = current {
        entries.push(finish_entry(name, fragments));
    }

    entries
}

fn finish_entry(name: String, fragments: Vec<String>) -> DomainEntry {
    DomainEntry {
        name,
        description: fragments.join(" ").trim().to_string(),
    }
}

/// One `"{name} - {description}"` line per entry, newline-joined.
pub fn render_catalog(entries: &[DomainEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{} - {}", entry.name, entry.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads the domain and description columns of the domains sheet.
pub fn domain_rows_from_sheet(sheet: &Sheet) -> Result<Vec<DomainRow>> {
    let domain_col = sheet
        .column_index(DOMAIN_COLUMN)
        .or_else(|| sheet.column_index(LEGACY_DOMAIN_COLUMN))
        .ok_or_else(|| ClassifierError::MissingColumnError {
            sheet: sheet.name.clone(),
            column: DOMAIN_COLUMN.to_string(),
        })?;
    let description_col = sheet.column_index(DESCRIPTION_COLUMN).ok_or_else(|| {
        ClassifierError::MissingColumnError {
            sheet: sheet.name.clone(),
            column: DESCRIPTION_COLUMN.to_string(),
        }
    })?;

    Ok((0..sheet.rows.len())
        .map(|row| DomainRow {
            domain: sheet.cell(row, domain_col).as_trimmed_text(),
            description: sheet.cell(row, description_col).as_trimmed_text(),
        })
        .collect())
}
