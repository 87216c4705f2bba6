//! Canonical column layout of the persisted log and the normalize step that
//! brings older tables up to it.

use crate::{Error, Result};
use csv::StringRecord;

/// One column of the persisted table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// Other header names accepted on load (Japanese headers of older logs)
    pub aliases: &'static [&'static str],
    /// Value used when the column is absent or the cell is empty.
    /// Columns without a default are required.
    pub default: Option<&'static str>,
}

impl ColumnSpec {
    const fn required(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases,
            default: None,
        }
    }

    const fn optional(
        name: &'static str,
        aliases: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            aliases,
            default: Some(default),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Whether a source header names this column
    pub fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        header == self.name || self.aliases.contains(&header)
    }
}

/// Canonical columns, in on-disk order
pub const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::required("timestamp", &["日時"]),
    ColumnSpec::required("height_m", &["身長(m)"]),
    ColumnSpec::required("weight_kg", &["体重(kg)"]),
    ColumnSpec::required("waist_cm", &["腹囲(cm)"]),
    ColumnSpec::required("bmi", &["BMI"]),
    ColumnSpec::required("gender", &["性別"]),
    ColumnSpec::optional("running_km", &["ランニング(km)"], "0.0"),
    ColumnSpec::optional("cycling_km", &["自転車(km)"], "0.0"),
    ColumnSpec::optional("swimming_km", &["水泳(km)"], "0.0"),
];

/// The canonical header row
pub fn header() -> StringRecord {
    COLUMNS.iter().map(|c| c.name).collect()
}

/// Rewrite `rows` (laid out per `source_headers`) into the canonical layout.
///
/// Headers match by canonical name or alias. Missing optional columns and
/// empty optional cells take the column default. A missing required column is
/// a schema error. Unknown columns are dropped.
pub fn normalize(source_headers: &StringRecord, rows: &[StringRecord]) -> Result<Vec<StringRecord>> {
    let mut positions = Vec::with_capacity(COLUMNS.len());
    for column in COLUMNS {
        let position = source_headers
            .iter()
            .position(|h| column.matches(h));
        match (position, column.default) {
            (None, None) => {
                return Err(Error::Schema(format!(
                    "required column '{}' missing from stored log",
                    column.name
                )));
            }
            (None, Some(default)) => {
                tracing::warn!(
                    "Column '{}' missing from stored log, backfilling {} rows with {}",
                    column.name,
                    rows.len(),
                    default
                );
            }
            (Some(_), _) => {}
        }
        positions.push(position);
    }

    for name in source_headers.iter() {
        if !COLUMNS.iter().any(|c| c.matches(name)) {
            tracing::debug!("Ignoring unknown column '{}'", name);
        }
    }

    let normalized = rows
        .iter()
        .map(|row| {
            COLUMNS
                .iter()
                .zip(&positions)
                .map(|(column, position)| {
                    let cell = position.and_then(|i| row.get(i)).unwrap_or("").trim();
                    match column.default {
                        Some(default) if cell.is_empty() => default,
                        _ => cell,
                    }
                })
                .collect::<StringRecord>()
        })
        .collect();

    Ok(normalized)
}
