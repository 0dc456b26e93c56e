//! Column profiling: what kind of value each column actually holds.

use serde::Serialize;
use tracing::debug;

use crate::process::{CellValue, RawRow};

const SAMPLE_ROWS: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Number,
    Text,
    Mixed,
    /// No non-empty sample seen.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    /// Non-empty samples scanned.
    pub samples: usize,
    /// Rows that lacked the column entirely.
    pub missing: usize,
}

/// For each header, look through up to the first 1 000 rows and classify the
/// non-empty values. Any disagreement marks the column `Mixed`.
pub fn derive_column_kinds(headers: &[String], rows: &[RawRow]) -> Vec<ColumnProfile> {
    let mut profiles: Vec<ColumnProfile> = Vec::with_capacity(headers.len());

    for name in headers {
        // duplicate headers collapse into one column
        if profiles.iter().any(|p| &p.name == name) {
            continue;
        }

        let mut seen: Option<ColumnKind> = None;
        let mut samples = 0;
        let mut missing = 0;

        for row in rows.iter().take(SAMPLE_ROWS) {
            let kind = match row.get(name) {
                CellValue::Missing => {
                    missing += 1;
                    continue;
                }
                CellValue::Text(s) if s.is_empty() => continue,
                CellValue::Text(_) => ColumnKind::Text,
                CellValue::Number(_) => ColumnKind::Number,
            };
            samples += 1;

            seen = match seen {
                None => Some(kind),
                Some(prev) if prev == kind => Some(prev),
                Some(prev) => {
                    if prev != ColumnKind::Mixed {
                        debug!(column = %name, ?prev, ?kind, "conflicting value kinds");
                    }
                    Some(ColumnKind::Mixed)
                }
            };
        }

        profiles.push(ColumnProfile {
            name: name.clone(),
            kind: seen.unwrap_or(ColumnKind::Empty),
            samples,
            missing,
        });
    }

    profiles
}
