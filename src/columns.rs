use tracing::debug;

use crate::models::{TableData, IDENTITY_COLUMN};

/// One candidate grade column after the typed scan: the original text cells,
/// the coerced values (`None` = missing), and the tally that decides whether
/// it counts as a grade column.
#[derive(Debug, Clone)]
pub struct ScannedColumn {
    pub name: String,
    pub raw: Vec<String>,
    pub values: Vec<Option<f64>>,
    pub numeric_count: usize,
}

impl ScannedColumn {
    /// A column is a grade column iff at least one cell coerced to a finite
    /// number. A column of nothing but missing cells is excluded.
    pub fn is_grade_column(&self) -> bool {
        self.numeric_count > 0
    }

    pub fn missing_count(&self) -> usize {
        self.values.len() - self.numeric_count
    }
}

/// The classified upload: column 0 renamed to the canonical identity column
/// and kept as strings, every remaining column scanned cell-by-cell.
#[derive(Debug, Clone)]
pub struct ColumnScan {
    pub identities: Vec<String>,
    pub columns: Vec<ScannedColumn>,
}

impl ColumnScan {
    pub fn grade_columns(&self) -> Vec<&ScannedColumn> {
        self.columns.iter().filter(|c| c.is_grade_column()).collect()
    }

    /// The uploaded table with only the identity rename applied. Used for
    /// the no-grade-columns diagnostic and its best-effort export.
    pub fn normalized_table(&self) -> TableData {
        let mut columns = vec![IDENTITY_COLUMN.to_string()];
        columns.extend(self.columns.iter().map(|c| c.name.clone()));

        let rows = self
            .identities
            .iter()
            .enumerate()
            .map(|(i, identity)| {
                let mut row = vec![identity.clone()];
                row.extend(self.columns.iter().map(|c| c.raw[i].clone()));
                row
            })
            .collect();

        TableData::new(columns, rows)
    }
}

/// Numeric coercion for one cell. Empty, unparsable, and non-finite cells
/// are all missing; missing is never an error.
pub fn coerce_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Two-phase scan over a loaded table: coerce every cell of columns 1..N,
/// tally numeric hits per column, and let the tally decide classification.
pub fn scan(table: &TableData) -> ColumnScan {
    let identities = table
        .rows
        .iter()
        .map(|row| row.first().cloned().unwrap_or_default())
        .collect();

    let mut columns = Vec::new();
    for (index, name) in table.columns.iter().enumerate().skip(1) {
        let raw: Vec<String> = table
            .rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect();
        let values: Vec<Option<f64>> = raw.iter().map(|cell| coerce_cell(cell)).collect();
        let numeric_count = values.iter().filter(|v| v.is_some()).count();

        debug!(
            column = name.as_str(),
            numeric = numeric_count,
            missing = values.len() - numeric_count,
            "scanned candidate grade column"
        );

        columns.push(ScannedColumn {
            name: name.clone(),
            raw,
            values,
            numeric_count,
        });
    }

    ColumnScan { identities, columns }
}
