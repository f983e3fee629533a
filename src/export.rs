use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use crate::aggregate::format_average;
use crate::format::TabularFormat;
use crate::models::{StudentRow, TableData, AVERAGE_COLUMN, IDENTITY_COLUMN, STATUS_COLUMN};

/// Projection written to the download artifact: exactly
/// {identity, rounded average, status}, in that column order.
pub fn projection(rows: &[StudentRow]) -> TableData {
    TableData::new(
        vec![
            IDENTITY_COLUMN.to_string(),
            AVERAGE_COLUMN.to_string(),
            STATUS_COLUMN.to_string(),
        ],
        rows.iter()
            .map(|row| {
                vec![
                    row.identity.clone(),
                    format_average(row.average),
                    row.status.label().to_string(),
                ]
            })
            .collect(),
    )
}

/// Writes the reduced result table as the spreadsheet download artifact.
pub fn export_results(rows: &[StudentRow]) -> anyhow::Result<PathBuf> {
    write_artifact(&projection(rows), TabularFormat::Spreadsheet)
}

/// Best-effort fallback when no grade columns were found: the full raw
/// table, as CSV, with no derived columns.
pub fn export_raw(table: &TableData) -> anyhow::Result<PathBuf> {
    write_artifact(table, TabularFormat::Csv)
}

/// One fresh temp file per invocation, persisted so the caller can hand it
/// out for download. Cleanup of stale artifacts is left to the caller/OS.
fn write_artifact(table: &TableData, format: TabularFormat) -> anyhow::Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("gradebook-")
        .suffix(format.suffix())
        .tempfile()
        .context("failed to create temp file for the download artifact")?;
    let path = file
        .into_temp_path()
        .keep()
        .context("failed to persist the download artifact")?;

    format.write(table, &path)?;
    info!(path = %path.display(), "export artifact written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    fn sample_rows() -> Vec<StudentRow> {
        vec![
            StudentRow {
                identity: "Ana".to_string(),
                grades: vec![Some(4.0), Some(5.0), Some(3.0)],
                average: 4.0,
                status: Status::Passing,
            },
            StudentRow {
                identity: "Luis".to_string(),
                grades: vec![Some(2.0), Some(1.0), Some(2.0)],
                average: 1.67,
                status: Status::Failing,
            },
            StudentRow {
                identity: "Eva".to_string(),
                grades: vec![None, None],
                average: f64::NAN,
                status: Status::Failing,
            },
        ]
    }

    #[test]
    fn projection_has_exactly_three_columns_in_order() {
        let table = projection(&sample_rows());
        assert_eq!(
            table.columns,
            vec![IDENTITY_COLUMN, AVERAGE_COLUMN, STATUS_COLUMN]
        );
        assert_eq!(table.rows[0], vec!["Ana", "4.00", "Passing"]);
        assert_eq!(table.rows[1], vec!["Luis", "1.67", "Failing"]);
        assert_eq!(table.rows[2], vec!["Eva", "NaN", "Failing"]);
    }

    #[test]
    fn exported_artifact_round_trips() {
        let rows = sample_rows();
        let path = export_results(&rows).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("xlsx"));

        let bytes = std::fs::read(&path).unwrap();
        let reloaded = TabularFormat::Spreadsheet.read(&bytes).unwrap();
        let expected = projection(&rows);

        assert_eq!(reloaded.columns, expected.columns);
        assert_eq!(reloaded.rows.len(), expected.rows.len());
        for (reloaded_row, expected_row) in reloaded.rows.iter().zip(&expected.rows) {
            assert_eq!(reloaded_row[0], expected_row[0]);
            assert_eq!(reloaded_row[2], expected_row[2]);
            // Averages compare numerically: the spreadsheet stores real
            // numeric cells, so "4.00" comes back as "4".
            match expected_row[1].parse::<f64>() {
                Ok(expected_avg) if expected_avg.is_finite() => {
                    let reloaded_avg: f64 = reloaded_row[1].parse().unwrap();
                    assert!((reloaded_avg - expected_avg).abs() < 1e-9);
                }
                _ => assert_eq!(reloaded_row[1], "NaN"),
            }
        }

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn raw_export_is_csv_and_unreduced() {
        let table = TableData::new(
            vec![IDENTITY_COLUMN.to_string(), "Notes".to_string()],
            vec![vec!["Ana".to_string(), "good".to_string()]],
        );
        let path = export_raw(&table).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));

        let bytes = std::fs::read(&path).unwrap();
        let reloaded = TabularFormat::Csv.read(&bytes).unwrap();
        assert_eq!(reloaded, table);

        std::fs::remove_file(path).unwrap();
    }
}
