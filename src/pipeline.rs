use tracing::{info, warn};

use crate::aggregate::{self, format_average};
use crate::columns::{self, ColumnScan};
use crate::error::PipelineError;
use crate::export;
use crate::format::TabularFormat;
use crate::models::{
    AnalysisOutput, StudentRow, TableData, AVERAGE_COLUMN, IDENTITY_COLUMN, STATUS_COLUMN,
};
use crate::summary;

const NO_GRADE_COLUMNS_WARNING: &str =
    "No numeric grade columns were found. Make sure grades are in the second column onward and in numeric format.";

/// The pure pipeline boundary: raw upload bytes plus the file extension in,
/// output triple out. No error ever escapes; every failure becomes a
/// diagnostic table with no artifact and no chart.
pub fn analyze(bytes: &[u8], extension: &str) -> AnalysisOutput {
    match run(bytes, extension) {
        Ok(output) => output,
        Err(error) => {
            warn!(%error, "upload could not be processed");
            AnalysisOutput {
                table: error.diagnostic_table(),
                artifact: None,
                chart: None,
            }
        }
    }
}

fn run(bytes: &[u8], extension: &str) -> Result<AnalysisOutput, PipelineError> {
    let format = TabularFormat::from_extension(extension).ok_or_else(|| {
        PipelineError::UnsupportedFormat(extension.trim_start_matches('.').to_lowercase())
    })?;

    let raw = format.read(bytes)?;
    info!(
        columns = raw.columns.len(),
        rows = raw.rows.len(),
        "upload loaded"
    );

    let scan = columns::scan(&raw);
    if scan.grade_columns().is_empty() {
        return Ok(no_grade_columns_output(&scan));
    }

    let students = aggregate::aggregate(&scan);
    let groups = summary::summarize(&students);
    let chart = summary::chart_spec(&groups);
    let artifact = export::export_results(&students)
        .map_err(|e| PipelineError::Processing(e.to_string()))?;

    info!(students = students.len(), "analysis complete");
    Ok(AnalysisOutput {
        table: annotated_table(&scan, &students),
        artifact: Some(artifact),
        chart: Some(chart),
    })
}

/// Short-circuit for uploads with no usable grade columns: warn the user,
/// still hand back the raw table for download, skip the chart.
fn no_grade_columns_output(scan: &ColumnScan) -> AnalysisOutput {
    warn!("no numeric grade columns found in the upload");
    let normalized = scan.normalized_table();

    let artifact = match export::export_raw(&normalized) {
        Ok(path) => Some(path),
        Err(error) => {
            warn!(%error, "best-effort raw export failed");
            None
        }
    };

    AnalysisOutput {
        table: warning_table(normalized),
        artifact,
        chart: None,
    }
}

/// The original table prefixed with a warning row in the first cell.
fn warning_table(mut table: TableData) -> TableData {
    let mut warning_row = vec![NO_GRADE_COLUMNS_WARNING.to_string()];
    warning_row.resize(table.columns.len().max(1), String::new());
    table.rows.insert(0, warning_row);
    table
}

/// The full annotated display table: identity, the uploaded cells as text,
/// then the derived average and status columns.
fn annotated_table(scan: &ColumnScan, students: &[StudentRow]) -> TableData {
    let mut columns = vec![IDENTITY_COLUMN.to_string()];
    columns.extend(scan.columns.iter().map(|c| c.name.clone()));
    columns.push(AVERAGE_COLUMN.to_string());
    columns.push(STATUS_COLUMN.to_string());

    let rows = students
        .iter()
        .enumerate()
        .map(|(i, student)| {
            let mut row = vec![student.identity.clone()];
            row.extend(scan.columns.iter().map(|c| c.raw[i].clone()));
            row.push(format_average(student.average));
            row.push(student.status.label().to_string());
            row
        })
        .collect();

    TableData::new(columns, rows)
}
