use std::io::Cursor;
use std::path::Path;

use calamine::{DataType, Reader, Xlsx};
use rust_xlsxwriter::Workbook;

use crate::error::PipelineError;
use crate::models::TableData;

/// The two tabular formats the pipeline understands. Reading and writing go
/// through this capability so the rest of the pipeline never branches on a
/// concrete format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    Spreadsheet,
}

impl TabularFormat {
    /// Case-insensitive dispatch on the file extension (without the dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Some(TabularFormat::Csv),
            "xlsx" => Some(TabularFormat::Spreadsheet),
            _ => None,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            TabularFormat::Csv => ".csv",
            TabularFormat::Spreadsheet => ".xlsx",
        }
    }

    /// Parses raw bytes into a table. The first row is the column schema,
    /// every following row is data. Zero bytes or zero data rows is
    /// `EmptyInput`; a structural parse error carries the parser's message.
    pub fn read(self, bytes: &[u8]) -> Result<TableData, PipelineError> {
        if bytes.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let table = match self {
            TabularFormat::Csv => read_csv(bytes)?,
            TabularFormat::Spreadsheet => read_xlsx(bytes)?,
        };

        if table.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        Ok(table)
    }

    /// Serializes a table to disk. Cells that parse as finite numbers are
    /// written as numbers in the spreadsheet variant so consumers see real
    /// numeric cells.
    pub fn write(self, table: &TableData, path: &Path) -> anyhow::Result<()> {
        match self {
            TabularFormat::Csv => write_csv(table, path),
            TabularFormat::Spreadsheet => write_xlsx(table, path),
        }
    }
}

fn read_csv(bytes: &[u8]) -> Result<TableData, PipelineError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(bytes);
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::ParseFailure(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| PipelineError::ParseFailure(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(TableData::new(columns, rows))
}

fn read_xlsx(bytes: &[u8]) -> Result<TableData, PipelineError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| PipelineError::ParseFailure(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(PipelineError::EmptyInput)?
        .map_err(|e| PipelineError::ParseFailure(e.to_string()))?;

    let mut rows = range.rows().map(|row| {
        row.iter()
            .map(|cell| {
                cell.as_string()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| cell.to_string())
            })
            .collect::<Vec<String>>()
    });

    let columns = rows.next().unwrap_or_default();
    Ok(TableData::new(columns, rows.collect()))
}

fn write_csv(table: &TableData, path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(table: &TableData, path: &Path) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in table.columns.iter().enumerate() {
        sheet.write_string(0, col as u16, name.as_str())?;
    }
    for (r, row) in table.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    sheet.write_number((r + 1) as u32, c as u16, value)?;
                }
                _ => {
                    sheet.write_string((r + 1) as u32, c as u16, cell.as_str())?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
