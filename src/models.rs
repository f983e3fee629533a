use std::path::PathBuf;

use serde::Serialize;

/// Every student whose rounded grade average reaches this value passes.
pub const PASSING_THRESHOLD: f64 = 3.0;

/// Canonical name given to column 0 of every uploaded table.
pub const IDENTITY_COLUMN: &str = "Student Name";
pub const AVERAGE_COLUMN: &str = "Grade Average";
pub const STATUS_COLUMN: &str = "Status";

/// A plain grid of string cells with named columns. Serves as the loader
/// output, the diagnostic/display tables, and the exporter input.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Single-column table carrying one user-facing message.
    pub fn message(column: &str, message: String) -> Self {
        Self {
            columns: vec![column.to_string()],
            rows: vec![vec![message]],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Passing,
    Failing,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Passing => "Passing",
            Status::Failing => "Failing",
        }
    }

    /// Bar color used by the chart spec for this status.
    pub fn color(self) -> &'static str {
        match self {
            Status::Passing => "lightgreen",
            Status::Failing => "salmon",
        }
    }
}

/// One student after aggregation: identity, per-grade-column values aligned
/// with the classifier's grade column names (`None` = missing), the
/// destructively rounded average, and the derived status.
#[derive(Debug, Clone)]
pub struct StudentRow {
    pub identity: String,
    pub grades: Vec<Option<f64>>,
    pub average: f64,
    pub status: Status,
}

/// Records grouped by status, in first-seen order within the table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryGroup {
    pub status: Status,
    pub count: usize,
    pub members: Vec<String>,
}

/// Render-agnostic description of the categorical bar chart. The
/// presentation layer decides how to draw it.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub kind: &'static str,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    /// Upper bound for the y axis, padded past the tallest bar.
    pub y_max: f64,
    pub bars: Vec<ChartBar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartBar {
    pub label: &'static str,
    pub count: usize,
    pub color: &'static str,
    pub members: Vec<String>,
    /// Member identities joined for hover/tooltip display.
    pub hover: String,
}

/// The output triple. Every invocation produces exactly these three values;
/// failures surface as a diagnostic table, never as a panic or error.
#[derive(Debug)]
pub struct AnalysisOutput {
    pub table: TableData,
    pub artifact: Option<PathBuf>,
    pub chart: Option<ChartSpec>,
}

impl AnalysisOutput {
    /// Result for the "no file supplied" case.
    pub fn empty() -> Self {
        Self {
            table: TableData::new(Vec::new(), Vec::new()),
            artifact: None,
            chart: None,
        }
    }
}
