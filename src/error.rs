use thiserror::Error;

use crate::models::TableData;

/// Everything that can stop the pipeline short of the annotated table.
/// Each variant maps to a diagnostic table at the pipeline boundary; none
/// of them ever reaches the caller as an error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsupported file format \".{0}\". Please upload a CSV or XLSX file.")]
    UnsupportedFormat(String),
    #[error("The file is empty.")]
    EmptyInput,
    #[error("Could not parse the file. Check that the format is valid: {0}")]
    ParseFailure(String),
    #[error("Could not process the file: {0}")]
    Processing(String),
}

impl PipelineError {
    /// The single-column table shown to the user in place of results.
    pub fn diagnostic_table(&self) -> TableData {
        TableData::message("Error", self.to_string())
    }
}
