//! Typed failures raised while loading and summarising trip data.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum BikeshareError {
    #[error("'{path}' has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },
    #[error("row {row}: cannot parse start time '{value}'")]
    InvalidTimestamp { row: usize, value: String },
    #[error("row {row}: cannot parse {column} '{value}' as a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
    #[error("no values in column '{column}' to summarise")]
    EmptySeries { column: String },
    #[error("input closed while waiting for: {prompt}")]
    InputClosed { prompt: String },
}
