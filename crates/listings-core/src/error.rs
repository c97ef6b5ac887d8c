// File: crates/listings-core/src/error.rs
// Summary: Error kinds for dataset loading (startup-fatal) and recipe validation (per request).

use std::path::PathBuf;

use crate::recipe::ChartKind;

/// Failure while loading the listings table. The process cannot serve any view without data.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("line {line}: column `{column}` is not a number: {value:?}")]
    InvalidNumber { line: u64, column: &'static str, value: String },
    #[error("line {line}: negative price {price}")]
    NegativePrice { line: u64, price: f64 },
}

/// A recipe that cannot be applied. Deterministic, so callers report it rather than retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecipeError {
    #[error("unknown column `{0}`")]
    UnknownColumn(String),
    #[error("unknown view `{0}`")]
    UnknownView(String),
    #[error("column `{0}` holds continuous values and cannot be grouped on")]
    NotGroupable(&'static str),
    #[error("{reduction} needs a numeric value column, `{column}` is categorical")]
    NonNumericValue { reduction: &'static str, column: &'static str },
    #[error("{kind} chart takes {expected} grouping column(s), got {got}")]
    Dimensions { kind: ChartKind, expected: &'static str, got: usize },
    #[error("scatter chart needs a point encoding")]
    MissingEncoding,
    #[error("point encoding only applies to scatter charts, not {0}")]
    UnexpectedEncoding(ChartKind),
    #[error("top-N truncation needs N >= 1")]
    ZeroLimit,
}
