//! Error types for dataset validation and statistical analysis.
//!
//! Each variant captures a specific failure mode of the analysis pipeline.
//! Orchestration code wraps these in `anyhow::Error`, so callers that care
//! about the variant can recover it with `downcast_ref::<AnalysisError>()`.

use thiserror::Error;

/// Errors raised while validating a dataset or fitting a statistic to it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A requested column does not exist in the dataset.
    #[error("Column '{column}' not found in dataset. Available columns: {available:?}")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// The input file is missing one or more columns of the wine schema.
    #[error("Dataset is missing required column(s) {missing:?}. Found columns: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// A column that must be numeric could not be interpreted as numbers.
    #[error("Column '{column}' is not numeric (found type {dtype})")]
    NonNumericColumn { column: String, dtype: String },

    /// A schema column contains null or non-finite values.
    #[error("Column '{column}' contains {count} missing or non-finite value(s)")]
    MissingValues { column: String, count: usize },

    /// A quality score fell outside the 0-10 scale.
    #[error("Quality score {value} at row {row} is outside the 0-10 scale")]
    QualityOutOfRange { value: i64, row: usize },

    /// Not enough observations for the requested computation.
    #[error("Insufficient data: need at least {required} observation(s), got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// The normal-equations matrix could not be factorised.
    #[error("Design matrix is singular; predictors {predictors:?} are collinear or constant")]
    SingularMatrix { predictors: Vec<String> },

    /// A binary target contains only one class.
    #[error("Binary target '{target}' contains a single class; cannot fit a classifier")]
    SingleClass { target: String },
}
