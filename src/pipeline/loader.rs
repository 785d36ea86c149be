//! Dataset loader for wine quality CSV files
//!
//! Loads a CSV into a polars `DataFrame` and maps its headers onto the
//! canonical wine schema. Columns outside the schema (such as the unnamed
//! row index written by R or pandas) are dropped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::error::AnalysisError;
use crate::utils::{create_spinner, finish_with_success};

/// The eleven physicochemical measurements, in file order
pub const FEATURE_COLUMNS: [&str; 11] = [
    "fixed_acidity",
    "volatile_acidity",
    "citric_acid",
    "residual_sugar",
    "chlorides",
    "free_sulfur_dioxide",
    "total_sulfur_dioxide",
    "density",
    "pH",
    "sulphates",
    "alcohol",
];

/// Integer quality score column (0-10)
pub const QUALITY_COLUMN: &str = "quality";

/// Highest quality score on the tasting scale
pub const MAX_QUALITY: i64 = 10;

/// Options controlling how the CSV is parsed
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field separator. Detected from the header line when `None`.
    pub separator: Option<u8>,
    /// Number of rows used for schema inference (0 = full scan)
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            separator: None,
            infer_schema_length: 10000,
        }
    }
}

/// Shape and size of a loaded dataset
#[derive(Debug, Clone, Copy)]
pub struct LoadStats {
    pub rows: usize,
    pub columns: usize,
    pub memory_mb: f64,
}

/// Map a raw header onto its lookup key: lowercase with `.`, `-` and spaces
/// folded to underscores.
///
/// `"fixed.acidity"`, `"Fixed Acidity"` and `"fixed_acidity"` all normalize
/// to `"fixed_acidity"`.
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '.' | ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Detect the field separator from the header line.
///
/// The UCI distribution of this dataset is semicolon separated, R exports
/// are comma separated.
pub fn detect_separator(path: &Path) -> Result<u8> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    let mut header = String::new();
    BufReader::new(file)
        .read_line(&mut header)
        .with_context(|| format!("Failed to read header of {}", path.display()))?;

    if header.contains(';') && !header.contains(',') {
        Ok(b';')
    } else {
        Ok(b',')
    }
}

fn ensure_csv(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" | "txt" => Ok(()),
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv",
            extension
        ),
    }
}

fn read_raw(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    ensure_csv(path)?;
    let separator = match options.separator {
        Some(sep) => sep,
        None => detect_separator(path)?,
    };
    let infer_length = match options.infer_schema_length {
        0 => None,
        n => Some(n),
    };
    log::debug!(
        "Reading {} (separator {:?}, infer_schema_length {:?})",
        path.display(),
        separator as char,
        infer_length
    );

    LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(separator)
        .with_infer_schema_length(infer_length)
        .finish()
        .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        .collect()
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}

/// Load a wine dataset and validate it against the canonical schema
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let raw = read_raw(path, options)?;
    canonicalize(&raw)
}

/// Load a wine dataset behind a spinner, returning shape statistics
pub fn load_dataset_with_progress(
    path: &Path,
    options: &LoadOptions,
) -> Result<(DataFrame, LoadStats)> {
    let spinner = create_spinner(&format!("Loading {}...", path.display()));
    let df = load_dataset(path, options)?;
    finish_with_success(&spinner, "Dataset loaded");

    let (rows, columns) = df.shape();
    let stats = LoadStats {
        rows,
        columns,
        memory_mb: df.estimated_size() as f64 / (1024.0 * 1024.0),
    };
    Ok((df, stats))
}

/// Get the raw header names of a CSV file without validating the schema
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let options = LoadOptions {
        infer_schema_length: 100,
        ..Default::default()
    };
    let df = read_raw(path, &options)?;
    Ok(df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect())
}

/// Rebuild the frame with canonical names and types, in schema order
fn canonicalize(raw: &DataFrame) -> Result<DataFrame> {
    let found: Vec<String> = raw
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(FEATURE_COLUMNS.len() + 1);
    let mut matched: Vec<&str> = Vec::with_capacity(FEATURE_COLUMNS.len() + 1);
    let mut missing: Vec<String> = Vec::new();

    for canonical in FEATURE_COLUMNS.iter().chain(std::iter::once(&QUALITY_COLUMN)) {
        let key = normalize_column_name(canonical);
        let Some(source) = found.iter().find(|name| normalize_column_name(name) == key) else {
            missing.push(canonical.to_string());
            continue;
        };
        matched.push(source.as_str());

        let values = non_null_values(raw, source)?;
        let column = if *canonical == QUALITY_COLUMN {
            Column::new(QUALITY_COLUMN.into(), quality_scores(&values)?)
        } else {
            Column::new((*canonical).into(), values)
        };
        columns.push(column);
    }

    if !missing.is_empty() {
        return Err(AnalysisError::MissingColumns { missing, found }.into());
    }

    for extra in found.iter().filter(|name| !matched.contains(&name.as_str())) {
        log::debug!("Dropping non-schema column '{}'", extra);
    }

    DataFrame::new(columns).context("Failed to assemble canonical wine dataset")
}

/// Numeric values of a column, rejecting non-numeric types and missing or
/// non-finite entries
fn non_null_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name)?;
    if !column.dtype().is_primitive_numeric() {
        return Err(AnalysisError::NonNumericColumn {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        }
        .into());
    }
    let nulls = column.null_count();
    if nulls > 0 {
        return Err(AnalysisError::MissingValues {
            column: name.to_string(),
            count: nulls,
        }
        .into());
    }

    let cast = column.cast(&DataType::Float64)?;
    let values: Vec<f64> = cast.f64()?.into_iter().flatten().collect();
    let non_finite = values.iter().filter(|v| !v.is_finite()).count();
    if non_finite > 0 {
        return Err(AnalysisError::MissingValues {
            column: name.to_string(),
            count: non_finite,
        }
        .into());
    }
    Ok(values)
}

fn quality_scores(values: &[f64]) -> Result<Vec<i64>> {
    values
        .iter()
        .enumerate()
        .map(|(row, &v)| {
            let score = v.round() as i64;
            if !v.is_finite()
                || (v - score as f64).abs() > 1e-9
                || !(0..=MAX_QUALITY).contains(&score)
            {
                Err(AnalysisError::QualityOutOfRange { value: score, row }.into())
            } else {
                Ok(score)
            }
        })
        .collect()
}

/// Numeric values of a column as `f64`, in row order.
///
/// Fails with [`AnalysisError::ColumnNotFound`] when the column is absent and
/// [`AnalysisError::NonNumericColumn`] when it holds non-numeric data.
/// Nulls are skipped.
pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name).map_err(|_| AnalysisError::ColumnNotFound {
        column: name.to_string(),
        available: df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })?;

    if !column.dtype().is_primitive_numeric() {
        return Err(AnalysisError::NonNumericColumn {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        }
        .into());
    }

    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().flatten().collect())
}

/// Names of the numeric columns of the frame, in frame order
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .map(|col| col.name().to_string())
        .collect()
}
