//! Pearson correlation between dataset columns

use anyhow::Result;
use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::error::AnalysisError;
use super::loader::{column_values, numeric_columns};

/// Represents a correlated pair of columns
#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Square matrix of pairwise Pearson correlations
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major coefficients; `values[i][j]` is corr(columns[i], columns[j])
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Coefficient between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Off-diagonal pairs with |r| above `threshold`, strongest first
    pub fn pairs_above(&self, threshold: f64) -> Vec<CorrelatedPair> {
        let n = self.len();
        let mut pairs = Vec::new();

        // Extract upper triangle
        for i in 0..n {
            for j in (i + 1)..n {
                let corr = self.values[i][j];
                if corr.abs() > threshold && !corr.is_nan() {
                    pairs.push(CorrelatedPair {
                        feature1: self.columns[i].clone(),
                        feature2: self.columns[j].clone(),
                        correlation: corr,
                    });
                }
            }
        }

        sort_by_strength(&mut pairs);
        pairs
    }
}

fn sort_by_strength(pairs: &mut [CorrelatedPair]) {
    pairs.sort_by(|a, b| {
        b.correlation
            .abs()
            .partial_cmp(&a.correlation.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Pearson correlation using Welford's single-pass algorithm.
///
/// Returns `None` on length mismatch, fewer than two values, or a constant input.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }

    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (&xi, &yi) in x.iter().zip(y.iter()) {
        count += 1.0;
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        mean_x += dx / count;
        mean_y += dy / count;
        var_x += dx * (xi - mean_x);
        var_y += dy * (yi - mean_y);
        cov_xy += dx * (yi - mean_y);
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some((cov_xy / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Standardize a column to zero mean and unit norm, so that the dot product
/// of two standardized columns is their correlation
fn standardize(values: &[f64]) -> Option<Vec<f64>> {
    let n = values.len() as f64;
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    if ss <= 0.0 {
        return None; // Constant column
    }
    let norm = ss.sqrt();
    Some(values.iter().map(|v| (v - mean) / norm).collect())
}

/// Compute the correlation matrix of the given columns.
///
/// Builds the standardized data matrix Z (rows x columns) and takes Z^T * Z.
/// Constant columns produce NaN coefficients off the diagonal.
pub fn correlation_matrix(df: &DataFrame, columns: &[String]) -> Result<CorrelationMatrix> {
    let n_cols = columns.len();
    let n_rows = df.height();
    if n_rows < 2 {
        return Err(AnalysisError::InsufficientData {
            required: 2,
            actual: n_rows,
        }
        .into());
    }

    let raw: Vec<Vec<f64>> = columns
        .iter()
        .map(|name| column_values(df, name))
        .collect::<Result<_>>()?;

    let standardized: Vec<Option<Vec<f64>>> = raw.par_iter().map(|v| standardize(v)).collect();

    let mut z = Mat::<f64>::zeros(n_rows, n_cols);
    for (col_idx, col) in standardized.iter().enumerate() {
        if let Some(col) = col {
            for (row_idx, &val) in col.iter().enumerate() {
                z[(row_idx, col_idx)] = val;
            }
        }
    }

    let product = z.transpose() * &z;

    let values = (0..n_cols)
        .map(|i| {
            (0..n_cols)
                .map(|j| match (&standardized[i], &standardized[j]) {
                    _ if i == j => 1.0,
                    (Some(_), Some(_)) => product[(i, j)].clamp(-1.0, 1.0),
                    _ => f64::NAN,
                })
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

/// Correlation matrix over every numeric column of the frame
pub fn numeric_correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    correlation_matrix(df, &numeric_columns(df))
}

/// Correlation of every other numeric column with `target`, strongest first
pub fn correlations_with(df: &DataFrame, target: &str) -> Result<Vec<CorrelatedPair>> {
    let target_values = column_values(df, target)?;

    let mut pairs: Vec<CorrelatedPair> = numeric_columns(df)
        .into_iter()
        .filter(|name| name != target)
        .map(|name| -> Result<Option<CorrelatedPair>> {
            let values = column_values(df, &name)?;
            Ok(pearson(&values, &target_values).map(|correlation| CorrelatedPair {
                feature1: name,
                feature2: target.to_string(),
                correlation,
            }))
        })
        .filter_map(|r| r.transpose())
        .collect::<Result<_>>()?;

    sort_by_strength(&mut pairs);
    Ok(pairs)
}
