//! Descriptive statistics for dataset columns

use std::collections::BTreeMap;

use anyhow::Result;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::error::AnalysisError;
use super::loader::{column_values, numeric_columns, QUALITY_COLUMN};
use super::rating::{quality_scores, rating_column, Rating};

/// Tukey fence multiplier for outlier detection
const IQR_FENCE: f64 = 1.5;

/// Descriptive statistics of a single numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub mean: f64,
    pub q3: f64,
    pub max: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
}

impl ColumnSummary {
    /// Compute the summary of a slice of values.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_values(column: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std_dev = if n > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            0.0
        };

        Some(Self {
            column: column.to_string(),
            count: n,
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            mean,
            q3: quantile(&sorted, 0.75),
            max: sorted[n - 1],
            std_dev,
        })
    }

    /// Interquartile range (q3 - q1)
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Lower and upper Tukey fences
    pub fn fences(&self) -> (f64, f64) {
        let iqr = self.iqr();
        (self.q1 - IQR_FENCE * iqr, self.q3 + IQR_FENCE * iqr)
    }
}

/// Quantile of pre-sorted values by linear interpolation between order
/// statistics (the R type 7 / pandas default estimator).
///
/// `p` is clamped to [0, 1]. Returns NaN for an empty slice.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let p = p.clamp(0.0, 1.0);
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Summarize one column of the dataset
pub fn describe_column(df: &DataFrame, name: &str) -> Result<ColumnSummary> {
    let values = column_values(df, name)?;
    ColumnSummary::from_values(name, &values).ok_or_else(|| {
        AnalysisError::InsufficientData {
            required: 1,
            actual: 0,
        }
        .into()
    })
}

/// Summarize every numeric column, in frame order.
///
/// Columns are summarized in parallel; the result order is deterministic.
pub fn describe_all(df: &DataFrame) -> Result<Vec<ColumnSummary>> {
    numeric_columns(df)
        .par_iter()
        .map(|name| describe_column(df, name))
        .collect()
}

/// Frequency of each quality score, ascending by score
pub fn value_counts(df: &DataFrame, name: &str) -> Result<Vec<(i64, usize)>> {
    let values: Vec<i64> = if name == QUALITY_COLUMN {
        quality_scores(df)?
    } else {
        column_values(df, name)?
            .into_iter()
            .map(|v| v.round() as i64)
            .collect()
    };

    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    Ok(counts.into_iter().collect())
}

/// Number of observations per rating, in rating order (zero counts included)
pub fn rating_counts(df: &DataFrame) -> Result<Vec<(Rating, usize)>> {
    let ratings = rating_column(df)?;
    Ok(Rating::ALL
        .iter()
        .map(|r| (*r, ratings.iter().filter(|x| *x == r).count()))
        .collect())
}

/// Mean of a column within each rating group.
///
/// Groups with no observations are omitted.
pub fn group_means(df: &DataFrame, name: &str) -> Result<Vec<(Rating, f64)>> {
    let values = column_values(df, name)?;
    let ratings = rating_column(df)?;
    if values.len() != ratings.len() {
        anyhow::bail!(
            "Column '{}' has {} values but rating has {}",
            name,
            values.len(),
            ratings.len()
        );
    }

    Ok(Rating::ALL
        .iter()
        .filter_map(|rating| {
            let group: Vec<f64> = values
                .iter()
                .zip(ratings.iter())
                .filter(|(_, r)| *r == rating)
                .map(|(v, _)| *v)
                .collect();
            if group.is_empty() {
                None
            } else {
                Some((*rating, group.iter().sum::<f64>() / group.len() as f64))
            }
        })
        .collect())
}

/// Count values outside the Tukey fences of `summary`
pub fn iqr_outliers(summary: &ColumnSummary, values: &[f64]) -> usize {
    let (lower, upper) = summary.fences();
    values.iter().filter(|v| **v < lower || **v > upper).count()
}
