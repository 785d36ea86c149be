//! End-to-end statistical analysis of a rated wine dataset
//!
//! Groups the summary, correlation and model steps into serializable results
//! so the CLI can run them step by step and the report can export them.

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::correlation::{correlation_matrix, correlations_with, CorrelatedPair, CorrelationMatrix};
use super::loader::{column_values, FEATURE_COLUMNS, QUALITY_COLUMN};
use super::rating::Rating;
use super::regression::{fit_linear, fit_logistic, LinearModel, LogisticModel};
use super::summary::{describe_all, group_means, iqr_outliers, rating_counts, value_counts, ColumnSummary};

/// Predictors used by the illustrative models unless configured otherwise
pub const DEFAULT_PREDICTORS: [&str; 4] = ["alcohol", "volatile_acidity", "sulphates", "citric_acid"];

/// Default |r| above which feature pairs are reported as strongly correlated
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.5;

/// Settings for the analysis steps
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisConfig {
    /// Predictor columns for both regression models
    pub predictors: Vec<String>,
    /// Rating treated as the positive class by the logistic model
    pub positive: Rating,
    /// Threshold for reporting strongly correlated feature pairs
    pub correlation_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            predictors: DEFAULT_PREDICTORS.iter().map(|s| s.to_string()).collect(),
            positive: Rating::Good,
            correlation_threshold: DEFAULT_CORRELATION_THRESHOLD,
        }
    }
}

/// Per-rating means of one column
#[derive(Debug, Clone, Serialize)]
pub struct GroupMeans {
    pub column: String,
    pub means: Vec<(Rating, f64)>,
}

/// Count of Tukey outliers in one column
#[derive(Debug, Clone, Serialize)]
pub struct OutlierCount {
    pub column: String,
    pub outliers: usize,
}

/// Univariate and grouped descriptive statistics
#[derive(Debug, Clone, Serialize)]
pub struct Descriptives {
    pub summaries: Vec<ColumnSummary>,
    pub quality_counts: Vec<(i64, usize)>,
    pub rating_counts: Vec<(Rating, usize)>,
    pub group_means: Vec<GroupMeans>,
    pub outliers: Vec<OutlierCount>,
}

/// Correlation structure of the dataset
#[derive(Debug, Clone, Serialize)]
pub struct Correlations {
    pub matrix: CorrelationMatrix,
    /// Every feature's correlation with quality, strongest first
    pub with_quality: Vec<CorrelatedPair>,
    /// Feature pairs above the configured threshold, strongest first
    pub strong_pairs: Vec<CorrelatedPair>,
}

/// Fitted models
#[derive(Debug, Clone, Serialize)]
pub struct Models {
    pub linear: LinearModel,
    pub logistic: LogisticModel,
}

/// Complete analysis of a dataset
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub descriptives: Descriptives,
    pub correlations: Correlations,
    pub models: Models,
}

/// Descriptive statistics for every numeric column plus rating breakdowns
pub fn describe_dataset(df: &DataFrame) -> Result<Descriptives> {
    let summaries = describe_all(df)?;

    let mut group = Vec::with_capacity(FEATURE_COLUMNS.len());
    let mut outliers = Vec::with_capacity(summaries.len());
    for summary in &summaries {
        if summary.column != QUALITY_COLUMN {
            group.push(GroupMeans {
                column: summary.column.clone(),
                means: group_means(df, &summary.column)?,
            });
        }
        let values = column_values(df, &summary.column)?;
        outliers.push(OutlierCount {
            column: summary.column.clone(),
            outliers: iqr_outliers(summary, &values),
        });
    }

    Ok(Descriptives {
        summaries,
        quality_counts: value_counts(df, QUALITY_COLUMN)?,
        rating_counts: rating_counts(df)?,
        group_means: group,
        outliers,
    })
}

/// Correlation matrix over the schema columns, ranked quality correlations
/// and strongly correlated feature pairs
pub fn correlate(df: &DataFrame, threshold: f64) -> Result<Correlations> {
    let mut columns: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.push(QUALITY_COLUMN.to_string());

    let matrix = correlation_matrix(df, &columns)?;
    let strong_pairs = matrix
        .pairs_above(threshold)
        .into_iter()
        .filter(|p| p.feature1 != QUALITY_COLUMN && p.feature2 != QUALITY_COLUMN)
        .collect();

    Ok(Correlations {
        with_quality: correlations_with(df, QUALITY_COLUMN)?,
        matrix,
        strong_pairs,
    })
}

/// Fit the linear quality model and the logistic rating model
pub fn fit_models(df: &DataFrame, config: &AnalysisConfig) -> Result<Models> {
    Ok(Models {
        linear: fit_linear(df, QUALITY_COLUMN, &config.predictors)?,
        logistic: fit_logistic(df, &config.predictors, config.positive)?,
    })
}

/// Run every analysis step
pub fn analyze(df: &DataFrame, config: &AnalysisConfig) -> Result<Analysis> {
    Ok(Analysis {
        descriptives: describe_dataset(df)?,
        correlations: correlate(df, config.correlation_threshold)?,
        models: fit_models(df, config)?,
    })
}
