//! Plot generation: histograms, boxplots, scatterplots and correlation heatmaps
//!
//! Charts are written as SVG files into an output directory. [`render`]
//! draws one chart of a given [`ChartKind`]; [`render_all`] draws the full
//! set used by the analysis report.

mod charts;
mod geometry;

pub use charts::*;
pub use geometry::*;

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use thiserror::Error;

use crate::pipeline::{
    column_values, correlation_matrix, rating_column, value_counts, Rating, RocCurve,
    FEATURE_COLUMNS, QUALITY_COLUMN,
};

/// Default number of histogram bins
pub const DEFAULT_BINS: usize = 30;

/// Largest accepted number of histogram bins
pub const MAX_BINS: usize = 1000;

/// Default chart size in pixels
pub const DEFAULT_SIZE: (u32, u32) = (1200, 800);

/// Right-skewed measurements that are also plotted on a log10 axis
pub const SKEWED_COLUMNS: [&str; 4] = [
    "residual_sugar",
    "chlorides",
    "sulphates",
    "total_sulfur_dioxide",
];

/// Column pairs drawn as scatterplots by [`render_all`]
pub const SCATTER_PAIRS: [(&str, &str); 4] = [
    ("alcohol", "volatile_acidity"),
    ("alcohol", "sulphates"),
    ("fixed_acidity", "pH"),
    ("fixed_acidity", "density"),
];

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to prepare output directory: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Analysis(#[from] anyhow::Error),
}

pub type Result<T> = core::result::Result<T, PlotError>;

/// Kind of chart requested from [`render`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Distribution of one column
    Histogram,
    /// One column split by rating
    Boxplot,
    /// Two columns against each other, coloured by rating
    Scatter,
    /// Pairwise correlations of the given columns (all numeric columns if none)
    CorrelationMatrix,
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Histogram => write!(f, "histogram"),
            ChartKind::Boxplot => write!(f, "boxplot"),
            ChartKind::Scatter => write!(f, "scatter"),
            ChartKind::CorrelationMatrix => write!(f, "correlation"),
        }
    }
}

impl std::str::FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "histogram" | "hist" => Ok(ChartKind::Histogram),
            "boxplot" | "box" => Ok(ChartKind::Boxplot),
            "scatter" => Ok(ChartKind::Scatter),
            "correlation" | "correlation-matrix" | "heatmap" => Ok(ChartKind::CorrelationMatrix),
            _ => Err(format!(
                "Unknown chart kind: '{}'. Use 'histogram', 'boxplot', 'scatter' or 'correlation'.",
                s
            )),
        }
    }
}

/// Rendering options shared by all charts
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Number of histogram bins
    pub bins: usize,
    /// Plot histograms on a log10 axis
    pub log_scale: bool,
    /// Chart size in pixels
    pub size: (u32, u32),
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            log_scale: false,
            size: DEFAULT_SIZE,
        }
    }
}

fn expect_columns(kind: ChartKind, columns: &[String], expected: usize) -> Result<()> {
    if columns.len() != expected {
        return Err(PlotError::InvalidData(format!(
            "{} needs exactly {} column(s), got {}",
            kind,
            expected,
            columns.len()
        )));
    }
    Ok(())
}

fn log10_values(column: &str, values: &[f64]) -> Result<Vec<f64>> {
    if let Some(v) = values.iter().find(|v| **v <= 0.0) {
        return Err(PlotError::InvalidData(format!(
            "Column '{}' has non-positive value {}; cannot use a log10 axis",
            column, v
        )));
    }
    Ok(values.iter().map(|v| v.log10()).collect())
}

fn rating_groups(df: &DataFrame, column: &str) -> Result<Vec<(Rating, Vec<f64>)>> {
    let values = column_values(df, column)?;
    let ratings = rating_column(df)?;
    Ok(Rating::ALL
        .iter()
        .map(|rating| {
            let group = values
                .iter()
                .zip(ratings.iter())
                .filter(|(_, r)| *r == rating)
                .map(|(v, _)| *v)
                .collect();
            (*rating, group)
        })
        .collect())
}

/// Render one chart of `kind` over `columns` into `output_dir`.
///
/// Returns the path of the written SVG file.
pub fn render(
    df: &DataFrame,
    kind: ChartKind,
    columns: &[String],
    output_dir: &Path,
    options: &PlotOptions,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = match kind {
        ChartKind::Histogram => {
            expect_columns(kind, columns, 1)?;
            let column = &columns[0];
            let values = column_values(df, column)?;
            if options.log_scale {
                let path = output_dir.join(format!("histogram_log10_{}.svg", column));
                draw_histogram(
                    &log10_values(column, &values)?,
                    options.bins,
                    &format!("Distribution of log10({})", column),
                    &format!("log10({})", column),
                    options.size,
                    &path,
                )?;
                path
            } else {
                let path = output_dir.join(format!("histogram_{}.svg", column));
                draw_histogram(
                    &values,
                    options.bins,
                    &format!("Distribution of {}", column),
                    column,
                    options.size,
                    &path,
                )?;
                path
            }
        }
        ChartKind::Boxplot => {
            expect_columns(kind, columns, 1)?;
            let column = &columns[0];
            let path = output_dir.join(format!("boxplot_{}_by_rating.svg", column));
            draw_boxplot(
                &rating_groups(df, column)?,
                &format!("{} by rating", column),
                column,
                options.size,
                &path,
            )?;
            path
        }
        ChartKind::Scatter => {
            expect_columns(kind, columns, 2)?;
            let (x_col, y_col) = (&columns[0], &columns[1]);
            let xs = column_values(df, x_col)?;
            let ys = column_values(df, y_col)?;
            let ratings = rating_column(df)?;
            let points: Vec<(f64, f64, Rating)> = xs
                .into_iter()
                .zip(ys)
                .zip(ratings)
                .map(|((x, y), r)| (x, y, r))
                .collect();
            let path = output_dir.join(format!("scatter_{}_vs_{}.svg", y_col, x_col));
            draw_scatter(
                &points,
                &format!("{} vs {}", y_col, x_col),
                x_col,
                y_col,
                options.size,
                &path,
            )?;
            path
        }
        ChartKind::CorrelationMatrix => {
            let columns: Vec<String> = if columns.is_empty() {
                crate::pipeline::numeric_columns(df)
            } else {
                columns.to_vec()
            };
            let matrix = correlation_matrix(df, &columns)?;
            let path = output_dir.join("correlation_matrix.svg");
            draw_correlation_matrix(&matrix, "Correlation matrix", options.size, &path)?;
            path
        }
    };

    log::debug!("Rendered {} chart to {}", kind, path.display());
    Ok(path)
}

/// Render the quality score bar chart
pub fn render_quality_counts(
    df: &DataFrame,
    output_dir: &Path,
    options: &PlotOptions,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let counts = value_counts(df, QUALITY_COLUMN)?;
    let path = output_dir.join("quality_counts.svg");
    draw_bar_chart(
        &counts,
        "Wine quality scores",
        QUALITY_COLUMN,
        options.size,
        &path,
    )?;
    Ok(path)
}

/// Render a ROC curve
pub fn render_roc(
    roc: &RocCurve,
    title: &str,
    output_dir: &Path,
    options: &PlotOptions,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join("roc_curve.svg");
    draw_roc_curve(roc, title, options.size, &path)?;
    Ok(path)
}

/// Render the full chart set for a rated wine dataset.
///
/// Univariate: quality bar chart, one histogram per feature, log10 histograms
/// of the skewed features. Bivariate: one boxplot by rating per feature.
/// Multivariate: rating-coloured scatterplots and the correlation matrix.
pub fn render_all(df: &DataFrame, output_dir: &Path, options: &PlotOptions) -> Result<Vec<PathBuf>> {
    let linear = PlotOptions {
        log_scale: false,
        ..options.clone()
    };
    let log_axis = PlotOptions {
        log_scale: true,
        ..options.clone()
    };

    let mut written = vec![render_quality_counts(df, output_dir, options)?];

    for column in FEATURE_COLUMNS {
        let columns = [column.to_string()];
        written.push(render(df, ChartKind::Histogram, &columns, output_dir, &linear)?);
        if SKEWED_COLUMNS.contains(&column) {
            written.push(render(df, ChartKind::Histogram, &columns, output_dir, &log_axis)?);
        }
        written.push(render(df, ChartKind::Boxplot, &columns, output_dir, options)?);
    }

    for (x, y) in SCATTER_PAIRS {
        written.push(render(
            df,
            ChartKind::Scatter,
            &[x.to_string(), y.to_string()],
            output_dir,
            options,
        )?);
    }

    let mut all_columns: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
    all_columns.push(QUALITY_COLUMN.to_string());
    written.push(render(
        df,
        ChartKind::CorrelationMatrix,
        &all_columns,
        output_dir,
        options,
    )?);

    Ok(written)
}
