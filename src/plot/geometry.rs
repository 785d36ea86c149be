//! Chart geometry: histogram binning and box-and-whisker statistics

use serde::Serialize;

use super::MAX_BINS;
use crate::pipeline::{quantile, ColumnSummary};

/// A single equal-width histogram bin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Lower bound (inclusive)
    pub lower: f64,
    /// Upper bound (exclusive, except for the last bin)
    pub upper: f64,
    pub count: usize,
}

/// Split `values` into `n_bins` equal-width bins spanning [min, max].
/// `n_bins` is capped at [`MAX_BINS`].
///
/// A constant input produces a single unit-width bin centred on the value.
/// Empty input or `n_bins == 0` produces no bins. Non-finite values are ignored.
pub fn histogram_bins(values: &[f64], n_bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || n_bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            lower: min - 0.5,
            upper: max + 0.5,
            count: finite.len(),
        }];
    }

    let n_bins = n_bins.min(MAX_BINS);
    let width = (max - min) / n_bins as f64;
    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| HistogramBin {
            lower: min + i as f64 * width,
            upper: if i + 1 == n_bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for v in finite {
        let idx = (((v - min) / width) as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }

    bins
}

/// Tukey box-and-whisker statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value inside the lower fence
    pub lower_whisker: f64,
    /// Largest value inside the upper fence
    pub upper_whisker: f64,
    /// Values beyond the fences
    pub outliers: Vec<f64>,
}

/// Box plot statistics of `values`, or `None` when empty
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let summary = ColumnSummary::from_values("", values)?;
    let (lower_fence, upper_fence) = summary.fences();

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let inside = || {
        sorted
            .iter()
            .copied()
            .filter(move |v| *v >= lower_fence && *v <= upper_fence)
    };
    let lower_whisker = inside().next().unwrap_or(summary.q1);
    let upper_whisker = inside().last().unwrap_or(summary.q3);

    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lower_fence || *v > upper_fence)
        .collect();

    Some(BoxStats {
        q1: summary.q1,
        median: quantile(&sorted, 0.5),
        q3: summary.q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}
