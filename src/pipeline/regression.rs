//! Regression models: ordinary least squares and logistic regression
//!
//! Both models are fitted through the normal equations. OLS solves
//! `(XᵀX)β = Xᵀy` once; logistic regression iterates Newton steps
//! `(XᵀWX)δ = Xᵀ(y - p)` (iteratively reweighted least squares) until the
//! step falls below the tolerance.

use anyhow::Result;
use faer::prelude::*;
use faer::{Mat, Side};
use polars::prelude::*;
use serde::Serialize;

use super::correlation::pearson;
use super::error::AnalysisError;
use super::loader::column_values;
use super::rating::{rating_column, Rating};

/// Maximum Newton iterations for logistic regression
const MAX_ITERATIONS: usize = 50;

/// Convergence tolerance on the largest coefficient update
const TOLERANCE: f64 = 1e-8;

/// Floor on IRLS weights so XᵀWX stays positive definite near separation
const MIN_WEIGHT: f64 = 1e-10;

/// Probability clamp for the log-likelihood
const PROB_EPSILON: f64 = 1e-15;

/// |r| above which two predictors are treated as exactly collinear
const COLLINEARITY_LIMIT: f64 = 1.0 - 1e-10;

/// Name used for the intercept term
pub const INTERCEPT: &str = "(intercept)";

/// A single named coefficient
#[derive(Debug, Clone, Serialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
}

/// Fitted ordinary least squares model
#[derive(Debug, Clone, Serialize)]
pub struct LinearModel {
    pub target: String,
    /// Intercept first, then predictors in the order given
    pub coefficients: Vec<Coefficient>,
    pub r_squared: f64,
    /// 1 - (1 - R²)(n - 1)/(n - p - 1)
    pub adjusted_r_squared: f64,
    /// sqrt(SSE / (n - p - 1))
    pub residual_se: f64,
    pub n: usize,
}

impl LinearModel {
    /// Predict the target for one row of predictor values (intercept excluded)
    pub fn predict(&self, row: &[f64]) -> f64 {
        linear_predictor(
            &self.coefficients.iter().map(|c| c.estimate).collect::<Vec<_>>(),
            row,
        )
    }
}

/// Fitted logistic regression model for `rating == positive`
#[derive(Debug, Clone, Serialize)]
pub struct LogisticModel {
    pub positive: Rating,
    /// Intercept first, then predictors in the order given
    pub coefficients: Vec<Coefficient>,
    pub iterations: usize,
    pub converged: bool,
    pub log_likelihood: f64,
    pub n: usize,
    /// Number of positive observations
    pub positives: usize,
    pub roc: RocCurve,
    /// Fitted probabilities, in row order
    #[serde(skip)]
    pub probabilities: Vec<f64>,
}

impl LogisticModel {
    pub fn auc(&self) -> f64 {
        self.roc.auc
    }

    /// Probability of the positive class for one row of predictor values
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        sigmoid(linear_predictor(
            &self.coefficients.iter().map(|c| c.estimate).collect::<Vec<_>>(),
            row,
        ))
    }
}

/// Receiver operating characteristic curve
#[derive(Debug, Clone, Serialize)]
pub struct RocCurve {
    /// (false positive rate, true positive rate), from (0, 0) to (1, 1)
    pub points: Vec<(f64, f64)>,
    pub auc: f64,
}

fn linear_predictor(coefficients: &[f64], row: &[f64]) -> f64 {
    coefficients[0]
        + coefficients[1..]
            .iter()
            .zip(row.iter())
            .map(|(b, x)| b * x)
            .sum::<f64>()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Design matrix with a leading column of ones
fn design_matrix(df: &DataFrame, predictors: &[String]) -> Result<Mat<f64>> {
    let columns: Vec<Vec<f64>> = predictors
        .iter()
        .map(|name| column_values(df, name))
        .collect::<Result<_>>()?;

    let n = df.height();
    let p = predictors.len();
    if let Some((name, col)) = predictors
        .iter()
        .zip(columns.iter())
        .find(|(_, col)| col.len() != n)
    {
        anyhow::bail!(
            "Predictor '{}' has {} non-null values for {} rows",
            name,
            col.len(),
            n
        );
    }

    check_collinearity(&columns, predictors)?;

    let mut x = Mat::<f64>::zeros(n, p + 1);
    for row in 0..n {
        x[(row, 0)] = 1.0;
        for (j, col) in columns.iter().enumerate() {
            x[(row, j + 1)] = col[row];
        }
    }
    Ok(x)
}

/// Reject constant predictors and exactly collinear pairs.
///
/// Rounding can let the Cholesky factorisation of such a matrix succeed with
/// a tiny pivot, so these cases are caught before solving.
fn check_collinearity(columns: &[Vec<f64>], predictors: &[String]) -> Result<()> {
    let singular = || AnalysisError::SingularMatrix {
        predictors: predictors.to_vec(),
    };
    for (i, a) in columns.iter().enumerate() {
        for b in &columns[i + 1..] {
            if let Some(r) = pearson(a, b) {
                if r.abs() > COLLINEARITY_LIMIT {
                    return Err(singular().into());
                }
            }
        }
        if a.len() > 1 && a.iter().all(|v| *v == a[0]) {
            return Err(singular().into());
        }
    }
    Ok(())
}

/// Solve a symmetric positive definite system through its Cholesky factor
fn solve_spd(a: &Mat<f64>, b: &Mat<f64>, predictors: &[String]) -> Result<Mat<f64>> {
    let llt = a
        .cholesky(Side::Lower)
        .map_err(|_| AnalysisError::SingularMatrix {
            predictors: predictors.to_vec(),
        })?;
    Ok(llt.solve(b))
}

fn named_coefficients(beta: &Mat<f64>, predictors: &[String]) -> Vec<Coefficient> {
    std::iter::once(INTERCEPT.to_string())
        .chain(predictors.iter().cloned())
        .enumerate()
        .map(|(i, name)| Coefficient {
            name,
            estimate: beta[(i, 0)],
        })
        .collect()
}

fn check_sample_size(n: usize, parameters: usize) -> Result<()> {
    if n <= parameters {
        return Err(AnalysisError::InsufficientData {
            required: parameters + 1,
            actual: n,
        }
        .into());
    }
    Ok(())
}

/// Fit `target ~ predictors` by ordinary least squares
pub fn fit_linear(df: &DataFrame, target: &str, predictors: &[String]) -> Result<LinearModel> {
    let y_values = column_values(df, target)?;
    let x = design_matrix(df, predictors)?;
    let n = x.nrows();
    let k = x.ncols();
    if y_values.len() != n {
        anyhow::bail!(
            "Target '{}' has {} non-null values for {} rows",
            target,
            y_values.len(),
            n
        );
    }
    check_sample_size(n, k)?;

    let mut y = Mat::<f64>::zeros(n, 1);
    for (row, v) in y_values.iter().enumerate() {
        y[(row, 0)] = *v;
    }

    let xtx = x.transpose() * &x;
    let xty = x.transpose() * &y;
    let beta = solve_spd(&xtx, &xty, predictors)?;
    let fitted = &x * &beta;

    let mean_y = y_values.iter().sum::<f64>() / n as f64;
    let (sse, sst) = (0..n).fold((0.0, 0.0), |(sse, sst), row| {
        let residual = y[(row, 0)] - fitted[(row, 0)];
        let deviation = y[(row, 0)] - mean_y;
        (sse + residual * residual, sst + deviation * deviation)
    });

    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 0.0 };
    let df_resid = (n - k) as f64;
    let adjusted_r_squared = 1.0 - (1.0 - r_squared) * (n - 1) as f64 / df_resid;

    log::debug!(
        "OLS {} ~ {:?}: R² = {:.4} on {} rows",
        target,
        predictors,
        r_squared,
        n
    );

    Ok(LinearModel {
        target: target.to_string(),
        coefficients: named_coefficients(&beta, predictors),
        r_squared,
        adjusted_r_squared,
        residual_se: (sse / df_resid).sqrt(),
        n,
    })
}

/// Fit a logistic regression of `rating == positive` on `predictors`
pub fn fit_logistic(
    df: &DataFrame,
    predictors: &[String],
    positive: Rating,
) -> Result<LogisticModel> {
    let labels: Vec<bool> = rating_column(df)?
        .into_iter()
        .map(|r| r == positive)
        .collect();
    let x = design_matrix(df, predictors)?;
    let n = x.nrows();
    let k = x.ncols();
    check_sample_size(n, k)?;

    let positives = labels.iter().filter(|l| **l).count();
    if positives == 0 || positives == n {
        return Err(AnalysisError::SingleClass {
            target: format!("rating == {}", positive),
        }
        .into());
    }

    let mut beta = Mat::<f64>::zeros(k, 1);
    let mut probabilities = vec![0.5; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < MAX_ITERATIONS {
        iterations += 1;

        let eta = &x * &beta;
        let mut weighted_x = Mat::<f64>::zeros(n, k);
        let mut residual = Mat::<f64>::zeros(n, 1);
        for row in 0..n {
            let p = sigmoid(eta[(row, 0)]);
            probabilities[row] = p;
            let w = (p * (1.0 - p)).max(MIN_WEIGHT).sqrt();
            for col in 0..k {
                weighted_x[(row, col)] = w * x[(row, col)];
            }
            residual[(row, 0)] = if labels[row] { 1.0 - p } else { -p };
        }

        let hessian = weighted_x.transpose() * &weighted_x;
        let gradient = x.transpose() * &residual;
        let step = solve_spd(&hessian, &gradient, predictors)?;

        let mut max_step: f64 = 0.0;
        for i in 0..k {
            beta[(i, 0)] += step[(i, 0)];
            max_step = max_step.max(step[(i, 0)].abs());
        }

        if !max_step.is_finite() {
            return Err(AnalysisError::SingularMatrix {
                predictors: predictors.to_vec(),
            }
            .into());
        }
        if max_step < TOLERANCE {
            converged = true;
            break;
        }
    }

    // Probabilities at the final coefficients
    let eta = &x * &beta;
    for (row, p) in probabilities.iter_mut().enumerate() {
        *p = sigmoid(eta[(row, 0)]);
    }

    let log_likelihood = probabilities
        .iter()
        .zip(labels.iter())
        .map(|(&p, &y)| {
            let p = p.clamp(PROB_EPSILON, 1.0 - PROB_EPSILON);
            if y {
                p.ln()
            } else {
                (1.0 - p).ln()
            }
        })
        .sum();

    if !converged {
        log::warn!(
            "Logistic regression did not converge after {} iterations",
            MAX_ITERATIONS
        );
    }

    let roc = roc_curve(&probabilities, &labels);
    log::debug!(
        "Logistic rating == {} ~ {:?}: AUC = {:.4} after {} iterations",
        positive,
        predictors,
        roc.auc,
        iterations
    );

    Ok(LogisticModel {
        positive,
        coefficients: named_coefficients(&beta, predictors),
        iterations,
        converged,
        log_likelihood,
        n,
        positives,
        roc,
        probabilities,
    })
}

/// Build the ROC curve of `scores` against binary `labels`.
///
/// Tied scores are processed as one threshold step, so the curve moves
/// diagonally through ties. Returns a degenerate curve with AUC 0.5 when
/// either class is empty.
pub fn roc_curve(scores: &[f64], labels: &[bool]) -> RocCurve {
    let total_pos = labels.iter().filter(|l| **l).count() as f64;
    let total_neg = labels.len() as f64 - total_pos;
    if scores.len() != labels.len() || total_pos == 0.0 || total_neg == 0.0 {
        return RocCurve {
            points: vec![(0.0, 0.0), (1.0, 1.0)],
            auc: 0.5,
        };
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut points = vec![(0.0, 0.0)];
    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut auc = 0.0;
    let mut i = 0;

    while i < order.len() {
        let threshold = scores[order[i]];
        let mut j = i;
        while j < order.len() && scores[order[j]] == threshold {
            if labels[order[j]] {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            j += 1;
        }

        let (prev_fpr, prev_tpr) = points[points.len() - 1];
        let fpr = fp / total_neg;
        let tpr = tp / total_pos;
        auc += (fpr - prev_fpr) * (tpr + prev_tpr) / 2.0;
        points.push((fpr, tpr));
        i = j;
    }

    RocCurve {
        points,
        auc: auc.clamp(0.0, 1.0),
    }
}

/// AUC as the Mann-Whitney U statistic over average ranks.
///
/// Equivalent to the trapezoidal area under [`roc_curve`].
pub fn rank_auc(scores: &[f64], labels: &[bool]) -> f64 {
    let total_pos = labels.iter().filter(|l| **l).count() as f64;
    let total_neg = labels.len() as f64 - total_pos;
    if scores.len() != labels.len() || total_pos == 0.0 || total_neg == 0.0 {
        return 0.5;
    }

    let mut pairs: Vec<(f64, bool)> = scores.iter().copied().zip(labels.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = pairs.len();
    let mut rank_sum_pos = 0.0;
    let mut i = 0;

    while i < n {
        let mut j = i;
        while j < n && pairs[j].0 == pairs[i].0 {
            j += 1;
        }
        // Ranks i+1..=j share their average
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        rank_sum_pos += avg_rank * pairs[i..j].iter().filter(|(_, y)| *y).count() as f64;
        i = j;
    }

    let u = rank_sum_pos - total_pos * (total_pos + 1.0) / 2.0;
    (u / (total_pos * total_neg)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roc_perfect_separation() {
        let scores = [0.1, 0.2, 0.8, 0.9];
        let labels = [false, false, true, true];
        let roc = roc_curve(&scores, &labels);
        assert!((roc.auc - 1.0).abs() < 1e-12);
        assert_eq!(roc.points.first(), Some(&(0.0, 0.0)));
        assert_eq!(roc.points.last(), Some(&(1.0, 1.0)));
    }

    #[test]
    fn test_roc_ties_are_diagonal() {
        let scores = [0.5, 0.5, 0.5, 0.5];
        let labels = [true, false, true, false];
        let roc = roc_curve(&scores, &labels);
        assert!((roc.auc - 0.5).abs() < 1e-12);
        assert_eq!(roc.points.len(), 2);
    }

    #[test]
    fn test_roc_single_class() {
        let roc = roc_curve(&[0.1, 0.2], &[true, true]);
        assert_eq!(roc.auc, 0.5);
    }

    #[test]
    fn test_rank_auc_matches_trapezoid() {
        let scores = [0.1, 0.4, 0.35, 0.8, 0.4, 0.7, 0.2, 0.9];
        let labels = [false, false, true, true, true, false, false, true];
        let roc = roc_curve(&scores, &labels);
        let rank = rank_auc(&scores, &labels);
        assert!((roc.auc - rank).abs() < 1e-12, "{} vs {}", roc.auc, rank);
    }

    #[test]
    fn test_collinearity_check() {
        let names = vec!["a".to_string(), "b".to_string()];
        let a = vec![1.0, 2.0, 3.0];
        assert!(check_collinearity(&[a.clone(), vec![3.0, 1.0, 2.0]], &names).is_ok());
        assert!(check_collinearity(&[a.clone(), vec![2.0, 4.0, 6.0]], &names).is_err());
        assert!(check_collinearity(&[a, vec![0.5, 0.5, 0.5]], &names).is_err());
    }

    #[test]
    fn test_linear_predictor() {
        assert_eq!(linear_predictor(&[1.0, 2.0, 3.0], &[1.0, 1.0]), 6.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }
}
