//! Tests for descriptive statistics

use polars::prelude::*;
use sommelier::pipeline::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_describe_all_covers_numeric_columns() {
    let df = create_rated_dataframe(DEFAULT_ROWS);
    let summaries = describe_all(&df).unwrap();

    // 11 features plus quality; the rating column is categorical
    assert_eq!(summaries.len(), 12);
    assert!(summaries.iter().all(|s| s.column != RATING_COLUMN));
    assert_eq!(summaries[0].column, "fixed_acidity");
    assert_eq!(summaries[11].column, QUALITY_COLUMN);
}

#[test]
fn test_summary_order_statistics_are_monotone() {
    let df = create_rated_dataframe(DEFAULT_ROWS);

    for s in describe_all(&df).unwrap() {
        assert_eq!(s.count, DEFAULT_ROWS, "{}", s.column);
        assert!(s.min <= s.q1, "{}", s.column);
        assert!(s.q1 <= s.median, "{}", s.column);
        assert!(s.median <= s.q3, "{}", s.column);
        assert!(s.q3 <= s.max, "{}", s.column);
        assert!(s.min <= s.mean && s.mean <= s.max, "{}", s.column);
        assert!(s.std_dev > 0.0, "{}", s.column);
    }
}

#[test]
fn test_describe_column_known_values() {
    let df = df! {
        "alcohol" => [9.4f64, 9.8, 9.8, 10.2, 11.0, 12.8],
    }
    .unwrap();

    let s = describe_column(&df, "alcohol").unwrap();
    assert_eq!(s.count, 6);
    assert_eq!(s.min, 9.4);
    assert_eq!(s.max, 12.8);
    assert!((s.median - 10.0).abs() < 1e-12);
    assert!((s.q1 - 9.8).abs() < 1e-12);
    assert!((s.q3 - 10.8).abs() < 1e-12);
    assert!((s.mean - 10.5).abs() < 1e-12);
}

#[test]
fn test_describe_unknown_column() {
    let df = create_rated_dataframe(20);
    let err = describe_column(&df, "colour").unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::ColumnNotFound { column, .. }) if column == "colour"
    ));
}

#[test]
fn test_describe_is_idempotent() {
    let (_temp_dir, csv_path) = create_wine_csv(DEFAULT_ROWS);

    let first = load_dataset(&csv_path, &LoadOptions::default()).unwrap();
    let second = load_dataset(&csv_path, &LoadOptions::default()).unwrap();

    assert_eq!(describe_all(&first).unwrap(), describe_all(&second).unwrap());
    assert_eq!(describe_all(&first).unwrap(), describe_all(&first).unwrap());
}

#[test]
fn test_quality_value_counts() {
    let df = create_rated_dataframe(DEFAULT_ROWS);
    let counts = value_counts(&df, QUALITY_COLUMN).unwrap();

    assert_eq!(counts.iter().map(|(_, c)| c).sum::<usize>(), DEFAULT_ROWS);
    assert!(counts.windows(2).all(|w| w[0].0 < w[1].0), "sorted by score");
    assert_eq!(counts.first().map(|(q, _)| *q), Some(3));
    assert_eq!(counts.last().map(|(q, _)| *q), Some(8));
}

#[test]
fn test_group_means_follow_quality() {
    let df = create_rated_dataframe(DEFAULT_ROWS);

    let alcohol = group_means(&df, "alcohol").unwrap();
    let mean_of = |means: &[(Rating, f64)], rating: Rating| {
        means.iter().find(|(r, _)| *r == rating).map(|(_, m)| *m).unwrap()
    };
    assert!(mean_of(&alcohol, Rating::Good) > mean_of(&alcohol, Rating::Bad));

    let volatile = group_means(&df, "volatile_acidity").unwrap();
    assert!(mean_of(&volatile, Rating::Good) < mean_of(&volatile, Rating::Bad));
}

#[test]
fn test_group_means_omit_empty_groups() {
    let mut df = df! {
        "alcohol" => [9.5f64, 10.5, 12.0],
        "quality" => [5i64, 6, 7],
    }
    .unwrap();
    derive_rating(&mut df).unwrap();

    let means = group_means(&df, "alcohol").unwrap();
    assert_eq!(means.len(), 2);
    assert_eq!(means[0], (Rating::Average, 10.0));
    assert_eq!(means[1], (Rating::Good, 12.0));
}

#[test]
fn test_iqr_outliers() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
    let summary = ColumnSummary::from_values("x", &values).unwrap();
    assert_eq!(iqr_outliers(&summary, &values), 1);
}

#[test]
fn test_describe_dataset_bundles_breakdowns() {
    let df = create_rated_dataframe(DEFAULT_ROWS);
    let descriptives = describe_dataset(&df).unwrap();

    assert_eq!(descriptives.summaries.len(), 12);
    assert_eq!(descriptives.group_means.len(), FEATURE_COLUMNS.len());
    assert_eq!(descriptives.outliers.len(), 12);
    assert_eq!(descriptives.rating_counts.len(), 3);
    assert_eq!(
        descriptives.quality_counts.iter().map(|(_, c)| c).sum::<usize>(),
        DEFAULT_ROWS
    );
}
