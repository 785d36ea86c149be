//! Checks against the published red wine quality dataset.
//!
//! Place the file at `data/winequality-red.csv` (either the semicolon
//! separated UCI release or the comma separated export with a row index)
//! and run with `cargo test --test test_reference_data -- --ignored`.
//! A run without the file fails instead of passing vacuously.

use sommelier::pipeline::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn load_reference() -> polars::prelude::DataFrame {
    let path = reference_dataset()
        .expect("data/winequality-red.csv not found; add the UCI red wine file to run these");
    let mut df = load_dataset(&path, &LoadOptions::default()).unwrap();
    derive_rating(&mut df).unwrap();
    df
}

#[test]
#[ignore = "needs data/winequality-red.csv"]
fn test_reference_shape() {
    let df = load_reference();

    assert_eq!(df.height(), 1599);
    // 11 features + quality + rating
    assert_eq!(df.width(), 13);
}

#[test]
#[ignore = "needs data/winequality-red.csv"]
fn test_reference_medians() {
    let df = load_reference();

    let alcohol = describe_column(&df, "alcohol").unwrap();
    let ph = describe_column(&df, "pH").unwrap();
    assert!((alcohol.median - 10.2).abs() < 1e-9, "median alcohol {}", alcohol.median);
    assert!((ph.median - 3.31).abs() < 1e-9, "median pH {}", ph.median);
}

#[test]
#[ignore = "needs data/winequality-red.csv"]
fn test_reference_quality_range_and_ratings() {
    let df = load_reference();

    let counts = value_counts(&df, QUALITY_COLUMN).unwrap();
    assert_eq!(counts.first().map(|(q, _)| *q), Some(3));
    assert_eq!(counts.last().map(|(q, _)| *q), Some(8));

    let ratings = rating_counts(&df).unwrap();
    let total: usize = ratings.iter().map(|(_, c)| c).sum();
    assert_eq!(total, 1599);
    let average = ratings
        .iter()
        .find(|(r, _)| *r == Rating::Average)
        .map(|(_, c)| *c)
        .unwrap();
    assert!(average > 1000, "most wines are rated average");
}

#[test]
#[ignore = "needs data/winequality-red.csv"]
fn test_reference_correlation_signs() {
    let df = load_reference();

    let with_quality = correlations_with(&df, QUALITY_COLUMN).unwrap();
    let corr = |name: &str| {
        with_quality
            .iter()
            .find(|p| p.feature1 == name)
            .map(|p| p.correlation)
            .unwrap()
    };
    assert!(corr("alcohol") > 0.0);
    assert!(corr("volatile_acidity") < 0.0);
    assert_eq!(with_quality[0].feature1, "alcohol", "alcohol is the strongest");
}
