//! Shared test utilities and fixture generators
#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use sommelier::pipeline::{derive_rating, load_dataset, LoadOptions};

/// Headers as written by R's `write.csv`, including the unnamed row index
pub const R_HEADER: &str = "X,fixed.acidity,volatile.acidity,citric.acid,residual.sugar,\
chlorides,free.sulfur.dioxide,total.sulfur.dioxide,density,pH,sulphates,alcohol,quality";

/// Headers of the semicolon separated UCI distribution
pub const UCI_HEADER: &str = "\"fixed acidity\";\"volatile acidity\";\"citric acid\";\
\"residual sugar\";\"chlorides\";\"free sulfur dioxide\";\"total sulfur dioxide\";\
\"density\";\"pH\";\"sulphates\";\"alcohol\";\"quality\"";

/// Default number of rows for synthetic datasets
pub const DEFAULT_ROWS: usize = 300;

/// One synthetic observation, in schema order
#[derive(Debug, Clone)]
pub struct WineRow {
    pub features: [f64; 11],
    pub quality: i64,
}

fn sample_quality(rng: &mut StdRng) -> i64 {
    let u: f64 = rng.gen();
    match u {
        u if u < 0.02 => 3,
        u if u < 0.07 => 4,
        u if u < 0.49 => 5,
        u if u < 0.87 => 6,
        u if u < 0.98 => 7,
        _ => 8,
    }
}

/// Generate `n` plausible red wine observations.
///
/// Alcohol, sulphates and citric acid rise with quality, volatile acidity
/// falls with it; every feature carries enough noise that the classes overlap.
/// The first four rows have qualities 3, 4, 7 and 8 so every rating occurs.
pub fn synthetic_wines(n: usize, seed: u64) -> Vec<WineRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let forced = [3i64, 4, 7, 8];

    (0..n)
        .map(|i| {
            let quality = forced.get(i).copied().unwrap_or_else(|| sample_quality(&mut rng));
            let q = quality as f64 - 5.6;

            let fixed_acidity = 8.3 + 0.2 * q + rng.gen_range(-2.0..2.0);
            let volatile_acidity = (0.53 - 0.1 * q + rng.gen_range(-0.15..0.15)).max(0.12);
            let citric_acid = (0.27 + 0.05 * q + rng.gen_range(-0.15..0.15)).max(0.01);
            let residual_sugar = 1.9 + rng.gen_range(0.0..2.5);
            let chlorides = 0.07 + rng.gen_range(0.0..0.05);
            let free_sulfur_dioxide = 6.0 + rng.gen_range(0.0..30.0);
            let total_sulfur_dioxide = free_sulfur_dioxide * 2.0 + rng.gen_range(5.0..60.0);
            let alcohol = 10.4 + 0.6 * q + rng.gen_range(-0.8..0.8);
            let density = 0.9967 - 0.0008 * (alcohol - 10.4) + rng.gen_range(-0.0005..0.0005);
            let ph = 3.31 - 0.05 * (fixed_acidity - 8.3) + rng.gen_range(-0.12..0.12);
            let sulphates = 0.65 + 0.04 * q + rng.gen_range(-0.12..0.12);

            WineRow {
                features: [
                    fixed_acidity,
                    volatile_acidity,
                    citric_acid,
                    residual_sugar,
                    chlorides,
                    free_sulfur_dioxide,
                    total_sulfur_dioxide,
                    density,
                    ph,
                    sulphates,
                    alcohol,
                ],
                quality,
            }
        })
        .collect()
}

/// Render rows as R-style CSV text with a leading index column
pub fn r_style_csv(rows: &[WineRow]) -> String {
    let mut out = String::from(R_HEADER);
    out.push('\n');
    for (i, row) in rows.iter().enumerate() {
        write!(out, "{}", i + 1).unwrap();
        for v in row.features {
            write!(out, ",{:.5}", v).unwrap();
        }
        writeln!(out, ",{}", row.quality).unwrap();
    }
    out
}

/// Render rows as UCI-style semicolon separated CSV text
pub fn uci_style_csv(rows: &[WineRow]) -> String {
    let mut out = String::from(UCI_HEADER);
    out.push('\n');
    for row in rows {
        let fields: Vec<String> = row.features.iter().map(|v| format!("{:.5}", v)).collect();
        writeln!(out, "{};{}", fields.join(";"), row.quality).unwrap();
    }
    out
}

/// Write `content` to `dir/name`
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Create a temporary directory with an R-style synthetic wine CSV
pub fn create_wine_csv(n: usize) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = write_file(
        temp_dir.path(),
        "wine.csv",
        &r_style_csv(&synthetic_wines(n, 42)),
    );
    (temp_dir, csv_path)
}

/// Create a temporary directory with a UCI-style synthetic wine CSV
pub fn create_uci_csv(n: usize) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = write_file(
        temp_dir.path(),
        "winequality-red.csv",
        &uci_style_csv(&synthetic_wines(n, 7)),
    );
    (temp_dir, csv_path)
}

/// Load a synthetic dataset and derive its rating column
pub fn create_rated_dataframe(n: usize) -> DataFrame {
    let (_temp_dir, csv_path) = create_wine_csv(n);
    let mut df = load_dataset(&csv_path, &LoadOptions::default()).unwrap();
    derive_rating(&mut df).unwrap();
    df
}

/// Path of the reference dataset, if it has been placed in `data/`
pub fn reference_dataset() -> Option<PathBuf> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("winequality-red.csv");
    path.exists().then_some(path)
}

/// Assert that a DataFrame has the expected columns
pub fn assert_has_columns(df: &DataFrame, expected: &[&str]) {
    let actual: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for col in expected {
        assert!(
            actual.contains(&col.to_string()),
            "Expected column '{}' not found. Available columns: {:?}",
            col,
            actual
        );
    }
}

/// Assert that a DataFrame does not have specific columns
pub fn assert_missing_columns(df: &DataFrame, not_expected: &[&str]) {
    let actual: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for col in not_expected {
        assert!(
            !actual.contains(&col.to_string()),
            "Column '{}' should not exist but was found",
            col
        );
    }
}
