//! Tests for chart rendering

use sommelier::pipeline::*;
use sommelier::plot::*;
use std::path::Path;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn assert_svg(path: &Path) {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("{} not readable: {}", path.display(), e));
    assert!(content.contains("<svg"), "{} is not an SVG", path.display());
    assert!(content.contains("</svg>"), "{} is incomplete", path.display());
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|c| c.to_string()).collect()
}

fn small_options() -> PlotOptions {
    PlotOptions {
        size: (400, 300),
        ..PlotOptions::default()
    }
}

#[test]
fn test_render_histogram() {
    let df = create_rated_dataframe(120);
    let temp_dir = TempDir::new().unwrap();

    let path = render(
        &df,
        ChartKind::Histogram,
        &columns(&["alcohol"]),
        temp_dir.path(),
        &small_options(),
    )
    .unwrap();

    assert_eq!(path, temp_dir.path().join("histogram_alcohol.svg"));
    assert_svg(&path);
}

#[test]
fn test_render_log_histogram() {
    let df = create_rated_dataframe(120);
    let temp_dir = TempDir::new().unwrap();
    let options = PlotOptions {
        log_scale: true,
        ..small_options()
    };

    let path = render(
        &df,
        ChartKind::Histogram,
        &columns(&["residual_sugar"]),
        temp_dir.path(),
        &options,
    )
    .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "histogram_log10_residual_sugar.svg"
    );
    assert_svg(&path);
}

#[test]
fn test_render_boxplot_by_rating() {
    let df = create_rated_dataframe(120);
    let temp_dir = TempDir::new().unwrap();

    let path = render(
        &df,
        ChartKind::Boxplot,
        &columns(&["volatile_acidity"]),
        temp_dir.path(),
        &small_options(),
    )
    .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "boxplot_volatile_acidity_by_rating.svg"
    );
    assert_svg(&path);
}

#[test]
fn test_render_scatter() {
    let df = create_rated_dataframe(120);
    let temp_dir = TempDir::new().unwrap();

    let path = render(
        &df,
        ChartKind::Scatter,
        &columns(&["alcohol", "density"]),
        temp_dir.path(),
        &small_options(),
    )
    .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "scatter_density_vs_alcohol.svg"
    );
    assert_svg(&path);
}

#[test]
fn test_render_correlation_matrix_defaults_to_numeric_columns() {
    let df = create_rated_dataframe(120);
    let temp_dir = TempDir::new().unwrap();

    let path = render(
        &df,
        ChartKind::CorrelationMatrix,
        &[],
        temp_dir.path(),
        &small_options(),
    )
    .unwrap();

    assert_eq!(path, temp_dir.path().join("correlation_matrix.svg"));
    assert_svg(&path);
}

#[test]
fn test_render_creates_output_directory() {
    let df = create_rated_dataframe(60);
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("charts").join("wine");

    let path = render(
        &df,
        ChartKind::Histogram,
        &columns(&["pH"]),
        &nested,
        &small_options(),
    )
    .unwrap();

    assert!(nested.is_dir());
    assert_svg(&path);
}

#[test]
fn test_render_wrong_column_count() {
    let df = create_rated_dataframe(60);
    let temp_dir = TempDir::new().unwrap();

    let err = render(
        &df,
        ChartKind::Scatter,
        &columns(&["alcohol"]),
        temp_dir.path(),
        &small_options(),
    )
    .unwrap_err();
    assert!(matches!(err, PlotError::InvalidData(_)));
}

#[test]
fn test_render_unknown_column() {
    let df = create_rated_dataframe(60);
    let temp_dir = TempDir::new().unwrap();

    let err = render(
        &df,
        ChartKind::Histogram,
        &columns(&["colour"]),
        temp_dir.path(),
        &small_options(),
    )
    .unwrap_err();

    match err {
        PlotError::Analysis(inner) => assert!(matches!(
            inner.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::ColumnNotFound { .. })
        )),
        other => panic!("Unexpected error: {:?}", other),
    }
}

#[test]
fn test_render_quality_counts_and_roc() {
    let df = create_rated_dataframe(DEFAULT_ROWS);
    let temp_dir = TempDir::new().unwrap();
    let options = small_options();

    let bars = render_quality_counts(&df, temp_dir.path(), &options).unwrap();
    assert_svg(&bars);

    let predictors = columns(&["alcohol", "volatile_acidity"]);
    let model = fit_logistic(&df, &predictors, Rating::Good).unwrap();
    let roc = render_roc(&model.roc, "ROC", temp_dir.path(), &options).unwrap();
    assert_eq!(roc, temp_dir.path().join("roc_curve.svg"));
    assert_svg(&roc);
}

#[test]
fn test_render_all_writes_full_chart_set() {
    let df = create_rated_dataframe(DEFAULT_ROWS);
    let temp_dir = TempDir::new().unwrap();

    let written = render_all(&df, temp_dir.path(), &small_options()).unwrap();

    // quality bars + histograms + log histograms + boxplots + scatters + matrix
    let expected = 1
        + FEATURE_COLUMNS.len()
        + SKEWED_COLUMNS.len()
        + FEATURE_COLUMNS.len()
        + SCATTER_PAIRS.len()
        + 1;
    assert_eq!(written.len(), expected);

    for path in &written {
        assert!(path.starts_with(temp_dir.path()));
        assert_svg(path);
    }

    let svg_files = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "svg"))
        .count();
    assert_eq!(svg_files, expected, "every chart gets its own file");
}

#[test]
fn test_histogram_bins_cover_all_values() {
    let df = create_rated_dataframe(DEFAULT_ROWS);
    let values = column_values(&df, "alcohol").unwrap();

    let bins = histogram_bins(&values, DEFAULT_BINS);
    assert_eq!(bins.len(), DEFAULT_BINS);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
}
