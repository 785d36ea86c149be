//! Tests for CLI argument parsing

use clap::Parser;
use sommelier::cli::{Cli, Commands};
use sommelier::pipeline::{Rating, DEFAULT_PREDICTORS};
use sommelier::plot::ChartKind;
use std::path::PathBuf;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["sommelier", "-i", "wine.csv"]);

    assert_eq!(cli.bins, 30, "Default bins should be 30");
    assert_eq!(cli.correlation_threshold, 0.5);
    assert_eq!(cli.predictors, DEFAULT_PREDICTORS.to_vec());
    assert_eq!(cli.positive, Rating::Good);
    assert_eq!(cli.separator, None);
    assert!(!cli.no_plots);
    assert!(!cli.report_json);
    assert!(!cli.no_confirm, "Default no_confirm should be false");
    assert_eq!(
        cli.infer_schema_length, 10000,
        "Default schema inference should be 10000"
    );
    assert_eq!(cli.verbose, 0);
    assert!(cli.command.is_none());
}

#[test]
fn test_cli_output_dir_derivation() {
    let cli = Cli::parse_from(["sommelier", "-i", "/data/winequality-red.csv"]);
    assert_eq!(
        cli.output_dir(),
        Some(PathBuf::from("/data/winequality-red_eda"))
    );
}

#[test]
fn test_cli_explicit_output_dir() {
    let cli = Cli::parse_from(["sommelier", "-i", "wine.csv", "-o", "/tmp/charts"]);
    assert_eq!(cli.output_dir(), Some(PathBuf::from("/tmp/charts")));
}

#[test]
fn test_cli_no_input_returns_none() {
    let cli = Cli::parse_from(["sommelier"]);
    assert!(cli.input().is_none());
    assert!(cli.output_dir().is_none());
}

#[test]
fn test_cli_custom_predictors() {
    let cli = Cli::parse_from([
        "sommelier",
        "-i",
        "wine.csv",
        "--predictors",
        "alcohol,density",
    ]);
    assert_eq!(cli.predictors, vec!["alcohol", "density"]);

    let config = cli.analysis_config();
    assert_eq!(config.predictors, vec!["alcohol", "density"]);
    assert_eq!(config.positive, Rating::Good);
}

#[test]
fn test_cli_positive_rating() {
    let cli = Cli::parse_from(["sommelier", "-i", "wine.csv", "--positive", "bad"]);
    assert_eq!(cli.analysis_config().positive, Rating::Bad);

    assert!(Cli::try_parse_from(["sommelier", "-i", "wine.csv", "--positive", "superb"]).is_err());
}

#[test]
fn test_cli_separator() {
    let cli = Cli::parse_from(["sommelier", "-i", "wine.csv", "--separator", ";"]);
    assert_eq!(cli.separator, Some(b';'));
    assert_eq!(cli.load_options().separator, Some(b';'));

    assert!(Cli::try_parse_from(["sommelier", "-i", "wine.csv", "--separator", "::"]).is_err());
}

#[test]
fn test_cli_threshold_boundaries() {
    for valid in ["0", "0.5", "1"] {
        assert!(
            Cli::try_parse_from(["sommelier", "-i", "x.csv", "--correlation-threshold", valid])
                .is_ok(),
            "{} should be accepted",
            valid
        );
    }
    for invalid in ["-0.1", "1.5", "high"] {
        assert!(
            Cli::try_parse_from([
                "sommelier",
                "-i",
                "x.csv",
                "--correlation-threshold",
                invalid
            ])
            .is_err(),
            "{} should be rejected",
            invalid
        );
    }
}

#[test]
fn test_cli_bins_must_be_positive() {
    assert!(Cli::try_parse_from(["sommelier", "-i", "x.csv", "--bins", "0"]).is_err());
    let cli = Cli::parse_from(["sommelier", "-i", "x.csv", "--bins", "15"]);
    assert_eq!(cli.plot_options().bins, 15);
}

#[test]
fn test_cli_flags() {
    let cli = Cli::parse_from([
        "sommelier",
        "-i",
        "wine.csv",
        "--no-plots",
        "--report-json",
        "--no-confirm",
        "--infer-schema-length",
        "0",
    ]);
    assert!(cli.no_plots);
    assert!(cli.report_json);
    assert!(cli.no_confirm);
    assert_eq!(cli.load_options().infer_schema_length, 0);
}

#[test]
fn test_cli_verbosity_levels() {
    assert_eq!(
        Cli::parse_from(["sommelier"]).log_level(),
        log::LevelFilter::Warn
    );
    assert_eq!(
        Cli::parse_from(["sommelier", "-v"]).log_level(),
        log::LevelFilter::Info
    );
    assert_eq!(
        Cli::parse_from(["sommelier", "-vvv"]).log_level(),
        log::LevelFilter::Debug
    );
}

#[test]
fn test_cli_describe_subcommand() {
    let cli = Cli::parse_from(["sommelier", "describe", "wine.csv", "--column", "alcohol"]);
    match cli.command {
        Some(Commands::Describe { input, column, .. }) => {
            assert_eq!(input, PathBuf::from("wine.csv"));
            assert_eq!(column.as_deref(), Some("alcohol"));
        }
        other => panic!("Expected describe command, got {:?}", other),
    }
}

#[test]
fn test_cli_plot_subcommand() {
    let cli = Cli::parse_from([
        "sommelier",
        "plot",
        "wine.csv",
        "--kind",
        "scatter",
        "--columns",
        "alcohol,density",
        "--log-scale",
    ]);
    match cli.command {
        Some(Commands::Plot {
            kind,
            columns,
            output,
            bins,
            log_scale,
            ..
        }) => {
            assert_eq!(kind, ChartKind::Scatter);
            assert_eq!(columns, vec!["alcohol", "density"]);
            assert_eq!(output, None);
            assert_eq!(bins, 30);
            assert!(log_scale);
        }
        other => panic!("Expected plot command, got {:?}", other),
    }
}

#[test]
fn test_cli_plot_rejects_unknown_kind() {
    assert!(Cli::try_parse_from(["sommelier", "plot", "wine.csv", "--kind", "pie"]).is_err());
}
