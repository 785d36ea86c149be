//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};

use crate::pipeline::{AnalysisConfig, LoadOptions, Rating};
use crate::plot::{ChartKind, PlotOptions, DEFAULT_BINS, MAX_BINS};

/// Sommelier - Exploratory analysis of red wine physicochemical data
#[derive(Parser, Debug)]
#[command(name = "sommelier")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input CSV file with the wine quality schema
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory for charts and the JSON report.
    /// Defaults to '<input_stem>_eda' next to the input file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Field separator. Detected from the header line if omitted.
    #[arg(long, value_parser = validate_separator)]
    pub separator: Option<u8>,

    /// Number of histogram bins
    #[arg(long, default_value_t = DEFAULT_BINS, value_parser = validate_bins)]
    pub bins: usize,

    /// Skip chart generation
    #[arg(long, default_value = "false")]
    pub no_plots: bool,

    /// Write the analysis results to '<output>/eda_report.json'
    #[arg(long, default_value = "false")]
    pub report_json: bool,

    /// Predictor columns for the regression models (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "alcohol,volatile_acidity,sulphates,citric_acid"
    )]
    pub predictors: Vec<String>,

    /// Rating treated as the positive class by the logistic model
    #[arg(long, default_value = "good")]
    pub positive: Rating,

    /// Report feature pairs whose absolute correlation exceeds this value
    #[arg(long, default_value = "0.5", value_parser = validate_correlation_threshold)]
    pub correlation_threshold: f64,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference.
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Increase diagnostic logging (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print descriptive statistics without plotting or modelling
    Describe {
        /// Input CSV file
        input: PathBuf,

        /// Only describe this column
        #[arg(long)]
        column: Option<String>,

        /// Field separator. Detected from the header line if omitted.
        #[arg(long, value_parser = validate_separator)]
        separator: Option<u8>,
    },

    /// Render a single chart
    Plot {
        /// Input CSV file
        input: PathBuf,

        /// Chart kind: histogram, boxplot, scatter or correlation
        #[arg(short, long)]
        kind: ChartKind,

        /// Columns to plot (comma-separated). Scatter takes x,y.
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Output directory (defaults to '<input_stem>_eda')
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of histogram bins
        #[arg(long, default_value_t = DEFAULT_BINS, value_parser = validate_bins)]
        bins: usize,

        /// Plot histogram values on a log10 axis
        #[arg(long, default_value = "false")]
        log_scale: bool,

        /// Field separator. Detected from the header line if omitted.
        #[arg(long, value_parser = validate_separator)]
        separator: Option<u8>,
    },
}

impl Cli {
    /// Get the input path if one was given.
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// Get the output directory, deriving it from the input if not explicitly provided.
    pub fn output_dir(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(
            self.output
                .clone()
                .unwrap_or_else(|| default_output_dir(input)),
        )
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            separator: self.separator,
            infer_schema_length: self.infer_schema_length,
        }
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            predictors: self.predictors.clone(),
            positive: self.positive,
            correlation_threshold: self.correlation_threshold,
        }
    }

    pub fn plot_options(&self) -> PlotOptions {
        PlotOptions {
            bins: self.bins,
            ..PlotOptions::default()
        }
    }

    /// Log level implied by the number of `-v` flags
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

/// `<parent>/<stem>_eda` for an input file
pub fn default_output_dir(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("wine");
    parent.join(format!("{}_eda", stem))
}

/// Validator for separator parameters: a single ASCII character or `\t`
fn validate_separator(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!(
            "separator must be a single ASCII character, got '{}'",
            s
        )),
    }
}

/// Validator for bins parameters
fn validate_bins(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value == 0 {
        Err("bins must be at least 1".to_string())
    } else if value > MAX_BINS {
        Err(format!("bins must be at most {}", MAX_BINS))
    } else {
        Ok(value)
    }
}

/// Validator for correlation_threshold parameter
fn validate_correlation_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "correlation_threshold must be between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
