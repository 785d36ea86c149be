//! Sommelier: Wine Quality EDA CLI Tool
//!
//! A command-line tool for exploring the red wine quality dataset:
//! descriptive statistics, correlations, charts and illustrative models.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use sommelier::cli::{confirm_overwrite, default_output_dir, Cli, Commands};
use sommelier::pipeline::{
    correlate, derive_rating, describe_column, describe_dataset, fit_models, load_dataset,
    load_dataset_with_progress, Analysis, LoadOptions,
};
use sommelier::plot::{self, ChartKind, PlotOptions};
use sommelier::report::{
    display_correlations, display_descriptives, display_models, export_report, summary_table,
    EdaReport, RunSummary, REPORT_FILE_NAME,
};
use sommelier::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Describe {
                input,
                column,
                separator,
            } => run_describe(input, column.as_deref(), &subcommand_load_options(&cli, *separator)),
            Commands::Plot {
                input,
                kind,
                columns,
                output,
                bins,
                log_scale,
                separator,
            } => {
                let options = PlotOptions {
                    bins: *bins,
                    log_scale: *log_scale,
                    ..PlotOptions::default()
                };
                let output_dir = output.clone().unwrap_or_else(|| default_output_dir(input));
                run_plot(
                    input,
                    *kind,
                    columns,
                    &output_dir,
                    &options,
                    &subcommand_load_options(&cli, *separator),
                )
            }
        };
    }

    // Main analysis pipeline - require input
    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let output_dir = cli
        .output_dir()
        .unwrap_or_else(|| default_output_dir(input));
    let config = cli.analysis_config();
    let plot_options = cli.plot_options();
    let writes_files = !cli.no_plots || cli.report_json;

    if writes_files && output_dir.exists() && !cli.no_confirm && !confirm_overwrite(&output_dir)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    // Print configuration card
    print_config(input, &output_dir, &config.predictors, !cli.no_plots);

    // Step 1: Load dataset and derive the rating column
    print_step_header(1, "Load Dataset");

    let step_start = Instant::now();
    let (mut df, stats) = load_dataset_with_progress(input, &cli.load_options())?;
    derive_rating(&mut df)?;
    print_success("Derived rating from quality");

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", stats.rows);
    println!("      Columns: {}", stats.columns);
    println!("      Estimated memory: {:.2} MB", stats.memory_mb);

    let mut summary = RunSummary::new(stats.rows, stats.columns);
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Descriptive statistics
    print_step_header(2, "Descriptive Statistics");

    let step_start = Instant::now();
    let spinner = create_spinner("Summarizing columns...");
    let descriptives = describe_dataset(&df)?;
    finish_with_success(&spinner, "Summary statistics complete");
    display_descriptives(&descriptives);

    let describe_elapsed = step_start.elapsed();
    summary.set_describe_time(describe_elapsed);
    print_step_time(describe_elapsed);

    // Step 3: Correlation analysis
    print_step_header(3, "Correlation Analysis");

    let step_start = Instant::now();
    let spinner = create_spinner("Calculating correlations...");
    let correlations = correlate(&df, config.correlation_threshold)?;
    finish_with_success(&spinner, "Correlation analysis complete");

    if correlations.strong_pairs.is_empty() {
        print_info("No strongly correlated feature pairs found");
    } else {
        print_count(
            "strongly correlated pair(s)",
            correlations.strong_pairs.len(),
            Some(&format!("(|r| > {:.2})", config.correlation_threshold)),
        );
    }
    display_correlations(&correlations, config.correlation_threshold);

    let correlation_elapsed = step_start.elapsed();
    summary.set_correlation_time(correlation_elapsed);
    print_step_time(correlation_elapsed);

    // Step 4: Charts
    print_step_header(4, "Charts");

    let step_start = Instant::now();
    let mut charts: Vec<PathBuf> = Vec::new();
    if cli.no_plots {
        print_info("Chart generation disabled (--no-plots)");
    } else {
        let spinner = create_spinner("Rendering charts...");
        charts = plot::render_all(&df, &output_dir, &plot_options)
            .with_context(|| format!("Failed to render charts into {}", output_dir.display()))?;
        finish_with_success(
            &spinner,
            &format!("Wrote {} chart(s) to {}", charts.len(), output_dir.display()),
        );
    }
    let plot_elapsed = step_start.elapsed();
    summary.set_plot_time(plot_elapsed);
    print_step_time(plot_elapsed);

    // Step 5: Models
    print_step_header(5, "Regression Models");

    let step_start = Instant::now();
    let spinner = create_spinner("Fitting linear and logistic models...");
    let models = fit_models(&df, &config)?;
    if models.logistic.converged {
        finish_with_success(&spinner, "Models fitted");
    } else {
        finish_with_warning(
            &spinner,
            &format!(
                "Logistic model did not converge after {} iterations",
                models.logistic.iterations
            ),
        );
    }
    display_models(&models.linear, &models.logistic);

    if !cli.no_plots {
        let roc_path = plot::render_roc(
            &models.logistic.roc,
            &format!("ROC curve: rating = {}", models.logistic.positive),
            &output_dir,
            &plot_options,
        )
        .context("Failed to render ROC curve")?;
        charts.push(roc_path);
    }
    summary.add_charts(charts.len());

    let model_elapsed = step_start.elapsed();
    summary.set_model_time(model_elapsed);
    print_step_time(model_elapsed);

    let analysis = Analysis {
        descriptives,
        correlations,
        models,
    };

    // Step 6: JSON report
    if cli.report_json {
        print_step_header(6, "Save Report");

        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory {}", output_dir.display())
        })?;
        let report_path = output_dir.join(REPORT_FILE_NAME);
        let report = EdaReport::new(input, stats.rows, &config, &analysis, &charts);
        export_report(&report, &report_path)?;
        summary.report_written = true;
        print_success(&format!("Saved report to {}", report_path.display()));
    }

    if !analysis.models.logistic.converged {
        print_warning("Logistic coefficients are from the last iteration and may be unstable");
    }

    // Display summary
    summary.display();

    // Final completion message
    print_completion();

    Ok(())
}

fn subcommand_load_options(cli: &Cli, separator: Option<u8>) -> LoadOptions {
    LoadOptions {
        separator: separator.or(cli.separator),
        infer_schema_length: cli.infer_schema_length,
    }
}

/// Print summary statistics for the whole dataset or a single column
fn run_describe(input: &Path, column: Option<&str>, options: &LoadOptions) -> Result<()> {
    let mut df = load_dataset(input, options)?;

    match column {
        Some(name) => {
            let column_summary = describe_column(&df, name)?;
            for line in summary_table(&[column_summary]).to_string().lines() {
                println!("    {}", line);
            }
        }
        None => {
            derive_rating(&mut df)?;
            display_descriptives(&describe_dataset(&df)?);
        }
    }
    Ok(())
}

/// Render a single chart and print where it was written
fn run_plot(
    input: &Path,
    kind: ChartKind,
    columns: &[String],
    output_dir: &Path,
    options: &PlotOptions,
    load_options: &LoadOptions,
) -> Result<()> {
    let mut df = load_dataset(input, load_options)?;
    derive_rating(&mut df)?;

    let path = plot::render(&df, kind, columns, output_dir, options)
        .with_context(|| format!("Failed to render {} chart", kind))?;
    print_success(&format!("Wrote {}", path.display()));
    Ok(())
}
