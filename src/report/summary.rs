//! Run summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Summary of one analysis run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub rows: usize,
    pub columns: usize,
    pub charts_written: usize,
    pub report_written: bool,
    pub load_time: Duration,
    pub describe_time: Duration,
    pub correlation_time: Duration,
    pub plot_time: Duration,
    pub model_time: Duration,
}

impl RunSummary {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            ..Default::default()
        }
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_describe_time(&mut self, elapsed: Duration) {
        self.describe_time = elapsed;
    }

    pub fn set_correlation_time(&mut self, elapsed: Duration) {
        self.correlation_time = elapsed;
    }

    pub fn set_plot_time(&mut self, elapsed: Duration) {
        self.plot_time = elapsed;
    }

    pub fn set_model_time(&mut self, elapsed: Duration) {
        self.model_time = elapsed;
    }

    pub fn add_charts(&mut self, count: usize) {
        self.charts_written += count;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.describe_time + self.correlation_time + self.plot_time + self.model_time
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("🍷 Observations"), Cell::new(self.rows)]);
        table.add_row(vec![Cell::new("📁 Columns"), Cell::new(self.columns)]);
        table.add_row(vec![
            Cell::new("📊 Charts Written"),
            Cell::new(self.charts_written).fg(if self.charts_written == 0 {
                Color::White
            } else {
                Color::Green
            }),
        ]);
        table.add_row(vec![
            Cell::new("💾 JSON Report"),
            Cell::new(if self.report_written { "yes" } else { "no" }),
        ]);

        for (label, elapsed) in [
            ("⏱️  Load", self.load_time),
            ("⏱️  Describe", self.describe_time),
            ("⏱️  Correlate", self.correlation_time),
            ("⏱️  Plot", self.plot_time),
            ("⏱️  Model", self.model_time),
        ] {
            table.add_row(vec![Cell::new(label), Cell::new(format_duration(elapsed))]);
        }

        table.add_row(vec![
            Cell::new("✅ Total"),
            Cell::new(format_duration(self.total_time()))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

/// Format a duration as milliseconds below one second, seconds above
pub fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{:.2}s", secs)
    }
}
