//! Terminal tables for analysis results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{
    ColumnSummary, CorrelatedPair, Correlations, Descriptives, LinearModel, LogisticModel, Rating,
};

fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
        .collect()
}

fn number(value: f64, decimals: usize) -> Cell {
    Cell::new(format!("{:.*}", decimals, value)).set_alignment(CellAlignment::Right)
}

/// Pick a precision that keeps small measurements (density, chlorides) readable
fn decimals_for(summary: &ColumnSummary) -> usize {
    let magnitude = summary.max.abs().max(summary.min.abs());
    if magnitude < 1.0 {
        4
    } else if magnitude < 10.0 {
        3
    } else {
        2
    }
}

/// Table of per-column descriptive statistics
pub fn summary_table(summaries: &[ColumnSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&[
        "Column", "Count", "Min", "Q1", "Median", "Mean", "Q3", "Max", "Std Dev",
    ]));

    for s in summaries {
        let d = decimals_for(s);
        table.add_row(vec![
            Cell::new(&s.column),
            Cell::new(s.count).set_alignment(CellAlignment::Right),
            number(s.min, d),
            number(s.q1, d),
            number(s.median, d).add_attribute(Attribute::Bold),
            number(s.mean, d),
            number(s.q3, d),
            number(s.max, d),
            number(s.std_dev, d),
        ]);
    }
    table
}

/// Print descriptive statistics, frequency tables and group means
pub fn display_descriptives(descriptives: &Descriptives) {
    print_section("📊", "DESCRIPTIVE STATISTICS");
    print_indented(&summary_table(&descriptives.summaries));

    print_section("🍷", "QUALITY DISTRIBUTION");
    let total: usize = descriptives.quality_counts.iter().map(|(_, c)| c).sum();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Quality", "Rating", "Count", "Share"]));
    for (quality, count) in &descriptives.quality_counts {
        let share = if total > 0 {
            *count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            Cell::new(quality),
            Cell::new(Rating::from_quality(*quality)),
            Cell::new(count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", share)).set_alignment(CellAlignment::Right),
        ]);
    }
    print_indented(&table);

    println!();
    for (rating, count) in &descriptives.rating_counts {
        println!(
            "      {} {:<8} {}",
            style("•").dim(),
            rating,
            style(count).yellow().bold()
        );
    }

    print_section("🔎", "MEANS BY RATING");
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    let mut names = vec!["Column"];
    names.extend(Rating::ALL.iter().map(|r| r.as_str()));
    names.push("Outliers");
    table.set_header(header(&names));
    for group in &descriptives.group_means {
        let mut row = vec![Cell::new(&group.column)];
        for rating in Rating::ALL {
            row.push(match group.means.iter().find(|(r, _)| *r == rating) {
                Some((_, mean)) => number(*mean, 3),
                None => Cell::new("-").set_alignment(CellAlignment::Right),
            });
        }
        let outliers = descriptives
            .outliers
            .iter()
            .find(|o| o.column == group.column)
            .map(|o| o.outliers)
            .unwrap_or(0);
        row.push(Cell::new(outliers).set_alignment(CellAlignment::Right));
        table.add_row(row);
    }
    print_indented(&table);
}

fn correlation_cell(r: f64) -> Cell {
    let color = if r >= 0.3 {
        Color::Green
    } else if r <= -0.3 {
        Color::Red
    } else {
        Color::White
    };
    number(r, 3).fg(color)
}

fn pair_table(pairs: &[CorrelatedPair], first: &str, second: &str) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&[first, second, "r"]));
    for pair in pairs {
        table.add_row(vec![
            Cell::new(&pair.feature1),
            Cell::new(&pair.feature2),
            correlation_cell(pair.correlation),
        ]);
    }
    table
}

/// Print quality correlations and strongly correlated feature pairs
pub fn display_correlations(correlations: &Correlations, threshold: f64) {
    print_section("🔗", "CORRELATION WITH QUALITY");
    print_indented(&pair_table(&correlations.with_quality, "Feature", "Target"));

    print_section("🔗", "STRONGLY CORRELATED FEATURES");
    if correlations.strong_pairs.is_empty() {
        println!(
            "      No feature pairs with |r| > {:.2}",
            threshold
        );
    } else {
        print_indented(&pair_table(&correlations.strong_pairs, "Feature", "Feature"));
    }
}

/// Print the fitted linear and logistic models
pub fn display_models(linear: &LinearModel, logistic: &LogisticModel) {
    print_section("📈", "LINEAR REGRESSION");
    println!(
        "      {} ~ {}",
        style(&linear.target).bold(),
        linear
            .coefficients
            .iter()
            .skip(1)
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(" + ")
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Term", "Estimate"]));
    for c in &linear.coefficients {
        table.add_row(vec![Cell::new(&c.name), number(c.estimate, 4)]);
    }
    table.add_row(vec![
        Cell::new("R²").add_attribute(Attribute::Bold),
        number(linear.r_squared, 4).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Adjusted R²"), number(linear.adjusted_r_squared, 4)]);
    table.add_row(vec![Cell::new("Residual SE"), number(linear.residual_se, 4)]);
    table.add_row(vec![Cell::new("Observations"), Cell::new(linear.n)]);
    print_indented(&table);

    print_section("🎯", "LOGISTIC REGRESSION");
    println!(
        "      P(rating = {}): {} of {} observations positive",
        style(logistic.positive).bold(),
        logistic.positives,
        logistic.n
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Term", "Log-odds"]));
    for c in &logistic.coefficients {
        table.add_row(vec![Cell::new(&c.name), number(c.estimate, 4)]);
    }
    let auc = logistic.auc();
    table.add_row(vec![
        Cell::new("AUC").add_attribute(Attribute::Bold),
        number(auc, 4)
            .fg(if auc >= 0.8 { Color::Green } else { Color::Yellow })
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Log-likelihood"), number(logistic.log_likelihood, 2)]);
    table.add_row(vec![
        Cell::new("Iterations"),
        Cell::new(format!(
            "{}{}",
            logistic.iterations,
            if logistic.converged { "" } else { " (not converged)" }
        )),
    ]);
    print_indented(&table);
}
