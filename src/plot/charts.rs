//! Chart drawing on top of the [`plotters`] SVG backend
//!
//! Every function renders one chart to one SVG file. SVG text is emitted as
//! `<text>` elements, so no system fonts are needed (works in Docker/CI).

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use super::geometry::{box_stats, histogram_bins};
use super::{PlotError, Result};
use crate::pipeline::{CorrelationMatrix, Rating, RocCurve};

const FONT: &str = "sans-serif";

fn drawing<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Drawing(e.to_string())
}

fn config<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::ChartConfig(e.to_string())
}

/// Fixed palette for the three rating levels
pub fn rating_color(rating: Rating) -> RGBColor {
    match rating {
        Rating::Bad => RGBColor(213, 94, 0),
        Rating::Average => RGBColor(230, 159, 0),
        Rating::Good => RGBColor(0, 114, 178),
    }
}

/// Diverging blue-white-red scale for coefficients in [-1, 1]
pub fn diverging_color(value: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(200, 200, 200);
    }
    let t = value.clamp(-1.0, 1.0);
    let fade = |c: u8| (255.0 - (255.0 - c as f64) * t.abs()).round() as u8;
    if t >= 0.0 {
        RGBColor(fade(178), fade(24), fade(43))
    } else {
        RGBColor(fade(33), fade(102), fade(172))
    }
}

/// Pad a data range so points do not sit on the chart border
fn padded(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Draw a histogram of `values`
pub fn draw_histogram(
    values: &[f64],
    bins: usize,
    title: &str,
    x_label: &str,
    size: (u32, u32),
    output_path: &Path,
) -> Result<()> {
    let bins = histogram_bins(values, bins);
    if bins.is_empty() {
        return Err(PlotError::InvalidData(format!(
            "Cannot draw histogram '{}' without data",
            title
        )));
    }

    let x_min = bins[0].lower;
    let x_max = bins[bins.len() - 1].upper;
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(1) as f64 * 1.1;

    let root = SVGBackend::new(output_path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(config)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc("Count")
        .draw()
        .map_err(config)?;

    chart
        .draw_series(bins.iter().map(|b| {
            Rectangle::new(
                [(b.lower, 0.0), (b.upper, b.count as f64)],
                RGBColor(0, 114, 178).mix(0.7).filled(),
            )
        }))
        .map_err(drawing)?;

    root.present().map_err(drawing)?;
    Ok(())
}

/// Draw a bar chart of integer categories, e.g. quality score frequencies
pub fn draw_bar_chart(
    counts: &[(i64, usize)],
    title: &str,
    x_label: &str,
    size: (u32, u32),
    output_path: &Path,
) -> Result<()> {
    if counts.is_empty() {
        return Err(PlotError::InvalidData(format!(
            "Cannot draw bar chart '{}' without data",
            title
        )));
    }

    let x_min = counts[0].0 as f64 - 0.5;
    let x_max = counts[counts.len() - 1].0 as f64 + 0.5;
    let y_max = counts.iter().map(|(_, c)| *c).max().unwrap_or(1) as f64 * 1.1;

    let root = SVGBackend::new(output_path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(config)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(counts.len() + 1)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .x_desc(x_label)
        .y_desc("Count")
        .draw()
        .map_err(config)?;

    chart
        .draw_series(counts.iter().map(|(value, count)| {
            let x = *value as f64;
            Rectangle::new(
                [(x - 0.4, 0.0), (x + 0.4, *count as f64)],
                RGBColor(0, 114, 178).mix(0.7).filled(),
            )
        }))
        .map_err(drawing)?;

    let label_style = TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart
        .draw_series(counts.iter().map(|(value, count)| {
            Text::new(
                count.to_string(),
                (*value as f64, *count as f64),
                label_style.clone(),
            )
        }))
        .map_err(drawing)?;

    root.present().map_err(drawing)?;
    Ok(())
}

/// Draw one box per rating for a single column
pub fn draw_boxplot(
    groups: &[(Rating, Vec<f64>)],
    title: &str,
    y_label: &str,
    size: (u32, u32),
    output_path: &Path,
) -> Result<()> {
    let stats: Vec<(usize, Rating, _)> = groups
        .iter()
        .enumerate()
        .filter_map(|(i, (rating, values))| box_stats(values).map(|s| (i, *rating, s)))
        .collect();
    if stats.is_empty() {
        return Err(PlotError::InvalidData(format!(
            "Cannot draw boxplot '{}' without data",
            title
        )));
    }

    let (y_min, y_max) = min_max(groups.iter().flat_map(|(_, v)| v.iter().copied()))
        .map(|(lo, hi)| padded(lo, hi))
        .unwrap_or((0.0, 1.0));

    let root = SVGBackend::new(output_path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..groups.len() as f64, y_min..y_max)
        .map_err(config)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc("Rating")
        .y_desc(y_label)
        .draw()
        .map_err(config)?;

    for (i, rating, s) in &stats {
        let center = *i as f64 + 0.5;
        let color = rating_color(*rating);
        let (left, right) = (center - 0.3, center + 0.3);

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(left, s.q1), (right, s.q3)],
                color.mix(0.4).filled(),
            )))
            .map_err(drawing)?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(left, s.q1), (right, s.q3)],
                BLACK.stroke_width(1),
            )))
            .map_err(drawing)?;

        let segments = vec![
            // Median
            vec![(left, s.median), (right, s.median)],
            // Whiskers and caps
            vec![(center, s.q3), (center, s.upper_whisker)],
            vec![(center, s.q1), (center, s.lower_whisker)],
            vec![(center - 0.1, s.upper_whisker), (center + 0.1, s.upper_whisker)],
            vec![(center - 0.1, s.lower_whisker), (center + 0.1, s.lower_whisker)],
        ];
        chart
            .draw_series(
                segments
                    .into_iter()
                    .map(|points| PathElement::new(points, BLACK.stroke_width(2))),
            )
            .map_err(drawing)?;

        chart
            .draw_series(
                s.outliers
                    .iter()
                    .map(|v| Circle::new((center, *v), 3, color.stroke_width(1))),
            )
            .map_err(drawing)?;

        let label_style = TextStyle::from((FONT, 16).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(std::iter::once(Text::new(
                format!("{} (n={})", rating, groups[*i].1.len()),
                (center, y_min),
                label_style,
            )))
            .map_err(drawing)?;
    }

    root.present().map_err(drawing)?;
    Ok(())
}

/// Draw a scatter plot of `(x, y, rating)` points, coloured by rating
pub fn draw_scatter(
    points: &[(f64, f64, Rating)],
    title: &str,
    x_label: &str,
    y_label: &str,
    size: (u32, u32),
    output_path: &Path,
) -> Result<()> {
    let (x_min, x_max) = min_max(points.iter().map(|p| p.0))
        .map(|(lo, hi)| padded(lo, hi))
        .ok_or_else(|| {
            PlotError::InvalidData(format!("Cannot draw scatter '{}' without data", title))
        })?;
    let (y_min, y_max) = min_max(points.iter().map(|p| p.1))
        .map(|(lo, hi)| padded(lo, hi))
        .unwrap_or((0.0, 1.0));

    let root = SVGBackend::new(output_path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(config)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()
        .map_err(config)?;

    for rating in Rating::ALL {
        let color = rating_color(rating);
        chart
            .draw_series(
                points
                    .iter()
                    .filter(|p| p.2 == rating)
                    .map(|p| Circle::new((p.0, p.1), 3, color.mix(0.6).filled())),
            )
            .map_err(drawing)?
            .label(rating.as_str())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(drawing)?;

    root.present().map_err(drawing)?;
    Ok(())
}

/// Draw a correlation heatmap with annotated coefficients
pub fn draw_correlation_matrix(
    matrix: &CorrelationMatrix,
    title: &str,
    size: (u32, u32),
    output_path: &Path,
) -> Result<()> {
    let n = matrix.len() as u32;
    if n == 0 {
        return Err(PlotError::InvalidData(
            "Cannot draw an empty correlation matrix".to_string(),
        ));
    }
    let names = &matrix.columns;
    let name_of = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => names.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };

    let root = SVGBackend::new(output_path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 28))
        .margin(20)
        .x_label_area_size(140)
        .y_label_area_size(160)
        // Integer ranges are inclusive, so 0..n-1 yields exactly n segments
        .build_cartesian_2d(
            (0u32..n - 1).into_segmented(),
            (0u32..n - 1).into_segmented(),
        )
        .map_err(config)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n as usize)
        .y_labels(n as usize)
        .x_label_formatter(&name_of)
        .y_label_formatter(&name_of)
        .x_label_style(TextStyle::from((FONT, 12).into_font()).transform(FontTransform::Rotate90))
        .draw()
        .map_err(config)?;

    let cells: Vec<(u32, u32, f64)> = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| (i, j, matrix.values[i as usize][j as usize]))
        .collect();

    // Row i is drawn top-down so the diagonal runs from top-left
    chart
        .draw_series(cells.iter().map(|&(i, j, r)| {
            let row = n - 1 - i;
            Rectangle::new(
                [
                    (SegmentValue::Exact(j), SegmentValue::Exact(row)),
                    (SegmentValue::Exact(j + 1), SegmentValue::Exact(row + 1)),
                ],
                diverging_color(r).filled(),
            )
        }))
        .map_err(drawing)?;

    let value_style = TextStyle::from((FONT, 12).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    chart
        .draw_series(cells.iter().map(|&(i, j, r)| {
            Text::new(
                if r.is_nan() {
                    "NA".to_string()
                } else {
                    format!("{:.2}", r)
                },
                (SegmentValue::CenterOf(j), SegmentValue::CenterOf(n - 1 - i)),
                value_style.clone(),
            )
        }))
        .map_err(drawing)?;

    root.present().map_err(drawing)?;
    Ok(())
}

/// Draw a ROC curve with the chance diagonal
pub fn draw_roc_curve(
    roc: &RocCurve,
    title: &str,
    size: (u32, u32),
    output_path: &Path,
) -> Result<()> {
    if roc.points.len() < 2 {
        return Err(PlotError::InvalidData(
            "ROC curve needs at least two points".to_string(),
        ));
    }

    let root = SVGBackend::new(output_path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} (AUC = {:.3})", title, roc.auc), (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)
        .map_err(config)?;

    chart
        .configure_mesh()
        .x_desc("False positive rate")
        .y_desc("True positive rate")
        .draw()
        .map_err(config)?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 0.0), (1.0, 1.0)],
            RGBColor(150, 150, 150).stroke_width(1),
        )))
        .map_err(drawing)?;

    chart
        .draw_series(LineSeries::new(
            roc.points.iter().copied(),
            RGBColor(0, 114, 178).stroke_width(2),
        ))
        .map_err(drawing)?;

    root.present().map_err(drawing)?;
    Ok(())
}
