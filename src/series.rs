//! Base series for each chart type.
//!
//! Category charts aggregate duplicate categories by arithmetic mean and keep
//! categories in first-seen order. Rows without a usable value are skipped.

use crate::data::{cell_label, cell_number, Row};
use crate::ir::{AreaStyle, Encode, LineStyle, OneOrMany, Series, SeriesType};
use crate::parser::ast::{ChartType, FieldDef};
use crate::stats;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use tracing::warn;

pub const TRENDLINE_NAME: &str = "Linear fit";
pub const OUTLIER_NAME: &str = "Outliers";
pub const COUNT_DIMENSION: &str = "count";
pub const VIOLIN_GRID_POINTS: usize = 64;
pub const BOX_DIMENSIONS: [&str; 5] = ["min", "Q1", "median", "Q3", "max"];

/// Inputs for one base-series build
#[derive(Debug, Clone, Copy)]
pub struct SeriesRequest<'a> {
    pub chart_type: ChartType,
    pub x: &'a FieldDef,
    pub y: &'a FieldDef,
    /// Colour grouping field, when grouping is active
    pub group: Option<&'a FieldDef>,
    pub trendline: bool,
}

/// Series plus what the axis builder needs to know about them
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    /// Category axis values; `None` when x is continuous
    pub categories: Option<Vec<String>>,
    pub series: Vec<Series>,
    /// Min/max along the value axis
    pub extent: Option<(f64, f64)>,
}

pub fn build_series(req: &SeriesRequest<'_>, rows: &[&Row]) -> SeriesSet {
    match req.chart_type {
        ChartType::Bar
        | ChartType::GroupedBar
        | ChartType::StackedBar
        | ChartType::Line
        | ChartType::Area
        | ChartType::ErrorBar => category_series(req, rows),
        ChartType::Scatter => scatter_series(req, rows),
        ChartType::Histogram => histogram_series(req, rows),
        ChartType::Boxplot => boxplot_series(req, rows),
        ChartType::Violin => violin_series(req, rows),
    }
}

/// Numeric values per category label, first-seen order.
/// A category is registered even when none of its values are numeric.
pub fn group_values(rows: &[&Row], x_field: &str, y_field: &str) -> Vec<(String, Vec<f64>)> {
    let mut order: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0usize;

    for row in rows {
        let Some(category) = cell_label(row, x_field) else {
            skipped += 1;
            continue;
        };
        let slot = *index.entry(category.clone()).or_insert_with(|| {
            order.push((category, Vec::new()));
            order.len() - 1
        });
        match cell_number(row, y_field) {
            Some(v) => order[slot].1.push(v),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(x = x_field, y = y_field, skipped, "skipped rows without a category or numeric value");
    }
    order
}

/// First-seen distinct labels of a field
pub fn distinct_labels(rows: &[&Row], field: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        if let Some(label) = cell_label(row, field) {
            if seen.insert(label.clone()) {
                out.push(label);
            }
        }
    }
    out
}

/// Mean per category, aligned to `categories`; `None` where a category has no values
pub fn means_for(categories: &[String], groups: &[(String, Vec<f64>)]) -> Vec<Option<f64>> {
    let lookup: HashMap<&str, &[f64]> = groups
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_slice()))
        .collect();
    categories
        .iter()
        .map(|c| lookup.get(c.as_str()).and_then(|v| stats::mean(v)))
        .collect()
}

pub fn category_points(categories: &[String], values: &[Option<f64>]) -> Vec<Value> {
    categories
        .iter()
        .zip(values)
        .map(|(c, v)| match v {
            Some(v) => json!([c, v]),
            None => json!([c, Value::Null]),
        })
        .collect()
}

fn extent_of<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn primary_series_type(chart_type: ChartType) -> SeriesType {
    match chart_type {
        ChartType::Line | ChartType::Area => SeriesType::Line,
        ChartType::Scatter | ChartType::ErrorBar => SeriesType::Scatter,
        ChartType::Boxplot => SeriesType::Boxplot,
        ChartType::Violin => SeriesType::Custom,
        ChartType::Bar | ChartType::GroupedBar | ChartType::StackedBar | ChartType::Histogram => {
            SeriesType::Bar
        }
    }
}

fn xy_series(req: &SeriesRequest<'_>, series_type: SeriesType, data: Vec<Value>) -> Series {
    let mut s = Series::new(
        series_type,
        vec![req.x.field.clone(), req.y.field.clone()],
        Encode::new(req.x.field.clone(), req.y.field.clone()),
        data,
    );
    if req.chart_type == ChartType::Area {
        s.area_style = Some(AreaStyle::default());
    }
    if req.chart_type == ChartType::StackedBar {
        s.stack = Some("total".to_string());
    }
    s
}

fn category_series(req: &SeriesRequest<'_>, rows: &[&Row]) -> SeriesSet {
    let series_type = primary_series_type(req.chart_type);

    let Some(group) = req.group else {
        let groups = group_values(rows, &req.x.field, &req.y.field);
        let categories: Vec<String> = groups.iter().map(|(c, _)| c.clone()).collect();
        let means = means_for(&categories, &groups);
        let extent = extent_of(means.iter().flatten().copied());
        let series = xy_series(req, series_type, category_points(&categories, &means))
            .named(req.y.display_name());
        return SeriesSet { categories: Some(categories), series: vec![series], extent };
    };

    // Pivot: one series per colour group over the shared category list
    let categories = distinct_labels(rows, &req.x.field);
    let group_keys = distinct_labels(rows, &group.field);

    let mut series = Vec::with_capacity(group_keys.len());
    let mut stack_totals = vec![0.0f64; categories.len()];
    let mut all_means = Vec::new();

    for key in &group_keys {
        let subset: Vec<&Row> = rows
            .iter()
            .copied()
            .filter(|r| cell_label(r, &group.field).as_deref() == Some(key.as_str()))
            .collect();
        let means = means_for(&categories, &group_values(&subset, &req.x.field, &req.y.field));
        for (total, m) in stack_totals.iter_mut().zip(&means) {
            *total += m.unwrap_or(0.0);
        }
        all_means.extend(means.iter().flatten().copied());
        series.push(xy_series(req, series_type, category_points(&categories, &means)).named(key.clone()));
    }

    let extent = if req.chart_type == ChartType::StackedBar {
        extent_of(stack_totals.iter().copied().chain(all_means.iter().copied()))
    } else {
        extent_of(all_means)
    };

    SeriesSet { categories: Some(categories), series, extent }
}

fn numeric_points(rows: &[&Row], x: &str, y: &str) -> Vec<(f64, f64)> {
    let mut skipped = 0usize;
    let points = rows
        .iter()
        .filter_map(|r| match (cell_number(r, x), cell_number(r, y)) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => {
                skipped += 1;
                None
            }
        })
        .collect();
    if skipped > 0 {
        warn!(x, y, skipped, "skipped rows with non-numeric coordinates");
    }
    points
}

fn scatter_series(req: &SeriesRequest<'_>, rows: &[&Row]) -> SeriesSet {
    let mut series = Vec::new();

    match req.group {
        Some(group) => {
            for key in distinct_labels(rows, &group.field) {
                let subset: Vec<&Row> = rows
                    .iter()
                    .copied()
                    .filter(|r| cell_label(r, &group.field).as_deref() == Some(key.as_str()))
                    .collect();
                let data = numeric_points(&subset, &req.x.field, &req.y.field)
                    .into_iter()
                    .map(|(a, b)| json!([a, b]))
                    .collect();
                series.push(xy_series(req, SeriesType::Scatter, data).named(key));
            }
        }
        None => {
            let data = numeric_points(rows, &req.x.field, &req.y.field)
                .into_iter()
                .map(|(a, b)| json!([a, b]))
                .collect();
            series.push(xy_series(req, SeriesType::Scatter, data).named(req.y.display_name()));
        }
    }

    let points = numeric_points(rows, &req.x.field, &req.y.field);
    let extent = extent_of(points.iter().map(|p| p.1));

    if req.trendline {
        let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        if let Some((slope, intercept)) = stats::linear_regression(&xs, &ys) {
            let min_x = xs.iter().copied().fold(f64::INFINITY, f64::min);
            let max_x = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let data = vec![
                json!([min_x, slope * min_x + intercept]),
                json!([max_x, slope * max_x + intercept]),
            ];
            let mut line = xy_series(req, SeriesType::Line, data).named(TRENDLINE_NAME);
            line.show_symbol = Some(false);
            line.line_style = Some(LineStyle { dash: Some(vec![6.0, 4.0]), ..Default::default() });
            series.push(line);
        }
    }

    SeriesSet { categories: None, series, extent }
}

/// Bin centre with enough decimals that neighbouring bins stay distinct
fn format_bin_label(v: f64, width: f64) -> String {
    let decimals = if width > 0.0 && width.is_finite() {
        ((-width.log10()).ceil() as i64 + 1).clamp(2, 12) as usize
    } else {
        2
    };
    let s = format!("{:.*}", decimals, v);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

fn histogram_series(req: &SeriesRequest<'_>, rows: &[&Row]) -> SeriesSet {
    let values: Vec<f64> = rows.iter().filter_map(|r| cell_number(r, &req.x.field)).collect();
    let bins = stats::histogram(&values, stats::default_bin_count(values.len()));

    let categories: Vec<String> = bins
        .iter()
        .map(|b| format_bin_label(b.center(), b.end - b.start))
        .collect();
    let data = categories
        .iter()
        .zip(&bins)
        .map(|(label, b)| json!([label, b.count]))
        .collect();

    let series = Series::new(
        SeriesType::Bar,
        vec![req.x.field.clone(), COUNT_DIMENSION.to_string()],
        Encode::new(req.x.field.clone(), COUNT_DIMENSION),
        data,
    )
    .named(req.x.display_name());

    let extent = extent_of(bins.iter().map(|b| b.count as f64));
    SeriesSet { categories: Some(categories), series: vec![series], extent }
}

fn boxplot_series(req: &SeriesRequest<'_>, rows: &[&Row]) -> SeriesSet {
    let groups = group_values(rows, &req.x.field, &req.y.field);

    let mut categories = Vec::new();
    let mut boxes = Vec::new();
    let mut outliers = Vec::new();
    let mut bounds = Vec::new();

    for (category, values) in &groups {
        let Some(summary) = stats::box_summary(values) else { continue };
        boxes.push(json!([
            category,
            summary.lower_whisker,
            summary.q1,
            summary.median,
            summary.q3,
            summary.upper_whisker
        ]));
        for &o in &summary.outliers {
            outliers.push(json!([category, o]));
            bounds.push(o);
        }
        bounds.push(summary.lower_whisker);
        bounds.push(summary.upper_whisker);
        categories.push(category.clone());
    }

    let mut dimensions = vec![req.x.field.clone()];
    dimensions.extend(BOX_DIMENSIONS.iter().map(|d| d.to_string()));
    let encode = Encode {
        x: OneOrMany::One(req.x.field.clone()),
        y: OneOrMany::Many(BOX_DIMENSIONS.iter().map(|d| d.to_string()).collect()),
    };
    let mut series = vec![Series::new(SeriesType::Boxplot, dimensions, encode, boxes).named(req.y.display_name())];

    if !outliers.is_empty() {
        series.push(xy_series(req, SeriesType::Scatter, outliers).named(OUTLIER_NAME));
    }

    SeriesSet { categories: Some(categories), series, extent: extent_of(bounds) }
}

fn violin_series(req: &SeriesRequest<'_>, rows: &[&Row]) -> SeriesSet {
    let groups = group_values(rows, &req.x.field, &req.y.field);

    let mut categories = Vec::new();
    let mut data = Vec::new();
    let mut bounds = Vec::new();

    for (category, values) in &groups {
        if values.is_empty() {
            continue;
        }
        let bandwidth = stats::silverman_bandwidth(values);
        let (grid, density) = stats::kde(values, bandwidth, VIOLIN_GRID_POINTS);
        for (y, d) in grid.iter().zip(&density) {
            data.push(json!([category, y, d]));
        }
        bounds.extend(grid);
        categories.push(category.clone());
    }

    let mut series = Series::new(
        SeriesType::Custom,
        vec![req.x.field.clone(), req.y.field.clone(), "density".to_string()],
        Encode::new(req.x.field.clone(), req.y.field.clone()),
        data,
    )
    .named(req.y.display_name());
    series.render_item = Some("violin".to_string());

    SeriesSet { categories: Some(categories), series: vec![series], extent: extent_of(bounds) }
}
