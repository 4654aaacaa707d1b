//! Per-category dispersion and the error-bar overlay.
//!
//! This path builds its own axes: x is always a category axis carrying the
//! explicit category order, y is always a value axis. Orientation is not
//! applied here.

use crate::axis::AxisPair;
use crate::data::Row;
use crate::ir::{Axis, Encode, ItemStyle, OneOrMany, Series, SeriesType};
use crate::parser::ast::{ChartType, Encoding, ErrorBar, ErrorBarKind};
use crate::series::group_values;
use crate::stats;
use serde_json::{json, Value};
use tracing::debug;

pub const OVERLAY_NAME: &str = "error";
pub const OVERLAY_RENDER_ITEM: &str = "errorBar";
const OVERLAY_COLOR: &str = "#333333";
const OVERLAY_Z: u32 = 10;

/// Aggregate and whisker extent of one category
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBarPoint {
    pub category: String,
    pub center: f64,
    pub dispersion: f64,
    pub low: f64,
    pub high: f64,
    pub n: usize,
}

/// Dispersion statistic for one category's values
pub fn dispersion(values: &[f64], kind: ErrorBarKind, confidence_percent: f64) -> f64 {
    match kind {
        ErrorBarKind::Stderr => stats::std_error(values),
        ErrorBarKind::Stdev => stats::sample_std_dev(values),
        ErrorBarKind::Ci => stats::ci_half_width(values, confidence_percent),
        ErrorBarKind::Iqr => stats::iqr(values),
    }
}

/// `None` for a category with no numeric values
pub fn error_bar_point(category: &str, values: &[f64], spec: &ErrorBar) -> Option<ErrorBarPoint> {
    let center = stats::mean(values)?;
    let d = dispersion(values, spec.kind, spec.confidence_level());

    let (low, high) = match spec.kind {
        // IQR whiskers span the quartiles rather than mean +/- IQR
        ErrorBarKind::Iqr => {
            let s = stats::sorted(values);
            (stats::percentile(&s, 0.25), stats::percentile(&s, 0.75))
        }
        _ => (center - d, center + d),
    };

    Some(ErrorBarPoint {
        category: category.to_string(),
        center,
        dispersion: d,
        low,
        high,
        n: values.len(),
    })
}

/// Axes, primary aggregate series and overlay series
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBarChart {
    pub axes: AxisPair,
    pub series: Vec<Series>,
    pub points: Vec<ErrorBarPoint>,
}

fn primary_type(chart_type: ChartType) -> SeriesType {
    match chart_type {
        ChartType::Line | ChartType::Area => SeriesType::Line,
        ChartType::ErrorBar | ChartType::Scatter => SeriesType::Scatter,
        _ => SeriesType::Bar,
    }
}

pub fn build_error_bar_chart(
    chart_type: ChartType,
    encoding: &Encoding,
    spec: &ErrorBar,
    rows: &[&Row],
) -> ErrorBarChart {
    let x_field = encoding.x.field.as_str();
    let y_field = encoding.y.field.as_str();
    let groups = group_values(rows, x_field, y_field);

    let categories: Vec<String> = groups.iter().map(|(c, _)| c.clone()).collect();
    let points: Vec<ErrorBarPoint> = groups
        .iter()
        .filter_map(|(c, v)| error_bar_point(c, v, spec))
        .collect();

    let primary_data: Vec<Value> = groups
        .iter()
        .map(|(c, v)| match stats::mean(v) {
            Some(m) => json!([c, m]),
            None => json!([c, Value::Null]),
        })
        .collect();

    let primary = Series::new(
        primary_type(chart_type),
        vec![x_field.to_string(), y_field.to_string()],
        Encode::new(x_field, y_field),
        primary_data,
    )
    .named(encoding.y.display_name());

    let mut overlay = Series::new(
        SeriesType::Custom,
        vec![x_field.to_string(), "low".to_string(), "high".to_string()],
        Encode {
            x: OneOrMany::One(x_field.to_string()),
            y: OneOrMany::Many(vec!["low".to_string(), "high".to_string()]),
        },
        points.iter().map(|p| json!([p.category, p.low, p.high])).collect(),
    )
    .named(OVERLAY_NAME);
    overlay.render_item = Some(OVERLAY_RENDER_ITEM.to_string());
    overlay.z = Some(OVERLAY_Z);
    overlay.item_style = Some(ItemStyle {
        color: Some(OVERLAY_COLOR.to_string()),
        opacity: None,
    });

    debug!(
        kind = ?spec.kind,
        categories = categories.len(),
        with_bars = points.len(),
        "error bars computed"
    );

    ErrorBarChart {
        axes: AxisPair {
            x: Axis::category(encoding.x.display_name(), categories),
            y: Axis::value(encoding.y.display_name()),
        },
        series: vec![primary, overlay],
        points,
    }
}
