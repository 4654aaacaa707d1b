//! Compiler: ChartSpec + rows -> RenderConfig
//!
//! Pipeline:
//!   1. validate (structural errors block everything)
//!   2. resolve style (font + palette)
//!   3. look up capabilities, resolve feature precedence
//!   4. build axes/series on exactly one path: error bar, facet, or base (+y2)
//!   5. orientation swap (base and facet paths only)
//!   6. data labels, graphics, legend, tooltip
//!   7. push the resolved font through the whole config

use crate::annotation::{apply_data_labels, build_graphics};
use crate::axis::{apply_orientation, base_axes};
use crate::data::{PlotData, Row};
use crate::dual_axis::build_dual_axis;
use crate::error_bar::build_error_bar_chart;
use crate::facet::build_facet_chart;
use crate::ir::{
    AxisPointer, AxisPointerType, Axis, Graphic, Grid, Legend, OneOrMany, RenderConfig, Series,
    TextStyle, Tooltip, TooltipTrigger,
};
use crate::precedence::{self, requested_features, Feature, Resolution};
use crate::series::{build_series, SeriesRequest};
use crate::theme_resolve::{apply_text_style, ResolvedStyle};
use crate::parser::ast::{ChartSpec, ChartType, ErrorBar, ErrorBarKind, TrendlineKind};
use crate::validate::{validate, ValidationErrors};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

/// Error bar used when the chart type asks for one without saying which
const DEFAULT_ERROR_BAR: ErrorBar = ErrorBar { kind: ErrorBarKind::Stderr, value: None };

/// Axes, grids and series produced by one build path
struct Layout {
    x_axis: OneOrMany<Axis>,
    y_axis: OneOrMany<Axis>,
    grid: Option<Vec<Grid>>,
    series: Vec<Series>,
    graphics: Vec<Graphic>,
}

/// Compile a spec against a row set. Pure: no I/O, no shared state.
pub fn compile(spec: &ChartSpec, data: &PlotData) -> Result<RenderConfig, CompileError> {
    validate(spec)?;
    debug!(chart_type = spec.chart_type.as_str(), rows = data.len(), "spec validated");

    let style = spec.style.resolve();
    let caps = spec.chart_type.capabilities();
    let resolution = precedence::resolve(&requested_features(spec, &caps));
    debug!(active = ?resolution.active, suppressed = ?resolution.suppressed, "features resolved");

    let rows: Vec<&Row> = data.rows.iter().collect();
    let horizontal = resolution.is_active(Feature::Horizontal);

    let mut layout = if resolution.is_active(Feature::ErrorBar) {
        error_bar_layout(spec, &rows)
    } else if let Some(facet) = spec.facet.as_ref().filter(|_| resolution.is_active(Feature::Facet)) {
        let chart = build_facet_chart(spec.chart_type, &spec.encoding, facet, &rows, horizontal, wants_trendline(spec));
        Layout {
            x_axis: OneOrMany::Many(chart.x_axes),
            y_axis: OneOrMany::Many(chart.y_axes),
            grid: Some(chart.grids),
            series: chart.series,
            graphics: chart.titles,
        }
    } else {
        base_layout(spec, &rows, &resolution, &style)
    };
    debug!(series = layout.series.len(), "series built");

    if style.show_data_labels {
        apply_data_labels(&mut layout.series, horizontal);
    }

    let mut graphics = layout.graphics;
    graphics.extend(build_graphics(&spec.annotations));

    let legend = build_legend(&resolution, &layout.series);
    let tooltip = build_tooltip(spec.chart_type, &resolution);

    let mut config = RenderConfig {
        x_axis: layout.x_axis,
        y_axis: layout.y_axis,
        grid: layout.grid,
        series: layout.series,
        graphic: (!graphics.is_empty()).then_some(graphics),
        legend,
        tooltip,
        color: style.palette.clone(),
        text_style: TextStyle::default(),
    };
    apply_text_style(&mut config, &style);

    debug!(
        x_axes = config.x_axis.len(),
        y_axes = config.y_axis.len(),
        graphics = config.graphic.as_ref().map_or(0, Vec::len),
        "compiled"
    );
    Ok(config)
}

fn wants_trendline(spec: &ChartSpec) -> bool {
    spec.chart_type == ChartType::Scatter
        && matches!(spec.trendline.as_ref().map(|t| t.kind), Some(TrendlineKind::Linear))
}

fn error_bar_layout(spec: &ChartSpec, rows: &[&Row]) -> Layout {
    let error_bar = spec.error_bar.as_ref().unwrap_or(&DEFAULT_ERROR_BAR);
    let chart = build_error_bar_chart(spec.chart_type, &spec.encoding, error_bar, rows);
    Layout {
        x_axis: OneOrMany::One(chart.axes.x),
        y_axis: OneOrMany::One(chart.axes.y),
        grid: None,
        series: chart.series,
        graphics: Vec::new(),
    }
}

fn base_layout(spec: &ChartSpec, rows: &[&Row], resolution: &Resolution, style: &ResolvedStyle) -> Layout {
    let request = SeriesRequest {
        chart_type: spec.chart_type,
        x: &spec.encoding.x,
        y: &spec.encoding.y,
        group: spec
            .encoding
            .color
            .as_ref()
            .filter(|_| resolution.is_active(Feature::ColorGroup)),
        trendline: wants_trendline(spec),
    };
    let mut set = build_series(&request, rows);
    let mut axes = base_axes(spec.chart_type, &set, &spec.encoding);

    if let Some(y2) = spec.encoding.y2.as_ref().filter(|_| resolution.is_active(Feature::DualAxis)) {
        let categories = set.categories.clone().unwrap_or_default();
        let dual = build_dual_axis(axes.y, &spec.encoding.x, y2, &categories, rows, &style.palette);
        set.series.push(dual.series);
        return Layout {
            x_axis: OneOrMany::One(axes.x),
            y_axis: OneOrMany::Many(dual.y_axes),
            grid: None,
            series: set.series,
            graphics: Vec::new(),
        };
    }

    if resolution.is_active(Feature::Horizontal) {
        apply_orientation(&mut axes, &mut set.series);
    }

    Layout {
        x_axis: OneOrMany::One(axes.x),
        y_axis: OneOrMany::One(axes.y),
        grid: None,
        series: set.series,
        graphics: Vec::new(),
    }
}

fn build_legend(resolution: &Resolution, series: &[Series]) -> Legend {
    let multi_series = resolution.is_active(Feature::ColorGroup) || resolution.is_active(Feature::DualAxis);
    if resolution.is_active(Feature::Facet) || !multi_series {
        return Legend::default();
    }
    Legend {
        show: true,
        data: Some(series.iter().filter_map(|s| s.name.clone()).collect()),
        text_style: TextStyle::default(),
    }
}

fn build_tooltip(chart_type: ChartType, resolution: &Resolution) -> Tooltip {
    let trigger = match chart_type {
        ChartType::Scatter | ChartType::Boxplot | ChartType::Violin => TooltipTrigger::Item,
        _ => TooltipTrigger::Axis,
    };
    let axis_pointer = if resolution.is_active(Feature::DualAxis) {
        Some(AxisPointer { pointer_type: AxisPointerType::Cross })
    } else if chart_type.is_bar() && trigger == TooltipTrigger::Axis {
        Some(AxisPointer { pointer_type: AxisPointerType::Shadow })
    } else {
        None
    };
    Tooltip { trigger, axis_pointer, text_style: TextStyle::default() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AxisPosition, AxisType};
    use crate::validate::Violation;
    use serde_json::json;

    fn spec(v: serde_json::Value) -> ChartSpec {
        serde_json::from_value(v).unwrap()
    }

    fn columns() -> serde_json::Value {
        json!({ "columns": [
            { "name": "region", "semanticType": "nominal" },
            { "name": "quarter", "semanticType": "nominal" },
            { "name": "sales", "semanticType": "quantitative" },
            { "name": "profit", "semanticType": "quantitative" }
        ]})
    }

    fn rows() -> PlotData {
        PlotData::from_json(&json!([
            { "region": "North", "quarter": "Q1", "sales": 10, "profit": 1 },
            { "region": "South", "quarter": "Q1", "sales": 20, "profit": 3 },
            { "region": "North", "quarter": "Q2", "sales": 30, "profit": 2 }
        ]))
        .unwrap()
    }

    #[test]
    fn test_invalid_spec_is_rejected_whole() {
        let s = spec(json!({
            "chartType": "bar",
            "data": columns(),
            "encoding": {
                "x": { "field": "nope", "type": "nominal" },
                "y": { "field": "sales", "type": "quantitative" },
                "y2": { "field": "region", "type": "nominal" }
            }
        }));
        let err = compile(&s, &rows()).unwrap_err();
        let CompileError::Invalid(errors) = err;
        assert!(errors.violations().len() >= 2);
        assert!(errors.violations().iter().any(|v| matches!(v, Violation::Y2NotQuantitative { .. })));
    }

    #[test]
    fn test_y2_wins_over_color() {
        let s = spec(json!({
            "chartType": "bar",
            "data": columns(),
            "encoding": {
                "x": { "field": "region", "type": "nominal" },
                "y": { "field": "sales", "type": "quantitative" },
                "y2": { "field": "profit", "type": "quantitative" },
                "color": { "field": "quarter", "type": "nominal" }
            }
        }));
        let config = compile(&s, &rows()).unwrap();
        assert_eq!(config.y_axis.len(), 2);
        assert_eq!(config.y_axis.as_slice()[1].position, Some(AxisPosition::Right));
        assert_eq!(config.series.len(), 2);
        assert_eq!(
            config.tooltip.axis_pointer.as_ref().map(|p| p.pointer_type),
            Some(AxisPointerType::Cross)
        );
        assert!(config.legend.show);
    }

    #[test]
    fn test_horizontal_drops_y2() {
        let s = spec(json!({
            "chartType": "bar",
            "data": columns(),
            "orientation": "horizontal",
            "encoding": {
                "x": { "field": "region", "type": "nominal" },
                "y": { "field": "sales", "type": "quantitative" },
                "y2": { "field": "profit", "type": "quantitative" }
            }
        }));
        let config = compile(&s, &rows()).unwrap();
        assert!(!config.y_axis.is_many());
        assert_eq!(config.x_axis.as_slice()[0].axis_type, AxisType::Value);
        assert_eq!(config.series.len(), 1);
    }

    #[test]
    fn test_unsupported_feature_is_ignored() {
        // grouped-bar cannot facet
        let s = spec(json!({
            "chartType": "grouped-bar",
            "data": columns(),
            "encoding": {
                "x": { "field": "region", "type": "nominal" },
                "y": { "field": "sales", "type": "quantitative" },
                "color": { "field": "quarter", "type": "nominal" }
            },
            "facet": { "field": "quarter" }
        }));
        let config = compile(&s, &rows()).unwrap();
        assert!(config.grid.is_none());
        assert_eq!(config.series.len(), 2);
    }

    #[test]
    fn test_error_bar_chart_type_defaults_to_stderr() {
        let s = spec(json!({
            "chartType": "error-bar",
            "data": columns(),
            "encoding": {
                "x": { "field": "region", "type": "nominal" },
                "y": { "field": "sales", "type": "quantitative" }
            }
        }));
        let config = compile(&s, &rows()).unwrap();
        assert_eq!(config.series.len(), 2);
        // North: mean 20, stderr of {10, 30} = 10
        let north = &config.series[1].data[0];
        assert_eq!(north[0], "North");
        assert!((north[1].as_f64().unwrap() - 10.0).abs() < 1e-9);
        assert!((north[2].as_f64().unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_style_reaches_everything() {
        let s = spec(json!({
            "chartType": "bar",
            "data": columns(),
            "encoding": {
                "x": { "field": "region", "type": "nominal" },
                "y": { "field": "sales", "type": "quantitative" }
            },
            "style": { "preset": "nature", "showDataLabels": true },
            "annotations": [{ "type": "text", "text": "hi" }]
        }));
        let config = compile(&s, &rows()).unwrap();
        assert_eq!(config.text_style.font_family.as_deref(), Some("Arial"));
        assert_eq!(config.legend.text_style.font_family.as_deref(), Some("Arial"));
        assert_eq!(config.tooltip.text_style.font_size, Some(10.0));
        let label = config.series[0].label.as_ref().unwrap();
        assert_eq!(label.font_family.as_deref(), Some("Arial"));
        let graphics = config.graphic.as_ref().unwrap();
        assert!(matches!(&graphics[0], Graphic::Text { style, .. } if style.font_family.as_deref() == Some("Arial")));
    }

    #[test]
    fn test_partial_annotations_compile() {
        let s = spec(json!({
            "chartType": "bar",
            "data": columns(),
            "encoding": {
                "x": { "field": "region", "type": "nominal" },
                "y": { "field": "sales", "type": "quantitative" }
            },
            "annotations": [
                { "type": "text" },
                { "type": "line", "x": 0, "y": 0 },
                { "type": "rect", "x": 0, "y": 0 }
            ]
        }));
        let config = compile(&s, &rows()).unwrap();
        assert_eq!(config.graphic.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_unknown_preset_compiles_with_defaults() {
        let build = |preset: &str| {
            compile(
                &spec(json!({
                    "chartType": "bar",
                    "data": columns(),
                    "encoding": {
                        "x": { "field": "region", "type": "nominal" },
                        "y": { "field": "sales", "type": "quantitative" }
                    },
                    "style": { "preset": preset }
                })),
                &rows(),
            )
            .unwrap()
        };
        let unknown = build("neon");
        let default = build("default");
        assert_eq!(unknown.color, default.color);
        assert_eq!(unknown.text_style.font_family, default.text_style.font_family);
    }
}
