use chartspec::palette;
use chartspec::{compile, ChartSpec, PlotData, RenderConfig};
use serde_json::{json, Value};
use std::process::Command;

fn columns() -> Value {
    json!({ "columns": [
        { "name": "region", "semanticType": "nominal" },
        { "name": "product", "semanticType": "nominal" },
        { "name": "team", "semanticType": "nominal" },
        { "name": "sales", "semanticType": "quantitative" },
        { "name": "profit", "semanticType": "quantitative" }
    ]})
}

fn bar_spec(extra: Value) -> ChartSpec {
    let mut spec = json!({
        "chartType": "bar",
        "data": columns(),
        "encoding": {
            "x": { "field": "region", "type": "nominal" },
            "y": { "field": "sales", "type": "quantitative" }
        }
    });
    if let (Some(base), Some(extra)) = (spec.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(spec).expect("spec should deserialize")
}

fn sales_rows() -> PlotData {
    PlotData::from_json(&json!([
        { "region": "North", "product": "A", "team": "red",  "sales": 10, "profit": 2 },
        { "region": "South", "product": "A", "team": "blue", "sales": 20, "profit": 5 },
        { "region": "East",  "product": "B", "team": "red",  "sales": 30, "profit": 1 },
        { "region": "North", "product": "B", "team": "blue", "sales": 50, "profit": 4 }
    ]))
    .unwrap()
}

fn to_json(config: &RenderConfig) -> Value {
    serde_json::to_value(config).unwrap()
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

#[test]
fn test_scheme_colors_pass_through() {
    let spec = bar_spec(json!({ "style": { "scheme": "Set2" } }));
    let rows = PlotData::from_json(&json!([
        { "region": "North", "sales": 1 },
        { "region": "South", "sales": 2 },
        { "region": "East", "sales": 3 }
    ]))
    .unwrap();

    let out = to_json(&compile(&spec, &rows).unwrap());
    let expected = palette::lookup("Set2").unwrap().to_vec();
    assert_eq!(out["color"], json!(expected));
}

#[test]
fn test_horizontal_bar_with_labels() {
    let spec = bar_spec(json!({
        "orientation": "horizontal",
        "style": { "showDataLabels": true }
    }));
    let out = to_json(&compile(&spec, &sales_rows()).unwrap());

    assert_eq!(out["xAxis"]["type"], "value");
    assert_eq!(out["yAxis"]["type"], "category");
    assert_eq!(out["yAxis"]["data"], json!(["North", "South", "East"]));
    assert_eq!(out["series"][0]["label"]["position"], "right");
    assert_eq!(out["series"][0]["encode"]["y"], "region");
    assert_eq!(out["series"][0]["encode"]["x"], "sales");
}

#[test]
fn test_error_bar_ignores_orientation() {
    let spec = bar_spec(json!({
        "errorBar": { "type": "stdev" },
        "orientation": "horizontal"
    }));
    let out = to_json(&compile(&spec, &sales_rows()).unwrap());

    assert_eq!(out["xAxis"]["type"], "category");
    assert_eq!(out["yAxis"]["type"], "value");
    assert_eq!(out["series"].as_array().unwrap().len(), 2);
    assert_eq!(out["series"][1]["type"], "custom");
}

#[test]
fn test_facet_averages_duplicates() {
    let spec = bar_spec(json!({
        "encoding": {
            "x": { "field": "product", "type": "nominal" },
            "y": { "field": "sales", "type": "quantitative" }
        },
        "facet": { "field": "region", "showTitle": true }
    }));
    let rows = PlotData::from_json(&json!([
        { "region": "North", "product": "A", "sales": 10 },
        { "region": "North", "product": "A", "sales": 20 },
        { "region": "South", "product": "A", "sales": 5 },
        { "region": "East",  "product": "B", "sales": 7 },
        { "region": "North", "product": "B", "sales": 1 }
    ]))
    .unwrap();

    let out = to_json(&compile(&spec, &rows).unwrap());
    assert_eq!(out["grid"].as_array().unwrap().len(), 3);
    assert_eq!(out["series"].as_array().unwrap().len(), 3);
    assert_eq!(out["series"][0]["data"][0], json!(["A", 15.0]));
    assert_eq!(out["legend"]["show"], false);

    let titles: Vec<&str> = out["graphic"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["style"]["text"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["North", "South", "East"]);
}

#[test]
fn test_three_annotations_in_order() {
    let spec = bar_spec(json!({
        "annotations": [
            { "type": "text", "x": 40, "y": "10%", "text": "note" },
            { "type": "line", "x": 0, "y": 0, "x2": 100, "y2": 50, "strokeDash": [4, 2] },
            { "type": "rect", "x": 10, "y": 20, "x2": 60, "y2": 90, "color": "#ff0000" }
        ]
    }));
    let out = to_json(&compile(&spec, &sales_rows()).unwrap());
    let graphics = out["graphic"].as_array().unwrap();

    assert_eq!(graphics.len(), 3);
    assert_eq!(graphics[0]["type"], "text");
    assert_eq!(graphics[1]["type"], "line");
    assert_eq!(graphics[1]["style"]["lineDash"], json!([4.0, 2.0]));
    assert_eq!(graphics[2]["type"], "rect");
    assert_eq!(graphics[2]["shape"]["width"], json!(50.0));
    assert_eq!(graphics[2]["shape"]["height"], json!(70.0));
    assert_eq!(graphics[2]["style"]["fill"], "transparent");
    assert_eq!(graphics[2]["style"]["stroke"], "#ff0000");
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_color_priority_chain() {
    let explicit = bar_spec(json!({ "style": { "colors": ["#010101", "#020202"], "scheme": "Dark2" } }));
    let out = compile(&explicit, &sales_rows()).unwrap();
    assert_eq!(out.color, vec!["#010101".to_string(), "#020202".to_string()]);

    let unknown = bar_spec(json!({ "style": { "preset": "apa", "scheme": "NotAPalette" } }));
    let preset_only = bar_spec(json!({ "style": { "preset": "apa" } }));
    assert_eq!(
        compile(&unknown, &sales_rows()).unwrap().color,
        compile(&preset_only, &sales_rows()).unwrap().color
    );
}

#[test]
fn test_orientation_swaps_relative_to_vertical() {
    let vertical = to_json(&compile(&bar_spec(json!({})), &sales_rows()).unwrap());
    let horizontal = to_json(&compile(&bar_spec(json!({ "orientation": "horizontal" })), &sales_rows()).unwrap());

    assert_eq!(vertical["xAxis"]["type"], horizontal["yAxis"]["type"]);
    assert_eq!(vertical["yAxis"]["type"], horizontal["xAxis"]["type"]);
    assert_eq!(vertical["series"][0]["encode"]["x"], horizontal["series"][0]["encode"]["y"]);
    assert_eq!(vertical["series"][0]["encode"]["y"], horizontal["series"][0]["encode"]["x"]);
}

#[test]
fn test_error_bar_axes_for_every_kind() {
    for kind in ["stderr", "stdev", "ci", "iqr"] {
        for orientation in ["vertical", "horizontal"] {
            let spec = bar_spec(json!({
                "errorBar": { "type": kind, "value": 90 },
                "orientation": orientation
            }));
            let out = to_json(&compile(&spec, &sales_rows()).unwrap());
            assert_eq!(out["xAxis"]["type"], "category", "{} {}", kind, orientation);
            assert_eq!(out["yAxis"]["type"], "value", "{} {}", kind, orientation);
        }
    }
}

#[test]
fn test_facet_beats_y2() {
    let spec = bar_spec(json!({
        "encoding": {
            "x": { "field": "product", "type": "nominal" },
            "y": { "field": "sales", "type": "quantitative" },
            "y2": { "field": "profit", "type": "quantitative" }
        },
        "facet": { "field": "region" }
    }));
    let out = to_json(&compile(&spec, &sales_rows()).unwrap());

    for axis in out["yAxis"].as_array().unwrap() {
        assert_ne!(axis.get("position"), Some(&json!("right")));
    }
}

#[test]
fn test_y2_and_color_exactly_one_wins() {
    let spec = bar_spec(json!({
        "encoding": {
            "x": { "field": "region", "type": "nominal" },
            "y": { "field": "sales", "type": "quantitative" },
            "y2": { "field": "profit", "type": "quantitative" },
            "color": { "field": "team", "type": "nominal" }
        }
    }));
    let out = compile(&spec, &sales_rows()).unwrap();

    // y2 kept: primary + overlay, no per-team series
    assert!(out.y_axis.is_many());
    let names: Vec<&str> = out.series.iter().filter_map(|s| s.name.as_deref()).collect();
    assert_eq!(names, vec!["sales", "profit"]);
}

#[test]
fn test_grouped_labels_on_every_series() {
    let spec: ChartSpec = serde_json::from_value(json!({
        "chartType": "grouped-bar",
        "data": columns(),
        "encoding": {
            "x": { "field": "region", "type": "nominal" },
            "y": { "field": "sales", "type": "quantitative" },
            "color": { "field": "team", "type": "nominal" }
        },
        "style": { "showDataLabels": true }
    }))
    .unwrap();
    let out = to_json(&compile(&spec, &sales_rows()).unwrap());
    let series = out["series"].as_array().unwrap();

    assert_eq!(series.len(), 2);
    for s in series {
        assert_eq!(s["label"]["show"], true);
        assert_eq!(s["label"]["position"], "top");
    }
    assert_eq!(out["legend"]["data"], json!(["red", "blue"]));
}

#[test]
fn test_invalid_spec_lists_every_violation() {
    let spec = bar_spec(json!({
        "encoding": {
            "x": { "field": "region", "type": "nominal" },
            "y": { "field": "region", "type": "quantitative" },
            "y2": { "field": "missing", "type": "nominal" }
        },
        "facet": { "field": "sales", "ncol": 0 }
    }));
    let err = compile(&spec, &sales_rows()).unwrap_err();
    let chartspec::CompileError::Invalid(errors) = err;
    // same field, unknown y2, y2 not quantitative, facet not categorical, ncol out of range
    assert_eq!(errors.violations().len(), 5);
}

#[test]
fn test_empty_rows_still_compile() {
    for chart_type in ["bar", "line", "area", "scatter", "histogram", "boxplot", "violin", "error-bar"] {
        let spec: ChartSpec = serde_json::from_value(json!({
            "chartType": chart_type,
            "data": columns(),
            "encoding": {
                "x": { "field": "region", "type": "nominal" },
                "y": { "field": "sales", "type": "quantitative" }
            }
        }))
        .unwrap();
        assert!(compile(&spec, &PlotData::default()).is_ok(), "{}", chart_type);
    }
}

// =============================================================================
// CLI
// =============================================================================

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_chartspec"))
        .args(args)
        .output()
        .expect("Failed to spawn chartspec")
}

#[test]
fn test_cli_compiles_csv() {
    let output = run_cli(&["--spec", "tests/data/bar_spec.json", "--data", "tests/data/sales.csv"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let out: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(out["xAxis"]["data"], json!(["North", "South", "East"]));
    assert_eq!(out["yAxis"]["name"], "Sales");
    assert_eq!(out["color"][0], "#66c2a5");
    assert_eq!(out["textStyle"]["fontFamily"], "Helvetica");
    assert_eq!(out["series"][0]["data"][0], json!(["North", 130.0]));
}

#[test]
fn test_cli_compiles_json_rows() {
    let output = run_cli(&["--spec", "tests/data/bar_spec.json", "--data", "tests/data/rows.json", "--pretty"]);
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains('\n'));
    let out: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(out["graphic"][0]["style"]["text"], "Regional sales");
}

#[test]
fn test_cli_reports_violations() {
    let output = run_cli(&["--spec", "tests/data/invalid_spec.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rainfall"));
    assert!(stderr.lines().filter(|l| l.trim_start().starts_with("- ")).count() >= 4);
}

#[test]
fn test_cli_validate_only() {
    let output = run_cli(&["--spec", "tests/data/bar_spec.json", "--validate-only"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
