//! Secondary value axis with its overlay line series.

use crate::data::Row;
use crate::ir::{Axis, AxisPosition, Encode, ItemStyle, LineStyle, Series, SeriesType};
use crate::palette;
use crate::parser::ast::FieldDef;
use crate::series::{category_points, group_values, means_for};

/// Palette slot used for the overlay series
pub const SECONDARY_COLOR_SLOT: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct DualAxis {
    /// `[primary, secondary]`, primary on the left
    pub y_axes: Vec<Axis>,
    pub series: Series,
}

/// Build the secondary axis and its series. `categories` is the primary
/// category order; the overlay is aligned to it with `null` gaps.
pub fn build_dual_axis(
    primary_y: Axis,
    x: &FieldDef,
    y2: &FieldDef,
    categories: &[String],
    rows: &[&Row],
    colors: &[String],
) -> DualAxis {
    let mut primary = primary_y;
    primary.position = Some(AxisPosition::Left);

    let mut secondary = Axis::value(y2.display_name());
    secondary.position = Some(AxisPosition::Right);

    let means = means_for(categories, &group_values(rows, &x.field, &y2.field));
    let mut series = Series::new(
        SeriesType::Line,
        vec![x.field.clone(), y2.field.clone()],
        Encode::new(x.field.clone(), y2.field.clone()),
        category_points(categories, &means),
    )
    .named(y2.display_name());
    series.y_axis_index = Some(1);

    if let Some(color) = palette::pick(colors, SECONDARY_COLOR_SLOT) {
        series.item_style = Some(ItemStyle { color: Some(color.to_string()), opacity: None });
        series.line_style = Some(LineStyle { color: Some(color.to_string()), ..Default::default() });
    }

    DualAxis { y_axes: vec![primary, secondary], series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::SemanticType;
    use serde_json::json;

    fn field(name: &str, ty: SemanticType) -> FieldDef {
        FieldDef { field: name.into(), field_type: ty, title: None }
    }

    #[test]
    fn test_secondary_axis_on_the_right() {
        let data: Vec<Row> = json!([
            { "month": "Jan", "temp": 3, "rain": 50 },
            { "month": "Feb", "temp": 5, "rain": 40 },
            { "month": "Feb", "temp": 5, "rain": 60 }
        ])
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_object().unwrap().clone())
        .collect();
        let refs: Vec<&Row> = data.iter().collect();
        let categories = vec!["Jan".to_string(), "Feb".to_string(), "Mar".to_string()];
        let colors = vec!["#111111".to_string(), "#222222".to_string()];

        let dual = build_dual_axis(
            Axis::value("temp"),
            &field("month", SemanticType::Ordinal),
            &field("rain", SemanticType::Quantitative),
            &categories,
            &refs,
            &colors,
        );

        assert_eq!(dual.y_axes[0].position, Some(AxisPosition::Left));
        assert_eq!(dual.y_axes[1].position, Some(AxisPosition::Right));
        assert_eq!(dual.y_axes[1].name.as_deref(), Some("rain"));
        assert_eq!(dual.series.series_type, SeriesType::Line);
        assert_eq!(dual.series.y_axis_index, Some(1));
        assert_eq!(dual.series.data[1], json!(["Feb", 50.0]));
        assert_eq!(dual.series.data[2], json!(["Mar", null]));
        assert_eq!(
            dual.series.item_style.as_ref().and_then(|s| s.color.as_deref()),
            Some("#222222")
        );
    }

    #[test]
    fn test_single_colour_palette_wraps() {
        let colors = vec!["#111111".to_string()];
        let dual = build_dual_axis(
            Axis::value("a"),
            &field("x", SemanticType::Nominal),
            &field("b", SemanticType::Quantitative),
            &[],
            &[],
            &colors,
        );
        assert_eq!(
            dual.series.line_style.as_ref().and_then(|s| s.color.as_deref()),
            Some("#111111")
        );
        assert!(dual.series.data.is_empty());
    }
}
