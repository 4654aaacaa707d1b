//! Output model: the declarative configuration handed to the rendering engine.
//!
//! Field names serialize in camelCase. Optional parts are omitted from the
//! JSON rather than written as `null`.

use crate::parser::ast::Coord;
use serde::Serialize;
use serde_json::Value;

/// A single object or an array of them (`xAxis`, `yAxis`)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            OneOrMany::One(item) => std::slice::from_mut(item),
            OneOrMany::Many(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }
}

/// The compiled chart configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub x_axis: OneOrMany<Axis>,
    pub y_axis: OneOrMany<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Vec<Grid>>,
    pub series: Vec<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphic: Option<Vec<Graphic>>,
    pub legend: Legend,
    pub tooltip: Tooltip,
    pub color: Vec<String>,
    pub text_style: TextStyle,
}

/// Font settings shared by every text-bearing element
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Category,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(rename = "type")]
    pub axis_type: AxisType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ordered category list, only on category axes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<AxisPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Value axis does not have to contain zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<bool>,
    pub axis_label: TextStyle,
    pub name_text_style: TextStyle,
}

impl Axis {
    pub fn category(name: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            axis_type: AxisType::Category,
            name: Some(name.into()),
            data: Some(categories),
            position: None,
            grid_index: None,
            min: None,
            max: None,
            scale: None,
            axis_label: TextStyle::default(),
            name_text_style: TextStyle::default(),
        }
    }

    pub fn value(name: impl Into<String>) -> Self {
        Self {
            axis_type: AxisType::Value,
            name: Some(name.into()),
            data: None,
            position: None,
            grid_index: None,
            min: None,
            max: None,
            scale: None,
            axis_label: TextStyle::default(),
            name_text_style: TextStyle::default(),
        }
    }

    pub fn is_category(&self) -> bool {
        self.axis_type == AxisType::Category
    }
}

/// One facet cell, in percent of the chart area
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub left: String,
    pub top: String,
    pub width: String,
    pub height: String,
    pub contain_label: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Bar,
    Line,
    Scatter,
    Boxplot,
    Custom,
}

/// Dimension names driving each axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Encode {
    pub x: OneOrMany<String>,
    pub y: OneOrMany<String>,
}

impl Encode {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: OneOrMany::One(x.into()),
            y: OneOrMany::One(y.into()),
        }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.x, &mut self.y);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Top,
    Right,
    Inside,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub show: bool,
    pub position: LabelPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub dash: Option<Vec<f64>>,
}

/// Serializes as `{}`: fill under the line with the series colour
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AreaStyle {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[serde(rename = "type")]
    pub series_type: SeriesType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub dimensions: Vec<String>,
    pub encode: Encode,
    pub data: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_style: Option<AreaStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_symbol: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    /// Drawing routine for `custom` series (`errorBar`, `violin`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<u32>,
}

impl Series {
    pub fn new(series_type: SeriesType, dimensions: Vec<String>, encode: Encode, data: Vec<Value>) -> Self {
        Self {
            series_type,
            name: None,
            dimensions,
            encode,
            data,
            x_axis_index: None,
            y_axis_index: None,
            stack: None,
            area_style: None,
            item_style: None,
            line_style: None,
            show_symbol: None,
            label: None,
            render_item: None,
            z: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Free-standing overlay element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Graphic {
    Text {
        left: Coord,
        top: Coord,
        style: GraphicStyle,
    },
    Line {
        shape: LineShape,
        style: GraphicStyle,
    },
    Rect {
        shape: RectShape,
        style: GraphicStyle,
    },
}

impl Graphic {
    pub fn kind(&self) -> &'static str {
        match self {
            Graphic::Text { .. } => "text",
            Graphic::Line { .. } => "line",
            Graphic::Rect { .. } => "rect",
        }
    }

    pub fn style_mut(&mut self) -> &mut GraphicStyle {
        match self {
            Graphic::Text { style, .. } | Graphic::Line { style, .. } | Graphic::Rect { style, .. } => style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineShape {
    pub x1: Coord,
    pub y1: Coord,
    pub x2: Coord,
    pub y2: Coord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectShape {
    pub x: Coord,
    pub y: Coord,
    pub width: Coord,
    pub height: Coord,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_dash: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub show: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
    pub text_style: TextStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipTrigger {
    Item,
    Axis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPointerType {
    Line,
    Shadow,
    Cross,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisPointer {
    #[serde(rename = "type")]
    pub pointer_type: AxisPointerType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub trigger: TooltipTrigger,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_pointer: Option<AxisPointer>,
    pub text_style: TextStyle,
}
