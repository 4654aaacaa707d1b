// Declarative chart specification: the compiler's only input

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Complete chart specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub chart_type: ChartType,
    #[serde(default)]
    pub data: DataSpec,
    pub encoding: Encoding,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub orientation: Option<Orientation>,
    #[serde(default)]
    pub error_bar: Option<ErrorBar>,
    #[serde(default)]
    pub facet: Option<Facet>,
    #[serde(default)]
    pub trendline: Option<Trendline>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Only read at export time, carried here so a spec round-trips intact.
    #[serde(default)]
    pub export_config: ExportConfig,
}

impl ChartSpec {
    pub fn is_horizontal(&self) -> bool {
        matches!(self.orientation, Some(Orientation::Horizontal))
    }

    /// Look up a column descriptor by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.data.columns.iter().find(|c| c.name == name)
    }
}

/// Closed set of chart types the compiler can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    Bar,
    GroupedBar,
    StackedBar,
    Line,
    Area,
    Scatter,
    Histogram,
    Boxplot,
    Violin,
    ErrorBar,
}

impl ChartType {
    pub const ALL: [ChartType; 10] = [
        ChartType::Bar,
        ChartType::GroupedBar,
        ChartType::StackedBar,
        ChartType::Line,
        ChartType::Area,
        ChartType::Scatter,
        ChartType::Histogram,
        ChartType::Boxplot,
        ChartType::Violin,
        ChartType::ErrorBar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::GroupedBar => "grouped-bar",
            ChartType::StackedBar => "stacked-bar",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Scatter => "scatter",
            ChartType::Histogram => "histogram",
            ChartType::Boxplot => "boxplot",
            ChartType::Violin => "violin",
            ChartType::ErrorBar => "error-bar",
        }
    }

    /// Bar variants draw from a zero baseline
    pub fn is_bar(self) -> bool {
        matches!(
            self,
            ChartType::Bar | ChartType::GroupedBar | ChartType::StackedBar | ChartType::Histogram
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Nominal,
    Ordinal,
    Quantitative,
    Temporal,
}

impl SemanticType {
    pub fn is_categorical(self) -> bool {
        matches!(self, SemanticType::Nominal | SemanticType::Ordinal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticType::Nominal => "nominal",
            SemanticType::Ordinal => "ordinal",
            SemanticType::Quantitative => "quantitative",
            SemanticType::Temporal => "temporal",
        }
    }
}

/// Dataset metadata (never the raw rows)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataSpec {
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    pub semantic_type: SemanticType,
    #[serde(default)]
    pub unique_count: usize,
    #[serde(default)]
    pub sample_values: Vec<Value>,
    #[serde(default)]
    pub has_null: bool,
}

/// Field-to-channel assignments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    pub x: FieldDef,
    pub y: FieldDef,
    #[serde(default)]
    pub y2: Option<FieldDef>,
    #[serde(default)]
    pub color: Option<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: SemanticType,
    #[serde(default)]
    pub title: Option<String>,
}

impl FieldDef {
    /// Axis or series name: explicit title, else the field itself
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.field)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default)]
    pub preset: Preset,
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub font: Option<Font>,
    #[serde(default)]
    pub show_data_labels: bool,
}

/// Named style presets. Unrecognised names fall back to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Nature,
    Science,
    Apa,
    Grayscale,
    // `other` must sit on the last variant
    #[default]
    #[serde(other)]
    Default,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Font {
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBar {
    #[serde(rename = "type")]
    pub kind: ErrorBarKind,
    /// Confidence level in percent; only meaningful for `ci`
    #[serde(default)]
    pub value: Option<f64>,
}

impl ErrorBar {
    pub const DEFAULT_CONFIDENCE: f64 = 95.0;

    pub fn confidence_level(&self) -> f64 {
        self.value.unwrap_or(Self::DEFAULT_CONFIDENCE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorBarKind {
    Stderr,
    Stdev,
    Ci,
    Iqr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facet {
    pub field: String,
    #[serde(default)]
    pub ncol: Option<usize>,
    #[serde(default = "default_true")]
    pub show_title: bool,
    #[serde(default)]
    pub share_axis: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trendline {
    #[serde(rename = "type")]
    pub kind: TrendlineKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendlineKind {
    Linear,
}

/// Free-standing graphic overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    #[serde(default)]
    pub x: Option<Coord>,
    #[serde(default)]
    pub y: Option<Coord>,
    #[serde(default)]
    pub x2: Option<Coord>,
    #[serde(default)]
    pub y2: Option<Coord>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub stroke_dash: Option<StrokeDash>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Text,
    Line,
    Rect,
}

/// Annotation coordinate as written in a ChartSpec: pixels or an expression
/// such as `"25%"` or `"center"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coord {
    Pixels(f64),
    Expr(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrokeDash {
    Width(f64),
    Pattern(Vec<f64>),
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Svg,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }
fn default_dpi() -> u32 { 300 }

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            width: 800,
            height: 600,
            dpi: 300,
        }
    }
}
