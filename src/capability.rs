//! Capability registry: which features each chart type supports.
//!
//! Every builder asks this table instead of matching on chart types itself.
//! The `match` in [`capabilities`] is exhaustive, so adding a [`ChartType`]
//! variant without an entry is a compile error.

use crate::parser::ast::{ChartType, SemanticType};

/// Feature flags for one chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub supports_y2: bool,
    pub supports_facet: bool,
    pub supports_color: bool,
    pub supports_error_bar: bool,
    pub supports_horizontal: bool,
    pub suggested_x_type: SemanticType,
}

const fn caps(
    supports_y2: bool,
    supports_facet: bool,
    supports_color: bool,
    supports_error_bar: bool,
    supports_horizontal: bool,
    suggested_x_type: SemanticType,
) -> Capabilities {
    Capabilities {
        supports_y2,
        supports_facet,
        supports_color,
        supports_error_bar,
        supports_horizontal,
        suggested_x_type,
    }
}

use crate::parser::ast::SemanticType::{Nominal, Quantitative, Temporal};

//                                          y2     facet  color  errbar horiz  x type
const BAR: Capabilities          = caps(true,  true,  true,  true,  true,  Nominal);
const GROUPED_BAR: Capabilities  = caps(false, false, true,  false, true,  Nominal);
const STACKED_BAR: Capabilities  = caps(false, false, true,  false, true,  Nominal);
const LINE: Capabilities         = caps(true,  true,  true,  true,  false, Temporal);
const AREA: Capabilities         = caps(true,  true,  true,  false, false, Temporal);
const SCATTER: Capabilities      = caps(false, true,  true,  false, false, Quantitative);
const HISTOGRAM: Capabilities    = caps(false, true,  false, false, false, Quantitative);
const BOXPLOT: Capabilities      = caps(false, true,  false, false, false, Nominal);
const VIOLIN: Capabilities       = caps(false, true,  false, false, false, Nominal);
const ERROR_BAR: Capabilities    = caps(false, false, false, true,  false, Nominal);

/// Look up the capability entry for a chart type
pub const fn capabilities(chart_type: ChartType) -> Capabilities {
    match chart_type {
        ChartType::Bar => BAR,
        ChartType::GroupedBar => GROUPED_BAR,
        ChartType::StackedBar => STACKED_BAR,
        ChartType::Line => LINE,
        ChartType::Area => AREA,
        ChartType::Scatter => SCATTER,
        ChartType::Histogram => HISTOGRAM,
        ChartType::Boxplot => BOXPLOT,
        ChartType::Violin => VIOLIN,
        ChartType::ErrorBar => ERROR_BAR,
    }
}

impl ChartType {
    pub const fn capabilities(self) -> Capabilities {
        capabilities(self)
    }
}
