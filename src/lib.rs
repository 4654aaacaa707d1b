// Library exports for chartspec

pub mod capability;
pub mod data;
pub mod palette;
pub mod parser;
pub mod stats;
pub mod validate;

// Builders
pub mod annotation;
pub mod axis;
pub mod dual_axis;
pub mod error_bar;
pub mod facet;
pub mod precedence;
pub mod series;

pub mod compiler;
pub mod ir;
pub mod theme_resolve;

pub use compiler::{compile, CompileError};
pub use data::PlotData;
pub use ir::RenderConfig;
pub use parser::ast::ChartSpec;
pub use parser::parse_chart_spec;
pub use validate::{validate, ValidationErrors, Violation};
