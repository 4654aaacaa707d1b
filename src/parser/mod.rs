// ChartSpec input model and the small expression parsers it needs

pub mod ast;
pub mod color;
pub mod coord;
pub mod lexer;

// Public API re-exports
pub use ast::ChartSpec;

use anyhow::{Context, Result};

/// Parse a ChartSpec from its JSON text
pub fn parse_chart_spec(input: &str) -> Result<ChartSpec> {
    serde_json::from_str(input).context("Failed to parse chart specification JSON")
}
