//! Structural validation of a ChartSpec.
//!
//! Reports every violated constraint, in spec order. Runtime precedence
//! conflicts (y2 with facet, error bar with horizontal orientation, ...)
//! are not violations; the compiler resolves those.

use crate::parser::ast::{
    Annotation, AnnotationKind, ChartSpec, Coord, ErrorBarKind, FieldDef, SemanticType,
};
use crate::parser::color::is_hex;
use crate::parser::coord::{resolve_coord, Position};
use std::fmt;
use thiserror::Error;

/// Encoding channel named in a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    X,
    Y,
    Y2,
    Color,
    Facet,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::X => "encoding.x",
            Channel::Y => "encoding.y",
            Channel::Y2 => "encoding.y2",
            Channel::Color => "encoding.color",
            Channel::Facet => "facet",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("{channel}.field must not be empty")]
    EmptyField { channel: Channel },

    #[error("{channel}.field '{field}' does not reference a column")]
    UnknownField { channel: Channel, field: String },

    #[error("encoding.x and encoding.y both reference '{field}'")]
    SameField { field: String },

    #[error("encoding.y2 must be quantitative, found {found}")]
    Y2NotQuantitative { found: &'static str },

    #[error("facet.field '{field}' must be a nominal or ordinal column, found {found}")]
    FacetNotCategorical { field: String, found: &'static str },

    #[error("facet.ncol must be between 1 and 6, found {ncol}")]
    FacetColumnsOutOfRange { ncol: usize },

    #[error("errorBar.value must be a confidence level in (0, 100), found {value}")]
    ConfidenceOutOfRange { value: f64 },

    #[error("style.colors[{index}] '{value}' is not a valid colour")]
    InvalidColor { index: usize, value: String },

    #[error("annotations[{index}].{coord} '{raw}' is not a pixel offset, percentage or alignment keyword")]
    InvalidCoordinate { index: usize, coord: &'static str, raw: String },

    #[error("annotations[{index}] (rect) mixes pixel and percentage coordinates")]
    MixedUnits { index: usize },

    #[error("annotations[{index}] (rect) coordinate '{coord}' must be numeric or a percentage")]
    KeywordInRect { index: usize, coord: &'static str },

    #[error("annotations[{index}].color '{value}' is not a valid colour")]
    InvalidAnnotationColor { index: usize, value: String },
}

/// Every violation found in one spec
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid chart specification ({} violation(s)): {}", .0.len(), join_violations(.0))]
pub struct ValidationErrors(pub Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a spec, collecting all violations
pub fn validate(spec: &ChartSpec) -> Result<(), ValidationErrors> {
    let mut out = Vec::new();

    check_field(spec, &spec.encoding.x, Channel::X, &mut out);
    check_field(spec, &spec.encoding.y, Channel::Y, &mut out);
    if !spec.encoding.x.field.is_empty() && spec.encoding.x.field == spec.encoding.y.field {
        out.push(Violation::SameField { field: spec.encoding.x.field.clone() });
    }

    if let Some(y2) = &spec.encoding.y2 {
        check_field(spec, y2, Channel::Y2, &mut out);
        if y2.field_type != SemanticType::Quantitative {
            out.push(Violation::Y2NotQuantitative { found: y2.field_type.as_str() });
        }
    }

    if let Some(color) = &spec.encoding.color {
        check_field(spec, color, Channel::Color, &mut out);
    }

    if let Some(facet) = &spec.facet {
        if facet.field.trim().is_empty() {
            out.push(Violation::EmptyField { channel: Channel::Facet });
        } else {
            match spec.column(&facet.field) {
                None => out.push(Violation::UnknownField {
                    channel: Channel::Facet,
                    field: facet.field.clone(),
                }),
                Some(col) if !col.semantic_type.is_categorical() => {
                    out.push(Violation::FacetNotCategorical {
                        field: facet.field.clone(),
                        found: col.semantic_type.as_str(),
                    })
                }
                Some(_) => {}
            }
        }
        if let Some(ncol) = facet.ncol {
            if !(1..=6).contains(&ncol) {
                out.push(Violation::FacetColumnsOutOfRange { ncol });
            }
        }
    }

    if let Some(eb) = &spec.error_bar {
        // value is only read as a confidence level by ci
        if let (ErrorBarKind::Ci, Some(value)) = (eb.kind, eb.value) {
            if !(value > 0.0 && value < 100.0) {
                out.push(Violation::ConfidenceOutOfRange { value });
            }
        }
    }

    if let Some(colors) = &spec.style.colors {
        for (index, value) in colors.iter().enumerate() {
            if !is_valid_color(value) {
                out.push(Violation::InvalidColor { index, value: value.clone() });
            }
        }
    }

    for (index, annotation) in spec.annotations.iter().enumerate() {
        check_annotation(index, annotation, &mut out);
    }

    if out.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(out))
    }
}

fn check_field(spec: &ChartSpec, def: &FieldDef, channel: Channel, out: &mut Vec<Violation>) {
    if def.field.trim().is_empty() {
        out.push(Violation::EmptyField { channel });
    } else if spec.column(&def.field).is_none() {
        out.push(Violation::UnknownField { channel, field: def.field.clone() });
    }
}

/// Colour strings are passed through to the engine. Only `#` codes are
/// checked, since named and functional colours are engine-defined.
fn is_valid_color(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    !value.starts_with('#') || is_hex(value)
}

fn check_annotation(index: usize, a: &Annotation, out: &mut Vec<Violation>) {
    let coords: [(&'static str, &Option<Coord>); 4] =
        [("x", &a.x), ("y", &a.y), ("x2", &a.x2), ("y2", &a.y2)];

    let mut positions: Vec<(&'static str, Position)> = Vec::new();
    for (name, coord) in coords {
        if let Some(c) = coord {
            match resolve_coord(c) {
                Some(pos) => positions.push((name, pos)),
                None => out.push(Violation::InvalidCoordinate {
                    index,
                    coord: name,
                    raw: match c {
                        Coord::Pixels(px) => px.to_string(),
                        Coord::Expr(s) => s.clone(),
                    },
                }),
            }
        }
    }

    if a.kind == AnnotationKind::Rect {
        let mut has_pixels = false;
        let mut has_percent = false;
        for (name, pos) in &positions {
            match pos {
                Position::Pixels(_) => has_pixels = true,
                Position::Percent(_) => has_percent = true,
                Position::Keyword(_) => out.push(Violation::KeywordInRect { index, coord: *name }),
            }
        }
        if has_pixels && has_percent {
            out.push(Violation::MixedUnits { index });
        }
    }

    if let Some(color) = &a.color {
        if !is_valid_color(color) {
            out.push(Violation::InvalidAnnotationColor { index, value: color.clone() });
        }
    }
}
