//! Data labels and free-standing graphic overlays.

use crate::facet;
use crate::ir::{Graphic, GraphicStyle, Label, LabelPosition, LineShape, RectShape, Series};
use crate::parser::ast::{Annotation, AnnotationKind, Coord, StrokeDash};
use crate::parser::coord::{named_dash, parse_dash_list, resolve_coord, Position};

const TRANSPARENT: &str = "transparent";
const DEFAULT_LINE_WIDTH: f64 = 1.0;

pub fn data_label(horizontal: bool) -> Label {
    Label {
        show: true,
        position: if horizontal { LabelPosition::Right } else { LabelPosition::Top },
        font_family: None,
        font_size: None,
    }
}

/// Every series gets the same label, not just the first
pub fn apply_data_labels(series: &mut [Series], horizontal: bool) {
    for s in series {
        s.label = Some(data_label(horizontal));
    }
}

/// Dash pattern for a line annotation. Unparseable strings yield `None`.
pub fn dash_pattern(dash: &StrokeDash) -> Option<Vec<f64>> {
    match dash {
        StrokeDash::Width(w) if *w > 0.0 => Some(vec![*w, *w]),
        StrokeDash::Width(_) => None,
        StrokeDash::Pattern(p) if !p.is_empty() => Some(p.clone()),
        StrokeDash::Pattern(_) => None,
        StrokeDash::Named(s) => named_dash(s).or_else(|| {
            parse_dash_list(s)
                .ok()
                .filter(|(rest, _)| rest.is_empty())
                .map(|(_, list)| list)
        }),
    }
}

fn coord_or(c: &Option<Coord>, fallback: &str) -> Coord {
    c.clone().unwrap_or_else(|| Coord::Expr(fallback.to_string()))
}

fn zero_coord() -> Coord {
    Coord::Pixels(0.0)
}

/// `to - from` in the unit both coordinates share
fn extent(from: &Option<Coord>, to: &Option<Coord>) -> Coord {
    let (Some(a), Some(b)) = (from.as_ref().and_then(resolve_coord), to.as_ref().and_then(resolve_coord)) else {
        return zero_coord();
    };
    match (a, b) {
        (Position::Pixels(a), Position::Pixels(b)) => Coord::Pixels(b - a),
        (Position::Percent(a), Position::Percent(b)) => Coord::Expr(facet::percent(b - a)),
        // Mixed units and keywords are rejected by validation
        _ => zero_coord(),
    }
}

fn build_graphic(a: &Annotation) -> Graphic {
    match a.kind {
        AnnotationKind::Text => Graphic::Text {
            left: coord_or(&a.x, "center"),
            top: coord_or(&a.y, "middle"),
            style: GraphicStyle {
                text: a.text.clone(),
                fill: a.color.clone(),
                ..Default::default()
            },
        },
        AnnotationKind::Line => Graphic::Line {
            shape: LineShape {
                x1: a.x.clone().unwrap_or_else(zero_coord),
                y1: a.y.clone().unwrap_or_else(zero_coord),
                x2: a.x2.clone().unwrap_or_else(zero_coord),
                y2: a.y2.clone().unwrap_or_else(zero_coord),
            },
            style: GraphicStyle {
                stroke: a.color.clone(),
                line_width: Some(DEFAULT_LINE_WIDTH),
                line_dash: a.stroke_dash.as_ref().and_then(dash_pattern),
                ..Default::default()
            },
        },
        AnnotationKind::Rect => Graphic::Rect {
            shape: RectShape {
                x: a.x.clone().unwrap_or_else(zero_coord),
                y: a.y.clone().unwrap_or_else(zero_coord),
                width: extent(&a.x, &a.x2),
                height: extent(&a.y, &a.y2),
            },
            style: GraphicStyle {
                fill: Some(TRANSPARENT.to_string()),
                stroke: a.color.clone(),
                line_width: Some(DEFAULT_LINE_WIDTH),
                ..Default::default()
            },
        },
    }
}

/// One graphic per annotation, in input order
pub fn build_graphics(annotations: &[Annotation]) -> Vec<Graphic> {
    annotations.iter().map(build_graphic).collect()
}
