// Annotation coordinate and stroke-dash expressions

use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, multispace1},
    combinator::{all_consuming, map, value},
    multi::separated_list1,
    sequence::terminated,
    IResult,
};
use crate::parser::ast::Coord;
use crate::parser::lexer::{number_literal, ws};

/// A coordinate after parsing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    Pixels(f64),
    Percent(f64),
    Keyword(Keyword),
}

/// Alignment keywords accepted in place of a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Center,
    Middle,
    Left,
    Right,
    Top,
    Bottom,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Center => "center",
            Keyword::Middle => "middle",
            Keyword::Left => "left",
            Keyword::Right => "right",
            Keyword::Top => "top",
            Keyword::Bottom => "bottom",
        }
    }
}

fn parse_keyword(input: &str) -> IResult<&str, Keyword> {
    alt((
        value(Keyword::Center, tag_no_case("center")),
        value(Keyword::Middle, tag_no_case("middle")),
        value(Keyword::Left, tag_no_case("left")),
        value(Keyword::Right, tag_no_case("right")),
        value(Keyword::Top, tag_no_case("top")),
        value(Keyword::Bottom, tag_no_case("bottom")),
    ))(input)
}

/// Parse `25%`, `center`, or a bare pixel count
pub fn parse_position(input: &str) -> IResult<&str, Position> {
    alt((
        map(terminated(ws(number_literal), char('%')), Position::Percent),
        map(ws(parse_keyword), Position::Keyword),
        map(ws(number_literal), Position::Pixels),
    ))(input)
}

/// Interpret a spec coordinate. `None` when a string coordinate is malformed.
pub fn resolve_coord(coord: &Coord) -> Option<Position> {
    match coord {
        Coord::Pixels(px) => Some(Position::Pixels(*px)),
        Coord::Expr(s) => all_consuming(ws(parse_position))(s.as_str())
            .ok()
            .map(|(_, pos)| pos),
    }
}

/// Parse a dash list such as `"5,5"` or `"6 3 2 3"`
pub fn parse_dash_list(input: &str) -> IResult<&str, Vec<f64>> {
    separated_list1(
        alt((map(ws(char(',')), |_| ()), map(multispace1, |_| ()))),
        number_literal,
    )(input.trim())
}

/// Named dash styles, in pixels
pub fn named_dash(name: &str) -> Option<Vec<f64>> {
    match name.trim().to_lowercase().as_str() {
        "dashed" | "dash" => Some(vec![6.0, 4.0]),
        "dotted" | "dot" => Some(vec![2.0, 3.0]),
        "dashdot" => Some(vec![6.0, 3.0, 2.0, 3.0]),
        _ => None,
    }
}
