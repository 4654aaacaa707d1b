// Shared nom building blocks

use nom::{
    character::complete::multispace0,
    number::complete::double,
    sequence::delimited,
    IResult,
};

/// Wrap a parser so it tolerates surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse a floating point literal (`12`, `-3.5`, `1e3`)
pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}
