// Hex colour codes

use nom::{
    branch::alt,
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res},
    sequence::{preceded, tuple},
    IResult,
};

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn hex_pair(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, is_hex_digit), |s| u8::from_str_radix(s, 16))(input)
}

fn hex_single(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, is_hex_digit), |s| {
        u8::from_str_radix(s, 16).map(|v| v * 17)
    })(input)
}

/// Parse `#RRGGBB`
pub fn hex_color6(input: &str) -> IResult<&str, (u8, u8, u8)> {
    preceded(char('#'), tuple((hex_pair, hex_pair, hex_pair)))(input)
}

/// Parse `#RRGGBB` or the `#RGB` shorthand
pub fn hex_color(input: &str) -> IResult<&str, (u8, u8, u8)> {
    alt((
        all_consuming(hex_color6),
        all_consuming(preceded(char('#'), tuple((hex_single, hex_single, hex_single)))),
    ))(input)
}

/// True for exactly six hex digits after `#`
pub fn is_hex6(s: &str) -> bool {
    all_consuming(hex_color6)(s).is_ok()
}

/// True for a well-formed `#RGB` or `#RRGGBB` code
pub fn is_hex(s: &str) -> bool {
    hex_color(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(hex_color("#FF0000").map(|(_, c)| c), Ok((255, 0, 0)));
        assert_eq!(hex_color("#66c2a5").map(|(_, c)| c), Ok((0x66, 0xc2, 0xa5)));
        assert_eq!(hex_color("#F00").map(|(_, c)| c), Ok((255, 0, 0)));
    }

    #[test]
    fn test_hex6_is_strict() {
        assert!(is_hex6("#1b9e77"));
        assert!(!is_hex6("#F00"));
        assert!(!is_hex6("#1b9e77ff"));
        assert!(!is_hex6("1b9e77"));
    }

    #[test]
    fn test_is_hex_rejects_garbage() {
        assert!(is_hex("#abc"));
        assert!(!is_hex("#abcd"));
        assert!(!is_hex("#zzzzzz"));
    }
}
