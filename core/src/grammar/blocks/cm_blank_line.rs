// Blank line grammar
//
// A blank line is optional inline whitespace followed by a newline.
// The node carries no state and serializes to the empty string; the
// document joins siblings with newlines, which restores the blank.
// Whitespace-only blank lines therefore normalize to empty ones.

use crate::ast::BlankLine;
use crate::grammar::shared::{no_match, Span};
use nom::bytes::complete::take_while;
use nom::character::complete::newline;
use nom::{IResult, Parser};

pub fn blank_line(input: Span) -> IResult<Span, BlankLine> {
    let start = input;
    let (rest, _ws) = take_while(|c| c == ' ' || c == '\t').parse(input)?;
    match newline::<_, nom::error::Error<Span>>(rest) {
        Ok((remaining, _)) => Ok((remaining, BlankLine::new())),
        Err(_) => Err(no_match(start)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_blank_line_newline() {
        let (rest, _) = blank_line(Span::new("\nnext")).unwrap();
        assert_eq!(*rest.fragment(), "next");
    }

    #[test]
    fn smoke_test_blank_line_whitespace_only() {
        let (rest, _) = blank_line(Span::new("  \t \nnext")).unwrap();
        assert_eq!(*rest.fragment(), "next");
    }

    #[test]
    fn smoke_test_blank_line_rejects_text() {
        assert!(blank_line(Span::new("text\n")).is_err());
    }

    #[test]
    fn smoke_test_blank_line_rejects_eof_without_newline() {
        assert!(blank_line(Span::new("  ")).is_err());
        assert!(blank_line(Span::new("")).is_err());
    }
}
