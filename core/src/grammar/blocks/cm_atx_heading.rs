// CommonMark ATX Heading Grammar
// Parses the opener line: 1-6 # characters plus the raw title
//
// Rules:
// - 0-3 leading spaces (4+ means indented code)
// - Level equals the number of # consumed (1-6; 7+ fails)
// - The character after the hashes must be a space, newline, or EOF
// - The title is the raw rest of the line, including the separator
//   space and any trailing closing hashes
//
// Children are attached by the block driver, which keeps collecting
// until a heading of the same or lower level (or a setext heading)
// appears.

use crate::grammar::shared::{block_indent, no_match, split_line, Span};
use nom::bytes::complete::take_while;
use nom::{IResult, Input, Parser};

/// The parsed opener line of an ATX heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtxOpener {
    pub indent: usize,
    pub level: u8,
    pub title: String,
}

pub fn atx_heading_opener(input: Span) -> IResult<Span, AtxOpener> {
    let start = input;

    // 0-3 leading spaces
    let (input, leading) = block_indent(input).map_err(|_| no_match(start))?;

    // 1-6 hashes
    let (input, hashes) = take_while(|c| c == '#').parse(input)?;
    let level = hashes.fragment().len();
    if level == 0 || level > 6 {
        return Err(no_match(start));
    }

    // Separator: space, newline, or EOF; anything else is not a heading
    // (e.g. "#hashtag")
    match input.fragment().chars().next() {
        None | Some(' ') | Some('\n') => {}
        Some(_) => return Err(no_match(start)),
    }

    let (title, _, had_newline) = split_line(input.fragment());
    let remaining = input.take_from(title.len() + usize::from(had_newline));

    log::debug!("Parsed ATX heading level {}: {:?}", level, title);

    Ok((
        remaining,
        AtxOpener {
            indent: leading.fragment().len(),
            level: level as u8,
            title: title.to_string(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_atx_basic() {
        let (rest, opener) = atx_heading_opener(Span::new("# Title\nrest")).unwrap();
        assert_eq!(opener.level, 1);
        assert_eq!(opener.title, " Title");
        assert_eq!(opener.indent, 0);
        assert_eq!(*rest.fragment(), "rest");
    }

    #[test]
    fn smoke_test_atx_level_six() {
        let (_, opener) = atx_heading_opener(Span::new("###### deep\n")).unwrap();
        assert_eq!(opener.level, 6);
    }

    #[test]
    fn smoke_test_atx_seven_hashes_fails() {
        assert!(atx_heading_opener(Span::new("####### nope\n")).is_err());
    }

    #[test]
    fn smoke_test_atx_requires_separator() {
        assert!(atx_heading_opener(Span::new("#hashtag\n")).is_err());
    }

    #[test]
    fn smoke_test_atx_bare_hash() {
        let (_, opener) = atx_heading_opener(Span::new("#\n")).unwrap();
        assert_eq!(opener.level, 1);
        assert_eq!(opener.title, "");
    }

    #[test]
    fn smoke_test_atx_keeps_trailing_hashes() {
        let (_, opener) = atx_heading_opener(Span::new("## Title ##\n")).unwrap();
        assert_eq!(opener.title, " Title ##");
    }

    #[test]
    fn smoke_test_atx_indent() {
        let (_, opener) = atx_heading_opener(Span::new("   # ok\n")).unwrap();
        assert_eq!(opener.indent, 3);
        assert!(atx_heading_opener(Span::new("    # code\n")).is_err());
    }
}
