// Paragraph grammar: the universal fallback
//
// A paragraph consumes lines until its closer: a newline followed by
// EOF, a second newline, or a line that would start a thematic break,
// an ATX heading, a non-empty list item (ordered lists must start at 1
// to interrupt), a fenced code block, an HTML block of kinds 1-6, or a
// blockquote. HTML kind 7 never interrupts. Internal newlines stay in
// the text; the one terminating newline is consumed but not kept.

use crate::ast::Paragraph;
use crate::grammar::blocks::cm_atx_heading::atx_heading_opener;
use crate::grammar::blocks::cm_blockquote::is_blockquote_start;
use crate::grammar::blocks::cm_fenced_code_block::is_fenced_open;
use crate::grammar::blocks::cm_html_blocks::html_interrupts;
use crate::grammar::blocks::cm_list::interrupts_paragraph as list_interrupts;
use crate::grammar::blocks::cm_thematic_break::thematic_break;
use crate::grammar::shared::{no_match, split_line, Span};
use nom::{IResult, Input};

/// True when `line` would interrupt a paragraph.
pub fn closes_paragraph(line: &str) -> bool {
    thematic_break(Span::new(line)).is_ok()
        || atx_heading_opener(Span::new(line)).is_ok()
        || list_interrupts(line)
        || is_fenced_open(line)
        || html_interrupts(line)
        || is_blockquote_start(line)
}

pub fn paragraph(input: Span) -> IResult<Span, Paragraph> {
    if input.fragment().is_empty() {
        return Err(no_match(input));
    }

    log::debug!(
        "Parsing paragraph from: {:?}",
        crate::logic::safe_preview(input.fragment(), 40)
    );

    let fragment = input.fragment();
    let mut text = String::new();
    let mut consumed = 0;
    let mut first = true;

    loop {
        let rest = &fragment[consumed..];
        let (line, after, had_newline) = split_line(rest);

        if !first {
            text.push('\n');
        }
        text.push_str(line);
        consumed += line.len();
        first = false;

        if !had_newline {
            break;
        }

        // Closer: EOF, a second newline, or an interrupting line. The
        // terminating newline is consumed either way.
        if after.is_empty() || after.starts_with('\n') {
            consumed += 1;
            break;
        }
        let (next, _, _) = split_line(after);
        if closes_paragraph(next) {
            consumed += 1;
            break;
        }

        // Multi-line paragraph: the newline stays in the text
        consumed += 1;
    }

    Ok((input.take_from(consumed), Paragraph::new(text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_paragraph_single_line() {
        let (rest, node) = paragraph(Span::new("hello\n")).unwrap();
        assert_eq!(node.text, "hello");
        assert!(rest.fragment().is_empty());
    }

    #[test]
    fn smoke_test_paragraph_multi_line() {
        let (rest, node) = paragraph(Span::new("a\nb\n\nc\n")).unwrap();
        assert_eq!(node.text, "a\nb");
        assert_eq!(*rest.fragment(), "\nc\n");
    }

    #[test]
    fn smoke_test_paragraph_eof_without_newline() {
        let (rest, node) = paragraph(Span::new("text")).unwrap();
        assert_eq!(node.text, "text");
        assert!(rest.fragment().is_empty());
    }

    #[test]
    fn smoke_test_paragraph_interrupted_by_heading() {
        let (rest, node) = paragraph(Span::new("para\n# heading\n")).unwrap();
        assert_eq!(node.text, "para");
        assert_eq!(*rest.fragment(), "# heading\n");
    }

    #[test]
    fn smoke_test_paragraph_interrupted_by_list() {
        let (rest, node) = paragraph(Span::new("para\n- item\n")).unwrap();
        assert_eq!(node.text, "para");
        assert_eq!(*rest.fragment(), "- item\n");
    }

    #[test]
    fn smoke_test_paragraph_ordered_must_start_at_one() {
        let (_, node) = paragraph(Span::new("para\n2. item\n")).unwrap();
        assert_eq!(node.text, "para\n2. item");

        let (_, node) = paragraph(Span::new("para\n1. item\n")).unwrap();
        assert_eq!(node.text, "para");
    }

    #[test]
    fn smoke_test_paragraph_html_kind7_does_not_interrupt() {
        let (_, node) = paragraph(Span::new("para\n<custom-tag>\n")).unwrap();
        assert_eq!(node.text, "para\n<custom-tag>");

        let (_, node) = paragraph(Span::new("para\n<div>\n")).unwrap();
        assert_eq!(node.text, "para");
    }

    #[test]
    fn smoke_test_paragraph_interrupted_by_blockquote_and_fence() {
        let (_, node) = paragraph(Span::new("para\n> quote\n")).unwrap();
        assert_eq!(node.text, "para");

        let (_, node) = paragraph(Span::new("para\n```\n")).unwrap();
        assert_eq!(node.text, "para");
    }

    #[test]
    fn smoke_test_paragraph_indented_code_does_not_interrupt() {
        let (_, node) = paragraph(Span::new("para\n    more\n")).unwrap();
        assert_eq!(node.text, "para\n    more");
    }

    #[test]
    fn smoke_test_paragraph_rejects_empty_input() {
        assert!(paragraph(Span::new("")).is_err());
    }
}
