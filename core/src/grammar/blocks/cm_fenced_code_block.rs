// CommonMark Fenced Code Block Grammar
// Parses code blocks with ``` or ~~~ fences
//
// Per CommonMark spec:
// - Opening fence: at least 3 backticks or tildes, 0-3 leading spaces
// - Infostring: raw rest of the opener line (no backticks allowed when
//   the fence uses backticks)
// - Closing fence: same character, at least as many as the opening,
//   0-3 leading spaces, only whitespace after
// - An unclosed block runs to EOF; the close is then empty and exactly
//   one trailing newline is dropped from the body
//
// The opener (indent + run), infostring, body lines, and closing line
// are all stored verbatim for round-trip.

use crate::ast::FencedCodeBlock;
use crate::grammar::shared::{no_match, split_line, Span};
use nom::{IResult, Input};

// Opening fence of a line: (indent, fence_char, run_length) or None
fn fence_open(line: &str) -> Option<(usize, char, usize)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let body = &line[indent..];
    let fence_char = match body.chars().next() {
        Some(c @ ('`' | '~')) => c,
        _ => return None,
    };
    let run = body.chars().take_while(|&c| c == fence_char).count();
    if run < 3 {
        return None;
    }
    Some((indent, fence_char, run))
}

/// True when the line would open a fenced code block (used for
/// paragraph interruption).
pub fn is_fenced_open(line: &str) -> bool {
    match fence_open(line) {
        Some((indent, fence_char, run)) => {
            let info = &line[indent + run..];
            fence_char != '`' || !info.contains('`')
        }
        None => false,
    }
}

// Closing fence: same char, at least `min` long, nothing but
// whitespace after the run
fn is_fence_close(line: &str, fence_char: char, min: usize) -> bool {
    match fence_open(line) {
        Some((_, c, run)) => {
            c == fence_char && run >= min && {
                let indent = line.len() - line.trim_start_matches(' ').len();
                line[indent + run..].trim().is_empty()
            }
        }
        None => false,
    }
}

pub fn fenced_code_block(input: Span) -> IResult<Span, FencedCodeBlock> {
    log::debug!(
        "Trying fenced code block at: {:?}",
        crate::logic::safe_preview(input.fragment(), 40)
    );

    let start = input;

    let (first, mut rest, first_newline) = split_line(input.fragment());
    let (indent, fence_char, run) = match fence_open(first) {
        Some(open) => open,
        None => return Err(no_match(start)),
    };

    let open = first[..indent + run].to_string();
    let info = first[indent + run..].to_string();

    // Infostring cannot contain a backtick when the fence is backticks
    if fence_char == '`' && info.contains('`') {
        return Err(no_match(start));
    }

    let mut consumed = first.len() + usize::from(first_newline);
    let mut body: Vec<String> = Vec::new();
    let mut close = String::new();

    if first_newline {
        loop {
            let (line, after, had_newline) = split_line(rest);
            if line.is_empty() && after.is_empty() && !had_newline {
                // EOF closure: the line split already dropped the one
                // trailing newline from the body
                break;
            }
            consumed += line.len() + usize::from(had_newline);
            rest = after;
            if is_fence_close(line, fence_char, run) {
                close = line.to_string();
                break;
            }
            body.push(line.to_string());
            if after.is_empty() && !had_newline {
                break;
            }
        }
    }

    log::debug!(
        "Parsed fenced code block: info={:?}, {} body lines, closed={}",
        info,
        body.len(),
        !close.is_empty()
    );

    Ok((
        input.take_from(consumed),
        FencedCodeBlock::new(open, info, body, close),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_fenced_basic_backticks() {
        let (rest, node) = fenced_code_block(Span::new("```\ncode\n```\nafter")).unwrap();
        assert_eq!(node.open, "```");
        assert_eq!(node.info, "");
        assert_eq!(node.body, vec!["code"]);
        assert_eq!(node.close, "```");
        assert_eq!(*rest.fragment(), "after");
    }

    #[test]
    fn smoke_test_fenced_with_infostring() {
        let (_, node) = fenced_code_block(Span::new("```go\npackage main\n```\n")).unwrap();
        assert_eq!(node.info, "go");
        assert_eq!(node.markdown(), "```go\npackage main\n```");
    }

    #[test]
    fn smoke_test_fenced_tildes() {
        let (_, node) = fenced_code_block(Span::new("~~~\ncode\n~~~\n")).unwrap();
        assert_eq!(node.open, "~~~");
    }

    #[test]
    fn smoke_test_fenced_longer_closing() {
        let (_, node) = fenced_code_block(Span::new("```\ncode\n`````\n")).unwrap();
        assert_eq!(node.close, "`````");
    }

    #[test]
    fn smoke_test_fenced_shorter_closing_is_body() {
        let (_, node) = fenced_code_block(Span::new("````\n```\n````\n")).unwrap();
        assert_eq!(node.body, vec!["```"]);
    }

    #[test]
    fn smoke_test_fenced_unclosed_drops_one_newline() {
        let (rest, node) = fenced_code_block(Span::new("```\ncode\n")).unwrap();
        assert_eq!(node.body, vec!["code"]);
        assert_eq!(node.close, "");
        assert!(rest.fragment().is_empty());
        assert_eq!(node.markdown(), "```\ncode");
    }

    #[test]
    fn smoke_test_fenced_blank_body_line_kept() {
        let (_, node) = fenced_code_block(Span::new("```\n\n```\n")).unwrap();
        assert_eq!(node.body, vec![""]);
        assert_eq!(node.markdown(), "```\n\n```");
    }

    #[test]
    fn smoke_test_fenced_empty_body() {
        let (_, node) = fenced_code_block(Span::new("```\n```\n")).unwrap();
        assert!(node.body.is_empty());
        assert_eq!(node.markdown(), "```\n```");
    }

    #[test]
    fn smoke_test_fenced_less_than_three_fails() {
        assert!(fenced_code_block(Span::new("``\ncode\n``\n")).is_err());
    }

    #[test]
    fn smoke_test_fenced_backtick_in_info_fails() {
        assert!(fenced_code_block(Span::new("```rust`x\ncode\n```\n")).is_err());
    }

    #[test]
    fn smoke_test_fenced_tilde_info_may_contain_backtick() {
        assert!(fenced_code_block(Span::new("~~~a`b\ncode\n~~~\n")).is_ok());
    }

    #[test]
    fn smoke_test_fenced_indented_close() {
        let (_, node) = fenced_code_block(Span::new("```\ncode\n  ```\n")).unwrap();
        assert_eq!(node.close, "  ```");
    }
}
