// CommonMark Blockquote Grammar
// Parses blockquotes (lines starting with >)
//
// Rules:
// - Prefix per line: 0-3 leading spaces, '>', optional single space
// - The prefix is stripped from every line and the stripped bodies
//   accumulate into a sub-input for the block driver
// - A line that fails the prefix ends the quote and is not consumed
//   (no lazy continuation)
// - Child parsers never observe the prefix; the serializer re-applies
//   the first line's indent + "> " to the output
//
// Returns the first line's indent and the de-prefixed sub-input; the
// driver recurses on the sub-input to produce the children.

use crate::grammar::shared::{no_match, split_line, Span};
use nom::{IResult, Input};

// Strip the blockquote prefix from one line.
// Returns (indent, body) when the line carries a marker.
fn strip_prefix(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start_matches(' ');
    let indent_len = line.len() - trimmed.len();
    if indent_len > 3 {
        return None;
    }
    let body = trimmed.strip_prefix('>')?;
    let body = body.strip_prefix(' ').unwrap_or(body);
    Some((&line[..indent_len], body))
}

/// True when the line opens a blockquote (used for paragraph
/// interruption).
pub fn is_blockquote_start(line: &str) -> bool {
    strip_prefix(line).is_some()
}

pub fn blockquote(input: Span) -> IResult<Span, (String, String)> {
    log::debug!(
        "Trying blockquote at: {:?}",
        crate::logic::safe_preview(input.fragment(), 40)
    );

    let start = input;

    let mut consumed = 0;
    let mut rest = *input.fragment();
    let mut indent: Option<String> = None;
    let mut bodies: Vec<String> = Vec::new();

    loop {
        if rest.is_empty() {
            break;
        }
        let (line, after, had_newline) = split_line(rest);
        match strip_prefix(line) {
            Some((line_indent, body)) => {
                if indent.is_none() {
                    indent = Some(line_indent.to_string());
                }
                bodies.push(body.to_string());
                consumed += line.len() + usize::from(had_newline);
                rest = after;
            }
            None => break,
        }
    }

    let indent = match indent {
        Some(indent) => indent,
        None => return Err(no_match(start)),
    };

    let content = bodies.join("\n");
    log::debug!("Parsed blockquote: {} lines", bodies.len());

    Ok((input.take_from(consumed), (indent, content)))
}
