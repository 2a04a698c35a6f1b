// CommonMark Thematic Break Grammar
// Parses horizontal rules: ---, ***, ___ (optionally spaced: - - -)
//
// Rules:
// - 0-3 leading spaces
// - At least 3 of a single character among -, _, *
// - Each break character may be followed by inline whitespace
// - Mixing break characters is not allowed
// - Line must end with newline or EOF
//
// The literal line is kept so `- - -` round-trips with its internal
// spacing.

use crate::ast::ThematicBreak;
use crate::grammar::shared::{count_indentation, no_match, split_line, Span};
use nom::{IResult, Input};

/// Parse a thematic break line into its AST node.
pub fn thematic_break(input: Span) -> IResult<Span, ThematicBreak> {
    log::debug!(
        "Trying thematic break at: {:?}",
        crate::logic::safe_preview(input.fragment(), 40)
    );

    let start = input;

    if input.fragment().is_empty() {
        return Err(no_match(start));
    }
    if count_indentation(input.fragment()) > 3 {
        return Err(no_match(start));
    }

    let (line, _, had_newline) = split_line(input.fragment());
    let body = line.trim_start_matches(' ');

    let break_char = match body.chars().next() {
        Some(c @ ('-' | '_' | '*')) => c,
        _ => return Err(no_match(start)),
    };

    let mut count = 0;
    for ch in body.chars() {
        if ch == break_char {
            count += 1;
        } else if ch == ' ' || ch == '\t' {
            continue;
        } else {
            // Mixed characters disqualify the break
            return Err(no_match(start));
        }
    }
    if count < 3 {
        return Err(no_match(start));
    }

    let consumed = line.len() + usize::from(had_newline);
    let remaining = input.take_from(consumed);

    log::debug!("Parsed thematic break: {:?}", line);
    Ok((remaining, ThematicBreak::new(break_char, line.to_string())))
}
