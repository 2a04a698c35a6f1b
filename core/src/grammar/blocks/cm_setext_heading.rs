// CommonMark Setext Heading Grammar
// Parses underline-style headings: title lines plus = or - underline
//
// Rules:
// - Title: one or more non-blank lines; the first may have 0-3 leading
//   spaces; no title line may itself open another block (otherwise a
//   list or heading would be swallowed into the title)
// - Underline: 0-3 leading spaces, a run of '=' (level 1) or '-'
//   (level 2), optional trailing whitespace, newline or EOF
// - A blank line between title and underline disqualifies the match
// - A line mixing underline characters is not an underline
//
// Title lines and underline are stored verbatim; children are attached
// by the driver with setext-typed closers.

use crate::grammar::blocks::cm_atx_heading::atx_heading_opener;
use crate::grammar::blocks::cm_blockquote::is_blockquote_start;
use crate::grammar::blocks::cm_fenced_code_block::is_fenced_open;
use crate::grammar::blocks::cm_html_blocks::html_interrupts;
use crate::grammar::blocks::cm_list::is_list_opener;
use crate::grammar::blocks::cm_thematic_break::thematic_break;
use crate::grammar::shared::{count_indentation, no_match, split_line, Span};
use nom::{IResult, Input};

/// The parsed framing of a setext heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetextOpener {
    pub title: String,
    pub underline: String,
    pub level: u8,
}

/// Classify a line as a setext underline: a solid run of `=` or `-`
/// with up to 3 leading spaces and only trailing whitespace.
pub fn setext_underline(line: &str) -> Option<u8> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let underline_char = match trimmed.chars().next() {
        Some(c @ ('=' | '-')) => c,
        _ => return None,
    };
    let run = trimmed.chars().take_while(|&c| c == underline_char).count();
    if trimmed[run..].chars().all(|c| c == ' ' || c == '\t') {
        Some(if underline_char == '=' { 1 } else { 2 })
    } else {
        None
    }
}

// A title line may not open another block
fn blocks_title(line: &str) -> bool {
    thematic_break(Span::new(line)).is_ok()
        || atx_heading_opener(Span::new(line)).is_ok()
        || is_list_opener(line)
        || is_fenced_open(line)
        || html_interrupts(line)
        || is_blockquote_start(line)
}

pub fn setext_heading_opener(input: Span) -> IResult<Span, SetextOpener> {
    let start = input;
    let fragment = input.fragment();

    let (first, _, first_newline) = split_line(fragment);
    if first.trim().is_empty() || !first_newline {
        return Err(no_match(start));
    }
    if count_indentation(first) > 3 {
        return Err(no_match(start));
    }
    if blocks_title(first) {
        return Err(no_match(start));
    }

    log::debug!(
        "Trying setext heading at: {:?}",
        crate::logic::safe_preview(first, 40)
    );

    let mut title_lines = vec![first];
    let mut consumed = first.len() + 1;

    loop {
        let rest = &fragment[consumed..];
        if rest.is_empty() {
            return Err(no_match(start));
        }
        let (line, _, had_newline) = split_line(rest);

        // A blank line before the underline disqualifies the match
        if line.trim().is_empty() {
            return Err(no_match(start));
        }

        if let Some(level) = setext_underline(line) {
            consumed += line.len() + usize::from(had_newline);
            let opener = SetextOpener {
                title: title_lines.join("\n"),
                underline: line.to_string(),
                level,
            };
            log::debug!("Parsed setext heading level {}", level);
            return Ok((input.take_from(consumed), opener));
        }

        if blocks_title(line) || !had_newline {
            return Err(no_match(start));
        }

        title_lines.push(line);
        consumed += line.len() + 1;
    }
}
