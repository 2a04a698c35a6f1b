// YAML front matter grammar (notedown superset)
//
// Only valid at byte offset 0: an opening "---" line, body lines that
// never form a bare "---" line, then a closing "---" line (trailing
// newline optional at EOF). The raw body is kept verbatim for
// round-trip; decoding goes through serde_yaml. A body that fails to
// decode as a mapping is no match, so the text falls back to a
// thematic break or paragraph. A whitespace-only body parses with
// absent metadata.

use crate::ast::FrontMatter;
use crate::grammar::shared::{no_match, split_line, Span};
use nom::{IResult, Input};

pub fn front_matter(input: Span) -> IResult<Span, FrontMatter> {
    let start = input;

    // Front matter exists only at the very start of the document
    if input.location_offset() != 0 {
        return Err(no_match(start));
    }

    let fragment = input.fragment();
    let (first, mut rest, first_newline) = split_line(fragment);
    if first != "---" || !first_newline {
        return Err(no_match(start));
    }

    log::debug!("Trying front matter");

    let mut consumed = first.len() + 1;
    let mut body_lines: Vec<&str> = Vec::new();
    let mut closed = false;

    loop {
        if rest.is_empty() {
            break;
        }
        let (line, after, had_newline) = split_line(rest);
        consumed += line.len() + usize::from(had_newline);
        rest = after;
        if line == "---" {
            closed = true;
            break;
        }
        body_lines.push(line);
        if !had_newline {
            break;
        }
    }

    if !closed {
        return Err(no_match(start));
    }

    let body = if body_lines.is_empty() {
        None
    } else {
        Some(body_lines.join("\n"))
    };

    let metadata = match &body {
        Some(text) if !text.trim().is_empty() => {
            match serde_yaml::from_str::<serde_yaml::Mapping>(text) {
                Ok(mapping) => Some(mapping),
                Err(err) => {
                    // Decode failure restores the cursor: the text will
                    // parse as a thematic break or paragraph instead
                    log::debug!("Front matter YAML rejected: {}", err);
                    return Err(no_match(start));
                }
            }
        }
        _ => None,
    };

    log::debug!(
        "Parsed front matter: {} body lines, metadata={}",
        body.as_deref().map(|b| b.lines().count()).unwrap_or(0),
        metadata.is_some()
    );

    Ok((input.take_from(consumed), FrontMatter::new(body, metadata)))
}
