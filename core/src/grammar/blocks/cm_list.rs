// List and list item grammar
//
// Rules:
// - Unordered markers: -, + or * ; ordered markers: 1-9 digits plus
//   '.' or ')'
// - 0-3 leading spaces before the marker
// - Standard item: marker + at least one space/tab + rest of line.
//   When the internal whitespace spans 5+ columns, one column stays
//   internal and the remainder belongs to the content (a nested
//   indented code block)
// - Empty item: marker followed only by whitespace/newline/EOF; at
//   most one blank line may follow inside the item
// - Continuation lines carry at least indent + marker + internal
//   columns; exactly that many columns are stripped, excess preserved
// - A non-blank line under the requirement terminates the item and is
//   pushed back (no lazy continuation)
// - A list holds one marker class (same bullet, or same ordered
//   terminator), with blank lines between items kept as entries
// - A thematic break whose character equals the bullet closes the list
//
// The grammar returns raw framing plus the column-stripped sub-input;
// the block driver recurses on each item's content to build children.

use crate::grammar::blocks::cm_thematic_break::thematic_break;
use crate::grammar::shared::{
    columns_from, count_indentation, no_match, split_line, strip_columns, Span,
};
use nom::{IResult, Input};

/// List marker classes; `same_class` decides list membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawMarker {
    Bullet(char),
    Ordered { number: u32, delimiter: char },
}

impl RawMarker {
    pub fn same_class(&self, other: &RawMarker) -> bool {
        match (self, other) {
            (RawMarker::Bullet(a), RawMarker::Bullet(b)) => a == b,
            (
                RawMarker::Ordered { delimiter: a, .. },
                RawMarker::Ordered { delimiter: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

/// One parsed list item: framing trivia plus the de-indented sub-input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListItem {
    pub indent: String,
    pub marker: String,
    pub marker_kind: RawMarker,
    pub internal: String,
    pub content: String,
    pub empty: bool,
}

/// List entries: items of one class, interleaved with blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawListEntry {
    Item(RawListItem),
    Blank,
}

/// Detect a list marker: leading indent (0-3 spaces) plus the marker
/// itself. Does not consume the whitespace after the marker.
pub fn detect_list_marker(input: Span) -> IResult<Span, (String, String, RawMarker)> {
    let start = input;

    if count_indentation(input.fragment()) > 3 {
        return Err(no_match(start));
    }
    let indent_len = input
        .fragment()
        .chars()
        .take_while(|&c| c == ' ')
        .count();
    let indent = &input.fragment()[..indent_len];
    let body = &input.fragment()[indent_len..];

    // Ordered marker: 1-9 digits plus '.' or ')'
    let digits = body.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if digits > 9 {
            return Err(no_match(start));
        }
        let delimiter = match body[digits..].chars().next() {
            Some(d @ ('.' | ')')) => d,
            _ => return Err(no_match(start)),
        };
        let number: u32 = body[..digits].parse().map_err(|_| no_match(start))?;
        let marker = &body[..digits + 1];
        return Ok((
            input.take_from(indent_len + digits + 1),
            (
                indent.to_string(),
                marker.to_string(),
                RawMarker::Ordered { number, delimiter },
            ),
        ));
    }

    // Bullet marker
    match body.chars().next() {
        Some(bullet @ ('-' | '+' | '*')) => Ok((
            input.take_from(indent_len + 1),
            (
                indent.to_string(),
                bullet.to_string(),
                RawMarker::Bullet(bullet),
            ),
        )),
        _ => Err(no_match(start)),
    }
}

/// True when the line opens a non-empty list item that may interrupt a
/// paragraph. Ordered items only interrupt when they start at 1.
pub fn interrupts_paragraph(line: &str) -> bool {
    let span = Span::new(line);
    let (after, (_, _, kind)) = match detect_list_marker(span) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    let rest = after.fragment();
    let ws = rest
        .chars()
        .take_while(|&c| c == ' ' || c == '\t')
        .count();
    if ws == 0 || rest[ws..].trim().is_empty() {
        return false;
    }
    match kind {
        RawMarker::Bullet(_) => true,
        RawMarker::Ordered { number, .. } => number == 1,
    }
}

/// True when the line is any valid item opener (standard or empty).
/// Stricter contexts (setext titles) use this instead of
/// `interrupts_paragraph`.
pub fn is_list_opener(line: &str) -> bool {
    let span = Span::new(line);
    let (after, _) = match detect_list_marker(span) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    let rest = after.fragment();
    rest.trim().is_empty()
        || rest
            .chars()
            .next()
            .is_some_and(|c| c == ' ' || c == '\t')
}

/// Parse one list item: the opener line plus every continuation line,
/// de-indented into the item's sub-input.
pub fn list_item(input: Span) -> IResult<Span, RawListItem> {
    let start = input;

    let (after_marker, (indent, marker, marker_kind)) = detect_list_marker(input)?;

    let marker_columns = indent.len() + marker.len();
    let (first_rest, _, first_newline) = split_line(after_marker.fragment());

    let ws_bytes = first_rest
        .chars()
        .take_while(|&c| c == ' ' || c == '\t')
        .count();
    let ws = &first_rest[..ws_bytes];
    let text = &first_rest[ws_bytes..];

    let (internal, first_content, empty) = match first_rest.chars().next() {
        // Marker at end of line or input: empty item
        None => (String::new(), String::new(), true),
        Some(' ') | Some('\t') => {
            if text.is_empty() {
                // Only whitespace after the marker: empty item, keep
                // the trailing whitespace as internal
                (ws.to_string(), String::new(), true)
            } else {
                let ws_columns = columns_from(marker_columns, ws);
                if ws_columns >= 5 {
                    // Keep one column; the rest is content so a nested
                    // indented code block parses with its indentation
                    let split = ws.chars().next().map(char::len_utf8).unwrap_or(1);
                    (
                        ws[..split].to_string(),
                        format!("{}{}", &ws[split..], text),
                        false,
                    )
                } else {
                    (ws.to_string(), text.to_string(), false)
                }
            }
        }
        Some(_) => return Err(no_match(start)),
    };

    let required = marker_columns + columns_from(marker_columns, &internal);

    let mut lines = vec![first_content];
    let mut consumed =
        indent.len() + marker.len() + first_rest.len() + usize::from(first_newline);
    let mut seen_content = !empty;
    let mut blanks_in_empty = 0;

    loop {
        let rest = &start.fragment()[consumed..];
        if rest.is_empty() {
            break;
        }
        let (line, after, had_newline) = split_line(rest);

        if line.trim().is_empty() {
            if !seen_content {
                // An empty item admits at most one blank line, and only
                // when indented content follows it
                if blanks_in_empty >= 1 {
                    break;
                }
                let (next, _, _) = split_line(after);
                if next.trim().is_empty() || count_indentation(next) < required {
                    break;
                }
                blanks_in_empty += 1;
                lines.push(String::new());
                consumed += line.len() + usize::from(had_newline);
                continue;
            }
            // Keep the blank run only when indented content follows
            let mut probe = after;
            let mut pending: Vec<usize> = vec![line.len() + usize::from(had_newline)];
            let continues = loop {
                let (next, next_after, next_newline) = split_line(probe);
                if next.trim().is_empty() {
                    if next.is_empty() && !next_newline {
                        break false;
                    }
                    pending.push(next.len() + usize::from(next_newline));
                    probe = next_after;
                    continue;
                }
                break count_indentation(next) >= required;
            };
            if !continues {
                break;
            }
            for blank_len in pending {
                lines.push(String::new());
                consumed += blank_len;
            }
            continue;
        }

        if count_indentation(line) < required {
            break;
        }

        lines.push(strip_columns(line, required));
        seen_content = true;
        consumed += line.len() + usize::from(had_newline);
    }

    let content = lines.join("\n");

    log::debug!(
        "Parsed list item: marker={:?}, {} content bytes",
        marker,
        content.len()
    );

    Ok((
        start.take_from(consumed),
        RawListItem {
            indent,
            marker,
            marker_kind,
            internal,
            content,
            empty,
        },
    ))
}

/// Parse a complete list: items of one marker class with blank lines
/// between them. Stops on a different class, a non-item block, or a
/// thematic break drawn with the list's bullet.
pub fn list(input: Span) -> IResult<Span, Vec<RawListEntry>> {
    let (mut remaining, first) = list_item(input)?;
    let class = first.marker_kind;
    let mut entries = vec![RawListEntry::Item(first)];

    loop {
        if remaining.fragment().is_empty() {
            break;
        }

        // Measure the blank run before the next candidate item
        let mut blanks = 0usize;
        let mut offset = 0usize;
        loop {
            let rest = &remaining.fragment()[offset..];
            let (line, _, had_newline) = split_line(rest);
            if line.trim().is_empty() && (had_newline || !line.is_empty()) {
                blanks += 1;
                offset += line.len() + usize::from(had_newline);
            } else {
                break;
            }
        }
        let cursor = remaining.take_from(offset);
        if cursor.fragment().is_empty() {
            // Trailing blanks do not belong to the list
            break;
        }

        // A thematic break drawn with the bullet closes the list
        if let RawMarker::Bullet(bullet) = class {
            if let Ok((_, tb)) = thematic_break(cursor) {
                if tb.break_char == bullet {
                    break;
                }
            }
        }

        match list_item(cursor) {
            Ok((rest, item)) if item.marker_kind.same_class(&class) => {
                for _ in 0..blanks {
                    entries.push(RawListEntry::Blank);
                }
                entries.push(RawListEntry::Item(item));
                remaining = rest;
            }
            _ => break,
        }
    }

    log::debug!("List parsing complete, {} entries", entries.len());
    Ok((remaining, entries))
}
