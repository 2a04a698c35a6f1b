// Shared types and helper functions for grammar modules

use nom::IResult;
use nom_locate::LocatedSpan;

/// Span type used throughout grammar modules
/// Wraps a string slice with location information for error reporting
pub type Span<'a> = LocatedSpan<&'a str>;

/// Build a nom "no match" error anchored at the given span.
///
/// Grammar functions restore their entry checkpoint by returning this;
/// `alt` and the block driver then try the next alternative.
pub fn no_match(at: Span) -> nom::Err<nom::error::Error<Span>> {
    nom::Err::Error(nom::error::Error::new(at, nom::error::ErrorKind::Tag))
}

/// Count the columns a run of whitespace occupies when it starts at
/// column `start`. Tabs advance to the next multiple of 4 relative to
/// the absolute column, so the same string can be wider or narrower
/// depending on where it sits.
pub fn columns_from(start: usize, ws: &str) -> usize {
    let mut col = start;
    for ch in ws.chars() {
        match ch {
            ' ' => col += 1,
            '\t' => col += 4 - (col % 4),
            _ => break,
        }
    }
    col - start
}

/// Leading-whitespace width of a line, in columns. This is
/// [`columns_from`] anchored at column 0, where every tab stop is a
/// multiple of 4.
///
/// # Examples
/// ```
/// use notedown_core::grammar::shared::count_indentation;
///
/// assert_eq!(count_indentation("  \tcode"), 4);
/// assert_eq!(count_indentation("- item"), 0);
/// ```
pub fn count_indentation(input: &str) -> usize {
    columns_from(0, input)
}

/// Split off the first line of `input`.
///
/// Returns `(line, rest, had_newline)` where `line` excludes the
/// terminating `\n` and `rest` starts after it. `had_newline` is false
/// only at end of input.
pub fn split_line(input: &str) -> (&str, &str, bool) {
    match input.find('\n') {
        Some(pos) => (&input[..pos], &input[pos + 1..], true),
        None => (input, "", false),
    }
}

/// Parse 0-3 leading spaces. Fails if 4+ effective columns of
/// whitespace follow (that position belongs to an indented code block).
///
/// Only literal spaces are consumed; a tab in the first three columns
/// already expands past the limit.
pub fn block_indent(input: Span) -> IResult<Span, Span> {
    use nom::Input;

    if count_indentation(input.fragment()) > 3 {
        return Err(no_match(input));
    }
    let bytes = input
        .fragment()
        .chars()
        .take_while(|&c| c == ' ')
        .take(3)
        .count();
    Ok((input.take_from(bytes), input.take(bytes)))
}

/// Strip exactly `columns` effective columns of leading whitespace from
/// a line, preserving any excess.
///
/// When a tab straddles the boundary, the overshoot is re-emitted as
/// spaces so nested indented code keeps its required columns.
pub fn strip_columns(line: &str, columns: usize) -> String {
    let mut col = 0;
    let mut iter = line.char_indices();
    for (idx, ch) in &mut iter {
        if col >= columns {
            return line[idx..].to_string();
        }
        match ch {
            ' ' => col += 1,
            '\t' => {
                let width = 4 - (col % 4);
                col += width;
                if col > columns {
                    // Tab straddles the boundary: keep the overshoot as spaces
                    let mut rest = " ".repeat(col - columns);
                    rest.push_str(&line[idx + 1..]);
                    return rest;
                }
            }
            _ => return line[idx..].to_string(),
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_count_indentation_boundaries() {
        // The indented-code threshold: three spaces stay under it, a
        // tab at column 0 clears it
        assert_eq!(count_indentation("   # heading"), 3);
        assert_eq!(count_indentation("\t- item"), 4);
        // Tabs land on the next 4-column stop, they do not add 4
        assert_eq!(count_indentation(" \t\tx"), 8);
        // Only leading whitespace counts
        assert_eq!(count_indentation("a\tb"), 0);
        assert_eq!(count_indentation(""), 0);
    }

    #[test]
    fn smoke_test_columns_from_depends_on_start() {
        // The same tab is narrower when the marker already sits at an
        // odd column
        assert_eq!(columns_from(0, "\t"), 4);
        assert_eq!(columns_from(2, "\t"), 2);
        assert_eq!(columns_from(3, " \t"), 1 + 4);
        assert_eq!(columns_from(5, ""), 0);
    }

    #[test]
    fn smoke_test_split_line() {
        assert_eq!(split_line("a\nb"), ("a", "b", true));
        assert_eq!(split_line("a"), ("a", "", false));
        assert_eq!(split_line("\nrest"), ("", "rest", true));
        assert_eq!(split_line(""), ("", "", false));
    }

    #[test]
    fn smoke_test_block_indent() {
        let (rest, indent) = block_indent(Span::new("   x")).unwrap();
        assert_eq!(*indent.fragment(), "   ");
        assert_eq!(*rest.fragment(), "x");

        assert!(block_indent(Span::new("    x")).is_err());
        assert!(block_indent(Span::new("\tx")).is_err());
    }

    #[test]
    fn smoke_test_strip_columns() {
        assert_eq!(strip_columns("    code", 2), "  code");
        assert_eq!(strip_columns("  text", 2), "text");
        assert_eq!(strip_columns("\tcode", 2), "  code");
        assert_eq!(strip_columns("", 2), "");
        assert_eq!(strip_columns("x", 0), "x");
    }
}
