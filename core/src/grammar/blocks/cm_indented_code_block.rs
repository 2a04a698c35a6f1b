// CommonMark Indented Code Block Grammar
//
// Rules:
// - Opens on a non-blank line with at least 4 columns of leading
//   whitespace (tab counts as 4; 3 spaces + tab qualifies)
// - Continues over lines with >= 4 columns of indentation
// - Entirely blank lines are retained when indented content follows
// - A non-blank line under 4 columns terminates the block and is not
//   consumed
//
// Source lines are stored verbatim, indentation included, so the block
// round-trips exactly.

use crate::ast::IndentedCodeBlock;
use crate::grammar::shared::{count_indentation, no_match, split_line, Span};
use nom::{IResult, Input};

pub fn indented_code_block(input: Span) -> IResult<Span, IndentedCodeBlock> {
    log::debug!(
        "Trying indented code block at: {:?}",
        crate::logic::safe_preview(input.fragment(), 40)
    );

    let start = input;

    let (first, _, _) = split_line(input.fragment());
    if first.trim().is_empty() || count_indentation(first) < 4 {
        return Err(no_match(start));
    }

    let mut lines: Vec<String> = Vec::new();
    let mut consumed = 0;
    let mut rest = *input.fragment();

    loop {
        let (line, after, had_newline) = split_line(rest);

        if line.trim().is_empty() {
            if lines.is_empty() {
                break;
            }
            // Only keep blank lines when indented content follows
            let mut probe = after;
            let mut pending = vec![(line, had_newline)];
            let continues = loop {
                let (next, next_after, next_newline) = split_line(probe);
                if next.trim().is_empty() {
                    if next.is_empty() && !next_newline {
                        break false; // end of input
                    }
                    pending.push((next, next_newline));
                    probe = next_after;
                    continue;
                }
                break count_indentation(next) >= 4;
            };
            if !continues {
                break;
            }
            for (blank, blank_newline) in pending {
                lines.push(blank.to_string());
                consumed += blank.len() + usize::from(blank_newline);
                rest = &rest[blank.len() + usize::from(blank_newline)..];
            }
            continue;
        }

        if count_indentation(line) < 4 {
            break;
        }

        lines.push(line.to_string());
        consumed += line.len() + usize::from(had_newline);
        rest = after;

        if after.is_empty() && !had_newline {
            break;
        }
    }

    if lines.is_empty() {
        return Err(no_match(start));
    }

    log::debug!("Parsed indented code block: {} lines", lines.len());
    Ok((input.take_from(consumed), IndentedCodeBlock::new(lines)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_indented_single_line() {
        let (rest, node) = indented_code_block(Span::new("    code\nafter")).unwrap();
        assert_eq!(node.lines, vec!["    code"]);
        assert_eq!(*rest.fragment(), "after");
    }

    #[test]
    fn smoke_test_indented_tab() {
        let (_, node) = indented_code_block(Span::new("\tcode\n")).unwrap();
        assert_eq!(node.lines, vec!["\tcode"]);
    }

    #[test]
    fn smoke_test_indented_three_spaces_and_tab() {
        // 3 spaces + tab expands past 4 columns
        assert!(indented_code_block(Span::new("   \tcode\n")).is_ok());
    }

    #[test]
    fn smoke_test_indented_three_spaces_fails() {
        assert!(indented_code_block(Span::new("   code\n")).is_err());
    }

    #[test]
    fn smoke_test_indented_internal_blank_retained() {
        let (rest, node) = indented_code_block(Span::new("    a\n\n    b\nplain\n")).unwrap();
        assert_eq!(node.lines, vec!["    a", "", "    b"]);
        assert_eq!(*rest.fragment(), "plain\n");
    }

    #[test]
    fn smoke_test_indented_trailing_blank_not_consumed() {
        let (rest, node) = indented_code_block(Span::new("    a\n\nplain\n")).unwrap();
        assert_eq!(node.lines, vec!["    a"]);
        assert_eq!(*rest.fragment(), "\nplain\n");
    }

    #[test]
    fn smoke_test_indented_markdown_round_trip() {
        let (_, node) = indented_code_block(Span::new("    a\n     b\n")).unwrap();
        assert_eq!(node.markdown(), "    a\n     b");
    }

    #[test]
    fn smoke_test_indented_rejects_blank_opener() {
        assert!(indented_code_block(Span::new("\n    code\n")).is_err());
    }
}
