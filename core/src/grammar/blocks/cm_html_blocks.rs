// CommonMark HTML Block Grammar (block types 1-7)
//
// Matched in priority order; each kind enforces its own start and end
// condition:
//
//   1: <pre / <script / <style / <textarea ... until a line with the
//      corresponding closing tag (any of the four, case-insensitive)
//   2: <!--        ... until a line containing -->
//   3: <?          ... until a line containing ?>
//   4: <! + letter ... until a line containing >
//   5: <![CDATA[   ... until a line containing ]]>
//   6: < or </ + known block tag name ... until a blank line
//   7: a complete open or closing tag alone on its line ... until a
//      blank line; never interrupts a paragraph
//
// Kind-6 tag names match longest-prefix first so `h1` is not swallowed
// by a shorter name. Kind-7 open tags may span lines: at most one
// newline is permitted between adjacent attributes.
//
// The literal content (leading indent included) is preserved verbatim.

use crate::ast::Html;
use crate::grammar::shared::{no_match, split_line, Span};
use nom::{IResult, Input};

const KIND1_TAGS: &[&str] = &["pre", "script", "style", "textarea"];

// CommonMark block tag names for kind 6
const KIND6_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center",
    "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main", "menu",
    "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param", "search", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

// Strip 0-3 leading spaces; None when the line is indented-code depth
fn after_indent(line: &str) -> Option<&str> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    Some(trimmed)
}

fn start_kind1(line: &str) -> bool {
    let body = match after_indent(line) {
        Some(body) => body,
        None => return false,
    };
    let lower = body.to_lowercase();
    KIND1_TAGS.iter().any(|tag| {
        lower.strip_prefix('<').and_then(|r| r.strip_prefix(tag)).is_some_and(|rest| {
            matches!(rest.chars().next(), None | Some(' ') | Some('\t') | Some('>'))
        })
    })
}

fn end_kind1(line: &str) -> bool {
    let lower = line.to_lowercase();
    KIND1_TAGS
        .iter()
        .any(|tag| lower.contains(&format!("</{}>", tag)))
}

fn start_kind6(line: &str) -> bool {
    let body = match after_indent(line) {
        Some(body) => body,
        None => return false,
    };
    let lower = body.to_lowercase();
    let name_start = if let Some(rest) = lower.strip_prefix("</") {
        rest
    } else if let Some(rest) = lower.strip_prefix('<') {
        rest
    } else {
        return false;
    };

    // Longest-prefix first so e.g. "h1" is not shadowed
    let mut tags: Vec<&str> = KIND6_TAGS.to_vec();
    tags.sort_by_key(|t| std::cmp::Reverse(t.len()));
    for tag in tags {
        if let Some(rest) = name_start.strip_prefix(tag) {
            let ok = match rest.chars().next() {
                None | Some(' ') | Some('\t') | Some('>') => true,
                Some('/') => rest[1..].starts_with('>'),
                _ => false,
            };
            if ok {
                return true;
            }
        }
    }
    false
}

/// Start conditions for kinds 1-6: the set that may interrupt a
/// paragraph (kind 7 explicitly may not).
pub fn html_interrupts(line: &str) -> bool {
    let body = match after_indent(line) {
        Some(body) => body,
        None => return false,
    };
    start_kind1(line)
        || body.starts_with("<!--")
        || body.starts_with("<?")
        || (body.starts_with("<!")
            && body[2..].chars().next().is_some_and(|c| c.is_ascii_alphabetic()))
        || body.starts_with("<![CDATA[")
        || start_kind6(line)
}

// ---------------------------------------------------------------------------
// Kind 7: complete open / closing tags
// ---------------------------------------------------------------------------

fn tag_name_len(s: &str) -> usize {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return 0,
    }
    1 + chars
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .count()
}

fn attr_name_len(s: &str) -> usize {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return 0,
    }
    1 + chars
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-'))
        .count()
}

// Whitespace between attributes: spaces/tabs with at most one newline.
// Returns consumed bytes, or None when a second newline aborts the tag.
fn attr_gap(s: &str) -> Option<usize> {
    let mut newlines = 0;
    let mut bytes = 0;
    for ch in s.chars() {
        match ch {
            ' ' | '\t' => bytes += 1,
            '\n' => {
                newlines += 1;
                if newlines > 1 {
                    return None;
                }
                bytes += 1;
            }
            _ => break,
        }
    }
    Some(bytes)
}

fn attr_value_len(s: &str) -> Option<usize> {
    match s.chars().next() {
        Some('"') => {
            let end = s[1..].find('"')?;
            if s[1..1 + end].contains('\n') {
                return None;
            }
            Some(end + 2)
        }
        Some('\'') => {
            let end = s[1..].find('\'')?;
            if s[1..1 + end].contains('\n') {
                return None;
            }
            Some(end + 2)
        }
        _ => {
            let len: usize = s
                .chars()
                .take_while(|c| !matches!(c, ' ' | '\t' | '\n' | '"' | '\'' | '=' | '<' | '>' | '`'))
                .map(char::len_utf8)
                .sum();
            if len == 0 {
                None
            } else {
                Some(len)
            }
        }
    }
}

// A complete open tag: <name (ws attr)* ws? /? > with attribute values
// unquoted, single- or double-quoted. Returns (consumed bytes, name).
fn parse_open_tag(s: &str) -> Option<(usize, String)> {
    let rest = s.strip_prefix('<')?;
    let name_len = tag_name_len(rest);
    if name_len == 0 {
        return None;
    }
    let name = rest[..name_len].to_lowercase();
    let mut pos = 1 + name_len;

    loop {
        let r = &s[pos..];
        if r.starts_with("/>") {
            return Some((pos + 2, name));
        }
        if r.starts_with('>') {
            return Some((pos + 1, name));
        }

        let gap = attr_gap(r)?;
        if gap == 0 {
            return None;
        }
        pos += gap;

        let r = &s[pos..];
        if r.starts_with("/>") {
            return Some((pos + 2, name));
        }
        if r.starts_with('>') {
            return Some((pos + 1, name));
        }

        let name_len = attr_name_len(r);
        if name_len == 0 {
            return None;
        }
        pos += name_len;

        // Optional value
        let r = &s[pos..];
        let ws = r.chars().take_while(|&c| c == ' ' || c == '\t').count();
        if r[ws..].starts_with('=') {
            pos += ws + 1;
            let r = &s[pos..];
            let ws = r.chars().take_while(|&c| c == ' ' || c == '\t').count();
            pos += ws;
            pos += attr_value_len(&s[pos..])?;
        }
    }
}

fn parse_closing_tag(s: &str) -> Option<(usize, String)> {
    let rest = s.strip_prefix("</")?;
    let name_len = tag_name_len(rest);
    if name_len == 0 {
        return None;
    }
    let name = rest[..name_len].to_lowercase();
    let mut pos = 2 + name_len;
    let ws = s[pos..].chars().take_while(|&c| c == ' ' || c == '\t').count();
    pos += ws;
    if s[pos..].starts_with('>') {
        Some((pos + 1, name))
    } else {
        None
    }
}

// Kind-7 start: a complete tag, then only inline whitespace before the
// line ends. Returns bytes consumed through the tag's newline.
fn start_kind7(fragment: &str) -> Option<usize> {
    let body = after_indent(split_line(fragment).0)?;
    let indent = split_line(fragment).0.len() - body.len();
    let tag_input = &fragment[indent..];

    let tag_len = if let Some((len, name)) = parse_open_tag(tag_input) {
        if KIND1_TAGS.contains(&name.as_str()) {
            return None;
        }
        len
    } else if let Some((len, _)) = parse_closing_tag(tag_input) {
        len
    } else {
        return None;
    };

    // Only inline whitespace may follow on the tag's last line
    let after = &tag_input[tag_len..];
    let ws = after.chars().take_while(|&c| c == ' ' || c == '\t').count();
    match after[ws..].chars().next() {
        None => Some(indent + tag_len + ws),
        Some('\n') => Some(indent + tag_len + ws + 1),
        Some(_) => None,
    }
}

// ---------------------------------------------------------------------------
// Block assembly
// ---------------------------------------------------------------------------

// Consume lines from `fragment` until `end` matches (that line is
// included). Returns (content, consumed).
fn take_until_line_matches(fragment: &str, end: impl Fn(&str) -> bool) -> (String, usize) {
    let mut consumed = 0;
    let mut content_end = 0;
    let mut rest = fragment;
    loop {
        let (line, after, had_newline) = split_line(rest);
        consumed += line.len() + usize::from(had_newline);
        content_end += line.len();
        if end(line) || (after.is_empty() && !had_newline) {
            break;
        }
        content_end += 1; // the newline stays inside the content
        rest = after;
    }
    (fragment[..content_end].to_string(), consumed)
}

// Consume lines until a blank line (left unconsumed).
fn take_until_blank(fragment: &str) -> (String, usize) {
    let mut consumed = 0;
    let mut content_end = 0;
    let mut rest = fragment;
    let mut first = true;
    loop {
        let (line, after, had_newline) = split_line(rest);
        if line.trim().is_empty() {
            break;
        }
        if !first {
            content_end += 1;
        }
        first = false;
        consumed += line.len() + usize::from(had_newline);
        content_end += line.len();
        if after.is_empty() && !had_newline {
            break;
        }
        rest = after;
    }
    (fragment[..content_end].to_string(), consumed)
}

/// Parse an HTML block of any kind, trying kinds 1-7 in order.
pub fn html_block(input: Span) -> IResult<Span, Html> {
    let start = input;
    let fragment = input.fragment();
    let (first, _, _) = split_line(fragment);
    let body = match after_indent(first) {
        Some(body) if body.starts_with('<') => body,
        _ => return Err(no_match(start)),
    };

    log::debug!(
        "Trying HTML block at: {:?}",
        crate::logic::safe_preview(first, 40)
    );

    // Kind 1: raw content tags
    if start_kind1(first) {
        let (content, consumed) = take_until_line_matches(fragment, end_kind1);
        return Ok((input.take_from(consumed), Html::new(1, content)));
    }
    // Kind 2: comments
    if body.starts_with("<!--") {
        let (content, consumed) = take_until_line_matches(fragment, |l| l.contains("-->"));
        return Ok((input.take_from(consumed), Html::new(2, content)));
    }
    // Kind 3: processing instructions
    if body.starts_with("<?") {
        let (content, consumed) = take_until_line_matches(fragment, |l| l.contains("?>"));
        return Ok((input.take_from(consumed), Html::new(3, content)));
    }
    // Kind 5 before 4: "<![CDATA[" also starts with "<!"
    if body.starts_with("<![CDATA[") {
        let (content, consumed) = take_until_line_matches(fragment, |l| l.contains("]]>"));
        return Ok((input.take_from(consumed), Html::new(5, content)));
    }
    // Kind 4: declarations
    if body.starts_with("<!")
        && body[2..].chars().next().is_some_and(|c| c.is_ascii_alphabetic())
    {
        let (content, consumed) = take_until_line_matches(fragment, |l| l.contains('>'));
        return Ok((input.take_from(consumed), Html::new(4, content)));
    }
    // Kind 6: known block tags, until blank line
    if start_kind6(first) {
        let (content, consumed) = take_until_blank(fragment);
        return Ok((input.take_from(consumed), Html::new(6, content)));
    }
    // Kind 7: a complete tag on its own line(s), until blank line
    if let Some(tag_consumed) = start_kind7(fragment) {
        let tag_content_len = fragment[..tag_consumed]
            .strip_suffix('\n')
            .map(str::len)
            .unwrap_or(tag_consumed);
        let (rest_content, rest_consumed) = take_until_blank(&fragment[tag_consumed..]);
        let mut content = fragment[..tag_content_len].to_string();
        if !rest_content.is_empty() {
            content.push('\n');
            content.push_str(&rest_content);
        }
        return Ok((
            input.take_from(tag_consumed + rest_consumed),
            Html::new(7, content),
        ));
    }

    Err(no_match(start))
}
