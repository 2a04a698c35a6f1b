// Depth-first block driver
//
// The driver owns the priority-ordered rule list and the closer
// discipline: at every position the closers are tried first (a match
// rewinds to just before the closer and returns), then each rule in
// order. Container rules (headings, lists, blockquotes) re-invoke the
// driver, either in-stream (headings collect children until a heading
// of the same or lower level) or over a de-framed sub-input (list
// items, blockquotes). The paragraph fallback makes a dead end
// unreachable on well-formed input; hitting one is a hard error, as is
// exceeding the nesting guard.

use crate::ast::{
    AtxHeading, BlankLine, Block, BlockQuote, Document, OrderedList, OrderedListItem, Paragraph,
    SetextHeading, TaskList, TaskListItem, UnorderedList, UnorderedListItem,
};
use crate::grammar::blocks as grammar;
use crate::grammar::blocks::{RawListEntry, RawListItem, RawMarker};
use crate::grammar::shared::Span;
use crate::grammar::task;
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use rrule::Tz;

// Nesting guard: headings in lists in blockquotes recurse; pathological
// input must not exhaust the stack
const MAX_DEPTH: usize = 64;

/// Immutable parse context threaded through the driver. The reference
/// time anchors recurrence rules (`dtstart`).
#[derive(Debug, Clone)]
pub struct ParserContext {
    pub reference: DateTime<Tz>,
}

impl ParserContext {
    pub fn new(reference: DateTime<Utc>) -> Self {
        Self {
            reference: reference.with_timezone(&Tz::UTC),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockRule {
    FrontMatter,
    ThematicBreak,
    List,
    BlockQuote,
    IndentedCode,
    FencedCode,
    AtxHeading,
    SetextHeading,
    Html,
    BlankLine,
    Paragraph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closer {
    Eof,
    AtxHeadingAtMost(u8),
    SetextHeadingAny,
}

// Top-level priority order
const TOP_RULES: &[BlockRule] = &[
    BlockRule::FrontMatter,
    BlockRule::ThematicBreak,
    BlockRule::List,
    BlockRule::BlockQuote,
    BlockRule::IndentedCode,
    BlockRule::FencedCode,
    BlockRule::AtxHeading,
    BlockRule::SetextHeading,
    BlockRule::Html,
    BlockRule::BlankLine,
    BlockRule::Paragraph,
];

// Sub-inputs (list items, blockquotes): everything except front matter,
// which only exists at document offset zero
const NESTED_RULES: &[BlockRule] = &[
    BlockRule::ThematicBreak,
    BlockRule::List,
    BlockRule::BlockQuote,
    BlockRule::IndentedCode,
    BlockRule::FencedCode,
    BlockRule::AtxHeading,
    BlockRule::SetextHeading,
    BlockRule::Html,
    BlockRule::BlankLine,
    BlockRule::Paragraph,
];

// Heading children: setext headings act as closers here, never as
// children
const HEADING_CHILD_RULES: &[BlockRule] = &[
    BlockRule::ThematicBreak,
    BlockRule::List,
    BlockRule::BlockQuote,
    BlockRule::IndentedCode,
    BlockRule::FencedCode,
    BlockRule::AtxHeading,
    BlockRule::Html,
    BlockRule::BlankLine,
    BlockRule::Paragraph,
];

/// Parse a document with the given recurrence anchor.
pub fn parse(input: &str, reference: DateTime<Utc>) -> Result<Document> {
    parse_with_context(input, &ParserContext::new(reference))
}

pub fn parse_with_context(input: &str, ctx: &ParserContext) -> Result<Document> {
    log::info!("Starting parse: {} bytes", input.len());

    let (rest, children) = parse_blocks(Span::new(input), TOP_RULES, &[Closer::Eof], 0, ctx)?;
    if !rest.fragment().is_empty() {
        bail!(
            "parse stopped before end of input at offset {}",
            rest.location_offset()
        );
    }

    log::debug!("Parsed {} top-level blocks", children.len());
    Ok(Document { children })
}

fn closer_matches(closer: Closer, input: Span) -> bool {
    match closer {
        Closer::Eof => input.fragment().is_empty(),
        Closer::AtxHeadingAtMost(level) => grammar::atx_heading_opener(input)
            .map(|(_, opener)| opener.level <= level)
            .unwrap_or(false),
        Closer::SetextHeadingAny => grammar::setext_heading_opener(input).is_ok(),
    }
}

fn parse_blocks<'a>(
    mut input: Span<'a>,
    rules: &[BlockRule],
    closers: &[Closer],
    depth: usize,
    ctx: &ParserContext,
) -> Result<(Span<'a>, Vec<Block>)> {
    if depth > MAX_DEPTH {
        bail!("block nesting exceeded {} levels", MAX_DEPTH);
    }

    let mut blocks = Vec::new();

    'collect: loop {
        // Closers first: rewind to just before the closer and return
        if closers.iter().any(|&c| closer_matches(c, input)) {
            break;
        }

        let offset_before = input.location_offset();
        for &rule in rules {
            if let Some((rest, block)) = apply_rule(rule, input, depth, ctx)? {
                if rest.location_offset() == offset_before {
                    bail!("block parser made no progress at offset {}", offset_before);
                }
                blocks.push(block);
                input = rest;
                continue 'collect;
            }
        }

        // Paragraph is the universal fallback; reaching this is a bug
        log::error!("No block parser matched at offset {}", offset_before);
        bail!("no block parser matched at offset {}", offset_before);
    }

    Ok((input, blocks))
}

fn apply_rule<'a>(
    rule: BlockRule,
    input: Span<'a>,
    depth: usize,
    ctx: &ParserContext,
) -> Result<Option<(Span<'a>, Block)>> {
    match rule {
        BlockRule::FrontMatter => Ok(grammar::front_matter(input)
            .ok()
            .map(|(rest, node)| (rest, Block::FrontMatter(node)))),
        BlockRule::ThematicBreak => Ok(grammar::thematic_break(input)
            .ok()
            .map(|(rest, node)| (rest, Block::ThematicBreak(node)))),
        BlockRule::IndentedCode => Ok(grammar::indented_code_block(input)
            .ok()
            .map(|(rest, node)| (rest, Block::IndentedCodeBlock(node)))),
        BlockRule::FencedCode => Ok(grammar::fenced_code_block(input)
            .ok()
            .map(|(rest, node)| (rest, Block::FencedCodeBlock(node)))),
        BlockRule::Html => Ok(grammar::html_block(input)
            .ok()
            .map(|(rest, node)| (rest, Block::Html(node)))),
        BlockRule::BlankLine => Ok(grammar::blank_line(input)
            .ok()
            .map(|(rest, node)| (rest, Block::BlankLine(node)))),
        BlockRule::Paragraph => Ok(grammar::paragraph(input)
            .ok()
            .map(|(rest, node)| (rest, Block::Paragraph(node)))),

        BlockRule::AtxHeading => match grammar::atx_heading_opener(input) {
            Ok((rest, opener)) => {
                let closers = [
                    Closer::AtxHeadingAtMost(opener.level),
                    Closer::SetextHeadingAny,
                    Closer::Eof,
                ];
                let (rest, children) =
                    parse_blocks(rest, HEADING_CHILD_RULES, &closers, depth + 1, ctx)?;
                Ok(Some((
                    rest,
                    Block::AtxHeading(AtxHeading::new(
                        opener.indent,
                        opener.level,
                        opener.title,
                        children,
                    )),
                )))
            }
            Err(_) => Ok(None),
        },

        BlockRule::SetextHeading => match grammar::setext_heading_opener(input) {
            Ok((rest, opener)) => {
                let closers = [
                    Closer::AtxHeadingAtMost(opener.level),
                    Closer::SetextHeadingAny,
                    Closer::Eof,
                ];
                let (rest, children) =
                    parse_blocks(rest, HEADING_CHILD_RULES, &closers, depth + 1, ctx)?;
                Ok(Some((
                    rest,
                    Block::SetextHeading(SetextHeading::new(
                        opener.title,
                        opener.underline,
                        children,
                    )),
                )))
            }
            Err(_) => Ok(None),
        },

        BlockRule::BlockQuote => match grammar::blockquote(input) {
            Ok((rest, (indent, content))) => {
                let children = parse_sub_input(&content, depth, ctx)?;
                Ok(Some((
                    rest,
                    Block::BlockQuote(BlockQuote::new(indent, children)),
                )))
            }
            Err(_) => Ok(None),
        },

        BlockRule::List => match grammar::list(input) {
            Ok((rest, entries)) => {
                let block = build_list(entries, depth, ctx)?;
                Ok(Some((rest, block)))
            }
            Err(_) => Ok(None),
        },
    }
}

// Children of a de-framed sub-input (list item or blockquote content)
fn parse_sub_input(content: &str, depth: usize, ctx: &ParserContext) -> Result<Vec<Block>> {
    if content.is_empty() {
        return Ok(Vec::new());
    }
    let (_, children) = parse_blocks(
        Span::new(content),
        NESTED_RULES,
        &[Closer::Eof],
        depth + 1,
        ctx,
    )?;
    Ok(children)
}

fn build_list(entries: Vec<RawListEntry>, depth: usize, ctx: &ParserContext) -> Result<Block> {
    let mut children: Vec<Block> = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            RawListEntry::Blank => children.push(Block::BlankLine(BlankLine::new())),
            RawListEntry::Item(item) => {
                let item_children = parse_sub_input(&item.content, depth, ctx)?;
                children.push(build_item(item, item_children, ctx));
            }
        }
    }

    // The first entry is always an item; it decides the list kind
    let block = match children.first() {
        Some(Block::OrderedListItem(item)) => {
            let start = item.number();
            Block::OrderedList(OrderedList::new(start, children))
        }
        Some(Block::TaskListItem(_)) => Block::TaskList(TaskList::new(children)),
        _ => Block::UnorderedList(UnorderedList::new(children)),
    };
    Ok(block)
}

fn build_item(raw: RawListItem, children: Vec<Block>, ctx: &ParserContext) -> Block {
    let bullet = match raw.marker_kind {
        RawMarker::Ordered { .. } => {
            return Block::OrderedListItem(OrderedListItem::new(
                raw.indent,
                raw.marker,
                raw.internal,
                children,
            ));
        }
        RawMarker::Bullet(bullet) => bullet,
    };

    // Task promotion: a first-child paragraph opening with a status
    // bracket turns the item into a task
    let promotion = match children.first() {
        Some(Block::Paragraph(paragraph)) => {
            let (first_line, remainder) = match paragraph.text.split_once('\n') {
                Some((first, rest)) => (first, Some(rest.to_string())),
                None => (paragraph.text.as_str(), None),
            };
            task::parse_task_line(first_line, ctx.reference).map(|parts| (parts, remainder))
        }
        _ => None,
    };

    match promotion {
        Some((parts, remainder)) => {
            let mut task_children: Vec<Block> = Vec::new();
            if let Some(text) = remainder {
                task_children.push(Block::Paragraph(Paragraph::new(text)));
            }
            task_children.extend(children.into_iter().skip(1));
            Block::TaskListItem(TaskListItem::new(
                raw.indent,
                bullet,
                raw.internal,
                parts.status,
                parts.status_char,
                parts.text,
                parts.due,
                parts.scheduled,
                parts.completed,
                parts.priority,
                parts.every,
                task_children,
            ))
        }
        None => Block::UnorderedListItem(UnorderedListItem::new(
            raw.indent,
            bullet,
            raw.internal,
            children,
        )),
    }
}
