// Block node types: the typed forest produced by the parser
//
// Every node keeps enough surface trivia (indentation, fence runs,
// marker styles, internal whitespace) to reproduce its source text via
// `markdown()`. A digest of the node's own framing is captured at
// construction; `modified()` re-hashes and compares, so containers do
// not report their children's edits.

use chrono::NaiveDate;
use rrule::{RRule, Validated};
use xxhash_rust::xxh64::xxh64;

use crate::grammar::shared::columns_from;

fn digest_of(text: &str) -> u64 {
    xxh64(text.as_bytes(), 0)
}

/// Serialize a child list: sibling blocks join with a single newline.
pub(crate) fn join_children(children: &[Block]) -> String {
    children
        .iter()
        .map(Block::markdown)
        .collect::<Vec<_>>()
        .join("\n")
}

// Re-emit list-item content: the first line carries the marker, every
// later non-empty line carries the item's continuation columns.
fn indent_item_content(first_prefix: &str, width: usize, content: &str) -> String {
    let mut out = String::new();
    for (i, line) in content.split('\n').enumerate() {
        if i == 0 {
            out.push_str(first_prefix);
            out.push_str(line);
        } else {
            out.push('\n');
            if !line.is_empty() {
                for _ in 0..width {
                    out.push(' ');
                }
                out.push_str(line);
            }
        }
    }
    out
}

/// Task status parsed from the bracket character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Todo,
    Doing,
    Done,
    Blocked,
    Abandoned,
}

impl Status {
    /// Map a status bracket character. Unknown characters are no status.
    pub fn from_char(c: char) -> Option<Status> {
        match c {
            ' ' => Some(Status::Todo),
            'x' | 'X' => Some(Status::Done),
            '/' => Some(Status::Doing),
            'b' | 'B' => Some(Status::Blocked),
            'a' | 'A' => Some(Status::Abandoned),
            _ => None,
        }
    }
}

/// A task's recurrence: the validated rule plus the literal `every:`
/// expression. The literal is authoritative for round-trip, the rule
/// for semantics.
#[derive(Debug, Clone)]
pub struct Recurrence {
    pub rule: RRule<Validated>,
    pub text: String,
}

impl PartialEq for Recurrence {
    fn eq(&self, other: &Self) -> bool {
        // RFC 5545 text captures the full option set
        self.text == other.text && self.rule.to_string() == other.rule.to_string()
    }
}

// ============================================================================
// Block: one variant per block kind
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    FrontMatter(FrontMatter),
    ThematicBreak(ThematicBreak),
    AtxHeading(AtxHeading),
    SetextHeading(SetextHeading),
    FencedCodeBlock(FencedCodeBlock),
    IndentedCodeBlock(IndentedCodeBlock),
    Html(Html),
    BlockQuote(BlockQuote),
    OrderedList(OrderedList),
    UnorderedList(UnorderedList),
    TaskList(TaskList),
    OrderedListItem(OrderedListItem),
    UnorderedListItem(UnorderedListItem),
    TaskListItem(TaskListItem),
    Paragraph(Paragraph),
    BlankLine(BlankLine),
}

impl Block {
    /// Serialize this block back to its Markdown source form (no
    /// trailing newline; siblings join with `\n`).
    pub fn markdown(&self) -> String {
        match self {
            Block::FrontMatter(b) => b.markdown(),
            Block::ThematicBreak(b) => b.markdown(),
            Block::AtxHeading(b) => b.markdown(),
            Block::SetextHeading(b) => b.markdown(),
            Block::FencedCodeBlock(b) => b.markdown(),
            Block::IndentedCodeBlock(b) => b.markdown(),
            Block::Html(b) => b.markdown(),
            Block::BlockQuote(b) => b.markdown(),
            Block::OrderedList(b) => b.markdown(),
            Block::UnorderedList(b) => b.markdown(),
            Block::TaskList(b) => b.markdown(),
            Block::OrderedListItem(b) => b.markdown(),
            Block::UnorderedListItem(b) => b.markdown(),
            Block::TaskListItem(b) => b.markdown(),
            Block::Paragraph(b) => b.markdown(),
            Block::BlankLine(b) => b.markdown(),
        }
    }

    /// True when the node's own serializable framing has diverged from
    /// its construction-time digest. Children are not consulted.
    pub fn modified(&self) -> bool {
        match self {
            Block::FrontMatter(b) => b.modified(),
            Block::ThematicBreak(b) => b.modified(),
            Block::AtxHeading(b) => b.modified(),
            Block::SetextHeading(b) => b.modified(),
            Block::FencedCodeBlock(b) => b.modified(),
            Block::IndentedCodeBlock(b) => b.modified(),
            Block::Html(b) => b.modified(),
            Block::BlockQuote(b) => b.modified(),
            Block::OrderedList(b) => b.modified(),
            Block::UnorderedList(b) => b.modified(),
            Block::TaskList(b) => b.modified(),
            Block::OrderedListItem(b) => b.modified(),
            Block::UnorderedListItem(b) => b.modified(),
            Block::TaskListItem(b) => b.modified(),
            Block::Paragraph(b) => b.modified(),
            Block::BlankLine(b) => b.modified(),
        }
    }

    /// Ordered child list; empty for leaf blocks.
    pub fn children(&self) -> &[Block] {
        match self {
            Block::AtxHeading(b) => &b.children,
            Block::SetextHeading(b) => &b.children,
            Block::BlockQuote(b) => &b.children,
            Block::OrderedList(b) => &b.children,
            Block::UnorderedList(b) => &b.children,
            Block::TaskList(b) => &b.children,
            Block::OrderedListItem(b) => &b.children,
            Block::UnorderedListItem(b) => &b.children,
            Block::TaskListItem(b) => &b.children,
            _ => &[],
        }
    }

    /// Equivalence class for list membership: bullets must match for
    /// unordered and task items, terminators must match for ordered.
    pub fn same_type(&self, other: &Block) -> bool {
        match (self, other) {
            (Block::UnorderedListItem(a), Block::UnorderedListItem(b)) => a.bullet == b.bullet,
            (Block::TaskListItem(a), Block::TaskListItem(b)) => a.bullet == b.bullet,
            // Task promotion is per-item, so a bullet list may mix
            // plain and task items of one bullet
            (Block::UnorderedListItem(a), Block::TaskListItem(b)) => a.bullet == b.bullet,
            (Block::TaskListItem(a), Block::UnorderedListItem(b)) => a.bullet == b.bullet,
            (Block::OrderedListItem(a), Block::OrderedListItem(b)) => {
                a.marker.chars().last() == b.marker.chars().last()
            }
            _ => false,
        }
    }
}

// ============================================================================
// Node structs
// ============================================================================

/// YAML front matter delimited by `---` fences at the very start of the
/// document. The raw body is the round-trip authority; `metadata` holds
/// the decoded mapping (absent for whitespace-only bodies).
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub body: Option<String>,
    pub metadata: Option<serde_yaml::Mapping>,
    digest: u64,
}

impl FrontMatter {
    pub fn new(body: Option<String>, metadata: Option<serde_yaml::Mapping>) -> Self {
        let mut node = Self {
            body,
            metadata,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn markdown(&self) -> String {
        match &self.body {
            Some(body) => format!("---\n{}\n---", body),
            None => "---\n---".to_string(),
        }
    }

    fn fingerprint(&self) -> String {
        self.markdown()
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// Thematic break. The literal line is preserved (`- - -` keeps its
/// internal spacing).
#[derive(Debug, Clone, PartialEq)]
pub struct ThematicBreak {
    pub break_char: char,
    pub literal: String,
    digest: u64,
}

impl ThematicBreak {
    pub fn new(break_char: char, literal: String) -> Self {
        let mut node = Self {
            break_char,
            literal,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn markdown(&self) -> String {
        self.literal.clone()
    }

    fn fingerprint(&self) -> String {
        self.literal.clone()
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// ATX heading. `title` is the raw rest of the opener line, including
/// the single separator space when present. Child blocks run until a
/// heading of the same or lower level.
#[derive(Debug, Clone, PartialEq)]
pub struct AtxHeading {
    pub indent: usize,
    pub level: u8,
    pub title: String,
    pub children: Vec<Block>,
    digest: u64,
}

impl AtxHeading {
    pub fn new(indent: usize, level: u8, title: String, children: Vec<Block>) -> Self {
        let mut node = Self {
            indent,
            level,
            title,
            children,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    fn opener(&self) -> String {
        let mut line = " ".repeat(self.indent);
        for _ in 0..self.level {
            line.push('#');
        }
        line.push_str(&self.title);
        line
    }

    pub fn markdown(&self) -> String {
        let mut out = self.opener();
        for child in &self.children {
            out.push('\n');
            out.push_str(&child.markdown());
        }
        out
    }

    fn fingerprint(&self) -> String {
        self.opener()
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// Setext heading: raw title lines plus the underline line. Level 1
/// when the underline is `=`, level 2 when `-`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetextHeading {
    pub title: String,
    pub underline: String,
    pub children: Vec<Block>,
    digest: u64,
}

impl SetextHeading {
    pub fn new(title: String, underline: String, children: Vec<Block>) -> Self {
        let mut node = Self {
            title,
            underline,
            children,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn level(&self) -> u8 {
        if self.underline.contains('=') {
            1
        } else {
            2
        }
    }

    pub fn markdown(&self) -> String {
        let mut out = format!("{}\n{}", self.title, self.underline);
        for child in &self.children {
            out.push('\n');
            out.push_str(&child.markdown());
        }
        out
    }

    fn fingerprint(&self) -> String {
        format!("{}\n{}", self.title, self.underline)
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// Fenced code block. `open`/`close` keep indent + fence run verbatim;
/// `close` is empty when the block ran to EOF. `info` is the raw
/// infostring. Body lines are verbatim and unstripped.
#[derive(Debug, Clone, PartialEq)]
pub struct FencedCodeBlock {
    pub open: String,
    pub info: String,
    pub body: Vec<String>,
    pub close: String,
    digest: u64,
}

impl FencedCodeBlock {
    pub fn new(open: String, info: String, body: Vec<String>, close: String) -> Self {
        let mut node = Self {
            open,
            info,
            body,
            close,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn markdown(&self) -> String {
        let mut lines = Vec::with_capacity(self.body.len() + 2);
        lines.push(format!("{}{}", self.open, self.info));
        lines.extend(self.body.iter().cloned());
        if !self.close.is_empty() {
            lines.push(self.close.clone());
        }
        lines.join("\n")
    }

    fn fingerprint(&self) -> String {
        self.markdown()
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// Indented code block: the source lines verbatim, including blank
/// lines internal to the block.
#[derive(Debug, Clone, PartialEq)]
pub struct IndentedCodeBlock {
    pub lines: Vec<String>,
    digest: u64,
}

impl IndentedCodeBlock {
    pub fn new(lines: Vec<String>) -> Self {
        let mut node = Self { lines, digest: 0 };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn markdown(&self) -> String {
        self.lines.join("\n")
    }

    fn fingerprint(&self) -> String {
        self.markdown()
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// Raw HTML block; `kind` is the CommonMark block type 1-7.
#[derive(Debug, Clone, PartialEq)]
pub struct Html {
    pub kind: u8,
    pub content: String,
    digest: u64,
}

impl Html {
    pub fn new(kind: u8, content: String) -> Self {
        let mut node = Self {
            kind,
            content,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn markdown(&self) -> String {
        self.content.clone()
    }

    fn fingerprint(&self) -> String {
        self.content.clone()
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// Block quote. Children are parsed from de-prefixed text; the
/// serializer re-applies `indent + "> "` to every non-empty line and
/// `indent + ">"` to empty ones.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockQuote {
    pub indent: String,
    pub children: Vec<Block>,
    digest: u64,
}

impl BlockQuote {
    pub fn new(indent: String, children: Vec<Block>) -> Self {
        let mut node = Self {
            indent,
            children,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn markdown(&self) -> String {
        let content = join_children(&self.children);
        let mut out = String::new();
        for (i, line) in content.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&self.indent);
            if line.is_empty() {
                out.push('>');
            } else {
                out.push_str("> ");
                out.push_str(line);
            }
        }
        out
    }

    fn fingerprint(&self) -> String {
        format!("{}>", self.indent)
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// Ordered list: items sharing one terminator, with interleaved blank
/// lines. `start` is the first item's number.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedList {
    pub start: u32,
    pub children: Vec<Block>,
    digest: u64,
}

impl OrderedList {
    pub fn new(start: u32, children: Vec<Block>) -> Self {
        let mut node = Self {
            start,
            children,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn markdown(&self) -> String {
        join_children(&self.children)
    }

    fn fingerprint(&self) -> String {
        self.start.to_string()
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnorderedList {
    pub children: Vec<Block>,
    digest: u64,
}

impl UnorderedList {
    pub fn new(children: Vec<Block>) -> Self {
        let mut node = Self {
            children,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn markdown(&self) -> String {
        join_children(&self.children)
    }

    fn fingerprint(&self) -> String {
        String::new()
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// List of task items (plus interleaved blank lines).
#[derive(Debug, Clone, PartialEq)]
pub struct TaskList {
    pub children: Vec<Block>,
    digest: u64,
}

impl TaskList {
    pub fn new(children: Vec<Block>) -> Self {
        let mut node = Self {
            children,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn markdown(&self) -> String {
        join_children(&self.children)
    }

    fn fingerprint(&self) -> String {
        String::new()
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// Ordered list item. `marker` is the digits plus terminator (`3.` or
/// `3)`); `internal` is the whitespace between marker and content.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedListItem {
    pub indent: String,
    pub marker: String,
    pub internal: String,
    pub children: Vec<Block>,
    digest: u64,
}

impl OrderedListItem {
    pub fn new(indent: String, marker: String, internal: String, children: Vec<Block>) -> Self {
        let mut node = Self {
            indent,
            marker,
            internal,
            children,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn number(&self) -> u32 {
        self.marker
            .trim_end_matches(['.', ')'])
            .parse()
            .unwrap_or(0)
    }

    /// Columns continuation lines must carry.
    pub fn content_columns(&self) -> usize {
        let start = self.indent.len() + self.marker.len();
        start + columns_from(start, &self.internal)
    }

    pub fn markdown(&self) -> String {
        let prefix = format!("{}{}{}", self.indent, self.marker, self.internal);
        indent_item_content(&prefix, self.content_columns(), &join_children(&self.children))
    }

    fn fingerprint(&self) -> String {
        format!("{}{}{}", self.indent, self.marker, self.internal)
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnorderedListItem {
    pub indent: String,
    pub bullet: char,
    pub internal: String,
    pub children: Vec<Block>,
    digest: u64,
}

impl UnorderedListItem {
    pub fn new(indent: String, bullet: char, internal: String, children: Vec<Block>) -> Self {
        let mut node = Self {
            indent,
            bullet,
            internal,
            children,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn content_columns(&self) -> usize {
        let start = self.indent.len() + 1;
        start + columns_from(start, &self.internal)
    }

    pub fn markdown(&self) -> String {
        let prefix = format!("{}{}{}", self.indent, self.bullet, self.internal);
        indent_item_content(&prefix, self.content_columns(), &join_children(&self.children))
    }

    fn fingerprint(&self) -> String {
        format!("{}{}{}", self.indent, self.bullet, self.internal)
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// Task list item: an unordered item whose first paragraph opened with
/// a status bracket. Fields serialize in canonical order (due,
/// scheduled, completed, priority, every); the `every:` expression is
/// emitted verbatim from source.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskListItem {
    pub indent: String,
    pub bullet: char,
    pub internal: String,
    pub status: Status,
    pub status_char: char,
    pub text: String,
    pub due: Option<NaiveDate>,
    pub scheduled: Option<NaiveDate>,
    pub completed: Option<NaiveDate>,
    pub priority: Option<u32>,
    pub every: Option<Recurrence>,
    pub children: Vec<Block>,
    digest: u64,
}

impl TaskListItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        indent: String,
        bullet: char,
        internal: String,
        status: Status,
        status_char: char,
        text: String,
        due: Option<NaiveDate>,
        scheduled: Option<NaiveDate>,
        completed: Option<NaiveDate>,
        priority: Option<u32>,
        every: Option<Recurrence>,
        children: Vec<Block>,
    ) -> Self {
        let mut node = Self {
            indent,
            bullet,
            internal,
            status,
            status_char,
            text,
            due,
            scheduled,
            completed,
            priority,
            every,
            children,
            digest: 0,
        };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn content_columns(&self) -> usize {
        let start = self.indent.len() + 1;
        start + columns_from(start, &self.internal)
    }

    fn task_line(&self) -> String {
        let mut line = format!(
            "{}{}{}[{}] {}",
            self.indent, self.bullet, self.internal, self.status_char, self.text
        );
        if let Some(due) = self.due {
            line.push_str(&format!(" due:{}", due.format("%Y-%m-%d")));
        }
        if let Some(scheduled) = self.scheduled {
            line.push_str(&format!(" scheduled:{}", scheduled.format("%Y-%m-%d")));
        }
        if let Some(completed) = self.completed {
            line.push_str(&format!(" completed:{}", completed.format("%Y-%m-%d")));
        }
        if let Some(priority) = self.priority {
            line.push_str(&format!(" priority:{}", priority));
        }
        if let Some(every) = &self.every {
            line.push(' ');
            line.push_str(&every.text);
        }
        line
    }

    pub fn markdown(&self) -> String {
        let content = join_children(&self.children);
        if content.is_empty() {
            return self.task_line();
        }
        let mut out = self.task_line();
        for line in content.split('\n') {
            out.push('\n');
            if !line.is_empty() {
                for _ in 0..self.content_columns() {
                    out.push(' ');
                }
                out.push_str(line);
            }
        }
        out
    }

    fn fingerprint(&self) -> String {
        self.task_line()
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// Paragraph: the universal fallback. Text is raw, with internal
/// newlines preserved for multi-line paragraphs.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    digest: u64,
}

impl Paragraph {
    pub fn new(text: String) -> Self {
        let mut node = Self { text, digest: 0 };
        node.digest = digest_of(&node.fingerprint());
        node
    }

    pub fn markdown(&self) -> String {
        self.text.clone()
    }

    fn fingerprint(&self) -> String {
        self.text.clone()
    }

    pub fn modified(&self) -> bool {
        digest_of(&self.fingerprint()) != self.digest
    }
}

/// Blank line; carries no state and serializes to the empty string
/// (siblings are joined with newlines, which restores the blank).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlankLine;

impl BlankLine {
    pub fn new() -> Self {
        BlankLine
    }

    pub fn markdown(&self) -> String {
        String::new()
    }

    pub fn modified(&self) -> bool {
        false
    }
}
