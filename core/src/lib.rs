// Notedown Core Library - nom-based block-level Markdown parser
//
// CommonMark-compatible superset with YAML front matter and task list
// items (status, dates, priority, recurrence). Every block node keeps
// its surface trivia and serializes back to its source text.

// Core modules: grammar → parser → AST
pub mod ast;
pub mod grammar;
pub mod logic;
pub mod parser;

// Re-export main API
pub use ast::{Block, Document, Recurrence, Status, TaskListItem};
pub use parser::{parse, parse_with_context, ParserContext};

// Re-export commonly used helpers
pub use logic::logger::safe_preview;
pub use logic::utf8::{sanitize_input, InputSource};
