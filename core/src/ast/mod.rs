// AST node definitions: the block forest and its serialization contract

pub mod blocks;
pub mod traversal;

pub use blocks::*;
pub use traversal::*;

// Root document node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub children: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Serialize the whole document: top-level blocks joined with `\n`
    /// plus one trailing `\n`. Equals the original input for parsed
    /// documents.
    pub fn markdown(&self) -> String {
        if self.children.is_empty() {
            return String::new();
        }
        let mut out = blocks::join_children(&self.children);
        out.push('\n');
        out
    }

    /// Every task item in the document, depth-first.
    pub fn tasks(&self) -> Vec<&TaskListItem> {
        traversal::collect_tasks(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_empty_document_markdown() {
        assert_eq!(Document::new().markdown(), "");
    }

    #[test]
    fn smoke_test_document_joins_blocks() {
        let doc = Document {
            children: vec![
                Block::Paragraph(Paragraph::new("a".to_string())),
                Block::BlankLine(BlankLine::new()),
                Block::Paragraph(Paragraph::new("b".to_string())),
            ],
        };
        assert_eq!(doc.markdown(), "a\n\nb\n");
    }
}
