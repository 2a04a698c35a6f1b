// AST traversal utilities for depth-first operations

use super::blocks::{Block, TaskListItem};
use super::Document;

// Depth-first traversal visitor pattern
pub trait Visitor {
    fn visit_block(&mut self, block: &Block);
}

// Traverse the block forest depth-first
pub fn walk_dfs(document: &Document, visitor: &mut dyn Visitor) {
    log::debug!("DFS traversal starting");
    for block in &document.children {
        visit_block(block, visitor);
    }
}

fn visit_block(block: &Block, visitor: &mut dyn Visitor) {
    visitor.visit_block(block);
    for child in block.children() {
        visit_block(child, visitor);
    }
}

/// Collect every task item in document order.
pub fn collect_tasks(document: &Document) -> Vec<&TaskListItem> {
    let mut tasks = Vec::new();
    for block in &document.children {
        collect_into(block, &mut tasks);
    }
    tasks
}

fn collect_into<'a>(block: &'a Block, tasks: &mut Vec<&'a TaskListItem>) {
    if let Block::TaskListItem(item) = block {
        tasks.push(item);
    }
    for child in block.children() {
        collect_into(child, tasks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::blocks::{BlankLine, Paragraph, Status, TaskList};

    struct Counter {
        blocks: usize,
    }

    impl Visitor for Counter {
        fn visit_block(&mut self, _block: &Block) {
            self.blocks += 1;
        }
    }

    fn sample_task(text: &str) -> TaskListItem {
        TaskListItem::new(
            String::new(),
            '-',
            " ".to_string(),
            Status::Todo,
            ' ',
            text.to_string(),
            None,
            None,
            None,
            None,
            None,
            Vec::new(),
        )
    }

    #[test]
    fn smoke_test_walk_dfs_counts_nested_blocks() {
        let doc = Document {
            children: vec![Block::TaskList(TaskList::new(vec![
                Block::TaskListItem(sample_task("one")),
                Block::BlankLine(BlankLine::new()),
                Block::TaskListItem(sample_task("two")),
            ]))],
        };
        let mut counter = Counter { blocks: 0 };
        walk_dfs(&doc, &mut counter);
        assert_eq!(counter.blocks, 4);
    }

    #[test]
    fn smoke_test_collect_tasks_in_order() {
        let doc = Document {
            children: vec![
                Block::Paragraph(Paragraph::new("intro".to_string())),
                Block::TaskList(TaskList::new(vec![
                    Block::TaskListItem(sample_task("first")),
                    Block::TaskListItem(sample_task("second")),
                ])),
            ],
        };
        let tasks = doc.tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "first");
        assert_eq!(tasks[1].text, "second");
    }
}
