// Grammar definitions for the Markdown superset

pub mod blocks;
pub mod shared;
pub mod task;

pub use shared::Span;
