// Ambient utilities shared across the crate

pub mod logger;
pub mod utf8;

pub use logger::safe_preview;
pub use utf8::{sanitize_input, InputSource};
