// Block-level grammar modules
//
// One module per block construct. Each parser is a nom function over
// `Span` that captures its entry checkpoint and restores it on failure
// (no partial consumption). `cm_*` modules cover the CommonMark
// constructs, `nd_*` the notedown superset.

pub mod cm_atx_heading;
pub mod cm_blank_line;
pub mod cm_blockquote;
pub mod cm_fenced_code_block;
pub mod cm_html_blocks;
pub mod cm_indented_code_block;
pub mod cm_list;
pub mod cm_paragraph;
pub mod cm_setext_heading;
pub mod cm_thematic_break;
pub mod nd_front_matter;

// Re-export all block parsers
pub use cm_atx_heading::*;
pub use cm_blank_line::*;
pub use cm_blockquote::*;
pub use cm_fenced_code_block::*;
pub use cm_html_blocks::*;
pub use cm_indented_code_block::*;
pub use cm_list::*;
pub use cm_paragraph::*;
pub use cm_setext_heading::*;
pub use cm_thematic_break::*;
pub use nd_front_matter::*;
