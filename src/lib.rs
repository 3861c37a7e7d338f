// Pocket → Netscape bookmarks - Core Library
// Exposes the conversion pipeline for the CLI and tests

pub mod error;
pub mod parser;
pub mod transform;
pub mod render;
pub mod pipeline;

// Re-export commonly used types
pub use error::{ConvertError, Result};
pub use parser::{parse_records, ParsedCsv, RawRecord};
pub use transform::{
    Bookmark, HeaderIndex, Transformer,
    resolve_time_added, resolve_title,
};
pub use render::{escape_html, render_document, select_unread};
pub use pipeline::{convert, convert_file, write_atomic, Conversion, ConversionReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
