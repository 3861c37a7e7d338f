// ❌ Conversion errors
// Library code returns ConvertError; the binary wraps it with anyhow.

use std::path::PathBuf;

/// Everything that can abort a conversion run.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A row that cannot be read as CSV, e.g. a quoted field never closed.
    #[error("malformed CSV row starting on line {line}: {content}")]
    Parse { line: usize, content: String },

    /// Input unreadable or output unwritable.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}
