use derive_more::Display;
use std::path::PathBuf;

/// Failures surfaced by the viewer core. Per-record problems are not errors:
/// invalid records are skipped and out-of-range reads yield `None`.
#[derive(Debug, Display)]
pub enum ViewerError {
    #[display(fmt = "Store not found: {}", "_0.display()")]
    StoreNotFound(PathBuf),
    #[display(fmt = "Store size mismatch: {} bytes is not a multiple of {}", file_len, record_size)]
    StoreSizeMismatch { file_len: u64, record_size: usize },
    #[display(fmt = "Store I/O error: {}", _0)]
    Io(std::io::Error),
    #[display(fmt = "Configuration error: {}", _0)]
    Config(String),
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        ViewerError::Io(err)
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::Config(err.to_string())
    }
}

pub type ViewerResult<T> = Result<T, ViewerError>;
