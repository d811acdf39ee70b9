use thiserror::Error;

/// Result type for chunker operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur during chunk extraction
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File content is not valid UTF-8
    #[error("Not valid UTF-8: {0}")]
    NotUtf8(String),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    /// Path is not inside the scanned tree
    #[error("Path outside source tree: {0}")]
    OutsideTree(String),
}
