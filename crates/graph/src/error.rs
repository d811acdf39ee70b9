use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Parser init error: {0}")]
    ParserInit(String),

    #[error("Parse failure in {0}")]
    ParseFailure(String),

    #[error("Not valid UTF-8: {0}")]
    NotUtf8(String),

    #[error("Path outside source tree: {0}")]
    OutsideTree(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
