use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankerError>;

#[derive(Error, Debug)]
pub enum RankerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Index serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
