use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chunker error: {0}")]
    Chunker(#[from] compass_chunker::ChunkerError),

    #[error("Graph error: {0}")]
    Graph(#[from] compass_graph::GraphError),

    #[error("Invalid source tree: {0}")]
    InvalidRoot(String),
}
