use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScoringError>;

#[derive(Error, Debug)]
pub enum ScoringError {
    /// An empty required set is a configuration error, not a score of 0 or 1
    #[error("Gold standard for task '{0}' has an empty required_files set")]
    EmptyGoldStandard(String),

    /// Gold-standard paths must exist in the extracted graph's node set
    #[error("Required files missing from the extracted graph: {0:?}")]
    MissingFromGraph(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Gold standard parse error: {0}")]
    GoldParse(#[from] serde_json::Error),
}
