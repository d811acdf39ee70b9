use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Summary of one edge extraction pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Files parsed successfully
    pub files_processed: usize,

    /// Repo-relative paths of files skipped (parse/read failures)
    pub files_skipped: Vec<String>,

    /// Edge counts by relation, after dedup
    pub edges: BTreeMap<String, usize>,
}

impl ExtractionReport {
    #[must_use]
    pub fn edge_total(&self) -> usize {
        self.edges.values().sum()
    }
}

impl fmt::Display for ExtractionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Files: {} processed, {} skipped | Edges: {}",
            self.files_processed,
            self.files_skipped.len(),
            self.edge_total()
        )?;
        for (relation, count) in &self.edges {
            write!(f, " | {relation}: {count}")?;
        }
        Ok(())
    }
}

/// Summary of one chunk indexing pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexReport {
    /// Files chunked (including parse-failure module fallbacks)
    pub files_processed: usize,

    /// Repo-relative paths of files skipped (read failures)
    pub files_skipped: Vec<String>,

    /// Total chunks indexed
    pub chunks: usize,
}

impl fmt::Display for IndexReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Files: {} processed, {} skipped | Chunks: {}",
            self.files_processed,
            self.files_skipped.len(),
            self.chunks
        )
    }
}
