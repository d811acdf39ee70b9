use crate::error::Result;
use crate::tokenize::tokenize;
use compass_chunker::CodeChunk;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_K1: f32 = 1.5;
pub const DEFAULT_B: f32 = 0.75;

/// One file in a ranked query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFile {
    pub file_path: String,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexedChunk {
    file_path: String,
    chunk_id: String,
    term_freq: HashMap<String, usize>,
    len: usize,
}

/// BM25 index over code chunks.
///
/// Build-once, query-many: queries take `&self` and never mutate. The
/// chunk document includes the file path and symbol name so both are
/// searchable terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkIndex {
    chunks: Vec<IndexedChunk>,
    doc_freq: HashMap<String, usize>,
    avg_len: f32,
    k1: f32,
    b: f32,
}

impl ChunkIndex {
    #[must_use]
    pub fn from_chunks(chunks: &[CodeChunk]) -> Self {
        Self::with_params(chunks, DEFAULT_K1, DEFAULT_B)
    }

    #[must_use]
    pub fn with_params(chunks: &[CodeChunk], k1: f32, b: f32) -> Self {
        let mut indexed = Vec::with_capacity(chunks.len());
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut total_len = 0usize;

        for chunk in chunks {
            let document = format!("{} {} {}", chunk.file_path, chunk.name, chunk.content);
            let tokens = tokenize(&document);
            total_len += tokens.len();

            let mut term_freq: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *term_freq.entry(token).or_insert(0) += 1;
            }
            for term in term_freq.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }

            let len = term_freq.values().sum();
            indexed.push(IndexedChunk {
                file_path: chunk.file_path.clone(),
                chunk_id: chunk.id(),
                term_freq,
                len,
            });
        }

        let avg_len = if indexed.is_empty() {
            0.0
        } else {
            total_len as f32 / indexed.len() as f32
        };

        log::info!(
            "Built BM25 index: {} chunks, {} distinct terms",
            indexed.len(),
            doc_freq.len()
        );

        Self {
            chunks: indexed,
            doc_freq,
            avg_len,
            k1,
            b,
        }
    }

    /// Rank files for a free-text query.
    ///
    /// Each chunk is scored independently; a file's score is the maximum
    /// over its own chunks, never the sum, so large files cannot dominate
    /// by chunk count. Ties break by lexical path order. An empty or
    /// all-filtered query returns an empty list.
    #[must_use]
    pub fn query(&self, text: &str, top_k: usize) -> Vec<RankedFile> {
        let tokens = tokenize(text);
        if tokens.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut file_scores: HashMap<&str, f32> = HashMap::new();
        for chunk in &self.chunks {
            let score = self.score_chunk(chunk, &tokens);
            file_scores
                .entry(chunk.file_path.as_str())
                .and_modify(|best| {
                    if score > *best {
                        *best = score;
                    }
                })
                .or_insert(score);
        }

        let mut ranked: Vec<RankedFile> = file_scores
            .into_iter()
            .map(|(file_path, score)| RankedFile {
                file_path: file_path.to_string(),
                score,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.file_path.cmp(&b.file_path))
        });
        ranked.truncate(top_k);
        ranked
    }

    fn score_chunk(&self, chunk: &IndexedChunk, query_tokens: &[String]) -> f32 {
        if chunk.len == 0 {
            return 0.0;
        }

        let dl = chunk.len as f32;
        let total_docs = self.chunks.len() as f32;
        let mut score = 0.0;

        for token in query_tokens {
            let freq = chunk.term_freq.get(token).copied().unwrap_or(0) as f32;
            if freq <= 0.0 {
                continue;
            }
            let df = self.doc_freq.get(token).copied().unwrap_or(0) as f32;
            let idf = bm25_idf(total_docs, df);
            let denom =
                freq + self.k1 * (1.0 - self.b + self.b * dl / self.avg_len.max(1e-3));
            if denom > 0.0 {
                score += idf * (freq * (self.k1 + 1.0)) / denom;
            }
        }

        score
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        let mut files: Vec<&str> = self.chunks.iter().map(|c| c.file_path.as_str()).collect();
        files.sort_unstable();
        files.dedup();
        files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Persist the index as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Non-negative idf variant, so scores never go below zero for very
/// common terms
fn bm25_idf(total_docs: f32, df: f32) -> f32 {
    ((total_docs - df + 0.5) / (df + 0.5) + 1.0).ln()
}
