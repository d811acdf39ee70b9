//! # Compass Ranker
//!
//! BM25 lexical ranking over function/class-level code chunks.
//!
//! ## Pipeline
//!
//! ```text
//! CodeChunk[]
//!     │
//!     ├──> Tokenizer (camelCase split, case-folded, alphanumeric)
//!     │
//!     ├──> ChunkIndex (term frequencies + document frequencies)
//!     │
//!     └──> query(text, top_k)
//!            ├─ BM25 score per chunk
//!            ├─ file score = max over its chunks
//!            └─ descending score, ties by path
//! ```
//!
//! Scores are non-negative; only the relative ordering within one query is
//! meaningful.

mod error;
mod index;
mod tokenize;

pub use error::{RankerError, Result};
pub use index::{ChunkIndex, RankedFile, DEFAULT_B, DEFAULT_K1};
pub use tokenize::tokenize;
