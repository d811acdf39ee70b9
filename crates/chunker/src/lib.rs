//! # Compass Chunker
//!
//! Splits Python source files into function/class-level chunks for lexical
//! ranking.
//!
//! ## Pipeline
//!
//! ```text
//! Source file
//!     │
//!     ├──> Tree-sitter parse
//!     │      ├─ function_definition ──> Function chunk
//!     │      ├─ class_definition ─────> Class chunk
//!     │      └─ everything else ──────> one Module residual chunk
//!     │
//!     └──> (parse failure) ───────────> whole file as Module chunk
//! ```
//!
//! Every chunk belongs to exactly one file; the ranker aggregates file
//! scores as the maximum over that file's chunks.

mod error;
mod extractor;
mod types;

pub use error::{ChunkerError, Result};
pub use extractor::ChunkExtractor;
pub use types::{ChunkKind, CodeChunk};
