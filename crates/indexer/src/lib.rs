//! # Compass Indexer
//!
//! Batch build pipelines over a Python source tree.
//!
//! ## Pipeline
//!
//! ```text
//! Directory
//!     │
//!     ├──> File Scanner (.gitignore aware, *.py, sorted)
//!     │      │
//!     │      ├──> Edge Extractor ──> DependencyGraph + ExtractionReport
//!     │      │
//!     │      └──> Chunk Extractor ─> ChunkIndex + IndexReport
//! ```
//!
//! Both builds are single batch passes over an immutable snapshot of the
//! tree; per-file failures are recorded in the report and never abort the
//! run.

mod error;
mod pipeline;
mod report;
mod scanner;

pub use error::{IndexerError, Result};
pub use pipeline::{build_graph, build_index, GraphBuild, IndexBuild};
pub use report::{ExtractionReport, IndexReport};
pub use scanner::FileScanner;
