//! # Compass Graph
//!
//! File-level dependency graph for structural code navigation.
//!
//! ## Architecture
//!
//! ```text
//! Source files
//!     │
//!     ├──> Edge Extractor (tree-sitter)
//!     │      ├─ Resolve imports to in-tree files ──> IMPORTS
//!     │      ├─ Resolve base classes via bindings ─> INHERITS
//!     │      └─ Resolve constructor calls ─────────> INSTANTIATES
//!     │
//!     └──> Dependency Graph (petgraph)
//!            ├─ Nodes: repo-relative file paths
//!            └─ Edges: typed, directed, deduplicated
//! ```
//!
//! The graph is an immutable build-once artifact: `load` replaces the whole
//! edge set and queries never mutate.

mod error;
mod extractor;
mod graph;
mod types;

pub use error::{GraphError, Result};
pub use extractor::EdgeExtractor;
pub use graph::{DependencyGraph, GraphStats};
pub use types::{Direction, Edge, EdgeDirection, Neighbor, Relation};
