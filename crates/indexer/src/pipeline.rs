use crate::error::{IndexerError, Result};
use crate::report::{ExtractionReport, IndexReport};
use crate::scanner::FileScanner;
use compass_chunker::{ChunkExtractor, CodeChunk};
use compass_graph::{DependencyGraph, Edge, EdgeExtractor};
use compass_ranker::ChunkIndex;
use std::path::Path;

/// Result of one graph build pass
pub struct GraphBuild {
    pub graph: DependencyGraph,
    pub edges: Vec<Edge>,
    pub report: ExtractionReport,
}

/// Result of one ranker build pass
pub struct IndexBuild {
    pub index: ChunkIndex,
    pub report: IndexReport,
}

/// Build the dependency graph for a source tree in a single batch pass.
///
/// Extraction is atomic per file: a file that fails to parse is recorded in
/// the report's skipped list and never blocks edges from other files.
pub fn build_graph(repo_root: &Path) -> Result<GraphBuild> {
    let repo_root = check_root(repo_root)?;
    let files = FileScanner::new(repo_root).scan();
    let mut extractor = EdgeExtractor::new()?;

    let mut edges = Vec::new();
    let mut skipped = Vec::new();
    let mut processed = 0usize;

    for file in &files {
        match extractor.extract_file(file, repo_root) {
            Ok(file_edges) => {
                processed += 1;
                edges.extend(file_edges);
            }
            Err(e) => {
                log::warn!("Skipping {}: {e}", file.display());
                skipped.push(rel_display(file, repo_root));
            }
        }
    }

    let graph = DependencyGraph::from_edges(edges.clone());
    let stats = graph.stats();
    let report = ExtractionReport {
        files_processed: processed,
        files_skipped: skipped,
        edges: stats.edges,
    };

    log::info!("Graph build complete: {report}");
    Ok(GraphBuild {
        graph,
        edges,
        report,
    })
}

/// Build the BM25 chunk index for a source tree in a single batch pass.
///
/// Unparsable files degrade to a module-level chunk inside the chunker;
/// only read failures are skipped here.
pub fn build_index(repo_root: &Path) -> Result<IndexBuild> {
    let repo_root = check_root(repo_root)?;
    let files = FileScanner::new(repo_root).scan();
    let mut extractor = ChunkExtractor::new()?;

    let mut chunks: Vec<CodeChunk> = Vec::new();
    let mut skipped = Vec::new();
    let mut processed = 0usize;

    for file in &files {
        match extractor.chunk_file(file, repo_root) {
            Ok(file_chunks) => {
                processed += 1;
                chunks.extend(file_chunks);
            }
            Err(e) => {
                log::warn!("Skipping {}: {e}", file.display());
                skipped.push(rel_display(file, repo_root));
            }
        }
    }

    let index = ChunkIndex::from_chunks(&chunks);
    let report = IndexReport {
        files_processed: processed,
        files_skipped: skipped,
        chunks: chunks.len(),
    };

    log::info!("Index build complete: {report}");
    Ok(IndexBuild { index, report })
}

fn check_root(repo_root: &Path) -> Result<&Path> {
    if !repo_root.is_dir() {
        return Err(IndexerError::InvalidRoot(repo_root.display().to_string()));
    }
    Ok(repo_root)
}

fn rel_display(path: &Path, repo_root: &Path) -> String {
    path.strip_prefix(repo_root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
