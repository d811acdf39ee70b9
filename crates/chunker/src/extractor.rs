use crate::error::{ChunkerError, Result};
use crate::types::{ChunkKind, CodeChunk};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Splits Python sources into function/class chunks plus a module residual
pub struct ChunkExtractor {
    parser: Parser,
}

impl ChunkExtractor {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ChunkerError::TreeSitter(format!("Failed to set language: {e}")))?;

        Ok(Self { parser })
    }

    /// Chunk a file on disk, recording its repo-relative path
    pub fn chunk_file(&mut self, path: &Path, repo_root: &Path) -> Result<Vec<CodeChunk>> {
        let rel = path
            .strip_prefix(repo_root)
            .map_err(|_| ChunkerError::OutsideTree(path.display().to_string()))?;
        let rel = rel_path_string(rel);

        let bytes = std::fs::read(path)?;
        let content = String::from_utf8(bytes)
            .map_err(|_| ChunkerError::NotUtf8(path.display().to_string()))?;

        Ok(self.chunk_source(&content, &rel))
    }

    /// Chunk source text. A parse failure degrades to a single module-level
    /// chunk so the file still participates in ranking.
    pub fn chunk_source(&mut self, content: &str, file_path: &str) -> Vec<CodeChunk> {
        if content.trim().is_empty() {
            return Vec::new();
        }

        let tree = match self.parser.parse(content, None) {
            Some(tree) if !tree.root_node().has_error() => tree,
            _ => {
                log::warn!("Parse failure in {file_path}, falling back to module chunk");
                return vec![module_chunk(content, file_path, content)];
            }
        };

        let mut chunks = Vec::new();
        collect_definitions(tree.root_node(), content, file_path, &mut chunks);
        chunks.sort_by(|a, b| {
            a.start_line
                .cmp(&b.start_line)
                .then_with(|| a.end_line.cmp(&b.end_line))
                .then_with(|| a.name.cmp(&b.name))
        });

        if let Some(residual) = module_residual(content, file_path, &chunks) {
            chunks.push(residual);
        }

        chunks
    }
}

/// Walk the syntax tree and emit a chunk per function/class definition.
/// Nested definitions (methods, inner functions) become their own chunks.
fn collect_definitions(node: Node, content: &str, file_path: &str, chunks: &mut Vec<CodeChunk>) {
    let kind = match node.kind() {
        "function_definition" => Some(ChunkKind::Function),
        "class_definition" => Some(ChunkKind::Class),
        _ => None,
    };

    if let Some(kind) = kind {
        let name = node
            .child_by_field_name("name")
            .map(|n| content[n.byte_range()].to_string())
            .unwrap_or_else(|| "<anonymous>".to_string());

        chunks.push(CodeChunk {
            file_path: file_path.to_string(),
            kind,
            name,
            start_line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
            content: content[node.byte_range()].to_string(),
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_definitions(child, content, file_path, chunks);
    }
}

/// Lines covered by no function/class chunk form one residual chunk,
/// emitted only when non-blank.
fn module_residual(content: &str, file_path: &str, chunks: &[CodeChunk]) -> Option<CodeChunk> {
    let lines: Vec<&str> = content.lines().collect();
    let mut covered = vec![false; lines.len()];

    for chunk in chunks {
        for line in chunk.start_line..=chunk.end_line.min(lines.len()) {
            covered[line - 1] = true;
        }
    }

    let residual: Vec<&str> = lines
        .iter()
        .zip(&covered)
        .filter(|(_, covered)| !**covered)
        .map(|(line, _)| *line)
        .collect();

    let text = residual.join("\n");
    if text.trim().is_empty() {
        return None;
    }

    Some(module_chunk(content, file_path, &text))
}

fn module_chunk(content: &str, file_path: &str, text: &str) -> CodeChunk {
    CodeChunk {
        file_path: file_path.to_string(),
        kind: ChunkKind::Module,
        name: file_stem(file_path),
        start_line: 1,
        end_line: content.lines().count().max(1),
        content: text.to_string(),
    }
}

fn file_stem(file_path: &str) -> String {
    Path::new(file_path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string())
}

fn rel_path_string(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
