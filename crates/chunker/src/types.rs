use serde::{Deserialize, Serialize};

/// A function/class-level unit of text used for lexical ranking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeChunk {
    /// Repo-relative source file path
    pub file_path: String,

    /// Kind of chunk (function, class, module residual)
    pub kind: ChunkKind,

    /// Function/class name, or the file stem for module-level chunks
    pub name: String,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// The chunk's source text
    pub content: String,
}

impl CodeChunk {
    /// Stable identifier within one index build
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}:{}:{}", self.file_path, self.start_line, self.end_line)
    }

    /// Number of lines spanned by this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

/// Kind of code chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// Standalone function or method
    Function,
    /// Class definition (body included)
    Class,
    /// Module-level remainder (imports, constants, top-level code)
    Module,
}

impl ChunkKind {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Module => "module",
        }
    }
}
