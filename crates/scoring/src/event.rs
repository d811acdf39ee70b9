use serde::{Deserialize, Serialize};

/// Operation recorded for one access event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessOp {
    Read,
    Edit,
    Write,
    /// Path extracted from shell-command text; lower confidence but counted
    /// identically for coverage
    ShellPath,
    /// Structural-query tool invocation (tool adoption marker, no path)
    GraphQuery,
    /// Lexical-query tool invocation (tool adoption marker, no path)
    LexicalQuery,
}

impl AccessOp {
    /// Edits and writes count toward edit completeness
    #[must_use]
    pub const fn is_edit(self) -> bool {
        matches!(self, Self::Edit | Self::Write)
    }

    /// Query invocations count toward tool adoption, never toward coverage
    #[must_use]
    pub const fn is_query(self) -> bool {
        matches!(self, Self::GraphQuery | Self::LexicalQuery)
    }
}

/// One record in a trial's chronological event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
    /// Position in the trial's tool-call sequence, starting at 1
    pub step: usize,
    pub op: AccessOp,
    /// Absent for query-invocation events
    pub path: Option<String>,
}

impl AccessEvent {
    pub fn new(step: usize, op: AccessOp, path: impl Into<String>) -> Self {
        Self {
            step,
            op,
            path: Some(path.into()),
        }
    }

    #[must_use]
    pub const fn marker(step: usize, op: AccessOp) -> Self {
        Self {
            step,
            op,
            path: None,
        }
    }
}
