//! Wire types for the two query tool surfaces, the gold-standard input and
//! the per-trial metrics artifact.
//!
//! These are the contracts consumed by the external agent-navigation and
//! aggregation layers; every metrics field is present even when a value is
//! undefined (explicit null, never omission), so aggregators can tell
//! "zero" from "not reached".

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_K: usize = 8;

/// Request for the structural neighbors of one file
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NeighborsRequest {
    /// Repo-relative path, e.g. "app/db/repositories/base.py"
    pub file_path: String,
}

/// One structural connection of the queried file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NeighborEntry {
    /// "in" or "out"
    pub direction: String,
    /// "IMPORTS", "INHERITS" or "INSTANTIATES"
    pub relation: String,
    pub neighbor_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NeighborsResponse {
    pub neighbors: Vec<NeighborEntry>,
    pub total: usize,
}

/// Request for a BM25-ranked file list
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchRequest {
    pub query_text: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchHit {
    pub file_path: String,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

/// Externally authored ground truth for one task
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GoldStandard {
    pub task_id: String,
    #[serde(default)]
    pub description: String,
    /// Must be non-empty; each path must exist in the extracted graph
    pub required_files: Vec<String>,
}

/// Whether a trial invoked the structural/lexical query tools at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolAdoption {
    pub used: bool,
    pub calls: usize,
}

/// Per-trial metrics artifact.
///
/// `fctc` and `read_to_edit_ratio` are null when not reached/undefined;
/// they are never coerced to numeric sentinels.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrialMetrics {
    pub task_id: String,
    pub condition: String,
    pub run_number: u32,

    /// Architectural Coverage Score: |accessed ∩ required| / |required|
    pub acs: f64,
    /// Fraction of required files actually edited or written
    pub edit_completeness: f64,
    /// Step index of the first access to any required file
    pub fctc: Option<usize>,
    pub tool_adoption: ToolAdoption,

    pub total_tool_calls: usize,
    pub read_to_edit_ratio: Option<f64>,

    pub files_accessed: Vec<String>,
    pub files_read: Vec<String>,
    pub files_edited: Vec<String>,
    pub required_files_hit: Vec<String>,
    pub required_files_edited: Vec<String>,
    pub required_files_missed: Vec<String>,
    pub files_required: usize,

    /// Set when the event log could only be partially parsed
    pub log_truncated: bool,
}
