//! # Compass Scoring
//!
//! Reconstructs which files an agent touched from an execution transcript
//! and scores coverage/ordering against a gold-standard file set.
//!
//! ## Pipeline
//!
//! ```text
//! transcript.jsonl
//!     │
//!     ├──> Event log reconstruction (tool_use blocks, ordered steps)
//!     │      ├─ Read/Edit/Write ──> file-path events
//!     │      ├─ Bash/Grep ────────> conservative shell-path extraction
//!     │      └─ graph/lexical tools ─> tool-adoption markers
//!     │
//!     └──> Metrics (ACS, edit completeness, FCTC, tool adoption)
//! ```
//!
//! A malformed transcript yields the metrics computable from its
//! well-formed prefix plus a truncation flag; one bad trial never aborts a
//! batch scoring run.

mod error;
mod event;
mod metrics;
mod normalize;
mod transcript;

pub use error::{Result, ScoringError};
pub use event::{AccessEvent, AccessOp};
pub use metrics::{check_gold_against_graph, load_gold, score, ScoreConfig};
pub use normalize::normalize_path;
pub use transcript::{parse_transcript, parse_transcript_str, EventLog};
