use crate::error::{Result, ScoringError};
use crate::event::AccessOp;
use crate::normalize::normalize_path;
use crate::transcript::EventLog;
use compass_graph::DependencyGraph;
use compass_protocol::{GoldStandard, ToolAdoption, TrialMetrics};
use std::collections::BTreeSet;

/// Trial identity and normalization settings for one scoring run
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Experimental condition label (e.g. "A", "B", "C")
    pub condition: String,
    pub run_number: u32,
    /// Absolute prefix to strip from event paths, when known
    pub repo_root: Option<String>,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            condition: "unknown".to_string(),
            run_number: 1,
            repo_root: None,
        }
    }
}

/// Compute the per-trial metrics artifact from an event log and a gold
/// standard.
///
/// An empty required set is a configuration error. A truncated log still
/// scores: the metrics cover the well-formed prefix and the artifact
/// carries `log_truncated = true`.
pub fn score(log: &EventLog, gold: &GoldStandard, config: &ScoreConfig) -> Result<TrialMetrics> {
    if gold.required_files.is_empty() {
        return Err(ScoringError::EmptyGoldStandard(gold.task_id.clone()));
    }

    let required: BTreeSet<String> = gold.required_files.iter().cloned().collect();
    let repo_root = config.repo_root.as_deref();

    let mut accessed: BTreeSet<String> = BTreeSet::new();
    let mut read: BTreeSet<String> = BTreeSet::new();
    let mut edited: BTreeSet<String> = BTreeSet::new();
    let mut fctc: Option<usize> = None;
    let mut query_calls = 0usize;

    for event in &log.events {
        if event.op.is_query() {
            query_calls += 1;
            continue;
        }
        let Some(raw) = &event.path else {
            continue;
        };

        let path = normalize_path(raw, repo_root);
        if event.op == AccessOp::Read {
            read.insert(path.clone());
        }
        if event.op.is_edit() {
            edited.insert(path.clone());
        }
        if fctc.is_none() && required.contains(&path) {
            fctc = Some(event.step);
        }
        accessed.insert(path);
    }

    let hit: BTreeSet<&String> = accessed.intersection(&required).collect();
    let edited_hit: BTreeSet<&String> = edited.intersection(&required).collect();
    let missed: BTreeSet<&String> = required.difference(&accessed).collect();

    let total = required.len() as f64;
    let acs = hit.len() as f64 / total;
    let edit_completeness = edited_hit.len() as f64 / total;
    let read_to_edit_ratio = if edited.is_empty() {
        None
    } else {
        Some(read.len() as f64 / edited.len() as f64)
    };

    Ok(TrialMetrics {
        task_id: gold.task_id.clone(),
        condition: config.condition.clone(),
        run_number: config.run_number,
        acs,
        edit_completeness,
        fctc,
        tool_adoption: ToolAdoption {
            used: query_calls > 0,
            calls: query_calls,
        },
        total_tool_calls: log.total_tool_calls,
        read_to_edit_ratio,
        files_accessed: accessed.iter().cloned().collect(),
        files_read: read.iter().cloned().collect(),
        files_edited: edited.iter().cloned().collect(),
        required_files_hit: hit.into_iter().cloned().collect(),
        required_files_edited: edited_hit.into_iter().cloned().collect(),
        required_files_missed: missed.into_iter().cloned().collect(),
        files_required: required.len(),
        log_truncated: log.truncated,
    })
}

/// Load a gold-standard file from disk
pub fn load_gold(path: &std::path::Path) -> Result<GoldStandard> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Consistency check: every gold-standard path must exist in the extracted
/// graph's node set. Not silently ignored: a mismatch here means the gold
/// standard and the graph were built from different trees.
pub fn check_gold_against_graph(gold: &GoldStandard, graph: &DependencyGraph) -> Result<()> {
    if gold.required_files.is_empty() {
        return Err(ScoringError::EmptyGoldStandard(gold.task_id.clone()));
    }

    let missing: Vec<String> = gold
        .required_files
        .iter()
        .filter(|path| !graph.contains(path))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ScoringError::MissingFromGraph(missing))
    }
}
