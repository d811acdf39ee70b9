use crate::error::Result;
use crate::event::{AccessEvent, AccessOp};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::path::Path;

/// Structural-query tool names (bare and MCP-prefixed forms)
const GRAPH_QUERY_TOOLS: &[&str] = &[
    "get_architectural_context",
    "mcp__codecompass__get_architectural_context",
];

/// Lexical-query tool names (bare and MCP-prefixed forms)
const LEXICAL_QUERY_TOOLS: &[&str] = &[
    "semantic_search",
    "mcp__codecompass__semantic_search",
];

/// Conservative pattern for paths embedded in shell-command text: only
/// source-root anchored Python paths, to avoid false positives from
/// unrelated command output
static SHELL_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:app|tests)/[\w/.\-]+\.py").expect("valid shell-path regex"));

/// Ordered event log reconstructed from one trial transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    pub events: Vec<AccessEvent>,
    /// Every tool_use block counts, whether or not it yielded an event
    pub total_tool_calls: usize,
    /// True when a malformed line cut parsing short; the events hold the
    /// well-formed prefix
    pub truncated: bool,
}

/// Parse a transcript file on disk
pub fn parse_transcript(path: &Path) -> Result<EventLog> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_transcript_str(&text))
}

/// Parse transcript JSONL text into an ordered event log.
///
/// Only `type == "assistant"` lines with `tool_use` content blocks produce
/// events. Every tool_use block advances the step counter. A line that is
/// not valid JSON stops parsing and flags the log truncated; partial
/// results are preferred over aborting the trial.
#[must_use]
pub fn parse_transcript_str(text: &str) -> EventLog {
    let mut events = Vec::new();
    let mut step = 0usize;
    let mut truncated = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Malformed transcript line, scoring the prefix: {e}");
                truncated = true;
                break;
            }
        };

        if value.get("type").and_then(Value::as_str) != Some("assistant") {
            continue;
        }
        let Some(blocks) = value
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(Value::as_array)
        else {
            continue;
        };

        for block in blocks {
            if block.get("type").and_then(Value::as_str) != Some("tool_use") {
                continue;
            }
            step += 1;

            let name = block.get("name").and_then(Value::as_str).unwrap_or("");
            let input = block.get("input");
            collect_events(step, name, input, &mut events);
        }
    }

    EventLog {
        events,
        total_tool_calls: step,
        truncated,
    }
}

fn collect_events(step: usize, name: &str, input: Option<&Value>, events: &mut Vec<AccessEvent>) {
    if GRAPH_QUERY_TOOLS.contains(&name) {
        events.push(AccessEvent::marker(step, AccessOp::GraphQuery));
        return;
    }
    if LEXICAL_QUERY_TOOLS.contains(&name) {
        events.push(AccessEvent::marker(step, AccessOp::LexicalQuery));
        return;
    }

    let op = match name {
        "Read" => Some(AccessOp::Read),
        "Edit" => Some(AccessOp::Edit),
        "Write" => Some(AccessOp::Write),
        _ => None,
    };
    if let Some(op) = op {
        if let Some(path) = file_path_input(input) {
            events.push(AccessEvent::new(step, op, path));
        }
        return;
    }

    match name {
        "Bash" => {
            let command = input
                .and_then(|i| i.get("command"))
                .and_then(Value::as_str)
                .unwrap_or("");
            for m in SHELL_PATH.find_iter(command) {
                events.push(AccessEvent::new(step, AccessOp::ShellPath, m.as_str()));
            }
        }
        "Grep" => {
            if let Some(path) = input.and_then(|i| i.get("path")).and_then(Value::as_str) {
                if !path.is_empty() {
                    events.push(AccessEvent::new(step, AccessOp::ShellPath, path));
                }
            }
        }
        _ => {}
    }
}

fn file_path_input(input: Option<&Value>) -> Option<String> {
    let input = input?;
    input
        .get("file_path")
        .or_else(|| input.get("path"))
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}
