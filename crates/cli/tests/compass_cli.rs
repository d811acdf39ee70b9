use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture_tree(temp: &TempDir) -> &Path {
    let root = temp.path();
    write(root, "repo/app/__init__.py", "");
    write(root, "repo/app/db/__init__.py", "");
    write(
        root,
        "repo/app/db/base.py",
        "class BaseRepository:\n    def __init__(self, session, logger):\n        self.logger = logger\n",
    );
    write(
        root,
        "repo/app/db/database.py",
        "from app.db.base import BaseRepository\n\nrepo = BaseRepository(None, None)\n",
    );
    write(
        root,
        "repo/app/api/articles.py",
        "from app.db.base import BaseRepository\n\n\nclass ArticleRepository(BaseRepository):\n    pass\n",
    );
    root
}

fn compass() -> Command {
    Command::cargo_bin("compass").unwrap()
}

#[test]
fn extract_then_query_neighbors() {
    let temp = TempDir::new().unwrap();
    let root = fixture_tree(&temp);
    let edges = root.join("edges.json");

    compass()
        .args(["extract", "--repo"])
        .arg(root.join("repo"))
        .arg("--output")
        .arg(&edges)
        .assert()
        .success()
        .stdout(predicate::str::contains("IMPORTS: 2"));

    compass()
        .args(["neighbors", "app/db/base.py", "--edges"])
        .arg(&edges)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 4 structural connections"))
        .stdout(predicate::str::contains("[INSTANTIATES]  app/db/database.py"));
}

#[test]
fn neighbors_of_unknown_file_exits_nonzero() {
    let temp = TempDir::new().unwrap();
    let root = fixture_tree(&temp);
    let edges = root.join("edges.json");

    compass()
        .args(["extract", "--repo"])
        .arg(root.join("repo"))
        .arg("--output")
        .arg(&edges)
        .assert()
        .success();

    compass()
        .args(["neighbors", "app/missing.py", "--edges"])
        .arg(&edges)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No structural neighbors found"));
}

#[test]
fn index_then_search() {
    let temp = TempDir::new().unwrap();
    let root = fixture_tree(&temp);
    let index = root.join("index.json");

    compass()
        .args(["index", "--repo"])
        .arg(root.join("repo"))
        .arg("--output")
        .arg(&index)
        .assert()
        .success();

    compass()
        .args(["search", "logger parameter BaseRepository", "--index"])
        .arg(&index)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("app/db/base.py"));
}

#[test]
fn score_writes_a_metrics_artifact() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    let transcript = [
        r#"{"type": "assistant", "message": {"content": [{"type": "tool_use", "name": "Read", "input": {"file_path": "app/db/base.py"}}]}}"#,
        r#"{"type": "assistant", "message": {"content": [{"type": "tool_use", "name": "Edit", "input": {"file_path": "app/db/base.py"}}]}}"#,
    ]
    .join("\n");
    write(root, "transcript.jsonl", &transcript);
    write(
        root,
        "gold.json",
        r#"{"task_id": "task_01", "required_files": ["app/db/base.py", "app/db/database.py"]}"#,
    );

    let output = root.join("metrics.json");
    compass()
        .args(["score", "--transcript"])
        .arg(root.join("transcript.jsonl"))
        .arg("--gold")
        .arg(root.join("gold.json"))
        .arg("--output")
        .arg(&output)
        .args(["--condition", "B", "--run", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50.00%"));

    let metrics: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(metrics["task_id"], "task_01");
    assert_eq!(metrics["condition"], "B");
    assert_eq!(metrics["run_number"], 3);
    assert_eq!(metrics["acs"], 0.5);
    assert_eq!(metrics["fctc"], 1);
    assert_eq!(metrics["tool_adoption"]["used"], false);
}

#[test]
fn score_rejects_gold_standard_missing_from_graph() {
    let temp = TempDir::new().unwrap();
    let root = fixture_tree(&temp);
    let edges = root.join("edges.json");

    compass()
        .args(["extract", "--repo"])
        .arg(root.join("repo"))
        .arg("--output")
        .arg(&edges)
        .assert()
        .success();

    write(root, "transcript.jsonl", "");
    write(
        root,
        "gold.json",
        r#"{"task_id": "task_02", "required_files": ["app/not_in_graph.py"]}"#,
    );

    compass()
        .args(["score", "--transcript"])
        .arg(root.join("transcript.jsonl"))
        .arg("--gold")
        .arg(root.join("gold.json"))
        .arg("--edges")
        .arg(&edges)
        .assert()
        .failure()
        .stderr(predicate::str::contains("inconsistent"));
}
