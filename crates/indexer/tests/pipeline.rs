use compass_graph::{Direction, Edge, Relation};
use compass_indexer::{build_graph, build_index};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "app/__init__.py", "");
    write(root, "app/db/__init__.py", "");
    write(
        root,
        "app/db/base.py",
        "class BaseRepository:\n    def __init__(self, session, logger):\n        self.logger = logger\n",
    );
    write(
        root,
        "app/db/database.py",
        "from app.db.base import BaseRepository\n\nrepo = BaseRepository(None, None)\n",
    );
    write(
        root,
        "app/api/articles.py",
        "from app.db.base import BaseRepository\n\n\nclass ArticleRepository(BaseRepository):\n    pass\n",
    );
    temp
}

#[test]
fn graph_build_covers_the_whole_tree() {
    let temp = fixture_tree();
    let build = build_graph(temp.path()).unwrap();

    assert_eq!(build.report.files_processed, 5);
    assert!(build.report.files_skipped.is_empty());

    let neighbors = build.graph.neighbors("app/db/base.py", Direction::Both);
    assert_eq!(neighbors.len(), 4);
    assert!(neighbors.iter().all(|n| n.direction.as_str() == "in"));
}

#[test]
fn parse_failures_skip_the_file_but_not_the_run() {
    let temp = fixture_tree();
    write(temp.path(), "app/broken.py", "def broken(:\n    nope\n");

    let build = build_graph(temp.path()).unwrap();

    assert_eq!(build.report.files_skipped, vec!["app/broken.py"]);
    assert!(build
        .graph
        .contains("app/db/base.py"));
    assert!(build.report.edge_total() >= 3);
}

#[test]
fn re_extraction_produces_an_identical_edge_set() {
    let temp = fixture_tree();
    let first = build_graph(temp.path()).unwrap();
    let second = build_graph(temp.path()).unwrap();

    let as_set = |edges: &[Edge]| {
        let mut sorted = edges.to_vec();
        sorted.sort_by(|a, b| {
            (a.source.as_str(), a.target.as_str(), a.relation.as_str())
                .cmp(&(b.source.as_str(), b.target.as_str(), b.relation.as_str()))
        });
        sorted
    };

    assert_eq!(as_set(&first.edges), as_set(&second.edges));
}

#[test]
fn extraction_report_counts_relations() {
    let temp = fixture_tree();
    let build = build_graph(temp.path()).unwrap();

    assert_eq!(build.report.edges.get("IMPORTS"), Some(&2));
    assert_eq!(build.report.edges.get("INHERITS"), Some(&1));
    assert_eq!(build.report.edges.get("INSTANTIATES"), Some(&1));
}

#[test]
fn index_build_ranks_lexically_relevant_files_first() {
    let temp = fixture_tree();
    let build = build_index(temp.path()).unwrap();

    assert_eq!(build.report.files_processed, 5);
    assert!(build.report.chunks >= 4);

    let ranked = build.index.query("logger parameter BaseRepository", 10);
    assert_eq!(ranked[0].file_path, "app/db/base.py");
}

#[test]
fn unparsable_files_still_participate_in_ranking() {
    let temp = fixture_tree();
    write(
        temp.path(),
        "app/broken.py",
        "def shimmering_widget(:\n    nope\n",
    );

    let build = build_index(temp.path()).unwrap();
    assert!(build.report.files_skipped.is_empty());

    let ranked = build.index.query("shimmering_widget", 5);
    assert_eq!(ranked[0].file_path, "app/broken.py");
}

#[test]
fn instantiation_edge_survives_the_pipeline() {
    let temp = fixture_tree();
    let build = build_graph(temp.path()).unwrap();

    assert!(build.edges.contains(&Edge::new(
        "app/db/database.py",
        "app/db/base.py",
        Relation::Instantiates
    )));
}
