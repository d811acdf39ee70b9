use crate::error::{GraphError, Result};
use crate::types::{Edge, Relation};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Extracts typed file-to-file edges from Python sources.
///
/// Resolution is a best-effort static approximation: imports that resolve
/// outside the tree produce no edge, and base classes or constructor calls
/// whose defining file cannot be determined from the file's own import
/// bindings are silently dropped.
pub struct EdgeExtractor {
    parser: Parser,
}

impl EdgeExtractor {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| GraphError::ParserInit(format!("Failed to set language: {e}")))?;

        Ok(Self { parser })
    }

    /// Extract all edges produced by one file. Extraction is atomic per
    /// file: an error here never blocks edges derived from other files.
    pub fn extract_file(&mut self, path: &Path, repo_root: &Path) -> Result<Vec<Edge>> {
        let rel = path
            .strip_prefix(repo_root)
            .map_err(|_| GraphError::OutsideTree(path.display().to_string()))?;
        let rel = to_slash(rel);

        let bytes = std::fs::read(path)?;
        let content =
            String::from_utf8(bytes).map_err(|_| GraphError::NotUtf8(path.display().to_string()))?;

        self.extract_source(&content, &rel, repo_root)
    }

    /// Extract edges from source text, resolving imports against the tree
    /// rooted at `repo_root`.
    pub fn extract_source(
        &mut self,
        content: &str,
        rel_path: &str,
        repo_root: &Path,
    ) -> Result<Vec<Edge>> {
        let tree = self
            .parser
            .parse(content, None)
            .filter(|t| !t.root_node().has_error())
            .ok_or_else(|| GraphError::ParseFailure(rel_path.to_string()))?;

        let mut imports = Vec::new();
        let mut classes = Vec::new();
        let mut calls = Vec::new();
        collect_nodes(tree.root_node(), &mut imports, &mut classes, &mut calls);

        let mut edges = Vec::new();
        let mut bindings: HashMap<String, String> = HashMap::new();

        for node in imports {
            match node.kind() {
                "import_statement" => {
                    self.collect_plain_import(node, content, rel_path, repo_root, &mut edges, &mut bindings);
                }
                "import_from_statement" => {
                    self.collect_from_import(node, content, rel_path, repo_root, &mut edges, &mut bindings);
                }
                _ => {}
            }
        }

        for node in classes {
            collect_inherits(node, content, rel_path, &bindings, &mut edges);
        }
        for node in calls {
            collect_instantiates(node, content, rel_path, &bindings, &mut edges);
        }

        // Deduplicate, preserving first-seen order
        let mut seen = HashSet::new();
        edges.retain(|e| seen.insert(e.clone()));

        Ok(edges)
    }

    /// `import a.b.c` / `import a.b.c as z`
    fn collect_plain_import(
        &self,
        node: Node,
        content: &str,
        source: &str,
        repo_root: &Path,
        edges: &mut Vec<Edge>,
        bindings: &mut HashMap<String, String>,
    ) {
        let mut cursor = node.walk();
        for name_node in node.children_by_field_name("name", &mut cursor) {
            let (module, alias) = match name_node.kind() {
                "dotted_name" => (content[name_node.byte_range()].to_string(), None),
                "aliased_import" => {
                    let Some(inner) = name_node.child_by_field_name("name") else {
                        continue;
                    };
                    let alias = name_node
                        .child_by_field_name("alias")
                        .map(|a| content[a.byte_range()].to_string());
                    (content[inner.byte_range()].to_string(), alias)
                }
                _ => continue,
            };

            let Some(target) = resolve_module(&module, repo_root) else {
                continue;
            };

            if target != source {
                edges.push(Edge::new(source, target.clone(), Relation::Imports));
            }

            // Plain `import a.b` binds the root name; an alias rebinds it
            let bound = alias.unwrap_or_else(|| {
                module.split('.').next().unwrap_or(&module).to_string()
            });
            bindings.insert(bound, target);
        }
    }

    /// `from a.b import x, y as z` and relative forms
    fn collect_from_import(
        &self,
        node: Node,
        content: &str,
        source: &str,
        repo_root: &Path,
        edges: &mut Vec<Edge>,
        bindings: &mut HashMap<String, String>,
    ) {
        let Some(module_node) = node.child_by_field_name("module_name") else {
            return;
        };

        let module = match module_node.kind() {
            "dotted_name" => content[module_node.byte_range()].to_string(),
            "relative_import" => {
                match resolve_relative(module_node, content, source) {
                    Some(module) => module,
                    None => return,
                }
            }
            _ => return,
        };

        let module_target = resolve_module(&module, repo_root);
        if let Some(target) = &module_target {
            if target != source {
                edges.push(Edge::new(source, target.clone(), Relation::Imports));
            }
        }

        let mut cursor = node.walk();
        for name_node in node.children_by_field_name("name", &mut cursor) {
            let (name, alias) = match name_node.kind() {
                "dotted_name" => (content[name_node.byte_range()].to_string(), None),
                "aliased_import" => {
                    let Some(inner) = name_node.child_by_field_name("name") else {
                        continue;
                    };
                    let alias = name_node
                        .child_by_field_name("alias")
                        .map(|a| content[a.byte_range()].to_string());
                    (content[inner.byte_range()].to_string(), alias)
                }
                _ => continue,
            };

            let bound = alias.unwrap_or_else(|| name.clone());

            // `from pkg import mod` may name a submodule; prefer its file
            // over the package marker when it exists on disk.
            let submodule = if module.is_empty() {
                name.clone()
            } else {
                format!("{module}.{name}")
            };
            if let Some(target) = resolve_module(&submodule, repo_root) {
                if target != source {
                    edges.push(Edge::new(source, target.clone(), Relation::Imports));
                }
                bindings.insert(bound, target);
            } else if let Some(target) = &module_target {
                bindings.insert(bound, target.clone());
            }
        }
    }
}

/// Collect every import/class/call node in the tree, like `ast.walk`
fn collect_nodes<'t>(
    node: Node<'t>,
    imports: &mut Vec<Node<'t>>,
    classes: &mut Vec<Node<'t>>,
    calls: &mut Vec<Node<'t>>,
) {
    match node.kind() {
        "import_statement" | "import_from_statement" => imports.push(node),
        "class_definition" => classes.push(node),
        "call" => calls.push(node),
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_nodes(child, imports, classes, calls);
    }
}

/// Emit INHERITS for each base class whose defining file is known from the
/// import bindings. Unresolved bases are dropped, not errors.
fn collect_inherits(
    class_node: Node,
    content: &str,
    source: &str,
    bindings: &HashMap<String, String>,
    edges: &mut Vec<Edge>,
) {
    let Some(superclasses) = class_node.child_by_field_name("superclasses") else {
        return;
    };

    let mut cursor = superclasses.walk();
    for base in superclasses.named_children(&mut cursor) {
        let Some(root) = reference_root(base, content) else {
            continue;
        };
        if let Some(target) = bindings.get(root) {
            if target != source {
                edges.push(Edge::new(source, target.clone(), Relation::Inherits));
            }
        }
    }
}

/// Emit INSTANTIATES for calls whose callee looks like a class (leading
/// uppercase, Python convention) and resolves through the import bindings.
fn collect_instantiates(
    call_node: Node,
    content: &str,
    source: &str,
    bindings: &HashMap<String, String>,
    edges: &mut Vec<Edge>,
) {
    let Some(function) = call_node.child_by_field_name("function") else {
        return;
    };

    let called_name = match function.kind() {
        "identifier" => &content[function.byte_range()],
        "attribute" => match function.child_by_field_name("attribute") {
            Some(attr) => &content[attr.byte_range()],
            None => return,
        },
        _ => return,
    };

    if !called_name.chars().next().is_some_and(char::is_uppercase) {
        return;
    }

    let Some(root) = reference_root(function, content) else {
        return;
    };
    if let Some(target) = bindings.get(root) {
        if target != source {
            edges.push(Edge::new(source, target.clone(), Relation::Instantiates));
        }
    }
}

/// The name a reference resolves through: a bare identifier, or the
/// leftmost identifier of an attribute chain (`pkg.mod.Class` -> `pkg`)
fn reference_root<'a>(node: Node, content: &'a str) -> Option<&'a str> {
    let mut current = node;
    while current.kind() == "attribute" {
        current = current.child_by_field_name("object")?;
    }
    if current.kind() == "identifier" {
        Some(&content[current.byte_range()])
    } else {
        None
    }
}

/// Resolve a relative import to a dotted module path rooted at the tree.
/// One leading dot anchors at the importing file's package; each further
/// dot pops one package level.
fn resolve_relative(node: Node, content: &str, rel_path: &str) -> Option<String> {
    let text = &content[node.byte_range()];
    let level = text.chars().take_while(|&c| c == '.').count();
    let module_suffix = text.trim_start_matches('.');

    let mut pkg_parts: Vec<&str> = Path::new(rel_path)
        .parent()
        .map(|p| {
            p.components()
                .filter_map(|c| match c {
                    std::path::Component::Normal(s) => s.to_str(),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    for _ in 1..level {
        pkg_parts.pop()?;
    }

    let mut parts: Vec<&str> = pkg_parts;
    if !module_suffix.is_empty() {
        parts.extend(module_suffix.split('.'));
    }
    if parts.is_empty() {
        // `from . import x`: the names themselves resolve against the package
        return Some(String::new());
    }
    Some(parts.join("."))
}

/// Resolve a dotted module to a repo-relative file path, trying the module
/// file first and then the package `__init__.py`. Returns None for
/// third-party/stdlib modules (anything not on disk inside the tree).
fn resolve_module(module: &str, repo_root: &Path) -> Option<String> {
    if module.is_empty() {
        return None;
    }

    let mut rel = PathBuf::new();
    for part in module.split('.') {
        if part.is_empty() {
            return None;
        }
        rel.push(part);
    }

    let file = rel.with_extension("py");
    if repo_root.join(&file).is_file() {
        return Some(to_slash(&file));
    }

    let init = rel.join("__init__.py");
    if repo_root.join(&init).is_file() {
        return Some(to_slash(&init));
    }

    None
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
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
            "class BaseRepository:\n    def __init__(self, session):\n        self.session = session\n",
        );
        write(
            root,
            "app/db/database.py",
            "from app.db.base import BaseRepository\n\nrepo = BaseRepository(None)\n",
        );
        write(
            root,
            "app/api/articles.py",
            "import os\nfrom fastapi import APIRouter\nfrom app.db.base import BaseRepository\n\n\nclass ArticleRepository(BaseRepository):\n    pass\n",
        );
        temp
    }

    fn extract(root: &Path, rel: &str) -> Vec<Edge> {
        let mut extractor = EdgeExtractor::new().unwrap();
        extractor.extract_file(&root.join(rel), root).unwrap()
    }

    #[test]
    fn import_and_instantiation_edges() {
        let temp = fixture_tree();
        let edges = extract(temp.path(), "app/db/database.py");

        assert_eq!(
            edges,
            vec![
                Edge::new("app/db/database.py", "app/db/base.py", Relation::Imports),
                Edge::new(
                    "app/db/database.py",
                    "app/db/base.py",
                    Relation::Instantiates
                ),
            ]
        );
    }

    #[test]
    fn inheritance_resolves_through_import_bindings() {
        let temp = fixture_tree();
        let edges = extract(temp.path(), "app/api/articles.py");

        assert!(edges.contains(&Edge::new(
            "app/api/articles.py",
            "app/db/base.py",
            Relation::Inherits
        )));
    }

    #[test]
    fn external_imports_produce_no_edges() {
        let temp = fixture_tree();
        let edges = extract(temp.path(), "app/api/articles.py");

        assert!(edges.iter().all(|e| e.target.starts_with("app/")));
    }

    #[test]
    fn plain_import_resolves_module_and_package() {
        let temp = fixture_tree();
        write(
            temp.path(),
            "app/main.py",
            "import app.db\nimport app.db.base\n",
        );

        let edges = extract(temp.path(), "app/main.py");
        assert_eq!(
            edges,
            vec![
                Edge::new("app/main.py", "app/db/__init__.py", Relation::Imports),
                Edge::new("app/main.py", "app/db/base.py", Relation::Imports),
            ]
        );
    }

    #[test]
    fn from_package_import_prefers_submodule_file() {
        let temp = fixture_tree();
        write(temp.path(), "app/worker.py", "from app.db import base\n");

        let edges = extract(temp.path(), "app/worker.py");
        assert!(edges.contains(&Edge::new(
            "app/worker.py",
            "app/db/base.py",
            Relation::Imports
        )));
    }

    #[test]
    fn relative_imports_resolve_from_the_package() {
        let temp = fixture_tree();
        write(
            temp.path(),
            "app/api/routes.py",
            "from ..db.base import BaseRepository\n\n\nclass RouteRepository(BaseRepository):\n    pass\n",
        );
        write(temp.path(), "app/db/queries.py", "from . import base\n");

        let routes = extract(temp.path(), "app/api/routes.py");
        assert!(routes.contains(&Edge::new(
            "app/api/routes.py",
            "app/db/base.py",
            Relation::Imports
        )));
        assert!(routes.contains(&Edge::new(
            "app/api/routes.py",
            "app/db/base.py",
            Relation::Inherits
        )));

        let queries = extract(temp.path(), "app/db/queries.py");
        assert!(queries.contains(&Edge::new(
            "app/db/queries.py",
            "app/db/base.py",
            Relation::Imports
        )));
    }

    #[test]
    fn unresolved_bases_and_calls_are_dropped_silently() {
        let temp = fixture_tree();
        write(
            temp.path(),
            "app/misc.py",
            "from typing import Protocol\n\n\nclass Thing(Protocol):\n    pass\n\n\nvalue = Dict()\n",
        );

        let edges = extract(temp.path(), "app/misc.py");
        assert!(edges.is_empty());
    }

    #[test]
    fn no_self_edges_are_emitted() {
        let temp = fixture_tree();
        write(
            temp.path(),
            "app/loop.py",
            "from app.loop import helper\n\n\ndef helper():\n    pass\n",
        );

        let edges = extract(temp.path(), "app/loop.py");
        assert!(edges.iter().all(|e| e.source != e.target));
    }

    #[test]
    fn parse_failure_is_an_error_for_that_file_only() {
        let temp = fixture_tree();
        write(temp.path(), "app/broken.py", "def broken(:\n    nope\n");

        let mut extractor = EdgeExtractor::new().unwrap();
        let result = extractor.extract_file(&temp.path().join("app/broken.py"), temp.path());
        assert!(matches!(result, Err(GraphError::ParseFailure(_))));

        // Other files still extract
        let edges = extract(temp.path(), "app/db/database.py");
        assert!(!edges.is_empty());
    }

    #[test]
    fn re_extraction_is_idempotent() {
        let temp = fixture_tree();
        let first = extract(temp.path(), "app/api/articles.py");
        let second = extract(temp.path(), "app/api/articles.py");
        assert_eq!(first, second);
    }

    #[test]
    fn aliased_imports_bind_the_alias() {
        let temp = fixture_tree();
        write(
            temp.path(),
            "app/svc.py",
            "from app.db.base import BaseRepository as Repo\n\nrepo = Repo(None)\n",
        );

        let edges = extract(temp.path(), "app/svc.py");
        assert!(edges.contains(&Edge::new(
            "app/svc.py",
            "app/db/base.py",
            Relation::Instantiates
        )));
    }
}
