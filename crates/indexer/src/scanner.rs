use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Scanner for finding Python source files in a tree
pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Scan for `.py` files (.gitignore aware), sorted by relative path so
    /// batch passes are deterministic
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);
        builder.filter_entry(move |entry| !FileScanner::is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !Self::is_python_file(path) {
                        continue;
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} Python files", files.len());
        files
    }

    fn is_python_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("py"))
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        if let Ok(relative) = path.strip_prefix(root) {
            for component in relative.components() {
                if let std::path::Component::Normal(name) = component {
                    let lowered = name.to_string_lossy().to_lowercase();
                    if IGNORED_SCOPES.iter().any(|ignored| ignored == &lowered) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

const IGNORED_SCOPES: &[&str] = &[
    // VCS / tooling
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    // caches / builds / envs
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".tox",
    ".venv",
    "venv",
    "node_modules",
    "build",
    "dist",
    "target",
];

#[cfg(test)]
mod tests {
    use super::FileScanner;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finds_only_python_files_sorted() {
        let temp = tempdir().unwrap();
        let app = temp.path().join("app");
        fs::create_dir_all(&app).unwrap();
        fs::write(app.join("zeta.py"), b"x = 1").unwrap();
        fs::write(app.join("alpha.py"), b"y = 2").unwrap();
        fs::write(app.join("notes.md"), b"# notes").unwrap();

        let scanner = FileScanner::new(temp.path());
        let files = scanner.scan();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("alpha.py"));
        assert!(files[1].ends_with("zeta.py"));
    }

    #[test]
    fn skips_cache_and_env_directories() {
        let temp = tempdir().unwrap();
        let cache = temp.path().join("__pycache__");
        let venv = temp.path().join(".venv").join("lib");
        fs::create_dir_all(&cache).unwrap();
        fs::create_dir_all(&venv).unwrap();
        fs::write(cache.join("mod.py"), b"x = 1").unwrap();
        fs::write(venv.join("site.py"), b"y = 2").unwrap();
        fs::write(temp.path().join("main.py"), b"z = 3").unwrap();

        let scanner = FileScanner::new(temp.path());
        let files = scanner.scan();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.py"));
    }

    #[test]
    fn respects_gitignore() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        let generated = temp.path().join("generated");
        fs::create_dir_all(&generated).unwrap();
        fs::write(generated.join("gen.py"), b"x = 1").unwrap();
        fs::write(temp.path().join("main.py"), b"y = 2").unwrap();
        fs::write(temp.path().join(".gitignore"), b"/generated\n").unwrap();

        let scanner = FileScanner::new(temp.path());
        let files = scanner.scan();

        assert!(files.iter().all(|p| !p.to_string_lossy().contains("generated")));
        assert!(files.iter().any(|p| p.ends_with("main.py")));
    }
}
