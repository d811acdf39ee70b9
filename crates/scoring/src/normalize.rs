use once_cell::sync::Lazy;
use regex::Regex;

/// Anchors for auto-detecting the repo-relative suffix of an absolute path
static SOURCE_ROOT_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|/)((?:app|tests)/.+)").expect("valid anchor regex"));

/// Strip any absolute filesystem prefix down to the repo-relative form.
///
/// A configured repo root wins; otherwise the first `app/`- or
/// `tests/`-rooted suffix anchors the path; otherwise only leading slashes
/// are trimmed.
#[must_use]
pub fn normalize_path(path: &str, repo_root: Option<&str>) -> String {
    if let Some(root) = repo_root {
        if !root.is_empty() && path.starts_with(root) {
            return path[root.len()..].trim_start_matches('/').to_string();
        }
    }

    if let Some(caps) = SOURCE_ROOT_ANCHOR.captures(path) {
        return caps[1].to_string();
    }

    path.trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_configured_repo_root() {
        assert_eq!(
            normalize_path("/work/repo/app/db/base.py", Some("/work/repo")),
            "app/db/base.py"
        );
    }

    #[test]
    fn anchors_on_known_source_roots() {
        assert_eq!(
            normalize_path("/home/agent/target/app/db/base.py", None),
            "app/db/base.py"
        );
        assert_eq!(
            normalize_path("/tmp/x/tests/test_auth.py", None),
            "tests/test_auth.py"
        );
    }

    #[test]
    fn already_relative_paths_pass_through() {
        assert_eq!(normalize_path("app/main.py", None), "app/main.py");
        assert_eq!(normalize_path("README.md", None), "README.md");
    }

    #[test]
    fn bare_absolute_paths_lose_leading_slashes() {
        assert_eq!(normalize_path("/etc/hosts", None), "etc/hosts");
    }
}
