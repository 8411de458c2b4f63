//! The `discover` use case: list the files a directory contributes after exclusion.

use anyhow::Context;
use camino::Utf8Path;
use confguard_types::RepoPath;

/// Files under `root` surviving `exclude`, relative to `root` and sorted.
pub fn run_discover(root: &Utf8Path, exclude: &str) -> anyhow::Result<Vec<RepoPath>> {
    confguard_repo::discover_files(root, exclude).with_context(|| format!("discover files under {root}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_files_and_reports_walk_errors() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        std::fs::create_dir_all(root.join("parent")).expect("mkdir");
        std::fs::write(root.join("a.json"), "{}").expect("write");
        std::fs::write(root.join("parent/b.json"), "{}").expect("write");

        let all = run_discover(root, "").expect("discover");
        assert_eq!(all.len(), 2);
        let kept = run_discover(root, "parent/").expect("discover");
        assert_eq!(kept, vec![RepoPath::new("a.json")]);

        let err = run_discover(&root.join("missing"), "").unwrap_err();
        assert!(err.to_string().contains("missing"), "{err}");
    }
}
