//! Expansion of user-supplied paths into concrete file lists.

use anyhow::Context;
use camino::Utf8Path;
use confguard_domain::PolicySource;
use confguard_types::RepoPath;

/// Expand files and directories into a list of decodable files.
///
/// Files are taken as given. Directories are walked with the exclusion pattern applied
/// and only files with a supported extension are kept.
pub fn expand_inputs(
    base: &Utf8Path,
    paths: &[String],
    exclude: &str,
) -> anyhow::Result<Vec<RepoPath>> {
    let mut out = Vec::new();
    for path in paths {
        let abs = base.join(path);
        if abs.is_dir() {
            let found = confguard_repo::discover_files(&abs, exclude)
                .with_context(|| format!("discover files under {path}"))?;
            let before = out.len();
            out.extend(
                found
                    .into_iter()
                    .map(|rel| RepoPath::new(path).join(rel.as_str()))
                    .filter(|p| confguard_repo::supported(p)),
            );
            tracing::debug!(dir = %path, files = out.len() - before, "expanded input directory");
        } else if abs.is_file() {
            out.push(RepoPath::new(path));
        } else {
            anyhow::bail!("input path not found: {path}");
        }
    }
    Ok(out)
}

/// Read every `.toml` policy file under the given policy paths.
pub fn policy_sources(base: &Utf8Path, paths: &[String]) -> anyhow::Result<Vec<PolicySource>> {
    let mut files: Vec<RepoPath> = Vec::new();
    for path in paths {
        let abs = base.join(path);
        if abs.is_dir() {
            let found = confguard_repo::discover_files(&abs, "")
                .with_context(|| format!("discover policies under {path}"))?;
            files.extend(
                found
                    .into_iter()
                    .filter(|rel| is_policy_file(rel))
                    .map(|rel| RepoPath::new(path).join(rel.as_str())),
            );
        } else if abs.is_file() {
            files.push(RepoPath::new(path));
        } else {
            anyhow::bail!("policy path not found: {path}");
        }
    }

    if files.is_empty() {
        anyhow::bail!("no policy files found in {}", paths.join(", "));
    }

    files
        .into_iter()
        .map(|file| {
            let abs = base.join(file.as_str());
            let text =
                std::fs::read_to_string(&abs).with_context(|| format!("read policy {file}"))?;
            Ok(PolicySource { path: file, text })
        })
        .collect()
}

fn is_policy_file(path: &RepoPath) -> bool {
    Utf8Path::new(path.as_str()).extension() == Some("toml")
}
