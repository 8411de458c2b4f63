use camino::{Utf8Path, Utf8PathBuf};
use confguard_types::RepoPath;
use regex::Regex;
use std::path::PathBuf;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("invalid exclusion pattern '{pattern}'")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("walk {path}")]
    Walk {
        path: Utf8PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8 { path: PathBuf },
}

/// Compiled exclusion pattern.
///
/// A trailing `/` makes it a directory pattern, tested against every directory between
/// the root and the file. Otherwise it is tested against the file name only. Matching
/// is unanchored.
#[derive(Clone, Debug)]
pub enum Exclusion {
    None,
    Directory(Regex),
    File(Regex),
}

impl Exclusion {
    pub fn parse(pattern: &str) -> Result<Self, DiscoverError> {
        if pattern.is_empty() {
            return Ok(Exclusion::None);
        }
        let (body, directory) = match pattern.strip_suffix('/') {
            Some(body) => (body, true),
            None => (pattern, false),
        };
        let re = Regex::new(body).map_err(|source| DiscoverError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(if directory {
            Exclusion::Directory(re)
        } else {
            Exclusion::File(re)
        })
    }

    pub fn excludes(&self, path: &RepoPath) -> bool {
        match self {
            Exclusion::None => false,
            Exclusion::Directory(re) => path.parent_segments().any(|dir| re.is_match(dir)),
            Exclusion::File(re) => re.is_match(path.file_name()),
        }
    }

    /// Whether the walk should skip the directory `name` and everything under it.
    fn prunes_directory(&self, name: &str) -> bool {
        match self {
            Exclusion::Directory(re) => re.is_match(name),
            _ => false,
        }
    }
}

/// List every regular file under `root` that survives the exclusion pattern.
///
/// Paths are relative to `root`, sorted and unique. Any traversal failure fails the
/// whole call.
pub fn discover_files(root: &Utf8Path, exclude: &str) -> Result<Vec<RepoPath>, DiscoverError> {
    let exclusion = Exclusion::parse(exclude)?;

    let mut out: Vec<RepoPath> = Vec::new();
    let mut skipped = 0usize;

    // Excluded directories are never entered, so unreadable ones cannot fail the walk.
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        let pruned = entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| exclusion.prunes_directory(name));
        if pruned {
            tracing::trace!(dir = %entry.path().display(), "pruned excluded directory");
        }
        !pruned
    });

    for entry in walker {
        let entry = entry.map_err(|source| DiscoverError::Walk {
            path: source
                .path()
                .and_then(Utf8Path::from_path)
                .map(Utf8Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let rel = Utf8Path::from_path(rel).ok_or_else(|| DiscoverError::NonUtf8 {
            path: entry.path().to_path_buf(),
        })?;
        let path = RepoPath::from_components(rel.components().map(|c| c.as_str()));

        if exclusion.excludes(&path) {
            skipped += 1;
            continue;
        }
        out.push(path);
    }

    out.sort();
    out.dedup();

    tracing::debug!(root = %root, files = out.len(), excluded = skipped, "discovered files");
    Ok(out)
}
