use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical relative path used in results and reports.
///
/// Normalization rules are intentionally simple and deterministic:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - empty input becomes `.`
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RepoPath(String);

impl Default for RepoPath {
    fn default() -> Self {
        RepoPath::new(".")
    }
}

impl RepoPath {
    /// Path typed by a user; a backslash is read as a separator.
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self::normalized(s.as_ref().replace('\\', "/"))
    }

    /// Path from segments already split by the filesystem.
    ///
    /// Segments are kept verbatim, so a backslash inside a Unix file name stays part
    /// of that name.
    pub fn from_components<'a, I>(segments: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let joined = segments
            .into_iter()
            .filter(|s| !s.is_empty() && *s != ".")
            .collect::<Vec<_>>()
            .join("/");
        Self::normalized(joined)
    }

    fn normalized(mut v: String) -> Self {
        while v.starts_with("./") {
            v = v.trim_start_matches("./").to_string();
        }
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a relative path that already uses `/` separators.
    pub fn join(&self, segment: &str) -> RepoPath {
        if self.0 == "." {
            return Self::normalized(segment.to_string());
        }
        Self::normalized(format!("{}/{}", self.0.trim_end_matches('/'), segment))
    }

    /// Final path segment (the file name).
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Every segment before the file name, outermost first.
    pub fn parent_segments(&self) -> impl Iterator<Item = &str> {
        let mut segments: Vec<&str> = self.0.split('/').collect();
        segments.pop();
        segments.into_iter().filter(|s| !s.is_empty() && *s != ".")
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Utf8Path> for RepoPath {
    fn from(value: &Utf8Path) -> Self {
        RepoPath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for RepoPath {
    fn from(value: Utf8PathBuf) -> Self {
        RepoPath::new(value.as_str())
    }
}
