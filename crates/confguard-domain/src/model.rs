use confguard_types::{DocumentRef, RepoPath};
use serde_json::Value;

/// One decoded configuration unit subject to policy evaluation.
///
/// The tree is owned by the caller; the engine only reads it.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub source: DocumentRef,
    pub content: Value,
}

impl Document {
    pub fn new(index: u32, path: Option<RepoPath>, content: Value) -> Self {
        Self {
            source: DocumentRef::new(index, path),
            content,
        }
    }

    pub fn index(&self) -> u32 {
        self.source.index
    }

    pub fn path(&self) -> Option<&RepoPath> {
        self.source.path.as_ref()
    }
}
