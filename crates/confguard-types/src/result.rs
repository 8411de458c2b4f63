use crate::RepoPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Points a result back at the document it was produced for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentRef {
    /// Position of the document in the evaluated input (0-based, input order).
    pub index: u32,
    /// Source file, when the document was decoded from one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<RepoPath>,
}

impl DocumentRef {
    pub fn new(index: u32, path: Option<RepoPath>) -> Self {
        Self { index, path }
    }
}

/// One classified outcome of a single rule against a single document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckResult {
    pub rule: String,
    pub namespace: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub document: DocumentRef,

    /// Rule-provided structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: JsonValue,

    /// Stable identifier intended for dedup and trending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// The four disjoint outcome lists of an evaluation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResultSet {
    pub successes: Vec<CheckResult>,
    pub failures: Vec<CheckResult>,
    pub warnings: Vec<CheckResult>,
    pub exceptions: Vec<CheckResult>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResultCounts {
    pub successes: u32,
    pub failures: u32,
    pub warnings: u32,
    pub exceptions: u32,
}

impl ResultSet {
    /// Append `other` after the records already held, list by list.
    pub fn append(&mut self, other: ResultSet) {
        self.successes.extend(other.successes);
        self.failures.extend(other.failures);
        self.warnings.extend(other.warnings);
        self.exceptions.extend(other.exceptions);
    }

    pub fn counts(&self) -> ResultCounts {
        ResultCounts {
            successes: self.successes.len() as u32,
            failures: self.failures.len() as u32,
            warnings: self.warnings.len() as u32,
            exceptions: self.exceptions.len() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.successes.is_empty()
            && self.failures.is_empty()
            && self.warnings.is_empty()
            && self.exceptions.is_empty()
    }
}
