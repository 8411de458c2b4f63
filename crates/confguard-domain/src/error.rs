use thiserror::Error;

/// Fatal errors of a policy run. None of them is retried: compilation and
/// evaluation are deterministic.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("compile policy {path}: {reason}")]
    Compilation { path: String, reason: String },

    #[error("evaluate '{rule}' in namespace '{namespace}' for document {document}")]
    Evaluation {
        document: u32,
        namespace: String,
        rule: String,
        #[source]
        source: QueryError,
    },

    #[error("evaluation cancelled")]
    Cancelled,
}

impl PolicyError {
    pub fn compilation(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        PolicyError::Compilation {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Error reported by a rule-evaluation engine for a single query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query cancelled")]
    Cancelled,

    #[error("{0}")]
    Engine(String),
}
