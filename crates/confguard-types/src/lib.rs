//! Stable DTOs and IDs used across the confguard workspace.
//!
//! This crate is intentionally boring:
//! - the classified result set produced by an evaluation run
//! - the report envelope written by the CLI
//! - stable string IDs (default namespace, rule prefixes, schema names)
//! - canonical relative path handling

#![forbid(unsafe_code)]

pub mod ids;
pub mod path;
pub mod receipt;
pub mod result;

pub use path::RepoPath;
pub use receipt::{ConfguardData, ConfguardReport, ReportEnvelope, ToolMeta, Verdict, SCHEMA_REPORT_V1};
pub use result::{CheckResult, DocumentRef, ResultCounts, ResultSet};
