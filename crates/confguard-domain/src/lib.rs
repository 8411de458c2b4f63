//! Pure policy result aggregation (no IO).
//!
//! Input: decoded documents and a compiled policy behind the [`policy::Policy`] seam.
//! Output: a classified [`confguard_types::ResultSet`] plus verdict helpers.

#![forbid(unsafe_code)]

pub mod cancel;
pub mod classify;
pub mod error;
pub mod model;
pub mod policy;
pub mod report;
pub mod store;

mod fingerprint;
mod run;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use cancel::CancellationToken;
pub use classify::{Category, classify, exception_target, is_failure, is_warning};
pub use error::{PolicyError, QueryError};
pub use model::Document;
pub use policy::{Finding, Policy, PolicyCompiler, PolicySource, QueryContext};
pub use run::{TestRun, effective_namespaces};
pub use store::Store;
