//! A small declarative rule engine behind the `confguard_domain::policy` seam.
//!
//! Rule files are TOML. Each file declares a `package` (the namespace, `main` when
//! omitted), any number of `[[rule]]` tables and any number of `[[exception]]` tables:
//!
//! ```toml
//! package = "main"
//!
//! [[rule]]
//! name = "deny_run_as_root"
//! message = "containers must not run as root"
//! when = [
//!   { path = "kind", equals = "Deployment" },
//!   { path = "spec.template.spec.securityContext.runAsNonRoot", not_equals = true },
//! ]
//!
//! [[exception]]
//! rules = ["run_as_root"]
//! when = [{ path = "metadata.name", equals = "can-run-as-root" }]
//! ```
//!
//! Severity is carried by the rule name only; the aggregator classifies it.

#![forbid(unsafe_code)]

mod compile;
mod compiled;
mod condition;
mod parse;
mod selector;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod tests;

pub use compile::{RuleCompiler, compile_str};
pub use compiled::CompiledRules;
pub use selector::Selector;
