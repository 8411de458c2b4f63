//! Use case orchestration for confguard.
//!
//! This crate provides the application layer: use cases that coordinate the settings, repo,
//! rules and domain layers. It is thin and delegates heavy lifting to those layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod discover;
mod evaluate;
mod inputs;
mod report;

pub use discover::run_discover;
pub use evaluate::{TestInput, TestOutput, run_test, verdict_exit_code};
pub use inputs::{expand_inputs, policy_sources};
pub use report::{parse_report_json, serialize_report, write_report};
