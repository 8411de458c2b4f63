//! Filesystem adapters: discover input files, decode documents and data files.
//!
//! This crate is allowed to do filesystem IO. It does not evaluate policies; decoded
//! documents are handed to `confguard-domain` by the caller.

#![forbid(unsafe_code)]

mod discover;
mod load;

pub use discover::{DiscoverError, Exclusion, discover_files};
pub use load::{LoadError, decode, load_documents, load_store, supported};
