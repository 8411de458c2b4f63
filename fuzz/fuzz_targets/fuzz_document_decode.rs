//! Fuzz target for document decoding.
//!
//! Goal: decoding arbitrary text in any supported format must **never panic**.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_document_decode
//! ```

#![no_main]

use arbitrary::Arbitrary;
use confguard_types::RepoPath;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Extension {
    Json,
    JsonLines,
    Toml,
}

#[derive(Arbitrary, Debug)]
struct DecodeInput {
    extension: Extension,
    text: String,
}

fuzz_target!(|input: DecodeInput| {
    if input.text.len() > 64 * 1024 {
        return;
    }
    let name = match input.extension {
        Extension::Json => "doc.json",
        Extension::JsonLines => "doc.jsonl",
        Extension::Toml => "doc.toml",
    };
    let _ = confguard_repo::decode(&RepoPath::new(name), &input.text);
});
