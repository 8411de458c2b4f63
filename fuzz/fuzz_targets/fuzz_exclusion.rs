//! Fuzz target for exclusion patterns.
//!
//! Goal: parsing a pattern and testing it against arbitrary paths must **never panic**.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_exclusion
//! ```

#![no_main]

use arbitrary::Arbitrary;
use confguard_repo::Exclusion;
use confguard_types::RepoPath;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct ExclusionInput {
    pattern: String,
    paths: Vec<String>,
}

fuzz_target!(|input: ExclusionInput| {
    if input.pattern.len() > 256 || input.paths.len() > 100 {
        return;
    }
    let Ok(exclusion) = Exclusion::parse(&input.pattern) else {
        return;
    };
    for path in input.paths.iter().filter(|p| p.len() <= 512) {
        let _ = exclusion.excludes(&RepoPath::new(path));
    }
});
