//! Fuzz target for rule file compilation.
//!
//! Goal: compiling arbitrary text must **never panic**. Errors are fine.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_rule_file
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = confguard_rules::compile_str("fuzz.toml", text);
    }
});
