//! Config parsing and resolution.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::ConfguardConfigV1;
pub use resolve::{EffectiveConfig, Overrides};

/// Parse `confguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<ConfguardConfigV1> {
    let cfg: ConfguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config for a run (defaults, then file values, then overrides).
pub fn resolve_config(
    cfg: ConfguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<EffectiveConfig> {
    resolve::resolve_config(cfg, overrides)
}

/// JSON schema of `confguard.toml`.
pub fn config_schema() -> schemars::Schema {
    schemars::schema_for!(ConfguardConfigV1)
}
