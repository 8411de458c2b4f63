//! Developer tasks (schema generation and drift checks).
//!
//! Kept separate from the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

/// Project root (parent of the xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("determine current directory")?,
    };

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(PathBuf::from)
            .context("xtask directory has no parent")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "confguard.report.v1.json",
            generate: || schema_for!(confguard_types::ConfguardReport),
        },
        SchemaSpec {
            filename: "confguard.config.v1.json",
            generate: confguard_settings::config_schema,
        },
    ]
}

/// Pretty JSON with a trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Fail when a schema in `schemas/` differs from what the types generate.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut stale = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        let expected = serialize_schema(&(spec.generate)())?;
        match fs::read_to_string(&path) {
            Ok(actual) if actual == expected => {}
            Ok(_) => stale.push(format!("{} (out of date)", spec.filename)),
            Err(_) => stale.push(format!("{} (missing)", spec.filename)),
        }
    }

    if stale.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for name in &stale {
        eprintln!("  - {name}");
    }
    eprintln!("\nRun `cargo run -p xtask -- emit-schemas` to regenerate.");
    bail!("schema validation failed")
}

/// Compile the generated report schema.
fn report_validator() -> anyhow::Result<jsonschema::Validator> {
    let schema = serde_json::to_value(schema_for!(confguard_types::ConfguardReport))
        .context("serialize report schema")?;
    jsonschema::validator_for(&schema).map_err(|e| anyhow::anyhow!("compile report schema: {e}"))
}

/// Validate a report file written by `confguard test` against the report schema.
fn validate_report(path: &str) -> anyhow::Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("read report {path}"))?;
    let report: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parse report {path}"))?;

    let validator = report_validator()?;
    let errors: Vec<String> = validator
        .iter_errors(&report)
        .map(|e| e.to_string())
        .collect();
    if errors.is_empty() {
        println!("{path}: valid confguard.report.v1");
        return Ok(());
    }
    for error in &errors {
        eprintln!("  - {error}");
    }
    bail!("{path} does not match the report schema")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check that schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  validate-report   Validate a JSON report file against the report schema");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(String::as_str).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "validate-report" => match args.get(2) {
            Some(path) => validate_report(path),
            None => bail!("validate-report needs a report path"),
        },
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo run -p xtask -- help` for usage."),
    }
    .context("xtask failed")
}
