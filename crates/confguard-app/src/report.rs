use anyhow::Context;
use camino::Utf8Path;
use confguard_types::ConfguardReport;

pub fn serialize_report(report: &ConfguardReport) -> anyhow::Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(report).context("serialize report")?;
    data.push(b'\n');
    Ok(data)
}

pub fn parse_report_json(text: &str) -> anyhow::Result<ConfguardReport> {
    serde_json::from_str(text).context("parse report json")
}

/// Write the report as pretty JSON, creating parent directories as needed.
pub fn write_report(path: &Utf8Path, report: &ConfguardReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    let data = serialize_report(report)?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}
