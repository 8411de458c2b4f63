//! CLI entry point for confguard.
//!
//! This module is thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `confguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use confguard_app::{
    TestInput, TestOutput, run_discover, run_test, serialize_report, verdict_exit_code,
    write_report,
};
use confguard_domain::CancellationToken;
use confguard_settings::Overrides;
use confguard_types::ids;
use std::io::Write;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CONFGUARD_LOG";
const DEFAULT_LOG: &str = "confguard=warn";

#[derive(Parser, Debug)]
#[command(
    name = "confguard",
    version,
    about = "Test structured configuration files against declarative policies"
)]
struct Cli {
    /// Path to the confguard config TOML (default: confguard.toml, optional).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Policy file or directory (repeatable).
    #[arg(long, short, global = true)]
    policy: Vec<String>,

    /// Namespace to evaluate (repeatable).
    #[arg(long, short, global = true)]
    namespace: Vec<String>,

    /// Evaluate every namespace the policies define.
    #[arg(long, global = true)]
    all_namespaces: bool,

    /// Data file or directory exposed to rules under `data.<file stem>` (repeatable).
    #[arg(long, short, global = true)]
    data: Vec<String>,

    /// Regex excluding files during directory discovery; a trailing `/` matches directories.
    #[arg(long, global = true)]
    exclude: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate documents against the policies and emit a JSON report.
    Test {
        /// Files or directories to evaluate.
        #[arg(required = true)]
        paths: Vec<String>,

        /// Return a failing exit code when warnings are found.
        #[arg(long)]
        fail_on_warn: bool,

        /// Evaluate all documents together as one combined document.
        #[arg(long)]
        combine: bool,

        /// Where to write the JSON report (stdout when omitted).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// List the files a directory contributes after exclusion.
    Discover {
        /// Directory to walk.
        dir: Utf8PathBuf,
    },

    /// Print the JSON schema of the config file.
    Schema,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let result = match &cli.cmd {
        Commands::Test {
            paths,
            fail_on_warn,
            combine,
            output,
        } => cmd_test(&cli, paths.clone(), *fail_on_warn, *combine, output.as_deref()),
        Commands::Discover { dir } => cmd_discover(&cli, dir),
        Commands::Schema => cmd_schema(),
    };

    match result {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("confguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn cmd_test(
    cli: &Cli,
    paths: Vec<String>,
    fail_on_warn: bool,
    combine: bool,
    output: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let cfg_text = read_config(cli.config.as_deref())?;

    let overrides = Overrides {
        policy: non_empty(&cli.policy),
        namespaces: non_empty(&cli.namespace),
        all_namespaces: cli.all_namespaces.then_some(true),
        data: non_empty(&cli.data),
        exclude: cli.exclude.clone(),
        fail_on_warn: fail_on_warn.then_some(true),
        combine: combine.then_some(true),
    };

    let input = TestInput {
        base: Utf8Path::new("."),
        config_text: &cfg_text,
        overrides,
        paths,
        cancel: CancellationToken::new(),
    };
    let TestOutput { report, .. } = run_test(input)?;

    match output {
        Some(path) => write_report(path, &report).context("write report json")?,
        None => {
            let data = serialize_report(&report)?;
            std::io::stdout()
                .write_all(&data)
                .context("write report to stdout")?;
        }
    }

    let counts = report.data.counts;
    eprintln!(
        "{} tests, {} passed, {} warnings, {} failures, {} exceptions",
        counts.successes + counts.failures + counts.warnings + counts.exceptions,
        counts.successes,
        counts.warnings,
        counts.failures,
        counts.exceptions,
    );

    Ok(verdict_exit_code(report.verdict))
}

fn cmd_discover(cli: &Cli, dir: &Utf8Path) -> anyhow::Result<i32> {
    let exclude = match &cli.exclude {
        Some(pattern) => pattern.clone(),
        None => {
            let cfg_text = read_config(cli.config.as_deref())?;
            let cfg = confguard_settings::parse_config_toml(&cfg_text).context("parse config")?;
            cfg.exclude.unwrap_or_default()
        }
    };

    let files = run_discover(dir, &exclude)?;
    let mut stdout = std::io::stdout().lock();
    for file in files {
        writeln!(stdout, "{file}").context("write to stdout")?;
    }
    Ok(0)
}

fn cmd_schema() -> anyhow::Result<i32> {
    let schema = confguard_settings::config_schema();
    let text = serde_json::to_string_pretty(&schema).context("serialize config schema")?;
    println!("{text}");
    Ok(0)
}

/// Read the config file. An explicitly named file must exist; the default one is optional.
fn read_config(explicit: Option<&Utf8Path>) -> anyhow::Result<String> {
    match explicit {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("read config: {path}"))
        }
        None => {
            let path = Utf8Path::new(ids::DEFAULT_CONFIG_FILE);
            if path.is_file() {
                std::fs::read_to_string(path).with_context(|| format!("read config: {path}"))
            } else {
                Ok(String::new())
            }
        }
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}
