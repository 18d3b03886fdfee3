// crates/cli/src/main.rs
//! queryscope binary: batch evaluation of session logs.
//!
//! Walks a file or directory of session-log JSON files, evaluates each
//! against its schema universe, and writes one report per log into the
//! results directory. Per-log failures are logged and counted; the batch
//! keeps going.

mod report;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use queryscope_core::{evaluate_session, SchemaUniverse, SessionLog};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use report::{render_json, render_text, ReportFormat};

#[derive(Debug, Parser)]
#[command(
    name = "queryscope",
    about = "Coverage and cohesion metrics for SQL query-recommendation sessions",
    version
)]
struct Args {
    /// One session-log JSON file, or a directory of them (searched
    /// recursively for *.json).
    #[arg(long)]
    logs: PathBuf,

    /// One schema file (.json or .sql) applied to every log.
    #[arg(long, conflicts_with = "schema_dir")]
    schema: Option<PathBuf>,

    /// Per-database schema root: each log's dbId resolves to
    /// <dir>/<dbId>/schema.json or <dir>/<dbId>/schema.sql.
    #[arg(long)]
    schema_dir: Option<PathBuf>,

    /// Directory for per-log report files (named after the log stem).
    #[arg(long, default_value = "results")]
    out: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

/// Collect the log files to evaluate, sorted for deterministic order.
fn collect_log_files(logs: &Path) -> Result<Vec<PathBuf>> {
    if logs.is_file() {
        return Ok(vec![logs.to_path_buf()]);
    }
    if !logs.is_dir() {
        bail!("log path does not exist: {}", logs.display());
    }
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(logs)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Resolve the schema universe for one log under `--schema-dir`.
///
/// A missing or unparsable schema degrades to the empty universe with a
/// warning (coverage 0), matching the engine's defined behavior.
fn resolve_universe(schema_dir: &Path, log: &SessionLog, log_path: &Path) -> SchemaUniverse {
    let Some(db_id) = log.db_id.as_deref() else {
        warn!(
            log = %log_path.display(),
            "log has no dbId; coverage will use an empty universe"
        );
        return SchemaUniverse::empty();
    };
    let candidates = [
        schema_dir.join(db_id).join("schema.json"),
        schema_dir.join(db_id).join("schema.sql"),
    ];
    for candidate in &candidates {
        if candidate.is_file() {
            match SchemaUniverse::load(candidate) {
                Ok(universe) => return universe,
                Err(e) => {
                    warn!(schema = %candidate.display(), error = %e, "schema load failed");
                    return SchemaUniverse::empty();
                }
            }
        }
    }
    warn!(
        db_id,
        dir = %schema_dir.display(),
        "no schema found for database; coverage will use an empty universe"
    );
    SchemaUniverse::empty()
}

/// Evaluate one log file and write its report. Returns the report path.
fn evaluate_one(
    log_path: &Path,
    shared_universe: Option<&SchemaUniverse>,
    schema_dir: Option<&Path>,
    out_dir: &Path,
    format: ReportFormat,
) -> Result<PathBuf> {
    let log = SessionLog::load(log_path)?;

    let universe = match (shared_universe, schema_dir) {
        (Some(universe), _) => universe.clone(),
        (None, Some(dir)) => resolve_universe(dir, &log, log_path),
        (None, None) => SchemaUniverse::empty(),
    };

    let metrics = evaluate_session(&log, &universe);
    let rendered = match format {
        ReportFormat::Text => render_text(&metrics),
        ReportFormat::Json => render_json(&metrics),
    };

    let stem = log_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("session");
    let report_path = out_dir.join(format!("{stem}.{}", format.extension()));
    std::fs::write(&report_path, rendered)
        .with_context(|| format!("writing report {}", report_path.display()))?;
    Ok(report_path)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let files = collect_log_files(&args.logs)?;
    if files.is_empty() {
        bail!("no session logs (*.json) found under {}", args.logs.display());
    }

    if args.schema.is_none() && args.schema_dir.is_none() {
        warn!("no --schema or --schema-dir given; coverage ratios will all be 0");
    }

    // A shared --schema that fails to load fails the whole batch: every
    // log would produce meaningless coverage.
    let shared_universe = args
        .schema
        .as_deref()
        .map(|path| {
            SchemaUniverse::load(path)
                .with_context(|| format!("loading schema {}", path.display()))
        })
        .transpose()?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating results directory {}", args.out.display()))?;

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} {msg}",
    )?);

    let mut failed = 0usize;
    for log_path in &files {
        progress.set_message(
            log_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string(),
        );
        match evaluate_one(
            log_path,
            shared_universe.as_ref(),
            args.schema_dir.as_deref(),
            &args.out,
            args.format,
        ) {
            Ok(_) => {}
            Err(e) => {
                failed += 1;
                warn!(log = %log_path.display(), error = %e, "evaluation failed");
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let evaluated = files.len() - failed;
    eprintln!(
        "Evaluated {evaluated}/{} session log(s); reports in {}",
        files.len(),
        args.out.display()
    );

    if evaluated == 0 {
        bail!("every session log failed to evaluate");
    }
    Ok(())
}
