//! CLI host wrapper around [`entity_engine::Engine`].
//!
//! A documented external collaborator (§4.11): reads documents from disk,
//! drives the engine, and writes JSON artifacts. Exit codes follow §6:
//! `0` success, `1` usage/config, `2` I/O, `3` engine internal error.
//!
//! Mirrors `AEtherlight-ai-lumina`'s split: library stages return
//! `thiserror` enums, this binary wraps disk I/O in `anyhow::Context` and
//! only then maps the outcome down to one of the four exit codes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use entity_engine::diagnostics::Diagnostics;
use entity_engine::{Artifact, DocumentError, DocumentRequest, Engine, EngineConfig};

/// Run the entity extraction engine over one or more text files.
#[derive(Parser, Debug)]
#[command(name = "engine-cli", version, about)]
struct Cli {
    /// Input document(s) to process; each file becomes one DocumentRequest.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Optional TOML config file overriding engine defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Named pattern set to apply.
    #[arg(long, default_value = "default")]
    pattern_set: String,

    /// Per-document deadline in milliseconds.
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Directory to write one `<document_id>.json` artifact per input; if
    /// omitted, artifacts are written to stdout.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

/// The outcome of reading one input file: either a well-formed request to
/// hand to the engine, or a pre-built artifact for a document that never
/// reaches the pipeline (§7: a per-document failure never aborts the
/// batch — other documents still proceed).
enum Intake {
    Request(DocumentRequest),
    Skipped(Artifact),
}

fn read_requests(inputs: &[PathBuf], pattern_set: &str, deadline_ms: Option<u64>) -> Result<Vec<Intake>> {
    inputs
        .iter()
        .map(|path| {
            let document_id = path.display().to_string();
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read input document {}", path.display()))?;

            match String::from_utf8(bytes) {
                Ok(text) => Ok(Intake::Request(DocumentRequest {
                    document_id,
                    text,
                    pattern_set: pattern_set.to_string(),
                    deadline_ms,
                })),
                Err(err) => {
                    let invalid_at = err.utf8_error().valid_up_to();
                    tracing::warn!(%document_id, invalid_at, "document is not valid UTF-8, skipping");
                    let mut diagnostics = Diagnostics::new(pattern_set.to_string());
                    diagnostics.record_rejection(DocumentError::InvalidUtf8(invalid_at).to_string());
                    Ok(Intake::Skipped(Artifact {
                        document_id,
                        rewritten_text: String::new(),
                        entities: Vec::new(),
                        facts: Vec::new(),
                        diagnostics,
                    }))
                }
            }
        })
        .collect()
}

fn write_artifact(artifact: &entity_engine::Artifact, out_dir: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(artifact).context("failed to serialize artifact")?;
    match out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("failed to create out_dir {}", dir.display()))?;
            let safe_name = artifact.document_id.replace(['/', '\\'], "_");
            let out_path = dir.join(format!("{safe_name}.json"));
            std::fs::write(&out_path, json).with_context(|| format!("failed to write artifact {}", out_path.display()))
        }
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    entity_engine::logging::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(%err, "failed to load config");
                return ExitCode::from(1);
            }
        },
        None => EngineConfig::default(),
    };

    let engine = match Engine::new(config) {
        Ok(engine) => engine,
        Err(err) => {
            tracing::error!(%err, "engine construction failed");
            return ExitCode::from(1);
        }
    };

    let intakes = match read_requests(&cli.inputs, &cli.pattern_set, cli.deadline_ms) {
        Ok(intakes) => intakes,
        Err(err) => {
            tracing::error!(%err, "failed to read input documents");
            return ExitCode::from(2);
        }
    };

    // Slots preserve input order; a `Some` is a document that never
    // reached the engine (e.g. invalid UTF-8), everything else is filled
    // in from the engine's batch output below.
    let mut slots: Vec<Option<Artifact>> = Vec::with_capacity(intakes.len());
    let mut requests = Vec::new();
    for intake in intakes {
        match intake {
            Intake::Request(request) => {
                requests.push(request);
                slots.push(None);
            }
            Intake::Skipped(artifact) => slots.push(Some(artifact)),
        }
    }

    let batch_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| engine.process_batch(&requests)));
    let mut batch_artifacts = match batch_result {
        Ok(artifacts) => artifacts.into_iter(),
        Err(_) => {
            tracing::error!("engine panicked while processing batch");
            return ExitCode::from(3);
        }
    };

    let artifacts: Vec<Artifact> = slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| batch_artifacts.next().expect("one batch artifact per request slot")))
        .collect();

    for artifact in &artifacts {
        if let Err(err) = write_artifact(artifact, cli.out_dir.as_deref()) {
            tracing::error!(%err, "failed to write artifact");
            return ExitCode::from(2);
        }
    }

    ExitCode::SUCCESS
}
