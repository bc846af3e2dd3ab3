use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vocalcheck::{record_fields, Candidate, VocalConfig};

/// Score a transcribed confirmation against expected values.
///
/// Candidates come either from the command line or from a JSON record; with
/// a record every field is scored separately.
#[derive(Debug, Parser)]
#[command(name = "vocalcheck", version)]
struct Args {
    /// YAML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "VOCALCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// JSON record whose fields are the candidates.
    #[arg(short, long)]
    record: Option<PathBuf>,

    /// Only score this field of the record (dotted label).
    #[arg(short, long, requires = "record")]
    field: Option<String>,

    /// Require lexical overlap before accepting a match (for names).
    #[arg(long)]
    require_overlap: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long)]
    log_json: bool,

    /// Transcribed utterance.
    utterance: String,

    /// Expected values, when no record is given.
    candidates: Vec<String>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = match &args.config {
        Some(path) => VocalConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => VocalConfig::default(),
    };
    let engine = config.build_engine().context("building match engine")?;
    if engine.is_degraded() {
        warn!(degraded = true, "scoring_ngram_only");
    }

    let output = match &args.record {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading record {}", path.display()))?;
            let record: Value = serde_json::from_str(&raw)
                .with_context(|| format!("parsing record {}", path.display()))?;

            let mut fields = record_fields(&record);
            if let Some(label) = &args.field {
                fields.retain(|f| &f.label == label);
                if fields.is_empty() {
                    bail!("record has no field `{label}`");
                }
            }

            info!(fields = fields.len(), record = %path.display(), "record_loaded");

            let scored: Vec<Value> = fields
                .iter()
                .map(|field| {
                    let results = engine.match_utterance_to_candidates(
                        &args.utterance,
                        &field.candidates,
                        args.require_overlap,
                    );
                    json!({ "field": field.label, "results": results })
                })
                .collect();
            json!({
                "utterance": args.utterance,
                "degraded": engine.is_degraded(),
                "fields": scored,
            })
        }
        None => {
            if args.candidates.is_empty() {
                bail!("no candidates: pass expected values or --record");
            }
            let candidates: Vec<Candidate> = args
                .candidates
                .iter()
                .enumerate()
                .map(|(i, text)| Candidate::new(format!("arg{i}"), text.as_str()))
                .collect();
            let results =
                engine.match_utterance_to_candidates(&args.utterance, &candidates, args.require_overlap);
            json!({
                "utterance": args.utterance,
                "degraded": engine.is_degraded(),
                "results": results,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
