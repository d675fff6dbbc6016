use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use covered_bonds_core::record::{sort_by_issue_date, SortOrder};
use covered_bonds_core::reference::IssuerCatalog;
use covered_bonds_core::synthesis::{generate_corpus, generate_window, Corpus, CorpusSummary, WindowConfig};
use covered_bonds_core::ComputationOutput;

use crate::config::PipelineConfig;
use crate::output::artifact;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Asc,
    Desc,
    None,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortOrder::Ascending,
            SortArg::Desc => SortOrder::Descending,
            SortArg::None => SortOrder::None,
        }
    }
}

/// Arguments for historical corpus generation
#[derive(Args)]
pub struct GenerateArgs {
    /// Pipeline config file (YAML or JSON); also read from piped stdin
    #[arg(long)]
    pub config: Option<String>,

    /// RNG seed; omit for a fresh corpus on every run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reference date for issue status (YYYY-MM-DD)
    #[arg(long)]
    pub now: Option<NaiveDate>,

    /// Order of the written records by issue date
    #[arg(long, default_value = "none")]
    pub sort: SortArg,

    /// Write the records as a JSON array to this file
    #[arg(long)]
    pub out: Option<String>,
}

/// Arguments for window generation
#[derive(Args)]
pub struct WindowArgs {
    /// Number of issues
    #[arg(long, default_value = "480")]
    pub count: u32,

    /// First possible issue date (YYYY-MM-DD)
    #[arg(long, default_value = "2015-01-01")]
    pub start: NaiveDate,

    /// Last possible issue date (YYYY-MM-DD)
    #[arg(long, default_value = "2026-12-31")]
    pub end: NaiveDate,

    /// Chance an issue without a green label is flagged green anyway
    #[arg(long, default_value = "0.15")]
    pub green_probability: f64,

    /// RNG seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reference date for issue status (YYYY-MM-DD)
    #[arg(long)]
    pub now: Option<NaiveDate>,

    /// Write the records as a JSON array to this file
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Debug, Serialize)]
struct WrittenCorpus {
    records_written: usize,
    path: String,
    summary: CorpusSummary,
}

pub fn run_generate(args: GenerateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pipeline = PipelineConfig::load(args.config.as_deref())?.resolve(args.seed, args.now);
    let mut output = generate_corpus(
        &pipeline.corpus,
        &pipeline.catalog,
        &pipeline.periods,
        &pipeline.amounts,
    )?;
    sort_by_issue_date(&mut output.result.records, args.sort.into());

    finish(output, args.out)
}

pub fn run_generate_window(args: WindowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let defaults = WindowConfig::default();
    let config = WindowConfig {
        seed: args.seed,
        now: args.now.unwrap_or(defaults.now),
        start: args.start,
        end: args.end,
        count: args.count,
        green_probability: args.green_probability,
    };
    let output = generate_window(&config, &IssuerCatalog::window())?;

    finish(output, args.out)
}

/// Write the records when `--out` is given and report only the summary;
/// otherwise return the whole corpus.
fn finish(
    output: ComputationOutput<Corpus>,
    out: Option<String>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let Some(path) = out else {
        return Ok(serde_json::to_value(output)?);
    };

    let json = serde_json::to_string_pretty(&output.result.records)?;
    artifact::write_artifact(&path, &json)?;

    let report = ComputationOutput {
        result: WrittenCorpus {
            records_written: output.result.records.len(),
            path,
            summary: output.result.summary,
        },
        methodology: output.methodology,
        assumptions: output.assumptions,
        warnings: output.warnings,
        metadata: output.metadata,
    };
    Ok(serde_json::to_value(report)?)
}
