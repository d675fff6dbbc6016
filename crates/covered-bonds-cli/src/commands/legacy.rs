use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use covered_bonds_core::legacy::{
    merge, BlockDeclaration, BraceCountingExtractor, FragmentExtractor, LegacySource,
};
use covered_bonds_core::record::{sort_by_issue_date, EmissionRecord};
use covered_bonds_core::synthesis::{generate_corpus, CorpusSummary};
use covered_bonds_core::with_metadata;

use crate::commands::generate::SortArg;
use crate::config::PipelineConfig;
use crate::input;
use crate::output::artifact;

/// Arguments for block extraction
#[derive(Args)]
pub struct ExtractArgs {
    /// JS data module to read
    #[arg(long)]
    pub source: String,

    /// Name of the `const <name> = [ ... ];` declaration
    #[arg(long, default_value = "traditionalBondsData")]
    pub block: String,
}

/// Arguments for the merge
#[derive(Args)]
pub struct MergeArgs {
    /// Existing JS data module whose records are kept
    #[arg(long)]
    pub legacy: String,

    /// JSON array of historical records; generated when omitted
    #[arg(long, conflicts_with_all = ["seed", "now"])]
    pub historical: Option<String>,

    /// Pipeline config file (YAML or JSON) for generation and layout
    #[arg(long)]
    pub config: Option<String>,

    /// RNG seed when generating
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reference date for issue status when generating (YYYY-MM-DD)
    #[arg(long)]
    pub now: Option<NaiveDate>,

    /// Order of the historical records by issue date
    #[arg(long, default_value = "none")]
    pub sort: SortArg,

    /// Merged module to write
    #[arg(long)]
    pub out: String,
}

#[derive(Debug, Serialize)]
struct ExtractOutput {
    block: String,
    fragments_found: usize,
    fragments: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MergeOutput {
    total_emissions: usize,
    historical_records: usize,
    legacy_records: usize,
    auxiliary_blocks_found: usize,
    path: String,
    historical_summary: CorpusSummary,
}

pub fn run_extract(args: ExtractArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let text = input::file::read_text(&args.source)?;
    let fragments =
        BraceCountingExtractor.extract_fragments(&text, &BlockDeclaration::array(&args.block));

    let out = ExtractOutput {
        block: args.block,
        fragments_found: fragments.len(),
        fragments,
    };
    Ok(serde_json::to_value(out)?)
}

pub fn run_merge(args: MergeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let pipeline = PipelineConfig::load(args.config.as_deref())?.resolve(args.seed, args.now);

    let (mut historical, mut warnings, seed): (Vec<EmissionRecord>, Vec<String>, Option<u64>) =
        match args.historical {
            Some(ref path) => (input::file::read_json(path)?, Vec::new(), None),
            None => {
                let generated = generate_corpus(
                    &pipeline.corpus,
                    &pipeline.catalog,
                    &pipeline.periods,
                    &pipeline.amounts,
                )?;
                (generated.result.records, generated.warnings, pipeline.corpus.seed)
            }
        };
    sort_by_issue_date(&mut historical, args.sort.into());

    let text = input::file::read_text(&args.legacy)?;
    let legacy = LegacySource::parse(&text, &pipeline.legacy_blocks, &BraceCountingExtractor);
    if legacy.primary_fragments.is_empty() {
        warnings.push(format!(
            "No records found in '{}' under {}; output holds historical records only",
            args.legacy, pipeline.legacy_blocks.primary
        ));
    }
    for block in legacy.auxiliary.iter().filter(|b| b.text.is_none()) {
        warnings.push(format!("{} block missing from '{}'; emitted empty", block.heading, args.legacy));
    }

    let merged = merge(
        &historical,
        &legacy.primary_fragments,
        &legacy.auxiliary,
        &pipeline.layout,
    );
    artifact::write_artifact(&args.out, &merged)?;

    let result = MergeOutput {
        total_emissions: historical.len() + legacy.primary_fragments.len(),
        historical_records: historical.len(),
        legacy_records: legacy.primary_fragments.len(),
        auxiliary_blocks_found: legacy.auxiliary.iter().filter(|b| b.text.is_some()).count(),
        path: args.out,
        historical_summary: CorpusSummary::from_records(&historical),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Textual merge: rendered historical records, legacy record literals copied verbatim",
        &serde_json::json!({
            "historical_source": args.historical.as_deref().unwrap_or("generated"),
            "legacy_source": args.legacy,
            "primary_block": pipeline.legacy_blocks.primary,
        }),
        warnings,
        elapsed,
        seed,
        result,
    );
    Ok(serde_json::to_value(output)?)
}
