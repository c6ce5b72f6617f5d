use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use scgsearch::config::{PipelineConfig, DEFAULT_THREADS};
use scgsearch::pipeline::Pipeline;
use scgsearch::runner::{resolve_tool, SystemRunner};

/// scgsearch - single copy gene detection in a protein set
///
/// Candidates are proteins hit by a known SCG (ublast, evalue 0.01). Each
/// candidate is then searched against the whole database (evalue 1e-5, best hit
/// only) and annotated when its best hit is in the lookup and the alignment spans
/// more than 50% of that target.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Full path to the usearch binary
    #[clap(long = "usearch")]
    usearch: PathBuf,

    /// Input protein FASTA; all outputs are written next to it
    #[clap(long = "proteins")]
    proteins: PathBuf,

    /// Protein database FASTA
    #[clap(long = "database")]
    database: PathBuf,

    /// FASTA of the known single copy genes, a subset of the database
    #[clap(long = "scgs")]
    scgs: PathBuf,

    /// Lookup file: database protein ID, then SCG ID, whitespace separated
    #[clap(long = "lookup")]
    lookup: PathBuf,

    /// pullseq binary used to extract candidate sequences
    #[clap(long = "pullseq", default_value = "pullseq")]
    pullseq: PathBuf,

    /// Number of usearch threads
    #[clap(short = 't', long = "threads", default_value_t = DEFAULT_THREADS)]
    threads: usize,

    /// Quiet mode (warnings and errors only)
    #[clap(long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = PipelineConfig {
        usearch: resolve_tool(&args.usearch)?,
        pullseq: resolve_tool(&args.pullseq)?,
        proteins: args.proteins,
        database: args.database,
        scgs: args.scgs,
        lookup: args.lookup,
        threads: args.threads,
    };

    let summary = Pipeline::new(config, SystemRunner).run()?;
    log::info!(
        "Successfully finished: {} of {} candidates annotated",
        summary.stats.annotated,
        summary.candidates
    );

    Ok(())
}
