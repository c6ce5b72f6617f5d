//! Two-stage SCG search: candidate search, extraction, verification, annotation.

use anyhow::{Context, Result};
use std::io::BufWriter;
use std::path::PathBuf;

use crate::annotate::{annotate_alignments, JoinStats};
use crate::candidates::collect_candidates;
use crate::config::{OutputPaths, PipelineConfig};
use crate::gateway::{Pullseq, SearchParams, Usearch};
use crate::lookup::build_lookup;
use crate::record::AlignmentReader;
use crate::runner::ToolRunner;
use crate::scratch::Intermediate;

/// What a completed run produced
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    pub candidates: usize,
    pub stats: JoinStats,
    pub output: PathBuf,
}

pub struct Pipeline<R: ToolRunner> {
    config: PipelineConfig,
    runner: R,
}

impl<R: ToolRunner> Pipeline<R> {
    pub fn new(config: PipelineConfig, runner: R) -> Self {
        Pipeline { config, runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn run(&self) -> Result<PipelineSummary> {
        let cfg = &self.config;
        let paths: OutputPaths = cfg.outputs();
        let usearch = Usearch::new(&cfg.usearch, cfg.threads);
        let pullseq = Pullseq::new(&cfg.pullseq);

        log::info!("Database of all proteins: {}", cfg.database.display());
        log::info!("Database of SCGs: {}", cfg.scgs.display());
        log::info!("Database lookup: {}", cfg.lookup.display());

        let db_index = Intermediate::new(&paths.database_index);
        usearch.make_index(&self.runner, &cfg.database, db_index.path())?;

        log::info!("Finding SCG candidates...");
        let input_index = Intermediate::new(&paths.input_index);
        usearch.make_index(&self.runner, &cfg.proteins, input_index.path())?;
        usearch.search(
            &self.runner,
            &SearchParams::candidate_search(&cfg.scgs, input_index.path(), &paths.candidate_hits),
        )?;
        input_index.remove()?;

        let candidates = collect_candidates(&mut AlignmentReader::open(&paths.candidate_hits)?)?;
        if candidates.is_empty() {
            log::warn!(
                "No SCG candidates found in {}",
                paths.candidate_hits.display()
            );
        } else {
            log::info!("{} SCG candidates selected", candidates.len());
        }

        let candidate_count = candidates.len();
        let mut whitelist = tempfile::Builder::new()
            .prefix(".scg-whitelist-")
            .tempfile_in(&paths.dir)
            .with_context(|| format!("Failed to create whitelist in {}", paths.dir.display()))?;
        candidates.write_whitelist(&mut whitelist)?;
        drop(candidates);
        pullseq.extract(
            &self.runner,
            &cfg.proteins,
            whitelist.path(),
            &paths.candidates,
        )?;
        whitelist.close().context("Failed to remove candidate whitelist")?;

        log::info!("Verifying selected SCGs...");
        usearch.search(
            &self.runner,
            &SearchParams::verification_search(&paths.candidates, db_index.path(), &paths.verify_hits),
        )?;
        db_index.remove()?;

        log::info!("Starting annotation of single copy genes...");
        let lookup = build_lookup(&cfg.lookup)?;
        let mut reader = AlignmentReader::open(&paths.verify_hits)?;
        // written beside the target and only renamed into place once complete
        let mut staged = tempfile::Builder::new()
            .prefix(".scg-")
            .tempfile_in(&paths.dir)
            .with_context(|| format!("Failed to create {}", paths.annotated.display()))?;
        let stats = annotate_alignments(&mut reader, &lookup, BufWriter::new(staged.as_file_mut()))?;
        staged
            .persist(&paths.annotated)
            .with_context(|| format!("Failed to write {}", paths.annotated.display()))?;
        log::debug!(
            "{} verification hits: {} annotated, {} without annotation, {} below coverage",
            stats.records,
            stats.annotated,
            stats.unannotated,
            stats.low_coverage
        );
        log::info!(
            "Wrote {} annotated SCGs to {}",
            stats.annotated,
            paths.annotated.display()
        );

        Ok(PipelineSummary {
            candidates: candidate_count,
            stats,
            output: paths.annotated,
        })
    }
}
