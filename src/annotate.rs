//! Verification hits joined against the annotation lookup.

use anyhow::Result;
use std::fmt;
use std::io::{BufRead, Write};

use crate::coverage;
use crate::lookup::AnnotationLookup;
use crate::record::{AlignmentReader, AlignmentRecord};

/// One line of the `.scg` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRecord {
    pub query_id: String,
    pub label: String,
}

impl fmt::Display for AnnotatedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.query_id, self.label)
    }
}

/// Outcome counts of a join
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JoinStats {
    pub records: usize,
    pub annotated: usize,
    pub unannotated: usize,
    pub low_coverage: usize,
}

/// Decide a single verification hit
pub fn annotate_record(record: &AlignmentRecord, lookup: &AnnotationLookup) -> Option<AnnotatedRecord> {
    let label = lookup.get(&record.target)?;
    if !coverage::accept(record.aln_len, record.target_len) {
        return None;
    }
    Some(AnnotatedRecord {
        query_id: record.query_id().to_string(),
        label: label.to_string(),
    })
}

/// Annotate hits in input order
pub fn join<'a, I>(records: I, lookup: &AnnotationLookup) -> Vec<AnnotatedRecord>
where
    I: IntoIterator<Item = &'a AlignmentRecord>,
{
    records
        .into_iter()
        .filter_map(|r| annotate_record(r, lookup))
        .collect()
}

/// Stream aligner output to `query_id<TAB>label` lines
pub fn annotate_alignments<R: BufRead, W: Write>(
    reader: &mut AlignmentReader<R>,
    lookup: &AnnotationLookup,
    mut writer: W,
) -> Result<JoinStats> {
    let mut stats = JoinStats::default();

    while let Some(record) = reader.read_record()? {
        stats.records += 1;
        match lookup.get(&record.target) {
            None => stats.unannotated += 1,
            Some(label) if coverage::accept(record.aln_len, record.target_len) => {
                writeln!(writer, "{}\t{label}", record.query_id())?;
                stats.annotated += 1;
            }
            Some(_) => stats.low_coverage += 1,
        }
    }

    writer.flush()?;
    Ok(stats)
}
