//! Stage-1 candidate selection.
//!
//! Any hit of a known SCG against an input protein makes that protein a
//! candidate. Alignment quality is not checked here; the verification search
//! applies the coverage rule.

use anyhow::Result;
use indexmap::IndexSet;
use std::io::{BufRead, Write};

use crate::record::{AlignmentReader, AlignmentRecord};

/// Unique target IDs of the candidate search.
///
/// IDs are the first whitespace token of the target label, since that is the
/// name pullseq matches against the FASTA header.
#[derive(Debug, Default, Clone)]
pub struct CandidateSet {
    ids: IndexSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// IDs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(|s| s.as_str())
    }

    /// Write one ID per line in sorted order, the form pullseq's `-n` expects
    pub fn write_whitelist<W: Write>(&self, mut writer: W) -> Result<()> {
        let mut sorted: Vec<&str> = self.iter().collect();
        sorted.sort_unstable();
        for id in sorted {
            writeln!(writer, "{id}")?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl<'a> FromIterator<&'a str> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = CandidateSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

pub fn select_candidates<'a, I>(records: I) -> CandidateSet
where
    I: IntoIterator<Item = &'a AlignmentRecord>,
{
    records.into_iter().map(|r| r.target_id()).collect()
}

/// Streaming form of [`select_candidates`] over aligner output
pub fn collect_candidates<R: BufRead>(reader: &mut AlignmentReader<R>) -> Result<CandidateSet> {
    let mut set = CandidateSet::new();
    while let Some(record) = reader.read_record()? {
        set.insert(record.target_id());
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_record;
    use std::io::Cursor;

    fn hit(query: &str, target: &str, aln_len: u64, target_len: u64) -> AlignmentRecord {
        let line = format!(
            "{query}\t{target}\t40.0\t{aln_len}\t300\t{target_len}\t10\t2\t1\t{aln_len}\t1\t{aln_len}\t0.005\t25.0"
        );
        parse_record(&line).unwrap()
    }

    #[test]
    fn test_targets_deduplicated() {
        let records = vec![
            hit("COG0012", "A", 100, 300),
            hit("COG0016", "B", 100, 300),
            hit("COG0048", "A", 100, 300),
            hit("COG0049", "C", 100, 300),
        ];
        let set = select_candidates(&records);
        assert_eq!(set.len(), 3);
        for id in ["A", "B", "C"] {
            assert!(set.contains(id));
        }
    }

    #[test]
    fn test_weak_hits_still_selected() {
        // 5 of 300 residues would fail verification, but stage 1 keeps it
        let records = vec![hit("COG0012", "A", 5, 300)];
        assert!(select_candidates(&records).contains("A"));
    }

    #[test]
    fn test_whitelist_sorted_unique() {
        let set: CandidateSet = ["k2", "k10", "a", "k2"].into_iter().collect();
        let mut out = Vec::new();
        set.write_whitelist(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\nk10\nk2\n");
    }

    #[test]
    fn test_described_target_reduced_to_id() {
        let records = vec![
            hit("COG0012", "gene_7 # 1 # 300 # 1 # ID=1_7", 100, 300),
            hit("COG0016", "gene_7 # 1 # 300 # 1 # ID=1_7", 80, 300),
        ];
        let set = select_candidates(&records);
        let mut out = Vec::new();
        set.write_whitelist(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "gene_7\n");
    }

    #[test]
    fn test_collect_from_reader() {
        let a = "COG1\tA\t40.0\t100\t300\t300\t10\t2\t1\t100\t1\t100\t0.005\t25.0";
        let b = "COG2\tB\t40.0\t100\t300\t300\t10\t2\t1\t100\t1\t100\t0.005\t25.0";
        let c = "COG3\tB partial=01\t40.0\t100\t300\t300\t10\t2\t1\t100\t1\t100\t0.005\t25.0";
        let input = format!("# comment\n{a}\n{b}\n{a}\n{c}\n");
        let mut reader = AlignmentReader::new(Cursor::new(input), "x.b6");
        let set = collect_candidates(&mut reader).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
