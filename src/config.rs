//! Fixed search parameters and derived file locations.

use std::path::{Path, PathBuf};

/// E-value cutoff for the candidate search (known SCGs vs input proteins)
pub const CANDIDATE_EVALUE: f64 = 0.01;

/// E-value cutoff for the verification search (candidates vs full database)
pub const VERIFY_EVALUE: f64 = 0.00001;

/// Verification keeps only the best hit per candidate
pub const VERIFY_MAX_HITS: u32 = 1;

/// Worker threads handed to the aligner
pub const DEFAULT_THREADS: usize = 6;

/// Alignment must span more than this fraction of the target
pub const MIN_TARGET_COVERAGE: f64 = 0.5;

/// Lines of aligner output starting with this are not data
pub const COMMENT_MARKER: char = '#';

/// Column list requested from usearch, in the order the reader expects
pub const USERFIELDS: &str = "query+target+id+alnlen+ql+tl+mism+opens+qlo+qhi+tlo+thi+evalue+bits";

/// Number of tab-separated columns produced by [`USERFIELDS`]
pub const USERFIELD_COUNT: usize = 14;

/// Index of the full reference database, written next to the input
pub const DATABASE_INDEX_NAME: &str = "all_prot.udb";

/// Run configuration assembled from the command line
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub usearch: PathBuf,
    pub pullseq: PathBuf,
    pub proteins: PathBuf,
    pub database: PathBuf,
    pub scgs: PathBuf,
    pub lookup: PathBuf,
    pub threads: usize,
}

impl PipelineConfig {
    pub fn outputs(&self) -> OutputPaths {
        OutputPaths::for_input(&self.proteins)
    }
}

/// Every file the pipeline writes, derived from the input protein file
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub database_index: PathBuf,
    pub input_index: PathBuf,
    pub candidate_hits: PathBuf,
    pub candidates: PathBuf,
    pub verify_hits: PathBuf,
    pub annotated: PathBuf,
}

impl OutputPaths {
    pub fn for_input(input: &Path) -> Self {
        let dir = match input.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        OutputPaths {
            database_index: dir.join(DATABASE_INDEX_NAME),
            input_index: dir.join(format!("{name}.udb")),
            candidate_hits: dir.join(format!("{name}.findSCG.b6")),
            candidates: dir.join(format!("{name}.scg.candidates.faa")),
            verify_hits: dir.join(format!("{name}.all.b6")),
            annotated: dir.join(format!("{name}.scg")),
            dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_live_next_to_input() {
        let paths = OutputPaths::for_input(Path::new("/data/bin7/genes.faa"));
        assert_eq!(paths.dir, PathBuf::from("/data/bin7"));
        assert_eq!(paths.database_index, PathBuf::from("/data/bin7/all_prot.udb"));
        assert_eq!(paths.input_index, PathBuf::from("/data/bin7/genes.faa.udb"));
        assert_eq!(
            paths.candidate_hits,
            PathBuf::from("/data/bin7/genes.faa.findSCG.b6")
        );
        assert_eq!(
            paths.candidates,
            PathBuf::from("/data/bin7/genes.faa.scg.candidates.faa")
        );
        assert_eq!(paths.verify_hits, PathBuf::from("/data/bin7/genes.faa.all.b6"));
        assert_eq!(paths.annotated, PathBuf::from("/data/bin7/genes.faa.scg"));
    }

    #[test]
    fn test_bare_filename_uses_current_dir() {
        let paths = OutputPaths::for_input(Path::new("genes.faa"));
        assert_eq!(paths.dir, PathBuf::from("."));
        assert_eq!(paths.annotated, PathBuf::from("./genes.faa.scg"));
    }

    #[test]
    fn test_userfields_match_column_count() {
        assert_eq!(USERFIELDS.split('+').count(), USERFIELD_COUNT);
    }
}
