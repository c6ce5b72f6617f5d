//! usearch and pullseq command construction.
//!
//! Commands are assembled here and executed through a [`ToolRunner`], so the
//! orchestration can be exercised without the real binaries.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::{CANDIDATE_EVALUE, USERFIELDS, VERIFY_EVALUE, VERIFY_MAX_HITS};
use crate::error::PipelineError;
use crate::runner::{Invocation, ToolRunner};

/// One ublast search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub query: PathBuf,
    pub db: PathBuf,
    pub evalue: f64,
    pub max_hits: Option<u32>,
    pub output: PathBuf,
}

impl SearchParams {
    /// Known SCGs against the input protein index, every hit kept
    pub fn candidate_search(query: &Path, db: &Path, output: &Path) -> Self {
        SearchParams {
            query: query.to_path_buf(),
            db: db.to_path_buf(),
            evalue: CANDIDATE_EVALUE,
            max_hits: None,
            output: output.to_path_buf(),
        }
    }

    /// Candidates against the full database index, best hit only
    pub fn verification_search(query: &Path, db: &Path, output: &Path) -> Self {
        SearchParams {
            query: query.to_path_buf(),
            db: db.to_path_buf(),
            evalue: VERIFY_EVALUE,
            max_hits: Some(VERIFY_MAX_HITS),
            output: output.to_path_buf(),
        }
    }
}

fn run_checked<R: ToolRunner + ?Sized>(
    runner: &R,
    invocation: &Invocation,
    tool: &str,
    action: &str,
    input: &Path,
) -> Result<()> {
    let failure = |status| PipelineError::ExternalToolFailure {
        tool: tool.to_string(),
        action: action.to_string(),
        input: input.to_path_buf(),
        status,
    };

    match runner.run(invocation) {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(failure(Some(status)).into()),
        Err(e) => {
            log::debug!("Could not start {}: {e}", invocation.program.display());
            Err(failure(None).into())
        }
    }
}

/// usearch ublast driver
#[derive(Debug, Clone)]
pub struct Usearch {
    binary: PathBuf,
    threads: usize,
}

impl Usearch {
    pub fn new<P: AsRef<Path>>(binary: P, threads: usize) -> Self {
        Usearch {
            binary: binary.as_ref().to_path_buf(),
            threads,
        }
    }

    pub fn index_invocation(&self, fasta: &Path, index: &Path) -> Invocation {
        Invocation::new(&self.binary)
            .arg("-makeudb_ublast")
            .arg(fasta)
            .arg("-output")
            .arg(index)
    }

    pub fn search_invocation(&self, params: &SearchParams) -> Invocation {
        let mut inv = Invocation::new(&self.binary)
            .arg("-ublast")
            .arg(&params.query)
            .arg("-db")
            .arg(&params.db)
            .arg("-evalue")
            .arg(params.evalue.to_string());
        if let Some(max_hits) = params.max_hits {
            inv = inv.arg("-maxhits").arg(max_hits.to_string());
        }
        inv.arg("-threads")
            .arg(self.threads.to_string())
            .arg("-userout")
            .arg(&params.output)
            .arg("-userfields")
            .arg(USERFIELDS)
    }

    /// Build a ublast database from a protein FASTA
    pub fn make_index<R: ToolRunner + ?Sized>(
        &self,
        runner: &R,
        fasta: &Path,
        index: &Path,
    ) -> Result<()> {
        log::debug!("Indexing {} -> {}", fasta.display(), index.display());
        run_checked(
            runner,
            &self.index_invocation(fasta, index),
            "usearch",
            "build index",
            fasta,
        )
    }

    pub fn search<R: ToolRunner + ?Sized>(&self, runner: &R, params: &SearchParams) -> Result<()> {
        log::debug!(
            "ublast {} vs {} (evalue {}, max hits {:?}) -> {}",
            params.query.display(),
            params.db.display(),
            params.evalue,
            params.max_hits,
            params.output.display()
        );
        run_checked(
            runner,
            &self.search_invocation(params),
            "usearch",
            "search",
            &params.query,
        )
    }
}

/// pullseq sequence extraction by ID list
#[derive(Debug, Clone)]
pub struct Pullseq {
    binary: PathBuf,
}

impl Pullseq {
    pub fn new<P: AsRef<Path>>(binary: P) -> Self {
        Pullseq {
            binary: binary.as_ref().to_path_buf(),
        }
    }

    pub fn extract_invocation(&self, fasta: &Path, whitelist: &Path, output: &Path) -> Invocation {
        Invocation::new(&self.binary)
            .arg("-i")
            .arg(fasta)
            .arg("-n")
            .arg(whitelist)
            .stdout_to(output)
    }

    /// Write the sequences of `fasta` named in `whitelist` to `output`
    pub fn extract<R: ToolRunner + ?Sized>(
        &self,
        runner: &R,
        fasta: &Path,
        whitelist: &Path,
        output: &Path,
    ) -> Result<()> {
        run_checked(
            runner,
            &self.extract_invocation(fasta, whitelist, output),
            "pullseq",
            "extract candidate sequences",
            fasta,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::io;
    use std::process::ExitStatus;

    fn args(inv: &Invocation) -> Vec<String> {
        inv.args
            .iter()
            .map(|a: &OsString| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_index_command() {
        let us = Usearch::new("/opt/usearch", 6);
        let inv = us.index_invocation(Path::new("db.faa"), Path::new("all_prot.udb"));
        assert_eq!(inv.program, PathBuf::from("/opt/usearch"));
        assert_eq!(args(&inv), ["-makeudb_ublast", "db.faa", "-output", "all_prot.udb"]);
    }

    #[test]
    fn test_candidate_search_command() {
        let us = Usearch::new("usearch", 6);
        let params = SearchParams::candidate_search(
            Path::new("scgs.faa"),
            Path::new("genes.faa.udb"),
            Path::new("genes.faa.findSCG.b6"),
        );
        assert_eq!(
            args(&us.search_invocation(&params)),
            [
                "-ublast",
                "scgs.faa",
                "-db",
                "genes.faa.udb",
                "-evalue",
                "0.01",
                "-threads",
                "6",
                "-userout",
                "genes.faa.findSCG.b6",
                "-userfields",
                USERFIELDS,
            ]
        );
    }

    #[test]
    fn test_verification_search_command() {
        let us = Usearch::new("usearch", 12);
        let params = SearchParams::verification_search(
            Path::new("cand.faa"),
            Path::new("all_prot.udb"),
            Path::new("genes.faa.all.b6"),
        );
        let a = args(&us.search_invocation(&params));
        assert_eq!(&a[4..10], ["-evalue", "0.00001", "-maxhits", "1", "-threads", "12"]);
    }

    #[test]
    fn test_extract_command() {
        let inv = Pullseq::new("pullseq").extract_invocation(
            Path::new("genes.faa"),
            Path::new("ids.txt"),
            Path::new("cand.faa"),
        );
        assert_eq!(args(&inv), ["-i", "genes.faa", "-n", "ids.txt"]);
        assert_eq!(inv.stdout, Some(PathBuf::from("cand.faa")));
    }

    struct Unstartable;

    impl ToolRunner for Unstartable {
        fn run(&self, _: &Invocation) -> io::Result<ExitStatus> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    #[test]
    fn test_unstartable_tool_is_tool_failure() {
        let err = Usearch::new("usearch", 6)
            .make_index(&Unstartable, Path::new("db.faa"), Path::new("db.udb"))
            .unwrap_err();
        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::ExternalToolFailure { input, status, .. }) => {
                assert_eq!(input, Path::new("db.faa"));
                assert!(status.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_tool_failure() {
        use std::os::unix::process::ExitStatusExt;

        struct Failing;
        impl ToolRunner for Failing {
            fn run(&self, _: &Invocation) -> io::Result<ExitStatus> {
                Ok(ExitStatus::from_raw(1 << 8))
            }
        }

        let err = Pullseq::new("pullseq")
            .extract(&Failing, Path::new("g.faa"), Path::new("ids"), Path::new("c.faa"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("pullseq"), "{msg}");
        assert!(msg.contains("g.faa"), "{msg}");
    }
}
