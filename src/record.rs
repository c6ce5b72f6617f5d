use anyhow::Result;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::{COMMENT_MARKER, USERFIELD_COUNT};
use crate::error::PipelineError;

/// One row of ublast `-userout` output
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    pub query: String,
    pub target: String,
    pub identity: f64,
    pub aln_len: u64,
    pub query_len: u64,
    pub target_len: u64,
    pub mismatches: u64,
    pub gap_opens: u64,
    pub query_start: u64,
    pub query_end: u64,
    pub target_start: u64,
    pub target_end: u64,
    pub evalue: f64,
    pub bitscore: f64,
}

impl AlignmentRecord {
    /// Leading whitespace-delimited token of the query label
    pub fn query_id(&self) -> &str {
        self.query.split_whitespace().next().unwrap_or("")
    }

    /// Leading whitespace-delimited token of the target label, the sequence
    /// name a FASTA header lookup matches on
    pub fn target_id(&self) -> &str {
        self.target.split_whitespace().next().unwrap_or("")
    }
}

/// Open a text file, decompressing `.gz` input transparently
pub fn open_text_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PipelineError::FileAccessError {
        path: path.to_path_buf(),
        source,
    })?;

    let is_compressed = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz" || ext == "bgz")
        .unwrap_or(false);

    if is_compressed {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Streaming reader over aligner output.
///
/// Comment lines and blank lines are skipped. Any other line must carry
/// exactly the requested columns; anything else aborts with the line number.
pub struct AlignmentReader<R: BufRead> {
    reader: R,
    path: PathBuf,
    line_no: usize,
    buf: String,
}

impl AlignmentReader<Box<dyn BufRead>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let input = open_text_input(path)?;
        Ok(AlignmentReader::new(input, path))
    }
}

impl<R: BufRead> AlignmentReader<R> {
    /// `path` is only used to label errors
    pub fn new<P: AsRef<Path>>(reader: R, path: P) -> Self {
        AlignmentReader {
            reader,
            path: path.as_ref().to_path_buf(),
            line_no: 0,
            buf: String::new(),
        }
    }

    pub fn read_record(&mut self) -> Result<Option<AlignmentRecord>> {
        loop {
            self.buf.clear();
            let n = match self.reader.read_line(&mut self.buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    return Err(PipelineError::MalformedRecord {
                        path: self.path.clone(),
                        line: self.line_no + 1,
                        reason: "line is not valid UTF-8".to_string(),
                    }
                    .into());
                }
                Err(source) => {
                    return Err(PipelineError::FileAccessError {
                        path: self.path.clone(),
                        source,
                    }
                    .into());
                }
            };
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.buf.trim_end_matches(&['\n', '\r'][..]);
            if line.starts_with(COMMENT_MARKER) || line.trim().is_empty() {
                continue;
            }

            let record = parse_record(line).map_err(|reason| PipelineError::MalformedRecord {
                path: self.path.clone(),
                line: self.line_no,
                reason,
            })?;
            return Ok(Some(record));
        }
    }

    pub fn read_all(&mut self) -> Result<Vec<AlignmentRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);
        }
        Ok(records)
    }
}

fn parse_field<T: FromStr>(fields: &[&str], idx: usize, name: &str) -> Result<T, String> {
    fields[idx]
        .trim()
        .parse()
        .map_err(|_| format!("invalid {name} '{}' in column {}", fields[idx], idx + 1))
}

/// Parse one data line by column position
pub fn parse_record(line: &str) -> Result<AlignmentRecord, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != USERFIELD_COUNT {
        return Err(format!(
            "expected {USERFIELD_COUNT} columns, found {}",
            fields.len()
        ));
    }

    Ok(AlignmentRecord {
        query: fields[0].to_string(),
        target: fields[1].to_string(),
        identity: parse_field(&fields, 2, "identity")?,
        aln_len: parse_field(&fields, 3, "alignment length")?,
        query_len: parse_field(&fields, 4, "query length")?,
        target_len: parse_field(&fields, 5, "target length")?,
        mismatches: parse_field(&fields, 6, "mismatch count")?,
        gap_opens: parse_field(&fields, 7, "gap open count")?,
        query_start: parse_field(&fields, 8, "query start")?,
        query_end: parse_field(&fields, 9, "query end")?,
        target_start: parse_field(&fields, 10, "target start")?,
        target_end: parse_field(&fields, 11, "target end")?,
        evalue: parse_field(&fields, 12, "e-value")?,
        bitscore: parse_field(&fields, 13, "bit score")?,
    })
}
