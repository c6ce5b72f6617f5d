use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Fatal conditions that abort a run
#[derive(Debug)]
pub enum PipelineError {
    /// An external aligner, indexer or extractor did not succeed
    ExternalToolFailure {
        tool: String,
        action: String,
        input: PathBuf,
        /// `None` when the process could not be started at all
        status: Option<ExitStatus>,
    },
    /// A lookup or alignment file could not be opened or read
    FileAccessError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A data line does not follow the expected column layout
    MalformedRecord {
        path: PathBuf,
        /// 1-based
        line: usize,
        reason: String,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::ExternalToolFailure {
                tool,
                action,
                input,
                status,
            } => {
                write!(
                    f,
                    "{tool} failed to {action} for {}, please check your input file",
                    input.display()
                )?;
                match status {
                    Some(status) => write!(f, " ({status})"),
                    None => write!(f, " (could not be started)"),
                }
            }
            PipelineError::FileAccessError { path, source } => {
                write!(f, "Cannot read {}: {source}", path.display())
            }
            PipelineError::MalformedRecord { path, line, reason } => {
                write!(f, "Malformed record at {}:{line}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::FileAccessError { source, .. } => Some(source),
            _ => None,
        }
    }
}
