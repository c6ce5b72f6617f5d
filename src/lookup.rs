//! Subject ID to annotation label table.

use anyhow::Result;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::record::open_text_input;

/// Read-only mapping from database subject IDs to SCG labels
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnnotationLookup {
    labels: HashMap<String, String>,
}

impl AnnotationLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later inserts for the same subject replace earlier ones
    pub fn insert(&mut self, subject: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(subject.into(), label.into());
    }

    pub fn get(&self, subject: &str) -> Option<&str> {
        self.labels.get(subject).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Parse `subject<whitespace>label` lines. `path` only labels errors.
    pub fn from_reader<R: BufRead, P: AsRef<Path>>(reader: R, path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut lookup = AnnotationLookup::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| PipelineError::FileAccessError {
                path: path.to_path_buf(),
                source,
            })?;

            let mut tokens = line.split_whitespace();
            let Some(subject) = tokens.next() else {
                continue;
            };
            let Some(label) = tokens.next() else {
                return Err(PipelineError::MalformedRecord {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: format!("subject '{subject}' has no annotation label"),
                }
                .into());
            };

            lookup.insert(subject, label);
        }

        Ok(lookup)
    }
}

/// Load the annotation lookup file
pub fn build_lookup<P: AsRef<Path>>(path: P) -> Result<AnnotationLookup> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let input = open_text_input(&path)?;
    let lookup = AnnotationLookup::from_reader(input, &path)?;
    log::debug!("Loaded {} annotations from {}", lookup.len(), path.display());
    Ok(lookup)
}
