//! Process execution seam for every external tool.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// A fully specified external command
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Redirect standard output into this file
    pub stdout: Option<PathBuf>,
}

impl Invocation {
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        Invocation {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            stdout: None,
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn stdout_to<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.stdout = Some(path.as_ref().to_path_buf());
        self
    }

    /// Value following `flag`, if present
    pub fn value_of(&self, flag: &str) -> Option<&OsStr> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(|a| a.as_os_str())
    }

    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        if let Some(out) = &self.stdout {
            write!(f, " > {}", out.display())?;
        }
        Ok(())
    }
}

/// Runs an invocation to completion
pub trait ToolRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ExitStatus>;
}

/// Spawns real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ExitStatus> {
        log::debug!("Running: {invocation}");
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(path) = &invocation.stdout {
            cmd.stdout(File::create(path)?);
        }
        cmd.status()
    }
}

/// Locate an external tool: existing paths are taken as given, bare names
/// are looked up on `PATH`.
pub fn resolve_tool<P: AsRef<Path>>(tool: P) -> anyhow::Result<PathBuf> {
    let tool = tool.as_ref();
    if tool.exists() {
        return Ok(tool.to_path_buf());
    }
    if tool.components().count() == 1 {
        if let Ok(found) = which::which(tool) {
            return Ok(found);
        }
    }
    anyhow::bail!(
        "'{}' not found. Give the full path or make sure it is on PATH.",
        tool.display()
    )
}
