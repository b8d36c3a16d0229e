//! External command invocation

use std::fmt;
use std::io::Write;
use std::process::Command;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A program name plus its exact argument list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Anything that can carry out an [`Invocation`] to completion.
pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<()>;
}

/// Spawns real processes in the current working directory and waits for each.
///
/// Stdio is inherited so tool output reaches the terminal as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        debug!(command = %invocation, "spawning");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .with_context(|| format!("launching `{invocation}`"))?;

        if status.success() {
            return Ok(());
        }

        match status.code() {
            Some(code) => bail!("{} exited with status {code}", invocation.program),
            None => bail!("{} was terminated by a signal", invocation.program),
        }
    }
}

/// Remembers every invocation instead of running it.
#[derive(Debug, Default, Clone)]
pub struct RecordingRunner {
    pub invocations: Vec<Invocation>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the runner fail (after recording) when `program` is invoked.
    pub fn failing_on(mut self, program: impl Into<String>) -> Self {
        self.fail_on = Some(program.into());
        self
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        self.invocations.push(invocation.clone());
        if self.fail_on.as_deref() == Some(invocation.program.as_str()) {
            return Err(anyhow!("{} exited with status 1", invocation.program));
        }
        Ok(())
    }
}

/// Prints each command line instead of running it.
#[derive(Debug)]
pub struct DryRunRunner<W: Write> {
    out: W,
}

impl<W: Write> DryRunRunner<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CommandRunner for DryRunRunner<W> {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        writeln!(self.out, "[DRY-RUN]: {invocation}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let inv = Invocation::new("makeindex", ["-s", "../style.ist", "./doc.idx"]);
        assert_eq!(inv.to_string(), "makeindex -s ../style.ist ./doc.idx");
    }

    #[test]
    fn recording_runner_fails_only_on_named_program() {
        let mut runner = RecordingRunner::new().failing_on("makeindex");

        runner
            .run(&Invocation::new("bibtex", ["./a.aux"]))
            .expect("bibtex ok");
        let err = runner
            .run(&Invocation::new("makeindex", ["./a.idx"]))
            .unwrap_err();

        assert_eq!(runner.invocations.len(), 2);
        assert!(err.to_string().contains("makeindex"));
    }

    #[test]
    fn dry_run_prints_command_lines() {
        let mut runner = DryRunRunner::new(Vec::new());
        runner
            .run(&Invocation::new("bibtex", ["./a.aux"]))
            .expect("dry run");

        let text = String::from_utf8(runner.into_inner()).expect("utf8");
        assert_eq!(text, "[DRY-RUN]: bibtex ./a.aux\n");
    }

    #[test]
    fn missing_program_fails_to_launch() {
        let mut runner = SystemRunner;
        let err = runner
            .run(&Invocation::new("vesti-aux-no-such-tool", ["x"]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("launching `vesti-aux-no-such-tool x`"));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_reported_with_program_name() {
        let mut runner = SystemRunner;
        runner
            .run(&Invocation::new("sh", ["-c", "exit 0"]))
            .expect("zero exit");

        let err = runner
            .run(&Invocation::new("sh", ["-c", "exit 3"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "sh exited with status 3");
    }
}
