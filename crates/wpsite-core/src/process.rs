// ── External command execution ──
//
// Every provisioning step is a single external process. Commands are
// described as a program plus an argument vector, never a shell string,
// so site names reach the tool verbatim.

use std::fmt;
use std::future::Future;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};

use crate::error::CoreError;

// ── CommandSpec ─────────────────────────────────────────────────────

/// A fully described external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Written to the child's stdin, which is then closed.
    pub stdin: Option<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdin: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    #[must_use]
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

// ── CommandOutput ───────────────────────────────────────────────────

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Last non-empty line of stdout, typically the tool's status line
    /// (`Success: WordPress downloaded.`).
    pub fn summary(&self) -> Option<&str> {
        self.stdout
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
    }
}

// ── Runner ──────────────────────────────────────────────────────────

/// Executes a [`CommandSpec`] and waits for it to exit.
///
/// Implementations map a non-zero exit to [`CoreError::CommandFailed`].
pub trait CommandRunner {
    fn run(
        &self,
        spec: &CommandSpec,
    ) -> impl Future<Output = Result<CommandOutput, CoreError>> + Send;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CoreError> {
        tracing::debug!(command = %spec, cwd = ?spec.cwd, "running command");

        let spawn_err = |source| CoreError::Spawn {
            program: spec.program.clone(),
            source,
        };

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if spec.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .kill_on_drop(true);
        if let Some(ref dir) = spec.cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(spawn_err)?;

        if let Some(ref input) = spec.stdin {
            if let Some(stdin) = child.stdin.take() {
                feed_stdin(stdin, input).await.map_err(spawn_err)?;
            }
        }

        let output = child.wait_with_output().await.map_err(spawn_err)?;
        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(CoreError::CommandFailed {
                command: spec.to_string(),
                code: result.code,
                stderr: result.stderr.trim().to_owned(),
            });
        }

        tracing::debug!(command = %spec, stdout = %result.stdout.trim(), "command finished");
        if !result.stderr.trim().is_empty() {
            tracing::warn!(command = %spec, stderr = %result.stderr.trim(), "command wrote to stderr");
        }

        Ok(result)
    }
}

/// Write `input` and close the pipe. A child that exits without reading
/// all of it is judged by its exit status, not by the broken pipe.
async fn feed_stdin(mut stdin: ChildStdin, input: &str) -> io::Result<()> {
    let written = match stdin.write_all(input.as_bytes()).await {
        Ok(()) => stdin.shutdown().await,
        Err(e) => Err(e),
    };
    match written {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            tracing::debug!("child closed stdin before reading all input");
            Ok(())
        }
        other => other,
    }
}
