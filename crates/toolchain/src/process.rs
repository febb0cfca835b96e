//! External tool invocation.
//!
//! Every subprocess in a run goes through [`run_tool`]: the command is
//! executed exactly once, its captured output is appended to the run log,
//! and a non-zero exit becomes the typed error of the invoking [`Stage`].

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

use slideshow_common::error::{SlideshowError, SlideshowResult};

use crate::log::LogSink;

/// Pipeline stage an invocation belongs to. Selects the error raised when
/// the tool fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Probe,
    Render,
    Concat,
    Mux,
    ExtractAudio,
    ReattachAudio,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Probe => "probe",
            Stage::Render => "render",
            Stage::Concat => "concat",
            Stage::Mux => "mux",
            Stage::ExtractAudio => "extract-audio",
            Stage::ReattachAudio => "reattach-audio",
        }
    }

    /// Typed error for a failed invocation in this stage.
    pub fn failure(self, message: impl Into<String>) -> SlideshowError {
        match self {
            Stage::Probe => SlideshowError::probe(message),
            Stage::Render => SlideshowError::render(message),
            Stage::Concat => SlideshowError::concat(message),
            Stage::Mux => SlideshowError::mux(message),
            Stage::ExtractAudio | Stage::ReattachAudio => SlideshowError::filter(message),
        }
    }

    /// Whether invocations in this stage write an output file as their
    /// last argument.
    pub fn writes_output(self) -> bool {
        !matches!(self, Stage::Probe)
    }
}

/// A fully-built external command.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub stage: Stage,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>, stage: Stage) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stage,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    /// The last argument, which is the output file for writing stages.
    pub fn output_path(&self) -> Option<&str> {
        if self.stage.writes_output() {
            self.args.last().map(String::as_str)
        } else {
            None
        }
    }

    /// Shell-like rendering for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("'{part}'")
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn status_text(&self) -> String {
        match self.status {
            Some(code) => format!("status {code}"),
            None => "no exit status (killed by signal)".to_string(),
        }
    }
}

/// Trait for subprocess backends.
pub trait ToolRunner {
    /// Run the invocation to completion and capture its output.
    fn execute(&mut self, invocation: &ToolInvocation) -> std::io::Result<ToolOutput>;

    /// Check if a program can be found on this system.
    fn is_available(&self, program: &str) -> bool;

    /// Runner name.
    fn name(&self) -> &str;
}

/// Runs tools as real child processes, blocking until each exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for SystemRunner {
    fn execute(&mut self, invocation: &ToolInvocation) -> std::io::Result<ToolOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(ToolOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        command_exists(program)
    }

    fn name(&self) -> &str {
        "system"
    }
}

/// Whether `binary` resolves through the shell's command lookup.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg("command -v \"$1\" >/dev/null 2>&1")
        .arg("sh")
        .arg(binary)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Run an external tool once, append its captured output to the run log,
/// and map failure to the stage's typed error.
///
/// The returned error message stays short and points at the log file; the
/// captured diagnostics themselves only go to the log.
pub fn run_tool(
    runner: &mut dyn ToolRunner,
    invocation: &ToolInvocation,
    log: &mut LogSink,
) -> SlideshowResult<ToolOutput> {
    let stage = invocation.stage.as_str();
    tracing::debug!(
        stage,
        runner = runner.name(),
        command = %invocation.command_line(),
        "Running external tool"
    );

    let started = Instant::now();
    let output = match runner.execute(invocation) {
        Ok(output) => output,
        Err(e) => {
            log.note(&format!(
                "failed to start {}: {e}\n$ {}",
                invocation.program,
                invocation.command_line()
            ));
            return Err(invocation
                .stage
                .failure(format!("Failed to start {}: {e}", invocation.program)));
        }
    };
    log.record(invocation, &output);

    tracing::debug!(
        stage,
        status = ?output.status,
        elapsed_ms = started.elapsed().as_millis(),
        "External tool finished"
    );

    if !output.success() {
        tracing::error!(
            stage,
            status = ?output.status,
            log = %log.path().display(),
            "External tool failed"
        );
        return Err(invocation.stage.failure(format!(
            "{} exited with {} (details in {})",
            invocation.program,
            output.status_text(),
            log.path().display()
        )));
    }

    Ok(output)
}
