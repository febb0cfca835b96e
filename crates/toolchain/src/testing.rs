//! Scripted [`ToolRunner`] for tests.

use std::collections::{HashMap, HashSet};
use std::io::{Error, ErrorKind};

use crate::process::{Stage, ToolInvocation, ToolOutput, ToolRunner};

/// Records invocations instead of spawning processes.
///
/// Writing stages get a file at their output path (placeholder bytes unless
/// scripted), so cleanup and naming can be checked on disk.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    invocations: Vec<ToolInvocation>,
    stdout: HashMap<Stage, String>,
    output_bytes: HashMap<Stage, Vec<u8>>,
    failure: Option<(Stage, usize)>,
    missing: HashSet<String>,
    calls: HashMap<Stage, usize>,
    no_partial_output: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stdout returned by every call in `stage`.
    pub fn with_stdout(mut self, stage: Stage, stdout: impl Into<String>) -> Self {
        self.stdout.insert(stage, stdout.into());
        self
    }

    /// Bytes written to the output path by every call in `stage`.
    pub fn with_output_bytes(mut self, stage: Stage, bytes: Vec<u8>) -> Self {
        self.output_bytes.insert(stage, bytes);
        self
    }

    /// Exit with status 1 on the `call`-th (zero-based) invocation of `stage`.
    /// The partial output file is still written, as a real transcoder would.
    pub fn failing_at(mut self, stage: Stage, call: usize) -> Self {
        self.failure = Some((stage, call));
        self
    }

    /// Make the scripted failure exit before writing any output, as when the
    /// transcoder rejects its inputs.
    pub fn without_partial_output(mut self) -> Self {
        self.no_partial_output = true;
        self
    }

    /// Pretend `program` is not installed.
    pub fn without_program(mut self, program: impl Into<String>) -> Self {
        self.missing.insert(program.into());
        self
    }

    pub fn invocations(&self) -> &[ToolInvocation] {
        &self.invocations
    }

    pub fn invocations_for(&self, stage: Stage) -> Vec<&ToolInvocation> {
        self.invocations
            .iter()
            .filter(|invocation| invocation.stage == stage)
            .collect()
    }
}

impl ToolRunner for RecordingRunner {
    fn execute(&mut self, invocation: &ToolInvocation) -> std::io::Result<ToolOutput> {
        self.invocations.push(invocation.clone());
        if self.missing.contains(&invocation.program) {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("{} not found", invocation.program),
            ));
        }

        let call = self.calls.entry(invocation.stage).or_insert(0);
        let index = *call;
        *call += 1;

        let fails = self.failure == Some((invocation.stage, index));

        let writes = !(fails && self.no_partial_output);
        if let Some(output) = invocation.output_path().filter(|_| writes) {
            let bytes = self
                .output_bytes
                .get(&invocation.stage)
                .cloned()
                .unwrap_or_else(|| format!("{} output", invocation.stage.as_str()).into_bytes());
            std::fs::write(output, bytes)?;
        }

        if fails {
            return Ok(ToolOutput {
                status: Some(1),
                stdout: String::new(),
                stderr: "simulated failure".to_string(),
            });
        }

        Ok(ToolOutput {
            status: Some(0),
            stdout: self
                .stdout
                .get(&invocation.stage)
                .cloned()
                .unwrap_or_default(),
            stderr: String::new(),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        !self.missing.contains(program)
    }

    fn name(&self) -> &str {
        "recording"
    }
}
