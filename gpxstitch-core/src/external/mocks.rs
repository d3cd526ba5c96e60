// gpxstitch-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.

use super::*;
use crate::error::command_failed_error;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// Mock implementation of FfmpegProcess.
#[derive(Debug, Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Vec<FfmpegEvent>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events_to_emit.clone() {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Mock ffmpeg spawner.
///
/// Every spawn succeeds and creates an empty file at the command's output
/// path (the last argument), unless a failing exit code was configured.
#[derive(Debug, Default)]
pub struct MockFfmpegSpawner {
    received_calls: RefCell<Vec<Vec<String>>>,
    failing_exit_code: RefCell<Option<i32>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent spawn exit with `code` and emit an error line.
    pub fn fail_with_exit_code(&self, code: i32) {
        *self.failing_exit_code.borrow_mut() = Some(code);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        if let Some(code) = *self.failing_exit_code.borrow() {
            return Ok(MockFfmpegProcess {
                events_to_emit: vec![FfmpegEvent::Error(
                    "Stream map '0:3' matches no streams.".to_string(),
                )],
                exit_status: ExitStatus::from_raw(code << 8),
            });
        }

        if let Some(output) = args.last() {
            let output = PathBuf::from(output);
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::File::create(&output)?;
        }

        Ok(MockFfmpegProcess {
            events_to_emit: Vec::new(),
            exit_status: ExitStatus::from_raw(0),
        })
    }
}

/// Mock runner for the non-ffmpeg tools.
///
/// Records every command. On success it writes the next queued output for
/// that tool (or an empty file) to the path given after `-o`, which is where
/// gpmd2csv, gopro2gpx and gpxmerge all take their destination.
#[derive(Debug, Default)]
pub struct MockCommandRunner {
    calls: RefCell<Vec<ToolCommand>>,
    outputs: RefCell<HashMap<String, VecDeque<String>>>,
    failures: RefCell<HashMap<String, i32>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the content the next successful `tool` call writes to its `-o` path.
    pub fn push_output(&self, tool: &str, content: impl Into<String>) {
        self.outputs
            .borrow_mut()
            .entry(tool.to_string())
            .or_default()
            .push_back(content.into());
    }

    /// Makes every call of `tool` exit with `code`.
    pub fn fail_tool(&self, tool: &str, code: i32) {
        self.failures.borrow_mut().insert(tool.to_string(), code);
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.borrow().clone()
    }

    /// Calls made to the tool with the given short name.
    pub fn calls_to(&self, tool: &str) -> Vec<ToolCommand> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.tool_name() == tool)
            .cloned()
            .collect()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, command: &ToolCommand) -> CoreResult<()> {
        self.calls.borrow_mut().push(command.clone());
        let tool = command.tool_name();

        if let Some(code) = self.failures.borrow().get(&tool) {
            return Err(command_failed_error(
                command.to_string(),
                ExitStatus::from_raw(code << 8),
                format!("{tool}: simulated failure"),
            ));
        }

        if let Some(output) = command.flag_value("-o") {
            let output = PathBuf::from(output);
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = self
                .outputs
                .borrow_mut()
                .get_mut(&tool)
                .and_then(VecDeque::pop_front)
                .unwrap_or_default();
            std::fs::write(&output, content)?;
        }

        Ok(())
    }
}
