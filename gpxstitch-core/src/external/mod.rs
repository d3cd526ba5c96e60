// ============================================================================
// gpxstitch-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with External CLI Tools
//
// This module encapsulates every process the pipeline launches: ffmpeg for
// pulling the telemetry stream out of a clip, gpmd2csv and gopro2gpx for
// decoding it, and gpxmerge for the final concatenation. Each seam is a
// trait so the pipeline can be driven by mocks in tests.
//
// KEY COMPONENTS:
// - ToolCommand: program + argument list for a non-ffmpeg tool
// - CommandRunner / StdCommandRunner: runs a ToolCommand to completion
// - FfmpegSpawner / SidecarSpawner: ffmpeg execution through ffmpeg-sidecar
// - check_dependency: verifies a tool can be spawned at all

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};

// ---- Standard library imports ----
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Contains traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Mock collaborators for tests
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_executor::{
    FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner, extract_telemetry_stream,
};

// ============================================================================
// TOOL COMMANDS
// ============================================================================

/// A fully-built invocation of an external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Short name of the program, for logs and error messages.
    pub fn tool_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Value following `flag` in the argument list, if any.
    pub fn flag_value(&self, flag: &str) -> Option<&OsStr> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(OsString::as_os_str)
    }
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs external tools to completion.
///
/// A successful return means the process exited with status zero; every
/// other outcome is an error, which the pipeline treats as fatal.
pub trait CommandRunner {
    fn run(&self, command: &ToolCommand) -> CoreResult<()>;
}

/// Production runner built on `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct StdCommandRunner;

impl CommandRunner for StdCommandRunner {
    fn run(&self, command: &ToolCommand) -> CoreResult<()> {
        log::debug!("Running: {}", command);

        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                log::error!("Failed to start {}: {}", command.tool_name(), e);
                command_start_error(command.tool_name(), e)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::error!("{} exited with {}: {}", command.tool_name(), output.status, stderr);
            return Err(command_failed_error(command.to_string(), output.status, stderr));
        }

        Ok(())
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that an external command can be spawned.
///
/// The command is run with `-version` and its exit status ignored: the Go
/// telemetry tools reject unknown flags, but getting that far proves the
/// binary exists and is executable.
pub fn check_dependency(program: &Path) -> CoreResult<()> {
    let name = program.display().to_string();
    let result = Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", name);
            Err(CoreError::DependencyNotFound(name))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", name, e);
            Err(command_start_error(name, e))
        }
    }
}
