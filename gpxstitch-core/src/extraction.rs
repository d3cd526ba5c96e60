// ============================================================================
// gpxstitch-core/src/extraction.rs
// ============================================================================
//
// PER-CLIP EXTRACTION: Telemetry to CSV and GPX
//
// For each clip, in recording order:
//   1. ffmpeg copies the telemetry stream into `<raw_dir>/<stem>.bin`
//   2. gpmd2csv writes `<telemetry_dir>/<stem>.csv`
//   3. gopro2gpx writes `<gpx_dir>/<i>.gpx`, `i` being the clip's position
//   4. the `.bin` is deleted
//
// Any tool failure stops the run. Output directories are created on demand.

use std::path::{Path, PathBuf};

use crate::config::CoreConfig;
use crate::discovery::Clip;
use crate::error::{CoreError, CoreResult};
use crate::external::{
    CommandRunner, FfmpegSpawner, ToolCommand, check_dependency, extract_telemetry_stream,
};
use crate::report::{ExtractedClip, RunReport};

/// Paths produced for a single clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipArtifacts {
    pub raw_path: PathBuf,
    pub csv_path: PathBuf,
    pub gpx_path: PathBuf,
}

impl ClipArtifacts {
    pub fn for_clip(config: &CoreConfig, clip: &Clip, index: usize) -> Self {
        let stem = clip.stem();
        Self {
            raw_path: config.raw_dir.join(format!("{stem}.bin")),
            csv_path: config.telemetry_dir.join(format!("{stem}.csv")),
            gpx_path: config.gpx_dir.join(format!("{index}.gpx")),
        }
    }
}

/// Verifies every extraction and merge tool can be started.
pub fn check_dependencies(config: &CoreConfig) -> CoreResult<()> {
    for tool in [
        &config.ffmpeg_path,
        &config.gpmd2csv_path,
        &config.gopro2gpx_path,
        &config.gpxmerge_path,
    ] {
        check_dependency(tool)?;
    }
    Ok(())
}

/// Builds the gpmd2csv invocation.
pub fn csv_command(config: &CoreConfig, artifacts: &ClipArtifacts) -> ToolCommand {
    ToolCommand::new(&config.gpmd2csv_path)
        .arg("-i")
        .arg(&artifacts.raw_path)
        .arg("-o")
        .arg(&artifacts.csv_path)
}

/// Builds the gopro2gpx invocation.
pub fn gpx_command(config: &CoreConfig, artifacts: &ClipArtifacts) -> ToolCommand {
    ToolCommand::new(&config.gopro2gpx_path)
        .arg("-i")
        .arg(&artifacts.raw_path)
        .arg("-a")
        .arg(config.gps_accuracy.to_string())
        .arg("-o")
        .arg(&artifacts.gpx_path)
}

/// Runs the extraction chain for one clip.
pub fn extract_clip<S, R>(
    config: &CoreConfig,
    spawner: &S,
    runner: &R,
    clip: &Clip,
    index: usize,
) -> CoreResult<ExtractedClip>
where
    S: FfmpegSpawner,
    R: CommandRunner + ?Sized,
{
    let artifacts = ClipArtifacts::for_clip(config, clip, index);
    for dir in [&config.raw_dir, &config.telemetry_dir, &config.gpx_dir] {
        ensure_dir(dir)?;
    }

    log::info!("[{}] {} -> {}", index, clip.file_name, artifacts.gpx_path.display());

    extract_telemetry_stream(
        spawner,
        &config.ffmpeg_path,
        &clip.path,
        &artifacts.raw_path,
        &config.telemetry_stream,
    )?;

    if !artifacts.raw_path.is_file() {
        log::error!("ffmpeg produced no telemetry for {}", clip.file_name);
        return Err(CoreError::OperationFailed(format!(
            "ffmpeg did not create '{}'",
            artifacts.raw_path.display()
        )));
    }

    runner.run(&csv_command(config, &artifacts))?;
    runner.run(&gpx_command(config, &artifacts))?;

    std::fs::remove_file(&artifacts.raw_path).map_err(|e| {
        CoreError::PathError(format!(
            "Failed to remove '{}': {}",
            artifacts.raw_path.display(),
            e
        ))
    })?;

    Ok(ExtractedClip {
        file_name: clip.file_name.clone(),
        index,
        gpx_path: artifacts.gpx_path,
    })
}

/// Extracts every clip in order, recording each in `report`.
pub fn extract_all<S, R>(
    config: &CoreConfig,
    spawner: &S,
    runner: &R,
    clips: &[Clip],
    report: &mut RunReport,
) -> CoreResult<()>
where
    S: FfmpegSpawner,
    R: CommandRunner + ?Sized,
{
    for (index, clip) in clips.iter().enumerate() {
        let extracted = extract_clip(config, spawner, runner, clip, index)?;
        report.record_clip(extracted);
    }
    Ok(())
}

fn ensure_dir(dir: &Path) -> CoreResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        CoreError::PathError(format!("Failed to create directory '{}': {}", dir.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::{MockCommandRunner, MockFfmpegSpawner};
    use chrono::Local;

    fn clip(dir: &Path, name: &str) -> Clip {
        let path = dir.join(name);
        std::fs::write(&path, b"").unwrap();
        Clip {
            file_name: name.to_string(),
            path,
            modified: Local::now(),
        }
    }

    #[test]
    fn test_extract_clip_runs_tools_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::new(dir.path().to_path_buf());
        let spawner = MockFfmpegSpawner::new();
        let runner = MockCommandRunner::new();

        let extracted =
            extract_clip(&config, &spawner, &runner, &clip(dir.path(), "GOPR0042.MP4"), 3).unwrap();

        assert_eq!(extracted.index, 3);
        assert_eq!(extracted.gpx_path, dir.path().join("gpxFiles/3.gpx"));
        assert!(extracted.gpx_path.exists());
        assert!(dir.path().join("telemetry/GOPR0042.csv").exists());
        assert!(!dir.path().join("rawVideos/GOPR0042.bin").exists());

        let ffmpeg_args = &spawner.get_received_calls()[0];
        let raw = dir.path().join("rawVideos/GOPR0042.bin");
        assert!(ffmpeg_args.windows(2).any(|w| w[0] == "-map" && w[1] == "0:3"));
        assert!(ffmpeg_args.windows(2).any(|w| w[0] == "-f" && w[1] == "rawvideo"));
        assert_eq!(ffmpeg_args.last().map(String::as_str), raw.to_str());

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tool_name(), "gpmd2csv");
        assert_eq!(calls[1].tool_name(), "gopro2gpx");
        assert_eq!(calls[1].flag_value("-a"), Some(std::ffi::OsStr::new("500")));
    }

    #[test]
    fn test_extract_all_numbers_tracks_by_position() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::new(dir.path().to_path_buf());
        let clips = vec![clip(dir.path(), "GOPR0007.MP4"), clip(dir.path(), "GP010007.MP4")];
        let mut report = RunReport::new(dir.path());

        extract_all(
            &config,
            &MockFfmpegSpawner::new(),
            &MockCommandRunner::new(),
            &clips,
            &mut report,
        )
        .unwrap();

        let recorded: Vec<(&str, usize)> = report
            .clips
            .iter()
            .map(|c| (c.file_name.as_str(), c.index))
            .collect();
        assert_eq!(recorded, vec![("GOPR0007.MP4", 0), ("GP010007.MP4", 1)]);
        assert!(dir.path().join("gpxFiles/1.gpx").exists());
    }

    #[test]
    fn test_ffmpeg_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::new(dir.path().to_path_buf());
        let spawner = MockFfmpegSpawner::new();
        spawner.fail_with_exit_code(1);
        let runner = MockCommandRunner::new();

        let result = extract_clip(&config, &spawner, &runner, &clip(dir.path(), "a.mp4"), 0);
        match result {
            Err(CoreError::CommandFailed { stderr, .. }) => assert!(stderr.contains("matches no streams")),
            other => panic!("expected CommandFailed, got {:?}", other),
        }
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_tool_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::new(dir.path().to_path_buf());
        let runner = MockCommandRunner::new();
        runner.fail_tool("gopro2gpx", 2);

        let result = extract_clip(
            &config,
            &MockFfmpegSpawner::new(),
            &runner,
            &clip(dir.path(), "a.mp4"),
            0,
        );
        assert!(matches!(result, Err(CoreError::CommandFailed { .. })));
    }
}
