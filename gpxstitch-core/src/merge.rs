//! Merge finalizer.
//!
//! Concatenates clip tracks and connectors into `final.gpx` through the
//! external `gpxmerge` tool. Files are handed over in route order (see
//! [`crate::ordering::merge_order`]), so a connector lands between the two
//! clips it joins.

use std::path::PathBuf;

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{CommandRunner, ToolCommand};
use crate::ordering::{list_gpx_files, merge_order};
use crate::report::RunReport;

/// File name of the merged route inside the GPX directory.
pub const FINAL_TRACK_FILE: &str = "final.gpx";

/// Deletes the output of a previous merge. Returns true if one existed.
pub fn remove_previous_merge(config: &CoreConfig) -> CoreResult<bool> {
    let path = config.final_track_path();
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(&path).map_err(|e| {
        CoreError::PathError(format!("Failed to remove '{}': {}", path.display(), e))
    })?;
    log::debug!("Removed previous {}", path.display());
    Ok(true)
}

/// Builds `gpxmerge -o <final> <inputs...>`.
pub fn merge_command(config: &CoreConfig, files: &[String]) -> ToolCommand {
    files.iter().fold(
        ToolCommand::new(&config.gpxmerge_path)
            .arg("-o")
            .arg(config.final_track_path()),
        |cmd, name| cmd.arg(config.gpx_dir.join(name)),
    )
}

/// Merges every track in the GPX directory into `final.gpx`.
///
/// # Errors
///
/// * `CoreError::DirectoryRead` - If the GPX directory cannot be listed
/// * `CoreError::OperationFailed` - If there is nothing to merge
/// * `CoreError::CommandFailed` - If gpxmerge fails
pub fn finalize_merge<R>(config: &CoreConfig, runner: &R, report: &mut RunReport) -> CoreResult<PathBuf>
where
    R: CommandRunner + ?Sized,
{
    remove_previous_merge(config)?;

    let files = merge_order(list_gpx_files(&config.gpx_dir)?);
    if files.is_empty() {
        log::error!("No tracks to merge in {}", config.gpx_dir.display());
        return Err(CoreError::OperationFailed(format!(
            "no .gpx tracks found in '{}'",
            config.gpx_dir.display()
        )));
    }

    log::info!("Merging {} file(s): {}", files.len(), files.join(", "));

    let final_path = config.final_track_path();
    std::fs::File::create(&final_path)?;
    runner.run(&merge_command(config, &files))?;

    report.merged_files = files;
    report.final_track = Some(final_path.clone());
    Ok(final_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::MockCommandRunner;
    use std::ffi::OsString;

    fn setup(names: &[&str]) -> (tempfile::TempDir, CoreConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::new(dir.path().to_path_buf());
        std::fs::create_dir_all(&config.gpx_dir).unwrap();
        for name in names {
            std::fs::write(config.gpx_dir.join(name), "<gpx/>").unwrap();
        }
        (dir, config)
    }

    #[test]
    fn test_merge_passes_files_in_route_order() {
        let (_dir, config) = setup(&["2.gpx", "10.gpx", "3To4.gpx", "1.gpx", "notes.txt"]);
        let runner = MockCommandRunner::new();
        let mut report = RunReport::new(&config.source_dir);

        let final_path = finalize_merge(&config, &runner, &mut report).unwrap();

        assert_eq!(report.merged_files, vec!["1.gpx", "2.gpx", "3To4.gpx", "10.gpx"]);
        assert_eq!(report.final_track.as_deref(), Some(final_path.as_path()));

        let calls = runner.calls_to("gpxmerge");
        assert_eq!(calls.len(), 1);
        let expected: Vec<OsString> = std::iter::once(OsString::from("-o"))
            .chain(std::iter::once(final_path.clone().into_os_string()))
            .chain(
                report
                    .merged_files
                    .iter()
                    .map(|n| config.gpx_dir.join(n).into_os_string()),
            )
            .collect();
        assert_eq!(calls[0].args, expected);
    }

    #[test]
    fn test_previous_final_track_is_not_an_input() {
        let (_dir, config) = setup(&["0.gpx", "final.gpx"]);
        let runner = MockCommandRunner::new();
        runner.push_output("gpxmerge", "<gpx>merged</gpx>");
        let mut report = RunReport::new(&config.source_dir);

        finalize_merge(&config, &runner, &mut report).unwrap();

        assert_eq!(report.merged_files, vec!["0.gpx"]);
        assert_eq!(
            std::fs::read_to_string(config.final_track_path()).unwrap(),
            "<gpx>merged</gpx>"
        );
    }

    #[test]
    fn test_merge_with_no_tracks_fails() {
        let (_dir, config) = setup(&[]);
        let runner = MockCommandRunner::new();
        let mut report = RunReport::new(&config.source_dir);

        let result = finalize_merge(&config, &runner, &mut report);
        assert!(matches!(result, Err(CoreError::OperationFailed(_))));
        assert!(runner.calls().is_empty());
    }
}
