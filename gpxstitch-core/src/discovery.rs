//! Clip discovery module for finding action-camera clips to process.
//!
//! This module lists the .mp4 clips (case-insensitive) in the top level of
//! the source directory and orders them by modification time, which is the
//! order the camera recorded them in. It also owns the clean-slate reset of
//! the GPX output directory that precedes a full run.

use crate::error::{CoreError, CoreResult};

use chrono::{DateTime, Local};
use serde::Serialize;

use std::path::{Path, PathBuf};

/// A video clip found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clip {
    pub file_name: String,
    pub path: PathBuf,
    pub modified: DateTime<Local>,
}

impl Clip {
    /// File name without its extension, used to name per-clip artifacts.
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }
}

/// Finds the clips eligible for extraction in the specified directory.
///
/// Hidden files (leading `.`, including macOS `._GOPR0001.MP4` resource
/// forks) and anything without an `.mp4` extension are skipped. Clips are
/// returned oldest first; clips with identical timestamps are ordered by name.
///
/// # Errors
///
/// * `CoreError::DirectoryRead` - If the directory or an entry cannot be read
/// * `CoreError::NoClipsFound` - If no .mp4 clip is present
///
/// # Examples
///
/// ```rust,no_run
/// use gpxstitch_core::find_clips;
/// use std::path::Path;
///
/// for clip in find_clips(Path::new("/media/gopro/day4")).unwrap() {
///     println!("{} recorded at {}", clip.file_name, clip.modified);
/// }
/// ```
pub fn find_clips(source_dir: &Path) -> CoreResult<Vec<Clip>> {
    let read_error = |source| CoreError::DirectoryRead {
        path: source_dir.to_path_buf(),
        source,
    };

    let mut clips = Vec::new();
    for entry in std::fs::read_dir(source_dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if !is_clip_name(&file_name) || !path.is_file() {
            continue;
        }

        let modified = entry.metadata().and_then(|m| m.modified()).map_err(read_error)?;
        clips.push(Clip {
            file_name,
            path,
            modified: DateTime::<Local>::from(modified),
        });
    }

    if clips.is_empty() {
        return Err(CoreError::NoClipsFound);
    }

    clips.sort_by(|a, b| {
        a.modified
            .cmp(&b.modified)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });

    log::debug!("Found {} clip(s) in {}", clips.len(), source_dir.display());
    Ok(clips)
}

/// True for visible `.mp4` names, extension compared case-insensitively.
#[must_use]
pub fn is_clip_name(file_name: &str) -> bool {
    !file_name.starts_with('.')
        && Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"))
}

/// Removes the GPX output directory so a run never mixes in tracks from a
/// previous one. The directory is recreated lazily by the extraction stage.
pub fn reset_output_dir(gpx_dir: &Path) -> CoreResult<()> {
    if gpx_dir.exists() {
        log::info!("Removing previous output in {}", gpx_dir.display());
        std::fs::remove_dir_all(gpx_dir).map_err(|e| {
            CoreError::PathError(format!(
                "Failed to remove output directory '{}': {}",
                gpx_dir.display(),
                e
            ))
        })?;
    }
    Ok(())
}
