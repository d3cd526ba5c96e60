// ============================================================================
// gpxstitch-core/src/ordering.rs
// ============================================================================
//
// ORDERING: Track File Names and Sequence Keys
//
// Every file in the GPX output directory is named after its place in the
// route: clip tracks are `<i>.gpx`, links are `<a>To<b>.gpx`, and the merged
// output is `final.gpx`. This module turns those names back into order.
//
// KEY COMPONENTS:
// - TrackFile / build_track_index: strict index of the clip tracks
// - OrderKey / resolve_order_key: best-effort key for any file name
// - merge_order: total order used for the final concatenation

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Extension of every track file.
pub const GPX_EXTENSION: &str = "gpx";

/// Infix separating the two endpoint stems of a link name.
pub const LINK_INFIX: &str = "To";

/// Stem of the merged output track.
pub const FINAL_STEM: &str = "final";

// ============================================================================
// NAMES
// ============================================================================

/// File name of the link between the tracks with the given stems.
pub fn link_file_name(prev_stem: &str, next_stem: &str) -> String {
    format!("{}.{GPX_EXTENSION}", link_stem(prev_stem, next_stem))
}

pub fn link_stem(prev_stem: &str, next_stem: &str) -> String {
    format!("{prev_stem}{LINK_INFIX}{next_stem}")
}

/// True for names produced by the stitcher or the merger rather than by
/// extraction. Such files are never stitching destinations.
pub fn is_reserved_name(name: &str) -> bool {
    name.contains(LINK_INFIX) || name.contains(FINAL_STEM)
}

/// `name` without its `.gpx` extension, if it has one.
pub fn gpx_stem(name: &str) -> Option<&str> {
    let path = Path::new(name);
    let is_gpx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == GPX_EXTENSION);
    if is_gpx {
        path.file_stem().and_then(|s| s.to_str())
    } else {
        None
    }
}

/// Names of the `.gpx` files directly inside `dir`, in directory order.
pub fn list_gpx_files(dir: &Path) -> CoreResult<Vec<String>> {
    let read_error = |source| CoreError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if gpx_stem(&name).is_some() && entry.path().is_file() {
            names.push(name);
        }
    }
    Ok(names)
}

// ============================================================================
// TRACK INDEX
// ============================================================================

/// A per-clip track file and the clip position encoded in its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFile {
    pub index: i64,
    pub name: String,
    pub path: PathBuf,
}

impl TrackFile {
    pub fn stem(&self) -> &str {
        gpx_stem(&self.name).unwrap_or(&self.name)
    }
}

/// Lists the clip tracks in `gpx_dir`, ordered by clip index.
///
/// Link and merge artifacts from an earlier pass are left out so the
/// stitcher can run again over the same directory. Any other name must be
/// an integer.
///
/// # Errors
///
/// * `CoreError::DirectoryRead` - If the directory cannot be listed
/// * `CoreError::InvalidTrackName` - If a track name is not an integer
pub fn build_track_index(gpx_dir: &Path) -> CoreResult<Vec<TrackFile>> {
    let mut tracks = Vec::new();

    for name in list_gpx_files(gpx_dir)? {
        let Some(stem) = gpx_stem(&name) else {
            continue;
        };
        if is_reserved_name(stem) {
            log::debug!("Track index: skipping artifact {}", name);
            continue;
        }

        let index = stem.parse::<i64>().map_err(|_| {
            log::error!("Track file '{}' does not encode a clip index", name);
            CoreError::InvalidTrackName(name.clone())
        })?;

        tracks.push(TrackFile {
            index,
            path: gpx_dir.join(&name),
            name,
        });
    }

    tracks.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.name.cmp(&b.name)));
    Ok(tracks)
}

// ============================================================================
// MERGE ORDER
// ============================================================================

/// Sequence key recovered from a file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    pub numeral: i64,

    /// True when the whole stem parsed; false when it had to be truncated.
    pub exact: bool,
}

impl Ord for OrderKey {
    /// Ascending numeral; for equal numerals a clip track (exact) sorts
    /// before the links that start from it.
    fn cmp(&self, other: &Self) -> Ordering {
        self.numeral
            .cmp(&other.numeral)
            .then_with(|| other.exact.cmp(&self.exact))
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parses `stem` as an integer, dropping trailing characters until a prefix
/// parses. `"3To4"` resolves to `3`; a stem with no numeric prefix to `0`.
pub fn resolve_order_key(stem: &str) -> OrderKey {
    if let Ok(numeral) = stem.parse::<i64>() {
        return OrderKey {
            numeral,
            exact: true,
        };
    }

    let mut prefix = stem;
    while let Some((cut, _)) = prefix.char_indices().next_back() {
        prefix = &prefix[..cut];
        if let Ok(numeral) = prefix.parse::<i64>() {
            return OrderKey {
                numeral,
                exact: false,
            };
        }
    }

    OrderKey {
        numeral: 0,
        exact: false,
    }
}

/// Orders file names for concatenation: by key, then by name.
pub fn merge_order(mut names: Vec<String>) -> Vec<String> {
    names.sort_by_cached_key(|name| {
        let stem = gpx_stem(name).unwrap_or(name);
        (resolve_order_key(stem), name.clone())
    });
    names
}
