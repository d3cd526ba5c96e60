//! Run reporting module
//!
//! This module collects what a run did: which clips were extracted, which
//! gaps were bridged and which were skipped, and what went into the final
//! merge. The report is serialized to JSON next to the clips and summarized
//! by the CLI.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::CoreResult;
use crate::gpx::Point;

/// A clip whose telemetry was turned into a track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedClip {
    /// Source clip file name
    pub file_name: String,

    /// Positional index, which is also the track file stem
    pub index: usize,

    /// Track written for the clip
    pub gpx_path: PathBuf,
}

/// A connector track between two clip tracks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedLink {
    /// Link track stem, e.g. `3To4`
    pub name: String,
    pub from: Point,
    pub to: Point,

    /// Number of routed points
    pub points: usize,

    /// True when the link file already existed and no request was made
    pub reused: bool,
}

/// Why a track did not get a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The track's first segment has no points
    EmptyTrack,
    /// The track ends on a point recorded without a GPS fix
    InvalidFix,
    /// The directions service answered with a non-200 status
    Rejected { status: u16 },
    /// The directions service could not be reached
    Unreachable { message: String },
    /// An endpoint coordinate cannot be sent to the directions service
    InvalidCoordinate { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyTrack => write!(f, "track has no points"),
            SkipReason::InvalidFix => write!(f, "track ends without a GPS fix"),
            SkipReason::Rejected { status } => write!(f, "routing rejected with HTTP {status}"),
            SkipReason::Unreachable { message } => write!(f, "routing unreachable: {message}"),
            SkipReason::InvalidCoordinate { message } => write!(f, "not routable: {message}"),
        }
    }
}

/// A track that was passed over by the stitcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapSkip {
    /// Track file name
    pub track: String,

    /// Link that would have been created, when a request was attempted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    pub reason: SkipReason,
}

impl GapSkip {
    /// Skips that mean a gap in the final route stays unbridged.
    pub fn is_warning(&self) -> bool {
        matches!(
            self.reason,
            SkipReason::Rejected { .. }
                | SkipReason::Unreachable { .. }
                | SkipReason::InvalidCoordinate { .. }
        )
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub source_dir: PathBuf,
    pub started_at: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Local>>,

    pub clips: Vec<ExtractedClip>,
    pub links: Vec<CreatedLink>,
    pub skipped: Vec<GapSkip>,

    /// Files handed to the merge tool, in order
    pub merged_files: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_track: Option<PathBuf>,
}

impl RunReport {
    pub fn new(source_dir: &Path) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            started_at: Local::now(),
            finished_at: None,
            clips: Vec::new(),
            links: Vec::new(),
            skipped: Vec::new(),
            merged_files: Vec::new(),
            final_track: None,
        }
    }

    pub fn record_clip(&mut self, clip: ExtractedClip) {
        self.clips.push(clip);
    }

    pub fn record_link(&mut self, link: CreatedLink) {
        self.links.push(link);
    }

    pub fn record_skip(&mut self, track: impl Into<String>, link: Option<String>, reason: SkipReason) {
        self.skipped.push(GapSkip {
            track: track.into(),
            link,
            reason,
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    /// Wall-clock time between start and finish (or now, if unfinished).
    pub fn elapsed(&self) -> Duration {
        let end = self.finished_at.unwrap_or_else(Local::now);
        (end - self.started_at).to_std().unwrap_or_default()
    }

    /// Skips that left a gap unbridged.
    pub fn warnings(&self) -> impl Iterator<Item = &GapSkip> {
        self.skipped.iter().filter(|s| s.is_warning())
    }

    /// Links created by this run, excluding ones found on disk.
    pub fn new_link_count(&self) -> usize {
        self.links.iter().filter(|l| !l.reused).count()
    }

    /// Writes the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::debug!("Run report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_only_cover_routing_failures() {
        let mut report = RunReport::new(Path::new("/clips"));
        report.record_skip("2.gpx", None, SkipReason::EmptyTrack);
        report.record_skip("3.gpx", Some("2To3".into()), SkipReason::Rejected { status: 500 });
        report.record_skip(
            "4.gpx",
            Some("3To4".into()),
            SkipReason::Unreachable {
                message: "timed out".into(),
            },
        );

        let warned: Vec<&str> = report.warnings().map(|s| s.track.as_str()).collect();
        assert_eq!(warned, vec!["3.gpx", "4.gpx"]);
    }

    #[test]
    fn test_report_serializes_skip_reasons() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = RunReport::new(dir.path());
        report.record_link(CreatedLink {
            name: "0To1".into(),
            from: Point::new("10", "20"),
            to: Point::new("10.1", "20.1"),
            points: 2,
            reused: false,
        });
        report.record_skip("2.gpx", Some("1To2".into()), SkipReason::Rejected { status: 429 });
        report.finish();

        let path = dir.path().join("report.json");
        report.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["links"][0]["name"], "0To1");
        assert_eq!(value["links"][0]["from"]["lat"], "10");
        assert_eq!(value["skipped"][0]["reason"]["kind"], "rejected");
        assert_eq!(value["skipped"][0]["reason"]["status"], 429);
        assert!(value.get("final_track").is_none());
        assert_eq!(report.new_link_count(), 1);
    }
}
