//! Configuration structures and constants for the gpxstitch-core library.
//!
//! This module provides the configuration for a stitching run: where the clips
//! live, where each stage writes its output, which external tools to invoke,
//! and how to reach the directions service.

mod builder;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;

// Default constants

/// Name of the per-clip GPX output directory inside the source directory.
pub const GPX_DIR_NAME: &str = "gpxFiles";

/// Name of the telemetry CSV directory inside the source directory.
pub const TELEMETRY_DIR_NAME: &str = "telemetry";

/// Name of the raw telemetry container directory inside the source directory.
pub const RAW_DIR_NAME: &str = "rawVideos";

/// Default ffmpeg stream holding the GoPro GPMF telemetry track.
pub const DEFAULT_TELEMETRY_STREAM: &str = "0:3";

/// Default GPS accuracy filter passed to `gopro2gpx -a`.
/// Fixes with a dilution of precision above this value are dropped.
pub const DEFAULT_GPS_ACCURACY: u32 = 500;

/// Default openrouteservice API root.
pub const DEFAULT_ROUTING_BASE_URL: &str = "https://api.openrouteservice.org";

/// Default openrouteservice routing profile.
pub const DEFAULT_ROUTING_PROFILE: &str = "cycling-mountain";

/// Default timeout for a single routing request.
pub const DEFAULT_ROUTING_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the directions service used to fill gaps between clips.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// API root, without a trailing slash.
    pub base_url: String,

    /// Routing profile (e.g. "cycling-mountain", "driving-car").
    pub profile: String,

    /// API key sent in the `Authorization` header.
    pub api_key: Option<String>,

    /// Upper bound on a single request, connect through body.
    pub timeout: Duration,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ROUTING_BASE_URL.to_string(),
            profile: DEFAULT_ROUTING_PROFILE.to_string(),
            api_key: None,
            timeout: DEFAULT_ROUTING_TIMEOUT,
        }
    }
}

impl RoutingConfig {
    /// Full URL of the GPX directions endpoint for the configured profile.
    pub fn directions_url(&self) -> String {
        format!(
            "{}/v2/directions/{}/gpx",
            self.base_url.trim_end_matches('/'),
            self.profile
        )
    }
}

/// Main configuration structure for the gpxstitch-core library.
///
/// Only `source_dir` is required; every other directory is derived from it
/// unless overridden, and tool paths default to bare names resolved through
/// `PATH`.
///
/// # Examples
///
/// ```rust,no_run
/// use gpxstitch_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .source_dir(PathBuf::from("/media/gopro/day4"))
///     .api_key("my-ors-key")
///     .routing_profile("driving-car")
///     .build()
///     .unwrap();
/// assert!(config.gpx_dir.ends_with("gpxFiles"));
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory containing the .mp4 clips
    pub source_dir: PathBuf,

    /// Per-clip tracks, links and the final merged track
    pub gpx_dir: PathBuf,

    /// Telemetry CSV exports
    pub telemetry_dir: PathBuf,

    /// Intermediate raw telemetry containers (deleted after each clip)
    pub raw_dir: PathBuf,

    pub ffmpeg_path: PathBuf,
    pub gpmd2csv_path: PathBuf,
    pub gopro2gpx_path: PathBuf,
    pub gpxmerge_path: PathBuf,

    /// ffmpeg `-map` specifier selecting the telemetry stream
    pub telemetry_stream: String,

    /// `gopro2gpx -a` accuracy filter
    pub gps_accuracy: u32,

    pub routing: RoutingConfig,

    /// Optional ntfy.sh topic URL for run notifications
    pub ntfy_topic: Option<String>,
}

impl CoreConfig {
    /// Creates a configuration with every directory derived from `source_dir`.
    pub fn new(source_dir: PathBuf) -> Self {
        Self {
            gpx_dir: source_dir.join(GPX_DIR_NAME),
            telemetry_dir: source_dir.join(TELEMETRY_DIR_NAME),
            raw_dir: source_dir.join(RAW_DIR_NAME),
            source_dir,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            gpmd2csv_path: PathBuf::from("gpmd2csv"),
            gopro2gpx_path: PathBuf::from("gopro2gpx"),
            gpxmerge_path: PathBuf::from("gpxmerge"),
            telemetry_stream: DEFAULT_TELEMETRY_STREAM.to_string(),
            gps_accuracy: DEFAULT_GPS_ACCURACY,
            routing: RoutingConfig::default(),
            ntfy_topic: None,
        }
    }

    /// Path of the merged output track.
    pub fn final_track_path(&self) -> PathBuf {
        self.gpx_dir.join(crate::merge::FINAL_TRACK_FILE)
    }

    /// Path of the JSON run report.
    pub fn report_path(&self) -> PathBuf {
        self.source_dir.join("gpxstitch-report.json")
    }

    /// Checks the settings every stage relies on.
    ///
    /// The routing API key is only required when `require_routing` is set;
    /// the merge-only path never contacts the directions service.
    pub fn validate(&self, require_routing: bool) -> CoreResult<()> {
        require_dir(&self.source_dir)?;

        if self.telemetry_stream.trim().is_empty() {
            return Err(CoreError::Config(
                "telemetry stream specifier must not be empty".to_string(),
            ));
        }

        if require_routing {
            match self.routing.api_key.as_deref() {
                Some(key) if !key.trim().is_empty() => {}
                _ => {
                    return Err(CoreError::Config(
                        "a routing API key is required (set ORS_API_KEY or --api-key)".to_string(),
                    ));
                }
            }
            if !self.routing.base_url.starts_with("http://")
                && !self.routing.base_url.starts_with("https://")
            {
                return Err(CoreError::Config(format!(
                    "routing base URL '{}' must start with http:// or https://",
                    self.routing.base_url
                )));
            }
            if self.routing.timeout.is_zero() {
                return Err(CoreError::Config(
                    "routing timeout must be greater than zero".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn require_dir(path: &Path) -> CoreResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CoreError::PathError(format!(
            "Source directory '{}' does not exist or is not a directory",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directories_derive_from_source() {
        let config = CoreConfig::new(PathBuf::from("/clips"));
        assert_eq!(config.gpx_dir, PathBuf::from("/clips/gpxFiles"));
        assert_eq!(config.telemetry_dir, PathBuf::from("/clips/telemetry"));
        assert_eq!(config.raw_dir, PathBuf::from("/clips/rawVideos"));
        assert_eq!(config.final_track_path(), PathBuf::from("/clips/gpxFiles/final.gpx"));
    }

    #[test]
    fn test_directions_url_trims_trailing_slash() {
        let routing = RoutingConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..RoutingConfig::default()
        };
        assert_eq!(
            routing.directions_url(),
            "http://localhost:8080/v2/directions/cycling-mountain/gpx"
        );
    }

    #[test]
    fn test_validate_requires_api_key_only_for_routing() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::new(dir.path().to_path_buf());

        assert!(config.validate(false).is_ok());
        match config.validate(true) {
            Err(CoreError::Config(msg)) => assert!(msg.contains("API key")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_missing_source() {
        let config = CoreConfig::new(PathBuf::from("surely/not/here/42"));
        assert!(matches!(config.validate(false), Err(CoreError::PathError(_))));
    }
}
