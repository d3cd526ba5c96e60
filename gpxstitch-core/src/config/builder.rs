// ============================================================================
// gpxstitch-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// This module implements the builder pattern for the CoreConfig structure,
// providing a fluent API for creating CoreConfig instances. Directory
// overrides are optional; anything left unset is derived from the source
// directory when `build` is called.

// ---- Standard library imports ----
use std::path::PathBuf;
use std::time::Duration;

// ---- Internal crate imports ----
use super::{CoreConfig, RoutingConfig};
use crate::error::{CoreError, CoreResult};

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use gpxstitch_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
/// use std::time::Duration;
///
/// let config = CoreConfigBuilder::new()
///     .source_dir(PathBuf::from("/media/gopro"))
///     .gpxmerge_path(PathBuf::from("/opt/gpxmerge/gpxmerge"))
///     .api_key("secret")
///     .routing_timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.routing.timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    // Required fields
    source_dir: Option<PathBuf>,

    // Optional directory overrides
    gpx_dir: Option<PathBuf>,
    telemetry_dir: Option<PathBuf>,
    raw_dir: Option<PathBuf>,

    // Tool locations
    ffmpeg_path: Option<PathBuf>,
    gpmd2csv_path: Option<PathBuf>,
    gopro2gpx_path: Option<PathBuf>,
    gpxmerge_path: Option<PathBuf>,

    // Extraction parameters
    telemetry_stream: Option<String>,
    gps_accuracy: Option<u32>,

    // Routing
    routing_base_url: Option<String>,
    routing_profile: Option<String>,
    api_key: Option<String>,
    routing_timeout: Option<Duration>,

    ntfy_topic: Option<String>,
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory holding the .mp4 clips.
    pub fn source_dir(mut self, source_dir: PathBuf) -> Self {
        self.source_dir = Some(source_dir);
        self
    }

    /// Overrides the GPX output directory (default `<source>/gpxFiles`).
    pub fn gpx_dir(mut self, gpx_dir: PathBuf) -> Self {
        self.gpx_dir = Some(gpx_dir);
        self
    }

    /// Overrides the telemetry CSV directory (default `<source>/telemetry`).
    pub fn telemetry_dir(mut self, telemetry_dir: PathBuf) -> Self {
        self.telemetry_dir = Some(telemetry_dir);
        self
    }

    /// Overrides the raw container directory (default `<source>/rawVideos`).
    pub fn raw_dir(mut self, raw_dir: PathBuf) -> Self {
        self.raw_dir = Some(raw_dir);
        self
    }

    pub fn ffmpeg_path(mut self, path: PathBuf) -> Self {
        self.ffmpeg_path = Some(path);
        self
    }

    pub fn gpmd2csv_path(mut self, path: PathBuf) -> Self {
        self.gpmd2csv_path = Some(path);
        self
    }

    pub fn gopro2gpx_path(mut self, path: PathBuf) -> Self {
        self.gopro2gpx_path = Some(path);
        self
    }

    pub fn gpxmerge_path(mut self, path: PathBuf) -> Self {
        self.gpxmerge_path = Some(path);
        self
    }

    /// Sets the ffmpeg `-map` specifier of the telemetry stream.
    pub fn telemetry_stream(mut self, stream: &str) -> Self {
        self.telemetry_stream = Some(stream.to_string());
        self
    }

    /// Sets the `gopro2gpx` accuracy filter.
    pub fn gps_accuracy(mut self, accuracy: u32) -> Self {
        self.gps_accuracy = Some(accuracy);
        self
    }

    pub fn routing_base_url(mut self, url: &str) -> Self {
        self.routing_base_url = Some(url.to_string());
        self
    }

    pub fn routing_profile(mut self, profile: &str) -> Self {
        self.routing_profile = Some(profile.to_string());
        self
    }

    /// Sets the directions service API key.
    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn routing_timeout(mut self, timeout: Duration) -> Self {
        self.routing_timeout = Some(timeout);
        self
    }

    /// Sets the ntfy.sh topic URL for sending notifications.
    pub fn ntfy_topic(mut self, topic: &str) -> Self {
        self.ntfy_topic = Some(topic.to_string());
        self
    }

    /// Builds the CoreConfig instance.
    ///
    /// # Errors
    ///
    /// * `CoreError::Config` - If no source directory was set
    pub fn build(self) -> CoreResult<CoreConfig> {
        let source_dir = self
            .source_dir
            .ok_or_else(|| CoreError::Config("source_dir is required".to_string()))?;

        let mut config = CoreConfig::new(source_dir);

        if let Some(dir) = self.gpx_dir {
            config.gpx_dir = dir;
        }
        if let Some(dir) = self.telemetry_dir {
            config.telemetry_dir = dir;
        }
        if let Some(dir) = self.raw_dir {
            config.raw_dir = dir;
        }
        if let Some(path) = self.ffmpeg_path {
            config.ffmpeg_path = path;
        }
        if let Some(path) = self.gpmd2csv_path {
            config.gpmd2csv_path = path;
        }
        if let Some(path) = self.gopro2gpx_path {
            config.gopro2gpx_path = path;
        }
        if let Some(path) = self.gpxmerge_path {
            config.gpxmerge_path = path;
        }
        if let Some(stream) = self.telemetry_stream {
            config.telemetry_stream = stream;
        }
        if let Some(accuracy) = self.gps_accuracy {
            config.gps_accuracy = accuracy;
        }

        let defaults = RoutingConfig::default();
        config.routing = RoutingConfig {
            base_url: self.routing_base_url.unwrap_or(defaults.base_url),
            profile: self.routing_profile.unwrap_or(defaults.profile),
            api_key: self.api_key,
            timeout: self.routing_timeout.unwrap_or(defaults.timeout),
        };
        config.ntfy_topic = self.ntfy_topic;

        Ok(config)
    }
}
