//! Core library for turning action-camera clips into one continuous GPX route.
//!
//! This crate enumerates clips, extracts a GPS track from each through
//! external telemetry tools, bridges the gaps between consecutive tracks with
//! routed connectors, and merges everything into a single track.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use gpxstitch_core::config::CoreConfigBuilder;
//! use gpxstitch_core::external::{SidecarSpawner, StdCommandRunner};
//! use gpxstitch_core::routing::OpenRouteServiceClient;
//! use gpxstitch_core::run_pipeline;
//! use std::path::PathBuf;
//!
//! let config = CoreConfigBuilder::new()
//!     .source_dir(PathBuf::from("/media/gopro/day4"))
//!     .api_key("my-ors-key")
//!     .build()
//!     .unwrap();
//!
//! let client = OpenRouteServiceClient::new(&config.routing).unwrap();
//! let report = run_pipeline(&config, &SidecarSpawner, &StdCommandRunner, &client).unwrap();
//!
//! for skip in report.warnings() {
//!     println!("gap left open at {}: {}", skip.track, skip.reason);
//! }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod extraction;
pub mod gpx;
pub mod merge;
pub mod notifications;
pub mod ordering;
pub mod pipeline;
pub mod report;
pub mod routing;
pub mod stitch;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use discovery::{Clip, find_clips};
pub use error::{CoreError, CoreResult};
pub use notifications::{NotificationSender, NotificationType, NtfyNotificationSender};
pub use ordering::{OrderKey, TrackFile, build_track_index, merge_order, resolve_order_key};
pub use pipeline::{run_merge, run_pipeline, run_stitch};
pub use report::RunReport;
pub use stitch::{StitchDecision, StitchState, stitch_tracks};
pub use utils::format_duration;
