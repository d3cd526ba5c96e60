// gpxstitch-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "gpxstitch: GoPro GPS track stitching tool",
    long_about = "Extracts the GPS track of every GoPro clip in a directory, bridges the \
                  gaps between consecutive clips with routed connectors, and merges \
                  everything into a single GPX route."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug output on the console (the log file always has it)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extracts, stitches and merges the clips in SOURCE
    Run(RunArgs),
    /// Stitches the tracks already extracted into SOURCE/gpxFiles, then merges them
    Stitch(StitchArgs),
    /// Merges the tracks and links in SOURCE/gpxFiles into final.gpx
    Merge(MergeArgs),
}

/// Arguments shared by every subcommand.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Directory containing the .mp4 clips
    #[arg(required = true, value_name = "SOURCE")]
    pub source: PathBuf,

    /// Optional: Directory for log files (defaults to SOURCE/logs)
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Optional: ntfy.sh topic URL for run notifications (e.g., https://ntfy.sh/your_topic)
    /// Can also be set via the GPXSTITCH_NTFY_TOPIC environment variable.
    #[arg(long, value_name = "TOPIC_URL", env = "GPXSTITCH_NTFY_TOPIC")]
    pub ntfy: Option<String>,

    /// Path to the gpxmerge executable
    #[arg(long, value_name = "PATH")]
    pub gpxmerge_path: Option<PathBuf>,
}

/// Telemetry extraction settings.
#[derive(Args, Debug)]
pub struct ExtractionArgs {
    /// Path to the ffmpeg executable
    #[arg(long, value_name = "PATH")]
    pub ffmpeg_path: Option<PathBuf>,

    /// Path to the gpmd2csv executable
    #[arg(long, value_name = "PATH")]
    pub gpmd2csv_path: Option<PathBuf>,

    /// Path to the gopro2gpx executable
    #[arg(long, value_name = "PATH")]
    pub gopro2gpx_path: Option<PathBuf>,

    /// ffmpeg stream specifier of the telemetry track
    #[arg(long, value_name = "STREAM")]
    pub telemetry_stream: Option<String>,

    /// GPS accuracy filter passed to gopro2gpx (-a)
    #[arg(long, value_name = "DOP")]
    pub gps_accuracy: Option<u32>,
}

/// Directions service settings.
#[derive(Args, Debug)]
pub struct RoutingArgs {
    /// openrouteservice API key
    /// Can also be set via the ORS_API_KEY environment variable.
    #[arg(long, value_name = "KEY", env = "ORS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directions service base URL
    #[arg(long, value_name = "URL")]
    pub routing_url: Option<String>,

    /// Routing profile (e.g., cycling-mountain, driving-car, foot-hiking)
    #[arg(long, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Timeout for each routing request, in seconds
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub routing_timeout: Option<u64>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub extraction: ExtractionArgs,

    #[command(flatten)]
    pub routing: RoutingArgs,
}

#[derive(Args, Debug)]
pub struct StitchArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub routing: RoutingArgs,

    /// Stop after creating links, without running gpxmerge
    #[arg(long, default_value_t = false)]
    pub no_merge: bool,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_basic_args() {
        let cli = Cli::parse_from(["gpxstitch", "run", "/media/gopro/day4"]);

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.common.source, PathBuf::from("/media/gopro/day4"));
                assert!(args.common.log_dir.is_none());
                assert!(args.extraction.gps_accuracy.is_none());
                assert!(args.routing.profile.is_none());
            }
            other => panic!("Expected Run command, got {:?}", other),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::parse_from([
            "gpxstitch",
            "run",
            "clips",
            "--api-key",
            "k",
            "--profile",
            "driving-car",
            "--routing-timeout",
            "5",
            "--gps-accuracy",
            "300",
            "--telemetry-stream",
            "0:2",
            "--gpxmerge-path",
            "/opt/gpxmerge/gpxmerge",
            "-v",
        ]);

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.routing.api_key.as_deref(), Some("k"));
                assert_eq!(args.routing.profile.as_deref(), Some("driving-car"));
                assert_eq!(args.routing.routing_timeout, Some(5));
                assert_eq!(args.extraction.gps_accuracy, Some(300));
                assert_eq!(args.extraction.telemetry_stream.as_deref(), Some("0:2"));
                assert_eq!(
                    args.common.gpxmerge_path,
                    Some(PathBuf::from("/opt/gpxmerge/gpxmerge"))
                );
            }
            other => panic!("Expected Run command, got {:?}", other),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn test_parse_stitch_no_merge() {
        let cli = Cli::parse_from(["gpxstitch", "stitch", "clips", "--no-merge"]);
        match cli.command {
            Commands::Stitch(args) => assert!(args.no_merge),
            other => panic!("Expected Stitch command, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_routing_timeout_is_rejected() {
        let result = Cli::try_parse_from(["gpxstitch", "stitch", "clips", "--routing-timeout", "0"]);
        assert!(result.is_err());
    }
}
