// gpxstitch-cli/src/config.rs
//
// Maps parsed arguments onto the core configuration builder.

use crate::cli::{CommonArgs, ExtractionArgs, RoutingArgs};
use crate::error::{CliErrorContext, CliResult};

use gpxstitch_core::{CoreConfig, CoreConfigBuilder};

use std::path::PathBuf;
use std::time::Duration;

/// Name of the log directory created inside the source directory.
pub const DEFAULT_LOG_DIR_NAME: &str = "logs";

/// Resolves the source directory to an absolute path.
pub fn resolve_source(common: &CommonArgs) -> CliResult<PathBuf> {
    let source = common
        .source
        .canonicalize()
        .cli_with_context(|| format!("Invalid source directory '{}'", common.source.display()))?;
    if !source.is_dir() {
        return Err(gpxstitch_core::CoreError::PathError(format!(
            "Invalid source directory '{}': not a directory",
            source.display()
        )));
    }
    Ok(source)
}

/// Log directory for the run: `--log-dir` or `<source>/logs`.
pub fn log_dir(common: &CommonArgs, source: &std::path::Path) -> PathBuf {
    common
        .log_dir
        .clone()
        .unwrap_or_else(|| source.join(DEFAULT_LOG_DIR_NAME))
}

/// Builds the core configuration from the arguments of any subcommand.
pub fn build_config(
    source: PathBuf,
    common: &CommonArgs,
    extraction: Option<&ExtractionArgs>,
    routing: Option<&RoutingArgs>,
) -> CliResult<CoreConfig> {
    let mut builder = CoreConfigBuilder::new().source_dir(source);

    if let Some(path) = &common.gpxmerge_path {
        builder = builder.gpxmerge_path(path.clone());
    }
    if let Some(topic) = &common.ntfy {
        builder = builder.ntfy_topic(topic);
    }

    if let Some(args) = extraction {
        if let Some(path) = &args.ffmpeg_path {
            builder = builder.ffmpeg_path(path.clone());
        }
        if let Some(path) = &args.gpmd2csv_path {
            builder = builder.gpmd2csv_path(path.clone());
        }
        if let Some(path) = &args.gopro2gpx_path {
            builder = builder.gopro2gpx_path(path.clone());
        }
        if let Some(stream) = &args.telemetry_stream {
            builder = builder.telemetry_stream(stream);
        }
        if let Some(accuracy) = args.gps_accuracy {
            builder = builder.gps_accuracy(accuracy);
        }
    }

    if let Some(args) = routing {
        if let Some(key) = &args.api_key {
            builder = builder.api_key(key);
        }
        if let Some(url) = &args.routing_url {
            builder = builder.routing_base_url(url);
        }
        if let Some(profile) = &args.profile {
            builder = builder.routing_profile(profile);
        }
        if let Some(secs) = args.routing_timeout {
            builder = builder.routing_timeout(Duration::from_secs(secs));
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_build_config_from_stitch_args() {
        let cli = Cli::parse_from([
            "gpxstitch",
            "stitch",
            "/clips",
            "--api-key",
            "key",
            "--routing-url",
            "http://localhost:8080",
            "--gpxmerge-path",
            "/usr/local/bin/gpxmerge",
        ]);
        let Commands::Stitch(args) = cli.command else {
            panic!("Expected Stitch command");
        };

        let config =
            build_config(PathBuf::from("/clips"), &args.common, None, Some(&args.routing)).unwrap();

        assert_eq!(config.gpx_dir, PathBuf::from("/clips/gpxFiles"));
        assert_eq!(config.gpxmerge_path, PathBuf::from("/usr/local/bin/gpxmerge"));
        assert_eq!(config.routing.api_key.as_deref(), Some("key"));
        assert_eq!(
            config.routing.directions_url(),
            "http://localhost:8080/v2/directions/cycling-mountain/gpx"
        );
        assert_eq!(log_dir(&args.common, &config.source_dir), PathBuf::from("/clips/logs"));
    }
}
