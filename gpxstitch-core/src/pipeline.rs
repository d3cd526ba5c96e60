// ============================================================================
// gpxstitch-core/src/pipeline.rs
// ============================================================================
//
// PIPELINE: Stage Orchestration
//
// This module wires the stages together for the three entry points the CLI
// exposes. Every collaborator is passed in, so the whole flow can run
// against mocks.
//
// WORKFLOW (run_pipeline):
// 1. Enumerate clips in the source directory, oldest first
// 2. Reset the GPX output directory
// 3. Extract telemetry and a track for every clip
// 4. Stitch gaps between consecutive tracks
// 5. Merge tracks and connectors into final.gpx
//
// run_stitch starts at step 4 over an existing GPX directory; run_merge only
// performs step 5.

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::discovery::{find_clips, reset_output_dir};
use crate::error::{CoreError, CoreResult};
use crate::external::{CommandRunner, FfmpegSpawner};
use crate::extraction::extract_all;
use crate::merge::finalize_merge;
use crate::report::RunReport;
use crate::routing::RouteProvider;
use crate::stitch::stitch_tracks;

// ---- External crate imports ----
use log::info;

/// Runs every stage over the clips in `config.source_dir`.
///
/// # Errors
///
/// Returns the first fatal error of any stage. Gaps that could not be
/// bridged are not errors; they are listed in the returned report.
pub fn run_pipeline<S, R, P>(
    config: &CoreConfig,
    spawner: &S,
    runner: &R,
    provider: &P,
) -> CoreResult<RunReport>
where
    S: FfmpegSpawner,
    R: CommandRunner + ?Sized,
    P: RouteProvider + ?Sized,
{
    config.validate(true)?;
    let mut report = RunReport::new(&config.source_dir);

    info!("Enumerating clips in {}", config.source_dir.display());
    let clips = find_clips(&config.source_dir)?;
    info!("Found {} clip(s)", clips.len());

    reset_output_dir(&config.gpx_dir)?;

    info!("Extracting telemetry");
    extract_all(config, spawner, runner, &clips, &mut report)?;

    info!("Creating links between clip tracks");
    stitch_tracks(&config.gpx_dir, provider, &mut report)?;

    info!("Merging tracks and links");
    finalize_merge(config, runner, &mut report)?;

    report.finish();
    Ok(report)
}

/// Stitches an existing GPX directory, then merges unless `merge` is false.
///
/// Safe to repeat: links already on disk are kept and not requested again.
pub fn run_stitch<R, P>(
    config: &CoreConfig,
    runner: &R,
    provider: &P,
    merge: bool,
) -> CoreResult<RunReport>
where
    R: CommandRunner + ?Sized,
    P: RouteProvider + ?Sized,
{
    config.validate(true)?;
    require_gpx_dir(config)?;
    let mut report = RunReport::new(&config.source_dir);

    info!("Creating links between clip tracks");
    stitch_tracks(&config.gpx_dir, provider, &mut report)?;

    if merge {
        info!("Merging tracks and links");
        finalize_merge(config, runner, &mut report)?;
    }

    report.finish();
    Ok(report)
}

/// Merges the tracks already present in the GPX directory.
pub fn run_merge<R>(config: &CoreConfig, runner: &R) -> CoreResult<RunReport>
where
    R: CommandRunner + ?Sized,
{
    config.validate(false)?;
    require_gpx_dir(config)?;
    let mut report = RunReport::new(&config.source_dir);

    info!("Merging tracks and links");
    finalize_merge(config, runner, &mut report)?;

    report.finish();
    Ok(report)
}

fn require_gpx_dir(config: &CoreConfig) -> CoreResult<()> {
    if config.gpx_dir.is_dir() {
        Ok(())
    } else {
        Err(CoreError::PathError(format!(
            "GPX directory '{}' does not exist; run the full pipeline first",
            config.gpx_dir.display()
        )))
    }
}
