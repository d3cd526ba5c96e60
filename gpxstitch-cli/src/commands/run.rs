//! Implementation of the 'run' subcommand.
//!
//! Runs the whole pipeline: clip enumeration, telemetry extraction,
//! stitching and merge.

use crate::cli::RunArgs;
use crate::commands::{execute, prepare};
use crate::config::build_config;
use crate::error::CliResult;
use crate::terminal::print_section;

use gpxstitch_core::external::{SidecarSpawner, StdCommandRunner};
use gpxstitch_core::extraction::check_dependencies;
use gpxstitch_core::routing::OpenRouteServiceClient;
use gpxstitch_core::run_pipeline;

pub fn run_command(args: RunArgs, verbose: bool) -> CliResult<()> {
    let (config, log_path) = prepare(&args.common, verbose, |source| {
        build_config(source, &args.common, Some(&args.extraction), Some(&args.routing))
    })?;

    execute(&config, &log_path, |config| {
        config.validate(true)?;

        print_section("Dependencies");
        check_dependencies(config)?;
        log::info!("External dependency check passed.");

        let client = OpenRouteServiceClient::new(&config.routing)?;

        print_section("Pipeline");
        run_pipeline(config, &SidecarSpawner, &StdCommandRunner, &client)
    })
}
