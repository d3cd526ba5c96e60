//! Implementation of the 'stitch' subcommand.
//!
//! Creates the missing links over an already extracted GPX directory, then
//! merges unless `--no-merge` was given. Links already on disk are kept.

use crate::cli::StitchArgs;
use crate::commands::{execute, prepare};
use crate::config::build_config;
use crate::error::CliResult;
use crate::terminal::print_section;

use gpxstitch_core::external::{StdCommandRunner, check_dependency};
use gpxstitch_core::routing::OpenRouteServiceClient;
use gpxstitch_core::run_stitch;

pub fn stitch_command(args: StitchArgs, verbose: bool) -> CliResult<()> {
    let (config, log_path) = prepare(&args.common, verbose, |source| {
        build_config(source, &args.common, None, Some(&args.routing))
    })?;
    let merge = !args.no_merge;

    execute(&config, &log_path, |config| {
        config.validate(true)?;
        if merge {
            check_dependency(&config.gpxmerge_path)?;
        }

        let client = OpenRouteServiceClient::new(&config.routing)?;

        print_section("Stitch");
        run_stitch(config, &StdCommandRunner, &client, merge)
    })
}
