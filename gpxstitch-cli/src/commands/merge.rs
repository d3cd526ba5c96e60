//! Implementation of the 'merge' subcommand.

use crate::cli::MergeArgs;
use crate::commands::{execute, prepare};
use crate::config::build_config;
use crate::error::CliResult;
use crate::terminal::print_section;

use gpxstitch_core::external::{StdCommandRunner, check_dependency};
use gpxstitch_core::run_merge;

pub fn merge_command(args: MergeArgs, verbose: bool) -> CliResult<()> {
    let (config, log_path) = prepare(&args.common, verbose, |source| {
        build_config(source, &args.common, None, None)
    })?;

    execute(&config, &log_path, |config| {
        check_dependency(&config.gpxmerge_path)?;

        print_section("Merge");
        run_merge(config, &StdCommandRunner)
    })
}
