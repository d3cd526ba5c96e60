// gpxstitch-cli/src/main.rs
//
// Entry point of the gpxstitch command-line tool. Parses arguments, hands
// the chosen subcommand to its implementation, and turns a failure into a
// message on stderr and exit code 1.

use anyhow::Context;
use clap::Parser;
use gpxstitch_cli::terminal::print_error;
use gpxstitch_cli::{Cli, Commands, merge_command, run_command, stitch_command};
use std::process;

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let result: anyhow::Result<()> = match cli.command {
        Commands::Run(args) => run_command(args, verbose).context("run failed"),
        Commands::Stitch(args) => stitch_command(args, verbose).context("stitch failed"),
        Commands::Merge(args) => merge_command(args, verbose).context("merge failed"),
    };

    if let Err(e) = result {
        print_error(&format!("{:#}", e));
        process::exit(1);
    }
}
