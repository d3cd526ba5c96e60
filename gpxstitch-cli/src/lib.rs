// gpxstitch-cli/src/lib.rs
//
// Library portion of the gpxstitch CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, MergeArgs, RunArgs, StitchArgs};
pub use commands::merge::merge_command;
pub use commands::run::run_command;
pub use commands::stitch::stitch_command;
