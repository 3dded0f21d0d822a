//! `stockcast` command line: argument parsing, command execution and text output.

pub mod args;
pub mod commands;
mod render;

pub use args::{Cli, Command, OutputFormat};
pub use commands::execute;
