//! CLI module for the workflow relay
//!
//! - `serve`: run the HTTP service
//! - `parse`: check a pasted command offline

pub mod parse;
pub mod serve;

use clap::{Parser, Subcommand};

/// Workflow relay - request adapter and streaming relay for hosted workflows
#[derive(Parser)]
#[command(name = "workflow-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP service
    Serve,

    /// Parse a command and print the extracted template
    Parse(parse::ParseArgs),
}
