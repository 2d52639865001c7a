use super::commands::options::{MoveArgs, NodeArgs, OptionArgs};
use super::commands::reversal::ReversalCommands;
use super::commands::settings::SettingsCommands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lexicon-config")]
#[command(about = "Edit which fields and writing systems a dictionary view shows")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the option rows of a node
    Rows(NodeArgs),
    /// Check an option of a node
    Check(OptionArgs),
    /// Uncheck an option of a node
    Uncheck(OptionArgs),
    /// Move an option of a node up or down
    Move(MoveArgs),
    /// List the other places a shared node is displayed
    Shared(NodeArgs),
    /// Reversal-index configuration housekeeping
    Reversal(ReversalCommands),
    /// Application settings management
    Settings(SettingsCommands),
}
