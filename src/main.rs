use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;

use cli::app::{Cli, Commands};
use lexicon_config::config::Config;

fn main() -> Result<()> {
    let config = Config::load()?;

    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&config.settings.log_file)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting lexicon-config");

    match cli.command {
        Commands::Rows(args) => cli::commands::options::rows_command(&config, args),
        Commands::Check(args) => cli::commands::options::check_command(&config, args, true),
        Commands::Uncheck(args) => cli::commands::options::check_command(&config, args, false),
        Commands::Move(args) => cli::commands::options::move_command(&config, args),
        Commands::Shared(args) => cli::commands::shared::shared_command(&config, args),
        Commands::Reversal(cmd) => cli::commands::reversal::reversal_command(&config, cmd),
        Commands::Settings(cmd) => cli::commands::settings::settings_command(config, cmd),
    }
}
