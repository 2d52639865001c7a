use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;

use lexicon_config::config::{Config, SETTING_NAMES};

#[derive(Args)]
pub struct SettingsCommands {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Show current settings
    Show,
    /// Get the value of a specific setting
    Get {
        /// Setting name
        name: String,
    },
    /// Set the value of a specific setting
    Set {
        /// Setting name
        name: String,
        /// Setting value
        value: String,
    },
    /// Reset a setting to its default value
    Reset {
        /// Setting name
        name: String,
    },
    /// Reset all settings to default values
    ResetAll,
}

pub fn settings_command(mut config: Config, cmd: SettingsCommands) -> Result<()> {
    match cmd.command {
        SettingsSubcommands::Show => {
            println!("Settings:");
            println!("=========");
            for name in SETTING_NAMES {
                println!("  {:<16} {}", name.bold(), config.get(name)?);
            }
            Ok(())
        }
        SettingsSubcommands::Get { name } => {
            println!("{}", config.get(&name)?);
            Ok(())
        }
        SettingsSubcommands::Set { name, value } => {
            config.set(&name, &value)?;
            config.save()?;
            println!("{} {} = {}", "✓".bright_green().bold(), name, config.get(&name)?);
            Ok(())
        }
        SettingsSubcommands::Reset { name } => {
            config.reset(&name)?;
            config.save()?;
            println!("{} {} reset to default", "✓".bright_green().bold(), name);
            Ok(())
        }
        SettingsSubcommands::ResetAll => {
            config.reset_all();
            config.save()?;
            println!("{} All settings reset to defaults", "✓".bright_green().bold());
            Ok(())
        }
    }
}
