//! Reversal-index configuration housekeeping commands

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use std::path::PathBuf;

use lexicon_config::config::Config;
use lexicon_config::reversal::{self, ReconcilePlan};
use lexicon_config::writing_system::WritingSystem;

#[derive(Args)]
pub struct ReversalCommands {
    #[command(subcommand)]
    pub command: ReversalSubcommands,
}

#[derive(Args)]
pub struct ReversalArgs {
    /// Directory holding the reversal configurations (defaults to the configured one)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
    /// Analysis writing systems as TAG or TAG=Name, e.g. en=English
    #[arg(short, long = "ws", required = true)]
    pub writing_systems: Vec<String>,
}

#[derive(Subcommand)]
pub enum ReversalSubcommands {
    /// Show which files would be created or removed
    Plan(ReversalArgs),
    /// Create and remove files so there is one per writing system
    Sync(ReversalArgs),
}

fn parse_writing_system(arg: &str) -> Result<WritingSystem> {
    let (tag, name) = match arg.split_once('=') {
        Some((tag, name)) => (tag.trim(), name.trim()),
        None => (arg.trim(), arg.trim()),
    };
    Ok(WritingSystem::new(tag, name)?)
}

fn resolve(config: &Config, args: &ReversalArgs) -> Result<(PathBuf, Vec<WritingSystem>)> {
    let dir = args
        .dir
        .clone()
        .or_else(|| config.reversal_dir.clone())
        .context("No reversal directory given. Pass --dir or run 'lexicon-config settings set reversal-dir <dir>'")?;
    let writing_systems = args
        .writing_systems
        .iter()
        .map(|arg| parse_writing_system(arg))
        .collect::<Result<Vec<_>>>()?;
    Ok((dir, writing_systems))
}

fn print_plan(plan: &ReconcilePlan) {
    for (ws, path) in &plan.create {
        println!("{} {} ({})", "+".bright_green().bold(), path.display(), ws);
    }
    for file in &plan.remove {
        println!("{} {} ({})", "-".bright_red().bold(), file.path.display(), file.writing_system);
    }
    for file in &plan.keep {
        println!("  {} ({})", file.path.display(), file.writing_system);
    }
    for (path, message) in &plan.skipped {
        println!("{} {}: {}", "!".yellow().bold(), path.display(), message);
    }
    if plan.template.is_none() && !plan.create.is_empty() {
        println!("{}", "No template found; new files cannot be created.".yellow());
    }
}

pub fn reversal_command(config: &Config, cmd: ReversalCommands) -> Result<()> {
    match cmd.command {
        ReversalSubcommands::Plan(args) => {
            let (dir, writing_systems) = resolve(config, &args)?;
            let plan = reversal::plan(&dir, &writing_systems)?;
            if plan.is_noop() {
                println!("{}", "Reversal configurations are up to date.".dimmed());
            }
            print_plan(&plan);
            Ok(())
        }
        ReversalSubcommands::Sync(args) => {
            let (dir, writing_systems) = resolve(config, &args)?;
            let plan = reversal::plan(&dir, &writing_systems)?;
            let report = reversal::apply(&plan)?;
            println!(
                "{} {} created, {} removed",
                "✓".bright_green().bold(),
                report.created.len(),
                report.removed.len()
            );
            Ok(())
        }
    }
}
