//! Row display and editing commands

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::*;
use log::info;
use std::path::PathBuf;

use lexicon_config::config::Config;
use lexicon_config::options::Catalog;
use lexicon_config::{ConfigModel, DetailsController, Direction, DisplayRow, NodeId};

#[derive(Args)]
pub struct NodeArgs {
    /// Model file describing the configuration tree
    #[arg(short, long)]
    pub model: PathBuf,
    /// Catalog file (defaults to the configured catalog)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,
    /// Label path of the node, e.g. "Main Entry > Senses > Gloss"
    pub path: String,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct OptionArgs {
    #[command(flatten)]
    pub node: NodeArgs,
    /// Option id (writing system tag or list item id)
    pub id: String,
}

#[derive(Args)]
pub struct MoveArgs {
    #[command(flatten)]
    pub node: NodeArgs,
    /// Option id (writing system tag or list item id)
    pub id: String,
    /// Direction to move the option
    #[arg(value_enum)]
    pub direction: DirectionArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Down => Direction::Down,
        }
    }
}

/// Everything a command needs to work on one node
struct Session {
    model: ConfigModel,
    node: NodeId,
    controller: DetailsController,
}

fn open_session(config: &Config, args: &NodeArgs) -> Result<Session> {
    let catalog_path = args
        .catalog
        .clone()
        .or_else(|| config.catalog.clone())
        .context("No catalog given. Pass --catalog or run 'lexicon-config settings set catalog <file>'")?;
    let catalog = Catalog::load(&catalog_path)?;
    let model = ConfigModel::load(&args.model)?;

    let separator = &config.settings.path_separator;
    let node = model.find_by_path(&args.path, separator)?;
    let controller = DetailsController::open(&model, node, &catalog, separator)
        .with_context(|| format!("Failed to open options for '{}'", args.path))?;

    Ok(Session {
        model,
        node,
        controller,
    })
}

fn print_rows(rows: &[DisplayRow]) {
    for row in rows {
        let mark = if row.checked {
            "[x]".bright_green().bold()
        } else {
            "[ ]".dimmed()
        };
        let label = if row.is_default() {
            row.label.italic()
        } else {
            row.label.normal()
        };
        println!("{} {} {}", mark, label, format!("({})", row.id).dimmed());
    }
}

fn print_session(session: &Session, json: bool) -> Result<()> {
    let controller = &session.controller;
    if json {
        let output = serde_json::json!({
            "node": session.model.node(session.node).label,
            "rows": controller.rows(),
            "tooltip": controller.tooltip(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !controller.has_list() {
        println!("{}", "This node has no list options.".yellow());
    } else {
        print_rows(controller.rows());
    }
    if let Some(tooltip) = controller.tooltip() {
        println!("\n{}", tooltip.yellow());
    }
    Ok(())
}

fn commit_session(session: Session, args: &NodeArgs) -> Result<()> {
    let Session {
        mut model,
        node,
        controller,
    } = session;

    if controller.commit(&mut model) {
        model.save(&args.model)?;
        println!(
            "{} Saved options for '{}'",
            "✓".bright_green().bold(),
            model.node(node).label.bright_green().bold()
        );
    } else {
        println!("{}", "Nothing changed.".dimmed());
    }
    Ok(())
}

pub fn rows_command(config: &Config, args: NodeArgs) -> Result<()> {
    let session = open_session(config, &args)?;
    print_session(&session, args.json)
}

pub fn check_command(config: &Config, args: OptionArgs, checked: bool) -> Result<()> {
    info!("Setting '{}' checked={} on '{}'", args.id, checked, args.node.path);
    let mut session = open_session(config, &args.node)?;

    if !session.controller.set_checked(&args.id, checked)? && !checked {
        let still_checked = session
            .controller
            .rows()
            .iter()
            .any(|r| r.id == args.id && r.checked);
        if still_checked {
            println!("{}", "At least one option must stay checked.".yellow());
        }
    }

    print_session(&session, args.node.json)?;
    commit_session(session, &args.node)
}

pub fn move_command(config: &Config, args: MoveArgs) -> Result<()> {
    info!("Moving '{}' on '{}'", args.id, args.node.path);
    let mut session = open_session(config, &args.node)?;
    session.controller.reorder(&args.id, args.direction.into())?;

    print_session(&session, args.node.json)?;
    commit_session(session, &args.node)
}
