use anyhow::Result;
use colored::*;

use lexicon_config::ConfigModel;
use lexicon_config::config::Config;
use lexicon_config::model::resolve_shared_ancestry;

use super::options::NodeArgs;

/// Print the other locations that display the same shared content
pub fn shared_command(config: &Config, args: NodeArgs) -> Result<()> {
    let model = ConfigModel::load(&args.model)?;
    let separator = &config.settings.path_separator;
    let node = model.find_by_path(&args.path, separator)?;
    let paths = resolve_shared_ancestry(&model, node, separator);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    if paths.is_empty() {
        println!("'{}' is not shared.", args.path);
        return Ok(());
    }

    println!("'{}' is also displayed at:", args.path.bold());
    for path in &paths {
        println!("  {}", path.cyan());
    }
    Ok(())
}
