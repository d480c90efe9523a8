use anyhow::Result;
use clap::Args;
use colored::Colorize;
use emojiart_workspace::{Config, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Palette stores to create, in order
    #[arg(short, long, value_delimiter = ',')]
    pub stores: Vec<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, dir: &Path) -> Result<()> {
    let config_path = dir.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    fs::create_dir_all(dir)?;

    let mut config = Config::default();
    if !args.stores.is_empty() {
        config.palette_stores = args.stores;
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!("  Palette stores: {}", config.palette_stores.join(", "));
    Ok(())
}
