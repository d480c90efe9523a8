use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use emojiart_palettes::emojis::{add_emojis, remove_emoji};
use emojiart_palettes::{Palette, PaletteStore};
use emojiart_workspace::Workspace;
use std::path::Path;

#[derive(Debug, Args)]
pub struct PalettesArgs {
    /// Palette store to work on (defaults to the first configured store)
    #[arg(long, global = true)]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: PaletteCommand,
}

#[derive(Debug, Subcommand)]
pub enum PaletteCommand {
    /// List the palettes of the store
    List,

    /// Show one palette; negative indices count from the end
    Show {
        #[arg(default_value_t = 0, allow_negative_numbers = true)]
        index: isize,
    },

    /// Add a palette
    Add {
        name: String,
        emojis: String,

        /// Insert at this index instead of appending
        #[arg(long, allow_negative_numbers = true)]
        at: Option<isize>,
    },

    /// Rename a palette
    Rename { index: usize, name: String },

    /// Add emojis to the front of a palette
    AddEmojis { index: usize, emojis: String },

    /// Remove one emoji from a palette
    RemoveEmoji { index: usize, emoji: String },

    /// Move a palette so it sits before the one at `to`
    Move { from: usize, to: usize },

    /// Delete a palette (the last one is kept)
    Remove { index: usize },
}

pub fn palettes(args: PalettesArgs, dir: &Path) -> Result<()> {
    let mut workspace = Workspace::open(dir)?;
    let stores = workspace.palettes_mut();
    if let Some(name) = &args.store {
        if !stores.select(name) {
            bail!(
                "No palette store named {name:?} (configured: {})",
                stores.names().join(", ")
            );
        }
    }
    let store = stores.selected_mut();

    match args.command {
        PaletteCommand::List => list(store),
        PaletteCommand::Show { index } => {
            store.set_cursor_index(index);
            let palette = store
                .cursor_palette()
                .ok_or_else(|| anyhow!("Store {} has no palettes", store.name()))?;
            print_palette(store.cursor_index(), &palette);
        }
        PaletteCommand::Add { name, emojis, at } => {
            let emojis = add_emojis("", &emojis);
            let palette = Palette::new(name, emojis);
            let written = match at {
                Some(at) => store.insert(palette, Some(at)),
                None => store.append(palette),
            };
            confirm(written, "Added palette")?;
        }
        PaletteCommand::Rename { index, name } => {
            let mut palette = palette_at(store, index)?;
            palette.name = name;
            confirm(store.update(palette), "Renamed palette")?;
        }
        PaletteCommand::AddEmojis { index, emojis } => {
            let mut palette = palette_at(store, index)?;
            palette.emojis = add_emojis(&palette.emojis, &emojis);
            confirm(store.update(palette), "Updated palette")?;
        }
        PaletteCommand::RemoveEmoji { index, emoji } => {
            let mut palette = palette_at(store, index)?;
            palette.emojis = remove_emoji(&palette.emojis, &emoji);
            confirm(store.update(palette), "Updated palette")?;
        }
        PaletteCommand::Move { from, to } => {
            palette_at(store, from)?;
            confirm(store.move_palettes(&[from], to), "Moved palette")?;
        }
        PaletteCommand::Remove { index } => {
            palette_at(store, index)?;
            if store.len() == 1 {
                bail!("Cannot remove the last palette of {}", store.name());
            }
            confirm(store.remove_at(index), "Removed palette")?;
        }
    }
    Ok(())
}

fn list(store: &PaletteStore) {
    println!("{} {}", "Store:".bold(), store.name());
    for (index, palette) in store.palettes().iter().enumerate() {
        print_palette(index, palette);
    }
}

fn palette_at(store: &PaletteStore, index: usize) -> Result<Palette> {
    store
        .palettes()
        .into_iter()
        .nth(index)
        .ok_or_else(|| anyhow!("No palette at index {index} in {}", store.name()))
}

fn print_palette(index: usize, palette: &Palette) {
    println!(
        "  {} {}  {}",
        format!("{index:>2}").bright_white(),
        palette.name.bold(),
        palette.emojis
    );
}

fn confirm(written: bool, message: &str) -> Result<()> {
    if !written {
        bail!("Palette store was not written; see the log for details");
    }
    println!("  {} {}", "✓".green(), message);
    Ok(())
}
