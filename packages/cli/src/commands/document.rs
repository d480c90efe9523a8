use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use emojiart_editor::{BackgroundState, Position, Sticker, StickerId};
use emojiart_workspace::Workspace;
use std::path::Path;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// The emoji to drop
    pub emoji: String,

    /// Horizontal offset from the canvas centre
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub x: i32,

    /// Vertical offset from the canvas centre (up is positive)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub y: i32,

    /// Size in points (defaults to the configured sticker size)
    #[arg(long)]
    pub size: Option<i32>,
}

#[derive(Debug, Args)]
pub struct BackgroundArgs {
    /// File path or URL of the image
    #[arg(required_unless_present = "clear", conflicts_with = "clear")]
    pub locator: Option<String>,

    /// Remove the background
    #[arg(long)]
    pub clear: bool,
}

pub async fn show(dir: &Path) -> Result<()> {
    let mut workspace = Workspace::open(dir)?;
    let session = workspace.session_mut();
    let state = session.settle_background().await.clone();
    let document = session.document();

    match document.background() {
        Some(locator) => println!("{} {} {}", "Background:".bold(), locator, describe(&state)),
        None => println!("{} {}", "Background:".bold(), "none".dimmed()),
    }

    if document.stickers().is_empty() {
        println!("{}", "No emojis yet".dimmed());
    } else {
        println!("{}", "Emojis:".bold());
        for sticker in document.stickers() {
            print_sticker(sticker);
        }
    }
    Ok(())
}

pub fn add(args: AddArgs, dir: &Path) -> Result<()> {
    let mut workspace = Workspace::open(dir)?;
    let size = args.size.unwrap_or(workspace.config().default_sticker_size);

    let id = workspace
        .session_mut()
        .add_sticker(args.emoji.clone(), Position::new(args.x, args.y), size);

    println!("  {} Added {} as #{}", "✓".green(), args.emoji, id);
    Ok(())
}

pub fn move_sticker(id: i64, dx: i32, dy: i32, dir: &Path) -> Result<()> {
    let mut workspace = Workspace::open(dir)?;
    let id = StickerId(id);
    workspace.session_mut().move_sticker(id, Position::new(dx, dy))?;

    report_sticker(&workspace, id);
    Ok(())
}

pub fn resize(id: i64, size: i32, dir: &Path) -> Result<()> {
    let mut workspace = Workspace::open(dir)?;
    let id = StickerId(id);
    workspace.session_mut().resize_sticker(id, size)?;

    report_sticker(&workspace, id);
    Ok(())
}

pub fn remove(id: i64, dir: &Path) -> Result<()> {
    let mut workspace = Workspace::open(dir)?;
    workspace.session_mut().remove_sticker(StickerId(id))?;

    println!("  {} Removed #{}", "✓".green(), id);
    Ok(())
}

pub fn export(path: &Path, dir: &Path) -> Result<()> {
    let workspace = Workspace::open(dir)?;
    workspace.save_as(path)?;

    println!("  {} Saved {}", "✓".green(), path.display());
    Ok(())
}

pub async fn background(args: BackgroundArgs, dir: &Path) -> Result<()> {
    let mut workspace = Workspace::open(dir)?;

    let locator = if args.clear {
        None
    } else {
        args.locator.map(absolute_if_local)
    };

    let session = workspace.session_mut();
    session.set_background(locator);

    match session.settle_background().await {
        BackgroundState::Idle => println!("  {} Background cleared", "✓".green()),
        BackgroundState::Found(image) => println!(
            "  {} Background set ({}×{})",
            "✓".green(),
            image.width(),
            image.height()
        ),
        BackgroundState::Failed(reason) => bail!("{reason}"),
        BackgroundState::Fetching(locator) => bail!("Still fetching {locator}"),
    }
    Ok(())
}

/// Local files are stored by absolute path so later runs find them from any directory
fn absolute_if_local(locator: String) -> String {
    match std::fs::canonicalize(&locator) {
        Ok(path) => path.to_string_lossy().into_owned(),
        Err(_) => locator,
    }
}

fn describe(state: &BackgroundState) -> String {
    match state {
        BackgroundState::Idle => "(not loaded)".dimmed().to_string(),
        BackgroundState::Fetching(_) => "(loading)".yellow().to_string(),
        BackgroundState::Found(image) => format!("({}×{})", image.width(), image.height())
            .green()
            .to_string(),
        BackgroundState::Failed(reason) => format!("({reason})").red().to_string(),
    }
}

fn print_sticker(sticker: &Sticker) {
    let position = sticker.position();
    println!(
        "  {} {}  at ({}, {})  size {}",
        format!("#{}", sticker.id()).bright_white(),
        sticker.content(),
        position.x,
        position.y,
        sticker.size()
    );
}

fn report_sticker(workspace: &Workspace, id: StickerId) {
    if let Some(sticker) = workspace.session().document().sticker(id) {
        print!("  {} ", "✓".green());
        print_sticker(sticker);
    }
}
