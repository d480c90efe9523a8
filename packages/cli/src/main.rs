mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, background, export, init, move_sticker, palettes, remove, resize, show, AddArgs,
    BackgroundArgs, InitArgs, PalettesArgs,
};

/// Emoji Art - drop emojis on a canvas
#[derive(Parser, Debug)]
#[command(name = "emojiart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the document, palettes and config
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default emojiart.config.json
    Init(InitArgs),

    /// Print the document
    Show,

    /// Drop an emoji on the canvas
    Add(AddArgs),

    /// Move an emoji by an offset
    Move {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        #[arg(allow_negative_numbers = true)]
        dx: i32,
        #[arg(allow_negative_numbers = true)]
        dy: i32,
    },

    /// Change an emoji's size
    Resize {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        size: i32,
    },

    /// Remove an emoji
    Remove {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Write a copy of the document to another file
    Export { path: PathBuf },

    /// Set or clear the background image
    Background(BackgroundArgs),

    /// Browse and edit palettes
    Palettes(PalettesArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dir = cli.data_dir.as_path();
    tracing::debug!("Using data directory {}", dir.display());

    let result = match cli.command {
        Command::Init(args) => init(args, dir),
        Command::Show => show(dir).await,
        Command::Add(args) => add(args, dir),
        Command::Move { id, dx, dy } => move_sticker(id, dx, dy, dir),
        Command::Resize { id, size } => resize(id, size, dir),
        Command::Remove { id } => remove(id, dir),
        Command::Export { path } => export(&path, dir),
        Command::Background(args) => background(args, dir).await,
        Command::Palettes(args) => palettes(args, dir),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
