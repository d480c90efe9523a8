pub mod document;
pub mod init;
pub mod palettes;

pub use document::{add, background, export, move_sticker, remove, resize, show, AddArgs, BackgroundArgs};
pub use init::{init, InitArgs};
pub use palettes::{palettes, PalettesArgs};
