//! # Emoji Art Palettes
//!
//! Named, user-editable emoji palettes, persisted per store in a key-value
//! slot.
//!
//! ```rust,ignore
//! use emojiart_palettes::PaletteStoreSet;
//!
//! let mut stores = PaletteStoreSet::open(&["Main", "Alternate"], backing);
//! let main = stores.selected_mut();
//! main.advance_cursor(1);
//! main.insert_new("Favourites", "🐶🐱", None);
//! ```

pub mod builtins;
pub mod emojis;
mod manager;
mod palette;
mod store;

pub use manager::PaletteStoreSet;
pub use palette::{Palette, PaletteId};
pub use store::{normalize_index, store_key, PaletteEvent, PaletteStore, KEY_PREFIX};

pub use emojiart_common::Subscription;
