//! # Palette Store
//!
//! An ordered list of palettes kept in one key-value slot, plus a cursor
//! naming the palette currently shown.
//!
//! ## Design
//!
//! - The slot is the source of truth: every read decodes it, every write
//!   replaces it (write-through, no caching)
//! - Absent or corrupt data reads as an empty list
//! - Writing an empty list is ignored, so a failed read can never be written
//!   back as total data loss
//! - A store that reads empty when opened is seeded with the builtins
//! - Insert and append never create a second palette with an existing id;
//!   they do not repair duplicates already present
//! - The cursor wraps in both directions
//!
//! Two stores with the same name are the same store: equality and hashing
//! only look at the name.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use emojiart_common::{KeyValueStore, Observers, Subscription};

use crate::builtins::builtins;
use crate::palette::{Palette, PaletteId};

/// Prefix of the key-value slot holding a store's palettes
pub const KEY_PREFIX: &str = "PaletteStore: ";

/// Persistence key for the store called `name`
pub fn store_key(name: &str) -> String {
    format!("{KEY_PREFIX}{name}")
}

/// Wrap `index` into `[0, count)`. Negative indices count back from the end.
///
/// `count` must be non-zero; 0 is returned for an empty collection.
pub fn normalize_index(index: isize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    index.rem_euclid(count as isize) as usize
}

/// Notifications published to store observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteEvent {
    /// The palette list was written, or changed out of band
    Changed,

    /// The cursor moved to this index
    CursorMoved(usize),

    /// A write was rejected by the backing store; nothing changed
    SaveFailed(String),
}

/// Named, persisted collection of palettes
pub struct PaletteStore {
    name: String,
    backing: Arc<dyn KeyValueStore>,
    cursor: usize,
    observers: Observers<PaletteEvent>,
}

impl PaletteStore {
    /// Open the store called `name`, seeding it with the builtins if it is empty
    pub fn open(name: impl Into<String>, backing: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self {
            name: name.into(),
            backing,
            cursor: 0,
            observers: Observers::new(),
        };

        if store.palettes().is_empty() {
            tracing::info!(store = %store.name, "Seeding palette store with builtins");
            store.set_palettes(builtins());
        }
        store
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key of the slot this store persists to
    pub fn key(&self) -> String {
        store_key(&self.name)
    }

    // ------------------------------------------------------------------
    // Reading and writing the slot
    // ------------------------------------------------------------------

    /// Current palettes, decoded from the slot
    pub fn palettes(&self) -> Vec<Palette> {
        let key = self.key();
        let Some(bytes) = self.backing.get(&key) else {
            return Vec::new();
        };
        match serde_json::from_slice(&bytes) {
            Ok(palettes) => palettes,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring corrupt palette data");
                Vec::new()
            }
        }
    }

    /// Replace the palettes. Empty lists are ignored. Returns whether the slot was written.
    pub fn set_palettes(&mut self, palettes: Vec<Palette>) -> bool {
        if palettes.is_empty() {
            tracing::debug!(store = %self.name, "Refusing to store an empty palette list");
            return false;
        }

        let key = self.key();
        let written = serde_json::to_vec(&palettes)
            .map_err(emojiart_common::CommonError::from)
            .and_then(|bytes| self.backing.set(&key, &bytes));

        match written {
            Ok(()) => {
                tracing::debug!(key = %key, count = palettes.len(), "Stored palettes");
                self.observers.notify(&PaletteEvent::Changed);
                true
            }
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to store palettes");
                self.observers.notify(&PaletteEvent::SaveFailed(e.to_string()));
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.palettes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    /// Index of the palette currently shown, always within the current list
    pub fn cursor_index(&self) -> usize {
        normalize_index(self.cursor as isize, self.len())
    }

    /// Move the cursor; out of range indices wrap around
    pub fn set_cursor_index(&mut self, index: isize) {
        self.cursor = normalize_index(index, self.len());
        self.observers.notify(&PaletteEvent::CursorMoved(self.cursor));
    }

    /// Move the cursor by `delta`, wrapping at either end
    pub fn advance_cursor(&mut self, delta: isize) {
        let current = self.cursor_index() as isize;
        self.set_cursor_index(current + delta);
    }

    /// Point the cursor at the palette with `id`, or at the first palette if it is gone
    pub fn select(&mut self, id: PaletteId) {
        let index = self
            .palettes()
            .iter()
            .position(|p| p.id == id)
            .unwrap_or(0);
        self.set_cursor_index(index as isize);
    }

    /// Palette under the cursor
    pub fn cursor_palette(&self) -> Option<Palette> {
        let mut palettes = self.palettes();
        if palettes.is_empty() {
            return None;
        }
        let index = normalize_index(self.cursor as isize, palettes.len());
        Some(palettes.swap_remove(index))
    }

    // ------------------------------------------------------------------
    // Adding palettes
    // ------------------------------------------------------------------

    /// Insert at `at` (the cursor by default). A palette with the same id
    /// already in the list is moved to that position and replaced.
    pub fn insert(&mut self, palette: Palette, at: Option<isize>) -> bool {
        let mut palettes = self.palettes();
        let requested = at.unwrap_or(self.cursor as isize);
        let target = normalize_index(requested, palettes.len());

        if let Some(existing) = palettes.iter().position(|p| p.same_identity(&palette)) {
            palettes.remove(existing);
        }
        let target = target.min(palettes.len());
        palettes.insert(target, palette);

        self.set_palettes(palettes)
    }

    /// Insert a new palette built from `name` and `emojis`
    pub fn insert_new(&mut self, name: &str, emojis: &str, at: Option<isize>) -> PaletteId {
        let palette = Palette::new(name, emojis);
        let id = palette.id;
        self.insert(palette, at);
        id
    }

    /// Add at the end. A palette with the same id already in the list is removed first.
    pub fn append(&mut self, palette: Palette) -> bool {
        let mut palettes = self.palettes();

        if let Some(existing) = palettes.iter().position(|p| p.same_identity(&palette)) {
            palettes.remove(existing);
        }
        palettes.push(palette);

        self.set_palettes(palettes)
    }

    /// Append a new palette built from `name` and `emojis`
    pub fn append_new(&mut self, name: &str, emojis: &str) -> PaletteId {
        let palette = Palette::new(name, emojis);
        let id = palette.id;
        self.append(palette);
        id
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Replace the palette with the same id in place. Returns false if it is not in the list.
    pub fn update(&mut self, palette: Palette) -> bool {
        let mut palettes = self.palettes();
        match palettes.iter_mut().find(|p| p.same_identity(&palette)) {
            Some(slot) => {
                *slot = palette;
                self.set_palettes(palettes)
            }
            None => false,
        }
    }

    /// Remove the palette at `index`. Removing the last remaining palette is refused.
    pub fn remove_at(&mut self, index: usize) -> bool {
        self.remove_at_offsets(&[index])
    }

    /// Remove the palette under the cursor
    pub fn remove_at_cursor(&mut self) -> bool {
        self.remove_at(self.cursor_index())
    }

    /// Remove the palettes at `offsets`; out of range offsets are ignored
    pub fn remove_at_offsets(&mut self, offsets: &[usize]) -> bool {
        let mut palettes = self.palettes();
        let mut offsets: Vec<usize> = offsets
            .iter()
            .copied()
            .filter(|i| *i < palettes.len())
            .collect();
        if offsets.is_empty() {
            return false;
        }
        offsets.sort_unstable();
        offsets.dedup();

        for index in offsets.into_iter().rev() {
            palettes.remove(index);
        }
        self.set_palettes(palettes)
    }

    /// Move the palettes at `offsets` so they sit, in their current relative
    /// order, before the palette that was at `to_offset` (or at the end when
    /// `to_offset` is the length of the list)
    pub fn move_palettes(&mut self, offsets: &[usize], to_offset: usize) -> bool {
        let mut palettes = self.palettes();
        let to_offset = to_offset.min(palettes.len());
        let mut offsets: Vec<usize> = offsets
            .iter()
            .copied()
            .filter(|i| *i < palettes.len())
            .collect();
        if offsets.is_empty() {
            return false;
        }
        offsets.sort_unstable();
        offsets.dedup();

        let shift = offsets.iter().filter(|i| **i < to_offset).count();
        let mut moving = Vec::with_capacity(offsets.len());
        for index in offsets.into_iter().rev() {
            moving.push(palettes.remove(index));
        }
        moving.reverse();

        let destination = to_offset - shift;
        palettes.splice(destination..destination, moving);
        self.set_palettes(palettes)
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&PaletteEvent) + Send + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.observers.unsubscribe(subscription)
    }

    /// Tell observers the slot changed out of band (another process wrote it)
    pub fn refresh(&mut self) {
        self.cursor = self.cursor_index();
        self.observers.notify(&PaletteEvent::Changed);
    }
}

impl PartialEq for PaletteStore {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PaletteStore {}

impl Hash for PaletteStore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for PaletteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaletteStore")
            .field("name", &self.name)
            .field("cursor", &self.cursor)
            .field("observers", &self.observers)
            .finish()
    }
}
