//! The named palette stores of an application.

use std::sync::Arc;

use emojiart_common::KeyValueStore;

use crate::store::PaletteStore;

/// Ordered set of palette stores sharing one backing, with one store selected
#[derive(Debug)]
pub struct PaletteStoreSet {
    stores: Vec<PaletteStore>,
    selected: usize,
}

impl PaletteStoreSet {
    /// Open one store per name, in order. Repeated names are opened once.
    /// With no names a single store called "Main" is opened.
    pub fn open<S: AsRef<str>>(names: &[S], backing: Arc<dyn KeyValueStore>) -> Self {
        let mut stores: Vec<PaletteStore> = Vec::with_capacity(names.len().max(1));
        for name in names {
            let name = name.as_ref();
            if stores.iter().any(|s| s.name() == name) {
                continue;
            }
            stores.push(PaletteStore::open(name, backing.clone()));
        }
        if stores.is_empty() {
            stores.push(PaletteStore::open("Main", backing));
        }

        tracing::info!(count = stores.len(), "Opened palette stores");
        Self {
            stores,
            selected: 0,
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.stores.iter().map(|s| s.name()).collect()
    }

    pub fn stores(&self) -> &[PaletteStore] {
        &self.stores
    }

    pub fn store(&self, name: &str) -> Option<&PaletteStore> {
        self.stores.iter().find(|s| s.name() == name)
    }

    pub fn store_mut(&mut self, name: &str) -> Option<&mut PaletteStore> {
        self.stores.iter_mut().find(|s| s.name() == name)
    }

    /// The store currently shown
    pub fn selected(&self) -> &PaletteStore {
        &self.stores[self.selected]
    }

    pub fn selected_mut(&mut self) -> &mut PaletteStore {
        &mut self.stores[self.selected]
    }

    /// Select the store called `name`. Returns false if there is none.
    pub fn select(&mut self, name: &str) -> bool {
        match self.stores.iter().position(|s| s.name() == name) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Refresh the store persisted under `key` after it changed on disk.
    /// Returns the store's name, or `None` if no store uses that key.
    pub fn handle_external_change(&mut self, key: &str) -> Option<&str> {
        let store = self.stores.iter_mut().find(|s| s.key() == key)?;
        tracing::debug!(store = %store.name(), "Palette store changed externally");
        store.refresh();
        Some(store.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PaletteEvent;
    use emojiart_common::MemoryKeyValueStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn open(names: &[&str]) -> PaletteStoreSet {
        PaletteStoreSet::open(names, Arc::new(MemoryKeyValueStore::new()))
    }

    #[test]
    fn test_opens_stores_in_order() {
        let set = open(&["Main", "Alternate", "Main", "Special"]);
        assert_eq!(set.names(), vec!["Main", "Alternate", "Special"]);
        assert_eq!(set.selected().name(), "Main");
    }

    #[test]
    fn test_no_names_opens_main() {
        let set = open(&[]);
        assert_eq!(set.names(), vec!["Main"]);
    }

    #[test]
    fn test_select_by_name() {
        let mut set = open(&["Main", "Alternate"]);
        assert!(set.select("Alternate"));
        assert_eq!(set.selected().name(), "Alternate");
        assert!(!set.select("Missing"));
        assert_eq!(set.selected().name(), "Alternate");
    }

    #[test]
    fn test_stores_share_backing_but_not_slots() {
        let mut set = open(&["Main", "Alternate"]);
        set.store_mut("Main").unwrap().append_new("Extra", "🐶");

        let main = set.store("Main").unwrap().len();
        let alternate = set.store("Alternate").unwrap().len();
        assert_eq!(main, alternate + 1);
    }

    #[test]
    fn test_external_change_refreshes_matching_store() {
        let mut set = open(&["Main", "Alternate"]);
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let _sub = set.store_mut("Alternate").unwrap().subscribe(move |event| {
            if *event == PaletteEvent::Changed {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert_eq!(
            set.handle_external_change("PaletteStore: Alternate"),
            Some("Alternate")
        );
        assert_eq!(set.handle_external_change("PaletteStore: Other"), None);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
