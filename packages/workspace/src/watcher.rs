use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use emojiart_common::file_name_to_key;

use crate::WorkspaceResult;

/// A palette store's slot changed on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChanged {
    /// Key-value key of the changed slot, e.g. `PaletteStore: Main`
    pub key: String,
}

/// Watches a palette directory and reports which store slots changed
pub struct StoreWatcher {
    watcher: Option<RecommendedWatcher>,
    dir: PathBuf,
}

impl StoreWatcher {
    /// Start watching `dir`. Changes arrive on the returned receiver until
    /// [`StoreWatcher::stop`] is called.
    pub fn start(dir: impl Into<PathBuf>) -> WorkspaceResult<(Self, UnboundedReceiver<StoreChanged>)> {
        let dir = dir.into();
        let (tx, rx) = unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for key in changed_keys(&event) {
                        let _ = tx.send(StoreChanged { key });
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Palette watcher error"),
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!("Watching palettes in {}", dir.display());

        Ok((
            Self {
                watcher: Some(watcher),
                dir,
            },
            rx,
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }

    /// Stop watching. The receiver drains what was already sent, then closes.
    pub fn stop(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            if let Err(e) = watcher.unwatch(&self.dir) {
                tracing::debug!(error = %e, "Failed to unwatch palette directory");
            }
            tracing::info!("Stopped watching palettes in {}", self.dir.display());
        }
    }
}

/// Store keys named by the files an event touched
fn changed_keys(event: &Event) -> Vec<String> {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return Vec::new();
    }

    let mut keys: Vec<String> = event
        .paths
        .iter()
        .filter_map(|path| path.file_name()?.to_str())
        .filter_map(file_name_to_key)
        .collect();
    keys.dedup();
    keys
}
