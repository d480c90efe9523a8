//! One data directory: the autosaved document plus its palette stores.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use emojiart_common::{DirectoryKeyValueStore, RealFileSystem};
use emojiart_editor::{Collaborators, DocumentSession, SessionOptions};
use emojiart_palettes::PaletteStoreSet;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::Config;
use crate::decode::RasterDecoder;
use crate::fetch::LocatorFetcher;
use crate::watcher::{StoreChanged, StoreWatcher};
use crate::WorkspaceResult;

/// Everything the application works on, opened from a data directory
///
/// Opening a document that has a background starts fetching it, so this must
/// be created inside a Tokio runtime.
pub struct Workspace {
    root: PathBuf,
    config: Config,
    session: DocumentSession,
    palettes: PaletteStoreSet,
}

impl Workspace {
    /// Open the workspace in `data_dir` with the on-disk and network collaborators
    pub fn open(data_dir: impl Into<PathBuf>) -> WorkspaceResult<Self> {
        let root = data_dir.into();
        std::fs::create_dir_all(&root)?;
        let config = Config::load(&root)?;

        let collaborators = Collaborators {
            storage: Arc::new(RealFileSystem),
            fetcher: Arc::new(LocatorFetcher::new()?),
            decoder: Arc::new(RasterDecoder),
        };
        Self::with_collaborators(root, config, collaborators)
    }

    /// Open with explicit collaborators for the document session
    pub fn with_collaborators(
        root: PathBuf,
        config: Config,
        collaborators: Collaborators,
    ) -> WorkspaceResult<Self> {
        tracing::info!("Opening workspace in {}", root.display());

        let backing = Arc::new(DirectoryKeyValueStore::open(config.palette_path(&root))?);
        let palettes = PaletteStoreSet::open(&config.palette_stores, backing);

        let options = SessionOptions {
            autosave_path: config.autosave_path(&root),
            undo_levels: config.undo_levels,
        };
        let session = DocumentSession::open(options, collaborators);

        Ok(Self {
            root,
            config,
            session,
            palettes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &DocumentSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DocumentSession {
        &mut self.session
    }

    pub fn palettes(&self) -> &PaletteStoreSet {
        &self.palettes
    }

    pub fn palettes_mut(&mut self) -> &mut PaletteStoreSet {
        &mut self.palettes
    }

    /// Write the document to `path` as well as the autosave file
    pub fn save_as(&self, path: &Path) -> WorkspaceResult<()> {
        self.session.save_to(path)?;
        Ok(())
    }

    pub fn palette_dir(&self) -> PathBuf {
        self.config.palette_path(&self.root)
    }

    /// Start reporting palette files changed by other processes
    pub fn watch_palettes(&self) -> WorkspaceResult<(StoreWatcher, UnboundedReceiver<StoreChanged>)> {
        StoreWatcher::start(self.palette_dir())
    }

    /// Refresh the store named by a watcher notification
    pub fn apply_store_change(&mut self, change: &StoreChanged) -> Option<&str> {
        self.palettes.handle_external_change(&change.key)
    }
}
