//! # Document Session
//!
//! Owns one [`Document`] for the lifetime of an editing session and is the
//! only way the UI mutates it. Every committed change goes through the same
//! steps, in order:
//!
//! 1. snapshot the prior document onto the undo stack
//! 2. apply the mutation
//! 3. write the document through to the autosave file
//! 4. start a background fetch if the background locator changed
//! 5. notify observers
//!
//! ## Background fetches
//!
//! Fetches run on Tokio tasks and report back over a channel. Their results
//! are only applied on the session's own context, by
//! [`DocumentSession::process_fetch_results`] or
//! [`DocumentSession::next_fetch_result`], and only if the document's
//! background is still the locator that was fetched. Superseded fetches are
//! not cancelled; their results are discarded on arrival.
//!
//! Mutations that change the background (and opening a document that has
//! one) spawn a task, so they must run inside a Tokio runtime.

use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use emojiart_common::{FileSystem, Observers, Subscription};
use tokio::sync::mpsc;

use crate::background::{fetch_background, BackgroundState, FetchOutcome, Fetcher, ImageDecoder};
use crate::document::{Document, Sticker, StickerId};
use crate::geometry::Position;
use crate::undo_stack::UndoStack;
use crate::{EditorError, Mutation, MutationResult};

/// File name used for the autosaved document
pub const DEFAULT_AUTOSAVE_FILE: &str = "Autosaved.emojiart";

/// External services a session talks to
#[derive(Clone)]
pub struct Collaborators {
    pub storage: Arc<dyn FileSystem>,
    pub fetcher: Arc<dyn Fetcher>,
    pub decoder: Arc<dyn ImageDecoder>,
}

/// Session settings
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Where every committed change is written
    pub autosave_path: PathBuf,

    /// Maximum undo levels (0 = unlimited)
    pub undo_levels: usize,
}

impl SessionOptions {
    pub fn new(autosave_path: impl Into<PathBuf>) -> Self {
        Self {
            autosave_path: autosave_path.into(),
            undo_levels: 100,
        }
    }
}

/// Notifications published to session observers
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    /// A mutation, undo or redo was committed
    Changed { version: u64 },

    /// The background fetch state moved
    BackgroundChanged(BackgroundState),

    /// Autosave failed; the in-memory document is unaffected
    SaveFailed(String),
}

/// What happened to a delivered fetch result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDelivery {
    /// The result became the background state
    Applied,

    /// The background changed since the fetch started; result dropped
    Stale,
}

/// Editing session for one document
pub struct DocumentSession {
    document: Document,
    background: BackgroundState,
    version: u64,
    undo: UndoStack,
    autosave_path: PathBuf,
    collaborators: Collaborators,
    fetch_tx: mpsc::UnboundedSender<FetchOutcome>,
    fetch_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    pending_fetches: usize,
    observers: Observers<DocumentEvent>,
}

impl DocumentSession {
    /// Open the autosaved document, or start empty if there is none or it is unreadable
    pub fn open(options: SessionOptions, collaborators: Collaborators) -> Self {
        let path = options.autosave_path.as_path();
        let document = match collaborators.storage.read_file(path) {
            Ok(Some(bytes)) => match Document::from_json(&bytes) {
                Ok(document) => {
                    tracing::info!(
                        path = %path.display(),
                        stickers = document.stickers().len(),
                        "Restored autosaved document"
                    );
                    document
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt autosave");
                    Document::new()
                }
            },
            Ok(None) => Document::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read autosave");
                Document::new()
            }
        };

        Self::with_document(document, options, collaborators)
    }

    /// Start a session on an existing document
    pub fn with_document(
        document: Document,
        options: SessionOptions,
        collaborators: Collaborators,
    ) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        let mut session = Self {
            document,
            background: BackgroundState::Idle,
            version: 0,
            undo: UndoStack::with_max_levels(options.undo_levels),
            autosave_path: options.autosave_path,
            collaborators,
            fetch_tx,
            fetch_rx,
            pending_fetches: 0,
            observers: Observers::new(),
        };

        if session.document.background().is_some() {
            session.background_did_change();
        }
        session
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn stickers(&self) -> &[Sticker] {
        self.document.stickers()
    }

    /// Current background fetch state
    pub fn background(&self) -> &BackgroundState {
        &self.background
    }

    /// Increments on every committed change
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn autosave_path(&self) -> &Path {
        &self.autosave_path
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.undo.redo_label()
    }

    /// Number of fetches started whose results have not been delivered yet
    pub fn pending_fetches(&self) -> usize {
        self.pending_fetches
    }

    // ------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------

    pub fn set_background(&mut self, locator: Option<String>) {
        match self.undoable("Set Background", |doc| {
            doc.set_background(locator);
            Ok::<_, Infallible>(())
        }) {
            Ok(()) => {}
            Err(e) => match e {},
        }
    }

    pub fn add_sticker(
        &mut self,
        content: impl Into<String>,
        position: Position,
        size: i32,
    ) -> StickerId {
        let content = content.into();
        match self.undoable("Add Emoji", |doc| {
            Ok::<_, Infallible>(doc.add_sticker(content, position, size))
        }) {
            Ok(id) => id,
            Err(e) => match e {},
        }
    }

    pub fn move_sticker(&mut self, id: StickerId, offset: Position) -> Result<(), EditorError> {
        self.apply(Mutation::MoveSticker { id, offset }).map(|_| ())
    }

    pub fn resize_sticker(&mut self, id: StickerId, size: i32) -> Result<(), EditorError> {
        self.apply(Mutation::ResizeSticker { id, size }).map(|_| ())
    }

    pub fn remove_sticker(&mut self, id: StickerId) -> Result<(), EditorError> {
        self.apply(Mutation::RemoveSticker { id }).map(|_| ())
    }

    /// Apply any mutation, labelled with its default name
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let label = mutation.label();
        self.perform(label, mutation)
    }

    /// Apply a mutation under a custom undo label
    pub fn perform(
        &mut self,
        label: &str,
        mutation: Mutation,
    ) -> Result<MutationResult, EditorError> {
        let created = self.undoable(label, |doc| mutation.apply(doc))?;
        Ok(MutationResult {
            version: self.version,
            created,
        })
    }

    /// Fold the following mutations into one undo step
    pub fn begin_group(&mut self, label: &str) {
        self.undo.begin_group(label, &self.document);
    }

    pub fn end_group(&mut self) {
        self.undo.end_group(&self.document);
    }

    /// Revert the last recorded change. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo.undo(self.document.clone()) {
            Some(previous) => {
                tracing::debug!(version = self.version, "Undo");
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Reapply the last undone change. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.undo.redo(self.document.clone()) {
            Some(next) => {
                tracing::debug!(version = self.version, "Redo");
                self.restore(next);
                true
            }
            None => false,
        }
    }

    /// Write the document to another file. Unlike autosave, failures are returned.
    pub fn save_to(&self, path: &Path) -> Result<(), EditorError> {
        let bytes = self.document.to_json()?;
        self.collaborators.storage.write_file(path, &bytes)?;
        tracing::info!(path = %path.display(), "Saved document");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&DocumentEvent) + Send + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.observers.unsubscribe(subscription)
    }

    // ------------------------------------------------------------------
    // Background fetch delivery
    // ------------------------------------------------------------------

    /// Apply every fetch result that has already arrived, without waiting
    pub fn process_fetch_results(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(outcome) = self.fetch_rx.try_recv() {
            self.deliver(outcome);
            delivered += 1;
        }
        delivered
    }

    /// Wait for the next fetch result and apply it.
    /// Returns `None` immediately when no fetch is outstanding.
    pub async fn next_fetch_result(&mut self) -> Option<FetchDelivery> {
        if self.pending_fetches == 0 {
            return None;
        }
        let outcome = self.fetch_rx.recv().await?;
        Some(self.deliver(outcome))
    }

    /// Wait until every outstanding fetch has reported back
    pub async fn settle_background(&mut self) -> &BackgroundState {
        while self.next_fetch_result().await.is_some() {}
        &self.background
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Run `mutate` with undo recording and commit the result
    fn undoable<T, E>(
        &mut self,
        label: &str,
        mutate: impl FnOnce(&mut Document) -> Result<T, E>,
    ) -> Result<T, E> {
        let before = self.document.clone();
        let value = mutate(&mut self.document)?;

        let background_changed = before.background() != self.document.background();
        if before != self.document {
            self.undo.record(label, before);
        }
        self.commit(background_changed);
        Ok(value)
    }

    fn restore(&mut self, snapshot: Document) {
        let background_changed = self.document.background() != snapshot.background();
        self.document.restore(snapshot);
        self.commit(background_changed);
    }

    fn commit(&mut self, background_changed: bool) {
        self.version += 1;
        self.autosave();
        if background_changed {
            self.background_did_change();
        }
        self.observers.notify(&DocumentEvent::Changed {
            version: self.version,
        });
    }

    fn autosave(&mut self) {
        let result = self.document.to_json().and_then(|bytes| {
            self.collaborators
                .storage
                .write_file(&self.autosave_path, &bytes)
                .map_err(EditorError::from)
        });

        match result {
            Ok(()) => {
                tracing::debug!(path = %self.autosave_path.display(), version = self.version, "Autosaved");
            }
            Err(e) => {
                tracing::error!(path = %self.autosave_path.display(), error = %e, "Autosave failed");
                self.observers
                    .notify(&DocumentEvent::SaveFailed(e.to_string()));
            }
        }
    }

    fn background_did_change(&mut self) {
        match self.document.background().map(str::to_owned) {
            Some(locator) => {
                self.set_background_state(BackgroundState::Fetching(locator.clone()));
                self.start_fetch(locator);
            }
            None => self.set_background_state(BackgroundState::Idle),
        }
    }

    fn start_fetch(&mut self, locator: String) {
        tracing::info!(locator = %locator, "Fetching background");
        self.pending_fetches += 1;

        let fetcher = self.collaborators.fetcher.clone();
        let decoder = self.collaborators.decoder.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let outcome = fetch_background(fetcher, decoder, locator).await;
            // The session may be gone; nobody is left to care.
            let _ = tx.send(outcome);
        });
    }

    fn deliver(&mut self, outcome: FetchOutcome) -> FetchDelivery {
        self.pending_fetches = self.pending_fetches.saturating_sub(1);

        if self.document.background() != Some(outcome.locator.as_str()) {
            tracing::debug!(locator = %outcome.locator, "Discarding stale background fetch");
            return FetchDelivery::Stale;
        }

        let state = match outcome.result {
            Ok(image) => {
                tracing::info!(
                    locator = %outcome.locator,
                    width = image.width(),
                    height = image.height(),
                    "Background ready"
                );
                BackgroundState::Found(image)
            }
            Err(e) => {
                tracing::warn!(locator = %outcome.locator, error = %e, "Background fetch failed");
                BackgroundState::Failed(format!("Couldn't set background: {e}"))
            }
        };
        self.set_background_state(state);
        FetchDelivery::Applied
    }

    fn set_background_state(&mut self, state: BackgroundState) {
        self.background = state;
        self.observers
            .notify(&DocumentEvent::BackgroundChanged(self.background.clone()));
    }
}

impl std::fmt::Debug for DocumentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSession")
            .field("document", &self.document)
            .field("background", &self.background)
            .field("version", &self.version)
            .field("autosave_path", &self.autosave_path)
            .field("pending_fetches", &self.pending_fetches)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryFetcher, MockImageDecoder};
    use crate::MutationError;
    use emojiart_common::MockFileSystem;
    use std::sync::Mutex;

    fn session_with(storage: Arc<MockFileSystem>) -> DocumentSession {
        let collaborators = Collaborators {
            storage,
            fetcher: Arc::new(MemoryFetcher::new()),
            decoder: Arc::new(MockImageDecoder),
        };
        DocumentSession::open(SessionOptions::new("doc.emojiart"), collaborators)
    }

    #[test]
    fn test_open_without_autosave_is_empty() {
        let session = session_with(Arc::new(MockFileSystem::new()));
        assert!(session.document().is_empty());
        assert_eq!(session.version(), 0);
        assert_eq!(*session.background(), BackgroundState::Idle);
    }

    #[test]
    fn test_open_corrupt_autosave_is_empty() {
        let storage = Arc::new(MockFileSystem::new());
        storage.add_file("doc.emojiart", b"{ not json".to_vec());

        let session = session_with(storage);
        assert!(session.document().is_empty());
    }

    #[test]
    fn test_mutation_writes_through() {
        let storage = Arc::new(MockFileSystem::new());
        let mut session = session_with(storage.clone());

        session.add_sticker("🎉", Position::new(10, -20), 40);

        let saved = storage.contents(Path::new("doc.emojiart")).unwrap();
        assert_eq!(Document::from_json(&saved).unwrap(), *session.document());
    }

    #[test]
    fn test_failed_autosave_keeps_mutation_and_reports() {
        let storage = Arc::new(MockFileSystem::new());
        storage.set_fail_writes(true);
        let mut session = session_with(storage);

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let _sub = session.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

        let id = session.add_sticker("🎉", Position::ZERO, 40);

        assert!(session.document().sticker(id).is_some());
        let events = events.lock().unwrap();
        assert!(matches!(events[0], DocumentEvent::SaveFailed(_)));
        assert_eq!(events[1], DocumentEvent::Changed { version: 1 });
    }

    #[test]
    fn test_unknown_sticker_is_reported_and_not_recorded() {
        let mut session = session_with(Arc::new(MockFileSystem::new()));

        let result = session.resize_sticker(StickerId(5), 10);

        assert!(matches!(
            result,
            Err(EditorError::Mutation(MutationError::StickerNotFound(_)))
        ));
        assert!(!session.can_undo());
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn test_undo_redo_sticker_edits() {
        let mut session = session_with(Arc::new(MockFileSystem::new()));

        let id = session.add_sticker("🎉", Position::ZERO, 40);
        session.move_sticker(id, Position::new(5, 0)).unwrap();
        assert_eq!(session.undo_label(), Some("Move Emoji"));

        assert!(session.undo());
        assert_eq!(session.document().sticker(id).unwrap().position(), Position::ZERO);
        assert_eq!(session.redo_label(), Some("Move Emoji"));

        assert!(session.undo());
        assert!(session.stickers().is_empty());
        assert!(!session.undo());

        assert!(session.redo());
        assert!(session.redo());
        assert_eq!(
            session.document().sticker(id).unwrap().position(),
            Position::new(5, 0)
        );
        assert!(!session.redo());
    }

    #[test]
    fn test_ids_stay_unique_across_undo() {
        let mut session = session_with(Arc::new(MockFileSystem::new()));

        let first = session.add_sticker("a", Position::ZERO, 40);
        session.undo();
        let second = session.add_sticker("b", Position::ZERO, 40);

        assert!(second > first);
    }

    #[test]
    fn test_unsubscribed_observer_is_not_called() {
        let mut session = session_with(Arc::new(MockFileSystem::new()));
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let sub = session.subscribe(move |_| *counter.lock().unwrap() += 1);

        session.add_sticker("a", Position::ZERO, 40);
        assert!(session.unsubscribe(sub));
        session.add_sticker("b", Position::ZERO, 40);

        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_group_is_one_undo_step() {
        let mut session = session_with(Arc::new(MockFileSystem::new()));

        session.begin_group("Drop Emojis");
        session.add_sticker("a", Position::ZERO, 40);
        session.add_sticker("b", Position::ZERO, 40);
        session.end_group();

        assert_eq!(session.undo_label(), Some("Drop Emojis"));
        assert!(session.undo());
        assert!(session.stickers().is_empty());
        assert!(!session.can_undo());
    }

    #[tokio::test]
    async fn test_next_fetch_result_without_pending_fetch() {
        let mut session = session_with(Arc::new(MockFileSystem::new()));
        assert_eq!(session.next_fetch_result().await, None);
    }
}
