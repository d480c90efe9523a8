//! # Emoji Art Editor
//!
//! Core document editing engine for Emoji Art.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI: drop emoji, pick background, undo       │
//! └─────────────────────────────────────────────┘
//!                     ↓ intents
//! ┌─────────────────────────────────────────────┐
//! │ session: DocumentSession                    │
//! │  - Undo snapshots                           │
//! │  - Write-through autosave                   │
//! │  - Background fetch state machine           │
//! │  - Observer notification                    │
//! └─────────────────────────────────────────────┘
//!                     ↓ mutations
//! ┌─────────────────────────────────────────────┐
//! │ document: background + stickers (JSON)      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The in-memory document is the source of truth**: persistence is best-effort
//! 2. **Whole-document undo**: every undo step is a snapshot swap
//! 3. **Currency over arrival order**: a background fetch result only lands if its
//!    locator is still the document's background
//!
//! ## Usage
//!
//! ```rust,ignore
//! use emojiart_editor::{Collaborators, DocumentSession, Position, SessionOptions};
//!
//! let mut session = DocumentSession::open(SessionOptions::new("Autosaved.emojiart"), collaborators);
//!
//! let id = session.add_sticker("🎉", Position::new(10, -20), 40);
//! session.set_background(Some("https://example.com/a.png".to_string()));
//!
//! // Later, on the same task
//! session.process_fetch_results();
//! session.undo();
//! ```

mod background;
mod document;
mod errors;
mod geometry;
mod mutations;
mod session;
mod undo_stack;

pub mod testing;

pub use background::{BackgroundState, FetchError, FetchOutcome, Fetcher, ImageDecoder, ImageHandle};
pub use document::{Document, Sticker, StickerId, MAX_RESTORED_ID};
pub use errors::EditorError;
pub use geometry::Position;
pub use mutations::{Mutation, MutationError, MutationResult};
pub use session::{
    Collaborators, DocumentEvent, DocumentSession, FetchDelivery, SessionOptions,
    DEFAULT_AUTOSAVE_FILE,
};
pub use undo_stack::{Snapshot, UndoStack};

// Re-export the observer handle for convenience
pub use emojiart_common::Subscription;
