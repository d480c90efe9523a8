//! # Undo/Redo Stack
//!
//! Tracks document history as whole-document snapshots.
//!
//! ## Design
//!
//! - Before a mutation is applied, the session records the prior document
//! - Undo swaps the current document for the most recent snapshot and pushes
//!   the current one onto the redo stack
//! - Redo is the mirror image
//! - New mutations clear the redo stack
//! - Groups fold several mutations into one undo step
//!
//! Documents are small, so a snapshot per step is cheap enough.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! let before = doc.clone();
//! doc.add_sticker("🎉", Position::ZERO, 40);
//! stack.record("Add Emoji", before);
//!
//! if let Some(previous) = stack.undo(doc.clone()) {
//!     doc.restore(previous);
//! }
//! ```

use crate::document::Document;

/// A document state together with the label of the action that left it
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub document: Document,
    pub label: String,
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Snapshots to return to on undo (most recent last)
    undo_stack: Vec<Snapshot>,

    /// Snapshots to return to on redo (most recent last)
    redo_stack: Vec<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Snapshot taken when the current group was opened
    open_group: Option<Snapshot>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            open_group: None,
        }
    }

    /// Record the document as it was before a mutation labelled `label`
    pub fn record(&mut self, label: impl Into<String>, before: Document) {
        if self.open_group.is_some() {
            // The group already holds the state to return to.
            return;
        }
        self.push_snapshot(Snapshot {
            document: before,
            label: label.into(),
        });
    }

    /// Start a group of mutations that undo/redo together
    pub fn begin_group(&mut self, label: impl Into<String>, current: &Document) {
        if self.open_group.is_none() {
            self.open_group = Some(Snapshot {
                document: current.clone(),
                label: label.into(),
            });
        }
    }

    /// Close the current group. Nothing is recorded if the document did not change.
    pub fn end_group(&mut self, current: &Document) {
        if let Some(group) = self.open_group.take() {
            if group.document != *current {
                self.push_snapshot(group);
            }
        }
    }

    pub fn is_grouping(&self) -> bool {
        self.open_group.is_some()
    }

    fn push_snapshot(&mut self, snapshot: Snapshot) {
        self.push_undo(snapshot);

        // A new action invalidates the undone future
        self.redo_stack.clear();
    }

    /// Push onto the undo stack, dropping the oldest levels beyond the limit
    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            let excess = self.undo_stack.len() - self.max_levels;
            self.undo_stack.drain(..excess);
        }
    }

    /// Step back. Takes the current document, returns the one to restore.
    pub fn undo(&mut self, current: Document) -> Option<Document> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(Snapshot {
            document: current,
            label: snapshot.label.clone(),
        });
        Some(snapshot.document)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: Document) -> Option<Document> {
        let snapshot = self.redo_stack.pop()?;
        self.push_undo(Snapshot {
            document: current,
            label: snapshot.label.clone(),
        });
        Some(snapshot.document)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open_group = None;
    }

    /// Label of the action the next undo reverts
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|s| s.label.as_str())
    }

    /// Label of the action the next redo reapplies
    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|s| s.label.as_str())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
