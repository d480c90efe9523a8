//! # Document Mutations
//!
//! The closed set of edits a session can perform on a document. Every user
//! intent is expressed as one of these so the session can record it for undo
//! and autosave it in one place.
//!
//! ## Semantics
//!
//! ### SetBackground
//! - Atomic replacement of the locator (or removal with `None`)
//! - Fetching the new background is the session's job, not the mutation's
//!
//! ### AddSticker
//! - Appends at the end, assigns the next id
//! - Never fails; content is not validated
//!
//! ### MoveSticker / SetStickerPosition / ResizeSticker / ScaleSticker
//! - Preserve id and position in the sticker order
//! - Fail with `StickerNotFound` for unknown ids
//!
//! ### RemoveSticker
//! - The removed id is never reassigned

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{Document, StickerId};
use crate::geometry::Position;

/// Semantic document edits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Replace the background locator
    SetBackground { locator: Option<String> },

    /// Place a new sticker on the canvas
    AddSticker {
        content: String,
        position: Position,
        size: i32,
    },

    /// Translate a sticker
    MoveSticker { id: StickerId, offset: Position },

    /// Put a sticker at an absolute position
    SetStickerPosition { id: StickerId, position: Position },

    /// Set a sticker's point size
    ResizeSticker { id: StickerId, size: i32 },

    /// Multiply a sticker's point size (pinch gesture result)
    ScaleSticker { id: StickerId, factor: f64 },

    /// Delete a sticker
    RemoveSticker { id: StickerId },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Sticker not found: {0}")]
    StickerNotFound(StickerId),
}

/// Outcome of a committed mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Session version after the mutation
    pub version: u64,

    /// Id assigned by an `AddSticker`
    pub created: Option<StickerId>,
}

impl Mutation {
    /// Apply to `doc`. Returns the id of a newly created sticker, if any.
    pub fn apply(&self, doc: &mut Document) -> Result<Option<StickerId>, MutationError> {
        match self {
            Mutation::SetBackground { locator } => {
                doc.set_background(locator.clone());
                Ok(None)
            }

            Mutation::AddSticker {
                content,
                position,
                size,
            } => Ok(Some(doc.add_sticker(content.clone(), *position, *size))),

            Mutation::MoveSticker { id, offset } => doc.move_sticker(*id, *offset).map(|_| None),

            Mutation::SetStickerPosition { id, position } => {
                doc.set_sticker_position(*id, *position).map(|_| None)
            }

            Mutation::ResizeSticker { id, size } => doc.resize_sticker(*id, *size).map(|_| None),

            Mutation::ScaleSticker { id, factor } => doc.scale_sticker(*id, *factor).map(|_| None),

            Mutation::RemoveSticker { id } => doc.remove_sticker(*id).map(|_| None),
        }
    }

    /// Human readable name, used as the undo label
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::SetBackground { .. } => "Set Background",
            Mutation::AddSticker { .. } => "Add Emoji",
            Mutation::MoveSticker { .. } | Mutation::SetStickerPosition { .. } => "Move Emoji",
            Mutation::ResizeSticker { .. } | Mutation::ScaleSticker { .. } => "Resize Emoji",
            Mutation::RemoveSticker { .. } => "Remove Emoji",
        }
    }
}
