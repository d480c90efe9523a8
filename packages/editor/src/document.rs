//! # Document Model
//!
//! A Document is a canvas: an optional background locator plus an ordered
//! list of stickers. It is a plain value; it is cloned wholesale for undo
//! snapshots and knows nothing about persistence or fetching.
//!
//! ## Persisted form
//!
//! ```text
//! {
//!   "background": "https://example.com/a.png",      (omitted when none)
//!   "emojis": [
//!     { "id": 1, "string": "🎉", "position": { "x": 10, "y": -20 }, "size": 40 }
//!   ]
//! }
//! ```
//!
//! The id counter is not persisted. Loading reconstructs it from the largest
//! restored id (or 0 when every restored id is negative), so ids handed out
//! after a reload never collide with restored ones. Ids above
//! [`MAX_RESTORED_ID`] are rejected, which keeps the counter far from
//! overflow.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::{EditorError, MutationError};

/// Largest id a loaded document may carry: the biggest integer a JSON
/// number holds exactly in every producer
pub const MAX_RESTORED_ID: i64 = (1 << 53) - 1;

/// Identifier of a sticker, unique within its document
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StickerId(pub i64);

impl fmt::Display for StickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An emoji placed on the canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sticker {
    id: StickerId,
    #[serde(rename = "string")]
    content: String,
    position: Position,
    size: i32,
}

impl Sticker {
    pub fn id(&self) -> StickerId {
        self.id
    }

    /// The emoji text. Expected to be a single character cluster, not enforced.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Point size of the sticker
    pub fn size(&self) -> i32 {
        self.size
    }
}

/// Canvas document: background + stickers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background: Option<String>,

    #[serde(rename = "emojis")]
    stickers: Vec<Sticker>,

    /// Last id handed out; only ever increases
    #[serde(skip)]
    last_id: i64,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.background == other.background && self.stickers == other.stickers
    }
}

impl Eq for Document {}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Replace the background locator
    pub fn set_background(&mut self, locator: Option<String>) {
        self.background = locator;
    }

    /// Stickers in display order
    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    pub fn sticker(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.iter().find(|s| s.id == id)
    }

    pub fn sticker_index(&self, id: StickerId) -> Option<usize> {
        self.stickers.iter().position(|s| s.id == id)
    }

    /// The most recently assigned id (0 if none was ever assigned)
    pub fn last_assigned_id(&self) -> StickerId {
        StickerId(self.last_id)
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.stickers.is_empty()
    }

    /// Append a new sticker and return its freshly assigned id
    pub fn add_sticker(
        &mut self,
        content: impl Into<String>,
        position: Position,
        size: i32,
    ) -> StickerId {
        self.last_id += 1;
        let id = StickerId(self.last_id);
        self.stickers.push(Sticker {
            id,
            content: content.into(),
            position,
            size,
        });
        id
    }

    /// Translate a sticker by `offset`
    pub fn move_sticker(&mut self, id: StickerId, offset: Position) -> Result<(), MutationError> {
        let sticker = self.sticker_mut(id)?;
        sticker.position = sticker.position + offset;
        Ok(())
    }

    pub fn set_sticker_position(
        &mut self,
        id: StickerId,
        position: Position,
    ) -> Result<(), MutationError> {
        self.sticker_mut(id)?.position = position;
        Ok(())
    }

    pub fn resize_sticker(&mut self, id: StickerId, size: i32) -> Result<(), MutationError> {
        self.sticker_mut(id)?.size = size;
        Ok(())
    }

    /// Multiply a sticker's size by `factor`, rounding and never going below 1.
    /// A NaN factor leaves the size unchanged.
    pub fn scale_sticker(&mut self, id: StickerId, factor: f64) -> Result<(), MutationError> {
        let sticker = self.sticker_mut(id)?;
        let scaled = (f64::from(sticker.size) * factor).round();
        if scaled.is_nan() {
            return Ok(());
        }
        sticker.size = scaled.clamp(1.0, f64::from(i32::MAX)) as i32;
        Ok(())
    }

    /// Remove a sticker, returning it. Its id is never handed out again.
    pub fn remove_sticker(&mut self, id: StickerId) -> Result<Sticker, MutationError> {
        let index = self
            .sticker_index(id)
            .ok_or(MutationError::StickerNotFound(id))?;
        Ok(self.stickers.remove(index))
    }

    /// Replace the contents with `snapshot`, keeping the id high-water mark
    pub fn restore(&mut self, snapshot: Document) {
        let last_id = self.last_id.max(snapshot.last_id);
        *self = snapshot;
        self.last_id = last_id;
    }

    /// Serialize to the persisted JSON form
    pub fn to_json(&self) -> Result<Vec<u8>, EditorError> {
        let encoded = serde_json::to_vec(self)?;
        tracing::trace!(bytes = encoded.len(), "Encoded document");
        Ok(encoded)
    }

    /// Parse the persisted JSON form
    pub fn from_json(bytes: &[u8]) -> Result<Self, EditorError> {
        let mut doc: Document = serde_json::from_slice(bytes)?;

        let mut ids: Vec<i64> = doc.stickers.iter().map(|s| s.id.0).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(EditorError::CorruptData(format!(
                "duplicate sticker id {}",
                pair[0]
            )));
        }

        if let Some(&id) = ids.last().filter(|&&id| id > MAX_RESTORED_ID) {
            return Err(EditorError::CorruptData(format!(
                "sticker id {id} is above {MAX_RESTORED_ID}"
            )));
        }

        doc.last_id = ids.last().copied().unwrap_or(0).max(0);
        Ok(doc)
    }

    fn sticker_mut(&mut self, id: StickerId) -> Result<&mut Sticker, MutationError> {
        self.stickers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(MutationError::StickerNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sticker_scenario() {
        let mut doc = Document::new();

        let first = doc.add_sticker("🎉", Position::new(10, -20), 40);
        assert_eq!(first, StickerId(1));
        assert_eq!(doc.stickers().len(), 1);

        let original = doc.stickers()[0].clone();
        assert_eq!(original.content(), "🎉");
        assert_eq!(original.position(), Position::new(10, -20));
        assert_eq!(original.size(), 40);

        let second = doc.add_sticker("🚀", Position::ZERO, 40);
        assert_eq!(second, StickerId(2));
        assert_eq!(doc.stickers().len(), 2);
        assert_eq!(doc.stickers()[0], original);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut doc = Document::new();
        let a = doc.add_sticker("a", Position::ZERO, 10);
        let b = doc.add_sticker("b", Position::ZERO, 10);
        doc.remove_sticker(b).unwrap();

        let c = doc.add_sticker("c", Position::ZERO, 10);
        assert!(c > b);
        assert!(b > a);
    }

    #[test]
    fn test_updates_preserve_id_and_order() {
        let mut doc = Document::new();
        let a = doc.add_sticker("a", Position::ZERO, 10);
        let b = doc.add_sticker("b", Position::ZERO, 10);

        doc.move_sticker(a, Position::new(5, 5)).unwrap();
        doc.resize_sticker(b, 80).unwrap();

        assert_eq!(doc.stickers()[0].id(), a);
        assert_eq!(doc.stickers()[0].position(), Position::new(5, 5));
        assert_eq!(doc.stickers()[1].size(), 80);
    }

    #[test]
    fn test_scale_sticker_clamps_to_one() {
        let mut doc = Document::new();
        let a = doc.add_sticker("a", Position::ZERO, 40);

        doc.scale_sticker(a, 1.5).unwrap();
        assert_eq!(doc.sticker(a).unwrap().size(), 60);

        doc.scale_sticker(a, 0.0).unwrap();
        assert_eq!(doc.sticker(a).unwrap().size(), 1);
    }

    #[test]
    fn test_unknown_sticker_is_an_error() {
        let mut doc = Document::new();
        let missing = StickerId(9);
        assert_eq!(
            doc.resize_sticker(missing, 1),
            Err(MutationError::StickerNotFound(missing))
        );
        assert!(doc.remove_sticker(missing).is_err());
    }

    #[test]
    fn test_json_field_order() {
        let mut doc = Document::new();
        doc.set_background(Some("https://example.com/a.png".to_string()));
        doc.add_sticker("🎉", Position::new(10, -20), 40);

        let json = String::from_utf8(doc.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"background":"https://example.com/a.png","emojis":[{"id":1,"string":"🎉","position":{"x":10,"y":-20},"size":40}]}"#
        );
    }

    #[test]
    fn test_from_json_tolerates_missing_background_and_unknown_fields() {
        let doc = Document::from_json(br#"{"emojis":[],"uniqueEmojiId":3,"extra":true}"#).unwrap();
        assert_eq!(doc.background(), None);
        assert!(doc.stickers().is_empty());

        let doc = Document::from_json(br#"{"background":null,"emojis":[]}"#).unwrap();
        assert_eq!(doc.background(), None);
    }

    #[test]
    fn test_from_json_rejects_malformed_payloads() {
        for bad in [
            &b"not json"[..],
            br#"{}"#,
            br#"{"emojis":{}}"#,
            br#"{"emojis":[{"id":"one","string":"a","position":{"x":0,"y":0},"size":1}]}"#,
            br#"{"emojis":[{"id":1,"string":"a","size":1}]}"#,
            br#"{"background":5,"emojis":[]}"#,
        ] {
            assert!(
                matches!(Document::from_json(bad), Err(EditorError::CorruptData(_))),
                "payload should be corrupt: {}",
                String::from_utf8_lossy(bad)
            );
        }
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let payload = br#"{"emojis":[
            {"id":1,"string":"a","position":{"x":0,"y":0},"size":1},
            {"id":1,"string":"b","position":{"x":0,"y":0},"size":1}
        ]}"#;
        assert!(matches!(
            Document::from_json(payload),
            Err(EditorError::CorruptData(_))
        ));
    }

    #[test]
    fn test_restored_counter_continues_after_max_id() {
        let payload = br#"{"emojis":[
            {"id":7,"string":"a","position":{"x":0,"y":0},"size":1},
            {"id":3,"string":"b","position":{"x":0,"y":0},"size":1}
        ]}"#;
        let mut doc = Document::from_json(payload).unwrap();
        assert_eq!(doc.last_assigned_id(), StickerId(7));
        assert_eq!(doc.add_sticker("c", Position::ZERO, 1), StickerId(8));
    }

    #[test]
    fn test_from_json_rejects_ids_near_overflow() {
        let payload = br#"{"emojis":[
            {"id":9223372036854775807,"string":"a","position":{"x":0,"y":0},"size":1}
        ]}"#;
        assert!(matches!(
            Document::from_json(payload),
            Err(EditorError::CorruptData(_))
        ));

        let payload = br#"{"emojis":[
            {"id":9007199254740992,"string":"a","position":{"x":0,"y":0},"size":1}
        ]}"#;
        assert!(Document::from_json(payload).is_err());

        let payload = br#"{"emojis":[
            {"id":9007199254740991,"string":"a","position":{"x":0,"y":0},"size":1}
        ]}"#;
        let mut doc = Document::from_json(payload).unwrap();
        doc.add_sticker("b", Position::ZERO, 1);
        assert_eq!(
            doc.add_sticker("c", Position::ZERO, 1),
            StickerId(MAX_RESTORED_ID + 2)
        );
    }

    #[test]
    fn test_negative_ids_load_and_counter_starts_at_zero() {
        let payload = br#"{"emojis":[
            {"id":-4,"string":"a","position":{"x":0,"y":0},"size":1}
        ]}"#;
        let mut doc = Document::from_json(payload).unwrap();
        assert_eq!(doc.stickers()[0].id(), StickerId(-4));
        assert_eq!(doc.add_sticker("b", Position::ZERO, 1), StickerId(1));
    }

    #[test]
    fn test_scale_sticker_ignores_nan_and_clamps_infinity() {
        let mut doc = Document::new();
        let a = doc.add_sticker("a", Position::ZERO, 40);

        doc.scale_sticker(a, f64::NAN).unwrap();
        assert_eq!(doc.sticker(a).unwrap().size(), 40);

        doc.scale_sticker(a, f64::NEG_INFINITY).unwrap();
        assert_eq!(doc.sticker(a).unwrap().size(), 1);

        doc.scale_sticker(a, f64::INFINITY).unwrap();
        assert_eq!(doc.sticker(a).unwrap().size(), i32::MAX);
    }

    #[test]
    fn test_restore_keeps_high_water_mark() {
        let mut doc = Document::new();
        let snapshot = doc.clone();
        doc.add_sticker("a", Position::ZERO, 1);
        doc.add_sticker("b", Position::ZERO, 1);

        doc.restore(snapshot);
        assert!(doc.stickers().is_empty());
        assert_eq!(doc.add_sticker("c", Position::ZERO, 1), StickerId(3));
    }
}
