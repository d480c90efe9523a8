use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a palette; survives renames and edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaletteId(pub Uuid);

impl PaletteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PaletteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaletteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named set of emojis offered for picking
///
/// `name` and `emojis` are freely editable; `id` is what the store uses to
/// tell palettes apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub id: PaletteId,
    pub name: String,
    pub emojis: String,
}

impl Palette {
    /// Create a palette with a fresh identity
    pub fn new(name: impl Into<String>, emojis: impl Into<String>) -> Self {
        Self::with_id(PaletteId::new(), name, emojis)
    }

    pub fn with_id(id: PaletteId, name: impl Into<String>, emojis: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            emojis: emojis.into(),
        }
    }

    /// Same identity as `other`, regardless of name or content
    pub fn same_identity(&self, other: &Palette) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_palettes_have_distinct_ids() {
        let a = Palette::new("Faces", "😀");
        let b = Palette::new("Faces", "😀");
        assert!(!a.same_identity(&b));
    }

    #[test]
    fn test_identity_survives_edits() {
        let original = Palette::new("Faces", "😀");
        let mut edited = original.clone();
        edited.name = "Smileys".to_string();
        edited.emojis.push_str("😎");

        assert!(edited.same_identity(&original));
        assert_ne!(edited, original);
    }

    #[test]
    fn test_persisted_shape() {
        let id = PaletteId(Uuid::nil());
        let palette = Palette::with_id(id, "Faces", "😀");
        let json = serde_json::to_string(&palette).unwrap();
        assert_eq!(
            json,
            r#"{"id":"00000000-0000-0000-0000-000000000000","name":"Faces","emojis":"😀"}"#
        );
    }
}
