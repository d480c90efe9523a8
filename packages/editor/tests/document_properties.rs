//! Property tests for the document model

use emojiart_editor::{Document, Mutation, Position, StickerId, UndoStack};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(String, Position, i32),
    Move(usize, Position),
    Resize(usize, i32),
    Remove(usize),
    Background(Option<String>),
}

fn position() -> impl Strategy<Value = Position> {
    (-2000i32..2000, -2000i32..2000).prop_map(|(x, y)| Position::new(x, y))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => ("[🎉🚀🐶😀a-z]{1,2}", position(), 1i32..300)
            .prop_map(|(s, p, size)| Op::Add(s, p, size)),
        2 => (any::<usize>(), position()).prop_map(|(i, p)| Op::Move(i, p)),
        1 => (any::<usize>(), 1i32..300).prop_map(|(i, s)| Op::Resize(i, s)),
        2 => any::<usize>().prop_map(Op::Remove),
        1 => proptest::option::of("https://example\\.com/[a-z]{1,8}\\.png")
            .prop_map(Op::Background),
    ]
}

/// Apply `op`, picking an existing sticker by index modulo the count
fn apply(doc: &mut Document, op: &Op) -> Option<StickerId> {
    let pick = |doc: &Document, i: usize| {
        let stickers = doc.stickers();
        (!stickers.is_empty()).then(|| stickers[i % stickers.len()].id())
    };
    match op {
        Op::Add(content, position, size) => Some(doc.add_sticker(content.clone(), *position, *size)),
        Op::Move(i, offset) => {
            if let Some(id) = pick(doc, *i) {
                doc.move_sticker(id, *offset).unwrap();
            }
            None
        }
        Op::Resize(i, size) => {
            if let Some(id) = pick(doc, *i) {
                doc.resize_sticker(id, *size).unwrap();
            }
            None
        }
        Op::Remove(i) => {
            if let Some(id) = pick(doc, *i) {
                doc.remove_sticker(id).unwrap();
            }
            None
        }
        Op::Background(locator) => {
            doc.set_background(locator.clone());
            None
        }
    }
}

proptest! {
    #[test]
    fn prop_json_round_trip(ops in proptest::collection::vec(op(), 0..40)) {
        let mut doc = Document::new();
        for op in &ops {
            apply(&mut doc, op);
        }

        let bytes = doc.to_json().unwrap();
        let decoded = Document::from_json(&bytes).unwrap();
        prop_assert_eq!(decoded, doc);
    }

    #[test]
    fn prop_ids_strictly_increase(ops in proptest::collection::vec(op(), 0..60)) {
        let mut doc = Document::new();
        let mut last = StickerId(0);
        for op in &ops {
            if let Some(id) = apply(&mut doc, op) {
                prop_assert!(id > last);
                last = id;
            }
        }

        let mut ids: Vec<_> = doc.stickers().iter().map(|s| s.id()).collect();
        let count = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), count);
    }

    #[test]
    fn prop_undo_everything_restores_empty(ops in proptest::collection::vec(op(), 1..30)) {
        let mut doc = Document::new();
        let mut stack = UndoStack::with_max_levels(0);
        for op in &ops {
            let before = doc.clone();
            apply(&mut doc, op);
            stack.record("Edit", before);
        }

        while let Some(previous) = stack.undo(doc.clone()) {
            doc.restore(previous);
        }
        prop_assert_eq!(doc, Document::new());
    }

    #[test]
    fn prop_failed_mutation_is_a_no_op(ops in proptest::collection::vec(op(), 0..20), size in 1i32..100) {
        let mut doc = Document::new();
        for op in &ops {
            apply(&mut doc, op);
        }
        let before = doc.clone();
        let unknown = StickerId(doc.last_assigned_id().0 + 1);

        let result = Mutation::ResizeSticker { id: unknown, size }.apply(&mut doc);
        prop_assert!(result.is_err());
        prop_assert_eq!(doc, before);
    }
}
