//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use tickwrap::buffer::{RopeBuffer, TextBuffer, TextBufferMut};
use tickwrap::config::ConverterConfig;
use tickwrap::dispatch::{ChangeDispatcher, DocumentMeta, EditEvent, Outcome};
use tickwrap::position::Position;

pub fn ts_meta() -> DocumentMeta {
    DocumentMeta::new("typescript", "src/app.ts")
}

pub fn tsx_meta() -> DocumentMeta {
    DocumentMeta::new("typescriptreact", "src/App.tsx")
}

pub fn svelte_meta() -> DocumentMeta {
    DocumentMeta::new("svelte", "src/App.svelte")
}

/// Dispatch a single insertion against a fresh default-config dispatcher.
/// `text` is the buffer as it stands after the host applied the typing.
pub fn type_at(
    text: &str,
    line: usize,
    column: usize,
    inserted: &str,
    meta: &DocumentMeta,
) -> (RopeBuffer, Outcome) {
    type_with(ConverterConfig::default(), text, line, column, inserted, meta)
}

/// Same as [`type_at`] with an explicit config.
pub fn type_with(
    config: ConverterConfig,
    text: &str,
    line: usize,
    column: usize,
    inserted: &str,
    meta: &DocumentMeta,
) -> (RopeBuffer, Outcome) {
    let mut buf = RopeBuffer::from_text(text);
    let mut dispatcher = ChangeDispatcher::new(config);
    let outcome = dispatcher.on_edit(
        &mut buf,
        meta,
        &EditEvent::insertion(Position::new(line, column), inserted),
    );
    (buf, outcome)
}

/// Delete one character at `(line, column)` from the buffer and dispatch
/// the matching deletion event.
pub fn delete_char_at(
    dispatcher: &mut ChangeDispatcher,
    buf: &mut RopeBuffer,
    line: usize,
    column: usize,
    meta: &DocumentMeta,
) -> Outcome {
    let offset = buf.position_to_offset(line, column);
    buf.remove(offset..offset + 1);
    dispatcher.on_edit(
        buf,
        meta,
        &EditEvent::deletion(Position::new(line, column), 1),
    )
}
