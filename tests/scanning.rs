//! Whole-document scanning and batch conversion.

mod common;

use tickwrap::buffer::{RopeBuffer, TextBuffer};
use tickwrap::scanner::{convert_document, find_candidates};

#[test]
fn test_scan_finds_only_live_interpolations() {
    let text = concat!(
        "import a from \"mod${x}\";\n",
        "// const b = \"doc ${x}\";\n",
        "const c = \"live ${x}\";\n",
        "const d = 'more ${y}';\n",
        "const e = \"plain\";\n",
        "const f = `already ${z}`;\n",
    );
    let buf = RopeBuffer::from_text(text);
    let found = find_candidates(&buf);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].line, 2);
    assert_eq!(found[0].content, "live ${x}");
    assert_eq!(found[1].line, 3);
    assert_eq!(found[1].content, "more ${y}");
}

#[test]
fn test_convert_document_rewrites_all_candidates() {
    let text = "const a = \"one ${x}\";\nconst b = 'two ${y}';\n";
    let mut buf = RopeBuffer::from_text(text);
    let count = convert_document(&mut buf).unwrap();
    assert_eq!(count, 2);
    assert_eq!(
        buf.content(),
        "const a = `one ${x}`;\nconst b = `two ${y}`;\n"
    );
}

#[test]
fn test_convert_document_is_idempotent() {
    let mut buf = RopeBuffer::from_text("const a = \"one ${x}\";\n");
    assert_eq!(convert_document(&mut buf).unwrap(), 1);
    assert_eq!(convert_document(&mut buf).unwrap(), 0);
    assert_eq!(buf.content(), "const a = `one ${x}`;\n");
}

#[test]
fn test_multiple_candidates_on_one_line() {
    let mut buf = RopeBuffer::from_text("f(\"a ${x}\", 'b ${y}');\n");
    let count = convert_document(&mut buf).unwrap();
    assert_eq!(count, 2);
    assert_eq!(buf.content(), "f(`a ${x}`, `b ${y}`);\n");
}
