//! Input generators for property-based testing
#![allow(clippy::expect_used)]
use proptest::prelude::*;

/// Any string, including control characters and multi-byte text.
pub fn any_document_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(".*").expect("Failed to create any string strategy")
}

/// Printable ASCII with newlines and tabs.
pub fn ascii_document() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x20-\x7E\n\t]*").expect("Failed to create ASCII string strategy")
}

/// Documents assembled from APT constructs, in arbitrary order and
/// indentation, so that lists, sections and tables interleave in ways
/// fixtures rarely do.
pub fn structured_document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just(" -----\n Title\n -----\n Author\n -----\n\n".to_string()),
            Just("Section\n\n".to_string()),
            Just("* Subsection\n\n".to_string()),
            Just("** Deeper\n\n".to_string()),
            Just(" Some <<bold>> and <italic> text.\n\n".to_string()),
            Just("  * list item\n\n".to_string()),
            Just("    * nested item\n\n".to_string()),
            Just("  [[1]] numbered\n\n".to_string()),
            Just("  [term] definition\n\n".to_string()),
            Just("  []\n\n".to_string()),
            Just("+---\ncode\n+---\n\n".to_string()),
            Just("*--+--+\n|a|b|\n*--+--+\nCaption\n\n".to_string()),
            Just("[image.png] caption\n\n".to_string()),
            Just("=====\n\n".to_string()),
            Just(" {{{http://example.com}link}} {anchor}\n\n".to_string()),
            Just("~~ comment\n".to_string()),
            Just("%{echo|a=b}\n\n".to_string()),
            prop::string::string_regex(r"[ a-zA-Z0-9<>{}\[\]*|\\.\n-]{1,40}")
                .expect("Failed to create text chunk"),
        ],
        0..20,
    )
    .prop_map(|chunks| chunks.join(""))
}

/// Inline text mixing markup characters and escapes.
pub fn inline_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("<".to_string()),
            Just(">".to_string()),
            Just("<<".to_string()),
            Just(">>".to_string()),
            Just("{".to_string()),
            Just("}".to_string()),
            Just("{{".to_string()),
            Just("}}".to_string()),
            Just("\\".to_string()),
            Just("\\x4".to_string()),
            Just("\\u00".to_string()),
            Just("\\ ".to_string()),
            Just("\u{a0}".to_string()),
            prop::string::string_regex(r"[a-z ]{1,8}").expect("Failed to create word"),
        ],
        0..30,
    )
    .prop_map(|chunks| chunks.join(""))
}
