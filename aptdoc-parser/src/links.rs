//! Link classification, anchor id encoding and link target normalization.

use crate::diagnostics::Diagnostics;

const EXTERNAL_PREFIXES: [&str; 5] = ["http:/", "https:/", "ftp:/", "mailto:", "file:/"];

/// Whether `link` points outside the document set: it has a known scheme
/// prefix or contains `://`.
#[must_use]
pub fn is_external_link(link: &str) -> bool {
    let text = link.to_lowercase();
    EXTERNAL_PREFIXES
        .iter()
        .any(|prefix| text.starts_with(prefix))
        || text.contains("://")
}

/// Whether `link` is a path relative to the site root or the current document.
#[must_use]
pub fn is_local_link(link: &str) -> bool {
    link.starts_with('/') || link.starts_with("./") || link.starts_with("../")
}

/// Whether `link` refers to an anchor inside the current document.
#[must_use]
pub fn is_internal_link(link: &str) -> bool {
    !is_external_link(link) && !is_local_link(link)
}

/// Whether `id` can be used verbatim as an anchor identifier.
///
/// ASCII letters and `_` are allowed anywhere; digits, `-` and `.` everywhere
/// but in first position.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    if id.is_empty() {
        return false;
    }
    id.chars().enumerate().all(|(i, c)| {
        c.is_ascii_alphabetic() || c == '_' || (i > 0 && (c.is_ascii_digit() || c == '-' || c == '.'))
    })
}

/// Turns arbitrary text into a valid anchor identifier.
///
/// The text is trimmed, prefixed with `a` unless it starts with an ASCII letter
/// or `_`, spaces become `_`, and any character that is not an ASCII letter,
/// digit, `-`, `_` or `.` is written as `.` followed by the two hex digits of
/// each of its UTF-8 bytes.
#[must_use]
pub fn encode_id(text: &str) -> String {
    let text = text.trim();
    let mut encoded = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        if i == 0 && !(c.is_ascii_alphabetic() || c == '_') {
            encoded.push('a');
        }
        match c {
            ' ' => encoded.push('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') => encoded.push(c),
            c => {
                let mut bytes = [0; 4];
                for byte in c.encode_utf8(&mut bytes).bytes() {
                    encoded.push_str(&format!(".{byte:02X}"));
                }
            }
        }
    }
    encoded
}

/// Rewrites a link target the way it should reach the sink.
///
/// Targets that are neither external nor local get a leading `#`. For
/// non-external targets with a fragment, `##` marks a literal fragment and any
/// other invalid fragment is encoded with [`encode_id`].
pub(crate) fn normalize_link_target(target: &str, diagnostics: &mut Diagnostics) -> String {
    let mut target = if is_internal_link(target) {
        format!("#{target}")
    } else {
        target.to_string()
    };

    if is_external_link(&target) {
        return target;
    }
    let Some(hash_index) = target.find('#') else {
        return target;
    };
    let (path, fragment) = target.split_at(hash_index);
    let fragment = fragment.get(1..).unwrap_or_default();

    if fragment.ends_with(".html") && !fragment.starts_with("./") {
        diagnostics.warn(
            "Ambiguous link",
            format!("{fragment} in {target} could be a file or an anchor"),
        );
    }

    if fragment.starts_with('#') {
        target = format!("{path}{fragment}");
    } else if !is_valid_id(fragment) {
        let encoded = format!("{path}#{}", encode_id(fragment));
        diagnostics.warn(
            "Modified invalid link",
            format!("{target} changed to {encoded}"),
        );
        target = encoded;
    }
    target
}
