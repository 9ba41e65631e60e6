//! Markup serialization helpers.
//!
//! Only used to render an in-memory tree for diagnostics and tests; nothing
//! here ever feeds markup back into a document.
//!
//! Escaping follows the HTML fragment serializer: text escapes `&`, `<`,
//! `>` and NBSP; attribute values escape `&`, `"` and NBSP.

use std::borrow::Cow;

const TEXT_SPECIALS: [char; 4] = ['&', '<', '>', '\u{00A0}'];
const ATTR_SPECIALS: [char; 3] = ['&', '"', '\u{00A0}'];

#[inline]
fn entity(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\u{00A0}' => Some("&nbsp;"),
        _ => None,
    }
}

/// Escape text content. Borrows when nothing needs escaping.
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &TEXT_SPECIALS)
}

/// Escape a double-quoted attribute value.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ATTR_SPECIALS)
}

fn escape_with<'a>(s: &'a str, specials: &[char]) -> Cow<'a, str> {
    if !s.contains(specials) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match entity(c).filter(|_| specials.contains(&c)) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Elements serialized without children or a closing tag.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

/// Elements whose text is serialized verbatim.
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}
