//! Display helpers for untrusted row values.
//!
//! Every string that comes from the backend goes through [`sanitize`] before
//! it reaches the terminal, so a stored escape sequence is shown as text
//! instead of being interpreted.

use std::borrow::Cow;

/// Characters kept from ticket descriptions in list views.
pub const TICKET_LIST_PREFIX: usize = 50;
/// Characters kept from ticket descriptions in the bin details panel.
pub const TICKET_DETAIL_PREFIX: usize = 40;

fn is_unsafe(ch: char) -> bool {
    ch.is_control() || matches!(ch, '\u{202a}'..='\u{202e}' | '\u{2066}'..='\u{2069}')
}

/// Escape control and bidi-override characters.
///
/// Line breaks and tabs become spaces; anything else unsafe is written as a
/// `\u{..}` escape.
#[must_use]
pub fn sanitize(raw: &str) -> Cow<'_, str> {
    if !raw.chars().any(is_unsafe) {
        return Cow::Borrowed(raw);
    }
    let mut clean = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\n' | '\r' | '\t' => clean.push(' '),
            ch if is_unsafe(ch) => clean.extend(ch.escape_unicode()),
            ch => clean.push(ch),
        }
    }
    Cow::Owned(clean)
}

/// First `max_chars` characters of `raw`, with `...` appended when cut.
#[must_use]
pub fn truncate(raw: &str, max_chars: usize) -> Cow<'_, str> {
    match raw.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}...", raw.get(..cut).unwrap_or(raw))),
        None => Cow::Borrowed(raw),
    }
}

/// Optional value for a table cell; `None` renders empty.
#[must_use]
pub fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|inner| inner.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::INJECTION;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(sanitize("Bin #4 overflowing"), Cow::Borrowed(_)), "no copy");
    }

    #[test]
    fn escape_sequences_are_neutralized() {
        let clean = sanitize(INJECTION);
        assert!(!clean.contains('\u{1b}'), "raw ESC removed: {clean}");
        assert!(clean.contains("\\u{1b}"), "ESC shown escaped: {clean}");
        assert!(clean.contains("<script>"), "other text kept verbatim");
    }

    #[test]
    fn line_breaks_become_spaces_and_bidi_is_escaped() {
        assert_eq!(sanitize("a\nb\tc"), "a b c");
        assert_eq!(sanitize("x\u{202e}y"), "x\\u{202e}y");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("short", 50), "short");
        assert_eq!(truncate("äöüäöü", 3), "äöü...");
        let long = "x".repeat(60);
        assert_eq!(truncate(&long, TICKET_LIST_PREFIX).chars().count(), 53);
        assert_eq!(truncate(&"y".repeat(50), TICKET_LIST_PREFIX), "y".repeat(50));
    }

    #[test]
    fn cell_renders_none_as_empty() {
        assert_eq!(cell(Some(12)), "12");
        assert_eq!(cell(None::<i64>), "");
    }
}
