//! User message handling: normalization of submitted text and the split into
//! the two display lines.

use crate::config::{MESSAGE_LINE_CHARS, MESSAGE_MAX_CHARS};

/// Normalize a submitted message for storage.
///
/// Surrounding whitespace is trimmed and the result is capped at
/// [`MESSAGE_MAX_CHARS`] characters.  An empty result becomes a single space
/// so the display always has something to draw.
pub fn normalize(raw: &str) -> String {
    let capped: String = raw.trim().chars().take(MESSAGE_MAX_CHARS).collect();
    if capped.is_empty() {
        " ".to_string()
    } else {
        capped
    }
}

/// Split a stored message into its first and (optional) second display line.
pub fn split_lines(message: &str) -> (&str, Option<&str>) {
    let Some((cut, _)) = message.char_indices().nth(MESSAGE_LINE_CHARS) else {
        return (message, None);
    };
    let (first, rest) = message.split_at(cut);
    let end = rest
        .char_indices()
        .nth(MESSAGE_LINE_CHARS)
        .map_or(rest.len(), |(i, _)| i);
    (first, Some(&rest[..end]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize("  hello world test!!  "), "hello world test!!");
    }

    #[test]
    fn blank_becomes_single_space() {
        assert_eq!(normalize(""), " ");
        assert_eq!(normalize("   \t\n "), " ");
    }

    #[test]
    fn caps_length_by_characters() {
        let long = "é".repeat(30);
        assert_eq!(normalize(&long).chars().count(), MESSAGE_MAX_CHARS);
    }

    #[test]
    fn splits_after_twelve_characters() {
        let msg = normalize("  hello world test!!  ");
        assert_eq!(split_lines(&msg), ("hello world ", Some("test!!")));
    }

    #[test]
    fn short_message_is_one_line() {
        assert_eq!(split_lines("Hello!"), ("Hello!", None));
        assert_eq!(split_lines("exactly12chr"), ("exactly12chr", None));
    }

    #[test]
    fn second_line_is_capped() {
        let (first, second) = split_lines("aaaaaaaaaaaabbbbbbbbbbbbcccc");
        assert_eq!(first, "aaaaaaaaaaaa");
        assert_eq!(second, Some("bbbbbbbbbbbb"));
    }

    proptest! {
        #[test]
        fn stored_message_is_never_empty(raw in "\\PC*") {
            let stored = normalize(&raw);
            prop_assert!(!stored.is_empty());
            prop_assert!(stored.chars().count() <= MESSAGE_MAX_CHARS);
        }
    }
}
