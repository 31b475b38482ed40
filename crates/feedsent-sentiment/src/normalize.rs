//! Comment text cleanup ahead of language processing.

use crate::lexicon::EmojiLexicon;

/// Punctuation kept by [`normalize`] besides ASCII letters, digits and whitespace.
const KEPT_PUNCTUATION: &[char] = &['.', ',', '!', '?'];

fn is_kept(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || KEPT_PUNCTUATION.contains(&c)
}

/// Strip lexicon emoji and punctuation noise, then trim.
///
/// Lexicon keys are removed verbatim first, so a multi-codepoint sequence is
/// only removed as a unit when it is itself a key. Everything outside ASCII
/// letters, digits, whitespace and `.,!?` is then dropped.
#[must_use]
pub fn normalize(raw: &str, lexicon: &EmojiLexicon) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut text = raw.to_string();
    for emoji in lexicon.keys() {
        if text.contains(emoji) {
            text = text.replace(emoji, "");
        }
    }

    let cleaned: String = text.chars().filter(|&c| is_kept(c)).collect();
    cleaned.trim().to_string()
}
