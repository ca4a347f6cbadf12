//! RFC 2047 encoded words (`=?utf-8?b?...?=`) for header text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encoded words may not exceed 75 characters, `=?utf-8?b?` and `?=` take 12
/// of them. 45 source bytes give 60 base64 characters.
const MAX_WORD_BYTES: usize = 45;

fn needs_encoding(text: &str) -> bool {
    text.contains("=?") || text.chars().any(|c| !c.is_ascii() || c.is_ascii_control())
}

/// Encode header text when it is not plain printable ASCII
pub fn encode(text: &str) -> String {
    if !needs_encoding(text) {
        return text.into();
    }

    let mut words = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let mut split = rest.len().min(MAX_WORD_BYTES);
        while !rest.is_char_boundary(split) {
            split -= 1;
        }
        let (word, tail) = rest.split_at(split);
        words.push(format!("=?utf-8?b?{}?=", STANDARD.encode(word)));
        rest = tail;
    }

    words.join(" ")
}

/// Decode header text, returns `None` for malformed or non UTF-8 words
pub fn decode(text: &str) -> Option<String> {
    let text = text.trim();

    if !text.starts_with("=?") {
        return Some(text.into());
    }

    text.split_whitespace()
        .map(decode_word)
        .collect::<Option<Vec<_>>>()
        .map(|words| words.concat())
}

fn decode_word(word: &str) -> Option<String> {
    let inner = word.strip_prefix("=?")?.strip_suffix("?=")?;
    let mut parts = inner.splitn(3, '?');
    let charset = parts.next()?;
    let encoding = parts.next()?;
    let data = parts.next()?;

    if !charset.eq_ignore_ascii_case("utf-8") || !encoding.eq_ignore_ascii_case("b") {
        return None;
    }

    STANDARD
        .decode(data)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
}
