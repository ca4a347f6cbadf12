//! Transfer encodings, newline normalisation and line wrapping of text bodies.

use crate::config::{Newline, TransferEncoding, MAX_LINE_LENGTH};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Text body encoder for one transfer encoding
pub trait EncoderCodec: Send + Sync {
    fn encode_text(&self, text: &str, newline: Newline) -> String;
}

/// 7bit codec
///
/// Only normalises line endings, the text itself is passed through.
struct SevenBitCodec();

impl SevenBitCodec {
    pub fn new() -> Self {
        SevenBitCodec()
    }
}

impl EncoderCodec for SevenBitCodec {
    fn encode_text(&self, text: &str, newline: Newline) -> String {
        prep_newlines(text.trim_end_matches(['\r', '\n']), newline)
    }
}

/// Quoted-Printable codec
///
struct QuotedPrintableCodec();

impl QuotedPrintableCodec {
    pub fn new() -> Self {
        QuotedPrintableCodec()
    }
}

impl EncoderCodec for QuotedPrintableCodec {
    fn encode_text(&self, text: &str, newline: Newline) -> String {
        // hard line breaks must reach the encoder as CRLF to survive
        let text = prep_newlines(text, Newline::Crlf);
        // soft breaks are left to `wrap`, which never splits an escape
        let encoded = quoted_printable::encode_to_str(text).replace("=\r\n", "");

        match newline {
            Newline::Crlf => encoded,
            Newline::Lf => encoded.replace("\r\n", "\n"),
        }
    }
}

/// Base64 codec
///
struct Base64Codec();

impl Base64Codec {
    pub fn new() -> Self {
        Base64Codec()
    }
}

impl EncoderCodec for Base64Codec {
    fn encode_text(&self, text: &str, newline: Newline) -> String {
        base64_lines(text.as_bytes(), MAX_LINE_LENGTH, newline)
    }
}

/// 8bit codec
///
struct EightBitCodec();

impl EightBitCodec {
    pub fn new() -> Self {
        EightBitCodec()
    }
}

impl EncoderCodec for EightBitCodec {
    fn encode_text(&self, text: &str, newline: Newline) -> String {
        prep_newlines(text.trim_end_matches(['\r', '\n']), newline)
    }
}

/// Codec for a transfer encoding
pub fn codec(encoding: TransferEncoding) -> Box<dyn EncoderCodec> {
    use self::TransferEncoding::*;
    match encoding {
        SevenBit => Box::new(SevenBitCodec::new()),
        QuotedPrintable => Box::new(QuotedPrintableCodec::new()),
        Base64 => Box::new(Base64Codec::new()),
        EightBit => Box::new(EightBitCodec::new()),
    }
}

/// Encode text with the given transfer encoding
pub fn encode(text: &str, encoding: TransferEncoding, newline: Newline) -> String {
    codec(encoding).encode_text(text, newline)
}

/// Base64 encode binary data into lines of at most `width` characters
///
/// The last line has no trailing newline.
pub fn base64_lines(data: &[u8], width: usize, newline: Newline) -> String {
    let width = width.max(1);
    let encoded = STANDARD.encode(data);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / width * 2);
    let mut rest = encoded.as_str();

    while rest.len() > width {
        let (line, tail) = rest.split_at(width);
        out.push_str(line);
        out.push_str(newline.as_str());
        rest = tail;
    }
    out.push_str(rest);
    out
}

/// Convert CRLF, CR and LF line endings to `newline`
pub fn prep_newlines(text: &str, newline: Newline) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    match newline {
        Newline::Lf => text,
        Newline::Crlf => text.replace('\n', "\r\n"),
    }
}

/// Find a cut position at or before `max_length` in quoted-printable text
/// which splits neither an `=XX` escape nor a multi-byte UTF-8 character
/// spelled as a run of escapes.
///
/// The window before the cut is searched for an escape. ASCII escapes are
/// kept whole, escapes of lead bytes start the next line and escapes of
/// continuation bytes widen the window until the lead byte is found.
pub fn utf8_char_boundary(encoded: &str, max_length: usize) -> usize {
    let bytes = encoded.as_bytes();
    let max_length = max_length.min(bytes.len());
    let mut look_back = 3;

    loop {
        let start = max_length.saturating_sub(look_back);
        let pos = match bytes[start..max_length].iter().position(|b| *b == b'=') {
            Some(offset) => start + offset,
            None => return max_length,
        };

        let value = bytes
            .get(pos + 1..pos + 3)
            .and_then(|hex| std::str::from_utf8(hex).ok())
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .unwrap_or(0);

        if value < 0x80 {
            return if pos == start { max_length } else { pos };
        }
        if value >= 0xC0 || start == 0 {
            return pos;
        }
        look_back += 3;
    }
}

/// Split position for an over-long quoted-printable word, 0 when nothing fits
fn qp_split(word: &str, max_length: usize, is_utf8: bool) -> usize {
    if word.len() <= max_length {
        return word.len();
    }

    let bytes = word.as_bytes();
    let len = if is_utf8 {
        utf8_char_boundary(word, max_length)
    } else if max_length >= 1 && bytes[max_length - 1] == b'=' {
        max_length - 1
    } else if max_length >= 2 && bytes[max_length - 2] == b'=' {
        max_length - 2
    } else {
        max_length
    };

    floor_char_boundary(word, len)
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Cut a word into pieces of at most `width` bytes on character boundaries
fn hard_split(mut word: &str, width: usize) -> Vec<&str> {
    let mut parts = Vec::new();

    while word.len() > width {
        let mut len = floor_char_boundary(word, width);
        if len == 0 {
            len = word.chars().next().map_or(word.len(), char::len_utf8);
        }
        let (part, rest) = word.split_at(len);
        parts.push(part);
        word = rest;
    }
    parts.push(word);
    parts
}

/// Word wrap text to lines of at most `min(width, 76)` bytes
///
/// In quoted-printable mode lines are broken with the soft break `" ="`
/// and over-long words are split with `=` without severing escapes. A zero
/// width only normalises line endings.
pub fn wrap(text: &str, width: usize, charset: &str, newline: Newline, qp_mode: bool) -> String {
    if width == 0 {
        return prep_newlines(text, newline);
    }

    let width = width.min(MAX_LINE_LENGTH);
    let nl = newline.as_str();
    let soft_break = if qp_mode { format!(" ={}", nl) } else { nl.to_string() };
    let is_utf8 = charset.eq_ignore_ascii_case("utf-8");

    let text = prep_newlines(text, newline);
    let text = text.trim_end_matches(['\r', '\n']);

    let mut out = String::with_capacity(text.len() + text.len() / width * 3 + nl.len());

    for line in text.split(nl) {
        let mut buf = String::new();

        for (index, word) in line.split(' ').enumerate() {
            if word.len() <= width {
                let needed = if index == 0 { word.len() } else { buf.len() + 1 + word.len() };
                if needed > width && !buf.is_empty() {
                    out.push_str(&buf);
                    out.push_str(&soft_break);
                    buf.clear();
                } else if index != 0 {
                    buf.push(' ');
                }
                buf.push_str(word);
                continue;
            }

            if !qp_mode {
                if !buf.is_empty() {
                    out.push_str(&buf);
                    out.push_str(&soft_break);
                }
                let mut parts = hard_split(word, width);
                let last = parts.pop().unwrap_or_default();
                for part in parts {
                    out.push_str(part);
                    out.push_str(nl);
                }
                buf = last.to_string();
                continue;
            }

            let mut word = word;
            if index != 0 {
                let space_left = width.saturating_sub(buf.len() + 1);
                let len = if space_left > 20 { qp_split(word, space_left, is_utf8) } else { 0 };

                if len > 0 {
                    let (part, rest) = word.split_at(len);
                    out.push_str(&buf);
                    out.push(' ');
                    out.push_str(part);
                    out.push('=');
                    out.push_str(nl);
                    word = rest;
                } else {
                    out.push_str(&buf);
                    out.push_str(&soft_break);
                }
                buf.clear();
            }

            while !word.is_empty() {
                let mut len = qp_split(word, width, is_utf8);
                if len == 0 {
                    len = hard_split(word, width)[0].len();
                }
                let (part, rest) = word.split_at(len);
                if rest.is_empty() {
                    buf = part.to_string();
                } else {
                    out.push_str(part);
                    out.push('=');
                    out.push_str(nl);
                }
                word = rest;
            }
        }

        out.push_str(&buf);
        out.push_str(nl);
    }

    out
}
