// redact-core/src/instruction/decoder.rs
//! Decoders that turn runs of scanned bytes into raw tokens.
//!
//! There are three strategies sharing one [`Scanner`] cursor:
//!
//! * [`decode_token`] reads a bare, unquoted run up to the next delimiter.
//! * [`decode_string`] reads a double-quoted string with backslash escapes.
//! * [`decode_list`] reads the comma-separated entries of a `[...]` set or a
//!   `(...)` parameter list.
//!
//! Decoders never fail. Malformed input degrades into fewer or odd-looking
//! tokens, and the evaluator compiler rejects chains that make no sense.

use log::warn;

use super::scanner::{Scanned, Scanner};

/// A token as read from the instruction, before literal classification.
///
/// Quoted strings keep their provenance so that the classifier treats them as
/// text even when the content looks numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken {
    Bare(String),
    Quoted(String),
}

fn into_text(buffer: Vec<u8>) -> String {
    match String::from_utf8(buffer) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Reads content bytes until a delimiter or the end of input.
///
/// A delimiter that stops the token is pushed back so the caller can act on it.
pub fn decode_token(scanner: &mut Scanner<'_>) -> String {
    let mut buffer = Vec::new();
    loop {
        match scanner.next_byte() {
            Scanned::Content(byte) => buffer.push(byte),
            Scanned::Delimiter(_) => {
                scanner.rewind();
                break;
            }
            Scanned::End => break,
        }
    }
    into_text(buffer)
}

/// Reads a quoted string. The opening quote must already be consumed.
///
/// A backslash makes the following byte literal, whatever it is, and is not
/// emitted itself, so `\\` yields one backslash and `\"` yields a quote. The
/// string ends at an unescaped quote or at the end of input.
pub fn decode_string(scanner: &mut Scanner<'_>) -> String {
    let mut buffer = Vec::new();
    let mut escaped = false;
    loop {
        let byte = match scanner.next_byte() {
            Scanned::End => break,
            Scanned::Delimiter(b'"') if !escaped => break,
            Scanned::Content(byte) | Scanned::Delimiter(byte) => byte,
        };
        if escaped {
            buffer.push(byte);
            escaped = false;
        } else if byte == b'\\' {
            escaped = true;
        } else {
            buffer.push(byte);
        }
    }
    into_text(buffer)
}

/// Reads the entries of a set or parameter list. The opening bracket must
/// already be consumed.
///
/// Empty entries are dropped, so `[]` and `()` yield no tokens. A `~` in front
/// of a bare entry is kept in the token text for the classifier to find.
pub fn decode_list(scanner: &mut Scanner<'_>) -> Vec<RawToken> {
    fn flush(buffer: &mut Vec<u8>, tokens: &mut Vec<RawToken>) {
        if !buffer.is_empty() {
            tokens.push(RawToken::Bare(into_text(std::mem::take(buffer))));
        }
    }

    let mut tokens = Vec::new();
    let mut buffer = Vec::new();
    loop {
        match scanner.next_byte() {
            Scanned::Content(byte) | Scanned::Delimiter(byte @ b'~') => buffer.push(byte),
            Scanned::End | Scanned::Delimiter(b']') | Scanned::Delimiter(b')') => {
                flush(&mut buffer, &mut tokens);
                return tokens;
            }
            Scanned::Delimiter(b',') => flush(&mut buffer, &mut tokens),
            Scanned::Delimiter(b'"') => {
                flush(&mut buffer, &mut tokens);
                tokens.push(RawToken::Quoted(decode_string(scanner)));
            }
            Scanned::Delimiter(other) => {
                warn!(
                    "Skipping unexpected '{}' inside a list at byte {}.",
                    other as char,
                    scanner.offset() - 1
                );
            }
        }
    }
}
