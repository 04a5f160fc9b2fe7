// redact-core/src/instruction/scanner.rs
//! Byte cursor over an instruction string.
//!
//! The scanner is the only component that looks at raw bytes. Every decoder
//! pulls classified bytes from it and never indexes the instruction directly.
//! It is total: any byte sequence can be scanned, there is no error state.
//!
//! License: MIT OR APACHE 2.0

/// The bytes that carry grammar meaning. Everything else is content.
pub const STRUCTURAL_BYTES: [u8; 9] = [b'[', b']', b'(', b')', b',', b'"', b'=', b'~', b'|'];

/// A single classified byte produced by [`Scanner::next_byte`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scanned {
    /// An ordinary content byte.
    Content(u8),
    /// One of [`STRUCTURAL_BYTES`].
    Delimiter(u8),
    /// The end of the instruction. Treated as structural by every decoder.
    End,
}

impl Scanned {
    /// Returns `true` for delimiters and for the end of input.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Scanned::Content(_))
    }
}

/// Returns `true` if `byte` is one of the grammar delimiters.
pub fn is_structural(byte: u8) -> bool {
    STRUCTURAL_BYTES.contains(&byte)
}

/// A forward-only cursor that can step back by one byte.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    /// Consumes and classifies the next byte.
    pub fn next_byte(&mut self) -> Scanned {
        let Some(&byte) = self.input.get(self.pos) else {
            return Scanned::End;
        };
        self.pos += 1;
        if is_structural(byte) {
            Scanned::Delimiter(byte)
        } else {
            Scanned::Content(byte)
        }
    }

    /// Steps back over the last consumed byte.
    ///
    /// Used by the token decoder when it over-reads a delimiter that belongs
    /// to its caller. Rewinding at the start of input is a no-op.
    pub fn rewind(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}

impl Iterator for Scanner<'_> {
    type Item = Scanned;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_byte() {
            Scanned::End => None,
            scanned => Some(scanned),
        }
    }
}
