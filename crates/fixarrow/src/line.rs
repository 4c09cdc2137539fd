//! Line-terminator detection and line iteration over a chunk's byte slice.

use encoding_rs::ISO_8859_1;
use serde::{Deserialize, Serialize};

/// Character-set the source bytes are encoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceEncoding {
    /// UTF-8, terminated by a single `\n` (LF mode).
    Utf8,
    /// Single-byte ISO-8859-1, terminated by `\r\n` (LFCR mode).
    Iso8859_1,
}

impl SourceEncoding {
    /// The line-terminator mode implied by this encoding.
    pub fn terminator_mode(self) -> TerminatorMode {
        match self {
            SourceEncoding::Utf8 => TerminatorMode::Lf,
            SourceEncoding::Iso8859_1 => TerminatorMode::CrLf,
        }
    }
}

/// Line-terminator convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminatorMode {
    /// Single-byte `\n` terminator.
    Lf,
    /// Two-byte `\r\n` terminator.
    CrLf,
}

/// Locate the last line terminator in `bytes` and return the offset
/// immediately *after* it (so that `&bytes[..offset]` is itself
/// terminator-complete and `&bytes[offset..]` is the possibly-partial tail).
///
/// Returns `None` if no terminator is found anywhere in `bytes`.
pub fn find_last_nl(bytes: &[u8], mode: TerminatorMode) -> Option<usize> {
    match mode {
        TerminatorMode::Lf => bytes.iter().rposition(|&b| b == b'\n').map(|p| p + 1),
        TerminatorMode::CrLf => {
            if bytes.len() < 2 {
                return None;
            }
            (0..=bytes.len() - 2)
                .rev()
                .find(|&i| bytes[i] == b'\r' && bytes[i + 1] == b'\n')
                .map(|p| p + 2)
        }
    }
}

/// Iterates a line-terminated byte slice, yielding each line's content
/// (terminator excluded) as an owned `String`, transcoding from
/// [`SourceEncoding::Iso8859_1`] to UTF-8 on the fly when configured.
pub struct LineIter<'a> {
    rest: &'a [u8],
    mode: TerminatorMode,
    encoding: SourceEncoding,
}

impl<'a> LineIter<'a> {
    /// Build an iterator over `bytes` using the given encoding (which also
    /// determines the terminator mode).
    pub fn new(bytes: &'a [u8], encoding: SourceEncoding) -> Self {
        LineIter {
            rest: bytes,
            mode: encoding.terminator_mode(),
            encoding,
        }
    }

    fn terminator_len(&self) -> usize {
        match self.mode {
            TerminatorMode::Lf => 1,
            TerminatorMode::CrLf => 2,
        }
    }

    fn decode(&self, raw: &[u8]) -> String {
        match self.encoding {
            SourceEncoding::Utf8 => String::from_utf8_lossy(raw).into_owned(),
            SourceEncoding::Iso8859_1 => {
                let (decoded, _, _) = ISO_8859_1.decode(raw);
                decoded.into_owned()
            }
        }
    }
}

impl<'a> Iterator for LineIter<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let term_len = self.terminator_len();
        let found = match self.mode {
            TerminatorMode::Lf => self.rest.iter().position(|&b| b == b'\n'),
            TerminatorMode::CrLf => {
                if self.rest.len() < 2 {
                    None
                } else {
                    (0..=self.rest.len() - 2).find(|&i| self.rest[i] == b'\r' && self.rest[i + 1] == b'\n')
                }
            }
        };
        match found {
            Some(pos) => {
                let line = self.decode(&self.rest[..pos]);
                self.rest = &self.rest[pos + term_len..];
                Some(line)
            }
            None => {
                // Unterminated trailing content; yield it once, then stop.
                let line = self.decode(self.rest);
                self.rest = &[];
                Some(line)
            }
        }
    }
}

/// Default per-line field slicer: slice `line` at the given byte offset and
/// length. `consume_line` in `EngineConfig` may override this for non-default
/// slicing (e.g. multi-byte encodings where byte offsets don't line up with
/// `char` boundaries).
pub fn consume_line(line: &str, offset: usize, byte_length: usize) -> Option<&str> {
    line.get(offset..offset + byte_length)
}
