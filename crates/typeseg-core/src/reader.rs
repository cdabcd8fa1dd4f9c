//! Rune sources
//!
//! The segmenter pulls one code point at a time together with its encoded
//! length. Reading is the only place segmentation can block, and an error
//! from the source is how callers cancel.

use std::io::{self, BufRead, BufReader, Read};

/// Yields `(rune, encoded_length)` pairs; `Ok(None)` at end of input
pub trait RuneReader {
    fn read_rune(&mut self) -> io::Result<Option<(char, usize)>>;
}

/// Runes from a string slice
#[derive(Debug, Clone)]
pub struct StrReader<'a> {
    rest: &'a str,
}

impl<'a> StrReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl RuneReader for StrReader<'_> {
    fn read_rune(&mut self) -> io::Result<Option<(char, usize)>> {
        let mut chars = self.rest.chars();
        match chars.next() {
            Some(c) => {
                self.rest = chars.as_str();
                Ok(Some((c, c.len_utf8())))
            }
            None => Ok(None),
        }
    }
}

/// Runes decoded from a UTF-8 byte stream
///
/// Malformed or truncated sequences are reported as
/// [`io::ErrorKind::InvalidData`]; nothing is replaced.
pub struct Utf8Reader<R> {
    inner: BufReader<R>,
    offset: u64,
}

impl<R: Read> Utf8Reader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            offset: 0,
        }
    }

    fn invalid(&self, what: &str) -> io::Error {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{what} at byte {}", self.offset),
        )
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let Some(&b) = buf.first() else {
                return Ok(None);
            };
            self.inner.consume(1);
            return Ok(Some(b));
        }
    }
}

fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

impl<R: Read> RuneReader for Utf8Reader<R> {
    fn read_rune(&mut self) -> io::Result<Option<(char, usize)>> {
        let Some(lead) = self.next_byte()? else {
            return Ok(None);
        };
        let len = sequence_len(lead).ok_or_else(|| self.invalid("invalid UTF-8 lead byte"))?;
        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(len).skip(1) {
            match self.next_byte()? {
                Some(b) => *slot = b,
                None => return Err(self.invalid("truncated UTF-8 sequence")),
            }
        }
        let c = std::str::from_utf8(&buf[..len])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| self.invalid("invalid UTF-8 sequence"))?;
        self.offset += len as u64;
        Ok(Some((c, len)))
    }
}
