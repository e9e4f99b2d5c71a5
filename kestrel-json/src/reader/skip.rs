use std::ops::Range;

use super::{Capture, Reader};
use crate::error::{JsonErrorKind, Result};

impl Reader<'_> {
    /// Consumes the next value, whatever it is. Nested values are checked
    /// for well-formedness as they are passed over.
    pub fn skip(&mut self) -> Result<()> {
        match self.value_start("a value")? {
            b'"' => self.skip_string_body(),
            b'n' => self.expect_literal(b"ull", "`null`"),
            b't' => self.expect_literal(b"rue", "`true`"),
            b'f' => self.expect_literal(b"alse", "`false`"),
            b'-' | b'0'..=b'9' => {
                self.unread_byte();
                self.scan_number().map(drop)
            }
            b'[' => {
                self.unread_byte();
                self.read_array_cb(Self::skip)
            }
            b'{' => {
                self.unread_byte();
                if self.read_object_start()? {
                    loop {
                        self.skip_key()?;
                        self.skip()?;
                        if !self.read_object_more()? {
                            break;
                        }
                    }
                }
                Ok(())
            }
            b => Err(self.unexpected_token(b, "a value")),
        }
    }

    fn skip_key(&mut self) -> Result<()> {
        match self.next_token() {
            Some(b'"') => self.skip_string_body()?,
            Some(b) => return Err(self.unexpected_token(b, "an object key")),
            None => {
                return Err(self.report(JsonErrorKind::UnexpectedEof {
                    expected: "an object key",
                }));
            }
        }
        match self.next_token() {
            Some(b':') => Ok(()),
            Some(b) => Err(self.unexpected_token(b, "`:`")),
            None => Err(self.report(JsonErrorKind::UnexpectedEof { expected: "`:`" })),
        }
    }

    /// Passes over a string whose opening quote was consumed, without
    /// decoding it.
    fn skip_string_body(&mut self) -> Result<()> {
        loop {
            match self.next_byte() {
                Some(b'"') => return Ok(()),
                Some(b'\\') => {
                    if self.next_byte().is_none() {
                        break;
                    }
                }
                Some(b) if b < 0x20 => {
                    return Err(self.report(JsonErrorKind::ControlCharacter));
                }
                Some(_) => {}
                None => break,
            }
        }
        Err(self.report(JsonErrorKind::UnexpectedEof {
            expected: "closing `\"`",
        }))
    }

    /// Consumes the next value and returns its exact bytes, leading
    /// whitespace excluded.
    pub fn skip_and_return_bytes(&mut self) -> Result<Vec<u8>> {
        self.peek_token();
        self.capture = Some(Capture {
            start: self.head,
            bytes: Vec::new(),
        });
        let skipped = self.skip();
        let capture = self.capture.take();
        skipped?;
        let Some(Capture { start, mut bytes }) = capture else {
            return Ok(Vec::new());
        };
        bytes.extend_from_slice(&self.buf[start..self.head]);
        Ok(bytes)
    }

    /// Consumes the next value and returns where it sits in the input.
    /// Only meaningful for in-memory readers, which never refill.
    pub(crate) fn skip_span(&mut self) -> Result<Range<usize>> {
        self.peek_token();
        let start = self.head;
        self.skip()?;
        Ok(start..self.head)
    }
}
