use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::{Reader, StrLoc, stick};
use crate::error::{JsonError, JsonErrorKind, Result};

impl Reader<'_> {
    /// Scan the string whose opening quote was just consumed.
    ///
    /// Escape-free strings stay where they are in the buffer; anything else
    /// is unescaped into scratch.
    pub(super) fn scan_string(&mut self) -> Result<StrLoc> {
        let start = self.head;
        let mut i = start;
        while i < self.tail {
            match self.buf[i] {
                b'"' => {
                    self.head = i + 1;
                    return Ok(StrLoc::Buf(start, i));
                }
                b'\\' => break,
                b if b < 0x20 => {
                    self.head = i;
                    return Err(self.report(JsonErrorKind::ControlCharacter));
                }
                _ => i += 1,
            }
        }
        // escapes, or the string runs past the buffered input
        self.scratch.clear();
        self.scratch.extend_from_slice(&self.buf[start..i]);
        self.head = i;
        self.scan_string_slow()?;
        Ok(StrLoc::Scratch)
    }

    fn scan_string_slow(&mut self) -> Result<()> {
        loop {
            let run_start = self.head;
            while self.head < self.tail {
                match self.buf[self.head] {
                    b'"' | b'\\' => break,
                    b if b < 0x20 => {
                        return Err(self.report(JsonErrorKind::ControlCharacter));
                    }
                    _ => self.head += 1,
                }
            }
            self.scratch
                .extend_from_slice(&self.buf[run_start..self.head]);
            match self.next_byte() {
                Some(b'"') => return Ok(()),
                Some(b'\\') => self.read_escape()?,
                Some(b) if b < 0x20 => {
                    return Err(self.report(JsonErrorKind::ControlCharacter));
                }
                Some(b) => self.scratch.push(b),
                None => {
                    return Err(self.report(JsonErrorKind::UnexpectedEof {
                        expected: "closing `\"`",
                    }));
                }
            }
        }
    }

    fn read_escape(&mut self) -> Result<()> {
        let Some(c) = self.next_byte() else {
            return Err(self.report(JsonErrorKind::UnexpectedEof {
                expected: "an escape sequence",
            }));
        };
        if c != b'u' {
            return self.push_simple_escape(c);
        }
        let unit = self.read_hex4()?;
        if !(0xD800..0xDC00).contains(&unit) {
            self.push_code_unit(unit);
            return Ok(());
        }
        // high surrogate: a low one must follow, else it is replaced
        match self.next_byte() {
            Some(b'\\') => {}
            Some(_) => {
                self.unread_byte();
                self.push_char(char::REPLACEMENT_CHARACTER);
                return Ok(());
            }
            None => {
                return Err(self.report(JsonErrorKind::UnexpectedEof {
                    expected: "closing `\"`",
                }));
            }
        }
        match self.next_byte() {
            Some(b'u') => {}
            Some(c) => {
                self.push_char(char::REPLACEMENT_CHARACTER);
                return self.push_simple_escape(c);
            }
            None => {
                return Err(self.report(JsonErrorKind::UnexpectedEof {
                    expected: "an escape sequence",
                }));
            }
        }
        let low = self.read_hex4()?;
        if (0xDC00..0xE000).contains(&low) {
            let code = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
            self.push_char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
        } else {
            self.push_char(char::REPLACEMENT_CHARACTER);
            self.push_code_unit(low);
        }
        Ok(())
    }

    fn push_simple_escape(&mut self, c: u8) -> Result<()> {
        let byte = match c {
            b'"' | b'\\' | b'/' => c,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            _ => return Err(self.report(JsonErrorKind::InvalidEscape)),
        };
        self.scratch.push(byte);
        Ok(())
    }

    /// A lone UTF-16 code unit; unpaired surrogates become U+FFFD.
    fn push_code_unit(&mut self, unit: u16) {
        let c = char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER);
        self.push_char(c);
    }

    fn push_char(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.scratch
            .extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn read_hex4(&mut self) -> Result<u16> {
        let mut unit = 0u16;
        for _ in 0..4 {
            let digit = match self.next_byte() {
                Some(b) => match (b as char).to_digit(16) {
                    Some(d) => d as u16,
                    None => return Err(self.report(JsonErrorKind::InvalidEscape)),
                },
                None => {
                    return Err(self.report(JsonErrorKind::UnexpectedEof {
                        expected: "four hex digits",
                    }));
                }
            };
            unit = (unit << 4) | digit;
        }
        Ok(unit)
    }

    pub(super) fn loc_bytes(&self, loc: StrLoc) -> &[u8] {
        match loc {
            StrLoc::Buf(start, end) => &self.buf[start..end],
            StrLoc::Scratch => &self.scratch,
        }
    }

    /// Borrow a scanned string as UTF-8.
    pub(super) fn loc_str(&mut self, loc: StrLoc) -> Result<&str> {
        let offset = self.offset();
        let bytes: &[u8] = match loc {
            StrLoc::Buf(start, end) => &self.buf[start..end],
            StrLoc::Scratch => &self.scratch,
        };
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(_) => Err(stick(
                &mut self.error,
                JsonError::new(JsonErrorKind::InvalidUtf8).at(offset),
            )),
        }
    }

    /// Move a string that lives in the input buffer into scratch, so a
    /// refill cannot overwrite it.
    pub(super) fn pin(&mut self, loc: StrLoc) -> StrLoc {
        if let StrLoc::Buf(start, end) = loc
            && self.source.is_some()
        {
            self.scratch.clear();
            self.scratch.extend_from_slice(&self.buf[start..end]);
            return StrLoc::Scratch;
        }
        loc
    }

    /// Reads a string, borrowing it from the input when it has no escapes.
    ///
    /// The returned text is only valid until the next read.
    pub fn read_str(&mut self) -> Result<&str> {
        match self.value_start("a string")? {
            b'"' => {}
            b => return Err(self.unexpected(b, "a string")),
        }
        let loc = self.scan_string()?;
        self.loc_str(loc)
    }

    /// Reads a string into a new `String`.
    pub fn read_string(&mut self) -> Result<String> {
        self.read_str().map(str::to_owned)
    }

    /// Reads a one-character string.
    pub fn read_char(&mut self) -> Result<char> {
        let mut chars = self.read_str()?.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(self.report(JsonErrorKind::TypeMismatch {
                expected: "a single character",
                got: "string",
            })),
        }
    }

    /// Reads a standard base64 string and decodes it.
    pub fn read_base64(&mut self) -> Result<Vec<u8>> {
        let decoded = STANDARD.decode(self.read_str()?);
        decoded.map_err(|e| self.report(JsonErrorKind::InvalidBase64(e.to_string())))
    }
}
