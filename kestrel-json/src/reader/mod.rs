//! Pull-based JSON tokenizer.
//!
//! A [`Reader`] walks its input once, front to back. It reads either from a
//! borrowed slice or from an [`io::Read`] source, refilling a fixed-size
//! buffer whenever it runs dry. Errors are sticky: the first real error is
//! kept on the reader (see [`Reader::take_error`]) and the reader behaves as
//! exhausted afterwards.

use std::borrow::Cow;
use std::io;

use crate::error::{JsonError, JsonErrorKind, Result};
use crate::Api;

mod number;
pub(crate) use number::validate_number;
mod object;
mod skip;
mod string;

/// Refill buffer size for streaming readers.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// The kind of the next JSON value, judged from its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Not the start of any JSON value
    Invalid,
    /// `"..."`
    String,
    /// `-1.5e3`
    Number,
    /// `null`
    Null,
    /// `true` or `false`
    Bool,
    /// `[...]`
    Array,
    /// `{...}`
    Object,
}

impl ValueType {
    /// Classify a value by its first byte.
    pub const fn from_first_byte(b: u8) -> Self {
        match b {
            b'"' => ValueType::String,
            b'-' | b'0'..=b'9' => ValueType::Number,
            b'n' => ValueType::Null,
            b't' | b'f' => ValueType::Bool,
            b'[' => ValueType::Array,
            b'{' => ValueType::Object,
            _ => ValueType::Invalid,
        }
    }

    /// Human-readable name, for error messages.
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Invalid => "invalid",
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Null => "null",
            ValueType::Bool => "boolean",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }
}

/// Bytes being recorded for [`Reader::skip_and_return_bytes`], carried
/// across refills.
struct Capture {
    start: usize,
    bytes: Vec<u8>,
}

/// Where a just-scanned string lives.
#[derive(Clone, Copy)]
enum StrLoc {
    /// Unescaped, directly in the input buffer
    Buf(usize, usize),
    /// Unescaped into the scratch buffer
    Scratch,
}

/// A forward-only JSON tokenizer.
pub struct Reader<'a> {
    api: Api,
    buf: Cow<'a, [u8]>,
    head: usize,
    tail: usize,
    /// bytes dropped by earlier refills, for error offsets
    consumed: usize,
    source: Option<Box<dyn io::Read + 'a>>,
    error: Option<JsonError>,
    scratch: Vec<u8>,
    capture: Option<Capture>,
    depth: usize,
    fold_case: bool,
    max_depth: usize,
}

impl<'a> Reader<'a> {
    /// A reader over an in-memory document.
    pub fn new(api: &Api, input: &'a [u8]) -> Self {
        let config = api.config();
        Reader {
            api: api.clone(),
            buf: Cow::Borrowed(input),
            head: 0,
            tail: input.len(),
            consumed: 0,
            source: None,
            error: None,
            scratch: api.pools().scratch.take(),
            capture: None,
            depth: 0,
            fold_case: config.case_insensitive,
            max_depth: config.max_depth,
        }
    }

    /// A reader that pulls from `source` through a buffer of `buffer_size`
    /// bytes.
    pub fn from_read(api: &Api, source: impl io::Read + 'a, buffer_size: usize) -> Self {
        let mut buf = api.pools().stream.take();
        buf.resize(buffer_size.max(1), 0);
        let mut reader = Reader::new(api, &[]);
        reader.buf = Cow::Owned(buf);
        reader.source = Some(Box::new(source));
        reader
    }

    /// Restart on a new in-memory document, keeping the pooled buffers.
    pub fn reset_bytes(&mut self, input: &'a [u8]) {
        if let Cow::Owned(buf) = std::mem::replace(&mut self.buf, Cow::Borrowed(input)) {
            self.api.pools().stream.give(buf);
        }
        self.head = 0;
        self.tail = input.len();
        self.consumed = 0;
        self.source = None;
        self.error = None;
        self.capture = None;
        self.depth = 0;
    }

    /// The API this reader decodes for.
    pub fn api(&self) -> &Api {
        &self.api
    }

    /// Byte offset of the read position from the start of the input.
    pub fn offset(&self) -> usize {
        self.consumed + self.head
    }

    /// Current container nesting.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The first error recorded, including a clean end of input.
    pub fn error(&self) -> Option<&JsonError> {
        self.error.as_ref()
    }

    /// Take the first real error, if any. A clean end of input is not
    /// reported.
    pub fn take_error(&mut self) -> Option<JsonError> {
        match self.error.take() {
            Some(err) if err.is_eof() => None,
            other => other,
        }
    }

    /// Record `kind` at the current position and return it as an error.
    pub fn report(&mut self, kind: JsonErrorKind) -> JsonError {
        let err = JsonError::new(kind)
            .at(self.offset())
            .with_context(self.snippet());
        let err = stick(&mut self.error, err);
        if !err.is_eof() {
            // behave as exhausted from now on
            self.head = self.tail;
            self.source = None;
        }
        err
    }

    fn snippet(&self) -> String {
        let start = self.head.saturating_sub(12);
        let end = (self.head + 12).min(self.tail);
        String::from_utf8_lossy(&self.buf[start..end]).into_owned()
    }

    /// Refill from the source. Returns false at the end of input.
    fn load_more(&mut self) -> bool {
        let Some(source) = self.source.as_mut() else {
            return false;
        };
        if let Some(capture) = &mut self.capture {
            capture
                .bytes
                .extend_from_slice(&self.buf[capture.start..self.tail]);
            capture.start = 0;
        }
        self.consumed += self.tail;
        self.head = 0;
        self.tail = 0;
        let buf = self.buf.to_mut();
        let result = loop {
            match source.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other,
            }
        };
        match result {
            Ok(0) => {
                trace!(offset = self.consumed, "source exhausted");
                self.source = None;
                false
            }
            Ok(n) => {
                self.tail = n;
                true
            }
            Err(e) => {
                self.report(JsonErrorKind::Io(e.to_string()));
                false
            }
        }
    }

    /// Next raw byte, without skipping whitespace.
    #[inline]
    fn next_byte(&mut self) -> Option<u8> {
        if self.head == self.tail && !self.load_more() {
            return None;
        }
        let b = self.buf[self.head];
        self.head += 1;
        Some(b)
    }

    /// Step back over the byte just returned by `next_byte` or
    /// `next_token`.
    #[inline]
    fn unread_byte(&mut self) {
        self.head -= 1;
    }

    /// Consume whitespace and return the next significant byte.
    pub fn next_token(&mut self) -> Option<u8> {
        loop {
            while self.head < self.tail {
                let b = self.buf[self.head];
                self.head += 1;
                if !matches!(b, b' ' | b'\n' | b'\t' | b'\r') {
                    return Some(b);
                }
            }
            if !self.load_more() {
                return None;
            }
        }
    }

    /// Consume whitespace and peek at the next significant byte.
    pub fn peek_token(&mut self) -> Option<u8> {
        let b = self.next_token()?;
        self.unread_byte();
        Some(b)
    }

    /// Classify the next value without consuming it.
    pub fn what_is_next(&mut self) -> ValueType {
        self.peek_token()
            .map_or(ValueType::Invalid, ValueType::from_first_byte)
    }

    /// Consume the first byte of a value. Running out of input here is a
    /// clean end only between top-level values.
    fn value_start(&mut self, expected: &'static str) -> Result<u8> {
        match self.next_token() {
            Some(b) => Ok(b),
            None if self.depth == 0 => Err(self.report(JsonErrorKind::Eof)),
            None => Err(self.report(JsonErrorKind::UnexpectedEof { expected })),
        }
    }

    /// Error for a byte that cannot start `expected`. A byte that starts a
    /// different kind of value is a type mismatch.
    fn unexpected(&mut self, got: u8, expected: &'static str) -> JsonError {
        let kind = match ValueType::from_first_byte(got) {
            ValueType::Invalid => JsonErrorKind::UnexpectedToken {
                got: describe_byte(got),
                expected,
            },
            other => JsonErrorKind::TypeMismatch {
                expected,
                got: other.name(),
            },
        };
        self.report(kind)
    }

    fn unexpected_token(&mut self, got: u8, expected: &'static str) -> JsonError {
        self.report(JsonErrorKind::UnexpectedToken {
            got: describe_byte(got),
            expected,
        })
    }

    /// Consume `rest`, the tail of a literal whose first byte was read.
    fn expect_literal(&mut self, rest: &'static [u8], literal: &'static str) -> Result<()> {
        for &expected in rest {
            match self.next_byte() {
                Some(b) if b == expected => {}
                Some(b) => return Err(self.unexpected_token(b, literal)),
                None => {
                    return Err(self.report(JsonErrorKind::UnexpectedEof { expected: literal }));
                }
            }
        }
        Ok(())
    }

    /// Reads `null` if it is next. Anything else is left unread.
    pub fn read_null(&mut self) -> Result<bool> {
        if self.peek_token() != Some(b'n') {
            return Ok(false);
        }
        self.head += 1;
        self.expect_literal(b"ull", "`null`")?;
        Ok(true)
    }

    /// Reads `true` or `false`.
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.value_start("a boolean")? {
            b't' => self.expect_literal(b"rue", "`true`").map(|()| true),
            b'f' => self.expect_literal(b"alse", "`false`").map(|()| false),
            b => Err(self.unexpected(b, "a boolean")),
        }
    }

    /// Fails unless only whitespace remains.
    pub fn ensure_end(&mut self) -> Result<()> {
        match self.peek_token() {
            None => match self.take_error() {
                Some(err) => Err(err),
                None => Ok(()),
            },
            Some(_) => Err(self.report(JsonErrorKind::TrailingCharacters)),
        }
    }

    /// Decode the next value into `target` using the compiled decoder for
    /// `T`.
    pub fn read_val<T: kestrel_core::Reflect>(&mut self, target: &mut T) -> Result<()> {
        let decoder = self.api.decoder_for(T::SHAPE)?;
        decoder.decode(target, self)
    }

    /// Decode the next value into a fresh `T`.
    pub fn read<T: kestrel_core::Reflect + Default>(&mut self) -> Result<T> {
        let mut value = T::default();
        self.read_val(&mut value)?;
        Ok(value)
    }
}

impl Drop for Reader<'_> {
    fn drop(&mut self) {
        let pools = self.api.pools();
        pools.scratch.give(std::mem::take(&mut self.scratch));
        if let Cow::Owned(buf) = std::mem::take(&mut self.buf) {
            pools.stream.give(buf);
        }
    }
}

/// Keep the first real error and hand it back for every later failure; a
/// clean end of input may be replaced.
fn stick(slot: &mut Option<JsonError>, err: JsonError) -> JsonError {
    match slot {
        Some(kept) if !kept.is_eof() => kept.clone(),
        _ => {
            *slot = Some(err.clone());
            err
        }
    }
}

fn describe_byte(b: u8) -> String {
    if b.is_ascii_graphic() {
        format!("`{}`", b as char)
    } else {
        format!("byte 0x{b:02x}")
    }
}
