//! JSON emission.

use std::io;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::{JsonError, JsonErrorKind, Result};
use crate::Api;

/// Once a sink-backed writer buffers this many bytes, it flushes.
pub const FLUSH_THRESHOLD: usize = 512;

/// Emits JSON tokens into a growable buffer, optionally draining it into an
/// [`io::Write`] sink.
///
/// The writer does not track where commas go: callers write
/// [`write_more`](Writer::write_more) between siblings. Errors are sticky;
/// after the first one, every write is a no-op and the error is kept in
/// [`error`](Writer::error).
pub struct Writer<'w> {
    api: Api,
    buf: Vec<u8>,
    sink: Option<&'w mut dyn io::Write>,
    error: Option<JsonError>,
    indent_step: usize,
    indent: usize,
    escape_html: bool,
    float_precision: Option<u8>,
}

impl Writer<'static> {
    /// A writer that only buffers.
    pub fn new(api: &Api) -> Self {
        Writer::build(api, None)
    }
}

impl<'w> Writer<'w> {
    /// A writer that drains into `sink`.
    pub fn to_sink(api: &Api, sink: &'w mut dyn io::Write) -> Self {
        Writer::build(api, Some(sink))
    }

    fn build(api: &Api, sink: Option<&'w mut dyn io::Write>) -> Self {
        let config = api.config();
        Writer {
            api: api.clone(),
            buf: api.pools().writer.take(),
            sink,
            error: None,
            indent_step: config.indent,
            indent: 0,
            escape_html: config.escape_html,
            float_precision: config.float_precision,
        }
    }

    /// The API this writer encodes for.
    pub fn api(&self) -> &Api {
        &self.api
    }

    /// Bytes written and not yet flushed.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Copy of the buffered bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.buf.clone()
    }

    /// Drop buffered output and any recorded error.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.error = None;
        self.indent = 0;
    }

    /// The first error recorded.
    pub fn error(&self) -> Option<&JsonError> {
        self.error.as_ref()
    }

    /// Take the first error recorded, clearing it.
    pub fn take_error(&mut self) -> Option<JsonError> {
        self.error.take()
    }

    /// Record an error. Only the first one is kept.
    pub fn report(&mut self, kind: JsonErrorKind) -> JsonError {
        let err = JsonError::new(kind);
        if self.error.is_none() {
            self.error = Some(err.clone());
        }
        err
    }

    /// Fails with the recorded error, if there is one.
    pub fn check(&self) -> Result<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    #[inline]
    fn ok(&self) -> bool {
        self.error.is_none()
    }

    /// Write out everything buffered. A no-op without a sink.
    pub fn flush(&mut self) -> Result<()> {
        self.check()?;
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };
        let result = sink.write_all(&self.buf).and_then(|()| sink.flush());
        match result {
            Ok(()) => {
                trace!(bytes = self.buf.len(), "flushed");
                self.buf.clear();
                Ok(())
            }
            Err(e) => Err(self.report(JsonErrorKind::Io(e.to_string()))),
        }
    }

    fn maybe_flush(&mut self) {
        if self.sink.is_some() && self.buf.len() >= FLUSH_THRESHOLD {
            // a failure is recorded and short-circuits later writes
            let _ = self.flush();
        }
    }

    fn newline_indent(&mut self) {
        if self.indent_step > 0 {
            self.buf.push(b'\n');
            self.buf.resize(self.buf.len() + self.indent, b' ');
        }
    }

    /// Write bytes verbatim. The caller vouches that they are valid JSON in
    /// this position.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        if self.ok() {
            self.buf.extend_from_slice(bytes);
            self.maybe_flush();
        }
    }

    /// `null`
    pub fn write_null(&mut self) {
        if self.ok() {
            self.buf.extend_from_slice(b"null");
            self.maybe_flush();
        }
    }

    /// `true` or `false`
    pub fn write_bool(&mut self, value: bool) {
        if self.ok() {
            self.buf
                .extend_from_slice(if value { b"true" } else { b"false" });
            self.maybe_flush();
        }
    }

    /// Separator between siblings.
    pub fn write_more(&mut self) {
        if self.ok() {
            self.buf.push(b',');
            self.newline_indent();
            self.maybe_flush();
        }
    }

    /// `{` of a non-empty object.
    pub fn write_object_start(&mut self) {
        if self.ok() {
            self.buf.push(b'{');
            self.indent += self.indent_step;
            self.newline_indent();
        }
    }

    /// `}` of a non-empty object.
    pub fn write_object_end(&mut self) {
        if self.ok() {
            self.indent = self.indent.saturating_sub(self.indent_step);
            self.newline_indent();
            self.buf.push(b'}');
            self.maybe_flush();
        }
    }

    /// `{}`
    pub fn write_empty_object(&mut self) {
        if self.ok() {
            self.buf.extend_from_slice(b"{}");
        }
    }

    /// `[` of a non-empty array.
    pub fn write_array_start(&mut self) {
        if self.ok() {
            self.buf.push(b'[');
            self.indent += self.indent_step;
            self.newline_indent();
        }
    }

    /// `]` of a non-empty array.
    pub fn write_array_end(&mut self) {
        if self.ok() {
            self.indent = self.indent.saturating_sub(self.indent_step);
            self.newline_indent();
            self.buf.push(b']');
            self.maybe_flush();
        }
    }

    /// `[]`
    pub fn write_empty_array(&mut self) {
        if self.ok() {
            self.buf.extend_from_slice(b"[]");
        }
    }

    /// An object key and its colon.
    pub fn write_object_field(&mut self, name: &str) {
        if self.ok() {
            self.write_string(name);
            self.buf.push(b':');
            if self.indent_step > 0 {
                self.buf.push(b' ');
            }
        }
    }

    /// A quoted, escaped string.
    pub fn write_string(&mut self, s: &str) {
        if self.ok() {
            write_escaped(&mut self.buf, s, self.escape_html);
            self.maybe_flush();
        }
    }

    /// A string of standard base64.
    pub fn write_base64(&mut self, bytes: &[u8]) {
        if self.ok() {
            self.buf.push(b'"');
            let start = self.buf.len();
            let len = base64::encoded_len(bytes.len(), true).unwrap_or_default();
            self.buf.resize(start + len, 0);
            match STANDARD.encode_slice(bytes, &mut self.buf[start..]) {
                Ok(written) => self.buf.truncate(start + written),
                Err(e) => {
                    self.buf.truncate(start);
                    self.report(JsonErrorKind::Custom(e.to_string()));
                    return;
                }
            }
            self.buf.push(b'"');
            self.maybe_flush();
        }
    }

    /// `f64`; NaN and infinities have no JSON form and record an error.
    pub fn write_f64(&mut self, value: f64) {
        if !self.ok() {
            return;
        }
        if !value.is_finite() {
            self.report(JsonErrorKind::UnsupportedValue("NaN or infinite float"));
            return;
        }
        match self.float_precision {
            Some(digits) => write_fixed(&mut self.buf, value, digits),
            None => write_shortest(&mut self.buf, value),
        }
        self.maybe_flush();
    }

    /// `f32`; NaN and infinities have no JSON form and record an error.
    pub fn write_f32(&mut self, value: f32) {
        if !self.ok() {
            return;
        }
        if !value.is_finite() {
            self.report(JsonErrorKind::UnsupportedValue("NaN or infinite float"));
            return;
        }
        match self.float_precision {
            Some(digits) => write_fixed(&mut self.buf, f64::from(value), digits),
            None => write_shortest(&mut self.buf, value),
        }
        self.maybe_flush();
    }
}

macro_rules! write_int {
    ($($name:ident => $ty:ty),* $(,)?) => {
        impl Writer<'_> {
            $(
                #[doc = concat!("A `", stringify!($ty), "`.")]
                pub fn $name(&mut self, value: $ty) {
                    if self.ok() {
                        let mut digits = itoa::Buffer::new();
                        self.buf.extend_from_slice(digits.format(value).as_bytes());
                        self.maybe_flush();
                    }
                }
            )*
        }
    };
}

write_int! {
    write_i8 => i8,
    write_i16 => i16,
    write_i32 => i32,
    write_i64 => i64,
    write_isize => isize,
    write_u8 => u8,
    write_u16 => u16,
    write_u32 => u32,
    write_u64 => u64,
    write_usize => usize,
}

impl Drop for Writer<'_> {
    fn drop(&mut self) {
        self.api.pools().writer.give(std::mem::take(&mut self.buf));
    }
}

/// Shortest representation that reads back to the same float. Integral
/// values are written without a fractional part.
fn write_shortest<F: ryu::Float>(out: &mut Vec<u8>, value: F) {
    let mut digits = ryu::Buffer::new();
    let text = digits.format_finite(value);
    let text = text.strip_suffix(".0").unwrap_or(text);
    out.extend_from_slice(text.as_bytes());
}

/// At most `digits` fractional digits, trailing zeros trimmed.
fn write_fixed(out: &mut Vec<u8>, value: f64, digits: u8) {
    let text = format!("{value:.prec$}", prec = usize::from(digits));
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        &text
    };
    let text = if text == "-0" { "0" } else { text };
    out.extend_from_slice(text.as_bytes());
}

#[inline]
fn needs_escape(b: u8, escape_html: bool) -> bool {
    b < 0x20 || b == b'"' || b == b'\\' || (escape_html && matches!(b, b'<' | b'>' | b'&'))
}

/// Write `s` as a quoted JSON string.
///
/// Runs of bytes that need no escaping are copied whole, sixteen at a time
/// where possible.
pub(crate) fn write_escaped(out: &mut Vec<u8>, s: &str, escape_html: bool) {
    const STEP: usize = 16;

    out.push(b'"');
    let bytes = s.as_bytes();
    let mut run_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if let Some(chunk) = bytes.get(i..i + STEP)
            && let Ok(chunk) = <[u8; STEP]>::try_from(chunk)
            && chunk_is_clean(u128::from_ne_bytes(chunk), escape_html)
        {
            i += STEP;
            continue;
        }
        let b = bytes[i];
        if !needs_escape(b, escape_html) && !(escape_html && is_line_separator(&bytes[i..])) {
            i += 1;
            continue;
        }
        out.extend_from_slice(&bytes[run_start..i]);
        if is_line_separator(&bytes[i..]) {
            // U+2028 and U+2029 break JavaScript string literals
            out.extend_from_slice(if bytes[i + 2] == 0xa8 {
                b"\\u2028"
            } else {
                b"\\u2029"
            });
            i += 3;
        } else {
            write_escaped_byte(out, b);
            i += 1;
        }
        run_start = i;
    }
    out.extend_from_slice(&bytes[run_start..]);
    out.push(b'"');
}

fn is_line_separator(rest: &[u8]) -> bool {
    matches!(rest, [0xe2, 0x80, 0xa8 | 0xa9, ..])
}

fn write_escaped_byte(out: &mut Vec<u8>, b: u8) {
    match b {
        b'"' => out.extend_from_slice(b"\\\""),
        b'\\' => out.extend_from_slice(b"\\\\"),
        b'\n' => out.extend_from_slice(b"\\n"),
        b'\r' => out.extend_from_slice(b"\\r"),
        b'\t' => out.extend_from_slice(b"\\t"),
        0x08 => out.extend_from_slice(b"\\b"),
        0x0c => out.extend_from_slice(b"\\f"),
        _ => {
            const HEX: &[u8; 16] = b"0123456789abcdef";
            out.extend_from_slice(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX[usize::from(b >> 4)],
                HEX[usize::from(b & 0xf)],
            ]);
        }
    }
}

/// True if none of the sixteen bytes needs escaping. Non-ASCII bytes pass
/// only when HTML escaping is off, since it also rewrites U+2028/U+2029.
#[inline]
const fn chunk_is_clean(window: u128, escape_html: bool) -> bool {
    let ascii = window & 0x8080_8080_8080_8080_8080_8080_8080_8080 == 0;
    if escape_html
        && (!ascii
            || contains_byte(window, b'<')
            || contains_byte(window, b'>')
            || contains_byte(window, b'&'))
    {
        return false;
    }
    !contains_byte(window, b'"') && !contains_byte(window, b'\\') && no_control_chars(window)
}

/// SWAR test for `byte` among the sixteen bytes of `window`.
#[inline]
const fn contains_byte(window: u128, byte: u8) -> bool {
    let xor = window ^ (0x0101_0101_0101_0101_0101_0101_0101_0101u128 * byte as u128);
    let has_zero = xor.wrapping_sub(0x0101_0101_0101_0101_0101_0101_0101_0101)
        & !xor
        & 0x8080_8080_8080_8080_8080_8080_8080_8080;
    has_zero != 0
}

/// All bytes are `>= 0x20`.
#[inline]
const fn no_control_chars(window: u128) -> bool {
    let masked = window & 0xe0e0_e0e0_e0e0_e0e0_e0e0_e0e0_e0e0_e0e0;
    let has_zero = masked.wrapping_sub(0x0101_0101_0101_0101_0101_0101_0101_0101)
        & !masked
        & 0x8080_8080_8080_8080_8080_8080_8080_8080;
    has_zero == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn escaped(s: &str, html: bool) -> String {
        let mut out = Vec::new();
        write_escaped(&mut out, s, html);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn escapes() {
        assert_eq!(escaped("plain", false), r#""plain""#);
        assert_eq!(escaped("a\"b\\c\nd\u{1}", false), r#""a\"b\\c\nd\u0001""#);
        assert_eq!(escaped("<a&b>", false), r#""<a&b>""#);
        assert_eq!(escaped("<a&b>", true), r#""\u003ca\u0026b\u003e""#);
        assert_eq!(escaped("é\u{2028}", true), "\"é\\u2028\"");
        assert_eq!(escaped("é\u{2028}", false), "\"é\u{2028}\"");
    }

    #[test]
    fn long_strings_take_the_chunked_path() {
        let clean = "abcdefghijklmnopqrstuvwxyz0123456789";
        assert_eq!(escaped(clean, false), format!("\"{clean}\""));
        let dirty = "abcdefghijklmnop\"qrstuvwxyz\t0123456789";
        assert_eq!(
            escaped(dirty, false),
            "\"abcdefghijklmnop\\\"qrstuvwxyz\\t0123456789\""
        );
    }

    #[test]
    fn html_mode_escapes_inside_chunks() {
        let s = "0123456789abcdef<0123456789abcdef";
        assert_eq!(
            escaped(s, true),
            "\"0123456789abcdef\\u003c0123456789abcdef\""
        );
    }

    #[test]
    fn numbers() {
        let mut w = Writer::new(crate::api());
        w.write_i64(-42);
        w.write_more();
        w.write_u8(255);
        w.write_more();
        w.write_f64(1.5);
        w.write_more();
        w.write_f64(3.0);
        w.write_more();
        w.write_f32(0.1);
        assert_eq!(w.buffered(), b"-42,255,1.5,3,0.1");
    }

    #[test]
    fn float_precision_trims_zeros() {
        let api = Config::fastest().freeze();
        let mut w = Writer::new(&api);
        w.write_f64(1.0 / 3.0);
        w.write_more();
        w.write_f64(2.5);
        w.write_more();
        w.write_f64(7.0);
        w.write_more();
        w.write_f64(-0.0000001);
        assert_eq!(w.buffered(), b"0.333333,2.5,7,0");
    }

    #[test]
    fn nan_is_sticky() {
        let mut w = Writer::new(crate::api());
        w.write_array_start();
        w.write_f64(f64::NAN);
        w.write_more();
        w.write_i32(1);
        assert_eq!(w.buffered(), b"[");
        assert!(matches!(
            w.check().unwrap_err().kind,
            JsonErrorKind::UnsupportedValue(_)
        ));
    }

    #[test]
    fn pretty_printing() {
        let api = Config::new().indent(2).freeze();
        let mut w = Writer::new(&api);
        w.write_object_start();
        w.write_object_field("a");
        w.write_array_start();
        w.write_i32(1);
        w.write_more();
        w.write_i32(2);
        w.write_array_end();
        w.write_more();
        w.write_object_field("b");
        w.write_empty_object();
        w.write_object_end();
        assert_eq!(
            std::str::from_utf8(w.buffered()).unwrap(),
            "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {}\n}"
        );
    }

    #[test]
    fn base64() {
        let mut w = Writer::new(crate::api());
        w.write_base64(b"abc");
        assert_eq!(w.buffered(), br#""YWJj""#);
    }

    #[test]
    fn sink_flushes_past_threshold() {
        let mut sink = Vec::new();
        {
            let mut w = Writer::to_sink(crate::api(), &mut sink);
            w.write_array_start();
            for i in 0..200 {
                if i > 0 {
                    w.write_more();
                }
                w.write_i32(i);
            }
            assert!(w.buffered().len() < FLUSH_THRESHOLD);
            w.write_array_end();
            w.flush().unwrap();
        }
        let text = String::from_utf8(sink).unwrap();
        assert!(text.starts_with("[0,1,2,"));
        assert!(text.ends_with(",199]"));
    }

    #[test]
    fn scalars_flush_past_threshold() {
        let long = "x".repeat(FLUSH_THRESHOLD * 2);
        let mut sink = Vec::new();
        {
            let mut w = Writer::to_sink(crate::api(), &mut sink);
            w.write_string(&long);
            assert!(w.buffered().is_empty());
            for _ in 0..FLUSH_THRESHOLD {
                w.write_null();
                assert!(w.buffered().len() < FLUSH_THRESHOLD);
            }
            for i in 0..FLUSH_THRESHOLD as u64 {
                w.write_u64(u64::MAX - i);
                assert!(w.buffered().len() < FLUSH_THRESHOLD);
            }
            w.flush().unwrap();
        }
        assert_eq!(sink.len(), long.len() + 2 + 4 * FLUSH_THRESHOLD + 20 * FLUSH_THRESHOLD);
        assert!(sink.starts_with(b"\"xxx"));
    }
}
