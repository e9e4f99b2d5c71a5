//! Parsing of raw value bytes, done only when asked.

use std::ops::Range;

use bytes::Bytes;
use lexical_parse_float::FromLexical as _;
use lexical_parse_integer::FromLexical as _;

use super::Any;
use crate::error::Result;
use crate::reader::validate_number;
use crate::{Api, Reader};

/// A number, once parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Num {
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl Num {
    pub(crate) fn to_i64(self) -> i64 {
        match self {
            Num::Int(v) => v,
            Num::Uint(v) => i64::try_from(v).unwrap_or(i64::MAX),
            // saturating, NaN is 0
            Num::Float(v) => v as i64,
        }
    }

    pub(crate) fn to_u64(self) -> u64 {
        match self {
            Num::Int(v) => u64::try_from(v).unwrap_or(0),
            Num::Uint(v) => v,
            Num::Float(v) => v as u64,
        }
    }

    pub(crate) fn to_f64(self) -> f64 {
        match self {
            Num::Int(v) => v as f64,
            Num::Uint(v) => v as f64,
            Num::Float(v) => v,
        }
    }

    pub(crate) fn is_zero(self) -> bool {
        match self {
            Num::Int(v) => v == 0,
            Num::Uint(v) => v == 0,
            Num::Float(v) => v == 0.0,
        }
    }
}

/// Parses a complete JSON number. Integers that fit 64 bits stay exact.
pub(crate) fn parse_number(text: &[u8]) -> Option<Num> {
    let is_float = validate_number(text).ok()?;
    if !is_float {
        if let Ok(v) = i64::from_lexical(text) {
            return Some(Num::Int(v));
        }
        if let Ok(v) = u64::from_lexical(text) {
            return Some(Num::Uint(v));
        }
    }
    f64::from_lexical(text).ok().map(Num::Float)
}

/// The bytes of one JSON value, with the API to parse them.
#[derive(Clone)]
pub(crate) struct Lazy {
    pub(crate) bytes: Bytes,
    pub(crate) api: Api,
}

impl Lazy {
    fn reader(&self) -> Reader<'_> {
        Reader::new(&self.api, &self.bytes)
    }

    fn child(&self, span: Range<usize>) -> Any {
        Any::from_bytes(&self.api, self.bytes.slice(span))
    }

    /// The first member named `key`.
    pub(crate) fn member(&self, key: &str) -> Result<Option<Any>> {
        let mut reader = self.reader();
        if !reader.read_object_start()? {
            return Ok(None);
        }
        loop {
            let found = reader.read_field_name()? == key;
            let span = reader.skip_span()?;
            if found {
                return Ok(Some(self.child(span)));
            }
            if !reader.read_object_more()? {
                return Ok(None);
            }
        }
    }

    /// The element at `index`.
    pub(crate) fn element(&self, index: usize) -> Result<Option<Any>> {
        let mut reader = self.reader();
        if !reader.read_array_start()? {
            return Ok(None);
        }
        let mut at = 0;
        loop {
            let span = reader.skip_span()?;
            if at == index {
                return Ok(Some(self.child(span)));
            }
            at += 1;
            if !reader.read_array_more()? {
                return Ok(None);
            }
        }
    }

    pub(crate) fn members(&self) -> Result<Vec<(String, Any)>> {
        let mut reader = self.reader();
        let mut members = Vec::new();
        if !reader.read_object_start()? {
            return Ok(members);
        }
        loop {
            let key = reader.read_field_name()?.to_owned();
            let span = reader.skip_span()?;
            members.push((key, self.child(span)));
            if !reader.read_object_more()? {
                return Ok(members);
            }
        }
    }

    pub(crate) fn elements(&self) -> Result<Vec<Any>> {
        let mut reader = self.reader();
        let mut elements = Vec::new();
        if !reader.read_array_start()? {
            return Ok(elements);
        }
        loop {
            let span = reader.skip_span()?;
            elements.push(self.child(span));
            if !reader.read_array_more()? {
                return Ok(elements);
            }
        }
    }

    pub(crate) fn keys(&self) -> Result<Vec<String>> {
        let mut reader = self.reader();
        let mut keys = Vec::new();
        reader.read_object_cb(|reader, key| {
            keys.push(key.to_owned());
            reader.skip()
        })?;
        Ok(keys)
    }

    pub(crate) fn object_len(&self) -> Result<usize> {
        let mut reader = self.reader();
        let mut len = 0;
        reader.read_object_cb(|reader, _| {
            len += 1;
            reader.skip()
        })?;
        Ok(len)
    }

    pub(crate) fn array_len(&self) -> Result<usize> {
        let mut reader = self.reader();
        let mut len = 0;
        reader.read_array_cb(|reader| {
            len += 1;
            reader.skip()
        })?;
        Ok(len)
    }

    /// True unless the container's brackets close immediately.
    pub(crate) fn has_contents(&self) -> bool {
        let inner = self.bytes.get(1..).unwrap_or_default();
        inner
            .iter()
            .find(|b| !matches!(b, b' ' | b'\n' | b'\t' | b'\r'))
            .is_some_and(|b| !matches!(b, b']' | b'}'))
    }

    pub(crate) fn string(&self) -> Result<String> {
        self.reader().read_string()
    }

    pub(crate) fn number(&self) -> Option<Num> {
        parse_number(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_keep_integer_precision() {
        assert_eq!(parse_number(b"-12"), Some(Num::Int(-12)));
        assert_eq!(
            parse_number(b"18446744073709551615"),
            Some(Num::Uint(u64::MAX))
        );
        assert_eq!(parse_number(b"1e2"), Some(Num::Float(100.0)));
        assert_eq!(parse_number(b"01"), None);
        assert_eq!(parse_number(b"1 "), None);
    }

    #[test]
    fn coercions_saturate() {
        assert_eq!(Num::Float(1.9).to_i64(), 1);
        assert_eq!(Num::Int(-1).to_u64(), 0);
        assert_eq!(Num::Uint(u64::MAX).to_i64(), i64::MAX);
        assert!(Num::Float(0.0).is_zero());
    }
}
