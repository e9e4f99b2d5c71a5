//! A JSON value that is parsed only as far as it is read.
//!
//! An [`Any`] built from bytes keeps the bytes and parses on demand: asking
//! for `a.b` scans past everything before `a` and looks no further than
//! `b`. An [`Any`] built with [`Any::wrap`] borrows into the native value
//! instead. Either way, navigation never fails loudly: it yields an invalid
//! [`Any`] that remembers the path it failed on, and coercions of invalid
//! values return zero values.

mod lazy;
mod native;
mod path;

use std::fmt;
use std::sync::OnceLock;

use bytes::Bytes;
use indexmap::IndexMap;
use kestrel_core::{Def, Reflect, Shape};

use self::lazy::{Lazy, Num};
use self::native::Native;
pub use self::path::PathSegment;
use crate::error::{JsonError, JsonErrorKind, Result};
use crate::reader::validate_number;
use crate::{Api, Reader, ValueType, Writer};

/// A lazily parsed or natively backed JSON value.
#[derive(Clone, Default)]
pub struct Any {
    repr: Repr,
    last_error: OnceLock<JsonError>,
}

#[derive(Clone, Default)]
pub(crate) enum Repr {
    Invalid(Vec<PathSegment>),
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(Str),
    Array(Array),
    Object(Object),
}

#[derive(Clone)]
pub(crate) enum Number {
    Lazy(Lazy),
    Eager(Num),
}

#[derive(Clone)]
pub(crate) enum Str {
    Lazy(Lazy),
    Owned(String),
}

#[derive(Clone)]
pub(crate) enum Array {
    Lazy(Lazy),
    Values(Vec<Any>),
    Native(Native),
}

#[derive(Clone)]
pub(crate) enum Object {
    Lazy(Lazy),
    Fields(IndexMap<String, Any>),
    Native(Native),
}

fn is_json_whitespace(b: &u8) -> bool {
    matches!(b, b' ' | b'\n' | b'\t' | b'\r')
}

fn type_mismatch(expected: &'static str, got: ValueType) -> JsonError {
    JsonError::new(JsonErrorKind::TypeMismatch {
        expected,
        got: got.name(),
    })
}

impl Any {
    pub(crate) fn from_repr(repr: Repr) -> Any {
        Any {
            repr,
            last_error: OnceLock::new(),
        }
    }

    pub(crate) fn from_num(num: Num) -> Any {
        Any::from_repr(Repr::Number(Number::Eager(num)))
    }

    /// An invalid value, failed at `path` because of `err`.
    pub(crate) fn invalid(path: Vec<PathSegment>, err: JsonError) -> Any {
        let any = Any::from_repr(Repr::Invalid(path));
        any.record(err);
        any
    }

    /// JSON `null`.
    pub fn null() -> Any {
        Any::default()
    }

    /// A boolean.
    pub fn from_bool(value: bool) -> Any {
        Any::from_repr(Repr::Bool(value))
    }

    /// A signed integer.
    pub fn from_i64(value: i64) -> Any {
        Any::from_num(Num::Int(value))
    }

    /// An unsigned integer.
    pub fn from_u64(value: u64) -> Any {
        Any::from_num(Num::Uint(value))
    }

    /// A float. Non-finite floats fail when written.
    pub fn from_f64(value: f64) -> Any {
        Any::from_num(Num::Float(value))
    }

    /// A string.
    pub fn from_string(value: impl Into<String>) -> Any {
        Any::from_repr(Repr::String(Str::Owned(value.into())))
    }

    /// An array of `values`.
    pub fn from_values(values: Vec<Any>) -> Any {
        Any::from_repr(Repr::Array(Array::Values(values)))
    }

    /// An object with `fields`, in their iteration order.
    pub fn from_fields(fields: IndexMap<String, Any>) -> Any {
        Any::from_repr(Repr::Object(Object::Fields(fields)))
    }

    /// Wrap the bytes of one JSON value, surrounding whitespace allowed.
    ///
    /// Only the first byte is looked at (and the whole literal for `null`,
    /// `true` and `false`); malformed contents surface when they are read.
    pub fn from_bytes(api: &Api, bytes: impl Into<Bytes>) -> Any {
        let bytes: Bytes = bytes.into();
        let Some(start) = bytes.iter().position(|b| !is_json_whitespace(b)) else {
            return Any::invalid(
                Vec::new(),
                JsonError::new(JsonErrorKind::UnexpectedEof {
                    expected: "a value",
                }),
            );
        };
        let end = bytes
            .iter()
            .rposition(|b| !is_json_whitespace(b))
            .map_or(bytes.len(), |last| last + 1);
        let lazy = Lazy {
            bytes: bytes.slice(start..end),
            api: api.clone(),
        };
        let repr = match ValueType::from_first_byte(lazy.bytes[0]) {
            ValueType::Null if lazy.bytes[..] == *b"null" => Repr::Null,
            ValueType::Bool if lazy.bytes[..] == *b"true" => Repr::Bool(true),
            ValueType::Bool if lazy.bytes[..] == *b"false" => Repr::Bool(false),
            ValueType::Number => Repr::Number(Number::Lazy(lazy)),
            ValueType::String => Repr::String(Str::Lazy(lazy)),
            ValueType::Array => Repr::Array(Array::Lazy(lazy)),
            ValueType::Object => Repr::Object(Object::Lazy(lazy)),
            _ => {
                let shown = &lazy.bytes[..lazy.bytes.len().min(16)];
                return Any::invalid(
                    Vec::new(),
                    JsonError::new(JsonErrorKind::UnexpectedToken {
                        got: String::from_utf8_lossy(shown).into_owned(),
                        expected: "a JSON value",
                    }),
                );
            }
        };
        Any::from_repr(repr)
    }

    /// Wrap a native value with the default [`Api`](crate::api()).
    pub fn wrap<T: Reflect>(value: T) -> Any {
        Any::wrap_in(crate::api(), value)
    }

    pub(crate) fn wrap_in<T: Reflect>(api: &Api, value: T) -> Any {
        native::wrap(api, value)
    }

    /// The kind of value held. Invalid values report [`ValueType::Invalid`].
    pub fn value_type(&self) -> ValueType {
        match &self.repr {
            Repr::Invalid(_) => ValueType::Invalid,
            Repr::Null => ValueType::Null,
            Repr::Bool(_) => ValueType::Bool,
            Repr::Number(_) => ValueType::Number,
            Repr::String(_) => ValueType::String,
            Repr::Array(_) => ValueType::Array,
            Repr::Object(_) => ValueType::Object,
        }
    }

    /// True for the result of a failed navigation or a malformed value.
    pub fn is_invalid(&self) -> bool {
        matches!(self.repr, Repr::Invalid(_))
    }

    /// True for JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self.repr, Repr::Null)
    }

    /// For an invalid value, the path navigation failed at.
    pub fn failed_path(&self) -> Option<&[PathSegment]> {
        match &self.repr {
            Repr::Invalid(path) => Some(path),
            _ => None,
        }
    }

    /// The first error met while producing or reading this value.
    ///
    /// Coercions swallow their errors; this is where to find them.
    pub fn last_error(&self) -> Option<&JsonError> {
        self.last_error.get()
    }

    fn record(&self, err: JsonError) {
        trace!("Any: recording {err}");
        let _ = self.last_error.set(err);
    }

    fn lazy(&self) -> Option<&Lazy> {
        match &self.repr {
            Repr::Number(Number::Lazy(lazy))
            | Repr::String(Str::Lazy(lazy))
            | Repr::Array(Array::Lazy(lazy))
            | Repr::Object(Object::Lazy(lazy)) => Some(lazy),
            _ => None,
        }
    }

    /// The [`Api`] this value parses and encodes with.
    pub fn api(&self) -> &Api {
        match &self.repr {
            Repr::Array(Array::Native(native)) | Repr::Object(Object::Native(native)) => {
                &native.api
            }
            _ => match self.lazy() {
                Some(lazy) => &lazy.api,
                None => crate::api(),
            },
        }
    }

    /// Follow `path` from this value.
    ///
    /// A [`PathSegment::Wildcard`] applies the rest of the path to every
    /// member or element, and collects the results that are not invalid
    /// into an object keyed by member name or element index. Failure
    /// yields an invalid value; see [`Any::last_error`] and
    /// [`Any::failed_path`].
    ///
    /// ```
    /// use kestrel_json::{api, path};
    ///
    /// let input = br#"{"users":[{"name":"ann"},{"name":"bo"}]}"#;
    /// assert_eq!(api().get(input, path!["users", 1, "name"]).to_string(), "bo");
    ///
    /// let names = api().get(input, path!["users", '*', "name"]);
    /// assert_eq!(names.to_string(), r#"{"0":"ann","1":"bo"}"#);
    ///
    /// let missing = api().get(input, path!["users", 5]);
    /// assert!(missing.is_invalid());
    /// ```
    pub fn get(&self, path: &[PathSegment]) -> Any {
        self.navigate(path, 0)
    }

    fn navigate(&self, full: &[PathSegment], at: usize) -> Any {
        let Some(segment) = full.get(at) else {
            return self.clone();
        };
        if self.is_invalid() {
            return self.clone();
        }
        let failed = |err: JsonError| Any::invalid(full[..=at].to_vec(), err);
        let not_found = || {
            failed(JsonError::new(JsonErrorKind::PathNotFound {
                path: path::render(&full[..=at]),
            }))
        };
        match segment {
            PathSegment::Key(key) => match self.member(key) {
                Ok(Some(child)) => child.navigate(full, at + 1),
                Ok(None) => not_found(),
                Err(err) => failed(err),
            },
            PathSegment::Index(index) => match self.element(*index) {
                Ok(Some(child)) => child.navigate(full, at + 1),
                Ok(None) => not_found(),
                Err(err) => failed(err),
            },
            PathSegment::Wildcard => {
                let children = match self.value_type() {
                    ValueType::Object => self.members(),
                    ValueType::Array => self.elements().map(|elements| {
                        elements
                            .into_iter()
                            .enumerate()
                            .map(|(index, element)| (index.to_string(), element))
                            .collect()
                    }),
                    other => Err(type_mismatch("an array or object", other)),
                };
                match children {
                    Ok(children) => Any::from_fields(
                        children
                            .into_iter()
                            .map(|(key, child)| (key, child.navigate(full, at + 1)))
                            .filter(|(_, found)| !found.is_invalid())
                            .collect(),
                    ),
                    Err(err) => failed(err),
                }
            }
        }
    }

    fn member(&self, key: &str) -> Result<Option<Any>> {
        match &self.repr {
            Repr::Object(Object::Lazy(lazy)) => lazy.member(key),
            Repr::Object(Object::Fields(fields)) => Ok(fields.get(key).cloned()),
            Repr::Object(Object::Native(native)) => Ok(native.member(key)),
            _ => Err(type_mismatch("an object", self.value_type())),
        }
    }

    fn element(&self, index: usize) -> Result<Option<Any>> {
        match &self.repr {
            Repr::Array(Array::Lazy(lazy)) => lazy.element(index),
            Repr::Array(Array::Values(values)) => Ok(values.get(index).cloned()),
            Repr::Array(Array::Native(native)) => Ok(native.element(index)),
            _ => Err(type_mismatch("an array", self.value_type())),
        }
    }

    fn members(&self) -> Result<Vec<(String, Any)>> {
        match &self.repr {
            Repr::Object(Object::Lazy(lazy)) => lazy.members(),
            Repr::Object(Object::Fields(fields)) => Ok(fields
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()),
            Repr::Object(Object::Native(native)) => Ok(native.members()),
            _ => Err(type_mismatch("an object", self.value_type())),
        }
    }

    fn elements(&self) -> Result<Vec<Any>> {
        match &self.repr {
            Repr::Array(Array::Lazy(lazy)) => lazy.elements(),
            Repr::Array(Array::Values(values)) => Ok(values.clone()),
            Repr::Array(Array::Native(native)) => Ok(native.elements()),
            _ => Err(type_mismatch("an array", self.value_type())),
        }
    }

    fn recorded<T: Default>(&self, result: Result<T>) -> T {
        result.unwrap_or_else(|err| {
            self.record(err);
            T::default()
        })
    }

    /// An object's member names in input order; empty for anything else.
    pub fn keys(&self) -> Vec<String> {
        match &self.repr {
            Repr::Object(Object::Lazy(lazy)) => self.recorded(lazy.keys()),
            Repr::Object(Object::Fields(fields)) => fields.keys().cloned().collect(),
            Repr::Object(Object::Native(native)) => native.keys(),
            _ => Vec::new(),
        }
    }

    /// Member count of an object, element count of an array, else 0.
    pub fn size(&self) -> usize {
        match &self.repr {
            Repr::Object(Object::Lazy(lazy)) => self.recorded(lazy.object_len()),
            Repr::Array(Array::Lazy(lazy)) => self.recorded(lazy.array_len()),
            Repr::Object(Object::Fields(fields)) => fields.len(),
            Repr::Array(Array::Values(values)) => values.len(),
            Repr::Object(Object::Native(native)) | Repr::Array(Array::Native(native)) => {
                native.len()
            }
            _ => 0,
        }
    }

    /// An object's members. Later duplicates of a key win; anything that is
    /// not an object gives an empty map.
    pub fn get_object(&self) -> IndexMap<String, Any> {
        if self.value_type() != ValueType::Object {
            return IndexMap::new();
        }
        self.recorded(self.members()).into_iter().collect()
    }

    /// An array's elements; empty for anything else.
    pub fn get_array(&self) -> Vec<Any> {
        if self.value_type() != ValueType::Array {
            return Vec::new();
        }
        self.recorded(self.elements())
    }

    /// Parse everything now, natively backed containers included. Parts
    /// that fail to parse become invalid values.
    pub fn materialize(&self) -> Any {
        match &self.repr {
            Repr::Number(Number::Lazy(lazy)) => match lazy.number() {
                Some(num) => Any::from_num(num),
                None => Any::invalid(Vec::new(), self.number_error(lazy)),
            },
            Repr::String(Str::Lazy(lazy)) => match lazy.string() {
                Ok(s) => Any::from_string(s),
                Err(err) => Any::invalid(Vec::new(), err),
            },
            Repr::Array(_) => match self.elements() {
                Ok(elements) => Any::from_values(elements.iter().map(Any::materialize).collect()),
                Err(err) => Any::invalid(Vec::new(), err),
            },
            Repr::Object(_) => match self.members() {
                Ok(members) => Any::from_fields(
                    members
                        .into_iter()
                        .map(|(key, value)| (key, value.materialize()))
                        .collect(),
                ),
                Err(err) => Any::invalid(Vec::new(), err),
            },
            _ => self.clone(),
        }
    }

    fn number_error(&self, lazy: &Lazy) -> JsonError {
        let reason = validate_number(&lazy.bytes)
            .err()
            .unwrap_or("not a number");
        JsonError::new(JsonErrorKind::InvalidNumber { reason })
            .with_context(String::from_utf8_lossy(&lazy.bytes).into_owned())
    }

    fn number(&self) -> Option<Num> {
        match &self.repr {
            Repr::Number(Number::Eager(num)) => Some(*num),
            Repr::Number(Number::Lazy(lazy)) => {
                let num = lazy.number();
                if num.is_none() {
                    self.record(self.number_error(lazy));
                }
                num
            }
            _ => None,
        }
    }

    /// Truthiness: `false`, `null`, zero, the empty string, strings of
    /// only whitespace, `"0"`, empty containers and invalid values are
    /// false.
    pub fn to_bool(&self) -> bool {
        match &self.repr {
            Repr::Invalid(_) | Repr::Null => false,
            Repr::Bool(b) => *b,
            Repr::Number(_) => self.number().is_some_and(|num| !num.is_zero()),
            Repr::String(_) => {
                let s = self.to_string();
                !(s == "0" || s.bytes().all(|b| is_json_whitespace(&b)))
            }
            Repr::Array(Array::Lazy(lazy)) | Repr::Object(Object::Lazy(lazy)) => {
                lazy.has_contents()
            }
            Repr::Array(_) | Repr::Object(_) => self.size() > 0,
        }
    }

    /// Coerce to `i64`, saturating. Strings contribute their leading
    /// integer (`"12px"` is 12), booleans and containers 1 or 0.
    pub fn to_i64(&self) -> i64 {
        match &self.repr {
            Repr::Invalid(_) | Repr::Null => 0,
            Repr::Bool(b) => i64::from(*b),
            Repr::Number(_) => self.number().map_or(0, Num::to_i64),
            Repr::String(_) => {
                let (negative, magnitude) = integer_prefix(&self.to_string());
                if negative {
                    0i64.saturating_sub_unsigned(magnitude)
                } else {
                    i64::try_from(magnitude).unwrap_or(i64::MAX)
                }
            }
            Repr::Array(_) | Repr::Object(_) => i64::from(self.to_bool()),
        }
    }

    /// Coerce to `u64`, saturating; negative values give 0.
    pub fn to_u64(&self) -> u64 {
        match &self.repr {
            Repr::Invalid(_) | Repr::Null => 0,
            Repr::Bool(b) => u64::from(*b),
            Repr::Number(_) => self.number().map_or(0, Num::to_u64),
            Repr::String(_) => match integer_prefix(&self.to_string()) {
                (true, _) => 0,
                (false, magnitude) => magnitude,
            },
            Repr::Array(_) | Repr::Object(_) => u64::from(self.to_bool()),
        }
    }

    /// Coerce to `i32`, saturating.
    pub fn to_i32(&self) -> i32 {
        let v = self.to_i64();
        i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
    }

    /// Coerce to `u32`, saturating.
    pub fn to_u32(&self) -> u32 {
        u32::try_from(self.to_u64()).unwrap_or(u32::MAX)
    }

    /// Coerce to `f64`. Strings contribute their leading number.
    pub fn to_f64(&self) -> f64 {
        match &self.repr {
            Repr::Invalid(_) | Repr::Null => 0.0,
            Repr::Bool(b) => f64::from(u8::from(*b)),
            Repr::Number(_) => self.number().map_or(0.0, Num::to_f64),
            Repr::String(_) => float_prefix(&self.to_string()),
            Repr::Array(_) | Repr::Object(_) => f64::from(u8::from(self.to_bool())),
        }
    }

    /// Coerce to `f32`.
    pub fn to_f32(&self) -> f32 {
        self.to_f64() as f32
    }

    /// Strings give their contents, numbers their text as written, other
    /// values their JSON text. Invalid values give the empty string.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> String {
        match &self.repr {
            Repr::Invalid(_) => String::new(),
            Repr::String(Str::Owned(s)) => s.clone(),
            Repr::String(Str::Lazy(lazy)) => self.recorded(lazy.string()),
            Repr::Number(Number::Lazy(lazy)) => String::from_utf8_lossy(&lazy.bytes).into_owned(),
            _ => self.json_text(),
        }
    }

    fn json_text(&self) -> String {
        let mut writer = Writer::new(self.api());
        match self.write_to(&mut writer) {
            Ok(()) => String::from_utf8_lossy(writer.buffered()).into_owned(),
            Err(err) => {
                self.record(err);
                String::new()
            }
        }
    }

    /// Write this value as JSON. Unparsed parts are copied verbatim;
    /// invalid values write `null`.
    pub fn write_to(&self, writer: &mut Writer<'_>) -> Result<()> {
        if let Some(lazy) = self.lazy() {
            writer.write_raw(&lazy.bytes);
            return writer.check();
        }
        match &self.repr {
            Repr::Invalid(_) | Repr::Null => writer.write_null(),
            Repr::Bool(b) => writer.write_bool(*b),
            Repr::Number(Number::Eager(Num::Int(v))) => writer.write_i64(*v),
            Repr::Number(Number::Eager(Num::Uint(v))) => writer.write_u64(*v),
            Repr::Number(Number::Eager(Num::Float(v))) => writer.write_f64(*v),
            Repr::String(Str::Owned(s)) => writer.write_string(s),
            Repr::Array(Array::Values(values)) => {
                if values.is_empty() {
                    writer.write_empty_array();
                } else {
                    writer.write_array_start();
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            writer.write_more();
                        }
                        value.write_to(writer)?;
                    }
                    writer.write_array_end();
                }
            }
            Repr::Object(Object::Fields(fields)) => {
                if fields.is_empty() {
                    writer.write_empty_object();
                } else {
                    writer.write_object_start();
                    for (i, (key, value)) in fields.iter().enumerate() {
                        if i > 0 {
                            writer.write_more();
                        }
                        writer.write_object_field(key);
                        value.write_to(writer)?;
                    }
                    writer.write_object_end();
                }
            }
            Repr::Array(Array::Native(native)) | Repr::Object(Object::Native(native)) => {
                native.write_to(writer)?;
            }
            // lazy variants were written above
            Repr::Number(Number::Lazy(_))
            | Repr::String(Str::Lazy(_))
            | Repr::Array(Array::Lazy(_))
            | Repr::Object(Object::Lazy(_)) => {}
        }
        writer.check()
    }

    /// Decode this value into a fresh `T`.
    pub fn decode<T: Reflect + Default>(&self) -> Result<T> {
        let mut value = T::default();
        self.decode_into(&mut value)?;
        Ok(value)
    }

    /// Decode this value into `target`, merging like
    /// [`Api::from_slice_into`].
    pub fn decode_into<T: Reflect>(&self, target: &mut T) -> Result<()> {
        if let Some(lazy) = self.lazy() {
            return lazy.api.from_slice_into(&lazy.bytes, target);
        }
        if self.is_invalid() {
            return Err(self.last_error().cloned().unwrap_or_else(|| {
                JsonError::new(JsonErrorKind::UnsupportedValue("an invalid value"))
            }));
        }
        let mut writer = Writer::new(self.api());
        self.write_to(&mut writer)?;
        self.api().from_slice_into(writer.buffered(), target)
    }
}

/// Sign and magnitude of a string's leading integer; saturates at
/// `u64::MAX`.
fn integer_prefix(s: &str) -> (bool, u64) {
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut magnitude: u64 = 0;
    for digit in rest.bytes().take_while(u8::is_ascii_digit) {
        magnitude = magnitude
            .saturating_mul(10)
            .saturating_add(u64::from(digit - b'0'));
    }
    (negative, magnitude)
}

/// A string's leading decimal number, or 0.
fn float_prefix(s: &str) -> f64 {
    let b = s.as_bytes();
    let digits_from = |mut i: usize| {
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };
    let sign = usize::from(matches!(b.first(), Some(b'-' | b'+')));
    let int_end = digits_from(sign);
    let mut end = int_end;
    if b.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 || int_end > sign {
            end = frac_end;
        }
    }
    if end == sign || (end == sign + 1 && b.get(sign) == Some(&b'.')) {
        return 0.0;
    }
    if matches!(b.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(b.get(exp), Some(b'-' | b'+')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse().unwrap_or(0.0)
}

impl fmt::Debug for Any {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Invalid(failed) => f
                .debug_struct("Any::Invalid")
                .field("path", &path::render(failed))
                .field("error", &self.last_error())
                .finish(),
            _ => write!(f, "Any({}: {})", self.value_type().name(), self.json_text()),
        }
    }
}

impl From<bool> for Any {
    fn from(value: bool) -> Self {
        Any::from_bool(value)
    }
}

impl From<i64> for Any {
    fn from(value: i64) -> Self {
        Any::from_i64(value)
    }
}

impl From<u64> for Any {
    fn from(value: u64) -> Self {
        Any::from_u64(value)
    }
}

impl From<f64> for Any {
    fn from(value: f64) -> Self {
        Any::from_f64(value)
    }
}

impl From<&str> for Any {
    fn from(value: &str) -> Self {
        Any::from_string(value)
    }
}

impl From<String> for Any {
    fn from(value: String) -> Self {
        Any::from_string(value)
    }
}

impl From<Vec<Any>> for Any {
    fn from(values: Vec<Any>) -> Self {
        Any::from_values(values)
    }
}

impl Reflect for Any {
    const SHAPE: &'static Shape = &const {
        Shape {
            id: std::any::TypeId::of::<Any>,
            type_identifier: "Any",
            type_name: std::any::type_name::<Any>,
            def: Def::Opaque,
        }
    };
}

impl Reader<'_> {
    /// Capture the next value as a lazy [`Any`]. The value is skipped over,
    /// which checks its nesting but not its contents.
    pub fn read_any(&mut self) -> Result<Any> {
        let bytes = self.skip_and_return_bytes()?;
        Ok(Any::from_bytes(self.api(), bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, path};

    fn any(input: &str) -> Any {
        Any::from_bytes(&Config::new().freeze(), input.as_bytes().to_vec())
    }

    #[test]
    fn classifies_by_first_byte() {
        assert_eq!(any(" null ").value_type(), ValueType::Null);
        assert_eq!(any("true").value_type(), ValueType::Bool);
        assert_eq!(any("-3").value_type(), ValueType::Number);
        assert_eq!(any("\"x\"").value_type(), ValueType::String);
        assert_eq!(any("[1]").value_type(), ValueType::Array);
        assert_eq!(any("{}").value_type(), ValueType::Object);
        assert!(any("nul").is_invalid());
        assert!(any("   ").is_invalid());
        assert!(any("?").last_error().is_some());
    }

    #[test]
    fn get_records_where_it_failed() {
        let doc = any(r#"{"a":{"b":[10,20]}}"#);
        assert_eq!(doc.get(path!["a", "b", 1]).to_i64(), 20);

        let missing = doc.get(path!["a", "c", 0]);
        assert!(missing.is_invalid());
        assert_eq!(missing.failed_path(), Some(&path!["a", "c"][..]));
        assert!(matches!(
            missing.last_error().map(|err| &err.kind),
            Some(JsonErrorKind::PathNotFound { .. })
        ));

        let wrong = doc.get(path!["a", 0]);
        assert!(matches!(
            wrong.last_error().map(|err| &err.kind),
            Some(JsonErrorKind::TypeMismatch { .. })
        ));
    }

    #[test]
    fn wildcard_collects_what_matches() {
        let doc = any(r#"[{"x":1},{"y":2},{"x":3}]"#);
        let xs = doc.get(path!['*', "x"]);
        assert_eq!(xs.value_type(), ValueType::Object);
        assert_eq!(xs.to_string(), r#"{"0":1,"2":3}"#);
        assert!(any("5").get(path!['*']).is_invalid());
    }

    #[test]
    fn string_coercions_use_the_leading_number() {
        assert_eq!(any(r#""12px""#).to_i64(), 12);
        assert_eq!(any(r#""-7""#).to_u64(), 0);
        assert_eq!(any(r#""-7""#).to_i32(), -7);
        assert_eq!(any(r#""2.5e1kg""#).to_f64(), 25.0);
        assert_eq!(any(r#""abc""#).to_f64(), 0.0);
        assert_eq!(any(r#""99999999999999999999""#).to_i64(), i64::MAX);
        assert_eq!(float_prefix(".5"), 0.5);
        assert_eq!(float_prefix("1e"), 1.0);
    }

    #[test]
    fn truthiness() {
        for falsy in ["0", "0.0", "false", "null", r#""""#, r#""0""#, r#"" ""#, "[]", "{ }"] {
            assert!(!any(falsy).to_bool(), "{falsy}");
        }
        for truthy in ["1", "-0.5", "true", r#""a""#, r#""false""#, "[0]", r#"{"a":0}"#] {
            assert!(any(truthy).to_bool(), "{truthy}");
        }
    }

    #[test]
    fn malformed_numbers_coerce_to_zero_and_record() {
        let bad = any("-");
        assert_eq!(bad.to_i64(), 0);
        assert!(bad.last_error().is_some());
    }

    #[test]
    fn materialize_parses_everything() {
        let doc = any(r#"{"a":[1,"two",{"b":null}]}"#).materialize();
        assert!(matches!(doc.repr, Repr::Object(Object::Fields(_))));
        assert_eq!(doc.to_string(), r#"{"a":[1,"two",{"b":null}]}"#);
        assert_eq!(doc.get(path!["a", 1]).to_string(), "two");
    }
}
