use lexical_parse_float::FromLexical as _;
use lexical_parse_integer::FromLexical as _;

use super::Reader;
use crate::error::{JsonErrorKind, Result};

macro_rules! read_signed {
    ($($(#[$meta:meta])* $name:ident => $ty:ty),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(&mut self) -> Result<$ty> {
                let value = self.read_i64_for(stringify!($ty))?;
                <$ty>::try_from(value).map_err(|_| {
                    self.report(JsonErrorKind::NumberOutOfRange {
                        value: value.to_string(),
                        target_type: stringify!($ty),
                    })
                })
            }
        )*
    };
}

macro_rules! read_unsigned {
    ($($(#[$meta:meta])* $name:ident => $ty:ty),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(&mut self) -> Result<$ty> {
                let value = self.read_u64_for(stringify!($ty))?;
                <$ty>::try_from(value).map_err(|_| {
                    self.report(JsonErrorKind::NumberOutOfRange {
                        value: value.to_string(),
                        target_type: stringify!($ty),
                    })
                })
            }
        )*
    };
}

impl Reader<'_> {
    /// Copy the next number token into scratch and check it against the
    /// JSON number grammar. Returns whether it has a fraction or exponent.
    pub(super) fn scan_number(&mut self) -> Result<bool> {
        let first = self.value_start("a number")?;
        if first != b'-' && !first.is_ascii_digit() {
            return Err(self.unexpected(first, "a number"));
        }
        self.scratch.clear();
        self.scratch.push(first);
        'refill: loop {
            while self.head < self.tail {
                let b = self.buf[self.head];
                if !matches!(b, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E') {
                    break 'refill;
                }
                self.scratch.push(b);
                self.head += 1;
            }
            if !self.load_more() {
                break;
            }
        }
        match validate_number(&self.scratch) {
            Ok(is_float) => Ok(is_float),
            Err(reason) => Err(self.report(JsonErrorKind::InvalidNumber { reason })),
        }
    }

    /// The text of the next number, checked against the JSON grammar.
    pub fn read_number_str(&mut self) -> Result<&str> {
        self.scan_number()?;
        // the grammar admits ASCII only
        Ok(std::str::from_utf8(&self.scratch).unwrap_or_default())
    }

    /// Like [`read_number_str`](Self::read_number_str), as bytes.
    pub fn read_number_bytes(&mut self) -> Result<&[u8]> {
        self.scan_number()?;
        Ok(&self.scratch)
    }

    fn integer_only(&mut self, target_type: &'static str) -> Result<()> {
        if self.scan_number()? {
            return Err(self.report(JsonErrorKind::TypeMismatch {
                expected: target_type,
                got: "a fractional number",
            }));
        }
        Ok(())
    }

    fn out_of_range(&mut self, target_type: &'static str) -> crate::JsonError {
        let value = String::from_utf8_lossy(&self.scratch).into_owned();
        self.report(JsonErrorKind::NumberOutOfRange { value, target_type })
    }

    fn read_i64_for(&mut self, target_type: &'static str) -> Result<i64> {
        self.integer_only(target_type)?;
        match i64::from_lexical(&self.scratch) {
            Ok(value) => Ok(value),
            Err(_) => Err(self.out_of_range(target_type)),
        }
    }

    fn read_u64_for(&mut self, target_type: &'static str) -> Result<u64> {
        self.integer_only(target_type)?;
        if self.scratch.first() == Some(&b'-') {
            if self.scratch == b"-0" {
                return Ok(0);
            }
            return Err(self.out_of_range(target_type));
        }
        match u64::from_lexical(&self.scratch) {
            Ok(value) => Ok(value),
            Err(_) => Err(self.out_of_range(target_type)),
        }
    }

    /// Reads an `i64`.
    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_i64_for("i64")
    }

    /// Reads a `u64`.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_u64_for("u64")
    }

    read_signed! {
        /// Reads an `i8`.
        read_i8 => i8,
        /// Reads an `i16`.
        read_i16 => i16,
        /// Reads an `i32`.
        read_i32 => i32,
        /// Reads an `isize`.
        read_isize => isize,
    }

    read_unsigned! {
        /// Reads a `u8`.
        read_u8 => u8,
        /// Reads a `u16`.
        read_u16 => u16,
        /// Reads a `u32`.
        read_u32 => u32,
        /// Reads a `usize`.
        read_usize => usize,
    }

    /// Reads an `f64`.
    pub fn read_f64(&mut self) -> Result<f64> {
        self.scan_number()?;
        match f64::from_lexical(&self.scratch) {
            Ok(value) => Ok(value),
            Err(_) => Err(self.out_of_range("f64")),
        }
    }

    /// Reads an `f32`.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.scan_number()?;
        match f32::from_lexical(&self.scratch) {
            Ok(value) => Ok(value),
            Err(_) => Err(self.out_of_range("f32")),
        }
    }
}

/// Check `text` against the JSON number grammar. Returns whether it has a
/// fraction or exponent.
pub(crate) fn validate_number(text: &[u8]) -> core::result::Result<bool, &'static str> {
    let digits_from = |mut i: usize| {
        while text.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut i = usize::from(text.first() == Some(&b'-'));
    match text.get(i) {
        Some(b'0') => {
            i += 1;
            if text.get(i).is_some_and(u8::is_ascii_digit) {
                return Err("leading zero");
            }
        }
        Some(b'1'..=b'9') => i = digits_from(i),
        Some(b'-') => return Err("more than one minus sign"),
        _ => return Err("missing digits"),
    }

    let mut is_float = false;
    if text.get(i) == Some(&b'.') {
        is_float = true;
        let end = digits_from(i + 1);
        if end == i + 1 {
            return Err("missing digits after the decimal point");
        }
        i = end;
    }
    if matches!(text.get(i), Some(b'e' | b'E')) {
        is_float = true;
        i += 1;
        if matches!(text.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let end = digits_from(i);
        if end == i {
            return Err("missing exponent digits");
        }
        i = end;
    }
    if i != text.len() {
        return Err("unexpected character in number");
    }
    Ok(is_float)
}
