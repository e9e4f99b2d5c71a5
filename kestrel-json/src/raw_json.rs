use std::any::TypeId;
use std::fmt;

use kestrel_core::{Def, Reflect, Shape};

/// One JSON value, kept as its exact bytes.
///
/// Decoding captures the value's text without interpreting it; encoding
/// writes the text back unchanged (checked first if the [`Api`](crate::Api)
/// has `validate_raw_json` set). An empty `RawJson` encodes as `null`.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct RawJson(pub Vec<u8>);

impl RawJson {
    /// Wraps JSON text.
    pub fn new(json: impl Into<Vec<u8>>) -> Self {
        RawJson(json.into())
    }

    /// The JSON text.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The JSON text, if it is UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Unwraps the JSON text.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for RawJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawJson({})", String::from_utf8_lossy(&self.0))
    }
}

impl From<&str> for RawJson {
    fn from(json: &str) -> Self {
        RawJson(json.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for RawJson {
    fn from(json: Vec<u8>) -> Self {
        RawJson(json)
    }
}

impl Reflect for RawJson {
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<RawJson>,
            type_identifier: "RawJson",
            type_name: std::any::type_name::<RawJson>,
            def: Def::Opaque,
        }
    };
}
