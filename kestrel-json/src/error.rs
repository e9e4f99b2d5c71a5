//! Error types for JSON encoding and decoding.

use core::fmt::{self, Display};

/// One step of the location an error occurred at, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// The type being decoded or encoded at the top level
    Type(&'static str),
    /// A record field, by Rust name
    Field(&'static str),
    /// A list or array element
    Index(usize),
    /// A map entry
    Key(String),
}

impl Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Type(name) => write!(f, "{name}"),
            Frame::Field(name) => write!(f, ".{name}"),
            Frame::Index(index) => write!(f, "[{index}]"),
            Frame::Key(key) => write!(f, "[{key:?}]"),
        }
    }
}

/// Error type for JSON encoding and decoding.
#[derive(Debug, Clone)]
pub struct JsonError {
    /// The specific kind of error
    pub kind: JsonErrorKind,
    /// Where in the value the error occurred, outermost first
    pub path: Vec<Frame>,
    /// Byte offset into the input, for decode errors
    pub offset: Option<usize>,
    /// A few bytes of input around the offset
    pub context: Option<String>,
}

impl JsonError {
    /// Create an error with no location.
    pub const fn new(kind: JsonErrorKind) -> Self {
        JsonError {
            kind,
            path: Vec::new(),
            offset: None,
            context: None,
        }
    }

    /// Attach the byte offset the error was found at.
    pub fn at(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Attach a snippet of the surrounding input.
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }

    /// A free-form error, for custom codecs.
    pub fn custom(message: impl Into<String>) -> Self {
        JsonError::new(JsonErrorKind::Custom(message.into()))
    }

    /// Record that the error happened inside record field `name`.
    pub fn in_field(self, name: &'static str) -> Self {
        self.within(Frame::Field(name))
    }

    /// Record that the error happened inside element `index`.
    pub fn in_index(self, index: usize) -> Self {
        self.within(Frame::Index(index))
    }

    /// Record that the error happened inside map entry `key`.
    pub fn in_key(self, key: impl Into<String>) -> Self {
        self.within(Frame::Key(key.into()))
    }

    /// Record the type being processed when the error happened.
    pub fn in_type(self, name: &'static str) -> Self {
        self.within(Frame::Type(name))
    }

    fn within(mut self, frame: Frame) -> Self {
        // end of input between values is not a failure of any enclosing value
        if self.is_eof() {
            return self;
        }
        self.path.insert(0, frame);
        self
    }

    /// True if input ended cleanly between values.
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, JsonErrorKind::Eof)
    }

    /// The location as a path expression, such as `Order.items[2]`.
    pub fn path_display(&self) -> String {
        self.path.iter().map(ToString::to_string).collect()
    }
}

impl Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            write!(f, "at {}: ", self.path_display())?;
        }
        write!(f, "{}", self.kind)?;
        if let Some(offset) = self.offset {
            write!(f, " (byte {offset}")?;
            if let Some(context) = &self.context {
                write!(f, ", near `{context}`")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for JsonError {}

impl miette::Diagnostic for JsonError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        match &self.kind {
            JsonErrorKind::UnknownField {
                suggestion: Some(suggestion),
                ..
            } => Some(Box::new(format!("did you mean `{suggestion}`?"))),
            JsonErrorKind::NoCodec { .. } => Some(Box::new(
                "register a codec for this type with `kestrel_json::registry()`",
            )),
            JsonErrorKind::DepthLimitExceeded { .. } => {
                Some(Box::new("raise `Config::max_depth` if this input is trusted"))
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for JsonError {
    fn from(err: std::io::Error) -> Self {
        JsonError::new(JsonErrorKind::Io(err.to_string()))
    }
}

/// Specific error kinds for JSON encoding and decoding
#[derive(Debug, Clone, PartialEq)]
pub enum JsonErrorKind {
    /// Input ended cleanly before a value started.
    Eof,
    /// Input ended in the middle of a value
    UnexpectedEof {
        /// What was expected before the end
        expected: &'static str,
    },
    /// A byte that cannot start or continue the expected token
    UnexpectedToken {
        /// The token that was found
        got: String,
        /// What was expected instead
        expected: &'static str,
    },
    /// A number that does not follow the JSON grammar (`--2`, `01`, `1.`)
    InvalidNumber {
        /// What is wrong with it
        reason: &'static str,
    },
    /// A backslash escape that JSON does not define, or a broken `\u` escape
    InvalidEscape,
    /// A raw control character inside a string
    ControlCharacter,
    /// Non-whitespace after a complete top-level value
    TrailingCharacters,
    /// A string that is not valid UTF-8
    InvalidUtf8,
    /// A base64 string that does not decode
    InvalidBase64(String),
    /// The JSON value has the wrong type for the target
    TypeMismatch {
        /// The expected JSON type
        expected: &'static str,
        /// The actual JSON type found
        got: &'static str,
    },
    /// Number does not fit the target type
    NumberOutOfRange {
        /// The numeric text
        value: String,
        /// The target type that couldn't hold the value
        target_type: &'static str,
    },
    /// Unknown field in a record, when unknown fields are rejected
    UnknownField {
        /// The unknown field name
        field: String,
        /// List of valid field names
        expected: Vec<&'static str>,
        /// Suggested field name (if similar to an expected field)
        suggestion: Option<&'static str>,
    },
    /// Two fields of one record claim the same wire name
    DuplicateField {
        /// The record type
        type_name: &'static str,
        /// The contested wire name
        name: &'static str,
    },
    /// A map key that does not parse as the map's key type
    InvalidMapKey {
        /// The key as found in the input
        key: String,
        /// The key type
        key_type: &'static str,
    },
    /// Navigating an [`Any`](crate::Any) found nothing at a path
    PathNotFound {
        /// The path, up to and including the step that failed
        path: String,
    },
    /// No codec can be built for this type
    NoCodec {
        /// The type
        type_name: &'static str,
    },
    /// Containers nested deeper than the configured limit
    DepthLimitExceeded {
        /// The configured limit
        limit: usize,
    },
    /// A value JSON cannot represent, such as NaN
    UnsupportedValue(&'static str),
    /// A codec was handed a value of a different type than it was built for
    WrongTarget {
        /// The type the codec expects
        expected: &'static str,
    },
    /// I/O error from the underlying reader or writer
    Io(String),
    /// Raised by a custom codec
    Custom(String),
}

impl Display for JsonErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonErrorKind::Eof => write!(f, "end of input"),
            JsonErrorKind::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input, expected {expected}")
            }
            JsonErrorKind::UnexpectedToken { got, expected } => {
                write!(f, "unexpected {got}, expected {expected}")
            }
            JsonErrorKind::InvalidNumber { reason } => write!(f, "invalid number: {reason}"),
            JsonErrorKind::InvalidEscape => write!(f, "invalid escape sequence in string"),
            JsonErrorKind::ControlCharacter => {
                write!(f, "control character in string must be escaped")
            }
            JsonErrorKind::TrailingCharacters => {
                write!(f, "trailing characters after the value")
            }
            JsonErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8 sequence"),
            JsonErrorKind::InvalidBase64(msg) => write!(f, "invalid base64: {msg}"),
            JsonErrorKind::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            JsonErrorKind::NumberOutOfRange { value, target_type } => {
                write!(f, "number `{value}` out of range for {target_type}")
            }
            JsonErrorKind::UnknownField {
                field,
                expected,
                suggestion,
            } => {
                write!(f, "unknown field `{field}`, expected one of: {expected:?}")?;
                if let Some(suggested) = suggestion {
                    write!(f, " (did you mean `{suggested}`?)")?;
                }
                Ok(())
            }
            JsonErrorKind::DuplicateField { type_name, name } => {
                write!(f, "more than one field of {type_name} is named `{name}`")
            }
            JsonErrorKind::InvalidMapKey { key, key_type } => {
                write!(f, "map key `{key}` is not a valid {key_type}")
            }
            JsonErrorKind::PathNotFound { path } => write!(f, "nothing found at `{path}`"),
            JsonErrorKind::NoCodec { type_name } => {
                write!(f, "no codec available for {type_name}")
            }
            JsonErrorKind::DepthLimitExceeded { limit } => {
                write!(f, "nesting exceeds the depth limit of {limit}")
            }
            JsonErrorKind::UnsupportedValue(msg) => write!(f, "unsupported value: {msg}"),
            JsonErrorKind::WrongTarget { expected } => {
                write!(f, "codec for {expected} applied to a different type")
            }
            JsonErrorKind::Io(msg) => write!(f, "I/O error: {msg}"),
            JsonErrorKind::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl JsonErrorKind {
    /// Get an error code for this kind of error.
    pub const fn code(&self) -> &'static str {
        match self {
            JsonErrorKind::Eof => "kestrel_json::eof",
            JsonErrorKind::UnexpectedEof { .. } => "kestrel_json::unexpected_eof",
            JsonErrorKind::UnexpectedToken { .. }
            | JsonErrorKind::InvalidNumber { .. }
            | JsonErrorKind::InvalidEscape
            | JsonErrorKind::ControlCharacter
            | JsonErrorKind::TrailingCharacters => "kestrel_json::syntax",
            JsonErrorKind::InvalidUtf8 => "kestrel_json::invalid_utf8",
            JsonErrorKind::InvalidBase64(_) => "kestrel_json::invalid_base64",
            JsonErrorKind::TypeMismatch { .. } => "kestrel_json::type_mismatch",
            JsonErrorKind::NumberOutOfRange { .. } => "kestrel_json::number_out_of_range",
            JsonErrorKind::UnknownField { .. } => "kestrel_json::unknown_field",
            JsonErrorKind::DuplicateField { .. } => "kestrel_json::duplicate_field",
            JsonErrorKind::InvalidMapKey { .. } => "kestrel_json::invalid_map_key",
            JsonErrorKind::PathNotFound { .. } => "kestrel_json::path_not_found",
            JsonErrorKind::NoCodec { .. } => "kestrel_json::no_codec",
            JsonErrorKind::DepthLimitExceeded { .. } => "kestrel_json::depth_limit",
            JsonErrorKind::UnsupportedValue(_) => "kestrel_json::unsupported_value",
            JsonErrorKind::WrongTarget { .. } => "kestrel_json::wrong_target",
            JsonErrorKind::Io(_) => "kestrel_json::io",
            JsonErrorKind::Custom(_) => "kestrel_json::custom",
        }
    }

    /// True for malformed-input errors.
    pub const fn is_syntax(&self) -> bool {
        matches!(
            self,
            JsonErrorKind::UnexpectedToken { .. }
                | JsonErrorKind::InvalidNumber { .. }
                | JsonErrorKind::InvalidEscape
                | JsonErrorKind::ControlCharacter
                | JsonErrorKind::TrailingCharacters
                | JsonErrorKind::UnexpectedEof { .. }
        )
    }
}

/// Result type for JSON encoding and decoding
pub type Result<T> = core::result::Result<T, JsonError>;
