#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

mod any;
mod api;
mod codec;
mod compiler;
mod config;
mod error;
pub mod extra;
mod hash;
mod pool;
mod raw_json;
mod reader;
mod registry;
mod stream;
mod writer;

pub use any::{Any, PathSegment};
pub use api::{Api, api};
pub use codec::{FnDecoder, FnEncoder, ValDecoder, ValEncoder, decoder_fn, downcast_mut, downcast_ref, encoder_fn};
pub use config::Config;
pub use error::{Frame, JsonError, JsonErrorKind, Result};
pub use hash::{FieldHasher, field_hash};
pub use raw_json::RawJson;
pub use reader::{DEFAULT_BUFFER_SIZE, Reader, ValueType};
pub use registry::{Registry, registry};
pub use stream::{StreamDecoder, StreamEncoder};
pub use writer::{FLUSH_THRESHOLD, Writer};

use std::io;

use kestrel_core::Reflect;

/// Decode a `T` from JSON bytes with the default [`Api`].
pub fn from_slice<T: Reflect + Default>(input: &[u8]) -> Result<T> {
    api().from_slice(input)
}

/// Decode a `T` from a JSON string with the default [`Api`].
pub fn from_str<T: Reflect + Default>(input: &str) -> Result<T> {
    api().from_str(input)
}

/// Decode JSON bytes into an existing value with the default [`Api`].
///
/// Fields missing from the input keep their current values.
pub fn from_slice_into<T: Reflect>(input: &[u8], target: &mut T) -> Result<()> {
    api().from_slice_into(input, target)
}

/// Decode a `T` from an [`io::Read`] with the default [`Api`].
pub fn from_reader<T: Reflect + Default, R: io::Read>(source: R) -> Result<T> {
    api().from_reader(source)
}

/// Encode a value to JSON bytes with the default [`Api`].
pub fn to_vec<T: Reflect>(value: &T) -> Result<Vec<u8>> {
    api().to_vec(value)
}

/// Encode a value to a JSON string with the default [`Api`].
pub fn to_string<T: Reflect>(value: &T) -> Result<String> {
    api().to_string(value)
}

/// Encode a value into an [`io::Write`] with the default [`Api`].
pub fn to_writer<T: Reflect, W: io::Write>(sink: W, value: &T) -> Result<()> {
    api().to_writer(sink, value)
}

/// Navigate JSON bytes lazily with the default [`Api`]; see [`Api::get`].
pub fn get(input: &[u8], path: &[PathSegment]) -> Any {
    api().get(input, path)
}

/// Wrap JSON bytes as a lazy [`Any`] with the default [`Api`].
pub fn read_any(input: &[u8]) -> Result<Any> {
    api().read_any(input)
}

/// Wrap a native value as an [`Any`] with the default [`Api`].
pub fn wrap<T: Reflect>(value: T) -> Any {
    api().wrap(value)
}
