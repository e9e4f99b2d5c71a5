#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod shape;
pub use shape::*;

mod scalar;
pub use scalar::*;

mod def;
pub use def::*;

mod map_key;
pub use map_key::*;

mod bytes;
pub use bytes::*;

// Definitions for std types
mod impls;
