#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub use kestrel_core::*;

pub use kestrel_macros::Reflect;
