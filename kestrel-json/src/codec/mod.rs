//! The codec contract, and the built-in codecs the compiler assembles.

use std::any::{Any, type_name};
use std::sync::Arc;

use crate::error::{JsonError, JsonErrorKind, Result};
use crate::{Reader, Writer};

pub(crate) mod builtin;
pub(crate) mod container;
pub(crate) mod scalar;
pub(crate) mod structs;

/// Decodes JSON into a value of one particular type.
///
/// `target` is always the type the decoder was compiled or registered
/// for; a mismatch is reported as [`JsonErrorKind::WrongTarget`].
/// Decoders are shared across threads and must not hold per-call state.
pub trait ValDecoder: Send + Sync {
    /// Read one value from `reader` into `target`.
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()>;
}

/// Encodes values of one particular type as JSON.
pub trait ValEncoder: Send + Sync {
    /// Write `value` as one JSON value.
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()>;

    /// Whether `value` counts as empty for `omit_empty` fields.
    fn is_empty(&self, value: &dyn Any) -> bool {
        let _ = value;
        false
    }
}

/// Downcast a codec target, failing with [`JsonErrorKind::WrongTarget`].
pub fn downcast_ref<T: Any>(value: &dyn Any) -> Result<&T> {
    value.downcast_ref::<T>().ok_or_else(wrong_target::<T>)
}

/// Downcast a codec target mutably, failing with
/// [`JsonErrorKind::WrongTarget`].
pub fn downcast_mut<T: Any>(value: &mut dyn Any) -> Result<&mut T> {
    value.downcast_mut::<T>().ok_or_else(wrong_target::<T>)
}

fn wrong_target<T>() -> JsonError {
    JsonError::new(JsonErrorKind::WrongTarget {
        expected: type_name::<T>(),
    })
}

pub(crate) fn wrong_target_named(expected: &'static str) -> JsonError {
    JsonError::new(JsonErrorKind::WrongTarget { expected })
}

/// A decoder made from a function; see [`decoder_fn`].
pub struct FnDecoder<F>(F);

impl<F> ValDecoder for FnDecoder<F>
where
    F: Fn(&mut dyn Any, &mut Reader<'_>) -> Result<()> + Send + Sync,
{
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        (self.0)(target, reader)
    }
}

/// An encoder made from a function; see [`encoder_fn`].
pub struct FnEncoder<F>(F);

impl<F> ValEncoder for FnEncoder<F>
where
    F: Fn(&dyn Any, &mut Writer<'_>) -> Result<()> + Send + Sync,
{
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        (self.0)(value, writer)
    }
}

/// Turn a function into a decoder, ready to register.
///
/// ```
/// use kestrel_json::{decoder_fn, downcast_mut, registry};
///
/// #[derive(Default)]
/// struct Celsius(f64);
/// # impl kestrel::Reflect for Celsius {
/// #     const SHAPE: &'static kestrel::Shape = &const {
/// #         kestrel::Shape {
/// #             id: std::any::TypeId::of::<Celsius>,
/// #             type_identifier: "Celsius",
/// #             type_name: std::any::type_name::<Celsius>,
/// #             def: kestrel::Def::Opaque,
/// #         }
/// #     };
/// # }
///
/// registry().register_type_decoder::<Celsius>(decoder_fn(|target, reader| {
///     downcast_mut::<Celsius>(target)?.0 = reader.read_f64()?;
///     Ok(())
/// }));
/// let t: Celsius = kestrel_json::from_str("21.5").unwrap();
/// assert_eq!(t.0, 21.5);
/// ```
pub fn decoder_fn<F>(f: F) -> Arc<dyn ValDecoder>
where
    F: Fn(&mut dyn Any, &mut Reader<'_>) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(FnDecoder(f))
}

/// Turn a function into an encoder, ready to register.
pub fn encoder_fn<F>(f: F) -> Arc<dyn ValEncoder>
where
    F: Fn(&dyn Any, &mut Writer<'_>) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(FnEncoder(f))
}
