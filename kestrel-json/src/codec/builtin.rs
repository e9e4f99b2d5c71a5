//! Codecs for the opaque types this crate defines itself.

use std::any::Any as StdAny;
use std::sync::Arc;

use kestrel_core::Shape;

use super::{ValDecoder, ValEncoder, downcast_mut, downcast_ref};
use crate::error::{JsonErrorKind, Result};
use crate::{Any, RawJson, Reader, Writer};

pub(crate) fn decoder(shape: &'static Shape) -> Option<Arc<dyn ValDecoder>> {
    if shape.is_type::<Any>() {
        Some(Arc::new(AnyCodec))
    } else if shape.is_type::<RawJson>() {
        Some(Arc::new(RawJsonCodec))
    } else {
        None
    }
}

pub(crate) fn encoder(shape: &'static Shape) -> Option<Arc<dyn ValEncoder>> {
    if shape.is_type::<Any>() {
        Some(Arc::new(AnyCodec))
    } else if shape.is_type::<RawJson>() {
        Some(Arc::new(RawJsonCodec))
    } else {
        None
    }
}

/// An [`Any`] field captures its value lazily.
struct AnyCodec;

impl ValDecoder for AnyCodec {
    fn decode(&self, target: &mut dyn StdAny, reader: &mut Reader<'_>) -> Result<()> {
        let any = reader.read_any()?;
        *downcast_mut::<Any>(target)? = any;
        Ok(())
    }
}

impl ValEncoder for AnyCodec {
    fn encode(&self, value: &dyn StdAny, writer: &mut Writer<'_>) -> Result<()> {
        downcast_ref::<Any>(value)?.write_to(writer)
    }

    fn is_empty(&self, value: &dyn StdAny) -> bool {
        value
            .downcast_ref::<Any>()
            .is_some_and(|any| any.is_invalid() || any.is_null())
    }
}

struct RawJsonCodec;

impl ValDecoder for RawJsonCodec {
    fn decode(&self, target: &mut dyn StdAny, reader: &mut Reader<'_>) -> Result<()> {
        let bytes = reader.skip_and_return_bytes()?;
        downcast_mut::<RawJson>(target)?.0 = bytes;
        Ok(())
    }
}

impl ValEncoder for RawJsonCodec {
    fn encode(&self, value: &dyn StdAny, writer: &mut Writer<'_>) -> Result<()> {
        let raw = downcast_ref::<RawJson>(value)?;
        if raw.0.is_empty() {
            writer.write_null();
            return Ok(());
        }
        if writer.api().config().validate_raw_json {
            let mut reader = Reader::new(writer.api(), &raw.0);
            let checked = reader.skip().and_then(|()| reader.ensure_end());
            checked.map_err(|mut err| {
                if err.is_eof() {
                    err.kind = JsonErrorKind::UnexpectedEof {
                        expected: "a value",
                    };
                }
                err
            })?;
        }
        writer.write_raw(&raw.0);
        Ok(())
    }

    fn is_empty(&self, value: &dyn StdAny) -> bool {
        value.downcast_ref::<RawJson>().is_some_and(|raw| raw.0.is_empty())
    }
}
