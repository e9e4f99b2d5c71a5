use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use kestrel_core::{Bytes, ScalarType};

use super::{ValDecoder, ValEncoder, downcast_mut, downcast_ref};
use crate::error::Result;
use crate::{Reader, Writer};

/// Numbers with a reader and writer method each.
trait JsonNumber: Copy + Default + PartialEq + Any + Send + Sync {
    fn read(reader: &mut Reader<'_>) -> Result<Self>;
    fn write(self, writer: &mut Writer<'_>);
}

macro_rules! json_number {
    ($($ty:ty => $read:ident, $write:ident;)*) => {
        $(
            impl JsonNumber for $ty {
                #[inline]
                fn read(reader: &mut Reader<'_>) -> Result<Self> {
                    reader.$read()
                }

                #[inline]
                fn write(self, writer: &mut Writer<'_>) {
                    writer.$write(self)
                }
            }
        )*
    };
}

json_number! {
    i8 => read_i8, write_i8;
    i16 => read_i16, write_i16;
    i32 => read_i32, write_i32;
    i64 => read_i64, write_i64;
    isize => read_isize, write_isize;
    u8 => read_u8, write_u8;
    u16 => read_u16, write_u16;
    u32 => read_u32, write_u32;
    u64 => read_u64, write_u64;
    usize => read_usize, write_usize;
    f32 => read_f32, write_f32;
    f64 => read_f64, write_f64;
}

struct NumberCodec<T>(PhantomData<fn() -> T>);

impl<T: JsonNumber> ValDecoder for NumberCodec<T> {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        if reader.read_null()? {
            return Ok(());
        }
        let value = T::read(reader)?;
        *downcast_mut::<T>(target)? = value;
        Ok(())
    }
}

impl<T: JsonNumber> ValEncoder for NumberCodec<T> {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        downcast_ref::<T>(value)?.write(writer);
        // NaN and infinities are refused by the writer
        writer.check()
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        value.downcast_ref::<T>() == Some(&T::default())
    }
}

struct BoolCodec;

impl ValDecoder for BoolCodec {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        if reader.read_null()? {
            return Ok(());
        }
        let value = reader.read_bool()?;
        *downcast_mut::<bool>(target)? = value;
        Ok(())
    }
}

impl ValEncoder for BoolCodec {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        writer.write_bool(*downcast_ref::<bool>(value)?);
        Ok(())
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        value.downcast_ref::<bool>() == Some(&false)
    }
}

struct StringCodec;

impl ValDecoder for StringCodec {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        if reader.read_null()? {
            return Ok(());
        }
        let target = downcast_mut::<String>(target)?;
        target.clear();
        target.push_str(reader.read_str()?);
        Ok(())
    }
}

impl ValEncoder for StringCodec {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        writer.write_string(downcast_ref::<String>(value)?);
        Ok(())
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        value.downcast_ref::<String>().is_some_and(String::is_empty)
    }
}

struct CharCodec;

impl ValDecoder for CharCodec {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        if reader.read_null()? {
            return Ok(());
        }
        let value = reader.read_char()?;
        *downcast_mut::<char>(target)? = value;
        Ok(())
    }
}

impl ValEncoder for CharCodec {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        let mut utf8 = [0u8; 4];
        writer.write_string(downcast_ref::<char>(value)?.encode_utf8(&mut utf8));
        Ok(())
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        value.downcast_ref::<char>() == Some(&'\0')
    }
}

/// Byte buffers travel as base64 strings.
struct BytesCodec;

impl ValDecoder for BytesCodec {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        let target = downcast_mut::<Bytes>(target)?;
        if reader.read_null()? {
            target.clear();
            return Ok(());
        }
        target.0 = reader.read_base64()?;
        Ok(())
    }
}

impl ValEncoder for BytesCodec {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        writer.write_base64(downcast_ref::<Bytes>(value)?);
        writer.check()
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        value.downcast_ref::<Bytes>().is_some_and(|b| b.is_empty())
    }
}

/// Every scalar codec works in both directions.
trait ScalarCodec: ValDecoder + ValEncoder {}

impl<T: ValDecoder + ValEncoder> ScalarCodec for T {}

fn number<T: JsonNumber>() -> Arc<dyn ScalarCodec> {
    Arc::new(NumberCodec::<T>(PhantomData))
}

fn codec(scalar: ScalarType) -> Arc<dyn ScalarCodec> {
    match scalar {
        ScalarType::Bool => Arc::new(BoolCodec),
        ScalarType::Char => Arc::new(CharCodec),
        ScalarType::String => Arc::new(StringCodec),
        ScalarType::Bytes => Arc::new(BytesCodec),
        ScalarType::F32 => number::<f32>(),
        ScalarType::F64 => number::<f64>(),
        ScalarType::U8 => number::<u8>(),
        ScalarType::U16 => number::<u16>(),
        ScalarType::U32 => number::<u32>(),
        ScalarType::U64 => number::<u64>(),
        ScalarType::USize => number::<usize>(),
        ScalarType::I8 => number::<i8>(),
        ScalarType::I16 => number::<i16>(),
        ScalarType::I32 => number::<i32>(),
        ScalarType::I64 => number::<i64>(),
        ScalarType::ISize => number::<isize>(),
    }
}

/// Decoder for a scalar kind.
pub(crate) fn decoder(scalar: ScalarType) -> Arc<dyn ValDecoder> {
    codec(scalar)
}

/// Encoder for a scalar kind.
pub(crate) fn encoder(scalar: ScalarType) -> Arc<dyn ValEncoder> {
    codec(scalar)
}
