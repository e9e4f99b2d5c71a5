//! Sequences of JSON values over I/O streams.

use std::io;

use kestrel_core::Reflect;

use crate::api::encode_document;
use crate::error::Result;
use crate::reader::DEFAULT_BUFFER_SIZE;
use crate::{Api, Reader, Writer};

/// Decodes consecutive whitespace-separated values from one source, such
/// as newline-delimited JSON.
///
/// ```
/// use kestrel_json::{StreamDecoder, api};
///
/// let input = b"1 2\n3";
/// let mut stream = StreamDecoder::new(api(), &input[..]);
/// let mut sum = 0;
/// while stream.more() {
///     sum += stream.decode::<u32>().unwrap();
/// }
/// assert_eq!(sum, 6);
/// ```
pub struct StreamDecoder<'a> {
    reader: Reader<'a>,
}

impl<'a> StreamDecoder<'a> {
    /// Decode from `source` through a buffer of the default size.
    pub fn new(api: &Api, source: impl io::Read + 'a) -> Self {
        Self::with_buffer_size(api, source, DEFAULT_BUFFER_SIZE)
    }

    /// Decode from `source` through a buffer of `buffer_size` bytes.
    pub fn with_buffer_size(api: &Api, source: impl io::Read + 'a, buffer_size: usize) -> Self {
        StreamDecoder {
            reader: Reader::from_read(api, source, buffer_size),
        }
    }

    /// True while another value follows. False at the end of input or after
    /// an error.
    pub fn more(&mut self) -> bool {
        self.reader.peek_token().is_some()
    }

    /// Decode the next value. At the end of input this fails with
    /// [`JsonErrorKind::Eof`](crate::JsonErrorKind::Eof).
    pub fn decode<T: Reflect + Default>(&mut self) -> Result<T> {
        let mut value = T::default();
        self.decode_into(&mut value)?;
        Ok(value)
    }

    /// Decode the next value into `target`.
    pub fn decode_into<T: Reflect>(&mut self, target: &mut T) -> Result<()> {
        self.reader
            .read_val(target)
            .map_err(|err| err.in_type(T::SHAPE.type_identifier))
    }

    /// The underlying reader, for token-level access between values.
    pub fn reader(&mut self) -> &mut Reader<'a> {
        &mut self.reader
    }
}

/// Writes one value per call, each followed by a newline.
pub struct StreamEncoder<W: io::Write> {
    sink: W,
    writer: Writer<'static>,
}

impl<W: io::Write> StreamEncoder<W> {
    /// Encode into `sink`.
    pub fn new(api: &Api, sink: W) -> Self {
        StreamEncoder {
            sink,
            writer: Writer::new(api),
        }
    }

    /// Encode `value` and write it out with a trailing newline. Nothing is
    /// written when encoding fails.
    pub fn encode<T: Reflect>(&mut self, value: &T) -> Result<()> {
        let encoder = self.writer.api().encoder_for(T::SHAPE)?;
        self.writer.reset();
        encode_document(&*encoder, value, &mut self.writer, T::SHAPE)?;
        self.writer.write_raw(b"\n");
        self.sink.write_all(self.writer.buffered())?;
        Ok(())
    }

    /// Flush the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Give back the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, JsonErrorKind};

    #[test]
    fn decodes_until_the_end() {
        let api = Config::new().freeze();
        let input = br#"{"a":1} [1,2]  "x""#;
        let mut stream = StreamDecoder::with_buffer_size(&api, &input[..], 4);
        assert!(stream.more());
        stream.reader().skip().unwrap();
        assert_eq!(stream.decode::<Vec<u8>>().unwrap(), vec![1, 2]);
        assert_eq!(stream.decode::<String>().unwrap(), "x");
        assert!(!stream.more());
        let err = stream.decode::<String>().unwrap_err();
        assert_eq!(err.kind, JsonErrorKind::Eof);
    }

    #[test]
    fn encodes_one_value_per_line() {
        let api = Config::new().freeze();
        let mut stream = StreamEncoder::new(&api, Vec::new());
        stream.encode(&1u8).unwrap();
        stream.encode(&vec!["a".to_string()]).unwrap();
        assert!(stream.encode(&f64::NAN).is_err());
        stream.encode(&true).unwrap();
        assert_eq!(stream.into_inner(), b"1\n[\"a\"]\ntrue\n");
    }
}
