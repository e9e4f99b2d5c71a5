//! A frozen configuration with its own codec cache and buffer pools.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::{Arc, LazyLock};

use kestrel_core::{Reflect, Shape};
use parking_lot::RwLock;

use crate::any::Any;
use crate::codec::{ValDecoder, ValEncoder};
use crate::compiler;
use crate::error::{JsonError, JsonErrorKind, Result};
use crate::pool::Pool;
use crate::reader::{DEFAULT_BUFFER_SIZE, Reader};
use crate::writer::Writer;
use crate::{Config, PathSegment};

/// Encodes and decodes under one frozen [`Config`].
///
/// Cloning is cheap and clones share everything: the compiled-codec cache
/// and the buffer pools. Build one with [`Config::freeze`], or use the
/// process-wide default from [`api()`].
#[derive(Clone)]
pub struct Api(Arc<ApiInner>);

struct ApiInner {
    config: Config,
    decoders: RwLock<HashMap<TypeId, Arc<dyn ValDecoder>>>,
    encoders: RwLock<HashMap<TypeId, Arc<dyn ValEncoder>>>,
    pools: Pools,
}

pub(crate) struct Pools {
    pub(crate) scratch: Pool,
    pub(crate) stream: Pool,
    pub(crate) writer: Pool,
}

static DEFAULT: LazyLock<Api> = LazyLock::new(|| Api::new(Config::new()));

/// The process-wide [`Api`] with default options.
pub fn api() -> &'static Api {
    &DEFAULT
}

impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("config", &self.0.config)
            .finish_non_exhaustive()
    }
}

impl Api {
    pub(crate) fn new(config: Config) -> Self {
        Api(Arc::new(ApiInner {
            config,
            decoders: RwLock::new(HashMap::new()),
            encoders: RwLock::new(HashMap::new()),
            pools: Pools {
                scratch: Pool::new("scratch"),
                stream: Pool::new("stream"),
                writer: Pool::new("writer"),
            },
        }))
    }

    /// The options this API was frozen with.
    pub fn config(&self) -> &Config {
        &self.0.config
    }

    pub(crate) fn pools(&self) -> &Pools {
        &self.0.pools
    }

    /// True if both handles share one cache.
    pub fn same_as(&self, other: &Api) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn cached_decoder(&self, id: TypeId) -> Option<Arc<dyn ValDecoder>> {
        self.0.decoders.read().get(&id).cloned()
    }

    pub(crate) fn cached_encoder(&self, id: TypeId) -> Option<Arc<dyn ValEncoder>> {
        self.0.encoders.read().get(&id).cloned()
    }

    /// Publish freshly compiled decoders. An entry that is already present
    /// wins over the new one; returns whatever is cached for `root`.
    pub(crate) fn commit_decoders(
        &self,
        compiled: Vec<(TypeId, Arc<dyn ValDecoder>)>,
        root: TypeId,
    ) -> Option<Arc<dyn ValDecoder>> {
        let mut cache = self.0.decoders.write();
        for (id, decoder) in compiled {
            cache.entry(id).or_insert(decoder);
        }
        cache.get(&root).cloned()
    }

    /// Encoder counterpart of [`commit_decoders`](Self::commit_decoders).
    pub(crate) fn commit_encoders(
        &self,
        compiled: Vec<(TypeId, Arc<dyn ValEncoder>)>,
        root: TypeId,
    ) -> Option<Arc<dyn ValEncoder>> {
        let mut cache = self.0.encoders.write();
        for (id, encoder) in compiled {
            cache.entry(id).or_insert(encoder);
        }
        cache.get(&root).cloned()
    }

    /// The compiled decoder for `shape`, compiling it on first use.
    pub fn decoder_for(&self, shape: &'static Shape) -> Result<Arc<dyn ValDecoder>> {
        if let Some(decoder) = self.cached_decoder(shape.id()) {
            return Ok(decoder);
        }
        trace!(shape = %shape, "decoder cache miss");
        compiler::compile_decoder(self, shape)
    }

    /// The compiled encoder for `shape`, compiling it on first use.
    pub fn encoder_for(&self, shape: &'static Shape) -> Result<Arc<dyn ValEncoder>> {
        if let Some(encoder) = self.cached_encoder(shape.id()) {
            return Ok(encoder);
        }
        trace!(shape = %shape, "encoder cache miss");
        compiler::compile_encoder(self, shape)
    }

    /// The compiled decoder for `T`.
    pub fn decoder_of<T: Reflect>(&self) -> Result<Arc<dyn ValDecoder>> {
        self.decoder_for(T::SHAPE)
    }

    /// The compiled encoder for `T`.
    pub fn encoder_of<T: Reflect>(&self) -> Result<Arc<dyn ValEncoder>> {
        self.encoder_for(T::SHAPE)
    }

    /// A reader over `input`. Its buffers go back to this API's pool when
    /// it is dropped.
    pub fn borrow_reader<'a>(&self, input: &'a [u8]) -> Reader<'a> {
        Reader::new(self, input)
    }

    /// A buffering writer. Its buffer goes back to this API's pool when it
    /// is dropped.
    pub fn borrow_writer(&self) -> Writer<'static> {
        Writer::new(self)
    }

    /// Decode a `T` from JSON bytes.
    pub fn from_slice<T: Reflect + Default>(&self, input: &[u8]) -> Result<T> {
        let mut value = T::default();
        self.from_slice_into(input, &mut value)?;
        Ok(value)
    }

    /// Decode a `T` from a JSON string.
    pub fn from_str<T: Reflect + Default>(&self, input: &str) -> Result<T> {
        self.from_slice(input.as_bytes())
    }

    /// Decode JSON bytes into an existing value. Fields missing from the
    /// input keep their current values.
    pub fn from_slice_into<T: Reflect>(&self, input: &[u8], target: &mut T) -> Result<()> {
        let decoder = self.decoder_for(T::SHAPE)?;
        let mut reader = Reader::new(self, input);
        decode_document(&*decoder, target, &mut reader, T::SHAPE)
    }

    /// Decode a `T` from an [`io::Read`], which is read to its end.
    pub fn from_reader<T: Reflect + Default, R: io::Read>(&self, source: R) -> Result<T> {
        let decoder = self.decoder_for(T::SHAPE)?;
        let mut reader = Reader::from_read(self, source, DEFAULT_BUFFER_SIZE);
        let mut value = T::default();
        decode_document(&*decoder, &mut value, &mut reader, T::SHAPE)?;
        Ok(value)
    }

    /// Encode a value to JSON bytes.
    pub fn to_vec<T: Reflect>(&self, value: &T) -> Result<Vec<u8>> {
        let encoder = self.encoder_for(T::SHAPE)?;
        let mut writer = Writer::new(self);
        encode_document(&*encoder, value, &mut writer, T::SHAPE)?;
        Ok(writer.to_vec())
    }

    /// Encode a value to a JSON string.
    pub fn to_string<T: Reflect>(&self, value: &T) -> Result<String> {
        let bytes = self.to_vec(value)?;
        String::from_utf8(bytes).map_err(|_| JsonError::new(JsonErrorKind::InvalidUtf8))
    }

    /// Encode a value into an [`io::Write`]. Output may be partially
    /// written when an error is returned.
    pub fn to_writer<T: Reflect, W: io::Write>(&self, mut sink: W, value: &T) -> Result<()> {
        let encoder = self.encoder_for(T::SHAPE)?;
        let mut writer = Writer::to_sink(self, &mut sink);
        encode_document(&*encoder, value, &mut writer, T::SHAPE)?;
        writer.flush()
    }

    /// Navigate `input` without decoding it: returns the value at `path`,
    /// or an invalid [`Any`] recording where navigation failed.
    pub fn get(&self, input: &[u8], path: &[PathSegment]) -> Any {
        Any::from_bytes(self, bytes::Bytes::copy_from_slice(input)).get(path)
    }

    /// Wrap one JSON value as a lazy [`Any`]. Only the value's extent is
    /// checked; its contents are parsed when asked for.
    pub fn read_any(&self, input: &[u8]) -> Result<Any> {
        let mut reader = Reader::new(self, input);
        let any = reader.read_any();
        let any = any.and_then(|any| reader.ensure_end().map(|()| any));
        any.map_err(|err| top_level(err, Any::SHAPE))
    }

    /// Wrap a native value as an [`Any`]. Navigation borrows into the
    /// value; nothing is encoded until it has to be.
    pub fn wrap<T: Reflect>(&self, value: T) -> Any {
        Any::wrap_in(self, value)
    }
}

/// Decode one top-level value that must span the whole input.
pub(crate) fn decode_document(
    decoder: &dyn ValDecoder,
    target: &mut dyn std::any::Any,
    reader: &mut Reader<'_>,
    shape: &'static Shape,
) -> Result<()> {
    let result = decoder
        .decode(target, reader)
        .and_then(|()| reader.ensure_end());
    result.map_err(|err| top_level(err, shape))
}

pub(crate) fn encode_document(
    encoder: &dyn ValEncoder,
    value: &dyn std::any::Any,
    writer: &mut Writer<'_>,
    shape: &'static Shape,
) -> Result<()> {
    let result = encoder.encode(value, writer).and_then(|()| writer.check());
    result.map_err(|err| err.in_type(shape.type_identifier))
}

/// At the top level, running out of input before a value is a failure.
pub(crate) fn top_level(mut err: JsonError, shape: &'static Shape) -> JsonError {
    if err.is_eof() {
        err.kind = JsonErrorKind::UnexpectedEof {
            expected: "a value",
        };
    }
    err.in_type(shape.type_identifier)
}
