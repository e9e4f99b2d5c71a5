//! Builds codecs from shapes.
//!
//! One compilation walks a type and everything it contains, collecting new
//! codecs in a session map. Nothing is published until the walk succeeds;
//! then the whole session is committed to the [`Api`] cache at once, where
//! entries that another thread published first win.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, Weak};

use kestrel_core::{ArrayDef, Def, ListDef, MapDef, OptionDef, PointerDef, ScalarType, Shape};

use crate::codec::builtin;
use crate::codec::container::{ArrayCodec, ListCodec, MapCodec, OptionCodec, PointerCodec};
use crate::codec::scalar;
use crate::codec::structs::{self, FieldBinding, StructEncoder};
use crate::codec::{ValDecoder, ValEncoder};
use crate::error::{JsonError, JsonErrorKind, Result};
use crate::registry::registry;
use crate::{Api, Config, Reader, Writer};

/// Compile (or fetch) the decoder for `shape` and publish it.
pub(crate) fn compile_decoder(api: &Api, shape: &'static Shape) -> Result<Arc<dyn ValDecoder>> {
    let mut compiler = Compiler::<Decode>::new(api);
    let decoder = compiler
        .build(shape)
        .map_err(|err| err.in_type(shape.type_identifier))?;
    let compiled = compiler.compiled.into_iter().collect();
    Ok(api
        .commit_decoders(compiled, shape.id())
        .unwrap_or(decoder))
}

/// Compile (or fetch) the encoder for `shape` and publish it.
pub(crate) fn compile_encoder(api: &Api, shape: &'static Shape) -> Result<Arc<dyn ValEncoder>> {
    let mut compiler = Compiler::<Encode>::new(api);
    let encoder = compiler
        .build(shape)
        .map_err(|err| err.in_type(shape.type_identifier))?;
    let compiled = compiler.compiled.into_iter().collect();
    Ok(api
        .commit_encoders(compiled, shape.id())
        .unwrap_or(encoder))
}

/// What differs between building decoders and building encoders.
trait Direction {
    type Codec: ?Sized + Send + Sync;

    const NAME: &'static str;

    fn cached(api: &Api, id: TypeId) -> Option<Arc<Self::Codec>>;
    fn registered(id: TypeId) -> Option<Arc<Self::Codec>>;
    fn registered_field(record: TypeId, field: &str) -> Option<Arc<Self::Codec>>;
    fn deferred(shape: &'static Shape) -> Arc<Self::Codec>;

    fn scalar(scalar: ScalarType) -> Arc<Self::Codec>;
    fn option(def: OptionDef, inner: Arc<Self::Codec>) -> Arc<Self::Codec>;
    fn pointer(def: PointerDef, inner: Arc<Self::Codec>) -> Arc<Self::Codec>;
    fn list(def: ListDef, element: Arc<Self::Codec>) -> Arc<Self::Codec>;
    fn array(def: ArrayDef, element: Arc<Self::Codec>) -> Arc<Self::Codec>;
    fn map(def: MapDef, value: Arc<Self::Codec>, config: &Config) -> Arc<Self::Codec>;
    fn record(
        type_name: &'static str,
        fields: Vec<FieldBinding<Self::Codec>>,
        config: &Config,
    ) -> Result<Arc<Self::Codec>>;
    fn opaque(shape: &'static Shape) -> Option<Arc<Self::Codec>>;
}

struct Decode;

impl Direction for Decode {
    type Codec = dyn ValDecoder;

    const NAME: &'static str = "decoder";

    fn cached(api: &Api, id: TypeId) -> Option<Arc<dyn ValDecoder>> {
        api.cached_decoder(id)
    }

    fn registered(id: TypeId) -> Option<Arc<dyn ValDecoder>> {
        registry().lookup_decoder(id)
    }

    fn registered_field(record: TypeId, field: &str) -> Option<Arc<dyn ValDecoder>> {
        registry().lookup_field_decoder(record, field)
    }

    fn deferred(shape: &'static Shape) -> Arc<dyn ValDecoder> {
        Arc::new(DeferredDecoder {
            shape,
            resolved: OnceLock::new(),
        })
    }

    fn scalar(scalar: ScalarType) -> Arc<dyn ValDecoder> {
        scalar::decoder(scalar)
    }

    fn option(def: OptionDef, inner: Arc<dyn ValDecoder>) -> Arc<dyn ValDecoder> {
        Arc::new(OptionCodec { def, inner })
    }

    fn pointer(def: PointerDef, inner: Arc<dyn ValDecoder>) -> Arc<dyn ValDecoder> {
        Arc::new(PointerCodec { def, inner })
    }

    fn list(def: ListDef, element: Arc<dyn ValDecoder>) -> Arc<dyn ValDecoder> {
        Arc::new(ListCodec { def, element })
    }

    fn array(def: ArrayDef, element: Arc<dyn ValDecoder>) -> Arc<dyn ValDecoder> {
        Arc::new(ArrayCodec { def, element })
    }

    fn map(def: MapDef, value: Arc<dyn ValDecoder>, config: &Config) -> Arc<dyn ValDecoder> {
        Arc::new(MapCodec {
            def,
            value,
            sort_keys: config.sort_map_keys,
        })
    }

    fn record(
        type_name: &'static str,
        fields: Vec<FieldBinding<dyn ValDecoder>>,
        config: &Config,
    ) -> Result<Arc<dyn ValDecoder>> {
        structs::decoder(type_name, fields, config)
    }

    fn opaque(shape: &'static Shape) -> Option<Arc<dyn ValDecoder>> {
        builtin::decoder(shape)
    }
}

struct Encode;

impl Direction for Encode {
    type Codec = dyn ValEncoder;

    const NAME: &'static str = "encoder";

    fn cached(api: &Api, id: TypeId) -> Option<Arc<dyn ValEncoder>> {
        api.cached_encoder(id)
    }

    fn registered(id: TypeId) -> Option<Arc<dyn ValEncoder>> {
        registry().lookup_encoder(id)
    }

    fn registered_field(record: TypeId, field: &str) -> Option<Arc<dyn ValEncoder>> {
        registry().lookup_field_encoder(record, field)
    }

    fn deferred(shape: &'static Shape) -> Arc<dyn ValEncoder> {
        Arc::new(DeferredEncoder {
            shape,
            resolved: OnceLock::new(),
        })
    }

    fn scalar(scalar: ScalarType) -> Arc<dyn ValEncoder> {
        scalar::encoder(scalar)
    }

    fn option(def: OptionDef, inner: Arc<dyn ValEncoder>) -> Arc<dyn ValEncoder> {
        Arc::new(OptionCodec { def, inner })
    }

    fn pointer(def: PointerDef, inner: Arc<dyn ValEncoder>) -> Arc<dyn ValEncoder> {
        Arc::new(PointerCodec { def, inner })
    }

    fn list(def: ListDef, element: Arc<dyn ValEncoder>) -> Arc<dyn ValEncoder> {
        Arc::new(ListCodec { def, element })
    }

    fn array(def: ArrayDef, element: Arc<dyn ValEncoder>) -> Arc<dyn ValEncoder> {
        Arc::new(ArrayCodec { def, element })
    }

    fn map(def: MapDef, value: Arc<dyn ValEncoder>, config: &Config) -> Arc<dyn ValEncoder> {
        Arc::new(MapCodec {
            def,
            value,
            sort_keys: config.sort_map_keys,
        })
    }

    fn record(
        type_name: &'static str,
        fields: Vec<FieldBinding<dyn ValEncoder>>,
        _config: &Config,
    ) -> Result<Arc<dyn ValEncoder>> {
        Ok(Arc::new(StructEncoder::new(type_name, fields)))
    }

    fn opaque(shape: &'static Shape) -> Option<Arc<dyn ValEncoder>> {
        builtin::encoder(shape)
    }
}

struct Compiler<'a, D: Direction> {
    api: &'a Api,
    compiled: HashMap<TypeId, Arc<D::Codec>>,
    in_progress: HashSet<TypeId>,
}

impl<'a, D: Direction> Compiler<'a, D> {
    fn new(api: &'a Api) -> Self {
        Compiler {
            api,
            compiled: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    fn build(&mut self, shape: &'static Shape) -> Result<Arc<D::Codec>> {
        let id = shape.id();
        if let Some(codec) = D::cached(self.api, id) {
            return Ok(codec);
        }
        if let Some(codec) = self.compiled.get(&id) {
            return Ok(Arc::clone(codec));
        }
        if self.in_progress.contains(&id) {
            trace!(shape = %shape, direction = D::NAME, "recursive type, deferring");
            return Ok(D::deferred(shape));
        }

        self.in_progress.insert(id);
        let codec = self.build_fresh(shape);
        self.in_progress.remove(&id);
        let codec = codec?;
        self.compiled.insert(id, Arc::clone(&codec));
        Ok(codec)
    }

    fn build_fresh(&mut self, shape: &'static Shape) -> Result<Arc<D::Codec>> {
        if let Some(codec) = D::registered(shape.id()) {
            debug!(shape = %shape, direction = D::NAME, "using registered codec");
            return Ok(codec);
        }
        debug!(
            shape = %shape,
            kind = shape.def.kind_name(),
            direction = D::NAME,
            "compiling"
        );
        match shape.def {
            Def::Scalar(scalar) => Ok(D::scalar(scalar)),
            Def::Option(def) => {
                let inner = self.build(def.t)?;
                Ok(D::option(def, inner))
            }
            Def::Pointer(def) => {
                let inner = self.build(def.pointee)?;
                Ok(D::pointer(def, inner))
            }
            Def::List(def) => {
                let element = self.build(def.t)?;
                Ok(D::list(def, element))
            }
            Def::Array(def) => {
                let element = self.build(def.t)?;
                Ok(D::array(def, element))
            }
            Def::Map(def) => {
                let value = self.build(def.v)?;
                Ok(D::map(def, value, self.api.config()))
            }
            Def::Struct(def) => {
                let mut fields = Vec::with_capacity(def.fields.len());
                for field in def.fields {
                    if field.skip {
                        continue;
                    }
                    let codec = match D::registered_field(shape.id(), field.name) {
                        Some(codec) => codec,
                        None => self
                            .build(field.shape())
                            .map_err(|err| err.in_field(field.name))?,
                    };
                    fields.push(FieldBinding { field, codec });
                }
                D::record(shape.type_identifier, fields, self.api.config())
            }
            Def::Opaque => D::opaque(shape).ok_or_else(|| {
                JsonError::new(JsonErrorKind::NoCodec {
                    type_name: shape.type_identifier,
                })
            }),
        }
    }
}

/// Stands in for a decoder that was still being built when it was needed.
/// Resolves through the cache on first use; by then the outer compilation
/// has published it.
struct DeferredDecoder {
    shape: &'static Shape,
    resolved: OnceLock<Weak<dyn ValDecoder>>,
}

impl DeferredDecoder {
    fn resolve(&self, api: &Api) -> Result<Arc<dyn ValDecoder>> {
        if let Some(decoder) = self.resolved.get().and_then(Weak::upgrade) {
            return Ok(decoder);
        }
        let decoder = api.decoder_for(self.shape)?;
        // the cache keeps the decoder alive; holding it weakly avoids a cycle
        let _ = self.resolved.set(Arc::downgrade(&decoder));
        Ok(decoder)
    }
}

impl ValDecoder for DeferredDecoder {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        let decoder = self.resolve(reader.api())?;
        decoder.decode(target, reader)
    }
}

/// Encoder counterpart of [`DeferredDecoder`].
struct DeferredEncoder {
    shape: &'static Shape,
    resolved: OnceLock<Weak<dyn ValEncoder>>,
}

impl DeferredEncoder {
    fn resolve(&self, api: &Api) -> Result<Arc<dyn ValEncoder>> {
        if let Some(encoder) = self.resolved.get().and_then(Weak::upgrade) {
            return Ok(encoder);
        }
        let encoder = api.encoder_for(self.shape)?;
        let _ = self.resolved.set(Arc::downgrade(&encoder));
        Ok(encoder)
    }
}

impl ValEncoder for DeferredEncoder {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        let encoder = self.resolve(writer.api())?;
        encoder.encode(value, writer)
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        // without an api at hand, only an already resolved encoder can tell
        self.resolved
            .get()
            .and_then(Weak::upgrade)
            .is_some_and(|encoder| encoder.is_empty(value))
    }
}
