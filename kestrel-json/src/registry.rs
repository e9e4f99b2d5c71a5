//! User-supplied codecs, consulted before structural compilation.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use kestrel_core::Reflect;
use parking_lot::RwLock;

use crate::codec::{ValDecoder, ValEncoder};

type FieldMap<C> = HashMap<TypeId, HashMap<String, Arc<C>>>;

/// Codecs registered for whole types and for single record fields.
///
/// A registered codec replaces whatever the compiler would build from the
/// type's shape. Registrations only affect codecs compiled afterwards:
/// register before first use of the type (or of any type containing it).
#[derive(Default)]
pub struct Registry {
    decoders: RwLock<HashMap<TypeId, Arc<dyn ValDecoder>>>,
    encoders: RwLock<HashMap<TypeId, Arc<dyn ValEncoder>>>,
    field_decoders: RwLock<FieldMap<dyn ValDecoder>>,
    field_encoders: RwLock<FieldMap<dyn ValEncoder>>,
}

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::default);

/// The process-wide registry, shared by every [`Api`](crate::Api).
pub fn registry() -> &'static Registry {
    &GLOBAL
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("decoders", &self.decoders.read().len())
            .field("encoders", &self.encoders.read().len())
            .field("field_decoders", &self.field_decoders.read().len())
            .field("field_encoders", &self.field_encoders.read().len())
            .finish()
    }
}

impl Registry {
    /// Decode every `T` with `decoder`.
    pub fn register_type_decoder<T: Reflect>(&self, decoder: Arc<dyn ValDecoder>) {
        trace!(type_name = T::SHAPE.type_identifier, "registered decoder");
        self.decoders.write().insert(TypeId::of::<T>(), decoder);
    }

    /// Encode every `T` with `encoder`.
    pub fn register_type_encoder<T: Reflect>(&self, encoder: Arc<dyn ValEncoder>) {
        trace!(type_name = T::SHAPE.type_identifier, "registered encoder");
        self.encoders.write().insert(TypeId::of::<T>(), encoder);
    }

    /// Decode field `field` (by Rust name) of record `T` with `decoder`.
    pub fn register_field_decoder<T: Reflect>(&self, field: &str, decoder: Arc<dyn ValDecoder>) {
        self.field_decoders
            .write()
            .entry(TypeId::of::<T>())
            .or_default()
            .insert(field.to_owned(), decoder);
    }

    /// Encode field `field` (by Rust name) of record `T` with `encoder`.
    pub fn register_field_encoder<T: Reflect>(&self, field: &str, encoder: Arc<dyn ValEncoder>) {
        self.field_encoders
            .write()
            .entry(TypeId::of::<T>())
            .or_default()
            .insert(field.to_owned(), encoder);
    }

    /// The decoder registered for a type.
    pub fn lookup_decoder(&self, id: TypeId) -> Option<Arc<dyn ValDecoder>> {
        self.decoders.read().get(&id).cloned()
    }

    /// The encoder registered for a type.
    pub fn lookup_encoder(&self, id: TypeId) -> Option<Arc<dyn ValEncoder>> {
        self.encoders.read().get(&id).cloned()
    }

    /// The decoder registered for one field of a record type.
    pub fn lookup_field_decoder(&self, record: TypeId, field: &str) -> Option<Arc<dyn ValDecoder>> {
        self.field_decoders.read().get(&record)?.get(field).cloned()
    }

    /// The encoder registered for one field of a record type.
    pub fn lookup_field_encoder(&self, record: TypeId, field: &str) -> Option<Arc<dyn ValEncoder>> {
        self.field_encoders.read().get(&record)?.get(field).cloned()
    }
}
