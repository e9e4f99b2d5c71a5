use std::any::Any;
use std::sync::Arc;

use kestrel_core::{ArrayDef, ListDef, MapDef, OptionDef, PointerDef};

use super::{ValDecoder, ValEncoder, wrong_target_named};
use crate::error::{JsonErrorKind, Result};
use crate::{Reader, Writer};

/// `null` is `None`; anything else decodes into the contained value.
pub(crate) struct OptionCodec<C: ?Sized> {
    pub(crate) def: OptionDef,
    pub(crate) inner: Arc<C>,
}

impl ValDecoder for OptionCodec<dyn ValDecoder> {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        let vtable = self.def.vtable;
        if reader.read_null()? {
            (vtable.set_none)(target);
            return Ok(());
        }
        let Some(inner) = (vtable.get_or_insert_default)(target) else {
            return Err(wrong_target_named(self.def.t.type_identifier));
        };
        self.inner.decode(inner, reader)
    }
}

impl ValEncoder for OptionCodec<dyn ValEncoder> {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        match (self.def.vtable.get_value)(value) {
            Some(inner) => self.inner.encode(inner, writer),
            None => {
                writer.write_null();
                Ok(())
            }
        }
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        !(self.def.vtable.is_some)(value)
    }
}

/// An owning pointer is transparent on the wire.
pub(crate) struct PointerCodec<C: ?Sized> {
    pub(crate) def: PointerDef,
    pub(crate) inner: Arc<C>,
}

impl ValDecoder for PointerCodec<dyn ValDecoder> {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        let Some(pointee) = (self.def.vtable.borrow_mut)(target) else {
            return Err(wrong_target_named(self.def.pointee.type_identifier));
        };
        self.inner.decode(pointee, reader)
    }
}

impl ValEncoder for PointerCodec<dyn ValEncoder> {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        let Some(pointee) = (self.def.vtable.borrow)(value) else {
            return Err(wrong_target_named(self.def.pointee.type_identifier));
        };
        self.inner.encode(pointee, writer)
    }
}

/// Sequences replace their contents on decode; `null` clears them.
pub(crate) struct ListCodec<C: ?Sized> {
    pub(crate) def: ListDef,
    pub(crate) element: Arc<C>,
}

impl ValDecoder for ListCodec<dyn ValDecoder> {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        let vtable = self.def.vtable;
        if reader.read_null()? {
            (vtable.clear)(target);
            return Ok(());
        }
        let has_elements = reader.read_array_start()?;
        (vtable.clear)(target);
        if !has_elements {
            return Ok(());
        }
        let mut index = 0;
        loop {
            let Some(slot) = (vtable.push_default)(target) else {
                return Err(wrong_target_named(self.def.t.type_identifier));
            };
            self.element
                .decode(slot, reader)
                .map_err(|err| err.in_index(index))?;
            index += 1;
            if !reader.read_array_more()? {
                return Ok(());
            }
        }
    }
}

impl ValEncoder for ListCodec<dyn ValEncoder> {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        let vtable = self.def.vtable;
        let len = (vtable.len)(value);
        if len == 0 {
            writer.write_empty_array();
            return Ok(());
        }
        writer.write_array_start();
        for index in 0..len {
            if index > 0 {
                writer.write_more();
            }
            let Some(element) = (vtable.get)(value, index) else {
                return Err(wrong_target_named(self.def.t.type_identifier));
            };
            self.element
                .encode(element, writer)
                .map_err(|err| err.in_index(index))?;
        }
        writer.write_array_end();
        Ok(())
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        (self.def.vtable.len)(value) == 0
    }
}

/// Fixed arrays decode in place. Extra input elements are skipped; when the
/// input is short, the remaining slots keep their values.
pub(crate) struct ArrayCodec<C: ?Sized> {
    pub(crate) def: ArrayDef,
    pub(crate) element: Arc<C>,
}

impl ValDecoder for ArrayCodec<dyn ValDecoder> {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        if reader.read_null()? || !reader.read_array_start()? {
            return Ok(());
        }
        let mut index = 0;
        loop {
            match (self.def.vtable.get_mut)(target, index) {
                Some(slot) => self
                    .element
                    .decode(slot, reader)
                    .map_err(|err| err.in_index(index))?,
                None => reader.skip()?,
            }
            index += 1;
            if !reader.read_array_more()? {
                return Ok(());
            }
        }
    }
}

impl ValEncoder for ArrayCodec<dyn ValEncoder> {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        if self.def.n == 0 {
            writer.write_empty_array();
            return Ok(());
        }
        writer.write_array_start();
        for index in 0..self.def.n {
            if index > 0 {
                writer.write_more();
            }
            let Some(element) = (self.def.vtable.get)(value, index) else {
                return Err(wrong_target_named(self.def.t.type_identifier));
            };
            self.element
                .encode(element, writer)
                .map_err(|err| err.in_index(index))?;
        }
        writer.write_array_end();
        Ok(())
    }

    fn is_empty(&self, _value: &dyn Any) -> bool {
        self.def.n == 0
    }
}

/// Maps merge on decode: each key in the input gets a freshly decoded value,
/// other entries stay. `null` clears the map.
pub(crate) struct MapCodec<C: ?Sized> {
    pub(crate) def: MapDef,
    pub(crate) value: Arc<C>,
    pub(crate) sort_keys: bool,
}

impl ValDecoder for MapCodec<dyn ValDecoder> {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        let vtable = self.def.vtable;
        if reader.read_null()? {
            (vtable.clear)(target);
            return Ok(());
        }
        if !reader.read_object_start()? {
            return Ok(());
        }
        let mut key = String::new();
        loop {
            key.clear();
            key.push_str(reader.read_field_name()?);
            let Some(slot) = (vtable.insert_default)(target, &key) else {
                return Err(reader.report(JsonErrorKind::InvalidMapKey {
                    key,
                    key_type: self.def.k.type_identifier,
                }));
            };
            self.value
                .decode(slot, reader)
                .map_err(|err| err.in_key(key.as_str()))?;
            if !reader.read_object_more()? {
                return Ok(());
            }
        }
    }
}

impl MapCodec<dyn ValEncoder> {
    fn encode_entries<'a>(
        &self,
        entries: impl Iterator<Item = (&'a str, &'a dyn Any)>,
        writer: &mut Writer<'_>,
    ) -> Result<()> {
        writer.write_object_start();
        for (index, (key, value)) in entries.enumerate() {
            if index > 0 {
                writer.write_more();
            }
            writer.write_object_field(key);
            self.value
                .encode(value, writer)
                .map_err(|err| err.in_key(key))?;
        }
        writer.write_object_end();
        Ok(())
    }
}

impl ValEncoder for MapCodec<dyn ValEncoder> {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        let vtable = self.def.vtable;
        if (vtable.len)(value) == 0 {
            writer.write_empty_object();
            return Ok(());
        }
        // keys are rendered on the fly, so they are collected owned
        let mut entries: Vec<(String, &dyn Any)> = Vec::new();
        (vtable.for_each)(value, &mut |key, value| entries.push((key.to_owned(), value)));
        if self.sort_keys {
            entries.sort_by(|a, b| a.0.cmp(&b.0));
        }
        self.encode_entries(
            entries.iter().map(|(key, value)| (key.as_str(), *value)),
            writer,
        )
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        (self.def.vtable.len)(value) == 0
    }
}
