use core::any::Any;
use core::fmt;

use crate::Shape;

/// Fields for record types (structs with named fields)
#[derive(Clone, Copy)]
pub struct StructDef {
    /// all fields, in declaration order
    pub fields: &'static [Field],
}

impl StructDef {
    /// Construct a `StructDef` from its fields.
    pub const fn new(fields: &'static [Field]) -> Self {
        Self { fields }
    }

    /// Find a field by its Rust name.
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl fmt::Debug for StructDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.fields.iter().map(|field| field.name))
            .finish()
    }
}

/// Borrow a field out of its record. Returns `None` if `record` is not the
/// described type.
pub type FieldGetFn = for<'a> fn(record: &'a dyn Any) -> Option<&'a dyn Any>;

/// Borrow a field mutably out of its record.
pub type FieldGetMutFn = for<'a> fn(record: &'a mut dyn Any) -> Option<&'a mut dyn Any>;

/// Describes a field in a record
#[derive(Clone, Copy)]
pub struct Field {
    /// name of the field in Rust source
    pub name: &'static str,

    /// shape of the inner type
    ///
    /// the layer of indirection allows for cyclic type definitions
    pub shape: fn() -> &'static Shape,

    /// name used on the wire instead of `name`
    pub rename: Option<&'static str>,

    /// extra names accepted when decoding
    pub aliases: &'static [&'static str],

    /// leave the field out of encoded output when its value is empty
    pub omit_empty: bool,

    /// never encode or decode this field
    pub skip: bool,

    /// cf. [`FieldGetFn`]
    pub get: FieldGetFn,

    /// cf. [`FieldGetMutFn`]
    pub get_mut: FieldGetMutFn,
}

impl Field {
    /// A field with no attributes.
    pub const fn new(
        name: &'static str,
        shape: fn() -> &'static Shape,
        get: FieldGetFn,
        get_mut: FieldGetMutFn,
    ) -> Self {
        Self {
            name,
            shape,
            rename: None,
            aliases: &[],
            omit_empty: false,
            skip: false,
            get,
            get_mut,
        }
    }

    /// Sets the wire name.
    pub const fn rename(mut self, rename: &'static str) -> Self {
        self.rename = Some(rename);
        self
    }

    /// Sets the names additionally accepted on decode.
    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Marks the field as omitted from output when empty.
    pub const fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    /// Marks the field as skipped in both directions.
    pub const fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// The name written on encode.
    pub const fn wire_name(&self) -> &'static str {
        match self.rename {
            Some(name) => name,
            None => self.name,
        }
    }

    /// Every name accepted on decode: the wire name, then the aliases.
    pub fn decode_names(&self) -> impl Iterator<Item = &'static str> + use<> {
        core::iter::once(self.wire_name()).chain(self.aliases.iter().copied())
    }

    /// The shape of the field's type.
    #[inline]
    pub fn shape(&self) -> &'static Shape {
        (self.shape)()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("rename", &self.rename)
            .field("aliases", &self.aliases)
            .field("omit_empty", &self.omit_empty)
            .field("skip", &self.skip)
            .finish()
    }
}
