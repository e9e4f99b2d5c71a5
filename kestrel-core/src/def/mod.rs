mod list;
pub use list::*;

mod array;
pub use array::*;

mod map;
pub use map::*;

mod option;
pub use option::*;

mod pointer;
pub use pointer::*;

mod record;
pub use record::*;

use crate::ScalarType;

/// The semantic definition of a shape: is it a scalar, a list, a record?
#[derive(Clone, Copy, Debug)]
pub enum Def {
    /// Leaf value with a built-in codec.
    Scalar(ScalarType),

    /// `Option<T>`
    Option(OptionDef),

    /// Owning pointer to a single value, e.g. `Box<T>`
    Pointer(PointerDef),

    /// Growable sequence, e.g. `Vec<T>`
    List(ListDef),

    /// Fixed-size sequence, e.g. `[T; N]`
    Array(ArrayDef),

    /// String- or integer-keyed map, e.g. `HashMap<K, V>`
    Map(MapDef),

    /// Record with named fields.
    Struct(StructDef),

    /// Nothing is known about the inside of this type. Encoding or decoding
    /// it requires a registered codec.
    Opaque,
}

impl Def {
    /// Short description of the kind, for logs and error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Def::Scalar(_) => "scalar",
            Def::Option(_) => "option",
            Def::Pointer(_) => "pointer",
            Def::List(_) => "list",
            Def::Array(_) => "array",
            Def::Map(_) => "map",
            Def::Struct(_) => "struct",
            Def::Opaque => "opaque",
        }
    }
}
