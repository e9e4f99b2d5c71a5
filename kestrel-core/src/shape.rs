use core::any::{Any, TypeId};
use core::fmt;

use crate::{Def, ScalarType};

/// Types that can describe their own structure.
///
/// The shape is a `'static` constant, so building it costs nothing at
/// runtime. Codecs compiled from it are cached by [`TypeId`].
///
/// Implemented for the std scalars, `String`, `Vec`, fixed arrays,
/// `HashMap`, `BTreeMap`, `Option` and `Box`, and derived for records
/// with `#[derive(Reflect)]`.
pub trait Reflect: Any + Send + Sync {
    /// The shape of this type.
    const SHAPE: &'static Shape;
}

/// Returns the shape of `T`.
///
/// Usable as a `fn() -> &'static Shape` pointer, which is how record fields
/// refer to their types lazily (recursive records need that indirection).
pub const fn shape_of<T: Reflect>() -> &'static Shape {
    T::SHAPE
}

/// Describes a type: its identity and how to reach inside it.
#[derive(Clone, Copy)]
pub struct Shape {
    /// Returns the unique identity of the type.
    pub id: fn() -> TypeId,

    /// Short, unqualified name used in error paths (`"Vec"`, `"Order"`)
    pub type_identifier: &'static str,

    /// Returns the fully qualified type name.
    pub type_name: fn() -> &'static str,

    /// What kind of type this is
    pub def: Def,
}

impl Shape {
    /// The identity of the described type.
    #[inline]
    pub fn id(&self) -> TypeId {
        (self.id)()
    }

    /// The fully qualified name of the described type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Returns true if this shape describes `T`.
    #[inline]
    pub fn is_type<T: Any>(&self) -> bool {
        self.id() == TypeId::of::<T>()
    }

    /// The scalar kind, if this shape describes a scalar.
    pub const fn scalar_type(&self) -> Option<ScalarType> {
        match self.def {
            Def::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Shape {}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("type_name", &self.type_name())
            .field("def", &self.def)
            .finish()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_identifier)
    }
}
