use core::any::Any;
use core::fmt;

use crate::Shape;

/// Fields for list types
#[derive(Clone, Copy)]
pub struct ListDef {
    /// vtable for interacting with the list
    pub vtable: &'static ListVTable,

    /// shape of the items in the list
    pub t: &'static Shape,
}

impl ListDef {
    /// Construct a `ListDef` from its vtable and element shape.
    pub const fn new(vtable: &'static ListVTable, t: &'static Shape) -> Self {
        Self { vtable, t }
    }

    /// Returns the shape of the items in the list
    pub const fn t(&self) -> &'static Shape {
        self.t
    }
}

impl fmt::Debug for ListDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListDef").field("t", &self.t).finish()
    }
}

/// Get the number of items in the list. Returns 0 if `list` is not the
/// described type.
pub type ListLenFn = fn(list: &dyn Any) -> usize;

/// Get the item at `index`.
pub type ListGetFn = for<'a> fn(list: &'a dyn Any, index: usize) -> Option<&'a dyn Any>;

/// Remove every item.
pub type ListClearFn = fn(list: &mut dyn Any);

/// Append a default-constructed item and return it for in-place decoding.
pub type ListPushDefaultFn = for<'a> fn(list: &'a mut dyn Any) -> Option<&'a mut dyn Any>;

/// Virtual table for a list-like type (like `Vec<T>`)
#[derive(Clone, Copy)]
pub struct ListVTable {
    /// cf. [`ListLenFn`]
    pub len: ListLenFn,

    /// cf. [`ListGetFn`]
    pub get: ListGetFn,

    /// cf. [`ListClearFn`]
    pub clear: ListClearFn,

    /// cf. [`ListPushDefaultFn`]
    pub push_default: ListPushDefaultFn,
}
