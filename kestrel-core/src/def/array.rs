use core::any::Any;
use core::fmt;

use crate::Shape;

/// Fields for fixed-size array types
#[derive(Clone, Copy)]
pub struct ArrayDef {
    /// vtable for interacting with the array
    pub vtable: &'static ArrayVTable,

    /// shape of the items in the array
    pub t: &'static Shape,

    /// The length of the array
    pub n: usize,
}

impl ArrayDef {
    /// Construct an `ArrayDef` from its vtable, element shape and length.
    pub const fn new(vtable: &'static ArrayVTable, t: &'static Shape, n: usize) -> Self {
        Self { vtable, t, n }
    }
}

impl fmt::Debug for ArrayDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayDef")
            .field("t", &self.t)
            .field("n", &self.n)
            .finish()
    }
}

/// Get the item at `index`, or `None` past the end.
pub type ArrayGetFn = for<'a> fn(array: &'a dyn Any, index: usize) -> Option<&'a dyn Any>;

/// Get the item at `index` mutably, or `None` past the end.
pub type ArrayGetMutFn =
    for<'a> fn(array: &'a mut dyn Any, index: usize) -> Option<&'a mut dyn Any>;

/// Virtual table for a fixed-size array (`[T; N]`)
#[derive(Clone, Copy)]
pub struct ArrayVTable {
    /// cf. [`ArrayGetFn`]
    pub get: ArrayGetFn,

    /// cf. [`ArrayGetMutFn`]
    pub get_mut: ArrayGetMutFn,
}
