use core::any::Any;
use core::fmt;

use crate::Shape;

/// Describes an owning pointer like `Box<T>`.
#[derive(Clone, Copy)]
pub struct PointerDef {
    /// vtable for interacting with the pointer
    pub vtable: &'static PointerVTable,

    /// shape of the pointee
    pub pointee: &'static Shape,
}

impl PointerDef {
    /// Construct a `PointerDef` from its vtable and pointee shape.
    pub const fn new(vtable: &'static PointerVTable, pointee: &'static Shape) -> Self {
        Self { vtable, pointee }
    }
}

impl fmt::Debug for PointerDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerDef")
            .field("pointee", &self.pointee)
            .finish()
    }
}

/// Borrow the pointee.
pub type PointerBorrowFn = for<'a> fn(ptr: &'a dyn Any) -> Option<&'a dyn Any>;

/// Borrow the pointee mutably.
pub type PointerBorrowMutFn = for<'a> fn(ptr: &'a mut dyn Any) -> Option<&'a mut dyn Any>;

/// Virtual table for owning pointers
#[derive(Clone, Copy)]
pub struct PointerVTable {
    /// cf. [`PointerBorrowFn`]
    pub borrow: PointerBorrowFn,

    /// cf. [`PointerBorrowMutFn`]
    pub borrow_mut: PointerBorrowMutFn,
}
