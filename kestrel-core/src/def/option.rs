use core::any::Any;
use core::fmt;

use crate::Shape;

/// Describes an `Option<T>`: its vtable and the shape of `T`.
#[derive(Clone, Copy)]
pub struct OptionDef {
    /// vtable for interacting with the option
    pub vtable: &'static OptionVTable,

    /// shape of the inner type of the option
    pub t: &'static Shape,
}

impl OptionDef {
    /// Construct an `OptionDef` from its vtable and inner shape.
    pub const fn new(vtable: &'static OptionVTable, t: &'static Shape) -> Self {
        Self { vtable, t }
    }
}

impl fmt::Debug for OptionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDef").field("t", &self.t).finish()
    }
}

/// Check if an option is `Some`.
pub type OptionIsSomeFn = fn(option: &dyn Any) -> bool;

/// Get the value contained in an option, if present.
pub type OptionGetValueFn = for<'a> fn(option: &'a dyn Any) -> Option<&'a dyn Any>;

/// Set the option to `None`.
pub type OptionSetNoneFn = fn(option: &mut dyn Any);

/// Return the contained value, inserting a default first if the option is
/// `None`.
pub type OptionGetOrInsertFn = for<'a> fn(option: &'a mut dyn Any) -> Option<&'a mut dyn Any>;

/// Virtual table for `Option<T>`
#[derive(Clone, Copy)]
pub struct OptionVTable {
    /// cf. [`OptionIsSomeFn`]
    pub is_some: OptionIsSomeFn,

    /// cf. [`OptionGetValueFn`]
    pub get_value: OptionGetValueFn,

    /// cf. [`OptionSetNoneFn`]
    pub set_none: OptionSetNoneFn,

    /// cf. [`OptionGetOrInsertFn`]
    pub get_or_insert_default: OptionGetOrInsertFn,
}
