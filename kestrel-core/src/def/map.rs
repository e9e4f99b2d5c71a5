use core::any::Any;
use core::fmt;

use crate::Shape;

/// Fields for map types
#[derive(Clone, Copy)]
pub struct MapDef {
    /// vtable for interacting with the map
    pub vtable: &'static MapVTable,

    /// shape of the keys in the map
    pub k: &'static Shape,

    /// shape of the values in the map
    pub v: &'static Shape,
}

impl MapDef {
    /// Construct a `MapDef` from its vtable and key/value shapes.
    pub const fn new(vtable: &'static MapVTable, k: &'static Shape, v: &'static Shape) -> Self {
        Self { vtable, k, v }
    }
}

impl fmt::Debug for MapDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapDef")
            .field("k", &self.k)
            .field("v", &self.v)
            .finish()
    }
}

/// Get the number of entries in the map.
pub type MapLenFn = fn(map: &dyn Any) -> usize;

/// Remove every entry.
pub type MapClearFn = fn(map: &mut dyn Any);

/// Replace the entry for `key` (given in its wire form) with a default value
/// and return that value for in-place decoding.
///
/// Returns `None` if `key` does not parse as the map's key type.
pub type MapInsertDefaultFn =
    for<'a> fn(map: &'a mut dyn Any, key: &str) -> Option<&'a mut dyn Any>;

/// Look up a value by the wire form of its key.
pub type MapGetFn = for<'a> fn(map: &'a dyn Any, key: &str) -> Option<&'a dyn Any>;

/// Visit every entry in iteration order, passing the key in its wire form.
pub type MapForEachFn = for<'a> fn(map: &'a dyn Any, visit: &mut dyn FnMut(&str, &'a dyn Any));

/// Virtual table for a map (`HashMap<K, V>`, `BTreeMap<K, V>`)
#[derive(Clone, Copy)]
pub struct MapVTable {
    /// cf. [`MapLenFn`]
    pub len: MapLenFn,

    /// cf. [`MapClearFn`]
    pub clear: MapClearFn,

    /// cf. [`MapInsertDefaultFn`]
    pub insert_default: MapInsertDefaultFn,

    /// cf. [`MapGetFn`]
    pub get: MapGetFn,

    /// cf. [`MapForEachFn`]
    pub for_each: MapForEachFn,
}
