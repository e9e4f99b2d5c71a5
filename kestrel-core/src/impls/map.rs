use core::any::{Any, TypeId};
use core::hash::{BuildHasher, Hash};
use std::collections::{BTreeMap, HashMap};

use crate::{Def, MapDef, MapKey, MapVTable, Reflect, Shape};

impl<K, V, S> Reflect for HashMap<K, V, S>
where
    K: Reflect + MapKey + Eq + Hash,
    V: Reflect + Default,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<Self>,
            type_identifier: "HashMap",
            type_name: core::any::type_name::<Self>,
            def: Def::Map(MapDef::new(
                &const {
                    MapVTable {
                        len: |map| map.downcast_ref::<Self>().map_or(0, HashMap::len),
                        clear: |map| {
                            if let Some(map) = map.downcast_mut::<Self>() {
                                map.clear();
                            }
                        },
                        insert_default: |map, key| {
                            let map = map.downcast_mut::<Self>()?;
                            let key = K::from_map_key(key)?;
                            let value = map
                                .entry(key)
                                .and_modify(|value| *value = V::default())
                                .or_default();
                            Some(value as &mut dyn Any)
                        },
                        get: |map, key| {
                            let map = map.downcast_ref::<Self>()?;
                            let value = map.get(&K::from_map_key(key)?)?;
                            Some(value as &dyn Any)
                        },
                        for_each: |map, visit| {
                            if let Some(map) = map.downcast_ref::<Self>() {
                                for (key, value) in map {
                                    visit(&*key.to_map_key(), value as &dyn Any);
                                }
                            }
                        },
                    }
                },
                K::SHAPE,
                V::SHAPE,
            )),
        }
    };
}

impl<K, V> Reflect for BTreeMap<K, V>
where
    K: Reflect + MapKey + Ord,
    V: Reflect + Default,
{
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<Self>,
            type_identifier: "BTreeMap",
            type_name: core::any::type_name::<Self>,
            def: Def::Map(MapDef::new(
                &const {
                    MapVTable {
                        len: |map| map.downcast_ref::<Self>().map_or(0, BTreeMap::len),
                        clear: |map| {
                            if let Some(map) = map.downcast_mut::<Self>() {
                                map.clear();
                            }
                        },
                        insert_default: |map, key| {
                            let map = map.downcast_mut::<Self>()?;
                            let key = K::from_map_key(key)?;
                            let value = map
                                .entry(key)
                                .and_modify(|value| *value = V::default())
                                .or_default();
                            Some(value as &mut dyn Any)
                        },
                        get: |map, key| {
                            let map = map.downcast_ref::<Self>()?;
                            let value = map.get(&K::from_map_key(key)?)?;
                            Some(value as &dyn Any)
                        },
                        for_each: |map, visit| {
                            if let Some(map) = map.downcast_ref::<Self>() {
                                for (key, value) in map {
                                    visit(&*key.to_map_key(), value as &dyn Any);
                                }
                            }
                        },
                    }
                },
                K::SHAPE,
                V::SHAPE,
            )),
        }
    };
}
