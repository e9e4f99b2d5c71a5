use core::any::{Any, TypeId};

use crate::{Def, ListDef, ListVTable, Reflect, Shape};

impl<T> Reflect for Vec<T>
where
    T: Reflect + Default,
{
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<Self>,
            type_identifier: "Vec",
            type_name: core::any::type_name::<Self>,
            def: Def::List(ListDef::new(
                &const {
                    ListVTable {
                        len: |list| list.downcast_ref::<Self>().map_or(0, Vec::len),
                        get: |list, index| {
                            let item = list.downcast_ref::<Self>()?.get(index)?;
                            Some(item as &dyn Any)
                        },
                        clear: |list| {
                            if let Some(list) = list.downcast_mut::<Self>() {
                                list.clear();
                            }
                        },
                        push_default: |list| {
                            let list = list.downcast_mut::<Self>()?;
                            list.push(T::default());
                            list.last_mut().map(|item| item as &mut dyn Any)
                        },
                    }
                },
                T::SHAPE,
            )),
        }
    };
}
