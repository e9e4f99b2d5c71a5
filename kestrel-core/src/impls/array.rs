use core::any::{Any, TypeId};

use crate::{ArrayDef, ArrayVTable, Def, Reflect, Shape};

impl<T, const N: usize> Reflect for [T; N]
where
    T: Reflect,
{
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<Self>,
            type_identifier: "Array",
            type_name: core::any::type_name::<Self>,
            def: Def::Array(ArrayDef::new(
                &const {
                    ArrayVTable {
                        get: |array, index| {
                            let item = array.downcast_ref::<Self>()?.get(index)?;
                            Some(item as &dyn Any)
                        },
                        get_mut: |array, index| {
                            let item = array.downcast_mut::<Self>()?.get_mut(index)?;
                            Some(item as &mut dyn Any)
                        },
                    }
                },
                T::SHAPE,
                N,
            )),
        }
    };
}
