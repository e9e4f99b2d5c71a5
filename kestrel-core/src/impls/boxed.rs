use core::any::{Any, TypeId};

use crate::{Def, PointerDef, PointerVTable, Reflect, Shape};

impl<T> Reflect for Box<T>
where
    T: Reflect,
{
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<Self>,
            type_identifier: "Box",
            type_name: core::any::type_name::<Self>,
            def: Def::Pointer(PointerDef::new(
                &const {
                    PointerVTable {
                        borrow: |ptr| {
                            let boxed = ptr.downcast_ref::<Self>()?;
                            Some(&**boxed as &dyn Any)
                        },
                        borrow_mut: |ptr| {
                            let boxed = ptr.downcast_mut::<Self>()?;
                            Some(&mut **boxed as &mut dyn Any)
                        },
                    }
                },
                T::SHAPE,
            )),
        }
    };
}
