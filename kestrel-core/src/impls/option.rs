use core::any::{Any, TypeId};

use crate::{Def, OptionDef, OptionVTable, Reflect, Shape};

impl<T> Reflect for Option<T>
where
    T: Reflect + Default,
{
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<Self>,
            type_identifier: "Option",
            type_name: core::any::type_name::<Self>,
            def: Def::Option(OptionDef::new(
                &const {
                    OptionVTable {
                        is_some: |option| option.downcast_ref::<Self>().is_some_and(Option::is_some),
                        get_value: |option| {
                            let value = option.downcast_ref::<Self>()?.as_ref()?;
                            Some(value as &dyn Any)
                        },
                        set_none: |option| {
                            if let Some(option) = option.downcast_mut::<Self>() {
                                *option = None;
                            }
                        },
                        get_or_insert_default: |option| {
                            let option = option.downcast_mut::<Self>()?;
                            Some(option.get_or_insert_with(T::default) as &mut dyn Any)
                        },
                    }
                },
                T::SHAPE,
            )),
        }
    };
}
