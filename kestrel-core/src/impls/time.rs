use core::any::TypeId;
use std::time::SystemTime;

use crate::{Def, Reflect, Shape};

// No structural encoding: a codec must be registered for it.
impl Reflect for SystemTime {
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<Self>,
            type_identifier: "SystemTime",
            type_name: core::any::type_name::<Self>,
            def: Def::Opaque,
        }
    };
}
