use core::any::TypeId;

use crate::{Bytes, Def, Reflect, ScalarType, Shape};

macro_rules! impl_reflect_for_scalar {
    ($($t:ty => $kind:ident, $ident:literal;)*) => {
        $(
            impl Reflect for $t {
                const SHAPE: &'static Shape = &const {
                    Shape {
                        id: TypeId::of::<$t>,
                        type_identifier: $ident,
                        type_name: core::any::type_name::<$t>,
                        def: Def::Scalar(ScalarType::$kind),
                    }
                };
            }
        )*
    };
}

impl_reflect_for_scalar! {
    bool => Bool, "bool";
    char => Char, "char";
    String => String, "String";
    Bytes => Bytes, "Bytes";
    f32 => F32, "f32";
    f64 => F64, "f64";
    u8 => U8, "u8";
    u16 => U16, "u16";
    u32 => U32, "u32";
    u64 => U64, "u64";
    usize => USize, "usize";
    i8 => I8, "i8";
    i16 => I16, "i16";
    i32 => I32, "i32";
    i64 => I64, "i64";
    isize => ISize, "isize";
}
