//! Scalar type identification for shapes.

/// All scalar types supported out of the box.
///
/// Codecs for these are built in; everything else is a container, a record,
/// or an opaque type that needs a registered codec.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ScalarType {
    /// Primitive type `bool`.
    Bool,
    /// Primitive type `char`.
    Char,
    /// `alloc::string::String`.
    String,
    /// [`crate::Bytes`], encoded as a base64 string.
    Bytes,
    /// Primitive type `f32`.
    F32,
    /// Primitive type `f64`.
    F64,
    /// Primitive type `u8`.
    U8,
    /// Primitive type `u16`.
    U16,
    /// Primitive type `u32`.
    U32,
    /// Primitive type `u64`.
    U64,
    /// Primitive type `usize`.
    USize,
    /// Primitive type `i8`.
    I8,
    /// Primitive type `i16`.
    I16,
    /// Primitive type `i32`.
    I32,
    /// Primitive type `i64`.
    I64,
    /// Primitive type `isize`.
    ISize,
}

impl ScalarType {
    /// Returns true for the integer and float kinds.
    pub const fn is_numeric(self) -> bool {
        !matches!(
            self,
            ScalarType::Bool | ScalarType::Char | ScalarType::String | ScalarType::Bytes
        )
    }
}
