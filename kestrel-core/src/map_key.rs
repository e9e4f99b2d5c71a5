use std::borrow::Cow;

/// Types usable as map keys.
///
/// JSON object keys are always strings; integer keys travel as their
/// decimal text (`{"1":"2"}`).
pub trait MapKey: Sized {
    /// Parses a key from its wire form.
    fn from_map_key(key: &str) -> Option<Self>;

    /// Renders the key in its wire form.
    fn to_map_key(&self) -> Cow<'_, str>;
}

impl MapKey for String {
    fn from_map_key(key: &str) -> Option<Self> {
        Some(key.to_owned())
    }

    fn to_map_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

macro_rules! int_map_key {
    ($($t:ty),*) => {
        $(
            impl MapKey for $t {
                fn from_map_key(key: &str) -> Option<Self> {
                    key.parse().ok()
                }

                fn to_map_key(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

int_map_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
