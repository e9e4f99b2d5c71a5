//! Field-name hashing for record dispatch.

const OFFSET_BASIS: u32 = 0x811c_9dc5;
const PRIME: u32 = 0x0100_0193;

/// Incremental 32-bit FNV-1a hasher over field-name bytes.
///
/// With `fold_case`, ASCII letters hash as lowercase so `"Name"` and
/// `"name"` collide on purpose.
#[derive(Clone, Copy, Debug)]
pub struct FieldHasher {
    state: u32,
    fold_case: bool,
}

impl FieldHasher {
    /// Start a new hash.
    pub const fn new(fold_case: bool) -> Self {
        Self {
            state: OFFSET_BASIS,
            fold_case,
        }
    }

    /// Feed bytes.
    #[inline]
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }

    /// Feed one byte.
    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let b = if self.fold_case {
            b.to_ascii_lowercase()
        } else {
            b
        };
        self.state ^= u32::from(b);
        self.state = self.state.wrapping_mul(PRIME);
    }

    /// The hash of everything fed so far.
    #[inline]
    pub const fn finish(&self) -> u32 {
        self.state
    }
}

/// Hash a whole field name.
pub fn field_hash(name: &[u8], fold_case: bool) -> u32 {
    let mut hasher = FieldHasher::new(fold_case);
    hasher.write(name);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_fnv1a() {
        assert_eq!(field_hash(b"", false), 0x811c_9dc5);
        assert_eq!(field_hash(b"a", false), 0xe40c_292c);
        assert_eq!(field_hash(b"foobar", false), 0xbf9c_f968);
    }

    #[test]
    fn folding_case() {
        assert_eq!(field_hash(b"FooBar", true), field_hash(b"foobar", false));
        assert_ne!(field_hash(b"FooBar", false), field_hash(b"foobar", false));
    }

    #[test]
    fn incremental_equals_whole() {
        let mut hasher = FieldHasher::new(false);
        hasher.write(b"foo");
        hasher.write_byte(b'b');
        hasher.write(b"ar");
        assert_eq!(hasher.finish(), field_hash(b"foobar", false));
    }
}
