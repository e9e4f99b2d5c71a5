use super::Reader;
use crate::error::{JsonErrorKind, Result};
use crate::hash::FieldHasher;

impl Reader<'_> {
    /// Just after an opening bracket: returns false if `close` follows
    /// immediately, otherwise enters the container.
    fn enter(&mut self, close: u8, expected: &'static str) -> Result<bool> {
        match self.next_token() {
            Some(b) if b == close => Ok(false),
            Some(_) => {
                self.unread_byte();
                self.depth += 1;
                if self.depth > self.max_depth {
                    let limit = self.max_depth;
                    return Err(self.report(JsonErrorKind::DepthLimitExceeded { limit }));
                }
                Ok(true)
            }
            None => Err(self.report(JsonErrorKind::UnexpectedEof { expected })),
        }
    }

    fn more(&mut self, close: u8, expected: &'static str) -> Result<bool> {
        match self.next_token() {
            Some(b',') => Ok(true),
            Some(b) if b == close => {
                self.depth = self.depth.saturating_sub(1);
                Ok(false)
            }
            Some(b) => Err(self.unexpected_token(b, expected)),
            None => Err(self.report(JsonErrorKind::UnexpectedEof { expected })),
        }
    }

    fn expect_colon(&mut self) -> Result<()> {
        match self.next_token() {
            Some(b':') => Ok(()),
            Some(b) => Err(self.unexpected_token(b, "`:`")),
            None => Err(self.report(JsonErrorKind::UnexpectedEof { expected: "`:`" })),
        }
    }

    fn open_key(&mut self) -> Result<()> {
        match self.next_token() {
            Some(b'"') => Ok(()),
            Some(b) => Err(self.unexpected_token(b, "an object key")),
            None => Err(self.report(JsonErrorKind::UnexpectedEof {
                expected: "an object key",
            })),
        }
    }

    /// Consumes `{`. Returns true if the object has entries, in which case
    /// the caller reads `key: value` pairs separated by
    /// [`read_object_more`](Self::read_object_more).
    pub fn read_object_start(&mut self) -> Result<bool> {
        match self.value_start("an object")? {
            b'{' => self.enter(b'}', "an object key or `}`"),
            b => Err(self.unexpected(b, "an object")),
        }
    }

    /// Consumes `,` (returns true) or the closing `}` (returns false).
    pub fn read_object_more(&mut self) -> Result<bool> {
        self.more(b'}', "`,` or `}`")
    }

    /// Consumes `[`. Returns true if the array has elements.
    pub fn read_array_start(&mut self) -> Result<bool> {
        match self.value_start("an array")? {
            b'[' => self.enter(b']', "an array element or `]`"),
            b => Err(self.unexpected(b, "an array")),
        }
    }

    /// Consumes `,` (returns true) or the closing `]` (returns false).
    pub fn read_array_more(&mut self) -> Result<bool> {
        self.more(b']', "`,` or `]`")
    }

    /// Reads an object key and the `:` after it.
    pub fn read_field_name(&mut self) -> Result<&str> {
        self.open_key()?;
        let loc = self.scan_string()?;
        let loc = self.pin(loc);
        self.expect_colon()?;
        self.loc_str(loc)
    }

    /// Reads an object key and the `:` after it, returning only the key's
    /// [`field_hash`](crate::field_hash). Keys are folded to lowercase
    /// first when the API matches case-insensitively.
    pub fn read_field_hash(&mut self) -> Result<u32> {
        self.open_key()?;
        let loc = self.scan_string()?;
        let mut hasher = FieldHasher::new(self.fold_case);
        hasher.write(self.loc_bytes(loc));
        self.expect_colon()?;
        Ok(hasher.finish())
    }

    /// Calls `f` with each key of the next object, positioned at the
    /// entry's value. `f` must consume the value. `null` reads as no
    /// entries.
    pub fn read_object_cb(
        &mut self,
        mut f: impl FnMut(&mut Self, &str) -> Result<()>,
    ) -> Result<()> {
        if self.read_null()? || !self.read_object_start()? {
            return Ok(());
        }
        let mut key = String::new();
        loop {
            key.clear();
            key.push_str(self.read_field_name()?);
            f(self, &key)?;
            if !self.read_object_more()? {
                return Ok(());
            }
        }
    }

    /// Calls `f` once per element of the next array, positioned at the
    /// element. `f` must consume the element. `null` reads as no elements.
    pub fn read_array_cb(&mut self, mut f: impl FnMut(&mut Self) -> Result<()>) -> Result<()> {
        if self.read_null()? || !self.read_array_start()? {
            return Ok(());
        }
        loop {
            f(self)?;
            if !self.read_array_more()? {
                return Ok(());
            }
        }
    }
}
