//! Codec options, frozen into an [`Api`].

use crate::Api;

/// Options for encoding and decoding.
///
/// Build one with the chained setters, then [`freeze`](Config::freeze) it
/// into an [`Api`]. Codecs are compiled against the frozen options, so two
/// `Api`s with different options never share compiled codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Match record field names ignoring ASCII case (default: false)
    pub case_insensitive: bool,

    /// Fail on object keys that match no record field (default: false)
    pub disallow_unknown_fields: bool,

    /// Write floats with at most this many fractional digits, trailing
    /// zeros trimmed (default: shortest round-trip form)
    pub float_precision: Option<u8>,

    /// Write map entries sorted by key (default: false)
    pub sort_map_keys: bool,

    /// Escape `<`, `>` and `&` in strings (default: false)
    pub escape_html: bool,

    /// Spaces per nesting level; 0 writes compact output (default: 0)
    pub indent: usize,

    /// Check that raw JSON values are well formed before writing them
    /// (default: false)
    pub validate_raw_json: bool,

    /// Deepest container nesting accepted on decode (default: 10000)
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Default options.
    pub const fn new() -> Self {
        Self {
            case_insensitive: false,
            disallow_unknown_fields: false,
            float_precision: None,
            sort_map_keys: false,
            escape_html: false,
            indent: 0,
            validate_raw_json: false,
            max_depth: 10_000,
        }
    }

    /// Behaves like the standard library's JSON package: HTML escaping,
    /// sorted map keys, validated raw values, case-insensitive fields.
    pub const fn compatible() -> Self {
        Self::new()
            .escape_html(true)
            .sort_map_keys(true)
            .validate_raw_json(true)
            .case_insensitive(true)
    }

    /// Trades float precision for speed: six fractional digits at most.
    pub const fn fastest() -> Self {
        Self::new().float_precision(6)
    }

    /// Match field names ignoring ASCII case.
    pub const fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// Reject unknown object keys when decoding records.
    pub const fn disallow_unknown_fields(mut self, yes: bool) -> Self {
        self.disallow_unknown_fields = yes;
        self
    }

    /// Limit fractional digits written for floats.
    pub const fn float_precision(mut self, digits: u8) -> Self {
        self.float_precision = Some(digits);
        self
    }

    /// Sort map keys on output.
    pub const fn sort_map_keys(mut self, yes: bool) -> Self {
        self.sort_map_keys = yes;
        self
    }

    /// Escape HTML-significant characters in strings.
    pub const fn escape_html(mut self, yes: bool) -> Self {
        self.escape_html = yes;
        self
    }

    /// Pretty-print with `spaces` per level.
    pub const fn indent(mut self, spaces: usize) -> Self {
        self.indent = spaces;
        self
    }

    /// Validate raw JSON before writing it.
    pub const fn validate_raw_json(mut self, yes: bool) -> Self {
        self.validate_raw_json = yes;
        self
    }

    /// Set the decode nesting limit.
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Freeze the options into an [`Api`] with its own codec cache and pools.
    pub fn freeze(self) -> Api {
        Api::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let compatible = Config::compatible();
        assert!(compatible.escape_html && compatible.sort_map_keys);
        assert!(compatible.case_insensitive && compatible.validate_raw_json);
        assert_eq!(Config::fastest().float_precision, Some(6));
        assert_eq!(Config::default(), Config::new());
        assert!(!Config::new().case_insensitive);
    }
}
