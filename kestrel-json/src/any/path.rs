use std::fmt;

/// One step of a path into an [`Any`](crate::Any).
///
/// Usually built with [`path!`](crate::path), which converts string
/// literals to keys, integers to indexes and `'*'` to a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object member
    Key(String),
    /// An array element
    Index(usize),
    /// Every member or element; the rest of the path applies to each
    Wildcard,
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl From<char> for PathSegment {
    fn from(c: char) -> Self {
        match c {
            '*' => PathSegment::Wildcard,
            other => PathSegment::Key(other.to_string()),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{key:?}"),
            PathSegment::Index(index) => write!(f, "{index}"),
            PathSegment::Wildcard => f.write_str("*"),
        }
    }
}

/// Render a path as `"a".0.*`.
pub(crate) fn render(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&segment.to_string());
    }
    out
}

/// Build a path for [`Any::get`](crate::Any::get).
///
/// ```
/// use kestrel_json::{PathSegment, path};
///
/// let p = path!["users", 0, '*'];
/// assert_eq!(p[0], PathSegment::Key("users".into()));
/// assert_eq!(p[1], PathSegment::Index(0));
/// assert_eq!(p[2], PathSegment::Wildcard);
/// ```
#[macro_export]
macro_rules! path {
    ($($segment:expr),* $(,)?) => {
        &[$($crate::PathSegment::from($segment)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_readably() {
        let path = [
            PathSegment::from("a"),
            PathSegment::from(3),
            PathSegment::from('*'),
            PathSegment::from('x'),
        ];
        assert_eq!(render(&path), r#""a".3.*."x""#);
        assert_eq!(render(&[]), "");
    }
}
