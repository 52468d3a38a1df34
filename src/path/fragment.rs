//! Path fragments and flattening.
//!
//! A [`Fragment`] is one unit of input to path construction: either a single
//! segment string or an arbitrarily nested list of further fragments. Callers
//! can mix both freely:
//!
//! ```rust
//! use stencil::fragment;
//! use stencil::path::flatten;
//!
//! let parts = flatten(fragment!(["views", ["layout", ["partials", "nav"]], "item.html"]));
//! assert_eq!(parts, vec!["views", "layout", "partials", "nav", "item.html"]);
//! ```

use std::path::{Path, PathBuf};

/// One input unit to path construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A literal piece of a path, possibly containing separators itself.
    Segment(String),
    /// A list of fragments, flattened in order.
    Nested(Vec<Fragment>),
}

impl Fragment {
    /// Returns `true` for a fragment that flattens to nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Fragment::Segment(_) => false,
            Fragment::Nested(items) => items.iter().all(Fragment::is_empty),
        }
    }
}

impl From<&str> for Fragment {
    fn from(value: &str) -> Self {
        Fragment::Segment(value.to_string())
    }
}

impl From<String> for Fragment {
    fn from(value: String) -> Self {
        Fragment::Segment(value)
    }
}

impl From<&String> for Fragment {
    fn from(value: &String) -> Self {
        Fragment::Segment(value.clone())
    }
}

impl From<&Path> for Fragment {
    fn from(value: &Path) -> Self {
        Fragment::Segment(value.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for Fragment {
    fn from(value: PathBuf) -> Self {
        Fragment::Segment(value.to_string_lossy().into_owned())
    }
}

impl From<char> for Fragment {
    fn from(value: char) -> Self {
        Fragment::Segment(value.to_string())
    }
}

// Non-string leaves take their string form.
macro_rules! impl_numeric_fragment {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Fragment {
                fn from(value: $ty) -> Self {
                    Fragment::Segment(value.to_string())
                }
            }
        )*
    };
}

impl_numeric_fragment!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Into<Fragment>> From<Vec<T>> for Fragment {
    fn from(value: Vec<T>) -> Self {
        Fragment::Nested(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Fragment>, const N: usize> From<[T; N]> for Fragment {
    fn from(value: [T; N]) -> Self {
        Fragment::Nested(value.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Fragment {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Fragment::Segment(String::new()),
            Value::String(s) => Fragment::Segment(s),
            Value::Array(items) => Fragment::Nested(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                Fragment::Nested(map.into_iter().map(|(_, v)| v.into()).collect())
            }
            other => Fragment::Segment(other.to_string()),
        }
    }
}

/// Build a [`Fragment`] from a bracketed literal.
///
/// Leaves must be single tokens (literals or identifiers); wrap anything
/// longer in parentheses.
///
/// ```rust
/// use stencil::fragment;
/// use stencil::path::Fragment;
///
/// let f = fragment!(["a", ["b"]]);
/// assert_eq!(
///     f,
///     Fragment::Nested(vec![
///         Fragment::Segment("a".into()),
///         Fragment::Nested(vec![Fragment::Segment("b".into())]),
///     ])
/// );
/// ```
#[macro_export]
macro_rules! fragment {
    ([$($inner:tt),* $(,)?]) => {
        $crate::path::Fragment::Nested(vec![$($crate::fragment!($inner)),*])
    };
    ($leaf:expr) => {
        $crate::path::Fragment::from($leaf)
    };
}

/// Flatten a fragment into its leaf segments, preserving left-to-right order.
///
/// Nesting is unwrapped with an explicit work stack rather than recursion, so
/// arbitrarily deep inputs cannot overflow the call stack. Empty input yields
/// an empty list.
pub fn flatten(fragment: impl Into<Fragment>) -> Vec<String> {
    let mut out = Vec::new();
    let mut pending = vec![fragment.into()];

    while let Some(next) = pending.pop() {
        match next {
            Fragment::Segment(segment) => out.push(segment),
            Fragment::Nested(items) => pending.extend(items.into_iter().rev()),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_preserves_order_through_nesting() {
        let parts = flatten(crate::fragment!(["a", ["b", ["c", "d"]], "e"]));
        assert_eq!(parts, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_flatten_empty_input() {
        assert!(flatten(Fragment::Nested(vec![])).is_empty());
        assert!(flatten(crate::fragment!([[], [[]]])).is_empty());
    }

    #[test]
    fn test_flatten_single_segment() {
        assert_eq!(flatten("only"), vec!["only"]);
    }

    #[test]
    fn test_numeric_leaves_use_string_form() {
        assert_eq!(flatten(crate::fragment!(["v", 2, 1.5])), vec!["v", "2", "1.5"]);
    }

    #[test]
    fn test_json_values_flatten_like_fragments() {
        let parts = flatten(json!(["a", ["b", null], 3, { "k": "c" }]));
        assert_eq!(parts, vec!["a", "b", "", "3", "c"]);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let mut fragment = Fragment::from("leaf");
        for _ in 0..10_000 {
            fragment = Fragment::Nested(vec![fragment]);
        }
        assert_eq!(flatten(fragment), vec!["leaf"]);
    }

    #[test]
    fn test_is_empty() {
        assert!(Fragment::Nested(vec![]).is_empty());
        assert!(!Fragment::from("").is_empty());
    }
}
