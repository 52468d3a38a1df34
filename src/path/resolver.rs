//! Path normalization and `..` resolution.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::fragment::{Fragment, flatten};

static SLASH_RUN: LazyLock<Regex> = LazyLock::new(|| compile(r"/{2,}"));
static BACKSLASH_RUN: LazyLock<Regex> = LazyLock::new(|| compile(r"\\{2,}"));
static SLASH_PARENT: LazyLock<Regex> = LazyLock::new(|| compile(r"[^/]+/\.\./"));
static BACKSLASH_PARENT: LazyLock<Regex> = LazyLock::new(|| compile(r"[^\\]+\\\.\.\\"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static path pattern must compile")
}

/// The directory separator a [`PathResolver`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Separator {
    /// `/`
    Slash,
    /// `\`
    Backslash,
}

impl Separator {
    /// The separator of the host platform.
    pub const fn native() -> Self {
        if cfg!(windows) {
            Separator::Backslash
        } else {
            Separator::Slash
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Separator::Slash => '/',
            Separator::Backslash => '\\',
        }
    }

    /// The separator callers may mix in that gets rewritten to `self`.
    pub const fn other(self) -> Self {
        match self {
            Separator::Slash => Separator::Backslash,
            Separator::Backslash => Separator::Slash,
        }
    }

    fn run_pattern(self) -> &'static Regex {
        match self {
            Separator::Slash => &SLASH_RUN,
            Separator::Backslash => &BACKSLASH_RUN,
        }
    }

    fn parent_pattern(self) -> &'static Regex {
        match self {
            Separator::Slash => &SLASH_PARENT,
            Separator::Backslash => &BACKSLASH_PARENT,
        }
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Separator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(Self::native()),
            "/" | "slash" => Ok(Separator::Slash),
            "\\" | "backslash" => Ok(Separator::Backslash),
            other => Err(format!(
                "invalid separator '{other}' (expected \"native\", \"/\" or \"\\\\\")"
            )),
        }
    }
}

impl TryFrom<String> for Separator {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Separator> for String {
    fn from(value: Separator) -> Self {
        value.as_char().to_string()
    }
}

/// Turns heterogeneous path fragments into one canonical path string.
///
/// Resolution is purely lexical: nothing touches the filesystem and no input
/// is rejected. Malformed input produces an odd but well-formed string.
///
/// # Examples
///
/// ```rust
/// use stencil::path::{PathResolver, Separator};
///
/// let resolver = PathResolver::new(Separator::Slash);
/// assert_eq!(resolver.resolve(["views", "./partials", "nav.html"]), "views/partials/nav.html");
/// assert_eq!(resolver.resolve("a/b/../../c"), "c");
/// assert_eq!(resolver.normalize("a//b/../c"), "a/b/../c");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathResolver {
    separator: Separator,
}

impl PathResolver {
    pub const fn new(separator: Separator) -> Self {
        Self {
            separator,
        }
    }

    /// A resolver using the host platform's separator.
    pub const fn native() -> Self {
        Self::new(Separator::native())
    }

    pub const fn separator(&self) -> Separator {
        self.separator
    }

    /// Join and clean fragments without resolving `..` segments.
    ///
    /// 1. Flatten all fragments and join them with the separator.
    /// 2. Rewrite the other separator character to this one.
    /// 3. Drop interior `.` segments that are followed by a separator. A
    ///    leading `./` and every `..` segment survive.
    /// 4. Collapse runs of separators into one.
    pub fn normalize(&self, fragments: impl Into<Fragment>) -> String {
        let sep = self.separator.as_char();
        let sep_str = sep.to_string();
        let joined = flatten(fragments).join(sep_str.as_str());
        let unified = joined.replace(self.separator.other().as_char(), &sep_str);
        let elided = elide_current_dir(&unified, sep);

        self.separator.run_pattern().replace_all(&elided, sep_str.as_str()).into_owned()
    }

    /// Normalize, then collapse `segment/../` pairs until nothing changes and
    /// strip one trailing separator.
    ///
    /// Each pass removes only the leftmost `segment/../`, so inputs such as
    /// `a/b/../../c` take several passes to reach `c`. The segment pattern is
    /// "one or more non-separator characters", which includes `..` itself.
    pub fn resolve(&self, fragments: impl Into<Fragment>) -> String {
        let pattern = self.separator.parent_pattern();
        let mut path = self.normalize(fragments);
        let mut passes = 0usize;

        while let Cow::Owned(next) = pattern.replacen(&path, 1, "") {
            path = next;
            passes += 1;
        }

        if path.ends_with(self.separator.as_char()) {
            path.pop();
        }

        tracing::trace!(path = %path, passes, "resolved path");
        path
    }
}

fn elide_current_dir(path: &str, sep: char) -> String {
    let segments: Vec<&str> = path.split(sep).collect();
    let last = segments.len().saturating_sub(1);
    let mut out = String::with_capacity(path.len());
    let mut first = true;

    for (i, segment) in segments.iter().enumerate() {
        if i > 0 && i < last && *segment == "." {
            continue;
        }
        if !first {
            out.push(sep);
        }
        out.push_str(segment);
        first = false;
    }

    out
}
