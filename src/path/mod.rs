//! Lexical path construction for template lookup.
//!
//! Template paths are assembled from loose pieces (a configured root, a
//! caller-supplied name, sometimes nested lists of directories) and then
//! cleaned up before the file is opened:
//!
//! - [`flatten`] unwraps nested [`Fragment`] lists into ordered segments
//! - [`PathResolver::normalize`] joins them, unifies separators, drops
//!   interior `./` and collapses doubled separators
//! - [`PathResolver::resolve`] additionally folds `segment/../` pairs and
//!   strips a trailing separator
//!
//! Nothing here touches the filesystem.

mod fragment;
mod resolver;

pub use fragment::{Fragment, flatten};
pub use resolver::{PathResolver, Separator};
