//! Core application types.
//!
//! Currently this holds the binary's error handling; see [`error`].

pub mod error;

pub use error::{ErrorContext, StencilError, user_friendly_error};
