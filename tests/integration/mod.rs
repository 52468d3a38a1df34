//! Integration test suite for stencil
//!
//! End-to-end tests for rendering through the public API, configuration
//! loading and the `stencil` binary.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **render**: Renderer behavior against real template files
//! - **config**: Config file discovery (serialized; touches the environment)
//! - **cli**: The `stencil` binary via `assert_cmd`

mod cli;
mod config;
mod render;
