//! Command line building blocks for the stunting risk toolkit.
//!
//! The binary in `main.rs` only parses arguments; everything it runs lives
//! here so it can be exercised from tests.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod session;
pub mod summary;
