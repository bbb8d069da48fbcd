//! The `utils` module provides shared utilities used across `vizrelay`:
//! logging setup and the crate's error types.

pub mod error;
pub mod logging;
