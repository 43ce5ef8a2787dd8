//! Utilities Module
//!
//! Cross-cutting helpers used by the CLI and tests.

pub mod logging;
