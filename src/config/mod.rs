//! Configuration model for difflint.
//!
//! This module defines the Config struct that represents `.difflint.yml`.
//! Unknown top-level fields are ignored for forward compatibility; linter
//! entries are strict and reject unknown options.

mod model;
mod operations;
mod selection;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::{CONFIG_FILE_NAME, Config};
pub use selection::{LinterSelection, Part};
