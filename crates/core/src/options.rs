//! Parser configuration.
//!
//! Deserializable so front ends can load it from the `[parser]` table of a
//! config file:
//!
//! ```toml
//! [parser]
//! trailing_fields = "lenient"
//! parallel = true
//! ```

use serde::{Deserialize, Serialize};

/// How an odd leftover field after the statement value is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingFields {
    /// A key without a value fails the line.
    #[default]
    Strict,
    /// A key without a value is ignored.
    Lenient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserOptions {
    pub trailing_fields: TrailingFields,
    /// Parse lines on the rayon pool. Output is identical either way.
    pub parallel: bool,
}

impl ParserOptions {
    pub fn lenient() -> Self {
        ParserOptions {
            trailing_fields: TrailingFields::Lenient,
            ..ParserOptions::default()
        }
    }
}
