//! Error types for serialization and deserialization.
//!
//! ## Error Categories
//!
//! - **Format errors**: text that matches no recognized literal shape
//! - **Type resolution errors**: a `class` tag the registry does not know
//! - **Depth errors**: input nested deeper than the configured limit
//! - **I/O errors**: reader/writer failures in the convenience functions
//!
//! ## Examples
//!
//! ```rust
//! use serde_classjson::{Deserializer, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let err = Deserializer::new(&registry).deserialize("12abc").unwrap_err();
//! assert!(err.is_format());
//! ```

use std::fmt;
use thiserror::Error;

/// Longest fragment quoted verbatim in an error message.
const MAX_SNIPPET: usize = 64;

/// Represents all possible errors that can occur during serialization/deserialization.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Text does not match any recognized primitive or compound shape
    #[error("Format error: {msg}: `{fragment}`")]
    Format { msg: String, fragment: String },

    /// A `class` tag names a type the registry cannot resolve
    #[error("Type resolution error: unknown record type `{class}`")]
    TypeResolution { class: String },

    /// Nesting went past the configured limit
    #[error("Nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },

    /// Unsupported type for serialization
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a format error quoting the offending text.
    ///
    /// Long fragments are shortened so messages stay readable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_classjson::Error;
    ///
    /// let err = Error::format("not a number", "12abc");
    /// assert!(err.to_string().contains("`12abc`"));
    /// ```
    pub fn format(msg: &str, fragment: &str) -> Self {
        Error::Format {
            msg: msg.to_string(),
            fragment: snippet(fragment),
        }
    }

    /// Creates a type resolution error for an unknown class tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_classjson::Error;
    ///
    /// let err = Error::type_resolution("Person");
    /// assert!(err.is_type_resolution());
    /// ```
    pub fn type_resolution(class: &str) -> Self {
        Error::TypeResolution {
            class: class.to_string(),
        }
    }

    /// Creates the error for input nested deeper than `limit`.
    pub fn depth_limit_exceeded(limit: usize) -> Self {
        Error::DepthLimitExceeded { limit }
    }

    /// Creates an unsupported type error for values the format cannot express.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Whether the text failed to match any literal shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_classjson::{Deserializer, TypeRegistry};
    ///
    /// let registry = TypeRegistry::new();
    /// let err = Deserializer::new(&registry).deserialize("[1,,2]").unwrap_err();
    /// assert!(err.is_format());
    /// ```
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format { .. })
    }

    /// Whether a `class` tag named a type the registry does not know.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_classjson::{Deserializer, TypeRegistry};
    ///
    /// let registry = TypeRegistry::new();
    /// let err = Deserializer::new(&registry)
    ///     .deserialize(r#"{"class": "Ghost"}"#)
    ///     .unwrap_err();
    /// assert!(err.is_type_resolution());
    /// ```
    #[must_use]
    pub fn is_type_resolution(&self) -> bool {
        matches!(self, Error::TypeResolution { .. })
    }
}

fn snippet(text: &str) -> String {
    match text.char_indices().nth(MAX_SNIPPET) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_truncates_long_fragments() {
        let long = "x".repeat(200);
        let err = Error::format("bad", &long);
        match err {
            Error::Format { fragment, .. } => {
                assert!(fragment.ends_with("..."));
                assert_eq!(fragment.len(), MAX_SNIPPET + 3);
            }
            _ => panic!("Expected format error"),
        }
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let text = "ж".repeat(100);
        let short = snippet(&text);
        assert_eq!(short.chars().count(), MAX_SNIPPET + 3);
    }

    #[test]
    fn test_predicates() {
        assert!(Error::format("bad", "?").is_format());
        assert!(!Error::format("bad", "?").is_type_resolution());
        assert!(Error::type_resolution("Ghost").is_type_resolution());
        assert!(Error::type_resolution("Ghost")
            .to_string()
            .contains("`Ghost`"));
    }
}
