//! Configuration options for deserialization.
//!
//! The serialized shape is fixed by the format, so only the parser is
//! configurable.
//!
//! ## Examples
//!
//! ```rust
//! use serde_classjson::{Deserializer, ParseOptions, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::new();
//!
//! // Escapes are decoded by default
//! let value = Deserializer::new(&registry).deserialize(r#""a\tb""#).unwrap();
//! assert_eq!(value, Value::from("a\tb"));
//!
//! // Legacy mode hands back the text between the quotes untouched
//! let value = Deserializer::new(&registry)
//!     .with_options(ParseOptions::legacy())
//!     .deserialize(r#""a\tb""#)
//!     .unwrap();
//! assert_eq!(value, Value::from(r"a\tb"));
//! ```

/// Nesting depth accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for the [`Deserializer`](crate::Deserializer).
///
/// # Examples
///
/// ```rust
/// use serde_classjson::ParseOptions;
///
/// let options = ParseOptions::new().with_max_depth(16);
/// assert_eq!(options.max_depth, 16);
/// assert!(options.unescape);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Decode backslash escapes in string literals. When `false`, a string's
    /// inner text is returned verbatim.
    pub unescape: bool,
    /// Deepest array/object/record nesting accepted before giving up.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            unescape: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Creates default options (escapes decoded, depth limit of 128).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options reproducing the older behaviour of returning string contents
    /// verbatim, escapes and all.
    #[must_use]
    pub fn legacy() -> Self {
        ParseOptions {
            unescape: false,
            ..Default::default()
        }
    }

    /// Sets whether string escapes are decoded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_classjson::ParseOptions;
    ///
    /// assert_eq!(ParseOptions::new().with_unescape(false), ParseOptions::legacy());
    /// ```
    #[must_use]
    pub fn with_unescape(mut self, unescape: bool) -> Self {
        self.unescape = unescape;
        self
    }

    /// Sets the deepest nesting accepted. A limit of `0` accepts only
    /// scalars.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Deserializer, TypeRegistry, Value};

    #[test]
    fn test_builders() {
        let options = ParseOptions::new().with_unescape(false).with_max_depth(3);
        assert!(!options.unescape);
        assert_eq!(options.max_depth, 3);
        assert_eq!(ParseOptions::default().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_zero_depth_accepts_only_scalars() {
        let registry = TypeRegistry::new();
        let deserializer =
            Deserializer::new(&registry).with_options(ParseOptions::new().with_max_depth(0));
        assert_eq!(deserializer.deserialize("7").unwrap(), Value::from(7));
        assert!(matches!(
            deserializer.deserialize("[]"),
            Err(crate::Error::DepthLimitExceeded { limit: 0 })
        ));
    }
}
