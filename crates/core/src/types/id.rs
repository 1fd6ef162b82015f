//! Newtype IDs for type-safe entity references.
//!
//! Backend records are keyed by opaque string identifiers (`_id`). Use the
//! `define_id!` macro to create wrappers that prevent accidentally mixing IDs
//! from different entity types.
//!
//! IDs that arrive from the backend are trusted as-is. IDs that arrive from a
//! URL path must go through `parse`, which only accepts characters that cannot
//! change the shape of a backend path.

/// Errors that can occur when parsing an ID from untrusted input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_-]`.
    #[error("id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Maximum accepted length of an ID taken from a URL.
pub const MAX_ID_LENGTH: usize = 64;

/// Validate an untrusted ID string.
///
/// # Errors
///
/// Returns an error if the input is empty, longer than [`MAX_ID_LENGTH`], or
/// contains characters other than ASCII letters, digits, `_`, and `-`.
pub fn validate_id(s: &str) -> Result<(), IdError> {
    if s.is_empty() {
        return Err(IdError::Empty);
    }
    if s.len() > MAX_ID_LENGTH {
        return Err(IdError::TooLong {
            max: MAX_ID_LENGTH,
        });
    }
    if let Some(c) = s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(IdError::InvalidCharacter(c));
    }
    Ok(())
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()` for untrusted input, `as_str()`, `short()`
/// - `Display` and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use shopeasy_core::define_id;
/// define_id!(UserId);
/// define_id!(OrderId);
///
/// let user_id = UserId::parse("64f1c0ffee").unwrap();
/// let order_id = OrderId::parse("64f1c0ffee").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: UserId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an ID from untrusted input such as a URL path segment.
            ///
            /// # Errors
            ///
            /// Returns an error if the value is not a well-formed ID.
            pub fn parse(s: &str) -> Result<Self, $crate::types::id::IdError> {
                $crate::types::id::validate_id(s)?;
                Ok(Self(s.to_owned()))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The last six characters, used as a compact reference in tables.
            #[must_use]
            pub fn short(&self) -> &str {
                let start = self
                    .0
                    .char_indices()
                    .rev()
                    .nth(5)
                    .map_or(0, |(idx, _)| idx);
                self.0.get(start..).unwrap_or(&self.0)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mongo_style_id() {
        let id = ProductId::parse("65a1f2e3d4c5b6a798765432").unwrap();
        assert_eq!(id.as_str(), "65a1f2e3d4c5b6a798765432");
        assert_eq!(id.to_string(), "65a1f2e3d4c5b6a798765432");
    }

    #[test]
    fn test_parse_rejects_path_characters() {
        assert_eq!(
            OrderId::parse("../admin").unwrap_err(),
            IdError::InvalidCharacter('.')
        );
        assert_eq!(
            OrderId::parse("abc/def").unwrap_err(),
            IdError::InvalidCharacter('/')
        );
        assert!(OrderId::parse("abc?x=1").is_err());
        assert!(OrderId::parse("abc def").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_and_long() {
        assert_eq!(UserId::parse("").unwrap_err(), IdError::Empty);
        let long = "a".repeat(MAX_ID_LENGTH + 1);
        assert!(matches!(
            UserId::parse(&long).unwrap_err(),
            IdError::TooLong { .. }
        ));
        assert!(UserId::parse(&"a".repeat(MAX_ID_LENGTH)).is_ok());
    }

    #[test]
    fn test_short_takes_last_six() {
        let id = OrderId::parse("65a1f2e3d4c5b6a798765432").unwrap();
        assert_eq!(id.short(), "765432");

        let tiny = OrderId::parse("abc").unwrap();
        assert_eq!(tiny.short(), "abc");
    }

    #[test]
    fn test_serde_transparent() {
        let id: UserId = serde_json::from_str("\"u-1\"").unwrap();
        assert_eq!(id.as_str(), "u-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u-1\"");
    }
}
