//! Newtype IDs for type-safe identifiers.
//!
//! Scopes are resolved to ids before they reach the engine, while filters
//! from the URL carry slugs. Keeping the two apart stops a category slug
//! from being used where a resolved category id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
define_id!(SubcategoryId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_string() {
        let id: ProductId = "prod-456".into();
        assert_eq!(id.as_str(), "prod-456");
    }

    #[test]
    fn test_id_display() {
        let id = CategoryId::new("cat-789");
        assert_eq!(format!("{}", id), "cat-789");
    }

    #[test]
    fn test_id_ordering_follows_string() {
        let a = ProductId::new("a-1");
        let b = ProductId::new("b-1");
        assert!(a < b);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = SubcategoryId::new("sub-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sub-1\"");
    }
}
