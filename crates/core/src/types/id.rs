//! Newtype IDs for type-safe entity references.
//!
//! Catalog data identifies everything with short string slugs (`prd-001`,
//! `clr-black`, `ORD-1738224000000`). Use the `define_id!` macro to wrap them
//! so a product ID can never be passed where an order ID is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use gpm_core::define_id;
/// define_id!(RunnerId);
/// define_id!(RaceId);
///
/// let runner = RunnerId::new("rnr-001");
/// let race = RaceId::new("rnr-001");
///
/// // These are different types, so this won't compile:
/// // let _: RunnerId = race;
/// assert_eq!(runner.as_str(), race.as_str());
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
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
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
define_id!(ColorId);
define_id!(GalleryImageId);
define_id!(OrderId);

impl OrderId {
    /// Build an order ID from a millisecond Unix timestamp (`ORD-<millis>`).
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("ORD-{millis}"))
    }
}
