//! Newtype ids for type-safe entity references.
//!
//! Use the `define_entity_id!` macro to create type-safe id wrappers that
//! prevent accidentally mixing ids from different entity types.

/// Macro to define a type-safe entity id wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - A `generate()` constructor producing `{prefix}-{unix_millis}-{8 hex}`
///   ids, so ids sort roughly by creation time and stay unique within a
///   document
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use footballdecoded_core::define_entity_id;
/// define_entity_id!(CommentId, "comment");
/// define_entity_id!(ReplyId, "reply");
///
/// let id = CommentId::generate();
/// assert!(id.as_str().starts_with("comment-"));
///
/// // These are different types, so this won't compile:
/// // let _: CommentId = ReplyId::generate();
/// ```
#[macro_export]
macro_rules! define_entity_id {
    ($name:ident, $prefix:literal) => {
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
            /// Create an id from an existing string value.
            #[must_use]
            pub const fn new(id: String) -> Self {
                Self(id)
            }

            /// Generate a fresh id from the current time and a random suffix.
            #[must_use]
            pub fn generate() -> Self {
                let millis = ::std::time::SystemTime::now()
                    .duration_since(::std::time::UNIX_EPOCH)
                    .map_or(0, |d| d.as_millis());
                let suffix: [u8; 4] = ::rand::random();
                let suffix: String = suffix.iter().map(|b| format!("{b:02x}")).collect();
                Self(format!("{}-{millis}-{suffix}", $prefix))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity ids
define_entity_id!(CommentId, "comment");
define_entity_id!(ReplyId, "reply");
