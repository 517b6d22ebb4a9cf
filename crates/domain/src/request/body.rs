//! Serialized request body.

use serde::{Deserialize, Serialize};

/// Content type used for every serialized payload unless a fixture overrides it.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// UTF-8 text body tagged with the content type it is sent with.
///
/// The content type is carried verbatim: a fixture may deliberately use a
/// malformed MIME string and it must reach the wire unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Value of the `Content-Type` header.
    pub content_type: String,
    /// The body content.
    pub content: String,
}

impl RequestBody {
    /// Creates a JSON body.
    #[must_use]
    pub fn json(content: impl Into<String>) -> Self {
        Self::with_content_type(JSON_CONTENT_TYPE, content)
    }

    /// Creates a body with an explicit content type, kept as given.
    #[must_use]
    pub fn with_content_type(content_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    /// Returns whether the body has no content.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // String::is_empty is not const
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
