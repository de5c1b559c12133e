//! Stored object representation.

use serde::{Deserialize, Serialize};

/// A single object within a tenant bucket.
///
/// Holds the content bytes and the metadata the store keeps alongside them.
/// The object key is path-like and owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Object content bytes.
    pub body: Vec<u8>,
    /// Content type recorded when the object was uploaded, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl StoredObject {
    /// Create an object from body bytes.
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            content_type: None,
        }
    }

    /// Attach a stored content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size of the object in bytes.
    pub fn size(&self) -> usize {
        self.body.len()
    }
}
